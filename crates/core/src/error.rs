//! Errors surfaced by country acquisition

/// Failures a caller of the country service has to react to
///
/// Enrichment failures and mid-stream pagination failures never show up
/// here; they are absorbed into [`crate::acquisition::Enrichment`] and
/// [`crate::acquisition::Completeness`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryError {
    #[error("Failed to load countries from API: {0}")]
    DataUnavailable(String),

    #[error("Country not found: {0}")]
    NotFound(String),
}
