//! Acquisition outcomes and pagination bookkeeping
//!
//! The acquisition strategies absorb some failures (a page that errors
//! mid-stream, a detail lookup that fails). These types keep that visible to
//! callers instead of hiding it.

use crate::country::CountryRecord;
use serde::Serialize;

/// Items requested per page by the paginated strategy
pub const PAGE_SIZE: usize = 100;

/// Whether an acquisition returned everything the source had
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    /// Iteration stopped on an error; the records gathered so far were kept
    Partial { reason: String },
}

/// Records gathered by one acquisition strategy
#[derive(Debug, Clone, Serialize)]
pub struct Acquisition {
    pub records: Vec<CountryRecord>,
    pub completeness: Completeness,
}

impl Acquisition {
    pub fn complete(records: Vec<CountryRecord>) -> Self {
        Self {
            records,
            completeness: Completeness::Complete,
        }
    }

    pub fn partial(records: Vec<CountryRecord>, reason: impl Into<String>) -> Self {
        Self {
            records,
            completeness: Completeness::Partial {
                reason: reason.into(),
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
}

/// Result of a detail lookup
#[derive(Debug, Clone)]
pub enum Enrichment {
    Detailed(CountryRecord),
    /// The detail source failed; the summary record is returned unchanged
    SummaryOnly {
        record: CountryRecord,
        reason: String,
    },
}

impl Enrichment {
    pub fn record(&self) -> &CountryRecord {
        match self {
            Enrichment::Detailed(record) => record,
            Enrichment::SummaryOnly { record, .. } => record,
        }
    }

    pub fn into_record(self) -> CountryRecord {
        match self {
            Enrichment::Detailed(record) => record,
            Enrichment::SummaryOnly { record, .. } => record,
        }
    }

    pub fn is_detailed(&self) -> bool {
        matches!(self, Enrichment::Detailed(_))
    }
}

/// What the paginated strategy should do after a successful page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Next { offset: usize },
    Finished,
}

/// Decide whether to request another page
///
/// Stops on a short page (including an empty one) or once the accumulated
/// count reaches the total reported by the source.
pub fn next_page_step(
    offset: usize,
    page_len: usize,
    limit: usize,
    accumulated: usize,
    total: Option<usize>,
) -> PageStep {
    if page_len < limit || page_len == 0 {
        return PageStep::Finished;
    }

    if total.is_some_and(|t| accumulated >= t) {
        return PageStep::Finished;
    }

    PageStep::Next {
        offset: offset + limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::{CountryRecord, SummaryEntry};

    #[test]
    fn test_next_page_step_full_page_continues() {
        assert_eq!(
            next_page_step(0, 100, 100, 100, Some(250)),
            PageStep::Next { offset: 100 }
        );
        assert_eq!(
            next_page_step(100, 100, 100, 200, Some(250)),
            PageStep::Next { offset: 200 }
        );
    }

    #[test]
    fn test_next_page_step_short_page_finishes() {
        assert_eq!(next_page_step(200, 50, 100, 250, Some(300)), PageStep::Finished);
    }

    #[test]
    fn test_next_page_step_empty_page_finishes() {
        assert_eq!(next_page_step(0, 0, 100, 0, None), PageStep::Finished);
        assert_eq!(next_page_step(0, 0, 0, 0, None), PageStep::Finished);
    }

    #[test]
    fn test_next_page_step_total_reached_finishes() {
        assert_eq!(next_page_step(100, 100, 100, 200, Some(200)), PageStep::Finished);
    }

    #[test]
    fn test_next_page_step_unknown_total_continues() {
        assert_eq!(
            next_page_step(0, 100, 100, 100, None),
            PageStep::Next { offset: 100 }
        );
    }

    #[test]
    fn test_enrichment_accessors() {
        let record = CountryRecord::from_summary(
            "FR",
            &SummaryEntry {
                country: Some("France".to_string()),
                region: Some("Europe".to_string()),
            },
            "https://flagsapi.com",
        );

        let fallback = Enrichment::SummaryOnly {
            record: record.clone(),
            reason: "HTTP 503".to_string(),
        };
        assert!(!fallback.is_detailed());
        assert_eq!(fallback.record(), &record);
        assert_eq!(fallback.into_record(), record);
    }

    #[test]
    fn test_acquisition_completeness() {
        assert!(Acquisition::complete(Vec::new()).is_complete());
        let partial = Acquisition::partial(Vec::new(), "offset 200: timeout");
        assert!(!partial.is_complete());
        assert_eq!(
            partial.completeness,
            Completeness::Partial {
                reason: "offset 200: timeout".to_string()
            }
        );
    }
}
