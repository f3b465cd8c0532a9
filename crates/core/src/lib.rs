//! Core library for world-explorer
//!
//! This crate implements the **Functional Core** of the world-explorer
//! application, following the Functional Core - Imperative Shell architectural
//! pattern.
//!
//! # Architecture Overview
//!
//! - **`explorer_core`** (this crate): data models and transformations with no network I/O
//! - **`world-explorer`**: HTTP sources, the country service and the CLI (the Imperative Shell)
//!
//! Everything the shell fetches flows through a pure function here before it
//! reaches a caller: summary payloads become [`country::CountryRecord`]s,
//! detail payloads are merged with [`country::merge_detail`], and the
//! paginated strategy asks [`acquisition::next_page_step`] whether to keep
//! going. Time is always passed in, so cache freshness and wishlist ordering
//! can be tested with fixed instants.
//!
//! The one exception to "no I/O" is [`storage`], which, like a browser's
//! local storage, persists small JSON values on disk.
//!
//! # Module Organization
//!
//! - [`country`]: records, region normalization, enrichment merge, filters and stats
//! - [`acquisition`]: completeness/enrichment outcomes and pagination stepping
//! - [`cache`]: single-slot cache with a freshness window
//! - [`error`]: errors surfaced to callers of the country service
//! - [`storage`]: file-backed key-value store
//! - [`wishlist`]: wishlist model, import/export and stats
//! - [`preferences`]: search history and user preferences
//! - [`validation`]: input validation and number formatting
//!
//! # Example Usage
//!
//! ```rust
//! use explorer_core::country::{filter_by_region, CountryRecord, SummaryEntry};
//!
//! let peru = CountryRecord::from_summary(
//!     "PE",
//!     &SummaryEntry {
//!         country: Some("Peru".to_string()),
//!         region: Some("South America".to_string()),
//!     },
//!     "https://flagsapi.com",
//! );
//!
//! assert_eq!(peru.region, "Americas");
//! assert_eq!(filter_by_region(&[peru], "Americas").len(), 1);
//! ```

pub mod acquisition;
pub mod cache;
pub mod country;
pub mod error;
pub mod preferences;
pub mod storage;
pub mod validation;
pub mod wishlist;
