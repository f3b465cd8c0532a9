//! Wishlist domain model and pure operations
//!
//! The wishlist is an ordered list of country snapshots. Persistence lives in
//! the shell; everything here works on in-memory values so it can be tested
//! with fixtures.

use crate::country::{CountryName, CountryRecord, Currency, FlagRefs};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Storage key for the persisted wishlist
pub const WISHLIST_KEY: &str = "world-explorer-wishlist";

/// Error type for wishlist import
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WishlistError {
    #[error("Invalid wishlist file format")]
    InvalidFormat,

    #[error("Failed to parse wishlist file: {0}")]
    Parse(String),
}

/// Snapshot of a country taken when it was added
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(alias = "cca2")]
    pub code: String,
    pub name: CountryName,
    #[serde(default)]
    pub flags: Option<FlagRefs>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub latlng: Option<[f64; 2]>,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    pub fn from_record(record: &CountryRecord, added_at: DateTime<Utc>) -> Self {
        Self {
            code: record.code.clone(),
            name: record.name.clone(),
            flags: Some(record.flags.clone()),
            capital: record.capital.clone(),
            region: Some(record.region.clone()),
            subregion: Some(record.subregion.clone()),
            population: record.population,
            area: record.area,
            currencies: record.currencies.clone(),
            languages: record.languages.clone(),
            latlng: record.latlng,
            added_at,
        }
    }
}

/// Exported wishlist document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistExport {
    pub export_date: DateTime<Utc>,
    pub countries: Vec<WishlistEntry>,
}

/// Wishlist summary
#[derive(Debug, Clone, Serialize)]
pub struct WishlistStats {
    pub total_countries: usize,
    pub regions: BTreeMap<String, usize>,
    pub most_recently_added: Option<WishlistEntry>,
    pub oldest_added: Option<WishlistEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        Self { entries }
    }

    /// Entries in insertion order, as persisted
    pub fn raw_entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// Add a snapshot of `record`; returns false if the code is already present
    pub fn add(&mut self, record: &CountryRecord, now: DateTime<Utc>) -> bool {
        if self.contains(&record.code) {
            return false;
        }
        self.entries.push(WishlistEntry::from_record(record, now));
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        match self.entries.iter().position(|e| e.code == code) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Entries sorted newest first
    pub fn entries(&self) -> Vec<WishlistEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        sorted
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn export(&self, now: DateTime<Utc>) -> WishlistExport {
        WishlistExport {
            export_date: now,
            countries: self.entries.clone(),
        }
    }

    /// Merge entries whose code is not already present
    ///
    /// Returns the number of countries in the document, not the number added.
    pub fn import(&mut self, document: WishlistExport) -> usize {
        let total = document.countries.len();
        for entry in document.countries {
            if !self.contains(&entry.code) {
                self.entries.push(entry);
            }
        }
        total
    }

    pub fn stats(&self) -> WishlistStats {
        let mut regions = BTreeMap::new();
        for entry in &self.entries {
            let region = entry
                .region
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            *regions.entry(region).or_insert(0) += 1;
        }

        let mut by_age = self.entries.clone();
        by_age.sort_by(|a, b| a.added_at.cmp(&b.added_at));

        WishlistStats {
            total_countries: self.entries.len(),
            regions,
            oldest_added: by_age.first().cloned(),
            most_recently_added: by_age.last().cloned(),
        }
    }
}

/// Parse an exported wishlist document
pub fn parse_export(raw: &str) -> Result<WishlistExport, WishlistError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| WishlistError::Parse(e.to_string()))?;

    let countries = match value.get("countries") {
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(WishlistError::InvalidFormat),
    };

    let countries = countries
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<WishlistEntry>, _>>()
        .map_err(|e| WishlistError::Parse(e.to_string()))?;

    let export_date = value
        .get("exportDate")
        .and_then(|d| serde_json::from_value(d.clone()).ok())
        .unwrap_or_else(Utc::now);

    Ok(WishlistExport {
        export_date,
        countries,
    })
}

/// Default file name for an export made on `now`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("world-explorer-wishlist-{}.json", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::SummaryEntry;
    use chrono::{Duration, TimeZone};

    fn record(code: &str, name: &str, region: &str) -> CountryRecord {
        CountryRecord::from_summary(
            code,
            &SummaryEntry {
                country: Some(name.to_string()),
                region: Some(region.to_string()),
            },
            "https://flagsapi.com",
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_add_and_contains() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add(&record("JP", "Japan", "Asia"), t0()));
        assert!(wishlist.contains("JP"));
        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&record("JP", "Japan", "Asia"), t0());
        assert!(!wishlist.add(&record("JP", "Japan", "Asia"), t0()));
        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&record("JP", "Japan", "Asia"), t0());
        assert!(wishlist.remove("JP"));
        assert!(!wishlist.remove("JP"));
        assert_eq!(wishlist.count(), 0);
    }

    #[test]
    fn test_entries_newest_first() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&record("JP", "Japan", "Asia"), t0());
        wishlist.add(&record("PE", "Peru", "South America"), t0() + Duration::hours(2));
        wishlist.add(&record("IS", "Iceland", "Europe"), t0() + Duration::hours(1));

        let codes: Vec<String> = wishlist.entries().into_iter().map(|e| e.code).collect();
        assert_eq!(codes, vec!["PE", "IS", "JP"]);

        let raw: Vec<&str> = wishlist.raw_entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(raw, vec!["JP", "PE", "IS"]);
    }

    #[test]
    fn test_clear() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&record("JP", "Japan", "Asia"), t0());
        wishlist.clear();
        assert_eq!(wishlist.count(), 0);
    }

    #[test]
    fn test_stats() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.stats().oldest_added.is_none());

        wishlist.add(&record("JP", "Japan", "Asia"), t0() + Duration::hours(1));
        wishlist.add(&record("PE", "Peru", "South America"), t0());
        wishlist.add(&record("XX", "Nowhere", ""), t0() + Duration::hours(3));

        let stats = wishlist.stats();
        assert_eq!(stats.total_countries, 3);
        assert_eq!(stats.regions["Americas"], 1);
        assert_eq!(stats.regions["Unknown"], 1);
        assert_eq!(stats.oldest_added.unwrap().code, "PE");
        assert_eq!(stats.most_recently_added.unwrap().code, "XX");
    }

    #[test]
    fn test_export_import_merges_new_only() {
        let mut source = Wishlist::default();
        source.add(&record("JP", "Japan", "Asia"), t0());
        source.add(&record("PE", "Peru", "South America"), t0());
        let raw = serde_json::to_string(&source.export(t0())).unwrap();

        let mut target = Wishlist::default();
        target.add(&record("JP", "Japan", "Asia"), t0() + Duration::days(1));

        let document = parse_export(&raw).unwrap();
        assert_eq!(target.import(document), 2);
        assert_eq!(target.count(), 2);
        assert!(target.contains("PE"));
    }

    #[test]
    fn test_parse_export_accepts_legacy_codes() {
        let raw = r#"{
            "exportDate": "2024-03-01T10:00:00.000Z",
            "countries": [
                {"cca2": "NO", "cca3": "NO", "name": {"common": "Norway", "official": "Norway"},
                 "region": "Europe", "addedAt": "2024-02-01T10:00:00.000Z"}
            ]
        }"#;

        let document = parse_export(raw).unwrap();
        assert_eq!(document.countries[0].code, "NO");
        assert_eq!(document.countries[0].region.as_deref(), Some("Europe"));
    }

    #[test]
    fn test_parse_export_missing_countries() {
        assert_eq!(
            parse_export(r#"{"exportDate": "2024-03-01T10:00:00Z"}"#).unwrap_err(),
            WishlistError::InvalidFormat
        );
        assert_eq!(
            parse_export(r#"{"countries": "JP"}"#).unwrap_err(),
            WishlistError::InvalidFormat
        );
    }

    #[test]
    fn test_parse_export_invalid_json() {
        assert!(matches!(
            parse_export("not json"),
            Err(WishlistError::Parse(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(t0()), "world-explorer-wishlist-2024-01-01.json");
    }
}
