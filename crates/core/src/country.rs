//! Country data models and pure transformations
//!
//! Converts the two upstream payloads (the bulk summary listing and the
//! per-country detail lookup) into a single canonical [`CountryRecord`],
//! and provides the filters and aggregations run over an acquired
//! collection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Sentinel accepted by [`filter_by_region`] to select every country
pub const ALL_REGIONS: &str = "all";

/// Pixel size used for the default flag locators
pub const FLAG_SIZE: u32 = 64;

/// Pixel size used for the large flag locator
pub const LARGE_FLAG_SIZE: u32 = 256;

// ============================================================================
// Upstream payloads
// ============================================================================

/// Summary listing response
///
/// `data` is kept as a raw value: the upstream returns an object keyed by
/// country code, but an exhausted page may come back as an empty array.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Single entry of the summary listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SummaryEntry {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Name block of the detail payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetailName {
    #[serde(default)]
    pub common: Option<String>,
    #[serde(default)]
    pub official: Option<String>,
}

/// Image locators of the detail payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetailImages {
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
}

/// Detailed country object returned by the detail source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailCountry {
    #[serde(default)]
    pub name: Option<DetailName>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub timezones: Option<Vec<String>>,
    #[serde(default)]
    pub idd: Option<Idd>,
    #[serde(default)]
    pub tld: Option<Vec<String>>,
    #[serde(default)]
    pub flags: Option<DetailImages>,
    #[serde(default)]
    pub coat_of_arms: Option<DetailImages>,
    #[serde(default)]
    pub borders: Option<Vec<String>>,
    #[serde(default)]
    pub gini: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub fifa: Option<String>,
    #[serde(default)]
    pub car: Option<Car>,
    #[serde(default)]
    pub continents: Option<Vec<String>>,
}

// ============================================================================
// Canonical record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

/// Flag image locators for the two rendering roles
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlagRefs {
    pub svg: String,
    pub png: String,
}

/// Flag locators including the large variant
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlagSet {
    pub svg: String,
    pub png: String,
    pub large: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Currency {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// International dialing prefix
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Idd {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CoatOfArms {
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
}

/// Vehicle registration signs and driving side
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Car {
    #[serde(default)]
    pub signs: Vec<String>,
    #[serde(default)]
    pub side: Option<String>,
}

/// Canonical in-memory country representation
///
/// Every field is always serialized; enrichment fields are `null` until a
/// detail lookup succeeds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountryRecord {
    pub code: String,
    pub name: CountryName,
    pub region: String,
    pub subregion: String,
    pub flags: FlagRefs,
    pub population: Option<u64>,
    pub area: Option<f64>,
    pub capital: Option<Vec<String>>,
    pub currencies: Option<BTreeMap<String, Currency>>,
    pub languages: Option<BTreeMap<String, String>>,
    pub latlng: Option<[f64; 2]>,
    pub timezones: Option<Vec<String>>,
    pub idd: Option<Idd>,
    pub tld: Option<Vec<String>>,
    pub borders: Option<Vec<String>>,
    pub continents: Option<Vec<String>>,
    pub coat_of_arms: Option<CoatOfArms>,
    pub fifa: Option<String>,
    pub car: Option<Car>,
    pub gini: Option<BTreeMap<String, f64>>,
}

impl CountryRecord {
    /// Build an unenriched record from a summary listing entry
    pub fn from_summary(code: &str, entry: &SummaryEntry, flag_base: &str) -> Self {
        let name = entry
            .country
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| code.to_string());
        let raw_region = entry.region.clone().unwrap_or_default();

        Self {
            code: code.to_string(),
            name: CountryName {
                common: name.clone(),
                official: name,
            },
            region: normalize_region(&raw_region),
            subregion: raw_region,
            flags: flag_refs(flag_base, code),
            population: None,
            area: None,
            capital: None,
            currencies: None,
            languages: None,
            latlng: None,
            timezones: None,
            idd: None,
            tld: None,
            borders: None,
            continents: None,
            coat_of_arms: None,
            fifa: None,
            car: None,
            gini: None,
        }
    }

    /// Whether any detail field has been populated
    pub fn is_enriched(&self) -> bool {
        self.population.is_some()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Map a source region label onto the closed set of display regions
///
/// Unknown labels pass through unchanged, so the mapping is idempotent.
pub fn normalize_region(region: &str) -> String {
    match region {
        "Africa" => "Africa",
        "Asia" => "Asia",
        "Europe" => "Europe",
        "North America" | "South America" | "Central America" | "Caribbean" => "Americas",
        "Oceania" => "Oceania",
        "Antarctica" | "Antarctic" => "Antarctica",
        other => other,
    }
    .to_string()
}

/// Build a flag image URL for the given code and pixel size
pub fn flag_url(flag_base: &str, code: &str, size: u32) -> String {
    format!("{}/{code}/flat/{size}.png", flag_base.trim_end_matches('/'))
}

pub fn flag_refs(flag_base: &str, code: &str) -> FlagRefs {
    FlagRefs {
        svg: flag_url(flag_base, code, FLAG_SIZE),
        png: flag_url(flag_base, code, FLAG_SIZE),
    }
}

pub fn flag_set(flag_base: &str, code: &str) -> FlagSet {
    FlagSet {
        svg: flag_url(flag_base, code, FLAG_SIZE),
        png: flag_url(flag_base, code, FLAG_SIZE),
        large: flag_url(flag_base, code, LARGE_FLAG_SIZE),
    }
}

/// Parse a summary listing page into unenriched records
///
/// Returns `None` when the page has no `data` member or it is neither an
/// object nor an array. An empty array is a valid, empty page. Entries that
/// are not objects are skipped.
pub fn parse_summary_page(response: &SummaryResponse, flag_base: &str) -> Option<Vec<CountryRecord>> {
    match response.data.as_ref()? {
        Value::Object(map) => Some(
            map.iter()
                .filter_map(|(code, value)| {
                    let entry: SummaryEntry = serde_json::from_value(value.clone()).ok()?;
                    Some(CountryRecord::from_summary(code, &entry, flag_base))
                })
                .collect(),
        ),
        Value::Array(items) if items.is_empty() => Some(Vec::new()),
        _ => None,
    }
}

/// Number of raw entries in a summary page, parsable or not
///
/// Page-size decisions use this count so a skipped entry does not make a
/// full page look short.
pub fn summary_entry_count(response: &SummaryResponse) -> usize {
    match response.data.as_ref() {
        Some(Value::Object(map)) => map.len(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

/// Drop records whose code was already seen, keeping the first occurrence
pub fn dedupe_by_code(records: Vec<CountryRecord>) -> Vec<CountryRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.code.clone()))
        .collect()
}

// ============================================================================
// Enrichment
// ============================================================================

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Merge a detail payload over a summary record
///
/// Detail values win where present. Names and flag locators fall back to
/// the summary record; the remaining enrichment fields fall back to empty
/// values so an enriched record never carries `null` details.
pub fn merge_detail(base: &CountryRecord, detail: &DetailCountry) -> CountryRecord {
    let name = detail.name.clone().unwrap_or_default();
    let flags = detail.flags.clone().unwrap_or_default();

    let latlng = match detail.latlng.as_deref() {
        Some([lat, lng, ..]) => [*lat, *lng],
        _ => [0.0, 0.0],
    };

    CountryRecord {
        code: base.code.clone(),
        name: CountryName {
            common: non_empty(name.common.as_ref()).unwrap_or_else(|| base.name.common.clone()),
            official: non_empty(name.official.as_ref())
                .unwrap_or_else(|| base.name.official.clone()),
        },
        region: base.region.clone(),
        subregion: base.subregion.clone(),
        flags: FlagRefs {
            svg: non_empty(flags.svg.as_ref()).unwrap_or_else(|| base.flags.svg.clone()),
            png: non_empty(flags.png.as_ref()).unwrap_or_else(|| base.flags.png.clone()),
        },
        population: Some(detail.population.unwrap_or(0)),
        area: Some(detail.area.unwrap_or(0.0)),
        capital: Some(detail.capital.clone().unwrap_or_default()),
        currencies: Some(detail.currencies.clone().unwrap_or_default()),
        languages: Some(detail.languages.clone().unwrap_or_default()),
        latlng: Some(latlng),
        timezones: Some(detail.timezones.clone().unwrap_or_default()),
        idd: Some(detail.idd.clone().unwrap_or_default()),
        tld: Some(detail.tld.clone().unwrap_or_default()),
        borders: Some(detail.borders.clone().unwrap_or_default()),
        continents: Some(
            detail
                .continents
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| vec![base.region.clone()]),
        ),
        coat_of_arms: Some(
            detail
                .coat_of_arms
                .clone()
                .map(|c| CoatOfArms {
                    svg: c.svg,
                    png: c.png,
                })
                .unwrap_or_default(),
        ),
        fifa: Some(detail.fifa.clone().unwrap_or_default()),
        car: Some(detail.car.clone().unwrap_or_default()),
        gini: Some(detail.gini.clone().unwrap_or_default()),
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Case-insensitive substring search over names, region and subregion
///
/// Preserves collection order.
pub fn search_countries(countries: &[CountryRecord], query: &str) -> Vec<CountryRecord> {
    let needle = query.to_lowercase();

    countries
        .iter()
        .filter(|c| {
            c.name.common.to_lowercase().contains(&needle)
                || c.name.official.to_lowercase().contains(&needle)
                || c.region.to_lowercase().contains(&needle)
                || c.subregion.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Exact match on region or subregion; [`ALL_REGIONS`] selects everything
pub fn filter_by_region(countries: &[CountryRecord], region: &str) -> Vec<CountryRecord> {
    if region == ALL_REGIONS {
        return countries.to_vec();
    }

    countries
        .iter()
        .filter(|c| c.region == region || c.subregion == region)
        .cloned()
        .collect()
}

pub fn find_by_code<'a>(countries: &'a [CountryRecord], code: &str) -> Option<&'a CountryRecord> {
    countries.iter().find(|c| c.code == code)
}

// ============================================================================
// Aggregations
// ============================================================================

/// Collection-level summary
#[derive(Debug, Clone, Serialize)]
pub struct DataStats {
    pub total_countries: usize,
    pub regions: BTreeMap<String, usize>,
    pub last_updated: String,
    pub api_source: String,
}

/// Per-region breakdown
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionStats {
    pub count: usize,
    pub countries: Vec<String>,
}

pub fn data_stats(countries: &[CountryRecord], now: DateTime<Utc>, api_source: &str) -> DataStats {
    let mut regions = BTreeMap::new();
    for country in countries {
        *regions.entry(country.region.clone()).or_insert(0) += 1;
    }

    DataStats {
        total_countries: countries.len(),
        regions,
        last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        api_source: api_source.to_string(),
    }
}

pub fn regional_stats(countries: &[CountryRecord]) -> BTreeMap<String, RegionStats> {
    let mut stats: BTreeMap<String, RegionStats> = BTreeMap::new();
    for country in countries {
        let entry = stats.entry(country.region.clone()).or_default();
        entry.count += 1;
        entry.countries.push(country.name.common.clone());
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const FLAGS: &str = "https://flagsapi.com";

    fn record(code: &str, name: &str, region: &str) -> CountryRecord {
        CountryRecord::from_summary(
            code,
            &SummaryEntry {
                country: Some(name.to_string()),
                region: Some(region.to_string()),
            },
            FLAGS,
        )
    }

    fn sample_collection() -> Vec<CountryRecord> {
        vec![
            record("DE", "Germany", "Europe"),
            record("AR", "Argentina", "South America"),
            record("DK", "Denmark", "Europe"),
            record("US", "United States of America", "North America"),
            record("KE", "Kenya", "Africa"),
        ]
    }

    // ============================================================================
    // normalize_region tests
    // ============================================================================

    #[test]
    fn test_normalize_region_americas() {
        assert_eq!(normalize_region("South America"), "Americas");
        assert_eq!(normalize_region("North America"), "Americas");
        assert_eq!(normalize_region("Central America"), "Americas");
        assert_eq!(normalize_region("Caribbean"), "Americas");
    }

    #[test]
    fn test_normalize_region_antarctic() {
        assert_eq!(normalize_region("Antarctic"), "Antarctica");
    }

    #[test]
    fn test_normalize_region_passthrough() {
        assert_eq!(normalize_region("Middle Earth"), "Middle Earth");
        assert_eq!(normalize_region(""), "");
    }

    #[test]
    fn test_normalize_region_idempotent() {
        for raw in [
            "Africa",
            "South America",
            "Caribbean",
            "Antarctic",
            "Oceania",
            "Unmapped",
        ] {
            let once = normalize_region(raw);
            assert_eq!(normalize_region(&once), once);
        }
    }

    // ============================================================================
    // summary parsing tests
    // ============================================================================

    #[test]
    fn test_from_summary_defaults() {
        let r = record("AR", "Argentina", "South America");

        assert_eq!(r.code, "AR");
        assert_eq!(r.name.common, "Argentina");
        assert_eq!(r.name.official, "Argentina");
        assert_eq!(r.region, "Americas");
        assert_eq!(r.subregion, "South America");
        assert_eq!(r.flags.svg, "https://flagsapi.com/AR/flat/64.png");
        assert_eq!(r.flags.png, r.flags.svg);
        assert!(r.population.is_none());
        assert!(!r.is_enriched());
    }

    #[test]
    fn test_from_summary_missing_name_uses_code() {
        let r = CountryRecord::from_summary("XK", &SummaryEntry::default(), FLAGS);
        assert_eq!(r.name.common, "XK");
        assert_eq!(r.region, "");
    }

    #[test]
    fn test_record_serializes_every_field() {
        let value = serde_json::to_value(record("KE", "Kenya", "Africa")).unwrap();
        let object = value.as_object().unwrap();

        for field in [
            "population",
            "area",
            "capital",
            "currencies",
            "languages",
            "latlng",
            "timezones",
            "idd",
            "tld",
            "borders",
            "continents",
            "coat_of_arms",
            "fifa",
            "car",
            "gini",
        ] {
            assert_eq!(object.get(field), Some(&Value::Null), "field {field}");
        }
    }

    #[test]
    fn test_parse_summary_page_preserves_order() {
        let response: SummaryResponse = serde_json::from_value(json!({
            "total": 3,
            "data": {
                "ZW": {"country": "Zimbabwe", "region": "Africa"},
                "AF": {"country": "Afghanistan", "region": "Asia"},
                "BR": {"country": "Brazil", "region": "South America"}
            }
        }))
        .unwrap();

        let records = parse_summary_page(&response, FLAGS).unwrap();
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["ZW", "AF", "BR"]);
        assert_eq!(records[2].region, "Americas");
    }

    #[test]
    fn test_parse_summary_page_missing_data() {
        let response: SummaryResponse = serde_json::from_value(json!({"total": 10})).unwrap();
        assert!(parse_summary_page(&response, FLAGS).is_none());
    }

    #[test]
    fn test_parse_summary_page_empty_array() {
        let response: SummaryResponse =
            serde_json::from_value(json!({"total": 10, "data": []})).unwrap();
        assert_eq!(parse_summary_page(&response, FLAGS), Some(Vec::new()));
    }

    #[test]
    fn test_parse_summary_page_malformed_data() {
        let response: SummaryResponse =
            serde_json::from_value(json!({"data": "maintenance"})).unwrap();
        assert!(parse_summary_page(&response, FLAGS).is_none());
    }

    #[test]
    fn test_parse_summary_page_skips_non_object_entries() {
        let response: SummaryResponse = serde_json::from_value(json!({
            "data": {"FR": {"country": "France", "region": "Europe"}, "??": 42}
        }))
        .unwrap();
        let records = parse_summary_page(&response, FLAGS).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "FR");
    }

    #[test]
    fn test_summary_entry_count_includes_skipped_entries() {
        let response: SummaryResponse = serde_json::from_value(json!({
            "data": {
                "FR": {"country": "France", "region": "Europe"},
                "XX": {"country": "Oddland", "region": 7},
                "??": 42
            }
        }))
        .unwrap();

        assert_eq!(parse_summary_page(&response, FLAGS).unwrap().len(), 1);
        assert_eq!(summary_entry_count(&response), 3);

        let empty: SummaryResponse = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(summary_entry_count(&empty), 0);
        assert_eq!(summary_entry_count(&SummaryResponse::default()), 0);
    }

    #[test]
    fn test_dedupe_by_code_keeps_first() {
        let records = vec![
            record("FR", "France", "Europe"),
            record("FR", "French Republic", "Europe"),
            record("ES", "Spain", "Europe"),
        ];
        let deduped = dedupe_by_code(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name.common, "France");
    }

    // ============================================================================
    // merge_detail tests
    // ============================================================================

    #[test]
    fn test_merge_detail_full_payload() {
        let base = record("DE", "Germany", "Europe");
        let detail: DetailCountry = serde_json::from_value(json!({
            "name": {"common": "Germany", "official": "Federal Republic of Germany"},
            "population": 83240525u64,
            "area": 357114.0,
            "capital": ["Berlin"],
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "languages": {"deu": "German"},
            "latlng": [51.0, 9.0],
            "timezones": ["UTC+01:00"],
            "idd": {"root": "+4", "suffixes": ["9"]},
            "tld": [".de"],
            "flags": {"svg": "https://flagcdn.com/de.svg", "png": "https://flagcdn.com/w320/de.png"},
            "coatOfArms": {"svg": "https://mainfacts.com/de.svg"},
            "borders": ["AUT", "BEL"],
            "car": {"signs": ["DY"], "side": "right"},
            "continents": ["Europe"]
        }))
        .unwrap();

        let merged = merge_detail(&base, &detail);

        assert_eq!(merged.code, "DE");
        assert_eq!(merged.name.official, "Federal Republic of Germany");
        assert_eq!(merged.population, Some(83240525));
        assert_eq!(merged.capital, Some(vec!["Berlin".to_string()]));
        assert_eq!(merged.latlng, Some([51.0, 9.0]));
        assert_eq!(merged.flags.svg, "https://flagcdn.com/de.svg");
        assert_eq!(merged.region, "Europe");
        assert_eq!(
            merged.currencies.unwrap()["EUR"].symbol.as_deref(),
            Some("€")
        );
        assert_eq!(merged.car.unwrap().side.as_deref(), Some("right"));
        assert!(merged.fifa.is_some());
    }

    #[test]
    fn test_merge_detail_empty_payload_falls_back() {
        let base = record("AR", "Argentina", "South America");
        let merged = merge_detail(&base, &DetailCountry::default());

        assert_eq!(merged.name, base.name);
        assert_eq!(merged.flags, base.flags);
        assert_eq!(merged.population, Some(0));
        assert_eq!(merged.area, Some(0.0));
        assert_eq!(merged.capital, Some(Vec::new()));
        assert_eq!(merged.latlng, Some([0.0, 0.0]));
        assert_eq!(merged.continents, Some(vec!["Americas".to_string()]));
    }

    #[test]
    fn test_merge_detail_empty_names_fall_back() {
        let base = record("AR", "Argentina", "South America");
        let detail = DetailCountry {
            name: Some(DetailName {
                common: Some(String::new()),
                official: None,
            }),
            ..Default::default()
        };
        let merged = merge_detail(&base, &detail);
        assert_eq!(merged.name.common, "Argentina");
        assert_eq!(merged.name.official, "Argentina");
    }

    #[test]
    fn test_merge_detail_short_latlng() {
        let base = record("AR", "Argentina", "South America");
        let detail = DetailCountry {
            latlng: Some(vec![12.5]),
            ..Default::default()
        };
        assert_eq!(merge_detail(&base, &detail).latlng, Some([0.0, 0.0]));
    }

    #[test]
    fn test_merge_detail_does_not_touch_base() {
        let base = record("KE", "Kenya", "Africa");
        let snapshot = base.clone();
        let _ = merge_detail(&base, &DetailCountry::default());
        assert_eq!(base, snapshot);
    }

    // ============================================================================
    // filter tests
    // ============================================================================

    #[test]
    fn test_search_matches_name_case_insensitive() {
        let result = search_countries(&sample_collection(), "GER");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "DE");
    }

    #[test]
    fn test_search_matches_region_and_subregion() {
        let countries = sample_collection();
        let by_region = search_countries(&countries, "americas");
        let by_subregion = search_countries(&countries, "south");
        assert_eq!(by_region.len(), 2);
        assert_eq!(by_subregion.len(), 1);
        assert_eq!(by_subregion[0].code, "AR");
    }

    #[test]
    fn test_search_is_pure_and_order_preserving() {
        let countries = sample_collection();
        let first = search_countries(&countries, "many");
        let second = search_countries(&countries, "many");
        assert_eq!(first, second);

        let broad = search_countries(&countries, "e");
        let codes: Vec<&str> = broad.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["DE", "AR", "DK", "US", "KE"]);
    }

    #[test]
    fn test_filter_by_region() {
        let countries = sample_collection();
        let americas = filter_by_region(&countries, "Americas");
        let codes: Vec<&str> = americas.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AR", "US"]);
        assert_eq!(filter_by_region(&countries, "Americas"), americas);
    }

    #[test]
    fn test_filter_by_subregion() {
        let result = filter_by_region(&sample_collection(), "North America");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "US");
    }

    #[test]
    fn test_filter_by_region_all() {
        let countries = sample_collection();
        assert_eq!(filter_by_region(&countries, ALL_REGIONS), countries);
    }

    #[test]
    fn test_filter_by_region_is_exact() {
        assert!(filter_by_region(&sample_collection(), "europe").is_empty());
    }

    #[test]
    fn test_find_by_code() {
        let countries = sample_collection();
        assert_eq!(find_by_code(&countries, "KE").unwrap().name.common, "Kenya");
        assert!(find_by_code(&countries, "ke").is_none());
    }

    // ============================================================================
    // stats tests
    // ============================================================================

    #[test]
    fn test_data_stats() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let stats = data_stats(&sample_collection(), now, "api.first.org");

        assert_eq!(stats.total_countries, 5);
        assert_eq!(stats.regions["Europe"], 2);
        assert_eq!(stats.regions["Americas"], 2);
        assert_eq!(stats.last_updated, "2024-05-01T12:00:00.000Z");
        assert_eq!(stats.api_source, "api.first.org");
    }

    #[test]
    fn test_regional_stats_keeps_collection_order() {
        let stats = regional_stats(&sample_collection());
        assert_eq!(stats["Europe"].count, 2);
        assert_eq!(stats["Europe"].countries, vec!["Germany", "Denmark"]);
        assert_eq!(stats["Africa"].countries, vec!["Kenya"]);
    }

    #[test]
    fn test_flag_set() {
        let flags = flag_set("https://flagsapi.com/", "BR");
        assert_eq!(flags.png, "https://flagsapi.com/BR/flat/64.png");
        assert_eq!(flags.large, "https://flagsapi.com/BR/flat/256.png");
    }
}
