//! Country acquisition service
//!
//! Owns the collection cache and composes the source calls: a single-shot
//! bulk fetch, a paginated fallback, and per-country enrichment. Requests are
//! strictly sequential; one page is in flight at a time.

use crate::prelude::*;
use explorer_core::acquisition::{next_page_step, Acquisition, Enrichment, PageStep, PAGE_SIZE};
use explorer_core::cache::{FreshnessCache, FRESHNESS_WINDOW};
use explorer_core::country::{
    data_stats, dedupe_by_code, filter_by_region, find_by_code, flag_set, merge_detail,
    parse_summary_page, regional_stats, search_countries, summary_entry_count, CountryRecord,
    DataStats, FlagSet, RegionStats,
};
use explorer_core::error::CountryError;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::source::{CountrySource, SourceConfig, DEFAULT_FLAG_URL};

/// Delay imposed between successful pages of the paginated strategy
pub const PAGE_DELAY: Duration = Duration::from_millis(100);

/// Shared, immutable country collection
pub type Countries = Arc<Vec<CountryRecord>>;

/// Tunables for [`CountryService`]
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub flag_base: String,
    pub api_source: String,
    pub page_size: usize,
    pub page_delay: Duration,
    pub freshness: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            flag_base: DEFAULT_FLAG_URL.to_string(),
            api_source: "api.first.org".to_string(),
            page_size: PAGE_SIZE,
            page_delay: PAGE_DELAY,
            freshness: FRESHNESS_WINDOW,
        }
    }
}

impl ServiceOptions {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            flag_base: config.flag_url.clone(),
            api_source: config.api_source(),
            ..Default::default()
        }
    }
}

pub struct CountryService<S> {
    source: S,
    options: ServiceOptions,
    cache: FreshnessCache<Countries>,
}

impl<S: CountrySource> CountryService<S> {
    pub fn new(source: S, options: ServiceOptions) -> Self {
        let cache = FreshnessCache::new(options.freshness);
        Self {
            source,
            options,
            cache,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return every country, from cache when fresh
    ///
    /// Tries the single-shot strategy first and falls back to pagination.
    /// Fails with `DataUnavailable` only when both strategies fail; nothing is
    /// cached in that case.
    pub async fn acquire_all(&mut self) -> Result<Countries, CountryError> {
        if let Some(cached) = self.cache.get(Instant::now()) {
            debug!("Serving {} countries from cache", cached.len());
            return Ok(Arc::clone(cached));
        }

        info!("Fetching all countries from API...");
        let single_shot = self.acquire_single_shot().await;
        let single_shot_error = match single_shot {
            Ok(records) => return Ok(self.store(records)),
            Err(err) => err,
        };

        warn!(
            "Error fetching countries: {}. Attempting fallback with pagination...",
            single_shot_error
        );

        let fallback = self.paginate().await;
        match fallback {
            Ok(acquisition) => {
                if !acquisition.is_complete() {
                    warn!(
                        "Accepting partial country collection: {:?}",
                        acquisition.completeness
                    );
                }
                Ok(self.store(acquisition.records))
            }
            Err(err) => {
                warn!("Fallback also failed: {}", err);
                Err(CountryError::DataUnavailable(format!(
                    "{}; pagination fallback: {}",
                    single_shot_error, err
                )))
            }
        }
    }

    /// Run the paginated strategy directly and cache its result
    ///
    /// A page that errors mid-stream ends iteration; the records gathered so
    /// far are kept and the outcome is marked partial.
    pub async fn acquire_all_paginated(&mut self) -> Result<Acquisition, CountryError> {
        let acquisition = self.paginate().await;
        let acquisition = acquisition.map_err(|e| CountryError::DataUnavailable(e.to_string()))?;
        self.store(acquisition.records.clone());
        Ok(acquisition)
    }

    /// Look up one country and try to enrich it from the detail source
    pub async fn get_by_code(&mut self, code: &str) -> Result<CountryRecord, CountryError> {
        Ok(self.enrich_by_code(code).await?.into_record())
    }

    /// Like [`Self::get_by_code`], but reports whether enrichment happened
    pub async fn enrich_by_code(&mut self, code: &str) -> Result<Enrichment, CountryError> {
        let countries = self.acquire_all().await?;
        let base = find_by_code(&countries, code)
            .cloned()
            .ok_or_else(|| CountryError::NotFound(code.to_string()))?;

        Ok(self.enrich(base).await)
    }

    pub async fn search(&mut self, query: &str) -> Result<Vec<CountryRecord>, CountryError> {
        let countries = self.acquire_all().await?;
        Ok(search_countries(&countries, query))
    }

    pub async fn by_region(&mut self, region: &str) -> Result<Vec<CountryRecord>, CountryError> {
        let countries = self.acquire_all().await?;
        Ok(filter_by_region(&countries, region))
    }

    pub async fn data_stats(&mut self) -> Result<DataStats, CountryError> {
        let countries = self.acquire_all().await?;
        Ok(data_stats(
            &countries,
            chrono::Utc::now(),
            &self.options.api_source,
        ))
    }

    pub async fn regional_stats(&mut self) -> Result<BTreeMap<String, RegionStats>, CountryError> {
        let countries = self.acquire_all().await?;
        Ok(regional_stats(&countries))
    }

    /// Flag locators for `code`; no request is made
    pub fn flag_set(&self, code: &str) -> FlagSet {
        flag_set(&self.options.flag_base, code)
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        info!("Country service cache cleared");
    }

    fn store(&mut self, records: Vec<CountryRecord>) -> Countries {
        let countries = Arc::new(records);
        self.cache.store(Arc::clone(&countries), Instant::now());
        countries
    }

    async fn acquire_single_shot(&self) -> Result<Vec<CountryRecord>> {
        let probe = self.source.fetch_summary(None, 1).await?;
        let total = probe
            .total
            .ok_or_eyre("Count probe did not report a total")?;
        info!("Total countries available: {}", total);

        let response = self.source.fetch_summary(None, total).await?;
        let records = parse_summary_page(&response, &self.options.flag_base)
            .ok_or_eyre("Invalid API response structure")?;

        info!(
            "Successfully processed {} out of {} countries",
            records.len(),
            total
        );

        Ok(dedupe_by_code(records))
    }

    async fn paginate(&self) -> Result<Acquisition> {
        let limit = self.options.page_size;
        let mut records: Vec<CountryRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut offset = 0;

        loop {
            debug!(
                "Fetching countries with offset: {}, limit: {}",
                offset, limit
            );

            let response = match self.source.fetch_summary(Some(offset), limit).await {
                Ok(response) => response,
                Err(err) if records.is_empty() => {
                    return Err(err.wrap_err(format!("Error fetching batch at offset {offset}")));
                }
                Err(err) => {
                    warn!("Error fetching batch at offset {}: {}", offset, err);
                    return Ok(Acquisition::partial(
                        records,
                        format!("offset {offset}: {err}"),
                    ));
                }
            };

            let Some(page) = parse_summary_page(&response, &self.options.flag_base) else {
                if records.is_empty() {
                    return Err(eyre!("Invalid API response structure at offset {}", offset));
                }
                debug!("Malformed page at offset {}, stopping", offset);
                break;
            };

            // Short-page check uses the raw entry count; the total check uses unique codes
            let page_len = summary_entry_count(&response);
            records.extend(page.into_iter().filter(|r| seen.insert(r.code.clone())));
            debug!(
                "Fetched {} countries, total so far: {}",
                page_len,
                records.len()
            );

            match next_page_step(offset, page_len, limit, records.len(), response.total) {
                PageStep::Next { offset: next } => {
                    tokio::time::sleep(self.options.page_delay).await;
                    offset = next;
                }
                PageStep::Finished => break,
            }
        }

        info!(
            "Pagination complete. Total countries fetched: {}",
            records.len()
        );

        Ok(Acquisition::complete(records))
    }

    async fn enrich(&self, base: CountryRecord) -> Enrichment {
        match self.source.fetch_detail(&base.code).await {
            Ok(details) => match details.first() {
                Some(detail) => Enrichment::Detailed(merge_detail(&base, detail)),
                None => Enrichment::SummaryOnly {
                    record: base,
                    reason: "Detail source returned no entries".to_string(),
                },
            },
            Err(err) => {
                warn!("Could not fetch detailed country data: {}", err);
                Enrichment::SummaryOnly {
                    record: base,
                    reason: err.to_string(),
                }
            }
        }
    }
}
