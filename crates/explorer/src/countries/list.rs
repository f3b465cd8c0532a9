use crate::prelude::{println, *};
use colored::Colorize;
use explorer_core::acquisition::Completeness;
use explorer_core::country::{filter_by_region, CountryRecord, ALL_REGIONS};
use explorer_core::preferences::{
    push_search, PreferencesUpdate, SearchHistoryEntry, UserPreferences, MAX_SEARCH_HISTORY,
    PREFERENCES_KEY, SEARCH_HISTORY_KEY,
};
use explorer_core::storage::KeyValueStore;
use explorer_core::validation::{format_population, sanitize_input, validate_search_input};
use serde::Serialize;

use super::{create_service, spinner, CountryService, CountrySource};

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Region to list; defaults to the remembered preference
    #[arg(short, long)]
    pub region: Option<String>,

    /// Page through the summary source instead of fetching it in one request
    #[arg(long)]
    pub paginated: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SearchOptions {
    /// Text matched against names, region and subregion
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct RegionOptions {
    /// Region or subregion name, or "all"
    #[arg(value_name = "REGION")]
    pub region: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Countries returned by a listing command
#[derive(Debug, Clone, Serialize)]
pub struct CountryListOutput {
    pub filter: String,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<Completeness>,
    pub countries: Vec<CountryRecord>,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let store = global.store()?;
    let region = options.region.clone().unwrap_or_else(|| {
        store
            .get(PREFERENCES_KEY, UserPreferences::default())
            .region
    });

    if global.verbose {
        println!("Listing countries in region: {}", region);
    }

    let mut service = create_service()?;
    let progress = spinner("Loading countries...")?;
    let output = list_countries_data(&mut service, &region, options.paginated).await;
    progress.finish_and_clear();

    print_output(&output?, options.json)
}

pub async fn search(options: SearchOptions, global: crate::Global) -> Result<()> {
    if let Some(problem) = validate_search_input(&options.query) {
        return Err(Error::InvalidInput(problem).into());
    }
    let query = sanitize_input(&options.query);

    if global.verbose {
        println!("Searching countries for: {}", query);
    }

    let mut service = create_service()?;
    let progress = spinner("Searching countries...")?;
    let output = search_countries_data(&mut service, &query).await;
    progress.finish_and_clear();
    let output = output?;

    record_search(&global.store()?, &query, chrono::Utc::now().timestamp_millis());

    print_output(&output, options.json)
}

pub async fn region(options: RegionOptions, global: crate::Global) -> Result<()> {
    let region = options.region.trim().to_string();

    let mut service = create_service()?;
    let progress = spinner("Loading countries...")?;
    let output = list_countries_data(&mut service, &region, false).await;
    progress.finish_and_clear();
    let output = output?;

    remember_region(&global.store()?, &region);

    print_output(&output, options.json)
}

/// Fetch the countries of `region` ("all" for every country)
pub async fn list_countries_data<S: CountrySource>(
    service: &mut CountryService<S>,
    region: &str,
    paginated: bool,
) -> Result<CountryListOutput> {
    let (countries, completeness) = if paginated {
        let acquisition = service.acquire_all_paginated().await?;
        let countries = filter_by_region(&acquisition.records, region);
        (countries, Some(acquisition.completeness))
    } else {
        (service.by_region(region).await?, None)
    };

    Ok(CountryListOutput {
        filter: region.to_string(),
        total: countries.len(),
        completeness,
        countries,
    })
}

/// Fetch the countries matching `query`
pub async fn search_countries_data<S: CountrySource>(
    service: &mut CountryService<S>,
    query: &str,
) -> Result<CountryListOutput> {
    let countries = service.search(query).await?;

    Ok(CountryListOutput {
        filter: query.to_string(),
        total: countries.len(),
        completeness: None,
        countries,
    })
}

/// Push `query` onto the persisted search history
pub fn record_search(store: &KeyValueStore, query: &str, now_ms: i64) {
    let history: Vec<SearchHistoryEntry> = store.get(SEARCH_HISTORY_KEY, Vec::new());
    if let Some(updated) = push_search(history, query, now_ms, MAX_SEARCH_HISTORY) {
        if !store.set(SEARCH_HISTORY_KEY, &updated) {
            log::warn!("Could not save search history");
        }
    }
}

/// Store `region` as the default region for `countries list`
pub fn remember_region(store: &KeyValueStore, region: &str) {
    let current = store.get(PREFERENCES_KEY, UserPreferences::default());
    let updated = current.merge(PreferencesUpdate {
        region: Some(region.to_string()),
    });

    if !store.set(PREFERENCES_KEY, &updated) {
        log::warn!("Could not save user preferences");
    }
}

fn print_output(output: &CountryListOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    println!("{}", format_list_text(output));
    Ok(())
}

fn format_list_text(output: &CountryListOutput) -> String {
    let mut result = String::new();

    let title = if output.filter == ALL_REGIONS {
        "ALL COUNTRIES".to_string()
    } else {
        format!("COUNTRIES: {}", output.filter.to_uppercase())
    };

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", title.bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if output.countries.is_empty() {
        result.push_str(&format!("\n{}\n", "No countries found.".yellow()));
        return result;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Code", "Name", "Region", "Subregion", "Population"]);
    for country in &output.countries {
        table.add_row(prettytable::row![
            country.code,
            country.name.common,
            country.region,
            country.subregion,
            format_population(country.population)
        ]);
    }
    result.push('\n');
    result.push_str(&table.to_string());

    result.push_str(&format!(
        "\n{} {}\n",
        output.total.to_string().bright_cyan().bold(),
        "countries".bright_white()
    ));

    if let Some(Completeness::Partial { reason }) = &output.completeness {
        result.push_str(&format!(
            "{} {}\n",
            "Partial result:".yellow().bold(),
            reason.yellow()
        ));
    }

    result
}
