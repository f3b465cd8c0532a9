use crate::prelude::{println, *};
use colored::Colorize;
use explorer_core::acquisition::Enrichment;
use explorer_core::country::{CountryRecord, FlagSet};
use explorer_core::validation::{format_area, format_population};
use serde::Serialize;

use super::{create_service, parse_code, spinner, CountryService, CountrySource};

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// Two or three letter country code
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct FlagOptions {
    /// Two or three letter country code
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One country, with a note when only the summary fields are available
#[derive(Debug, Clone, Serialize)]
pub struct CountryDetailOutput {
    pub country: CountryRecord,
    pub detailed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<Enrichment> for CountryDetailOutput {
    fn from(enrichment: Enrichment) -> Self {
        match enrichment {
            Enrichment::Detailed(country) => Self {
                country,
                detailed: true,
                note: None,
            },
            Enrichment::SummaryOnly { record, reason } => Self {
                country: record,
                detailed: false,
                note: Some(reason),
            },
        }
    }
}

pub async fn run(options: GetOptions, global: crate::Global) -> Result<()> {
    let code = parse_code(&options.code)?;

    if global.verbose {
        println!("Fetching country: {}", code);
    }

    let mut service = create_service()?;
    let progress = spinner("Loading country...")?;
    let output = get_country_data(&mut service, &code).await;
    progress.finish_and_clear();
    let output = output?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", format_detail_text(&output));
    }

    Ok(())
}

pub fn flag(options: FlagOptions, _global: crate::Global) -> Result<()> {
    let code = parse_code(&options.code)?;
    let service = create_service()?;
    let flags = service.flag_set(&code);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&flags)?);
    } else {
        println!("{}", format_flag_text(&code, &flags));
    }

    Ok(())
}

/// Fetch one country and enrich it from the detail source
pub async fn get_country_data<S: CountrySource>(
    service: &mut CountryService<S>,
    code: &str,
) -> Result<CountryDetailOutput> {
    let enrichment = service.enrich_by_code(code).await?;
    Ok(enrichment.into())
}

fn join_or_na(values: Option<&Vec<String>>) -> String {
    match values {
        Some(values) if !values.is_empty() => values.join(", "),
        _ => "N/A".to_string(),
    }
}

fn format_detail_text(output: &CountryDetailOutput) -> String {
    let country = &output.country;
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n",
        country.name.common.bright_cyan().bold(),
        format!("({})", country.code).bright_black()
    ));
    if country.name.official != country.name.common {
        result.push_str(&format!("{}\n", country.name.official.white()));
    }
    result.push('\n');

    let mut table = new_table();
    table.add_row(prettytable::row!["Region", country.region]);
    if !country.subregion.is_empty() {
        table.add_row(prettytable::row!["Subregion", country.subregion]);
    }
    table.add_row(prettytable::row!["Capital", join_or_na(country.capital.as_ref())]);
    table.add_row(prettytable::row!["Population", format_population(country.population)]);
    table.add_row(prettytable::row!["Area", format_area(country.area)]);

    if let Some(currencies) = country.currencies.as_ref().filter(|c| !c.is_empty()) {
        let listed: Vec<String> = currencies
            .iter()
            .map(|(code, currency)| {
                let name = currency.name.clone().unwrap_or_else(|| code.clone());
                match &currency.symbol {
                    Some(symbol) => format!("{} ({})", name, symbol),
                    None => name,
                }
            })
            .collect();
        table.add_row(prettytable::row!["Currencies", listed.join(", ")]);
    }

    if let Some(languages) = country.languages.as_ref().filter(|l| !l.is_empty()) {
        let listed: Vec<&str> = languages.values().map(String::as_str).collect();
        table.add_row(prettytable::row!["Languages", listed.join(", ")]);
    }

    if let Some([lat, lng]) = country.latlng {
        table.add_row(prettytable::row!["Coordinates", format!("{:.2}, {:.2}", lat, lng)]);
    }

    if let Some(idd) = &country.idd {
        if let Some(root) = &idd.root {
            let suffix = if idd.suffixes.len() == 1 {
                idd.suffixes[0].as_str()
            } else {
                ""
            };
            table.add_row(prettytable::row!["Calling Code", format!("{}{}", root, suffix)]);
        }
    }

    if country.timezones.as_ref().is_some_and(|t| !t.is_empty()) {
        table.add_row(prettytable::row!["Timezones", join_or_na(country.timezones.as_ref())]);
    }
    if country.tld.as_ref().is_some_and(|t| !t.is_empty()) {
        table.add_row(prettytable::row!["Top-level Domain", join_or_na(country.tld.as_ref())]);
    }
    if country.borders.as_ref().is_some_and(|b| !b.is_empty()) {
        table.add_row(prettytable::row!["Borders", join_or_na(country.borders.as_ref())]);
    }

    if let Some(car) = &country.car {
        if let Some(side) = &car.side {
            table.add_row(prettytable::row!["Drives On", side]);
        }
    }

    table.add_row(prettytable::row!["Flag", country.flags.png]);
    result.push_str(&table.to_string());

    if let Some(note) = &output.note {
        result.push_str(&format!(
            "\n{} {}\n",
            "Showing summary data only:".yellow().bold(),
            note.yellow()
        ));
    }

    result
}

fn format_flag_text(code: &str, flags: &FlagSet) -> String {
    let mut table = new_table();
    table.add_row(prettytable::row!["Code", code]);
    table.add_row(prettytable::row!["SVG", flags.svg]);
    table.add_row(prettytable::row!["PNG", flags.png]);
    table.add_row(prettytable::row!["Large PNG", flags.large]);
    table.to_string()
}
