use crate::prelude::{println, *};
use colored::Colorize;
use explorer_core::country::{DataStats, RegionStats};
use std::collections::BTreeMap;

use super::{create_service, spinner};

#[derive(Debug, clap::Args, Clone)]
pub struct StatsOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct RegionsOptions {
    /// Include the country names of every region
    #[arg(short, long)]
    pub countries: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: StatsOptions, _global: crate::Global) -> Result<()> {
    let mut service = create_service()?;
    let progress = spinner("Loading countries...")?;
    let stats = service.data_stats().await;
    progress.finish_and_clear();
    let stats = stats?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_stats_text(&stats));
    }

    Ok(())
}

pub async fn regions(options: RegionsOptions, _global: crate::Global) -> Result<()> {
    let mut service = create_service()?;
    let progress = spinner("Loading countries...")?;
    let stats = service.regional_stats().await;
    progress.finish_and_clear();
    let stats = stats?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_regions_text(&stats, options.countries));
    }

    Ok(())
}

fn format_stats_text(stats: &DataStats) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n\n",
        stats.total_countries.to_string().bright_cyan().bold(),
        "countries".bright_white()
    ));

    let mut table = new_table();
    table.add_row(prettytable::row!["Region", "Countries"]);
    for (region, count) in &stats.regions {
        let region = if region.is_empty() { "(none)" } else { region };
        table.add_row(prettytable::row![region, count]);
    }
    result.push_str(&table.to_string());

    result.push_str(&format!(
        "\n{}: {}\n{}: {}\n",
        "Source".green(),
        stats.api_source,
        "Updated".green(),
        stats.last_updated.bright_black()
    ));

    result
}

fn format_regions_text(stats: &BTreeMap<String, RegionStats>, with_countries: bool) -> String {
    let mut result = String::new();

    for (region, entry) in stats {
        let region = if region.is_empty() { "(none)" } else { region };
        result.push_str(&format!(
            "\n{} {}\n",
            region.bright_cyan().bold(),
            format!("({})", entry.count).bright_black()
        ));

        if with_countries {
            result.push_str(&format!("  {}\n", entry.countries.join(", ")));
        }
    }

    result
}
