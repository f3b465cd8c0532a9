use crate::prelude::{println, *};
use indicatif::{ProgressBar, ProgressStyle};

pub mod get;
pub mod list;
pub mod service;
pub mod source;
pub mod stats;

pub use service::{CountryService, ServiceOptions};
pub use source::{CountrySource, HttpSource, SourceConfig};

#[derive(Debug, clap::Parser)]
#[command(name = "countries")]
#[command(about = "Browse, search and inspect countries")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List countries, optionally restricted to a region
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Search countries by name, region or subregion
    #[clap(name = "search")]
    Search(list::SearchOptions),

    /// List the countries of one region and remember it as the default
    #[clap(name = "region")]
    Region(list::RegionOptions),

    /// Show the full details of one country
    #[clap(name = "get")]
    Get(get::GetOptions),

    /// Print the flag image locators of one country
    #[clap(name = "flag")]
    Flag(get::FlagOptions),

    /// Collection-level statistics
    #[clap(name = "stats")]
    Stats(stats::StatsOptions),

    /// Per-region breakdown
    #[clap(name = "regions")]
    Regions(stats::RegionsOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        let config = SourceConfig::from_env();
        println!("Summary source: {}", config.summary_url);
        println!("Detail source: {}", config.detail_url);
        println!("Flag source: {}", config.flag_url);
        println!();
    }

    match app.command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Search(options) => list::search(options, global).await,
        Commands::Region(options) => list::region(options, global).await,
        Commands::Get(options) => get::run(options, global).await,
        Commands::Flag(options) => get::flag(options, global),
        Commands::Stats(options) => stats::run(options, global).await,
        Commands::Regions(options) => stats::regions(options, global).await,
    }
}

/// Build a service over the HTTP sources configured in the environment
pub fn create_service() -> Result<CountryService<HttpSource>> {
    let config = SourceConfig::from_env();
    let options = ServiceOptions::from_config(&config);
    let source = HttpSource::new(config)?;

    Ok(CountryService::new(source, options))
}

/// Spinner shown while the collection is being acquired
pub fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("Invalid spinner template: {}", e))?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(message);

    Ok(spinner)
}

/// Validate and normalize a country code typed by the user
pub fn parse_code(input: &str) -> Result<String> {
    let code = input.trim();
    if !explorer_core::validation::is_valid_country_code(code) {
        return Err(Error::InvalidCode(code.to_string()).into());
    }

    Ok(code.to_uppercase())
}
