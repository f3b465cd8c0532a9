use crate::prelude::{println, *};
use chrono::{DateTime, Utc};
use colored::Colorize;
use explorer_core::storage::KeyValueStore;
use explorer_core::validation::format_population;
use explorer_core::wishlist::{
    export_file_name, parse_export, Wishlist, WishlistEntry, WishlistStats, WISHLIST_KEY,
};
use std::path::{Path, PathBuf};

use crate::countries::{create_service, parse_code, spinner, CountryService, CountrySource};

#[derive(Debug, clap::Parser)]
#[command(name = "wishlist")]
#[command(about = "Countries you want to visit")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Add a country to the wishlist
    #[clap(name = "add")]
    Add(CodeOptions),

    /// Remove a country from the wishlist
    #[clap(name = "remove")]
    Remove(CodeOptions),

    /// List wishlist countries, most recently added first
    #[clap(name = "list")]
    List(JsonOptions),

    /// Remove every country from the wishlist
    #[clap(name = "clear")]
    Clear,

    /// Write the wishlist to a JSON file
    #[clap(name = "export")]
    Export(ExportOptions),

    /// Merge countries from an exported wishlist file
    #[clap(name = "import")]
    Import(ImportOptions),

    /// Wishlist statistics
    #[clap(name = "stats")]
    Stats(JsonOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct CodeOptions {
    /// Two or three letter country code
    #[arg(value_name = "CODE")]
    pub code: String,
}

#[derive(Debug, clap::Args, Clone)]
pub struct JsonOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ExportOptions {
    /// Destination file; defaults to world-explorer-wishlist-<date>.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ImportOptions {
    /// File previously written by `wishlist export`
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let store = global.store()?;

    if global.verbose {
        println!("Data directory: {}", store.root().display());
        println!();
    }

    match app.command {
        Commands::Add(options) => add(options, &store).await,
        Commands::Remove(options) => remove(options, &store),
        Commands::List(options) => list(options, &store),
        Commands::Clear => clear(&store),
        Commands::Export(options) => export(options, &store),
        Commands::Import(options) => import(options, &store),
        Commands::Stats(options) => stats(options, &store),
    }
}

/// Read the stored wishlist
///
/// A missing entry is an empty wishlist. An unreadable one is an error, so
/// the next save never replaces it.
pub fn load_wishlist(store: &KeyValueStore) -> Result<Wishlist> {
    let entries = store
        .try_get::<Vec<WishlistEntry>>(WISHLIST_KEY)
        .map_err(|e| Error::Storage(format!("Could not read the stored wishlist: {}", e)))?
        .unwrap_or_default();

    Ok(Wishlist::from_entries(entries))
}

pub fn save_wishlist(store: &KeyValueStore, wishlist: &Wishlist) -> Result<()> {
    store
        .try_set(WISHLIST_KEY, &wishlist.raw_entries())
        .map_err(|e| Error::Storage(e.to_string()))?;
    Ok(())
}

async fn add(options: CodeOptions, store: &KeyValueStore) -> Result<()> {
    let code = parse_code(&options.code)?;

    let mut service = create_service()?;
    let progress = spinner("Loading country...")?;
    let added = add_country_data(&mut service, store, &code, Utc::now()).await;
    progress.finish_and_clear();

    match added? {
        Some(name) => println!("{} {}", "Added to wishlist:".green(), name.bold()),
        None => println!("{} is already in the wishlist", code.yellow()),
    }

    Ok(())
}

/// Snapshot a country into the wishlist
///
/// Returns the common name of the country when it was added, `None` if it was
/// already present.
pub async fn add_country_data<S: CountrySource>(
    service: &mut CountryService<S>,
    store: &KeyValueStore,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    let mut wishlist = load_wishlist(store)?;
    if wishlist.contains(code) {
        return Ok(None);
    }

    let record = service.get_by_code(code).await?;
    wishlist.add(&record, now);
    save_wishlist(store, &wishlist)?;

    Ok(Some(record.name.common))
}

fn remove(options: CodeOptions, store: &KeyValueStore) -> Result<()> {
    let code = parse_code(&options.code)?;
    let mut wishlist = load_wishlist(store)?;

    if wishlist.remove(&code) {
        save_wishlist(store, &wishlist)?;
        println!("{} {}", "Removed from wishlist:".green(), code.bold());
    } else {
        println!("{} is not in the wishlist", code.yellow());
    }

    Ok(())
}

fn list(options: JsonOptions, store: &KeyValueStore) -> Result<()> {
    let entries = load_wishlist(store)?.entries();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", format_entries_text(&entries));
    }

    Ok(())
}

fn clear(store: &KeyValueStore) -> Result<()> {
    let mut wishlist = load_wishlist(store)?;
    let count = wishlist.count();
    wishlist.clear();
    save_wishlist(store, &wishlist)?;

    println!("Removed {} countries from the wishlist", count);
    Ok(())
}

fn export(options: ExportOptions, store: &KeyValueStore) -> Result<()> {
    let now = Utc::now();
    let path = options
        .output
        .unwrap_or_else(|| PathBuf::from(export_file_name(now)));

    let count = export_to_file(store, &path, now)?;
    println!(
        "Exported {} countries to {}",
        count,
        path.display().to_string().cyan()
    );
    Ok(())
}

/// Write the wishlist export document to `path`; returns the number of countries
pub fn export_to_file(store: &KeyValueStore, path: &Path, now: DateTime<Utc>) -> Result<usize> {
    let document = load_wishlist(store)?.export(now);
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(document.countries.len())
}

fn import(options: ImportOptions, store: &KeyValueStore) -> Result<()> {
    let count = import_from_file(store, &options.file)?;
    println!("Imported {} countries", count);
    Ok(())
}

/// Merge an export document into the stored wishlist
///
/// Returns the number of countries in the document, including ones already
/// present.
pub fn import_from_file(store: &KeyValueStore, path: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = parse_export(&raw)?;

    let mut wishlist = load_wishlist(store)?;
    let count = wishlist.import(document);
    save_wishlist(store, &wishlist)?;

    Ok(count)
}

fn stats(options: JsonOptions, store: &KeyValueStore) -> Result<()> {
    let stats = load_wishlist(store)?.stats();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_stats_text(&stats));
    }

    Ok(())
}

fn format_entries_text(entries: &[WishlistEntry]) -> String {
    if entries.is_empty() {
        return format!("\n{}\n", "Your wishlist is empty.".yellow());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Code", "Name", "Region", "Population", "Added"]);
    for entry in entries {
        table.add_row(prettytable::row![
            entry.code,
            entry.name.common,
            entry.region.clone().unwrap_or_default(),
            format_population(entry.population),
            entry.added_at.format("%Y-%m-%d %H:%M")
        ]);
    }

    format!("\n{}", table)
}

fn format_stats_text(stats: &WishlistStats) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n",
        stats.total_countries.to_string().bright_cyan().bold(),
        "countries in wishlist".bright_white()
    ));

    for (region, count) in &stats.regions {
        result.push_str(&format!("  {}: {}\n", region.green(), count));
    }

    if let Some(entry) = &stats.most_recently_added {
        result.push_str(&format!(
            "{}: {}\n",
            "Most recently added".green(),
            entry.name.common
        ));
    }
    if let Some(entry) = &stats.oldest_added {
        result.push_str(&format!("{}: {}\n", "Oldest".green(), entry.name.common));
    }

    result
}
