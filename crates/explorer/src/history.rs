use crate::prelude::{println, *};
use chrono::{TimeZone, Utc};
use colored::Colorize;
use explorer_core::preferences::{SearchHistoryEntry, SEARCH_HISTORY_KEY};
use explorer_core::storage::KeyValueStore;

#[derive(Debug, clap::Parser)]
#[command(name = "history")]
#[command(about = "Recent country searches")]
pub struct App {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Forget every recorded search
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let store = global.store()?;

    match app.command {
        Some(Commands::Clear) => {
            store
                .remove(SEARCH_HISTORY_KEY)
                .map_err(|e| Error::Storage(e.to_string()))?;
            println!("Search history cleared");
        }
        None => {
            let history = load_history(&store);
            if app.json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                println!("{}", format_history_text(&history));
            }
        }
    }

    Ok(())
}

pub fn load_history(store: &KeyValueStore) -> Vec<SearchHistoryEntry> {
    store.get(SEARCH_HISTORY_KEY, Vec::new())
}

fn format_history_text(history: &[SearchHistoryEntry]) -> String {
    if history.is_empty() {
        return format!("\n{}\n", "No recent searches.".yellow());
    }

    let mut result = String::new();
    for (idx, entry) in history.iter().enumerate() {
        let when = Utc
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        result.push_str(&format!(
            "{} {} {}\n",
            format!("[{}]", idx + 1).yellow().bold(),
            entry.query.white().bold(),
            when.bright_black()
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_history_default_empty() {
        let dir = TempDir::new().unwrap();
        let store = KeyValueStore::new(dir.path());
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_format_history_text() {
        let history = vec![SearchHistoryEntry {
            query: "peru".to_string(),
            timestamp: 1_767_225_600_000,
        }];

        let text = format_history_text(&history);
        assert!(text.contains("[1]"));
        assert!(text.contains("peru"));
        assert!(text.contains("2026-01-01 00:00"));
        assert!(format_history_text(&[]).contains("No recent searches."));
    }
}
