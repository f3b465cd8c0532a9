use crate::prelude::{println, *};
use explorer_core::preferences::{PreferencesUpdate, UserPreferences, PREFERENCES_KEY};

#[derive(Debug, clap::Parser)]
#[command(name = "prefs")]
#[command(about = "Stored user preferences")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print the current preferences
    #[clap(name = "show")]
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update one or more preferences
    #[clap(name = "set")]
    Set {
        /// Default region for `countries list` ("all" for every country)
        #[arg(long)]
        region: Option<String>,
    },
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let store = global.store()?;
    let current = store.get(PREFERENCES_KEY, UserPreferences::default());

    match app.command {
        Commands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&current)?);
            } else {
                println!("region: {}", current.region);
            }
        }
        Commands::Set { region } => {
            let updated = current.merge(PreferencesUpdate { region });
            store
                .try_set(PREFERENCES_KEY, &updated)
                .map_err(|e| Error::Storage(e.to_string()))?;
            println!("region: {}", updated.region);
        }
    }

    Ok(())
}
