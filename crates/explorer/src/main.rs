use crate::prelude::*;
use clap::Parser;
use explorer_core::storage::KeyValueStore;
use std::path::PathBuf;

mod countries;
mod error;
mod history;
mod prefs;
mod prelude;
mod wishlist;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Explore the countries of the world from the command line"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Directory holding the wishlist, search history and preferences
    #[clap(long, env = "EXPLORER_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "EXPLORER_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Key-value store rooted at the data directory
    pub fn store(&self) -> Result<KeyValueStore> {
        let root = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs_next::config_dir()
                .ok_or_eyre("Could not determine the configuration directory")?
                .join("world-explorer"),
        };

        Ok(KeyValueStore::new(root))
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Browse, search and inspect countries
    Countries(crate::countries::App),

    /// Countries you want to visit
    Wishlist(crate::wishlist::App),

    /// Recent country searches
    History(crate::history::App),

    /// Stored user preferences
    Prefs(crate::prefs::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Countries(sub_app) => crate::countries::run(sub_app, app.global).await,
        SubCommands::Wishlist(sub_app) => crate::wishlist::run(sub_app, app.global).await,
        SubCommands::History(sub_app) => crate::history::run(sub_app, app.global).await,
        SubCommands::Prefs(sub_app) => crate::prefs::run(sub_app, app.global).await,
    }
}
