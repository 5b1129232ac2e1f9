use clap::{ArgAction, Parser, Subcommand};
use cinelist_config::{Config, PathManager};
use cinelist_core::{Library, RawFilter};
use cinelist_models::ContentId;
use color_eyre::eyre::eyre;
use commands::{browse, catalog, config, profile, reset, stats, transfer, watch};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinelist")]
#[command(about = "cinelist - Keep track of the movies and series you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Configuration file (defaults to config.toml in the config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog with your watch status
    #[command(long_about = "List catalog items joined with their watch status. Filters combine; empty values mean no constraint. Items you never added count as pending.")]
    Browse {
        /// Case-insensitive text searched in titles and descriptions
        #[arg(long)]
        search: Option<String>,

        /// movie or series
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<String>,

        /// Exact genre name
        #[arg(long)]
        genre: Option<String>,

        /// Exact platform name
        #[arg(long)]
        platform: Option<String>,

        /// pending, watching or completed (aliases accepted)
        #[arg(long)]
        status: Option<String>,

        /// rating, year, title or watched_date
        #[arg(long)]
        sort: Option<String>,

        /// Only items on your list
        #[arg(long, action = ArgAction::SetTrue)]
        mine: bool,
    },
    /// Show one catalog item with its watch entry
    Show {
        id: ContentId,
    },
    /// Set the watch status of an item
    #[command(long_about = "Create or update the watch entry for an item. Accepts pending, watching, completed and their aliases (watchlist, unwatched, watched, plus any configured in [status_aliases]).")]
    Status {
        id: ContentId,
        status: String,
    },
    /// Remove an item from your list
    Remove {
        id: ContentId,
    },
    /// Rate an item from 1 to 5 (marks it completed)
    Rate {
        id: ContentId,
        rating: u8,
    },
    /// Show watch statistics
    Stats,
    /// View or edit the profile
    Profile {
        #[command(subcommand)]
        cmd: Option<ProfileCommands>,
    },
    /// Restore the demo catalog and clear your list
    #[command(long_about = "Clear every stored key, then re-seed the default profile, the demo catalog and an empty watch list.")]
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Export profile, catalog and watch state as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Import a JSON export
    Import {
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Maintain the stored catalog
    Catalog {
        #[command(subcommand)]
        cmd: CatalogCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile
    Show,
    /// Change profile fields
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        avatar: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        autoplay: Option<bool>,

        #[arg(long)]
        notifications: Option<bool>,

        /// Replace favourite genres (repeatable)
        #[arg(long = "favorite-genre", value_name = "GENRE")]
        favorite_genres: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Add items from a JSON file (one item or an array); ids are assigned
    Add {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Replace items from a JSON file (one item or an array), matched by id
    Update {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Delete an item; its watch entry is kept
    Delete {
        id: ContentId,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());

    let config = Config::load_or_default(&config_path)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_path.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Config { cmd } => {
            config::run_config(cmd.unwrap_or(ConfigCommands::Show), &config, &config_path, &paths, &output)
        }
        command => {
            config
                .validate()
                .map_err(|e| eyre!("Invalid configuration in {}: {}", config_path.display(), e))?;
            let mut library = commands::open_library(&config, &paths, &output)?;
            run_library_command(command, &mut library, &output)
        }
    }
}

fn run_library_command(command: Commands, library: &mut Library, output: &output::Output) -> color_eyre::Result<()> {
    match command {
        Commands::Browse {
            search,
            content_type,
            genre,
            platform,
            status,
            sort,
            mine,
        } => {
            let raw = RawFilter {
                search: search.as_deref(),
                content_type: content_type.as_deref(),
                genre: genre.as_deref(),
                platform: platform.as_deref(),
                status: status.as_deref(),
                sort_by: sort.as_deref(),
                listed_only: mine,
            };
            browse::run_browse(library, &raw, output)
        }
        Commands::Show { id } => browse::run_show(library, id, output),
        Commands::Status { id, status } => watch::run_status(library, id, &status, output),
        Commands::Remove { id } => watch::run_remove(library, id, output),
        Commands::Rate { id, rating } => watch::run_rate(library, id, rating, output),
        Commands::Stats => stats::run_stats(library, output),
        Commands::Profile { cmd } => profile::run_profile(library, cmd.unwrap_or(ProfileCommands::Show), output),
        Commands::Reset { yes } => reset::run_reset(library, yes, output),
        Commands::Export { file } => transfer::run_export(library, file.as_deref(), output),
        Commands::Import { file } => transfer::run_import(library, &file, output),
        Commands::Catalog { cmd } => catalog::run_catalog(library, cmd, output),
        Commands::Config { .. } => unreachable!("config commands run without a library"),
    }
}
