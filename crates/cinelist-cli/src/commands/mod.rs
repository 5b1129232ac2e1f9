pub mod browse;
pub mod catalog;
pub mod config;
pub mod profile;
pub mod prompts;
pub mod reset;
pub mod stats;
pub mod transfer;
pub mod watch;

use crate::output::Output;
use cinelist_config::{Config, PathManager};
use cinelist_core::Library;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets, modifiers, Table};

/// Open the library the configuration describes, surfacing degraded storage as a warning
pub fn open_library(config: &Config, paths: &PathManager, output: &Output) -> Result<Library> {
    let opened = Library::from_config(config, paths).map_err(|e| eyre!("Failed to open library: {}", e))?;
    Ok(output.outcome(opened))
}

pub(crate) fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}
