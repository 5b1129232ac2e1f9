use super::prompts;
use super::styled_table;
use crate::output::Output;
use crate::ConfigCommands;
use cinelist_config::{Config, PathManager, StorageBackend};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use serde_json::json;
use std::path::Path;

pub fn run_config(
    cmd: ConfigCommands,
    config: &Config,
    config_path: &Path,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config, config_path, paths, output),
        ConfigCommands::Init { force } => init_config(config_path, force, output),
    }
}

fn show_config(config: &Config, config_path: &Path, paths: &PathManager, output: &Output) -> Result<()> {
    let storage_dir = config.storage_dir(paths.storage_dir());
    let valid = config.validate();

    if !output.is_human() {
        return output.data(&json!({
            "config_file": config_path,
            "exists": config_path.exists(),
            "valid": valid.is_ok(),
            "error": valid.as_ref().err().map(|e| e.to_string()),
            "storage_dir": storage_dir,
            "config": config,
        }));
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_path.exists() {
        output.warn(format!(
            "No configuration file at {}, showing defaults. Run 'cinelist config init' to create one.",
            config_path.display()
        ));
    }

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Configuration").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(config_path.display()),
    ]);

    let backend = match config.storage.backend {
        StorageBackend::File => format!("file ({})", storage_dir.display()),
        StorageBackend::Memory => match config.storage.quota_bytes {
            Some(quota) => format!("memory (quota {} bytes)", quota),
            None => "memory".to_string(),
        },
    };
    table.add_row(vec![Cell::new("Storage"), Cell::new(backend)]);
    table.add_row(vec![
        Cell::new("Catalog seed"),
        Cell::new(
            config
                .catalog
                .seed_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in demo catalog".to_string()),
        ),
    ]);

    let mut aliases: Vec<String> = config
        .status_aliases
        .to_canonical
        .iter()
        .map(|(alias, status)| format!("{} → {}", alias, status))
        .collect();
    aliases.sort();
    table.add_row(vec![
        Cell::new("Status aliases"),
        Cell::new(if aliases.is_empty() { "-".to_string() } else { aliases.join("\n") }),
    ]);

    let log_target = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());
    table.add_row(vec![
        Cell::new("Logging"),
        Cell::new(format!(
            "{} to {}{}",
            config.logging.level,
            log_target,
            if config.logging.json { " (json)" } else { "" }
        )),
    ]);
    println!("{}", table);

    match valid {
        Ok(()) => output.success("Configuration is valid"),
        Err(e) => output.warn(format!("Configuration is invalid: {}", e)),
    }
    Ok(())
}

fn init_config(config_path: &Path, force: bool, output: &Output) -> Result<()> {
    if config_path.exists() && !force {
        let overwrite = prompts::prompt_yes_no(
            &format!("{} already exists. Overwrite with defaults?", config_path.display()),
            false,
        )?;
        if !overwrite {
            output.info("Keeping existing configuration");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(config_path)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_path.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_path.display()));
    Ok(())
}
