use crate::output::Output;
use crate::CatalogCommands;
use cinelist_core::catalog::ensure_unique_ids;
use cinelist_core::{CatalogProvider, Library, WatchStateError};
use cinelist_models::ContentItem;
use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::Deserialize;
use std::path::Path;

/// A single item or a list of items
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsFile {
    Many(Vec<ContentItem>),
    One(Box<ContentItem>),
}

pub fn run_catalog(library: &Library, cmd: CatalogCommands, output: &Output) -> Result<()> {
    match cmd {
        CatalogCommands::Add { file } => add_from_file(library, &file, output),
        CatalogCommands::Update { file } => {
            let items = read_items(&file)?;
            for updated in update_items(library, items)? {
                output.success(format!("Updated {} '{}'", updated.id, updated.title));
            }
            Ok(())
        }
        CatalogCommands::Delete { id } => {
            if library.catalog().delete_content(id)? {
                output.success(format!("Deleted content {}", id));
                if library.get(id).is_some() {
                    output.warn(format!("Your list entry for {} is kept but no longer shown", id));
                }
            } else {
                output.info(format!("No content with id {}", id));
            }
            Ok(())
        }
    }
}

fn read_items(file: &Path) -> Result<Vec<ContentItem>> {
    let content = std::fs::read_to_string(file).wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    parse_items(&content).wrap_err_with(|| format!("{} does not hold catalog items", file.display()))
}

fn add_from_file(library: &Library, file: &Path, output: &Output) -> Result<()> {
    for item in read_items(file)? {
        let added = library.catalog().add_content(item)?;
        output.success(format!("Added '{}' as {}", added.title, added.id));
    }
    Ok(())
}

/// Replace existing items; nothing is written unless every id is in the catalog
fn update_items(library: &Library, items: Vec<ContentItem>) -> Result<Vec<ContentItem>> {
    ensure_unique_ids(&items)?;
    if let Some(missing) = items
        .iter()
        .find(|item| library.catalog().get_content_by_id(item.id).is_none())
    {
        return Err(WatchStateError::NotFound(missing.id).into());
    }

    let mut updated = Vec::with_capacity(items.len());
    for item in items {
        updated.push(library.catalog().update_content(item)?);
    }
    Ok(updated)
}

fn parse_items(content: &str) -> serde_json::Result<Vec<ContentItem>> {
    Ok(match serde_json::from_str(content)? {
        ItemsFile::Many(items) => items,
        ItemsFile::One(item) => vec![*item],
    })
}
