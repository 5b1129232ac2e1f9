use crate::output::Output;
use cinelist_core::{ExportBundle, Library};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use std::path::Path;

pub fn run_export(library: &Library, file: Option<&Path>, output: &Output) -> Result<()> {
    let bundle = library.export();
    let json = serde_json::to_string_pretty(&bundle)?;

    match file {
        Some(path) => {
            std::fs::write(path, json)
                .wrap_err_with(|| format!("Failed to write export to {}", path.display()))?;
            output.success(format!(
                "Exported {} list entries to {}",
                bundle.watch_state.as_ref().map_or(0, Vec::len),
                path.display()
            ));
        }
        // The bundle itself is the output, whatever the format
        None => println!("{}", json),
    }
    Ok(())
}

pub fn run_import(library: &mut Library, file: &Path, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let bundle = parse_bundle(&content).wrap_err_with(|| format!("{} is not a valid export", file.display()))?;

    let loaded = library.import(&bundle)?;
    output.success(format!("Imported {}: {} list entries loaded", file.display(), loaded));
    Ok(())
}

fn parse_bundle(content: &str) -> Result<ExportBundle> {
    let bundle: ExportBundle = serde_json::from_str(content)?;
    if bundle.profile.is_none() && bundle.content.is_none() && bundle.watch_state.is_none() {
        return Err(eyre!("export contains no profile, content or watch_state"));
    }
    Ok(bundle)
}
