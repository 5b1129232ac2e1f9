use crate::output::Output;
use cinelist_core::Library;
use cinelist_models::ContentId;
use color_eyre::Result;
use tracing::debug;

/// Title for messages; dangling entries fall back to the bare id
fn describe(library: &Library, id: ContentId) -> String {
    library
        .content(id)
        .map(|view| format!("'{}'", view.item.title))
        .unwrap_or_else(|_| format!("#{}", id))
}

pub fn run_status(library: &mut Library, id: ContentId, status: &str, output: &Output) -> Result<()> {
    let entry = output.outcome(library.set_status(id, status)?);
    debug!("Status of {} is now {}", id, entry.status);

    output.success(format!("{} marked {}", describe(library, id), entry.status));
    output.data(&entry)
}

pub fn run_remove(library: &mut Library, id: ContentId, output: &Output) -> Result<()> {
    let name = describe(library, id);
    if output.outcome(library.remove(id)) {
        output.success(format!("Removed {} from your list", name));
    } else {
        output.info(format!("{} was not on your list", name));
    }
    Ok(())
}

pub fn run_rate(library: &mut Library, id: ContentId, rating: u8, output: &Output) -> Result<()> {
    let entry = output.outcome(library.rate(id, rating)?);

    output.success(format!(
        "Rated {} {}/5 ({})",
        describe(library, id),
        rating,
        entry.status
    ));
    output.data(&entry)
}
