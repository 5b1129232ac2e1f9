use super::prompts;
use crate::output::Output;
use cinelist_core::Library;
use color_eyre::Result;

pub fn run_reset(library: &mut Library, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        let confirmed = prompts::prompt_yes_no(
            "This clears your list and profile and restores the demo catalog. Continue?",
            false,
        )?;
        if !confirmed {
            output.info("Reset cancelled");
            return Ok(());
        }
    }

    output.outcome(library.reset_demo_data());
    output.success(format!(
        "Demo data restored: {} catalog items, empty list",
        library.statistics().total_content
    ));
    Ok(())
}
