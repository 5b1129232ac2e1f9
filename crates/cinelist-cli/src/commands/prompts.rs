use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Confirm;

/// Prompt for yes/no with a default answer
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}
