use super::styled_table;
use crate::output::Output;
use crate::ProfileCommands;
use cinelist_core::Library;
use cinelist_models::Profile;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};

pub fn run_profile(library: &Library, cmd: ProfileCommands, output: &Output) -> Result<()> {
    match cmd {
        ProfileCommands::Show => show_profile(&library.profile(), output),
        ProfileCommands::Set {
            name,
            avatar,
            language,
            autoplay,
            notifications,
            favorite_genres,
        } => {
            if name.is_none()
                && avatar.is_none()
                && language.is_none()
                && autoplay.is_none()
                && notifications.is_none()
                && favorite_genres.is_empty()
            {
                output.warn("Nothing to change. Use --name, --avatar, --language, --autoplay, --notifications or --favorite-genre");
                return Ok(());
            }

            let profile = output.outcome(library.update_profile(|profile| {
                if let Some(name) = name {
                    profile.name = name;
                }
                if let Some(avatar) = avatar {
                    profile.avatar = avatar;
                }
                if let Some(language) = language {
                    profile.preferences.preferred_language = language;
                }
                if let Some(autoplay) = autoplay {
                    profile.preferences.autoplay = autoplay;
                }
                if let Some(notifications) = notifications {
                    profile.preferences.notifications = notifications;
                }
                if !favorite_genres.is_empty() {
                    profile.preferences.favorite_genres = favorite_genres;
                }
            }));
            output.success("Profile updated");
            show_profile(&profile, output)
        }
    }
}

fn show_profile(profile: &Profile, output: &Output) -> Result<()> {
    if !output.is_human() {
        return output.data(profile);
    }
    if output.is_quiet() {
        return Ok(());
    }

    let on_off = |value: bool| if value { "on" } else { "off" };
    let prefs = &profile.preferences;

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(format!("{} {}", profile.avatar, profile.name))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Favourite genres"), Cell::new(prefs.favorite_genres.join(", "))]);
    table.add_row(vec![Cell::new("Language"), Cell::new(&prefs.preferred_language)]);
    table.add_row(vec![Cell::new("Autoplay"), Cell::new(on_off(prefs.autoplay))]);
    table.add_row(vec![Cell::new("Notifications"), Cell::new(on_off(prefs.notifications))]);
    println!("{}", table);
    Ok(())
}
