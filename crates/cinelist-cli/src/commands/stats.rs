use super::browse::format_minutes;
use super::styled_table;
use crate::output::Output;
use cinelist_core::{Library, Statistics};
use cinelist_models::WatchStatus;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

pub fn run_stats(library: &Library, output: &Output) -> Result<()> {
    let stats = library.statistics();

    if !output.is_human() {
        return output.data(&stats);
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Your statistics".bright_cyan().bold());

    let mut summary = styled_table();
    summary.set_header(vec![
        Cell::new("Overview").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (label, value) in summary_rows(&stats) {
        summary.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{}", summary);

    for (title, counts) in [("Platforms", &stats.platforms), ("Genres", &stats.genres)] {
        if counts.is_empty() {
            continue;
        }
        println!("{}", breakdown_table(title, counts));
    }

    let dangling = library.dangling_entries();
    if !dangling.is_empty() {
        output.warn(format!(
            "{} list entr{} point to content no longer in the catalog and are not counted",
            dangling.len(),
            if dangling.len() == 1 { "y" } else { "ies" }
        ));
    }
    Ok(())
}

fn summary_rows(stats: &Statistics) -> Vec<(&'static str, String)> {
    vec![
        ("Catalog", stats.total_content.to_string()),
        ("Watched", format!("{} ({}%)", stats.total_watched, stats.completion_rate)),
        ("Movies watched", format!("{}/{}", stats.movies.watched, stats.movies.total)),
        ("Series watched", format!("{}/{}", stats.series.watched, stats.series.total)),
        ("On your list", stats.in_list.to_string()),
        ("Pending", stats.status_count(WatchStatus::Pending).to_string()),
        ("Watching", stats.status_count(WatchStatus::Watching).to_string()),
        ("Completed", stats.status_count(WatchStatus::Completed).to_string()),
        ("Watch time", format_minutes(stats.watch_time_minutes)),
        (
            "Favourite genre",
            stats.favorite_genre.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Average rating",
            stats
                .average_user_rating
                .map(|r| format!("{:.1}/5", r))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]
}

/// Counts sorted by count descending, then name
fn breakdown_table(title: &str, counts: &BTreeMap<String, usize>) -> comfy_table::Table {
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Watched"),
    ]);
    for (name, count) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }
    table
}
