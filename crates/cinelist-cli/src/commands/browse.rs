use super::styled_table;
use crate::output::Output;
use cinelist_core::{CatalogView, Library, RawFilter};
use cinelist_models::{ContentId, MAX_USER_RATING, WatchStatus};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};

pub fn run_browse(library: &Library, raw: &RawFilter<'_>, output: &Output) -> Result<()> {
    let views = library.query_raw(raw)?;

    if !output.is_human() {
        return output.data(&views);
    }
    if output.is_quiet() {
        return Ok(());
    }
    if views.is_empty() {
        output.info("Nothing matches these filters");
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(
        ["ID", "Title", "Type", "Year", "Genre", "Platform", "Rating", "Status", "Yours"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for view in &views {
        let item = &view.item;
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.title),
            Cell::new(item.content_type()),
            Cell::new(item.year),
            Cell::new(&item.genre),
            Cell::new(&item.platform),
            Cell::new(format!("{:.1}", item.rating)),
            status_cell(view),
            Cell::new(stars(view.entry.as_ref().and_then(|e| e.user_rating))),
        ]);
    }
    println!("{}", table);
    output.info(format!("{} item(s)", views.len()));
    Ok(())
}

pub fn run_show(library: &Library, id: ContentId, output: &Output) -> Result<()> {
    let view = library.content(id)?;

    if !output.is_human() {
        return output.data(&view);
    }
    if output.is_quiet() {
        return Ok(());
    }

    let item = &view.item;
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(&item.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(format!("{} ({})", item.content_type(), item.year)),
    ]);
    table.add_row(vec![Cell::new("Genre"), Cell::new(&item.genre)]);
    table.add_row(vec![Cell::new("Platform"), Cell::new(&item.platform)]);
    table.add_row(vec![Cell::new("Rating"), Cell::new(format!("{:.1}/10", item.rating))]);
    table.add_row(vec![Cell::new("Runtime"), Cell::new(format_minutes(item.runtime_minutes()))]);
    table.add_row(vec![Cell::new("Status"), status_cell(&view)]);
    if let Some(ref entry) = view.entry {
        table.add_row(vec![
            Cell::new("Last changed"),
            Cell::new(entry.last_changed_at.format("%Y-%m-%d %H:%M UTC")),
        ]);
        table.add_row(vec![Cell::new("Your rating"), Cell::new(stars(entry.user_rating))]);
    }
    if !item.description.is_empty() {
        table.add_row(vec![Cell::new("Description"), Cell::new(&item.description)]);
    }
    println!("{}", table);
    Ok(())
}

fn status_cell(view: &CatalogView) -> Cell {
    if !view.is_listed() {
        return Cell::new("-").fg(Color::DarkGrey);
    }
    let status = view.effective_status();
    let color = match status {
        WatchStatus::Pending => Color::Yellow,
        WatchStatus::Watching => Color::Blue,
        WatchStatus::Completed => Color::Green,
    };
    Cell::new(status).fg(color)
}

pub(crate) fn stars(rating: Option<u8>) -> String {
    match rating {
        Some(r) => {
            let filled = r.min(MAX_USER_RATING) as usize;
            format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_USER_RATING as usize - filled))
        }
        None => String::new(),
    }
}

pub(crate) fn format_minutes(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(None), "");
        assert_eq!(stars(Some(3)), "★★★☆☆");
        assert_eq!(stars(Some(5)), "★★★★★");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(148), "2h 28m");
    }
}
