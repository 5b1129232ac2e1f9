// Filtering and sorting of the catalog joined with watch state

use cinelist_models::{ContentId, ContentItem, ContentType, WatchEntry, WatchStatus};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A catalog item with its watch entry, if any
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogView {
    pub item: ContentItem,
    pub entry: Option<WatchEntry>,
}

impl CatalogView {
    /// Items without an entry count as pending
    pub fn effective_status(&self) -> WatchStatus {
        self.entry.as_ref().map(|e| e.status).unwrap_or(WatchStatus::Pending)
    }

    pub fn is_listed(&self) -> bool {
        self.entry.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest rating first
    Rating,
    /// Newest first
    Year,
    /// Alphabetical
    Title,
    /// Most recently changed first, never-listed items last
    WatchedDate,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Rating => "rating",
            SortKey::Year => "year",
            SortKey::Title => "title",
            SortKey::WatchedDate => "watched_date",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "year" => Ok(SortKey::Year),
            "title" => Ok(SortKey::Title),
            "watched_date" | "watcheddate" | "watched-date" | "date" => Ok(SortKey::WatchedDate),
            other => Err(format!(
                "Invalid sort key: {}. Use 'rating', 'year', 'title' or 'watched_date'",
                other
            )),
        }
    }
}

/// Filter specification; `None` means no constraint on that field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub search: Option<String>,
    pub content_type: Option<ContentType>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub status: Option<WatchStatus>,
    pub sort_by: Option<SortKey>,
    /// Only items that have a watch entry
    pub listed_only: bool,
}

/// Unparsed filter fields as they arrive from the UI
#[derive(Debug, Clone, Default)]
pub struct RawFilter<'a> {
    pub search: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub platform: Option<&'a str>,
    pub status: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub listed_only: bool,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl FilterSpec {
    /// Build a spec from UI strings. Empty strings mean no constraint;
    /// `resolve_status` maps status words, aliases included, to a status.
    pub fn from_raw<F>(raw: &RawFilter<'_>, resolve_status: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<WatchStatus>,
    {
        let status = match non_empty(raw.status) {
            Some(value) => Some(resolve_status(value).ok_or_else(|| {
                format!("Invalid status: {}. Use 'pending', 'watching' or 'completed'", value)
            })?),
            None => None,
        };

        Ok(Self {
            search: non_empty(raw.search).map(str::to_string),
            content_type: non_empty(raw.content_type)
                .map(|v| v.parse::<ContentType>())
                .transpose()?,
            genre: non_empty(raw.genre).map(str::to_string),
            platform: non_empty(raw.platform).map(str::to_string),
            status,
            sort_by: non_empty(raw.sort_by).map(|v| v.parse::<SortKey>()).transpose()?,
            listed_only: raw.listed_only,
        })
    }

    pub fn matches(&self, view: &CatalogView) -> bool {
        let item = &view.item;

        if self.listed_only && !view.is_listed() {
            return false;
        }

        if let Some(content_type) = self.content_type {
            if item.content_type() != content_type {
                return false;
            }
        }

        if let Some(genre) = non_empty(self.genre.as_deref()) {
            if item.genre != genre {
                return false;
            }
        }

        if let Some(platform) = non_empty(self.platform.as_deref()) {
            if item.platform != platform {
                return false;
            }
        }

        if let Some(status) = self.status {
            if view.effective_status() != status {
                return false;
            }
        }

        if let Some(search) = non_empty(self.search.as_deref()) {
            let needle = search.to_lowercase();
            if !item.title.to_lowercase().contains(&needle)
                && !item.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }
}

/// Left join of the catalog with the watch entries, in catalog order.
///
/// Entries whose content is not in the catalog are left out; see
/// [`dangling_entries`].
pub fn join(catalog: &[ContentItem], entries: &[WatchEntry]) -> Vec<CatalogView> {
    let by_id: BTreeMap<ContentId, &WatchEntry> = entries.iter().map(|e| (e.content_id, e)).collect();
    catalog
        .iter()
        .map(|item| CatalogView {
            item: item.clone(),
            entry: by_id.get(&item.id).map(|e| (*e).clone()),
        })
        .collect()
}

/// Entries that reference content missing from the catalog
pub fn dangling_entries(catalog: &[ContentItem], entries: &[WatchEntry]) -> Vec<WatchEntry> {
    let known: HashSet<ContentId> = catalog.iter().map(|item| item.id).collect();
    entries
        .iter()
        .filter(|e| !known.contains(&e.content_id))
        .cloned()
        .collect()
}

/// Accents and case removed: "Élite" folds to "elite"
fn title_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Title order: accent- and case-folded first, raw text as the tie-break.
///
/// Folding covers letters that decompose into a base letter plus marks; it is
/// not a full locale collation (no per-language rules such as "ll" in Spanish).
fn compare_titles(a: &str, b: &str) -> Ordering {
    title_key(a).cmp(&title_key(b)).then_with(|| a.cmp(b))
}

/// Stable sort by `key`
pub fn sort_views(views: &mut [CatalogView], key: SortKey) {
    match key {
        SortKey::Rating => views.sort_by(|a, b| b.item.rating.total_cmp(&a.item.rating)),
        SortKey::Year => views.sort_by(|a, b| b.item.year.cmp(&a.item.year)),
        SortKey::Title => views.sort_by(|a, b| compare_titles(&a.item.title, &b.item.title)),
        SortKey::WatchedDate => views.sort_by(|a, b| {
            let a_date = a.entry.as_ref().map(|e| e.last_changed_at);
            let b_date = b.entry.as_ref().map(|e| e.last_changed_at);
            match (a_date, b_date) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

/// Filter then sort; without a sort key the catalog order is kept
pub fn query(catalog: &[ContentItem], entries: &[WatchEntry], filter: &FilterSpec) -> Vec<CatalogView> {
    let mut views: Vec<CatalogView> = join(catalog, entries)
        .into_iter()
        .filter(|view| filter.matches(view))
        .collect();

    if let Some(key) = filter.sort_by {
        sort_views(&mut views, key);
    }

    debug!(
        "query: catalog_count={}, entry_count={}, result_count={}",
        catalog.len(),
        entries.len(),
        views.len()
    );
    views
}
