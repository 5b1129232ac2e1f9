use crate::query::join;
use cinelist_models::{ContentItem, ContentType, WatchEntry, WatchStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TypeStats {
    pub total: usize,
    pub watched: usize,
}

/// Summary of the catalog against the watch entries.
///
/// "Watched" means a catalog item with a `completed` entry. Entries whose
/// content is missing from the catalog are not counted anywhere.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Statistics {
    pub total_content: usize,
    pub total_watched: usize,
    /// Catalog items with an entry in any status
    pub in_list: usize,
    pub by_status: BTreeMap<WatchStatus, usize>,
    pub movies: TypeStats,
    pub series: TypeStats,
    /// Percentage of the catalog watched, 0-100
    pub completion_rate: u32,
    pub platforms: BTreeMap<String, usize>,
    pub genres: BTreeMap<String, usize>,
    pub favorite_genre: Option<String>,
    pub watch_time_minutes: u64,
    pub average_user_rating: Option<f64>,
}

pub fn completion_rate(watched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (100.0 * watched as f64 / total as f64).round() as u32;
    rate.min(100)
}

impl Statistics {
    pub fn compute(catalog: &[ContentItem], entries: &[WatchEntry]) -> Self {
        let mut stats = Statistics {
            total_content: catalog.len(),
            ..Statistics::default()
        };
        let mut rating_sum = 0u64;
        let mut rated = 0u64;

        for view in join(catalog, entries) {
            let type_stats = match view.item.content_type() {
                ContentType::Movie => &mut stats.movies,
                ContentType::Series => &mut stats.series,
            };
            type_stats.total += 1;

            let Some(entry) = view.entry else {
                continue;
            };
            stats.in_list += 1;
            *stats.by_status.entry(entry.status).or_insert(0) += 1;

            if let Some(rating) = entry.user_rating {
                rating_sum += u64::from(rating);
                rated += 1;
            }

            if !entry.is_completed() {
                continue;
            }
            type_stats.watched += 1;
            stats.total_watched += 1;
            *stats.platforms.entry(view.item.platform.clone()).or_insert(0) += 1;
            *stats.genres.entry(view.item.genre.clone()).or_insert(0) += 1;
            stats.watch_time_minutes = stats.watch_time_minutes.saturating_add(view.item.runtime_minutes());
        }

        stats.completion_rate = completion_rate(stats.total_watched, stats.total_content);
        // Highest count wins; BTreeMap order breaks ties alphabetically
        stats.favorite_genre = stats
            .genres
            .iter()
            .fold(None::<(&String, usize)>, |best, (genre, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((genre, count)),
            })
            .map(|(genre, _)| genre.clone());
        if rated > 0 {
            stats.average_user_rating = Some(rating_sum as f64 / rated as f64);
        }

        stats
    }

    pub fn status_count(&self, status: WatchStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn watch_time_hours(&self) -> f64 {
        self.watch_time_minutes as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_catalog;
    use chrono::Utc;
    use cinelist_models::ContentId;

    fn entry(id: u64, status: WatchStatus, rating: Option<u8>) -> WatchEntry {
        WatchEntry {
            content_id: ContentId(id),
            status,
            last_changed_at: Utc::now(),
            user_rating: rating,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let stats = Statistics::compute(&[], &[entry(1, WatchStatus::Completed, None)]);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.total_watched, 0);
        assert!(stats.genres.is_empty());
        assert_eq!(stats.favorite_genre, None);
    }

    #[test]
    fn test_counts_only_completed_catalog_items() {
        let entries = vec![
            entry(3, WatchStatus::Completed, Some(5)),  // Inception, Sci-Fi, Netflix
            entry(11, WatchStatus::Completed, Some(4)), // Breaking Bad, Drama, Netflix
            entry(12, WatchStatus::Watching, None),
            entry(5, WatchStatus::Pending, None),
            entry(404, WatchStatus::Completed, Some(1)), // not in catalog
        ];
        let stats = Statistics::compute(&demo_catalog(), &entries);

        assert_eq!(stats.total_content, 20);
        assert_eq!(stats.movies, TypeStats { total: 10, watched: 1 });
        assert_eq!(stats.series, TypeStats { total: 10, watched: 1 });
        assert_eq!(stats.total_watched, 2);
        assert_eq!(stats.in_list, 4);
        assert_eq!(stats.status_count(WatchStatus::Completed), 2);
        assert_eq!(stats.status_count(WatchStatus::Watching), 1);
        assert_eq!(stats.status_count(WatchStatus::Pending), 1);
        assert_eq!(stats.completion_rate, 10);

        assert_eq!(stats.platforms.len(), 1);
        assert_eq!(stats.platforms["Netflix"], 2);
        assert_eq!(stats.genres.get("Sci-Fi"), Some(&1));
        assert_eq!(stats.genres.get("Drama"), Some(&1));
        assert!(!stats.genres.contains_key("Action"));

        // Tie between Drama and Sci-Fi goes to the alphabetically first
        assert_eq!(stats.favorite_genre.as_deref(), Some("Drama"));
        assert_eq!(stats.average_user_rating, Some(4.5));
        // 148 minutes + 62 episodes of 47 minutes
        assert_eq!(stats.watch_time_minutes, 148 + 62 * 47);
    }

    #[test]
    fn test_completion_rate_bounds() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(5, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
        assert_eq!(completion_rate(7, 3), 100);
    }

    #[test]
    fn test_full_catalog_completion() {
        let catalog = demo_catalog();
        let entries: Vec<WatchEntry> = catalog
            .iter()
            .map(|item| entry(item.id.0, WatchStatus::Completed, None))
            .collect();
        let stats = Statistics::compute(&catalog, &entries);
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.genres.values().sum::<usize>(), 20);
        assert_eq!(stats.average_user_rating, None);
    }

    #[test]
    fn test_huge_series_runtime_does_not_overflow() {
        let mut catalog = demo_catalog();
        catalog[10].kind = cinelist_models::Runtime::Series {
            seasons: 2,
            episode_duration_minutes: u32::MAX,
            episodes_per_season: vec![u32::MAX, u32::MAX],
        };
        let entries = vec![
            entry(catalog[10].id.0, WatchStatus::Completed, None),
            entry(3, WatchStatus::Completed, None),
        ];

        let stats = Statistics::compute(&catalog, &entries);
        assert_eq!(stats.total_watched, 2);
        assert_eq!(stats.watch_time_minutes, u64::MAX);
    }
}
