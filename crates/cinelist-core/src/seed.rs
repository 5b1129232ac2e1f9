//! Built-in demo catalog used when no catalog override has been stored.

use anyhow::{Context, Result};
use cinelist_models::{ContentId, ContentItem, Runtime};
use std::path::Path;

pub const DEMO_PLATFORMS: [&str; 8] = [
    "Netflix",
    "Amazon Prime Video",
    "Disney+",
    "HBO Max",
    "Apple TV+",
    "Paramount+",
    "Hulu",
    "Crunchyroll",
];

pub const DEMO_GENRES: [&str; 10] = [
    "Action",
    "Drama",
    "Comedy",
    "Horror",
    "Sci-Fi",
    "Romance",
    "Thriller",
    "Animation",
    "Documentary",
    "Adventure",
];

#[allow(clippy::too_many_arguments)]
fn movie(
    id: u64,
    title: &str,
    genre: &str,
    platform: &str,
    rating: f64,
    year: i32,
    duration_minutes: u32,
    description: &str,
) -> ContentItem {
    ContentItem {
        id: ContentId(id),
        title: title.to_string(),
        genre: genre.to_string(),
        platform: platform.to_string(),
        year,
        rating,
        description: description.to_string(),
        kind: Runtime::Movie { duration_minutes },
    }
}

#[allow(clippy::too_many_arguments)]
fn series(
    id: u64,
    title: &str,
    genre: &str,
    platform: &str,
    rating: f64,
    year: i32,
    episode_duration_minutes: u32,
    episodes_per_season: &[u32],
    description: &str,
) -> ContentItem {
    ContentItem {
        id: ContentId(id),
        title: title.to_string(),
        genre: genre.to_string(),
        platform: platform.to_string(),
        year,
        rating,
        description: description.to_string(),
        kind: Runtime::Series {
            seasons: episodes_per_season.len() as u32,
            episode_duration_minutes,
            episodes_per_season: episodes_per_season.to_vec(),
        },
    }
}

pub fn demo_movies() -> Vec<ContentItem> {
    vec![
        movie(1, "Avengers: Endgame", "Action", "Disney+", 8.4, 2019, 181,
            "After the devastating events of Infinity War, the remaining Avengers assemble once more to undo Thanos' actions."),
        movie(2, "The Dark Knight", "Action", "HBO Max", 9.0, 2008, 152,
            "Batman faces his greatest challenge when the Joker emerges to spread chaos across Gotham City."),
        movie(3, "Inception", "Sci-Fi", "Netflix", 8.8, 2010, 148,
            "Dom Cobb is a thief with the rare ability to enter people's dreams and steal secrets from their subconscious."),
        movie(4, "Parasite", "Thriller", "Hulu", 8.6, 2019, 132,
            "A poor family schemes its way into working for a wealthy household until the plan takes an unexpected turn."),
        movie(5, "The Godfather", "Drama", "Amazon Prime Video", 9.2, 1972, 175,
            "The story of the Corleone family, one of the most powerful mafia families in New York."),
        movie(6, "Spider-Man: Into the Spider-Verse", "Animation", "Netflix", 8.4, 2018, 117,
            "Miles Morales becomes Spider-Man and meets Spider-People from other dimensions."),
        movie(7, "La La Land", "Romance", "Amazon Prime Video", 8.0, 2016, 128,
            "A love story between an aspiring actress and a jazz musician in Los Angeles."),
        movie(8, "Get Out", "Horror", "HBO Max", 7.7, 2017, 104,
            "A young man visits his girlfriend's family estate and uncovers disturbing secrets."),
        movie(9, "Mad Max: Fury Road", "Action", "Netflix", 8.1, 2015, 120,
            "In a post-apocalyptic wasteland, Max teams up with Furiosa to flee a tyrannical warlord."),
        movie(10, "The Grand Budapest Hotel", "Comedy", "Disney+", 8.1, 2014, 99,
            "The adventures of Gustave H, a legendary concierge, and Zero Moustafa, the lobby boy who becomes his protege."),
    ]
}

pub fn demo_series() -> Vec<ContentItem> {
    vec![
        series(11, "Breaking Bad", "Drama", "Netflix", 9.5, 2008, 47, &[7, 13, 13, 13, 16],
            "A high school chemistry teacher turns to making methamphetamine after a cancer diagnosis."),
        series(12, "Stranger Things", "Sci-Fi", "Netflix", 8.7, 2016, 51, &[8, 9, 8, 9],
            "A group of kids in the 1980s confronts supernatural forces in their small Indiana town."),
        series(13, "The Office", "Comedy", "Amazon Prime Video", 8.9, 2005, 22, &[6, 22, 25, 19, 28, 26, 26, 24, 25],
            "A mockumentary about the employees of a paper company in Scranton, Pennsylvania."),
        series(14, "Game of Thrones", "Drama", "HBO Max", 9.2, 2011, 57, &[10, 10, 10, 10, 10, 10, 7, 6],
            "Noble families fight for control of the Iron Throne across the Seven Kingdoms of Westeros."),
        series(15, "The Crown", "Drama", "Netflix", 8.6, 2016, 58, &[10, 10, 10, 10, 10, 10],
            "The life of Queen Elizabeth II from the 1940s to modern times."),
        series(16, "Attack on Titan", "Animation", "Crunchyroll", 9.0, 2013, 24, &[25, 12, 22, 28],
            "Humanity lives inside cities surrounded by enormous walls that keep out the man-eating Titans."),
        series(17, "Friends", "Comedy", "HBO Max", 8.9, 1994, 22, &[24, 24, 25, 24, 24, 25, 24, 24, 24, 18],
            "Six friends navigate life and love in Manhattan during the nineties."),
        series(18, "The Mandalorian", "Sci-Fi", "Disney+", 8.6, 2019, 38, &[8, 8, 8],
            "A Mandalorian bounty hunter travels the outer reaches of the galaxy, far from the New Republic."),
        series(19, "Sherlock", "Thriller", "Netflix", 9.1, 2010, 88, &[3, 3, 3, 1],
            "A modern take on the adventures of Sherlock Holmes in twenty-first century London."),
        series(20, "The Boys", "Action", "Amazon Prime Video", 8.7, 2019, 60, &[8, 8, 8, 8],
            "A group of vigilantes takes on corrupt superheroes who abuse their powers."),
    ]
}

/// Movies followed by series
pub fn demo_catalog() -> Vec<ContentItem> {
    let mut content = demo_movies();
    content.extend(demo_series());
    content
}

/// Load a catalog seed from a JSON array of content items
pub fn load_seed_file(path: &Path) -> Result<Vec<ContentItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog seed {}", path.display()))?;
    let items: Vec<ContentItem> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid catalog seed {}", path.display()))?;
    crate::catalog::ensure_unique_ids(&items)
        .with_context(|| format!("Invalid catalog seed {}", path.display()))?;
    Ok(items)
}
