use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes counted for a series whose per-season episode counts are unknown
pub const DEFAULT_SERIES_MINUTES: u32 = 8 * 60;

/// Stable catalog key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ContentId(pub u64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ContentId)
            .map_err(|_| format!("Invalid content id: {}", s))
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        ContentId(id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(ContentType::Movie),
            "series" | "show" | "tv" => Ok(ContentType::Series),
            other => Err(format!("Invalid content type: {}. Use 'movie' or 'series'", other)),
        }
    }
}

/// Runtime shape, which also decides whether an item is a movie or a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Runtime {
    Movie {
        duration_minutes: u32,
    },
    Series {
        seasons: u32,
        episode_duration_minutes: u32,
        /// Episode count per season, when known
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        episodes_per_season: Vec<u32>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub genre: String,
    pub platform: String,
    pub year: i32,
    pub rating: f64, // 0-10, catalog score
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: Runtime,
}

impl ContentItem {
    pub fn content_type(&self) -> ContentType {
        match self.kind {
            Runtime::Movie { .. } => ContentType::Movie,
            Runtime::Series { .. } => ContentType::Series,
        }
    }

    /// Total viewing time in minutes, saturating at `u64::MAX`
    pub fn runtime_minutes(&self) -> u64 {
        match &self.kind {
            Runtime::Movie { duration_minutes } => u64::from(*duration_minutes),
            Runtime::Series {
                episode_duration_minutes,
                episodes_per_season,
                ..
            } => {
                if episodes_per_season.is_empty() {
                    u64::from(DEFAULT_SERIES_MINUTES)
                } else {
                    episodes_per_season
                        .iter()
                        .fold(0u64, |total, &episodes| total.saturating_add(u64::from(episodes)))
                        .saturating_mul(u64::from(*episode_duration_minutes))
                }
            }
        }
    }
}
