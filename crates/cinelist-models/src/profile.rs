use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default = "default_language")]
    pub preferred_language: String,
    #[serde(default = "default_true")]
    pub autoplay: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            favorite_genres: vec!["Action".to_string(), "Sci-Fi".to_string(), "Drama".to_string()],
            preferred_language: default_language(),
            autoplay: true,
            notifications: true,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Demo User".to_string(),
            avatar: "👤".to_string(),
            preferences: Preferences::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_fills_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"name": "Ana", "avatar": "🎬"}"#).unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.preferences, Preferences::default());

        let profile: Profile = serde_json::from_str(
            r#"{"name": "Ana", "avatar": "🎬", "preferences": {"autoplay": false}}"#,
        )
        .unwrap();
        assert!(!profile.preferences.autoplay);
        assert!(profile.preferences.notifications);
        assert_eq!(profile.preferences.preferred_language, "en");
        assert!(profile.preferences.favorite_genres.is_empty());
    }
}
