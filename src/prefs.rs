use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::Database;

const PREFS_KEY: &str = "userPreferences";

/// Display/content preferences persisted across sessions as one JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub favorite_categories: Vec<String>,
    pub favorite_content: Vec<String>,
    pub music_genres: Vec<String>,
    pub language: String,
    pub dark_mode: bool,
    pub auto_refresh: bool,
    pub refresh_interval_minutes: u32,
    pub feed_layout: FeedLayout,
    pub content_types: ContentTypes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedLayout {
    Grid,
    List,
}

/// Which content kinds the feed shows at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypes {
    pub news: bool,
    pub music: bool,
    pub social: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            favorite_categories: vec!["technology".to_string(), "general".to_string()],
            favorite_content: Vec::new(),
            music_genres: vec!["pop".to_string(), "rock".to_string()],
            language: "en".to_string(),
            dark_mode: false,
            auto_refresh: true,
            refresh_interval_minutes: 5,
            feed_layout: FeedLayout::Grid,
            content_types: ContentTypes {
                news: true,
                music: true,
                social: true,
            },
        }
    }
}

impl Preferences {
    /// Mark an item as a favorite. Adding an already-favorited id is a
    /// no-op; the list stays duplicate-free.
    pub fn add_favorite(&mut self, item_id: impl Into<String>) {
        let item_id = item_id.into();
        if !self.favorite_content.contains(&item_id) {
            self.favorite_content.push(item_id);
        }
    }

    pub fn remove_favorite(&mut self, item_id: &str) {
        self.favorite_content.retain(|id| id != item_id);
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.favorite_content.iter().any(|id| id == item_id)
    }
}

/// Storage seam for the preferences blob.
#[async_trait]
pub trait PrefsStore: Send + Sync {
    async fn load_blob(&self) -> Result<Option<String>>;
    async fn save_blob(&self, payload: &str) -> Result<()>;
}

#[async_trait]
impl PrefsStore for Database {
    async fn load_blob(&self) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>(
            "SELECT payload FROM preferences WHERE key = ?",
        )
        .bind(PREFS_KEY)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn save_blob(&self, payload: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences(key, payload, updated_at) VALUES (?, ?, ?)\n             ON CONFLICT(key) DO UPDATE SET payload=excluded.payload, updated_at=excluded.updated_at",
        )
        .bind(PREFS_KEY)
        .bind(payload)
        .bind(current_epoch())
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

/// Load preferences, falling back to defaults when nothing is stored or the
/// stored blob no longer parses.
pub async fn load(store: &dyn PrefsStore) -> Result<Preferences> {
    let Some(payload) = store.load_blob().await? else {
        return Ok(Preferences::default());
    };
    Ok(serde_json::from_str(&payload).unwrap_or_default())
}

pub async fn save(store: &dyn PrefsStore, prefs: &Preferences) -> Result<()> {
    let payload = serde_json::to_string(prefs)?;
    store.save_blob(&payload).await
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_round_trips() {
        let mut prefs = Preferences::default();
        prefs.dark_mode = true;
        prefs.favorite_categories = vec!["science".to_string()];
        let payload = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, prefs);
    }

    #[test]
    fn favorites_toggle_and_round_trip() {
        let mut prefs = Preferences::default();
        prefs.add_favorite("m1");
        prefs.add_favorite("n2");
        // Re-adding an existing favorite does not duplicate it.
        prefs.add_favorite("m1");
        assert_eq!(prefs.favorite_content, vec!["m1", "n2"]);
        assert!(prefs.is_favorite("m1"));

        let payload = serde_json::to_string(&prefs).unwrap();
        assert!(payload.contains("\"favoriteContent\":[\"m1\",\"n2\"]"));
        let back: Preferences = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, prefs);

        prefs.remove_favorite("m1");
        assert!(!prefs.is_favorite("m1"));
        assert_eq!(prefs.favorite_content, vec!["n2"]);
    }

    #[test]
    fn garbage_blob_falls_back_to_defaults() {
        let back: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(back, Preferences::default());
        assert!(serde_json::from_str::<Preferences>("not json").is_err());
    }
}
