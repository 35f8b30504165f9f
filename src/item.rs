use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three content shapes the dashboard aggregates.
///
/// The discriminant is explicit and set once at creation time; it is never
/// inferred from field presence, so synthetic cross-type conversions keep a
/// reliable classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    News,
    Social,
    Music,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::News => "news",
            Variant::Social => "social",
            Variant::Music => "music",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub published_at: DateTime<Utc>,
    pub source_name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAuthor {
    pub name: String,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialItem {
    pub id: String,
    pub text: String,
    pub author: SocialAuthor,
    pub created_at: DateTime<Utc>,
    pub like_count: Option<u32>,
    pub retweet_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicItem {
    pub id: String,
    pub title: String,
    pub artist_names: Vec<String>,
    pub album_name: String,
    pub album_image_url: Option<String>,
    pub release_date: String,
    pub spotify_url: String,
    pub popularity: u32,
    pub duration_ms: u64,
}

/// Tagged union over the three item shapes. The serde tag doubles as the
/// persisted discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum ContentItem {
    News(NewsItem),
    Social(SocialItem),
    Music(MusicItem),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::News(n) => &n.id,
            ContentItem::Social(s) => &s.id,
            ContentItem::Music(m) => &m.id,
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            ContentItem::News(_) => Variant::News,
            ContentItem::Social(_) => Variant::Social,
            ContentItem::Music(_) => Variant::Music,
        }
    }

    /// Display title used by cards and by the cross-type converter.
    pub fn display_title(&self) -> String {
        match self {
            ContentItem::News(n) => n.title.clone(),
            ContentItem::Social(s) => format!("{} (@{})", s.author.name, s.author.username),
            ContentItem::Music(m) => m.title.clone(),
        }
    }

    /// Best-effort link for the item, if the shape carries one.
    pub fn link(&self) -> Option<&str> {
        match self {
            ContentItem::News(n) => Some(&n.url),
            ContentItem::Social(_) => None,
            ContentItem::Music(m) => Some(&m.spotify_url),
        }
    }

    /// Best-effort image for the item, if the shape carries one.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ContentItem::News(n) => Some(&n.image_url),
            ContentItem::Social(s) => Some(&s.author.avatar_url),
            ContentItem::Music(m) => m.album_image_url.as_deref(),
        }
    }
}
