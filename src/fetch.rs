use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::item::{ContentItem, MusicItem, NewsItem, SocialAuthor, SocialItem};

/// One page of provider results, ready for `ContentRepository::replace_page`.
#[derive(Debug, Clone)]
pub struct FetchPage {
    pub items: Vec<ContentItem>,
    pub page: u32,
}

/// Request parameters shared across providers. Unused fields are ignored by
/// providers that do not understand them.
#[derive(Debug, Clone, Default)]
pub struct FetchParams {
    pub categories: Vec<String>,
    pub query: Option<String>,
    pub hashtag: Option<String>,
    pub limit: Option<usize>,
}

/// Contract every content source satisfies: an ordered page of uniquely-
/// identified, explicitly-tagged items. Retry policy lives behind this
/// boundary, not in the core.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, params: &FetchParams, page: u32) -> Result<FetchPage>;
}

// --- News (NewsAPI-shaped REST) ---

pub struct NewsProvider {
    client: reqwest::Client,
    base: Url,
    api_key: Option<String>,
    country: String,
    page_size: usize,
}

#[derive(Deserialize)]
struct NewsResponse {
    status: String,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
    source: RawSource,
}

#[derive(Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl NewsProvider {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent("collage/0.1").build()?,
            base: Url::parse(&config.news_api_base)?,
            api_key: config.news_api_key.clone(),
            country: config.country.clone(),
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, params: &FetchParams, page: u32, key: &str) -> Result<Url> {
        let page_size = params.limit.unwrap_or(self.page_size);
        let mut url = self.base.clone();
        if let Some(query) = &params.query {
            url.path_segments_mut()
                .map_err(|_| anyhow!("news_api_base cannot be a base URL"))?
                .push("everything");
            url.query_pairs_mut()
                .append_pair("q", query)
                .append_pair("sortBy", "relevancy");
        } else {
            let category = if params.categories.is_empty() {
                "general".to_string()
            } else {
                params.categories.join(",")
            };
            url.path_segments_mut()
                .map_err(|_| anyhow!("news_api_base cannot be a base URL"))?
                .push("top-headlines");
            url.query_pairs_mut()
                .append_pair("country", &self.country)
                .append_pair("category", &category)
                .append_pair("sortBy", "publishedAt");
        }
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("apiKey", key);
        Ok(url)
    }

    async fn fetch_remote(&self, params: &FetchParams, page: u32, key: &str) -> Result<Vec<ContentItem>> {
        let url = self.endpoint(params, page, key)?;
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("NewsAPI error: {}", resp.status()));
        }
        let data: NewsResponse = resp.json().await?;
        if data.status == "error" {
            return Err(anyhow!(
                "NewsAPI returned an error: {}",
                data.message.unwrap_or_default()
            ));
        }
        let category = params
            .categories
            .first()
            .cloned()
            .unwrap_or_else(|| "general".to_string());
        let items = data
            .articles
            .unwrap_or_default()
            .into_iter()
            .filter(valid_article)
            .enumerate()
            .map(|(index, a)| {
                ContentItem::News(NewsItem {
                    // Stable within a (category, page) fetch, like the source API layer.
                    id: format!("{category}-{page}-{index}"),
                    title: a.title.unwrap_or_default(),
                    description: a
                        .description
                        .unwrap_or_else(|| "No description available".to_string()),
                    url: a.url.unwrap_or_default(),
                    image_url: a
                        .url_to_image
                        .unwrap_or_else(|| "https://picsum.photos/400/300".to_string()),
                    published_at: a.published_at.unwrap_or_else(Utc::now),
                    source_name: a.source.name.unwrap_or_else(|| "Unknown".to_string()),
                    category: category.clone(),
                })
            })
            .collect();
        Ok(items)
    }
}

// Articles withdrawn by the API keep their slot with "[Removed]" fields.
fn valid_article(a: &RawArticle) -> bool {
    let ok = |s: &Option<String>| matches!(s, Some(v) if !v.is_empty() && v != "[Removed]");
    ok(&a.title) && ok(&a.description)
}

#[async_trait]
impl ContentProvider for NewsProvider {
    fn name(&self) -> &'static str {
        "news"
    }

    async fn fetch(&self, params: &FetchParams, page: u32) -> Result<FetchPage> {
        let page_size = params.limit.unwrap_or(self.page_size);
        let Some(key) = self.api_key.as_deref() else {
            debug!("news api key not configured, serving demo articles");
            return Ok(FetchPage { items: demo_articles(page, page_size), page });
        };
        match self.fetch_remote(params, page, key).await {
            Ok(items) => {
                debug!(count = items.len(), page, "fetched news articles");
                Ok(FetchPage { items, page })
            }
            Err(e) => {
                warn!(error = %e, "news fetch failed, falling back to demo articles");
                Ok(FetchPage { items: demo_articles(page, page_size), page })
            }
        }
    }
}

// --- Music (Spotify-proxy-shaped REST) ---

pub struct MusicProvider {
    client: reqwest::Client,
    base: Url,
    page_size: usize,
}

#[derive(Deserialize)]
struct TracksResponse {
    tracks: Option<Vec<RawTrack>>,
}

#[derive(Deserialize)]
struct RawTrack {
    id: String,
    name: String,
    artists: Vec<RawArtist>,
    album: RawAlbum,
    external_urls: RawExternalUrls,
    popularity: Option<u32>,
    duration_ms: Option<u64>,
}

#[derive(Deserialize)]
struct RawArtist {
    name: String,
}

#[derive(Deserialize)]
struct RawAlbum {
    name: String,
    images: Option<Vec<RawImage>>,
    release_date: Option<String>,
}

#[derive(Deserialize)]
struct RawImage {
    url: String,
}

#[derive(Deserialize)]
struct RawExternalUrls {
    spotify: Option<String>,
}

impl MusicProvider {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent("collage/0.1").build()?,
            base: Url::parse(&config.music_api_base)?,
            page_size: config.page_size,
        })
    }

    async fn fetch_remote(&self, params: &FetchParams, page: u32) -> Result<Vec<ContentItem>> {
        let page_size = params.limit.unwrap_or(self.page_size);
        let mut url = self.base.clone();
        let kind = if params.query.is_some() { "search" } else { "top" };
        url.query_pairs_mut()
            .append_pair("type", kind)
            .append_pair("query", params.query.as_deref().unwrap_or(""))
            .append_pair("limit", &page_size.to_string())
            .append_pair("page", &page.to_string());
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("music API error: {}", resp.status()));
        }
        let data: TracksResponse = resp.json().await?;
        let items = data
            .tracks
            .unwrap_or_default()
            .into_iter()
            .map(|t| {
                ContentItem::Music(MusicItem {
                    id: t.id,
                    title: t.name,
                    artist_names: t.artists.into_iter().map(|a| a.name).collect(),
                    album_name: t.album.name,
                    album_image_url: t
                        .album
                        .images
                        .and_then(|imgs| imgs.into_iter().next())
                        .map(|i| i.url),
                    release_date: t.album.release_date.unwrap_or_default(),
                    spotify_url: t.external_urls.spotify.unwrap_or_default(),
                    popularity: t.popularity.unwrap_or(0),
                    duration_ms: t.duration_ms.unwrap_or(0),
                })
            })
            .collect();
        Ok(items)
    }
}

#[async_trait]
impl ContentProvider for MusicProvider {
    fn name(&self) -> &'static str {
        "music"
    }

    async fn fetch(&self, params: &FetchParams, page: u32) -> Result<FetchPage> {
        let page_size = params.limit.unwrap_or(self.page_size);
        match self.fetch_remote(params, page).await {
            Ok(items) => {
                debug!(count = items.len(), page, "fetched music tracks");
                Ok(FetchPage { items, page })
            }
            Err(e) => {
                warn!(error = %e, "music fetch failed, falling back to demo tracks");
                Ok(FetchPage { items: demo_tracks(page, page_size), page })
            }
        }
    }
}

// --- Social (mock generation; the real network requires authentication) ---

pub struct SocialProvider;

const SOCIAL_TOPICS: [&str; 8] = [
    "AI revolution",
    "startup news",
    "tech trends",
    "innovation update",
    "digital transformation",
    "coding life",
    "product launch",
    "tech review",
];

#[async_trait]
impl ContentProvider for SocialProvider {
    fn name(&self) -> &'static str {
        "social"
    }

    async fn fetch(&self, params: &FetchParams, page: u32) -> Result<FetchPage> {
        let hashtag = params.hashtag.as_deref().unwrap_or("technology");
        let count = params.limit.unwrap_or(10);
        let now = Utc::now();
        let batch = uuid::Uuid::new_v4().simple().to_string();
        let items = (0..count)
            .map(|i| {
                let topic = SOCIAL_TOPICS[i % SOCIAL_TOPICS.len()];
                ContentItem::Social(SocialItem {
                    id: format!("post-{i}-{batch}"),
                    text: format!(
                        "{topic} - This is about {hashtag} and the latest developments in tech! #{hashtag} #trending #tech"
                    ),
                    author: SocialAuthor {
                        name: format!("TechUser {}", i + 1),
                        username: format!("techuser{}", i + 1),
                        avatar_url: format!("https://i.pravatar.cc/150?img={}", (i % 50) + 1),
                    },
                    created_at: now - Duration::hours(i as i64 * 7),
                    like_count: Some((i as u32) * 10 + 42),
                    retweet_count: Some((i as u32) * 2 + 5),
                })
            })
            .collect();
        Ok(FetchPage { items, page })
    }
}

// --- Demo fallback data ---

const DEMO_HEADLINES: [&str; 6] = [
    "Tech Giants Announce New AI Partnership",
    "Breakthrough in Quantum Computing Research",
    "Open Source Project Reaches Major Milestone",
    "Startup Raises Record Funding Round",
    "New Framework Promises Faster Web Apps",
    "Security Researchers Disclose Critical Patch",
];

const DEMO_TRACKS: [(&str, &str, &str); 6] = [
    ("Midnight Drive", "The Neon Lights", "City Glow"),
    ("Paper Planes Home", "Ava Calder", "Postcards"),
    ("Static Bloom", "Glasshouse Kids", "Greenhouse"),
    ("Northern Line", "Foxtail", "Transit"),
    ("Slow Orbit", "Luna Pale", "Apogee"),
    ("Copper Sky", "Mara Venn", "Oxide"),
];

fn demo_articles(page: u32, count: usize) -> Vec<ContentItem> {
    let now = Utc::now();
    let batch = uuid::Uuid::new_v4().simple().to_string();
    (0..count)
        .map(|i| {
            let headline = DEMO_HEADLINES[i % DEMO_HEADLINES.len()];
            ContentItem::News(NewsItem {
                id: format!("demo-news-{page}-{i}-{batch}"),
                title: format!("{headline} ({})", i + 1),
                description: "Demo article shown while the news provider is unavailable."
                    .to_string(),
                url: "https://example.com/demo".to_string(),
                image_url: format!("https://picsum.photos/400/300?random={i}"),
                published_at: now - Duration::minutes(i as i64 * 17),
                source_name: "Demo Wire".to_string(),
                category: "general".to_string(),
            })
        })
        .collect()
}

fn demo_tracks(page: u32, count: usize) -> Vec<ContentItem> {
    let batch = uuid::Uuid::new_v4().simple().to_string();
    (0..count)
        .map(|i| {
            let (title, artist, album) = DEMO_TRACKS[i % DEMO_TRACKS.len()];
            ContentItem::Music(MusicItem {
                id: format!("demo-track-{page}-{i}-{batch}"),
                title: title.to_string(),
                artist_names: vec![artist.to_string()],
                album_name: album.to_string(),
                album_image_url: Some(format!("https://picsum.photos/300/300?random={i}")),
                release_date: "2024-01-01".to_string(),
                spotify_url: "https://open.spotify.com/track/demo".to_string(),
                popularity: 50 + ((i as u32 * 7) % 50),
                duration_ms: 180_000 + (i as u64) * 11_000,
            })
        })
        .collect()
}
