use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Provider endpoints and fetch tuning, loaded from an optional TOML file
/// with environment overrides on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub news_api_base: String,
    pub news_api_key: Option<String>,
    pub music_api_base: String,
    pub country: String,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_base: "https://newsapi.org/v2".to_string(),
            news_api_key: None,
            music_api_base: "http://localhost:3000/api/spotify".to_string(),
            country: "us".to_string(),
            page_size: 20,
        }
    }
}

impl Config {
    /// Load from `path` if it exists, then apply env overrides
    /// (`COLLAGE_NEWS_API_KEY`, `COLLAGE_NEWS_API_BASE`,
    /// `COLLAGE_MUSIC_API_BASE`, `COLLAGE_PAGE_SIZE`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file: {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file: {}", p.display()))?
            }
            _ => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("COLLAGE_NEWS_API_KEY") {
            if !key.trim().is_empty() {
                self.news_api_key = Some(key);
            }
        }
        if let Ok(base) = std::env::var("COLLAGE_NEWS_API_BASE") {
            self.news_api_base = base;
        }
        if let Ok(base) = std::env::var("COLLAGE_MUSIC_API_BASE") {
            self.music_api_base = base;
        }
        if let Ok(size) = std::env::var("COLLAGE_PAGE_SIZE") {
            if let Ok(size) = size.parse() {
                self.page_size = size;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.news_api_base)
            .with_context(|| format!("invalid news_api_base: {}", self.news_api_base))?;
        Url::parse(&self.music_api_base)
            .with_context(|| format!("invalid music_api_base: {}", self.music_api_base))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.page_size, 20);
        assert!(config.news_api_key.is_none());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collage.toml");
        std::fs::write(
            &path,
            "news_api_key = \"k123\"\npage_size = 10\ncountry = \"de\"\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.news_api_key.as_deref(), Some("k123"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.country, "de");
        // Untouched keys keep their defaults.
        assert_eq!(config.news_api_base, "https://newsapi.org/v2");
    }
}
