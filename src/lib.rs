pub mod collision;
pub mod config;
pub mod convert;
pub mod db;
pub mod fetch;
pub mod gesture;
pub mod item;
pub mod locate;
pub mod prefs;
pub mod repository;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::collision::{CollisionStrategy, ContainerFirst, DroppableRegion, DroppableSet, Point, Rect};
    pub use crate::config::Config;
    pub use crate::fetch::{ContentProvider, FetchPage, FetchParams};
    pub use crate::gesture::{DragSession, DropTarget, GestureController, GestureOutcome};
    pub use crate::item::{ContentItem, MusicItem, NewsItem, SocialItem, Variant};
    pub use crate::prefs::Preferences;
    pub use crate::repository::{ContentRepository, Section, SectionId, Zone};
    pub use crate::Collage;
}

use anyhow::Result;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::collision::{DroppableSet, Point};
use crate::config::Config;
use crate::db::Database;
use crate::fetch::{ContentProvider, FetchPage, FetchParams, MusicProvider, NewsProvider, SocialProvider};
use crate::gesture::{DropTarget, GestureController, GestureOutcome};
use crate::item::ContentItem;
use crate::prefs::Preferences;
use crate::repository::{ContentRepository, Mutation, Section, SectionId};

const TRENDING_LIMIT: usize = 5;
const SEARCH_LIMIT: usize = 10;

struct DashState {
    repo: ContentRepository,
    gesture: GestureController,
}

/// Async dashboard entry point. Owns the content repository, the gesture
/// controller, the three content providers and the preferences store.
///
/// All repository/gesture mutation happens synchronously under one lock, so
/// a fetch completion or a gesture is applied atomically; there is no
/// interleaving of two reorder/move operations.
pub struct Collage {
    state: Mutex<DashState>,
    db: Database,
    prefs: Mutex<Preferences>,
    page_size: usize,
    news: Box<dyn ContentProvider>,
    music: Box<dyn ContentProvider>,
    social: Box<dyn ContentProvider>,
}

impl Collage {
    /// Initialize the preferences database and default providers. Does not
    /// start any internal runtimes.
    pub async fn connect(
        config: Config,
        database_url: Option<&str>,
        run_migrations: bool,
    ) -> Result<Self> {
        let news = Box::new(NewsProvider::new(&config)?);
        let music = Box::new(MusicProvider::new(&config)?);
        let social = Box::new(SocialProvider);
        Self::connect_with(config, database_url, run_migrations, news, music, social).await
    }

    /// Like [`connect`](Self::connect) but with caller-supplied providers.
    pub async fn connect_with(
        config: Config,
        database_url: Option<&str>,
        run_migrations: bool,
        news: Box<dyn ContentProvider>,
        music: Box<dyn ContentProvider>,
        social: Box<dyn ContentProvider>,
    ) -> Result<Self> {
        let db = Database::connect(database_url).await?;
        if run_migrations {
            db.run_migrations().await?;
        }
        let preferences = prefs::load(&db).await?;
        Ok(Self {
            state: Mutex::new(DashState {
                repo: ContentRepository::new(),
                gesture: GestureController::new(),
            }),
            db,
            prefs: Mutex::new(preferences),
            page_size: config.page_size,
            news,
            music,
            social,
        })
    }

    // --- Read access for the UI layer ---

    /// Snapshot of a collection's items.
    pub fn items(&self, id: SectionId) -> Vec<ContentItem> {
        self.state.lock().unwrap().repo.items(id).to_vec()
    }

    /// Snapshot of a collection including its fetch state.
    pub fn section(&self, id: SectionId) -> Section {
        self.state.lock().unwrap().repo.section(id).clone()
    }

    /// Register a listener invoked for every section touched by a mutation.
    pub fn subscribe(&self, listener: impl Fn(SectionId) + Send + 'static) {
        self.state.lock().unwrap().repo.subscribe(listener);
    }

    // --- Fetch entry points ---

    pub async fn fetch_news(&self, page: u32) -> Result<()> {
        let params = FetchParams {
            categories: self.prefs.lock().unwrap().favorite_categories.clone(),
            ..Default::default()
        };
        let result = self.news.fetch(&params, page).await;
        self.apply_fetch(SectionId::News, result, self.page_size);
        Ok(())
    }

    pub async fn fetch_music(&self, page: u32) -> Result<()> {
        let result = self.music.fetch(&FetchParams::default(), page).await;
        self.apply_fetch(SectionId::Music, result, self.page_size);
        Ok(())
    }

    pub async fn fetch_social(&self, hashtag: &str) -> Result<()> {
        let params = FetchParams {
            hashtag: Some(hashtag.to_string()),
            ..Default::default()
        };
        let result = self.social.fetch(&params, 1).await;
        self.apply_fetch(SectionId::Social, result, self.page_size);
        Ok(())
    }

    /// Fetch trending news and music concurrently; both sub-collections are
    /// replaced in a single repository turn.
    pub async fn fetch_trending(&self) -> Result<()> {
        let news_params = FetchParams {
            categories: vec!["trending".to_string()],
            query: Some("trending".to_string()),
            limit: Some(TRENDING_LIMIT),
            ..Default::default()
        };
        let music_params = FetchParams {
            limit: Some(TRENDING_LIMIT),
            ..Default::default()
        };
        let fetched = tokio::try_join!(
            self.news.fetch(&news_params, 1),
            self.music.fetch(&music_params, 1)
        );
        let mut state = self.state.lock().unwrap();
        let (news, music) = match fetched {
            Ok(pages) => pages,
            Err(e) => {
                warn!(error = %e, "trending fetch failed");
                state.repo.set_error(SectionId::TrendingNews, e.to_string());
                state.repo.set_error(SectionId::TrendingMusic, e.to_string());
                return Ok(());
            }
        };
        if state.gesture.is_dragging() {
            debug!("trending refresh completed mid-drag, skipped");
            return Ok(());
        }
        state
            .repo
            .replace_page(SectionId::TrendingNews, news.items, 1, TRENDING_LIMIT);
        state
            .repo
            .replace_page(SectionId::TrendingMusic, music.items, 1, TRENDING_LIMIT);
        Ok(())
    }

    /// Search news and music concurrently and merge into the search section.
    pub async fn search(&self, query: &str) -> Result<()> {
        let params = FetchParams {
            query: Some(query.to_string()),
            limit: Some(SEARCH_LIMIT),
            ..Default::default()
        };
        let fetched = tokio::try_join!(
            self.news.fetch(&params, 1),
            self.music.fetch(&params, 1)
        );
        let mut state = self.state.lock().unwrap();
        let (news, music) = match fetched {
            Err(e) => {
                warn!(error = %e, "search fetch failed");
                state.repo.set_error(SectionId::Search, e.to_string());
                return Ok(());
            }
            Ok(pages) => pages,
        };
        let mut merged = news.items;
        merged.extend(music.items);
        if state.gesture.is_dragging() {
            debug!("search completed mid-drag, skipped");
            return Ok(());
        }
        let count = merged.len();
        state
            .repo
            .replace_page(SectionId::Search, merged, 1, count + 1);
        Ok(())
    }

    pub fn clear_search(&self) {
        let mut state = self.state.lock().unwrap();
        state.repo.replace_page(SectionId::Search, Vec::new(), 1, 1);
    }

    /// Apply a provider result: success replaces/appends the section, failure
    /// records an error string next to the stale items. A page-1 replacement
    /// that completes while a drag is active is skipped so the gesture's
    /// outcome is not silently overwritten.
    fn apply_fetch(&self, section: SectionId, result: Result<FetchPage>, page_size: usize) {
        let mut state = self.state.lock().unwrap();
        match result {
            Ok(fetched) => {
                if fetched.page <= 1 && state.gesture.is_dragging() {
                    debug!(section = section.as_str(), "refresh completed mid-drag, skipped");
                    return;
                }
                state
                    .repo
                    .replace_page(section, fetched.items, fetched.page, page_size);
            }
            Err(e) => {
                warn!(section = section.as_str(), error = %e, "fetch failed");
                state.repo.set_error(section, e.to_string());
            }
        }
    }

    // --- Direct mutation entry points ---

    pub fn reorder(&self, section: SectionId, active_id: &str, over_id: &str) -> Mutation {
        self.state
            .lock()
            .unwrap()
            .repo
            .reorder(section, active_id, over_id)
    }

    pub fn move_between(&self, item_id: &str, from: SectionId, to: SectionId) -> Mutation {
        self.state
            .lock()
            .unwrap()
            .repo
            .move_between(item_id, from, to)
    }

    // --- Gesture handlers, wired to the platform's pointer/keyboard events ---

    pub fn on_drag_start(&self, active_id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        let DashState { repo, gesture } = &mut *state;
        gesture.on_drag_start(repo, active_id)
    }

    pub fn on_drag_over(&self, pointer: Point, droppables: &DroppableSet) {
        self.state
            .lock()
            .unwrap()
            .gesture
            .on_drag_over(pointer, droppables);
    }

    pub fn on_drag_end(&self, over: Option<DropTarget>) -> GestureOutcome {
        let mut state = self.state.lock().unwrap();
        let DashState { repo, gesture } = &mut *state;
        gesture.on_drag_end(repo, over)
    }

    pub fn on_drag_end_at(&self, pointer: Point, droppables: &DroppableSet) -> GestureOutcome {
        let mut state = self.state.lock().unwrap();
        let DashState { repo, gesture } = &mut *state;
        gesture.on_drag_end_at(repo, pointer, droppables)
    }

    pub fn on_drag_cancel(&self) {
        self.state.lock().unwrap().gesture.on_drag_cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.state.lock().unwrap().gesture.is_dragging()
    }

    // --- Preferences ---

    pub fn preferences(&self) -> Preferences {
        self.prefs.lock().unwrap().clone()
    }

    /// Persist new preferences and make them effective for later fetches.
    pub async fn set_preferences(&self, preferences: Preferences) -> Result<()> {
        prefs::save(&self.db, &preferences).await?;
        *self.prefs.lock().unwrap() = preferences;
        Ok(())
    }

    /// Add an item id to the persisted favorites list.
    pub async fn add_favorite(&self, item_id: &str) -> Result<()> {
        let mut preferences = self.preferences();
        preferences.add_favorite(item_id);
        self.set_preferences(preferences).await
    }

    /// Remove an item id from the persisted favorites list.
    pub async fn remove_favorite(&self, item_id: &str) -> Result<()> {
        let mut preferences = self.preferences();
        preferences.remove_favorite(item_id);
        self.set_preferences(preferences).await
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.prefs.lock().unwrap().is_favorite(item_id)
    }
}
