use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::convert;
use crate::item::{ContentItem, Variant};

/// The six named collections the dashboard tracks. Trending is split into
/// two typed sub-collections; the UI presents them merged (see [`Zone`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    News,
    Social,
    Music,
    Search,
    TrendingNews,
    TrendingMusic,
}

/// Fixed locator scan order. When the same id exists in two sections the
/// earlier entry wins; this is a deliberate tie-break, not a bug.
pub const SCAN_ORDER: [SectionId; 6] = [
    SectionId::News,
    SectionId::Social,
    SectionId::Music,
    SectionId::Search,
    SectionId::TrendingNews,
    SectionId::TrendingMusic,
];

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::News => "news",
            SectionId::Social => "social",
            SectionId::Music => "music",
            SectionId::Search => "search",
            SectionId::TrendingNews => "trendingNews",
            SectionId::TrendingMusic => "trendingMusic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "news" => Some(SectionId::News),
            "social" => Some(SectionId::Social),
            "music" => Some(SectionId::Music),
            "search" => Some(SectionId::Search),
            "trendingNews" => Some(SectionId::TrendingNews),
            "trendingMusic" => Some(SectionId::TrendingMusic),
            _ => None,
        }
    }

    /// Declared element variant of the section. `None` means heterogeneous
    /// (search holds any variant).
    pub fn accepted_variant(&self) -> Option<Variant> {
        match self {
            SectionId::News | SectionId::TrendingNews => Some(Variant::News),
            SectionId::Social => Some(Variant::Social),
            SectionId::Music | SectionId::TrendingMusic => Some(Variant::Music),
            SectionId::Search => None,
        }
    }

    pub fn zone(&self) -> Zone {
        match self {
            SectionId::News => Zone::News,
            SectionId::Social => Zone::Social,
            SectionId::Music => Zone::Music,
            SectionId::Search => Zone::Search,
            SectionId::TrendingNews | SectionId::TrendingMusic => Zone::Trending,
        }
    }
}

/// A droppable panel as the UI names it. `Trending` merges the two trending
/// sections into one visual list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    News,
    Social,
    Music,
    Search,
    Trending,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::News => "news",
            Zone::Social => "social",
            Zone::Music => "music",
            Zone::Search => "search",
            Zone::Trending => "trending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "news" => Some(Zone::News),
            "social" => Some(Zone::Social),
            "music" => Some(Zone::Music),
            "search" => Some(Zone::Search),
            "trending" => Some(Zone::Trending),
            _ => None,
        }
    }

    pub fn sections(&self) -> &'static [SectionId] {
        match self {
            Zone::News => &[SectionId::News],
            Zone::Social => &[SectionId::Social],
            Zone::Music => &[SectionId::Music],
            Zone::Search => &[SectionId::Search],
            Zone::Trending => &[SectionId::TrendingNews, SectionId::TrendingMusic],
        }
    }

    /// Destination section for an item dropped into this zone.
    pub fn section_for(&self, variant: Variant) -> SectionId {
        match self {
            Zone::Trending => {
                if variant == Variant::Music {
                    SectionId::TrendingMusic
                } else {
                    SectionId::TrendingNews
                }
            }
            _ => self.sections()[0],
        }
    }
}

/// One ordered collection plus its fetch state. Ordering is display order:
/// insertion order from fetch by default, user reordering overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub items: Vec<ContentItem>,
    pub error: Option<String>,
    pub has_more: bool,
    pub page: u32,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
            // A never-fetched section is presumed fetchable; the first
            // completed page sets the real value.
            has_more: true,
            page: 0,
        }
    }
}

type Listener = Box<dyn Fn(SectionId) + Send>;

/// In-memory store for all content collections.
///
/// All mutation happens synchronously within a single caller turn; fetch
/// completions replace or append a collection atomically. Collections are
/// never persisted; they are rebuilt from fetches each session.
#[derive(Default)]
pub struct ContentRepository {
    news: Section,
    social: Section,
    music: Section,
    search: Section,
    trending_news: Section,
    trending_music: Section,
    listeners: Vec<Listener>,
}

/// What a repository mutation did, for callers that care (tests, logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Reordered,
    Moved,
    Replaced,
    Appended,
    NoOp,
}

impl ContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, id: SectionId) -> &Section {
        match id {
            SectionId::News => &self.news,
            SectionId::Social => &self.social,
            SectionId::Music => &self.music,
            SectionId::Search => &self.search,
            SectionId::TrendingNews => &self.trending_news,
            SectionId::TrendingMusic => &self.trending_music,
        }
    }

    fn section_mut(&mut self, id: SectionId) -> &mut Section {
        match id {
            SectionId::News => &mut self.news,
            SectionId::Social => &mut self.social,
            SectionId::Music => &mut self.music,
            SectionId::Search => &mut self.search,
            SectionId::TrendingNews => &mut self.trending_news,
            SectionId::TrendingMusic => &mut self.trending_music,
        }
    }

    /// Read-only snapshot accessor for the UI layer.
    pub fn items(&self, id: SectionId) -> &[ContentItem] {
        &self.section(id).items
    }

    /// Register a listener invoked with every section touched by a mutation.
    pub fn subscribe(&mut self, listener: impl Fn(SectionId) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, id: SectionId) {
        for l in &self.listeners {
            l(id);
        }
    }

    /// Move the element with `active_id` to the index `over_id` currently
    /// occupies, using splice semantics: both indices are computed first,
    /// then the element is removed and reinserted. Missing ids make this a
    /// no-op, never an error: the drop target may already have changed.
    pub fn reorder(&mut self, id: SectionId, active_id: &str, over_id: &str) -> Mutation {
        let section = self.section_mut(id);
        if reorder_in_place(&mut section.items, active_id, over_id) {
            debug!(section = id.as_str(), active_id, over_id, "reordered");
            self.notify(id);
            Mutation::Reordered
        } else {
            Mutation::NoOp
        }
    }

    /// Reorder the merged trending view. The concatenation of trendingNews
    /// and trendingMusic is reordered as one list, then split back by the
    /// explicit item discriminant (music goes to trendingMusic, everything
    /// else to trendingNews).
    pub fn reorder_trending(&mut self, active_id: &str, over_id: &str) -> Mutation {
        let mut merged: Vec<ContentItem> = Vec::with_capacity(
            self.trending_news.items.len() + self.trending_music.items.len(),
        );
        merged.extend(self.trending_news.items.iter().cloned());
        merged.extend(self.trending_music.items.iter().cloned());
        if !reorder_in_place(&mut merged, active_id, over_id) {
            return Mutation::NoOp;
        }
        let (music, rest): (Vec<_>, Vec<_>) = merged
            .into_iter()
            .partition(|item| item.variant() == Variant::Music);
        self.trending_news.items = rest;
        self.trending_music.items = music;
        debug!(active_id, over_id, "reordered trending");
        self.notify(SectionId::TrendingNews);
        self.notify(SectionId::TrendingMusic);
        Mutation::Reordered
    }

    /// Relocate one item between collections. A move that fails to find its
    /// source leaves the destination untouched, so an item always has
    /// exactly one logical owner. The item is converted to the destination's
    /// declared variant when needed and appended at the end.
    pub fn move_between(&mut self, item_id: &str, from: SectionId, to: SectionId) -> Mutation {
        if from == to {
            // Same-collection moves are reorders, not moves.
            return Mutation::NoOp;
        }
        let source = self.section_mut(from);
        let Some(index) = source.items.iter().position(|i| i.id() == item_id) else {
            return Mutation::NoOp;
        };
        let item = source.items.remove(index);
        let item = match to.accepted_variant() {
            Some(variant) => convert(item, variant, chrono::Utc::now()),
            None => item,
        };
        self.section_mut(to).items.push(item);
        debug!(item_id, from = from.as_str(), to = to.as_str(), "moved item");
        self.notify(from);
        self.notify(to);
        Mutation::Moved
    }

    /// Apply a fetch completion: page 1 replaces the collection, later pages
    /// append. An exactly full page is the sole signal that more may exist.
    pub fn replace_page(
        &mut self,
        id: SectionId,
        items: Vec<ContentItem>,
        page: u32,
        page_size: usize,
    ) -> Mutation {
        let has_more = items.len() == page_size;
        let section = self.section_mut(id);
        let mutation = if page <= 1 {
            section.items = items;
            Mutation::Replaced
        } else {
            section.items.extend(items);
            Mutation::Appended
        };
        section.page = page;
        section.has_more = has_more;
        section.error = None;
        self.notify(id);
        mutation
    }

    /// Record a fetch failure. Stale items stay visible alongside the error.
    pub fn set_error(&mut self, id: SectionId, message: impl Into<String>) {
        self.section_mut(id).error = Some(message.into());
        self.notify(id);
    }

    pub fn total_items(&self) -> usize {
        SCAN_ORDER.iter().map(|id| self.items(*id).len()).sum()
    }
}

fn reorder_in_place(items: &mut Vec<ContentItem>, active_id: &str, over_id: &str) -> bool {
    let Some(old_index) = items.iter().position(|i| i.id() == active_id) else {
        return false;
    };
    let Some(new_index) = items.iter().position(|i| i.id() == over_id) else {
        return false;
    };
    let item = items.remove(old_index);
    items.insert(new_index, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MusicItem, NewsItem};
    use chrono::Utc;

    fn news(id: &str) -> ContentItem {
        ContentItem::News(NewsItem {
            id: id.to_string(),
            title: format!("Article {id}"),
            description: "desc".to_string(),
            url: "https://example.com".to_string(),
            image_url: "https://example.com/image.jpg".to_string(),
            published_at: Utc::now(),
            source_name: "Test Source".to_string(),
            category: "technology".to_string(),
        })
    }

    fn music(id: &str) -> ContentItem {
        ContentItem::Music(MusicItem {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist_names: vec!["Test Artist".to_string()],
            album_name: "Test Album".to_string(),
            album_image_url: None,
            release_date: "2023-01-01".to_string(),
            spotify_url: "https://open.spotify.com/track/test".to_string(),
            popularity: 80,
            duration_ms: 180_000,
        })
    }

    fn ids(repo: &ContentRepository, id: SectionId) -> Vec<&str> {
        repo.items(id).iter().map(|i| i.id()).collect()
    }

    fn seeded() -> ContentRepository {
        let mut repo = ContentRepository::new();
        repo.replace_page(
            SectionId::News,
            vec![news("n1"), news("n2"), news("n3")],
            1,
            20,
        );
        repo.replace_page(SectionId::Music, vec![music("m1"), music("m2")], 1, 20);
        repo
    }

    #[test]
    fn reorder_moves_active_to_over_index() {
        let mut repo = seeded();
        assert_eq!(
            repo.reorder(SectionId::News, "n1", "n3"),
            Mutation::Reordered
        );
        assert_eq!(ids(&repo, SectionId::News), vec!["n2", "n3", "n1"]);
    }

    #[test]
    fn reorder_is_a_permutation() {
        let mut repo = seeded();
        let mut before = ids(&repo, SectionId::News)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        repo.reorder(SectionId::News, "n3", "n1");
        let mut after = ids(&repo, SectionId::News)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn reorder_missing_id_is_identity() {
        let mut repo = seeded();
        assert_eq!(repo.reorder(SectionId::News, "n1", "ghost"), Mutation::NoOp);
        assert_eq!(repo.reorder(SectionId::News, "ghost", "n1"), Mutation::NoOp);
        assert_eq!(ids(&repo, SectionId::News), vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn move_preserves_total_count_and_relocates() {
        let mut repo = seeded();
        let before = repo.items(SectionId::Music).len() + repo.items(SectionId::News).len();
        assert_eq!(
            repo.move_between("m1", SectionId::Music, SectionId::News),
            Mutation::Moved
        );
        let after = repo.items(SectionId::Music).len() + repo.items(SectionId::News).len();
        assert_eq!(before, after);
        assert!(!ids(&repo, SectionId::Music).contains(&"m1"));
        assert_eq!(
            ids(&repo, SectionId::News)
                .iter()
                .filter(|id| **id == "m1")
                .count(),
            1
        );
    }

    #[test]
    fn move_converts_to_destination_variant() {
        let mut repo = seeded();
        repo.move_between("m1", SectionId::Music, SectionId::News);
        let landed = repo
            .items(SectionId::News)
            .iter()
            .find(|i| i.id() == "m1")
            .unwrap();
        assert_eq!(landed.variant(), Variant::News);
    }

    #[test]
    fn move_into_search_keeps_variant() {
        let mut repo = seeded();
        repo.move_between("m1", SectionId::Music, SectionId::Search);
        let landed = repo
            .items(SectionId::Search)
            .iter()
            .find(|i| i.id() == "m1")
            .unwrap();
        assert_eq!(landed.variant(), Variant::Music);
    }

    #[test]
    fn move_with_missing_source_leaves_both_untouched() {
        let mut repo = seeded();
        assert_eq!(
            repo.move_between("ghost", SectionId::Music, SectionId::News),
            Mutation::NoOp
        );
        assert_eq!(ids(&repo, SectionId::Music), vec!["m1", "m2"]);
        assert_eq!(ids(&repo, SectionId::News), vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn move_to_same_section_is_noop() {
        let mut repo = seeded();
        assert_eq!(
            repo.move_between("m1", SectionId::Music, SectionId::Music),
            Mutation::NoOp
        );
        assert_eq!(ids(&repo, SectionId::Music), vec!["m1", "m2"]);
    }

    #[test]
    fn replace_page_then_append_sets_has_more_heuristic() {
        let mut repo = ContentRepository::new();
        let full: Vec<_> = (0..20).map(|i| news(&format!("p1-{i}"))).collect();
        repo.replace_page(SectionId::News, full, 1, 20);
        assert!(repo.section(SectionId::News).has_more);

        let partial: Vec<_> = (0..5).map(|i| news(&format!("p2-{i}"))).collect();
        repo.replace_page(SectionId::News, partial, 2, 20);
        let section = repo.section(SectionId::News);
        assert_eq!(section.items.len(), 25);
        assert!(!section.has_more);
        assert_eq!(section.page, 2);
    }

    #[test]
    fn fresh_sections_presume_more_content() {
        let repo = ContentRepository::new();
        for id in SCAN_ORDER {
            let section = repo.section(id);
            assert!(section.has_more);
            assert_eq!(section.page, 0);
            assert!(section.items.is_empty());
        }
        // The first short page flips the presumption off.
        let mut repo = repo;
        repo.replace_page(SectionId::News, vec![news("n1")], 1, 20);
        assert!(!repo.section(SectionId::News).has_more);
    }

    #[test]
    fn replace_page_one_replaces_wholesale() {
        let mut repo = seeded();
        repo.replace_page(SectionId::News, vec![news("fresh")], 1, 20);
        assert_eq!(ids(&repo, SectionId::News), vec!["fresh"]);
    }

    #[test]
    fn set_error_keeps_stale_items() {
        let mut repo = seeded();
        repo.set_error(SectionId::News, "NewsAPI error: 429");
        let section = repo.section(SectionId::News);
        assert_eq!(section.error.as_deref(), Some("NewsAPI error: 429"));
        assert_eq!(section.items.len(), 3);
    }

    #[test]
    fn trending_reorder_splits_by_discriminant() {
        let mut repo = ContentRepository::new();
        repo.replace_page(SectionId::TrendingNews, vec![news("t1"), news("t2")], 1, 5);
        repo.replace_page(SectionId::TrendingMusic, vec![music("t3")], 1, 5);
        // Drag the music track to the front of the merged list.
        assert_eq!(repo.reorder_trending("t3", "t1"), Mutation::Reordered);
        // Split is by discriminant, not by position: the track stays in
        // trendingMusic even though it was dropped among news items.
        assert_eq!(ids(&repo, SectionId::TrendingNews), vec!["t1", "t2"]);
        assert_eq!(ids(&repo, SectionId::TrendingMusic), vec!["t3"]);
    }

    #[test]
    fn trending_reorder_keeps_converted_news_shaped_track_in_news() {
        let mut repo = ContentRepository::new();
        repo.replace_page(SectionId::TrendingNews, vec![news("t1")], 1, 5);
        repo.replace_page(SectionId::TrendingMusic, vec![music("t2")], 1, 5);
        // A track moved into trendingNews is converted to the news shape.
        repo.move_between("t2", SectionId::TrendingMusic, SectionId::TrendingNews);
        repo.replace_page(SectionId::TrendingMusic, vec![music("t3")], 1, 5);
        repo.reorder_trending("t3", "t1");
        // The converted item carries the news discriminant, so it cannot
        // misclassify back into trendingMusic.
        assert!(ids(&repo, SectionId::TrendingNews).contains(&"t2"));
        assert_eq!(ids(&repo, SectionId::TrendingMusic), vec!["t3"]);
    }

    #[test]
    fn listeners_observe_touched_sections() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut repo = seeded();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        repo.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        repo.move_between("m1", SectionId::Music, SectionId::News);
        // Source and destination both notify.
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
