use crate::item::ContentItem;
use crate::repository::{ContentRepository, SectionId, SCAN_ORDER};

/// A located item and the collection that owns it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub section: SectionId,
    pub item: &'a ContentItem,
}

/// Linear scan across all collections in the fixed priority order
/// (news, social, music, search, trendingNews, trendingMusic).
///
/// Ids are unique within a collection but not globally; if the same id
/// exists in two collections, the earlier-listed one wins. That tie-break
/// is a documented design choice, relied on by drop-target resolution.
pub fn locate<'a>(repo: &'a ContentRepository, item_id: &str) -> Option<Located<'a>> {
    for section in SCAN_ORDER {
        if let Some(item) = repo.items(section).iter().find(|i| i.id() == item_id) {
            return Some(Located { section, item });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MusicItem, NewsItem};
    use chrono::Utc;

    fn news(id: &str) -> ContentItem {
        ContentItem::News(NewsItem {
            id: id.to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            url: String::new(),
            image_url: String::new(),
            published_at: Utc::now(),
            source_name: "s".to_string(),
            category: "c".to_string(),
        })
    }

    fn music(id: &str) -> ContentItem {
        ContentItem::Music(MusicItem {
            id: id.to_string(),
            title: "t".to_string(),
            artist_names: vec![],
            album_name: "a".to_string(),
            album_image_url: None,
            release_date: "2023-01-01".to_string(),
            spotify_url: String::new(),
            popularity: 0,
            duration_ms: 0,
        })
    }

    #[test]
    fn finds_item_in_owning_section() {
        let mut repo = ContentRepository::new();
        repo.replace_page(SectionId::Music, vec![music("m1")], 1, 20);
        let found = locate(&repo, "m1").unwrap();
        assert_eq!(found.section, SectionId::Music);
        assert_eq!(found.item.id(), "m1");
        assert!(locate(&repo, "ghost").is_none());
    }

    #[test]
    fn duplicate_id_resolves_to_earlier_section_deterministically() {
        // The repository never creates duplicates itself; seed them
        // artificially to pin down the tie-break.
        let mut repo = ContentRepository::new();
        repo.replace_page(SectionId::Search, vec![music("dup")], 1, 20);
        repo.replace_page(SectionId::News, vec![news("dup")], 1, 20);
        for _ in 0..10 {
            let found = locate(&repo, "dup").unwrap();
            assert_eq!(found.section, SectionId::News);
        }
    }
}
