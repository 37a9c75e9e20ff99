//! Bookmark list kept as one JSON array under a single storage key.

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::KeyValueStorage;
use crate::error::BookmarkError;
use crate::notifications::Messages;
use crate::parser::ArticleLinker;
use crate::prefs::{BlogPreferences, DEFAULT_MAX_BOOKMARKS, DEFAULT_STORAGE_KEY};

/// Number of titles listed in the bookmark counter preview.
const PREVIEW_TITLES: usize = 3;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "addedAt")]
    pub added_at: String,
}

impl BookmarkEntry {
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.added_at)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleState {
    Added,
    Removed,
}

#[derive(Clone, Debug)]
pub struct ToggleOutcome {
    pub state: ToggleState,
    /// The list as written, newest first.
    pub bookmarks: Vec<BookmarkEntry>,
    /// False when the storage backend rejected the write.
    pub persisted: bool,
}

pub struct BookmarkStore<S> {
    storage: S,
    key: String,
    capacity: usize,
    linker: ArticleLinker,
    placeholder_title: String,
}

impl<S: KeyValueStorage> BookmarkStore<S> {
    pub fn new(storage: S, linker: ArticleLinker) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_owned(),
            capacity: DEFAULT_MAX_BOOKMARKS,
            linker,
            placeholder_title: Messages::ZH.unknown_article.to_owned(),
        }
    }

    pub fn from_preferences(storage: S, linker: ArticleLinker, prefs: &BlogPreferences) -> Self {
        Self {
            storage,
            key: prefs.storage_key.clone(),
            // A capacity of 0 would drop every insert while reporting it as added.
            capacity: prefs.max_bookmarks.max(1),
            linker,
            placeholder_title: Messages::for_locale(prefs.locale)
                .unknown_article
                .to_owned(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Add the article if it is not bookmarked yet, remove it otherwise.
    pub fn toggle(
        &self,
        article_id: &str,
        title: Option<&str>,
    ) -> Result<ToggleOutcome, BookmarkError> {
        self.toggle_at(article_id, title, Utc::now())
    }

    pub fn toggle_at(
        &self,
        article_id: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, BookmarkError> {
        if article_id.trim().is_empty() {
            return Err(BookmarkError::EmptyArticleId);
        }

        let mut bookmarks = self.list();
        let state = match bookmarks.iter().position(|entry| entry.id == article_id) {
            Some(index) => {
                bookmarks.remove(index);
                ToggleState::Removed
            },
            None => {
                bookmarks.insert(0, self.new_entry(article_id, title, now));
                ToggleState::Added
            },
        };
        bookmarks.truncate(self.capacity);

        let persisted = self.write(&bookmarks);
        debug!("Bookmark {article_id} {state:?}, {} stored", bookmarks.len());
        Ok(ToggleOutcome {
            state,
            bookmarks,
            persisted,
        })
    }

    /// The stored list, newest first. Missing or unreadable data reads as empty.
    pub fn list(&self) -> Vec<BookmarkEntry> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Failed to read bookmarks: {err}");
                return Vec::new();
            },
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            debug!("Discarding unreadable bookmark data: {err}");
            Vec::new()
        })
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }

    pub fn is_bookmarked(&self, article_id: &str) -> bool {
        self.list().iter().any(|entry| entry.id == article_id)
    }

    /// Text for the bookmark counter's hover preview: the newest titles and,
    /// for longer lists, how many more there are.
    pub fn preview(&self, messages: &Messages) -> Option<String> {
        let bookmarks = self.list();
        if bookmarks.is_empty() {
            return None;
        }
        let mut lines: Vec<String> = bookmarks
            .iter()
            .take(PREVIEW_TITLES)
            .map(|entry| entry.title.clone())
            .collect();
        if bookmarks.len() > PREVIEW_TITLES {
            lines.push(messages.more_bookmarks(bookmarks.len() - PREVIEW_TITLES));
        }
        Some(lines.join("\n"))
    }

    pub fn clear(&self) -> bool {
        match self.storage.remove_item(&self.key) {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to clear bookmarks: {err}");
                false
            },
        }
    }

    fn new_entry(&self, article_id: &str, title: Option<&str>, now: DateTime<Utc>) -> BookmarkEntry {
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(self.placeholder_title.as_str());
        BookmarkEntry {
            id: article_id.to_owned(),
            title: title.to_owned(),
            url: self.linker.article_url(article_id).into(),
            added_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn write(&self, bookmarks: &[BookmarkEntry]) -> bool {
        let serialized = match serde_json::to_string(bookmarks) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("Failed to serialize bookmarks: {err}");
                return false;
            },
        };
        match self.storage.set_item(&self.key, &serialized) {
            Ok(()) => true,
            Err(err) => {
                warn!("Bookmarks not saved: {err}");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::data_storage::MemoryStorage;

    fn store() -> BookmarkStore<MemoryStorage> {
        BookmarkStore::new(
            MemoryStorage::new(),
            ArticleLinker::new("https://blog.example.com").unwrap(),
        )
    }

    fn ids<S: KeyValueStorage>(store: &BookmarkStore<S>) -> Vec<String> {
        store.list().into_iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let store = store();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let outcome = store.toggle_at("a1", Some("  Hello  "), now).unwrap();
        assert_eq!(outcome.state, ToggleState::Added);
        assert!(outcome.persisted);
        assert_eq!(
            outcome.bookmarks,
            vec![BookmarkEntry {
                id: "a1".into(),
                title: "Hello".into(),
                url: "https://blog.example.com/article/a1".into(),
                added_at: "2024-05-01T12:00:00.000Z".into(),
            }]
        );
        assert_eq!(store.list(), outcome.bookmarks);

        let outcome = store.toggle("a1", None).unwrap();
        assert_eq!(outcome.state, ToggleState::Removed);
        assert!(outcome.bookmarks.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn toggling_twice_restores_id_set() {
        let store = store();
        for id in ["x", "y", "z"] {
            store.toggle(id, None).unwrap();
        }
        let before = ids(&store);

        store.toggle("y", None).unwrap();
        assert_eq!(ids(&store), ["z", "x"]);
        store.toggle("y", None).unwrap();

        let mut after = ids(&store);
        let mut expected = before.clone();
        after.sort();
        expected.sort();
        assert_eq!(after, expected);
        // Re-added ids move to the front.
        assert_eq!(ids(&store), ["y", "z", "x"]);
    }

    #[test]
    fn keeps_only_the_newest_fifty() {
        let store = store();
        for n in 1..=51 {
            store.toggle(&format!("a{n}"), None).unwrap();
        }

        let expected: Vec<String> = (2..=51).rev().map(|n| format!("a{n}")).collect();
        assert_eq!(ids(&store), expected);
        assert_eq!(store.count(), 50);
        assert!(!store.is_bookmarked("a1"));
        assert!(store.is_bookmarked("a51"));
    }

    #[test]
    fn custom_capacity_and_key() {
        let prefs = BlogPreferences {
            storage_key: "saved".into(),
            max_bookmarks: 2,
            ..Default::default()
        };
        let linker = ArticleLinker::new(&prefs.origin).unwrap();
        let store = BookmarkStore::from_preferences(MemoryStorage::new(), linker, &prefs);
        for id in ["a", "b", "c"] {
            store.toggle(id, None).unwrap();
        }
        assert_eq!(ids(&store), ["c", "b"]);
        assert!(store.storage().get_item("saved").unwrap().is_some());
        assert!(store.storage().get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn zero_capacity_still_keeps_newest() {
        let prefs = BlogPreferences {
            max_bookmarks: 0,
            ..Default::default()
        };
        let linker = ArticleLinker::new(&prefs.origin).unwrap();
        let store = BookmarkStore::from_preferences(MemoryStorage::new(), linker, &prefs);

        assert_eq!(store.toggle("a1", None).unwrap().state, ToggleState::Added);
        assert_eq!(ids(&store), ["a1"]);
        assert_eq!(store.toggle("a1", None).unwrap().state, ToggleState::Removed);
        assert_eq!(store.count(), 0);

        store.toggle("a1", None).unwrap();
        store.toggle("a2", None).unwrap();
        assert_eq!(ids(&store), ["a2"]);
    }

    #[test]
    fn removal_matches_on_id_only() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[
                    {"id":"a1","title":"Same","url":"https://x/article/a1","addedAt":"2024-01-01T00:00:00.000Z"},
                    {"id":"a2","title":"Same","url":"https://x/article/a1","addedAt":"2024-01-01T00:00:00.000Z"}
                ]"#,
            )
            .unwrap();
        let store = BookmarkStore::new(storage, ArticleLinker::new("https://x").unwrap());

        let outcome = store.toggle("a2", Some("Same")).unwrap();
        assert_eq!(outcome.state, ToggleState::Removed);
        assert_eq!(ids(&store), ["a1"]);
    }

    #[test]
    fn blank_title_falls_back_to_placeholder() {
        let store = store();
        let outcome = store.toggle("a1", Some("   ")).unwrap();
        assert_eq!(outcome.bookmarks[0].title, "未知文章");

        let prefs = BlogPreferences {
            locale: crate::prefs::Locale::En,
            ..Default::default()
        };
        let store = BookmarkStore::from_preferences(
            MemoryStorage::new(),
            ArticleLinker::new(&prefs.origin).unwrap(),
            &prefs,
        );
        let outcome = store.toggle("a1", None).unwrap();
        assert_eq!(outcome.bookmarks[0].title, "Unknown article");
    }

    #[test]
    fn empty_id_is_rejected() {
        let store = store();
        assert!(matches!(store.toggle("", None), Err(BookmarkError::EmptyArticleId)));
        assert!(matches!(store.toggle("  ", None), Err(BookmarkError::EmptyArticleId)));
        assert!(store.storage().is_empty());
    }

    #[test]
    fn corrupt_data_reads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let store = BookmarkStore::new(storage, ArticleLinker::new("https://x").unwrap());
        assert_eq!(store.count(), 0);

        // The next toggle overwrites the corrupt value.
        store.toggle("a1", None).unwrap();
        assert_eq!(ids(&store), ["a1"]);
    }

    #[test]
    fn failed_write_is_reported_not_raised() {
        let store = BookmarkStore::new(
            MemoryStorage::with_quota(16),
            ArticleLinker::new("https://blog.example.com").unwrap(),
        );
        let outcome = store.toggle("a1", Some("A title")).unwrap();
        assert_eq!(outcome.state, ToggleState::Added);
        assert!(!outcome.persisted);
        assert_eq!(outcome.bookmarks.len(), 1);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn count_matches_list_length() {
        let store = store();
        assert_eq!(store.count(), 0);
        for n in 0..7 {
            store.toggle(&n.to_string(), None).unwrap();
            assert_eq!(store.count(), store.list().len());
        }
        store.toggle("3", None).unwrap();
        assert_eq!(store.count(), 6);
    }

    #[test]
    fn preview_lists_newest_titles() {
        let store = store();
        assert_eq!(store.preview(&Messages::ZH), None);

        for (id, title) in [("1", "One"), ("2", "Two")] {
            store.toggle(id, Some(title)).unwrap();
        }
        assert_eq!(store.preview(&Messages::ZH).as_deref(), Some("Two\nOne"));

        for (id, title) in [("3", "Three"), ("4", "Four"), ("5", "Five")] {
            store.toggle(id, Some(title)).unwrap();
        }
        assert_eq!(
            store.preview(&Messages::ZH).as_deref(),
            Some("Five\nFour\nThree\n... 还有2条")
        );
        assert_eq!(
            store.preview(&Messages::EN).as_deref(),
            Some("Five\nFour\nThree\n... and 2 more")
        );
    }

    #[test]
    fn reads_records_written_by_the_browser() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"rec1","title":"Hi","url":"https://x/article/rec1","addedAt":"2024-03-09T08:07:06.123Z"}]"#,
            )
            .unwrap();
        let store = BookmarkStore::new(storage, ArticleLinker::new("https://x").unwrap());
        let entry = &store.list()[0];
        assert_eq!(
            entry.added_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap() + chrono::Duration::milliseconds(123))
        );
        assert!(store.clear());
        assert_eq!(store.count(), 0);
    }
}
