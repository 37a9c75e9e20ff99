/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Page-level state: reacts to user interface commands and background events.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, warn};

use crate::cache_status::{CacheStatus, CacheStatusPoller};
use crate::data_storage::KeyValueStorage;
use crate::data_storage::bookmarks::{BookmarkStore, ToggleState};
use crate::event_loop::AppEvent;
use crate::notifications::{LONG_TOAST_DURATION, Messages, Toast, ToastCenter};
use crate::parser::{ArticleLinker, article_id_from_path};
use crate::prefs::BlogPreferences;
use crate::share::{ShareOutcome, ShareRequest, Sharer};

/// A command received via the user interacting with the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserInterfaceCommand {
    ToggleBookmark {
        article_id: String,
        title: Option<String>,
    },
    Share {
        article_id: String,
        title: Option<String>,
    },
    /// Click on the cache badge.
    RefreshCacheStatus,
    KeyPressed {
        key: String,
        ctrl: bool,
        page_path: String,
        page_title: Option<String>,
    },
    ConnectivityChanged {
        online: bool,
    },
    ScriptError {
        message: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookmarkButton {
    pub label: &'static str,
    pub bookmarked: bool,
}

impl BookmarkButton {
    fn new(bookmarked: bool, messages: &Messages) -> Self {
        let label = if bookmarked {
            messages.bookmarked_label
        } else {
            messages.bookmark_label
        };
        Self { label, bookmarked }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheBadge {
    pub text: String,
    pub title: Option<String>,
}

pub struct App<S> {
    store: BookmarkStore<S>,
    linker: ArticleLinker,
    messages: &'static Messages,
    toast_duration: Duration,
    toasts: ToastCenter,
    sharer: Sharer,
    buttons: HashMap<String, BookmarkButton>,
    bookmark_count: usize,
    bookmark_preview: Option<String>,
    cache_badge: Option<CacheBadge>,
    cache_poller: Option<CacheStatusPoller>,
    events: Receiver<AppEvent>,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(
        store: BookmarkStore<S>,
        linker: ArticleLinker,
        prefs: &BlogPreferences,
        sharer: Sharer,
        events: Receiver<AppEvent>,
    ) -> Self {
        let mut app = App {
            store,
            linker,
            messages: Messages::for_locale(prefs.locale),
            toast_duration: prefs.toast_duration(),
            toasts: ToastCenter::default(),
            sharer,
            buttons: HashMap::new(),
            bookmark_count: 0,
            bookmark_preview: None,
            cache_badge: None,
            cache_poller: None,
            events,
        };
        app.refresh_bookmark_counter();
        app
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    pub fn store(&self) -> &BookmarkStore<S> {
        &self.store
    }

    /// Track a bookmark button on the page, starting from the stored state.
    pub fn register_bookmark_button(&mut self, article_id: &str) -> BookmarkButton {
        let button = BookmarkButton::new(self.store.is_bookmarked(article_id), self.messages);
        self.buttons.insert(article_id.to_owned(), button);
        button
    }

    pub fn bookmark_button(&self, article_id: &str) -> Option<BookmarkButton> {
        self.buttons.get(article_id).copied()
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmark_count
    }

    pub fn bookmark_preview(&self) -> Option<&str> {
        self.bookmark_preview.as_deref()
    }

    pub fn cache_badge(&self) -> Option<&CacheBadge> {
        self.cache_badge.as_ref()
    }

    pub fn current_toast(&self, now: Instant) -> Option<&Toast> {
        self.toasts.current(now)
    }

    pub fn attach_cache_poller(&mut self, poller: CacheStatusPoller) {
        if self.cache_poller.replace(poller).is_some() {
            debug!("Replaced running cache status poller");
        }
    }

    pub fn take_cache_poller(&mut self) -> Option<CacheStatusPoller> {
        self.cache_poller.take()
    }

    pub fn handle_interface_commands(&mut self, commands: Vec<UserInterfaceCommand>, now: Instant) {
        for command in commands {
            match command {
                UserInterfaceCommand::ToggleBookmark { article_id, title } => {
                    self.toggle_bookmark(&article_id, title.as_deref(), now);
                },
                UserInterfaceCommand::Share { article_id, title } => {
                    self.share_article(&article_id, title.as_deref(), now);
                },
                UserInterfaceCommand::RefreshCacheStatus => match &self.cache_poller {
                    Some(poller) => poller.refresh_now(),
                    None => debug!("No cache status poller to refresh"),
                },
                UserInterfaceCommand::KeyPressed {
                    key,
                    ctrl,
                    page_path,
                    page_title,
                } => self.handle_key(&key, ctrl, &page_path, page_title.as_deref(), now),
                UserInterfaceCommand::ConnectivityChanged { online } => {
                    let toast = if online {
                        Toast::with_duration(self.messages.online, self.toast_duration)
                    } else {
                        Toast::with_duration(self.messages.offline, LONG_TOAST_DURATION)
                    };
                    self.toasts.show(toast, now);
                },
                UserInterfaceCommand::ScriptError { message } => {
                    warn!("Script error: {message}");
                    // Only surfaced to whoever is developing locally.
                    if self.linker.host() == Some("localhost") && !message.is_empty() {
                        let toast = Toast::with_duration(
                            self.messages.script_error(&message),
                            LONG_TOAST_DURATION,
                        );
                        self.toasts.show(toast, now);
                    }
                },
            }
        }
    }

    /// Apply all events queued by background tasks. Returns how many there were.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_app_event(event);
            handled += 1;
        }
        handled
    }

    /// Block until one event arrives or `timeout` passes.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.events.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_app_event(event);
                true
            },
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("All event senders are gone");
                false
            },
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CacheStatus(status) => self.update_cache_badge(status),
        }
    }

    fn update_cache_badge(&mut self, status: CacheStatus) {
        let badge = self.cache_badge.get_or_insert_with(CacheBadge::default);
        badge.text = status.badge_text(self.messages);
        if let Some(title) = status.badge_title(self.messages) {
            badge.title = Some(title);
        }
    }

    fn toggle_bookmark(&mut self, article_id: &str, title: Option<&str>, now: Instant) {
        let outcome = match self.store.toggle(article_id, title) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Ignoring bookmark toggle: {err}");
                return;
            },
        };

        let bookmarked = outcome.state == ToggleState::Added;
        self.buttons.insert(
            article_id.to_owned(),
            BookmarkButton::new(bookmarked, self.messages),
        );
        let message = match outcome.state {
            ToggleState::Added => self.messages.bookmark_added,
            ToggleState::Removed => self.messages.bookmark_removed,
        };
        self.toasts
            .show(Toast::with_duration(message, self.toast_duration), now);
        self.refresh_bookmark_counter();
    }

    fn share_article(&mut self, article_id: &str, title: Option<&str>, now: Instant) {
        let request = ShareRequest::for_article(article_id, title, &self.linker, self.messages);
        let outcome = self.sharer.share(&request);
        if let Some(message) = outcome.message(self.messages) {
            let duration = match outcome {
                ShareOutcome::ManualCopy(_) => LONG_TOAST_DURATION,
                _ => self.toast_duration,
            };
            self.toasts.show(Toast::with_duration(message, duration), now);
        }
    }

    fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        page_path: &str,
        page_title: Option<&str>,
        now: Instant,
    ) {
        if key == "Escape" {
            debug!("Escape pressed");
            return;
        }
        if ctrl && key.eq_ignore_ascii_case("d") {
            match article_id_from_path(page_path) {
                Some(article_id) => self.toggle_bookmark(article_id, page_title, now),
                None => debug!("No article at {page_path} to bookmark"),
            }
        }
    }

    fn refresh_bookmark_counter(&mut self) {
        self.bookmark_count = self.store.count();
        self.bookmark_preview = self.store.preview(self.messages);
    }
}
