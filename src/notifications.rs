/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Toast notifications and the user-visible strings they carry.

use std::time::{Duration, Instant};

use crate::prefs::Locale;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);
pub const LONG_TOAST_DURATION: Duration = Duration::from_millis(5000);
/// Time a toast keeps fading out after its duration has elapsed.
pub const TOAST_FADE_OUT: Duration = Duration::from_millis(300);

/// Localized user-facing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub bookmark_added: &'static str,
    pub bookmark_removed: &'static str,
    pub bookmark_label: &'static str,
    pub bookmarked_label: &'static str,
    pub unknown_article: &'static str,
    more_bookmarks: &'static str,
    cache_badge: &'static str,
    cache_badge_title: &'static str,
    pub cache_badge_unknown: &'static str,
    pub share_text: &'static str,
    pub link_copied: &'static str,
    pub copy_link_prompt: &'static str,
    pub online: &'static str,
    pub offline: &'static str,
    script_error: &'static str,
}

impl Messages {
    pub const ZH: Messages = Messages {
        bookmark_added: "文章已收藏! 💾",
        bookmark_removed: "已取消收藏",
        bookmark_label: "收藏",
        bookmarked_label: "已收藏",
        unknown_article: "未知文章",
        more_bookmarks: "... 还有{}条",
        cache_badge: "缓存: {} 条",
        cache_badge_title: "缓存中有 {} 条记录，点击刷新",
        cache_badge_unknown: "缓存: 未知",
        share_text: "阅读这篇来自飞书博客的文章",
        link_copied: "文章链接已复制到剪贴板",
        copy_link_prompt: "复制以下链接分享：",
        online: "网络已恢复连接",
        offline: "网络已断开，部分功能可能不可用",
        script_error: "脚本错误: {}",
    };

    pub const EN: Messages = Messages {
        bookmark_added: "Article bookmarked! 💾",
        bookmark_removed: "Bookmark removed",
        bookmark_label: "Bookmark",
        bookmarked_label: "Bookmarked",
        unknown_article: "Unknown article",
        more_bookmarks: "... and {} more",
        cache_badge: "Cache: {} entries",
        cache_badge_title: "{} entries cached, click to refresh",
        cache_badge_unknown: "Cache: unknown",
        share_text: "Read this article from the blog",
        link_copied: "Article link copied to clipboard",
        copy_link_prompt: "Copy this link to share:",
        online: "Back online",
        offline: "You are offline, some features may be unavailable",
        script_error: "Script error: {}",
    };

    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Zh => &Self::ZH,
            Locale::En => &Self::EN,
        }
    }

    pub fn more_bookmarks(&self, remaining: usize) -> String {
        fill(self.more_bookmarks, remaining)
    }

    pub fn cache_badge(&self, cache_size: u64) -> String {
        fill(self.cache_badge, cache_size)
    }

    pub fn cache_badge_title(&self, cache_size: u64) -> String {
        fill(self.cache_badge_title, cache_size)
    }

    pub fn script_error(&self, message: &str) -> String {
        fill(self.script_error, message)
    }
}

fn fill(template: &str, value: impl std::fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_duration(message, DEFAULT_TOAST_DURATION)
    }

    pub fn with_duration(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
        }
    }
}

#[derive(Debug)]
struct ShownToast {
    toast: Toast,
    shown_at: Instant,
}

/// Holds the single toast on screen. Showing a toast replaces the previous one.
#[derive(Debug, Default)]
pub struct ToastCenter {
    shown: Option<ShownToast>,
}

impl ToastCenter {
    pub fn show(&mut self, toast: Toast, now: Instant) {
        if let Some(previous) = self.shown.take() {
            log::trace!("Replacing toast {:?}", previous.toast.message);
        }
        self.shown = Some(ShownToast {
            toast,
            shown_at: now,
        });
    }

    /// The toast still on screen at `now`, including its fade-out.
    pub fn current(&self, now: Instant) -> Option<&Toast> {
        let shown = self.shown.as_ref()?;
        let visible_for = shown.toast.duration + TOAST_FADE_OUT;
        (now.saturating_duration_since(shown.shown_at) < visible_for).then_some(&shown.toast)
    }

    /// Whether the toast at `now` is past its duration and fading out.
    pub fn is_fading(&self, now: Instant) -> bool {
        self.shown.as_ref().is_some_and(|shown| {
            let elapsed = now.saturating_duration_since(shown.shown_at);
            elapsed >= shown.toast.duration && elapsed < shown.toast.duration + TOAST_FADE_OUT
        })
    }

    /// Drop an expired toast.
    pub fn prune(&mut self, now: Instant) {
        if self.current(now).is_none() {
            self.shown = None;
        }
    }
}
