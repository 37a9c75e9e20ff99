/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

pub const DEFAULT_STORAGE_KEY: &str = "blog_bookmarks";
pub const DEFAULT_MAX_BOOKMARKS: usize = 50;
pub const PREFS_FILE_NAME: &str = "prefs.json";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" => Ok(Locale::Zh),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale `{other}`")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BlogPreferences {
    /// Scheme, host and port of the blog, e.g. <https://blog.example.com>.
    /// Article URLs are built as `{origin}/article/{id}`.
    pub origin: String,
    /// Key the bookmark list is stored under.
    pub storage_key: String,
    pub max_bookmarks: usize,
    pub cache_poll_interval_secs: u64,
    /// Path of the health endpoint relative to `origin`.
    pub health_path: String,
    pub toast_duration_ms: u64,
    pub locale: Locale,
}

impl Default for BlogPreferences {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5000".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            max_bookmarks: DEFAULT_MAX_BOOKMARKS,
            cache_poll_interval_secs: 30,
            health_path: "/api/health".into(),
            toast_duration_ms: 3000,
            locale: Locale::default(),
        }
    }
}

impl BlogPreferences {
    pub fn cache_poll_interval(&self) -> Duration {
        Duration::from_secs(self.cache_poll_interval_secs.max(1))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_config_dir() -> Result<PathBuf, PrefsError> {
    let mut config_dir = dirs::config_dir().ok_or(PrefsError::NoConfigDir)?;
    config_dir.push("blog_enhance");
    Ok(config_dir)
}

/// Read preferences from `path`, or from `prefs.json` in the default config
/// directory when no path is given. A missing default file yields the
/// defaults; a missing explicit file is an error.
pub fn load_preferences(path: Option<&Path>) -> Result<BlogPreferences, PrefsError> {
    match path {
        Some(path) => read_prefs_file(path),
        None => {
            #[cfg(not(target_arch = "wasm32"))]
            {
                let path = default_config_dir()?.join(PREFS_FILE_NAME);
                if path.exists() {
                    return read_prefs_file(&path);
                }
                debug!("No preferences file at {}, using defaults", path.display());
            }
            Ok(BlogPreferences::default())
        },
    }
}

fn read_prefs_file(path: &Path) -> Result<BlogPreferences, PrefsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PrefsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| PrefsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
