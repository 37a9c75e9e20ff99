/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a [`crate::data_storage::KeyValueStorage`] backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend refused the write because it would exceed its quota.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// No storage area is reachable (e.g. `localStorage` disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("article id must not be empty")]
    EmptyArticleId,
}

/// Failure while polling the health endpoint for the cache badge.
#[derive(Error, Debug)]
pub enum HealthError {
    #[error("health request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("health endpoint answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid health endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("share target `{target}` is not available")]
    Unavailable { target: &'static str },

    #[error("share was rejected: {0}")]
    Rejected(String),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("could not read preferences file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid origin '{origin}': {source}")]
    Origin {
        origin: String,
        #[source]
        source: url::ParseError,
    },

    #[error("origin '{0}' cannot carry article paths")]
    OpaqueOrigin(String),

    #[error("no configuration directory on this platform")]
    NoConfigDir,
}

/// Anything that stops the command line front-end.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Bookmark(#[from] BookmarkError),

    #[error(transparent)]
    Health(#[from] HealthError),

    #[error("could not start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}
