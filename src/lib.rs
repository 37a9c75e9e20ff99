/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Page enhancements for a personal blog: a bookmark list kept in key-value
//! storage, toast notifications, a polled cache-status badge and article
//! sharing.

#[cfg(test)]
mod test;

pub mod app;
pub mod cache_status;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod data_storage;
pub mod error;
pub mod event_loop;
pub mod notifications;
pub mod parser;
pub mod prefs;
pub mod share;

pub use data_storage::KeyValueStorage;
pub use data_storage::bookmarks::{BookmarkEntry, BookmarkStore, ToggleOutcome, ToggleState};

#[cfg(not(target_arch = "wasm32"))]
pub fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::cli_args().run();
    match cli::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        },
    }
}
