/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command line front-end driving the page logic against a SQLite store.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use bpaf::Bpaf;
use log::warn;

use crate::app::{App, UserInterfaceCommand};
use crate::cache_status::{CacheStatusPoller, HttpHealthSource};
use crate::data_storage::BlogDataConnection;
use crate::data_storage::bookmarks::BookmarkStore;
use crate::error::{BookmarkError, Error};
use crate::event_loop::AppEventProxy;
use crate::parser::ArticleLinker;
use crate::prefs::{Locale, load_preferences};
use crate::share::{Sharer, SystemClipboard};

/// Extra time granted to a poll beyond the interval before giving up.
const POLL_GRACE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct CliArgs {
    /// Preferences file (JSON), defaults to prefs.json in the config directory
    #[bpaf(long, argument("FILE"))]
    pub prefs: Option<PathBuf>,
    /// Bookmark database, defaults to blog_data.db in the config directory
    #[bpaf(long, argument("PATH"))]
    pub database: Option<PathBuf>,
    /// Blog origin used for article links and the health endpoint
    #[bpaf(long, argument("URL"))]
    pub origin: Option<String>,
    /// Language of messages: zh or en
    #[bpaf(long, argument("LOCALE"))]
    pub locale: Option<Locale>,
    #[bpaf(external)]
    pub command: Command,
}

#[derive(Debug, Clone, Bpaf)]
pub enum Command {
    /// Bookmark an article, or remove it if it is already bookmarked
    #[bpaf(command)]
    Toggle {
        /// Title stored with a new bookmark
        #[bpaf(long, argument("TITLE"))]
        title: Option<String>,
        #[bpaf(positional("ARTICLE_ID"))]
        article_id: String,
    },
    /// Print bookmarks, newest first
    #[bpaf(command)]
    List {
        /// Print the stored JSON records
        #[bpaf(long)]
        json: bool,
    },
    /// Print the number of bookmarks
    #[bpaf(command)]
    Count,
    /// Print the bookmark counter preview
    #[bpaf(command)]
    Preview,
    /// Copy an article link to the clipboard
    #[bpaf(command)]
    Share {
        #[bpaf(long, argument("TITLE"))]
        title: Option<String>,
        #[bpaf(positional("ARTICLE_ID"))]
        article_id: String,
    },
    /// Poll the blog's health endpoint and print the cache badge
    #[bpaf(command("cache-status"))]
    CacheStatus {
        /// Number of readings to print before stopping
        #[bpaf(long, argument("N"), fallback(1))]
        updates: usize,
    },
}

pub fn run(args: CliArgs) -> Result<(), Error> {
    let mut prefs = load_preferences(args.prefs.as_deref())?;
    if let Some(origin) = args.origin {
        prefs.origin = origin;
    }
    if let Some(locale) = args.locale {
        prefs.locale = locale;
    }

    let linker = ArticleLinker::new(&prefs.origin)?;
    let storage = match &args.database {
        Some(path) => BlogDataConnection::open(path)?,
        None => BlogDataConnection::open_default()?,
    };
    let store = BookmarkStore::from_preferences(storage, linker.clone(), &prefs);
    let sharer = match args.command {
        Command::Share { .. } => system_sharer(),
        _ => Sharer::new(),
    };
    let (proxy, events) = AppEventProxy::channel();
    let mut app = App::new(store, linker.clone(), &prefs, sharer, events);
    let now = Instant::now();

    match args.command {
        Command::Toggle { title, article_id } => {
            if article_id.trim().is_empty() {
                return Err(BookmarkError::EmptyArticleId.into());
            }
            app.handle_interface_commands(
                vec![UserInterfaceCommand::ToggleBookmark { article_id, title }],
                now,
            );
            print_toast(&app, now);
            println!("{}", app.bookmark_count());
        },
        Command::List { json } => {
            let bookmarks = app.store().list();
            if json {
                println!("{}", serde_json::to_string_pretty(&bookmarks)?);
            } else {
                for entry in bookmarks {
                    println!("{}\t{}\t{}\t{}", entry.added_at, entry.id, entry.title, entry.url);
                }
            }
        },
        Command::Count => println!("{}", app.bookmark_count()),
        Command::Preview => {
            if let Some(preview) = app.bookmark_preview() {
                println!("{preview}");
            }
        },
        Command::Share { title, article_id } => {
            app.handle_interface_commands(
                vec![UserInterfaceCommand::Share { article_id, title }],
                now,
            );
            print_toast(&app, now);
        },
        Command::CacheStatus { updates } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .map_err(Error::Runtime)?;
            let source = HttpHealthSource::new(&linker, &prefs.health_path)?;
            let interval = prefs.cache_poll_interval();
            app.attach_cache_poller(CacheStatusPoller::start(
                runtime.handle(),
                source,
                interval,
                proxy,
            ));

            for _ in 0..updates {
                if !app.wait_for_event(interval + POLL_GRACE) {
                    break;
                }
                if let Some(badge) = app.cache_badge() {
                    match &badge.title {
                        Some(title) => println!("{}\t{title}", badge.text),
                        None => println!("{}", badge.text),
                    }
                }
            }
            if let Some(poller) = app.take_cache_poller() {
                runtime.block_on(poller.stop());
            }
        },
    }
    Ok(())
}

fn system_sharer() -> Sharer {
    match SystemClipboard::new() {
        Ok(clipboard) => Sharer::new().with_clipboard(clipboard),
        Err(err) => {
            warn!("Clipboard unavailable ({err}), the link will be printed");
            Sharer::new()
        },
    }
}

fn print_toast<S: crate::data_storage::KeyValueStorage>(app: &App<S>, now: Instant) {
    if let Some(toast) = app.current_toast(now) {
        println!("{}", toast.message);
    }
}
