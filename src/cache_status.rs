/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Cache badge fed by periodically polling the blog's health endpoint.
//!
//! The poller is an owned tokio task: it publishes one reading as soon as it
//! starts, then one per interval and one per [`CacheStatusPoller::refresh_now`]
//! call, until [`CacheStatusPoller::stop`] is awaited or the poller is dropped.

use std::future::Future;
use std::time::Duration;

use log::{debug, error, warn};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use url::Url;

use crate::error::HealthError;
use crate::event_loop::{AppEvent, AppEventProxy};
use crate::notifications::Messages;
use crate::parser::ArticleLinker;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub trait HealthSource: Send + Sync + 'static {
    /// Number of records the blog currently holds in its cache.
    fn fetch_cache_size(&self) -> impl Future<Output = Result<u64, HealthError>> + Send;
}

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    cache_size: Option<u64>,
}

/// `GET {origin}{health_path}`, reading the `cache_size` field.
#[derive(Clone, Debug)]
pub struct HttpHealthSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpHealthSource {
    pub fn new(linker: &ArticleLinker, health_path: &str) -> Result<Self, HealthError> {
        let url = linker.resolve(health_path)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl HealthSource for HttpHealthSource {
    async fn fetch_cache_size(&self) -> Result<u64, HealthError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HealthError::Status(status));
        }
        let health: HealthResponse = response.json().await?;
        Ok(health.cache_size.unwrap_or(0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Known(u64),
    Unknown,
}

impl CacheStatus {
    pub fn badge_text(&self, messages: &Messages) -> String {
        match self {
            CacheStatus::Known(size) => messages.cache_badge(*size),
            CacheStatus::Unknown => messages.cache_badge_unknown.to_owned(),
        }
    }

    /// Hover text; `None` leaves the previous title in place.
    pub fn badge_title(&self, messages: &Messages) -> Option<String> {
        match self {
            CacheStatus::Known(size) => Some(messages.cache_badge_title(*size)),
            CacheStatus::Unknown => None,
        }
    }
}

pub async fn poll_once<H: HealthSource>(source: &H) -> CacheStatus {
    match source.fetch_cache_size().await {
        Ok(size) => CacheStatus::Known(size),
        Err(err) => {
            error!("Failed to fetch cache status: {err}");
            CacheStatus::Unknown
        },
    }
}

pub struct CacheStatusPoller {
    refresh: mpsc::UnboundedSender<()>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CacheStatusPoller {
    pub fn start<H: HealthSource>(
        runtime: &tokio::runtime::Handle,
        source: H,
        interval: Duration,
        events: AppEventProxy,
    ) -> Self {
        let (refresh, mut refresh_requests) = mpsc::unbounded_channel();
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancelled => {
                        debug!("cache_status: poller cancelled");
                        break;
                    }
                    Some(()) = refresh_requests.recv() => {}
                    _ = ticker.tick() => {}
                }
                let status = poll_once(&source).await;
                if !events.send(AppEvent::CacheStatus(status)) {
                    break;
                }
            }
        });
        debug!("cache_status: poller started, every {interval:?}");

        Self {
            refresh,
            cancel: Some(cancel),
            task: Some(task),
        }
    }

    /// Poll immediately, outside the regular interval.
    pub fn refresh_now(&self) {
        if self.refresh.send(()).is_err() {
            warn!("Cache status poller is no longer running");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the task and wait for it to finish. A request in flight is
    /// allowed to complete first.
    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("Cache status poller ended abnormally: {err}");
            }
        }
    }
}

impl Drop for CacheStatusPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
