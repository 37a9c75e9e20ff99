/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Channel carrying events from background tasks to the UI thread.

use crossbeam_channel::{Receiver, Sender};
use log::warn;

use crate::cache_status::CacheStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A new reading for the cache badge.
    CacheStatus(CacheStatus),
}

#[derive(Clone, Debug)]
pub struct AppEventProxy {
    sender: Sender<AppEvent>,
}

impl AppEventProxy {
    pub fn channel() -> (AppEventProxy, Receiver<AppEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (AppEventProxy { sender }, receiver)
    }

    /// Returns false once the receiving side is gone.
    pub fn send(&self, event: AppEvent) -> bool {
        if let Err(err) = self.sender.send(event) {
            warn!("Failed to deliver app event ({err}).");
            return false;
        }
        true
    }
}
