// Copyright 2018-2020 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Live feed updates for connected clients.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use super::NotificationFeed;

#[derive(Default)]
struct SubscriberState {
    next_id: u64,
    /// At most one subscription per user, keyed by uid
    subscribers: HashMap<String, (u64, Sender<NotificationFeed>)>,
}

/// Registry of the users currently watching their feed.
#[derive(Clone, Default)]
pub(crate) struct FeedSubscriptions {
    state: Arc<Mutex<SubscriberState>>,
}

impl FeedSubscriptions {
    pub fn new() -> Self {
        FeedSubscriptions::default()
    }

    /// Registers a subscription for `uid`, replacing and disconnecting any earlier one.
    pub fn subscribe(&self, uid: &str) -> FeedSubscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = state.next_id;
        if state
            .subscribers
            .insert(uid.to_string(), (id, sender))
            .is_some()
        {
            debug!("Replaced feed subscription for user {}", uid);
        }

        FeedSubscription {
            id,
            uid: uid.to_string(),
            receiver,
            registry: Arc::downgrade(&self.state),
        }
    }

    pub fn is_subscribed(&self, uid: &str) -> bool {
        lock(&self.state).subscribers.contains_key(uid)
    }

    pub fn subscribed_users(&self) -> Vec<String> {
        lock(&self.state).subscribers.keys().cloned().collect()
    }

    /// Delivers `feed` to the subscriber for `uid`, if there is one.
    pub fn publish(&self, uid: &str, feed: NotificationFeed) {
        let mut state = lock(&self.state);
        let disconnected = match state.subscribers.get(uid) {
            Some((_, sender)) => sender.send(feed).is_err(),
            None => false,
        };
        if disconnected {
            state.subscribers.remove(uid);
        }
    }
}

// The registry holds no invariants a panicking holder could break, so a poisoned lock is reused.
fn lock(state: &Mutex<SubscriberState>) -> MutexGuard<SubscriberState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A user's live feed. Each message is the complete feed after a change.
///
/// The subscription ends when it is dropped or when the same user subscribes again; once ended,
/// the receive methods return `None`.
pub struct FeedSubscription {
    id: u64,
    uid: String,
    receiver: Receiver<NotificationFeed>,
    registry: Weak<Mutex<SubscriberState>>,
}

impl FeedSubscription {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Blocks until the next feed update.
    pub fn recv(&self) -> Option<NotificationFeed> {
        self.receiver.recv().ok()
    }

    /// Waits up to `timeout` for the next feed update.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NotificationFeed> {
        match self.receiver.recv_timeout(timeout) {
            Ok(feed) => Some(feed),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<NotificationFeed> {
        match self.receiver.try_recv() {
            Ok(feed) => Some(feed),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut state = lock(&registry);
            // only remove the entry if it has not been replaced by a newer subscription
            if matches!(state.subscribers.get(&self.uid), Some((id, _)) if *id == self.id) {
                state.subscribers.remove(&self.uid);
            }
        }
    }
}
