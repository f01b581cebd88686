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

#[cfg(feature = "sqlite")]
pub(crate) mod diesel;
mod error;
mod memory;

use std::collections::HashSet;

pub use error::NotificationStoreError;
pub use memory::MemoryNotificationStore;
#[cfg(feature = "sqlite")]
pub use self::diesel::DieselNotificationStore;

use super::{Notification, ReadUpdate};

/// Persists notifications and per-user read state.
///
/// Direct notifications live in their recipient's inbox with an inline read flag. Global
/// notifications live in a shared feed and are always stored unread; a user reading one is
/// recorded as a read marker keyed by user and notification id.
pub trait NotificationStore: Send + Sync {
    /// Adds a notification to the recipient's inbox, or to the global feed if it has no
    /// recipient. A global notification is stored with its read flag cleared.
    fn add_notification(&self, notification: Notification) -> Result<(), NotificationStoreError>;

    /// Lists the direct notifications addressed to `uid`.
    fn list_direct(&self, uid: &str) -> Result<Vec<Notification>, NotificationStoreError>;

    /// Lists every global notification.
    fn list_global(&self) -> Result<Vec<Notification>, NotificationStoreError>;

    /// Returns the ids of the global notifications `uid` has read.
    fn list_read_markers(&self, uid: &str) -> Result<HashSet<String>, NotificationStoreError>;

    fn get_direct(
        &self,
        uid: &str,
        id: &str,
    ) -> Result<Option<Notification>, NotificationStoreError>;

    fn get_global(&self, id: &str) -> Result<Option<Notification>, NotificationStoreError>;

    /// Applies a batch of read updates for `uid`, all or nothing.
    ///
    /// Adding a read marker that already exists is not an error. An update naming a notification
    /// that is not in the user's inbox or the global feed fails the whole batch with
    /// `NotFoundError`.
    fn apply_read_updates(
        &self,
        uid: &str,
        updates: &[ReadUpdate],
    ) -> Result<(), NotificationStoreError>;

    fn clone_box(&self) -> Box<dyn NotificationStore>;
}

impl Clone for Box<dyn NotificationStore> {
    fn clone(&self) -> Box<dyn NotificationStore> {
        self.clone_box()
    }
}
