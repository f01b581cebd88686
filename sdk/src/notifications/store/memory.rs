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

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{NotificationStore, NotificationStoreError};
use crate::error::{ConstraintViolationError, ConstraintViolationType, InternalError};
use crate::notifications::{Notification, ReadUpdate};

#[derive(Default)]
struct NotificationState {
    /// Every notification ever sent, in send order
    log: Vec<Notification>,
    /// Direct notifications keyed by recipient uid then notification id
    inboxes: HashMap<String, HashMap<String, Notification>>,
    global: HashMap<String, Notification>,
    /// Ids of the global notifications each user has read
    read_markers: HashMap<String, HashSet<String>>,
}

/// A `NotificationStore` kept in memory. All state sits behind a single lock, so a batch of
/// read updates is applied atomically.
#[derive(Clone, Default)]
pub struct MemoryNotificationStore {
    inner: Arc<Mutex<NotificationState>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        MemoryNotificationStore::default()
    }

    /// Returns every notification in the order it was added.
    pub fn notification_log(&self) -> Result<Vec<Notification>, NotificationStoreError> {
        Ok(self.lock()?.log.clone())
    }

    fn lock(&self) -> Result<MutexGuard<NotificationState>, NotificationStoreError> {
        self.inner.lock().map_err(|_| {
            NotificationStoreError::InternalError(InternalError::with_message(
                "Cannot access notifications: mutex lock poisoned".to_string(),
            ))
        })
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn add_notification(
        &self,
        mut notification: Notification,
    ) -> Result<(), NotificationStoreError> {
        let mut state = self.lock()?;

        if state.log.iter().any(|n| n.id() == notification.id()) {
            return Err(NotificationStoreError::ConstraintViolationError(
                ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
            ));
        }

        match notification.recipient_uid.clone() {
            Some(recipient) => {
                state
                    .inboxes
                    .entry(recipient)
                    .or_default()
                    .insert(notification.id.clone(), notification.clone());
            }
            None => {
                notification.read = false;
                state
                    .global
                    .insert(notification.id.clone(), notification.clone());
            }
        }
        state.log.push(notification);

        Ok(())
    }

    fn list_direct(&self, uid: &str) -> Result<Vec<Notification>, NotificationStoreError> {
        Ok(self
            .lock()?
            .inboxes
            .get(uid)
            .map(|inbox| inbox.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_global(&self) -> Result<Vec<Notification>, NotificationStoreError> {
        Ok(self.lock()?.global.values().cloned().collect())
    }

    fn list_read_markers(&self, uid: &str) -> Result<HashSet<String>, NotificationStoreError> {
        Ok(self
            .lock()?
            .read_markers
            .get(uid)
            .cloned()
            .unwrap_or_default())
    }

    fn get_direct(
        &self,
        uid: &str,
        id: &str,
    ) -> Result<Option<Notification>, NotificationStoreError> {
        Ok(self
            .lock()?
            .inboxes
            .get(uid)
            .and_then(|inbox| inbox.get(id))
            .cloned())
    }

    fn get_global(&self, id: &str) -> Result<Option<Notification>, NotificationStoreError> {
        Ok(self.lock()?.global.get(id).cloned())
    }

    fn apply_read_updates(
        &self,
        uid: &str,
        updates: &[ReadUpdate],
    ) -> Result<(), NotificationStoreError> {
        let mut state = self.lock()?;

        // validate the whole batch before touching anything
        for update in updates {
            let exists = match update {
                ReadUpdate::Direct(id) => state
                    .inboxes
                    .get(uid)
                    .map(|inbox| inbox.contains_key(id))
                    .unwrap_or(false),
                ReadUpdate::Global(id) => state.global.contains_key(id),
            };
            if !exists {
                return Err(NotificationStoreError::NotFoundError(
                    update.notification_id().to_string(),
                ));
            }
        }

        for update in updates {
            match update {
                ReadUpdate::Direct(id) => {
                    if let Some(notification) = state
                        .inboxes
                        .get_mut(uid)
                        .and_then(|inbox| inbox.get_mut(id))
                    {
                        notification.read = true;
                    }
                }
                ReadUpdate::Global(id) => {
                    state
                        .read_markers
                        .entry(uid.to_string())
                        .or_default()
                        .insert(id.clone());
                }
            }
        }

        Ok(())
    }

    fn clone_box(&self) -> Box<dyn NotificationStore> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::notifications::NotificationBuilder;

    fn notification(id: &str, recipient: Option<&str>, read: bool) -> Notification {
        let mut builder = NotificationBuilder::new()
            .with_id(id)
            .with_title(id)
            .with_message("body")
            .with_sender_uid("admin")
            .with_timestamp(1)
            .with_read(read);
        if let Some(recipient) = recipient {
            builder = builder.with_recipient_uid(recipient);
        }
        builder.build().expect("Unable to build notification")
    }

    #[test]
    fn test_add_routes_by_recipient() {
        let store = MemoryNotificationStore::new();
        store
            .add_notification(notification("d1", Some("u1"), false))
            .expect("Unable to add direct notification");
        store
            .add_notification(notification("g1", None, false))
            .expect("Unable to add global notification");

        assert_eq!(store.list_direct("u1").expect("Unable to list").len(), 1);
        assert!(store.list_direct("u2").expect("Unable to list").is_empty());
        assert_eq!(store.list_global().expect("Unable to list").len(), 1);
        assert_eq!(store.notification_log().expect("Unable to read log").len(), 2);
    }

    #[test]
    fn test_add_duplicate_id() {
        let store = MemoryNotificationStore::new();
        store
            .add_notification(notification("n1", Some("u1"), false))
            .expect("Unable to add notification");

        assert!(matches!(
            store.add_notification(notification("n1", None, false)),
            Err(NotificationStoreError::ConstraintViolationError(_))
        ));
    }

    /// Reading a global notification records a marker for that user only; the shared record
    /// stays unread.
    #[test]
    fn test_global_read_is_per_user() {
        let store = MemoryNotificationStore::new();
        store
            .add_notification(notification("g1", None, false))
            .expect("Unable to add notification");

        store
            .apply_read_updates("u1", &[ReadUpdate::Global("g1".to_string())])
            .expect("Unable to apply updates");
        // a second marker for the same id is a no-op
        store
            .apply_read_updates("u1", &[ReadUpdate::Global("g1".to_string())])
            .expect("Unable to apply updates");

        assert!(store
            .list_read_markers("u1")
            .expect("Unable to list markers")
            .contains("g1"));
        assert!(store
            .list_read_markers("u2")
            .expect("Unable to list markers")
            .is_empty());
        assert!(!store
            .get_global("g1")
            .expect("Unable to fetch")
            .expect("g1 missing")
            .is_read());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let store = MemoryNotificationStore::new();
        store
            .add_notification(notification("d1", Some("u1"), false))
            .expect("Unable to add notification");

        let result = store.apply_read_updates(
            "u1",
            &[
                ReadUpdate::Direct("d1".to_string()),
                ReadUpdate::Global("missing".to_string()),
            ],
        );

        assert!(matches!(result, Err(NotificationStoreError::NotFoundError(_))));
        assert!(!store
            .get_direct("u1", "d1")
            .expect("Unable to fetch")
            .expect("d1 missing")
            .is_read());
    }

    /// A user cannot mark another user's direct notification read.
    #[test]
    fn test_direct_update_scoped_to_inbox() {
        let store = MemoryNotificationStore::new();
        store
            .add_notification(notification("d1", Some("u1"), false))
            .expect("Unable to add notification");

        assert!(matches!(
            store.apply_read_updates("u2", &[ReadUpdate::Direct("d1".to_string())]),
            Err(NotificationStoreError::NotFoundError(_))
        ));
    }
}
