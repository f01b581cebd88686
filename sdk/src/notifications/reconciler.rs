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

//! Decides which read-state writes are needed to mark notifications as read.
//!
//! A direct notification is marked read by setting its own flag. A global notification is
//! shared by every user, so it is marked read by adding a read marker for the reader instead.

use super::{Notification, NotificationFeed};

/// One read-state write for a single user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReadUpdate {
    /// Set the read flag of a direct notification in the user's inbox
    Direct(String),
    /// Add a read marker for a global notification
    Global(String),
}

impl ReadUpdate {
    pub fn notification_id(&self) -> &str {
        match self {
            ReadUpdate::Direct(id) | ReadUpdate::Global(id) => id,
        }
    }
}

/// Picks the update that marks notification `id` read.
///
/// The user's direct notifications are checked before the global feed. Returns `None` if the id
/// belongs to neither.
pub fn reconcile_mark_read(
    id: &str,
    direct: &[Notification],
    global: &[Notification],
) -> Option<ReadUpdate> {
    if direct.iter().any(|n| n.id() == id) {
        Some(ReadUpdate::Direct(id.to_string()))
    } else if global.iter().any(|n| n.id() == id) {
        Some(ReadUpdate::Global(id.to_string()))
    } else {
        None
    }
}

/// Plans the updates that mark every unread notification in `feed` as read.
///
/// Entries that are already read are skipped, so an empty plan means there is nothing to write.
pub fn plan_mark_all(feed: &NotificationFeed) -> Vec<ReadUpdate> {
    feed.notifications()
        .iter()
        .filter(|n| !n.is_read())
        .map(|n| {
            if n.is_global() {
                ReadUpdate::Global(n.id().to_string())
            } else {
                ReadUpdate::Direct(n.id().to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use crate::notifications::{aggregate, NotificationBuilder};

    fn notification(id: &str, recipient: Option<&str>, timestamp: i64, read: bool) -> Notification {
        let mut builder = NotificationBuilder::new()
            .with_id(id)
            .with_title(id)
            .with_message("body")
            .with_sender_uid("admin")
            .with_timestamp(timestamp)
            .with_read(read);
        if let Some(recipient) = recipient {
            builder = builder.with_recipient_uid(recipient);
        }
        builder.build().expect("Unable to build notification")
    }

    #[test]
    fn test_reconcile_prefers_direct() {
        let direct = vec![notification("n1", Some("u1"), 1, false)];
        let global = vec![notification("n1", None, 1, false), notification("g1", None, 2, false)];

        assert_eq!(
            reconcile_mark_read("n1", &direct, &global),
            Some(ReadUpdate::Direct("n1".to_string()))
        );
        assert_eq!(
            reconcile_mark_read("g1", &direct, &global),
            Some(ReadUpdate::Global("g1".to_string()))
        );
        assert_eq!(reconcile_mark_read("missing", &direct, &global), None);
    }

    #[test]
    fn test_plan_mark_all_only_unread() {
        let markers: HashSet<String> = vec!["g2".to_string()].into_iter().collect();
        let feed = aggregate(
            vec![
                notification("d1", Some("u1"), 40, false),
                notification("d2", Some("u1"), 30, true),
            ],
            vec![notification("g1", None, 20, false), notification("g2", None, 10, false)],
            &markers,
        );

        assert_eq!(
            plan_mark_all(&feed),
            vec![
                ReadUpdate::Direct("d1".to_string()),
                ReadUpdate::Global("g1".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_mark_all_nothing_unread() {
        let feed = aggregate(
            vec![notification("d1", Some("u1"), 1, true)],
            vec![],
            &HashSet::new(),
        );

        assert!(plan_mark_all(&feed).is_empty());
    }
}
