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

//! Merges a user's direct notifications with the global feed.

use std::collections::HashSet;

use super::Notification;

/// The notifications visible to one user, newest first, each annotated as read or unread.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NotificationFeed {
    #[serde(rename = "data")]
    notifications: Vec<Notification>,
    unread_count: usize,
}

impl NotificationFeed {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id() == id)
    }
}

/// Builds the feed for one user.
///
/// Direct notifications are taken first, so if an id shows up in both inputs the direct record
/// wins. Globals get their read flag from `read_markers`; direct notifications keep their own.
/// The result is sorted by timestamp descending with the id breaking ties, so equal timestamps
/// always come out in the same order.
pub fn aggregate(
    direct: Vec<Notification>,
    global: Vec<Notification>,
    read_markers: &HashSet<String>,
) -> NotificationFeed {
    let mut seen = HashSet::new();
    let mut notifications: Vec<Notification> = direct
        .into_iter()
        .chain(global.into_iter().map(|mut notification| {
            notification.read = read_markers.contains(notification.id());
            notification
        }))
        .filter(|notification| seen.insert(notification.id().to_string()))
        .collect();

    notifications.sort_by(|a, b| {
        b.timestamp()
            .cmp(&a.timestamp())
            .then_with(|| a.id().cmp(b.id()))
    });

    let unread_count = notifications.iter().filter(|n| !n.is_read()).count();

    NotificationFeed {
        notifications,
        unread_count,
    }
}
