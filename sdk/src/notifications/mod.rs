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

//! Notifications addressed to a single user or broadcast to every user.
//!
//! The store keeps direct notifications in per-user inboxes and global notifications in one
//! shared feed. `aggregate` merges the two into the feed a user sees, and the reconciler decides
//! which writes mark entries read without ever changing the shared global records.

mod aggregator;
mod model;
mod reconciler;
mod service;
pub mod store;
mod subscription;

pub use aggregator::{aggregate, NotificationFeed};
pub use model::{
    Notification, NotificationBuildError, NotificationBuilder, NotificationType,
    DEFAULT_SENDER_NAME,
};
pub use reconciler::{plan_mark_all, reconcile_mark_read, ReadUpdate};
pub use service::{NotificationService, NotificationServiceError, SendNotificationRequest};
#[cfg(feature = "sqlite")]
pub use store::DieselNotificationStore;
pub use store::{MemoryNotificationStore, NotificationStore, NotificationStoreError};
pub use subscription::FeedSubscription;
