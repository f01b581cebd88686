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

use std::time::Duration;

pub use crate::notifications::{Notification, NotificationFeed, SendNotificationRequest};

const DEFAULT_WATCH_TIMEOUT_SECS: u64 = 30;
const MAX_WATCH_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchQuery {
    pub timeout_secs: Option<u64>,
}

impl WatchQuery {
    /// The requested wait, defaulting to 30 seconds and capped at two minutes.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .unwrap_or(DEFAULT_WATCH_TIMEOUT_SECS)
                .min(MAX_WATCH_TIMEOUT_SECS),
        )
    }
}
