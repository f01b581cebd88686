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

//! Best-effort delivery of notifications to device push tokens.
//!
//! Delivery is fire-and-forget: failures are logged and counted, never returned to the sender of
//! the notification.

#[cfg(feature = "fcm")]
mod fcm;
mod worker;

use std::ops::AddAssign;

#[cfg(feature = "fcm")]
pub use fcm::{FcmPushClient, DEFAULT_FCM_URL};
pub use worker::{PushSender, PushWorker};

use crate::notifications::{Notification, NotificationType};

/// Above this many tokens a message is sent as multicast requests instead of one request per
/// token.
pub const MULTICAST_THRESHOLD: usize = 5;
/// The most tokens the push provider accepts in a single multicast request.
pub const MAX_TOKENS_PER_REQUEST: usize = 500;

/// The content pushed to devices for one notification.
#[derive(Clone, Debug, PartialEq)]
pub struct PushMessage {
    pub id: String,
    pub title: String,
    pub body: String,
    pub notification_type: NotificationType,
    /// Set for direct notifications only
    pub recipient_uid: Option<String>,
    pub timestamp: i64,
}

impl From<&Notification> for PushMessage {
    fn from(notification: &Notification) -> Self {
        PushMessage {
            id: notification.id().to_string(),
            title: notification.title().to_string(),
            body: notification.message().to_string(),
            notification_type: notification.notification_type(),
            recipient_uid: notification.recipient_uid().map(String::from),
            timestamp: notification.timestamp(),
        }
    }
}

/// The addressee of a single push request.
#[derive(Clone, Debug, PartialEq)]
pub enum PushTarget {
    Single(String),
    Multicast(Vec<String>),
}

impl PushTarget {
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            PushTarget::Single(token) => vec![token.as_str()],
            PushTarget::Multicast(tokens) => tokens.iter().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PushTarget::Single(_) => 1,
            PushTarget::Multicast(tokens) => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits `tokens` into push requests.
///
/// Empty tokens are dropped. More than `MULTICAST_THRESHOLD` tokens are grouped into multicast
/// requests of at most `MAX_TOKENS_PER_REQUEST`; otherwise each token gets its own request.
pub fn plan_dispatch(tokens: &[String]) -> Vec<PushTarget> {
    let tokens: Vec<String> = tokens
        .iter()
        .filter(|token| !token.is_empty())
        .cloned()
        .collect();

    if tokens.len() > MULTICAST_THRESHOLD {
        tokens
            .chunks(MAX_TOKENS_PER_REQUEST)
            .map(|chunk| PushTarget::Multicast(chunk.to_vec()))
            .collect()
    } else {
        tokens.into_iter().map(PushTarget::Single).collect()
    }
}

/// Counts from one dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DispatchReport {
    pub requests: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl AddAssign for DispatchReport {
    fn add_assign(&mut self, other: Self) {
        self.requests += other.requests;
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Delivers a push message to device tokens.
pub trait PushDispatcher: Send {
    /// Sends `message` to every token. Problems are logged and reflected in the report.
    fn dispatch(&self, message: &PushMessage, tokens: &[String]) -> DispatchReport;
}

/// A dispatcher used when no push provider is configured. It only logs what would be sent.
#[derive(Default)]
pub struct LogPushDispatcher;

impl PushDispatcher for LogPushDispatcher {
    fn dispatch(&self, message: &PushMessage, tokens: &[String]) -> DispatchReport {
        let targets = plan_dispatch(tokens);
        info!(
            "Push delivery disabled; not sending notification {} to {} device(s)",
            message.id,
            targets.iter().map(PushTarget::len).sum::<usize>()
        );
        DispatchReport::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn tokens(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("token-{}", i)).collect()
    }

    #[test]
    fn test_plan_few_tokens_single_requests() {
        let plan = plan_dispatch(&tokens(MULTICAST_THRESHOLD));

        assert_eq!(plan.len(), MULTICAST_THRESHOLD);
        assert_eq!(plan[0], PushTarget::Single("token-0".to_string()));
    }

    #[test]
    fn test_plan_many_tokens_chunked() {
        let plan = plan_dispatch(&tokens(1201));

        assert_eq!(
            plan.iter().map(PushTarget::len).collect::<Vec<_>>(),
            vec![500, 500, 201]
        );
        assert!(plan
            .iter()
            .all(|target| matches!(target, PushTarget::Multicast(_))));
    }

    #[test]
    fn test_plan_just_over_threshold_is_multicast() {
        let plan = plan_dispatch(&tokens(MULTICAST_THRESHOLD + 1));

        assert_eq!(plan, vec![PushTarget::Multicast(tokens(MULTICAST_THRESHOLD + 1))]);
    }

    /// Empty tokens are dropped before the threshold is applied.
    #[test]
    fn test_plan_drops_empty_tokens() {
        let mut input = tokens(3);
        input.extend(vec![String::new(); 10]);

        let plan = plan_dispatch(&input);

        assert_eq!(plan.len(), 3);
        assert!(plan_dispatch(&[String::new()]).is_empty());
    }

    #[test]
    fn test_log_dispatcher_sends_nothing() {
        let message = PushMessage {
            id: "n1".to_string(),
            title: "title".to_string(),
            body: "body".to_string(),
            notification_type: NotificationType::Info,
            recipient_uid: None,
            timestamp: 1,
        };

        assert_eq!(
            LogPushDispatcher.dispatch(&message, &tokens(3)),
            DispatchReport::default()
        );
    }
}
