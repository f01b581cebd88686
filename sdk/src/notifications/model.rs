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

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::error::InternalError;

/// Sender name used when none is given.
pub const DEFAULT_SENDER_NAME: &str = "Administrator";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationType {
    Regular,
    Alert,
    Info,
}

impl Default for NotificationType {
    fn default() -> Self {
        NotificationType::Regular
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotificationType::Regular => f.write_str("REGULAR"),
            NotificationType::Alert => f.write_str("ALERT"),
            NotificationType::Info => f.write_str("INFO"),
        }
    }
}

/// Parsing never fails: tags this version does not know about are treated as `Regular` so that
/// records written by newer senders can still be displayed.
impl FromStr for NotificationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "ALERT" => NotificationType::Alert,
            "INFO" => NotificationType::Info,
            _ => NotificationType::Regular,
        })
    }
}

impl serde::Serialize for NotificationType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for NotificationType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        // infallible
        Ok(value.parse().unwrap_or_default())
    }
}

/// A notification, either addressed to one recipient or broadcast to every user.
///
/// `read` is only meaningful for direct notifications. A global notification is stored with
/// `read == false`; per-user read status of globals is derived from read markers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) sender_uid: String,
    pub(crate) sender_name: String,
    #[serde(default)]
    pub(crate) recipient_uid: Option<String>,
    pub(crate) timestamp: i64,
    #[serde(rename = "type", default)]
    pub(crate) notification_type: NotificationType,
    #[serde(default)]
    pub(crate) read: bool,
}

impl Notification {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sender_uid(&self) -> &str {
        &self.sender_uid
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn recipient_uid(&self) -> Option<&str> {
        self.recipient_uid.as_deref()
    }

    /// Milliseconds since the unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn is_global(&self) -> bool {
        self.recipient_uid.is_none()
    }
}

#[derive(Default, Clone)]
pub struct NotificationBuilder {
    id: Option<String>,
    title: Option<String>,
    message: Option<String>,
    sender_uid: Option<String>,
    sender_name: Option<String>,
    recipient_uid: Option<String>,
    timestamp: Option<i64>,
    notification_type: Option<NotificationType>,
    read: bool,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        NotificationBuilder::default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_sender_uid(mut self, sender_uid: &str) -> Self {
        self.sender_uid = Some(sender_uid.to_string());
        self
    }

    pub fn with_sender_name(mut self, sender_name: &str) -> Self {
        self.sender_name = Some(sender_name.to_string());
        self
    }

    /// Addresses the notification to one user. Leave unset for a global notification.
    pub fn with_recipient_uid(mut self, recipient_uid: &str) -> Self {
        self.recipient_uid = Some(recipient_uid.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_notification_type(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = Some(notification_type);
        self
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    /// Builds the notification.
    ///
    /// A random id, the current time, the default sender name and `Regular` are used for any of
    /// those fields left unset.
    pub fn build(self) -> Result<Notification, NotificationBuildError> {
        let title = self
            .title
            .ok_or_else(|| NotificationBuildError::MissingField("title".to_string()))?;
        let message = self
            .message
            .ok_or_else(|| NotificationBuildError::MissingField("message".to_string()))?;
        let sender_uid = self
            .sender_uid
            .ok_or_else(|| NotificationBuildError::MissingField("sender_uid".to_string()))?;

        let timestamp = match self.timestamp {
            Some(timestamp) => timestamp,
            None => crate::current_time_millis().map_err(NotificationBuildError::Internal)?,
        };

        let read = self.read && self.recipient_uid.is_some();

        Ok(Notification {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title,
            message,
            sender_uid,
            sender_name: self
                .sender_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            recipient_uid: self.recipient_uid,
            timestamp,
            notification_type: self.notification_type.unwrap_or_default(),
            read,
        })
    }
}

#[derive(Debug)]
pub enum NotificationBuildError {
    MissingField(String),
    Internal(InternalError),
}

impl Error for NotificationBuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotificationBuildError::MissingField(_) => None,
            NotificationBuildError::Internal(err) => Some(err),
        }
    }
}

impl fmt::Display for NotificationBuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotificationBuildError::MissingField(field) => {
                write!(f, "unable to build notification, missing field: {}", field)
            }
            NotificationBuildError::Internal(err) => {
                write!(f, "unable to build notification: {}", err)
            }
        }
    }
}
