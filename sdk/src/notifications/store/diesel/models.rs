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

use super::schema::{notification, read_marker};
use crate::notifications::Notification;

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "notification"]
pub struct NotificationModel {
    pub id: String,
    pub title: String,
    pub message: String,
    pub sender_uid: String,
    pub sender_name: String,
    pub recipient_uid: Option<String>,
    pub timestamp: i64,
    pub notification_type: String,
    pub is_read: bool,
}

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "read_marker"]
pub struct ReadMarkerModel {
    pub user_id: String,
    pub notification_id: String,
}

impl From<Notification> for NotificationModel {
    fn from(notification: Notification) -> Self {
        // the shared record of a global notification is never stored as read
        let is_read = notification.read && notification.recipient_uid.is_some();
        NotificationModel {
            id: notification.id,
            title: notification.title,
            message: notification.message,
            sender_uid: notification.sender_uid,
            sender_name: notification.sender_name,
            recipient_uid: notification.recipient_uid,
            timestamp: notification.timestamp,
            notification_type: notification.notification_type.to_string(),
            is_read,
        }
    }
}

impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: model.id,
            title: model.title,
            message: model.message,
            sender_uid: model.sender_uid,
            sender_name: model.sender_name,
            recipient_uid: model.recipient_uid,
            timestamp: model.timestamp,
            notification_type: model.notification_type.parse().unwrap_or_default(),
            read: model.is_read,
        }
    }
}
