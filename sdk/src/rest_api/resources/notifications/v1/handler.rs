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

use crate::notifications::{FeedSubscription, NotificationService};
use crate::rest_api::resources::{error::ErrorResponse, MessageResponse};
use crate::users::User;

use super::payloads::{
    MarkAllReadResponse, Notification, NotificationFeed, SendNotificationRequest,
};

pub fn list_notifications(
    notification_service: &NotificationService,
    user: &User,
) -> Result<NotificationFeed, ErrorResponse> {
    Ok(notification_service.load_feed(user.uid())?)
}

pub fn send_notification(
    notification_service: &NotificationService,
    sender: &User,
    request: SendNotificationRequest,
) -> Result<Notification, ErrorResponse> {
    Ok(notification_service.send_notification(sender, request)?)
}

pub fn mark_as_read(
    notification_service: &NotificationService,
    user: &User,
    notification_id: &str,
) -> Result<MessageResponse, ErrorResponse> {
    notification_service.mark_as_read(user.uid(), notification_id)?;
    Ok(MessageResponse::new("Notification marked as read"))
}

pub fn mark_all_as_read(
    notification_service: &NotificationService,
    user: &User,
) -> Result<MarkAllReadResponse, ErrorResponse> {
    let updated = notification_service.mark_all_as_read(user.uid())?;
    Ok(MarkAllReadResponse { updated })
}

/// Blocks until the subscribed feed changes or `timeout` passes. `None` means nothing changed.
pub fn wait_for_feed(
    subscription: FeedSubscription,
    timeout: Duration,
) -> Option<NotificationFeed> {
    subscription.recv_timeout(timeout)
}
