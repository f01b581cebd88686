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

use herald_sdk::notifications::{Notification, SendNotificationRequest};

use super::{format_timestamp, print_table, Format};
use crate::error::CliError;
use crate::http::{FeedSlice, HeraldClient};

pub fn do_list_notifications(
    client: &HeraldClient,
    format: Format,
    unread_only: bool,
) -> Result<(), CliError> {
    let feed = client.list_notifications()?;
    display_feed(&feed, format, unread_only);
    Ok(())
}

pub fn do_mark_as_read(client: &HeraldClient, id: &str) -> Result<(), CliError> {
    let message = client.mark_as_read(id)?;
    info!("{}", message);
    Ok(())
}

pub fn do_mark_all_as_read(client: &HeraldClient) -> Result<(), CliError> {
    match client.mark_all_as_read()? {
        0 => info!("No unread notifications"),
        1 => info!("Marked 1 notification as read"),
        updated => info!("Marked {} notifications as read", updated),
    }
    Ok(())
}

pub fn do_send_notification(
    client: &HeraldClient,
    request: SendNotificationRequest,
) -> Result<(), CliError> {
    if request.title.trim().is_empty() || request.message.trim().is_empty() {
        return Err(CliError::UserError(
            "Both a title and a message are required".to_string(),
        ));
    }

    let notification = client.send_notification(&request)?;
    match notification.recipient_uid() {
        Some(recipient) => info!("Sent notification {} to {}", notification.id(), recipient),
        None => info!("Sent notification {} to all users", notification.id()),
    }
    Ok(())
}

/// Prints the feed every time it changes. With `once`, returns after the first change.
pub fn do_watch_notifications(
    client: &HeraldClient,
    format: Format,
    timeout: Duration,
    once: bool,
) -> Result<(), CliError> {
    loop {
        match client.watch(timeout)? {
            Some(feed) => {
                display_feed(&feed, format, false);
                if once {
                    return Ok(());
                }
            }
            None => debug!("No changes in the last {}s", timeout.as_secs()),
        }
    }
}

fn display_feed(feed: &FeedSlice, format: Format, unread_only: bool) {
    let notifications: Vec<&Notification> = feed
        .data
        .iter()
        .filter(|notification| !unread_only || !notification.is_read())
        .collect();

    print_table(
        format,
        vec!["ID", "TIME", "TYPE", "SCOPE", "FROM", "READ", "TITLE", "MESSAGE"],
        notification_rows(&notifications),
    );
    if format == Format::Human {
        println!("{} unread", feed.unread_count);
    }
}

fn notification_rows(notifications: &[&Notification]) -> Vec<Vec<String>> {
    notifications
        .iter()
        .map(|notification| {
            vec![
                notification.id().to_string(),
                format_timestamp(notification.timestamp()),
                notification.notification_type().to_string(),
                if notification.is_global() {
                    "all".to_string()
                } else {
                    "direct".to_string()
                },
                notification.sender_name().to_string(),
                if notification.is_read() { "yes" } else { "no" }.to_string(),
                notification.title().to_string(),
                notification.message().to_string(),
            ]
        })
        .collect()
}
