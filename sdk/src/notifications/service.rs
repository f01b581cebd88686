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

use super::store::{NotificationStore, NotificationStoreError};
use super::subscription::{FeedSubscription, FeedSubscriptions};
use super::{
    aggregate, plan_mark_all, reconcile_mark_read, Notification, NotificationBuildError,
    NotificationBuilder, NotificationFeed, NotificationType,
};
use crate::error::{InternalError, InvalidArgumentError, ResourceTemporarilyUnavailableError};
use crate::push::{PushMessage, PushSender};
use crate::users::{User, UserStore, UserStoreError};

/// What an administrator asks to send.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SendNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub notification_type: Option<NotificationType>,
    /// Leave unset to broadcast to every user
    #[serde(default)]
    pub recipient_uid: Option<String>,
}

/// Sends notifications, builds user feeds and records read state.
#[derive(Clone)]
pub struct NotificationService {
    user_store: Box<dyn UserStore>,
    notification_store: Box<dyn NotificationStore>,
    push_sender: Option<PushSender>,
    subscriptions: FeedSubscriptions,
}

impl NotificationService {
    pub fn new(
        user_store: Box<dyn UserStore>,
        notification_store: Box<dyn NotificationStore>,
    ) -> Self {
        NotificationService {
            user_store,
            notification_store,
            push_sender: None,
            subscriptions: FeedSubscriptions::new(),
        }
    }

    /// Hands push delivery to a running push worker. Without one, sends are not pushed.
    pub fn with_push_sender(mut self, push_sender: PushSender) -> Self {
        self.push_sender = Some(push_sender);
        self
    }

    /// Stores a notification from `sender` and pushes it to the affected devices.
    ///
    /// Only administrators may send. A direct notification to an unknown user fails before
    /// anything is stored. Push delivery happens in the background and its outcome does not
    /// affect the result.
    pub fn send_notification(
        &self,
        sender: &User,
        request: SendNotificationRequest,
    ) -> Result<Notification, NotificationServiceError> {
        if !sender.is_admin() {
            return Err(NotificationServiceError::PermissionDeniedError(
                "Only administrators can send notifications".to_string(),
            ));
        }
        if request.title.trim().is_empty() {
            return Err(NotificationServiceError::InvalidArgumentError(
                InvalidArgumentError::new("title".to_string(), "Title is required".to_string()),
            ));
        }
        if request.message.trim().is_empty() {
            return Err(NotificationServiceError::InvalidArgumentError(
                InvalidArgumentError::new(
                    "message".to_string(),
                    "Message is required".to_string(),
                ),
            ));
        }

        let recipient = match request.recipient_uid.filter(|uid| !uid.is_empty()) {
            Some(uid) => Some(self.user_store.get_user(&uid)?.ok_or_else(|| {
                NotificationServiceError::NotFoundError(format!("No user with id {}", uid))
            })?),
            None => None,
        };

        let mut builder = NotificationBuilder::new()
            .with_title(&request.title)
            .with_message(&request.message)
            .with_sender_uid(sender.uid())
            .with_sender_name(sender.name())
            .with_notification_type(request.notification_type.unwrap_or_default());
        if let Some(recipient) = &recipient {
            builder = builder.with_recipient_uid(recipient.uid());
        }
        let notification = builder.build()?;

        self.notification_store
            .add_notification(notification.clone())?;

        info!(
            "{} notification {} sent by {}",
            if notification.is_global() {
                "Global"
            } else {
                "Direct"
            },
            notification.id(),
            sender.uid()
        );

        self.push(&notification, recipient.as_ref());

        match &recipient {
            Some(recipient) => self.publish_feed(recipient.uid()),
            None => {
                for uid in self.subscriptions.subscribed_users() {
                    self.publish_feed(&uid);
                }
            }
        }

        Ok(notification)
    }

    /// Returns the merged feed for `uid`, newest first.
    pub fn load_feed(&self, uid: &str) -> Result<NotificationFeed, NotificationServiceError> {
        let direct = self.notification_store.list_direct(uid)?;
        let global = self.notification_store.list_global()?;
        let read_markers = self.notification_store.list_read_markers(uid)?;

        Ok(aggregate(direct, global, &read_markers))
    }

    /// Marks one notification read for `uid`.
    ///
    /// Marking an already read notification again succeeds without a change.
    pub fn mark_as_read(&self, uid: &str, id: &str) -> Result<(), NotificationServiceError> {
        let direct: Vec<Notification> =
            self.notification_store.get_direct(uid, id)?.into_iter().collect();
        let global: Vec<Notification> =
            self.notification_store.get_global(id)?.into_iter().collect();

        let update = reconcile_mark_read(id, &direct, &global).ok_or_else(|| {
            NotificationServiceError::NotFoundError(format!("No notification with id {}", id))
        })?;

        self.notification_store.apply_read_updates(uid, &[update])?;
        self.publish_feed(uid);

        Ok(())
    }

    /// Marks every unread notification in the user's feed read in one batch.
    ///
    /// Returns the number of notifications that changed.
    pub fn mark_all_as_read(&self, uid: &str) -> Result<usize, NotificationServiceError> {
        let feed = self.load_feed(uid)?;
        let updates = plan_mark_all(&feed);
        if updates.is_empty() {
            return Ok(0);
        }

        self.notification_store.apply_read_updates(uid, &updates)?;
        debug!("Marked {} notification(s) read for {}", updates.len(), uid);
        self.publish_feed(uid);

        Ok(updates.len())
    }

    /// Lists every user. Only administrators may do this.
    pub fn list_users(&self, requester: &User) -> Result<Vec<User>, NotificationServiceError> {
        if !requester.is_admin() {
            return Err(NotificationServiceError::PermissionDeniedError(
                "Only administrators can list users".to_string(),
            ));
        }

        Ok(self.user_store.list_users()?)
    }

    /// Starts a live feed for `uid`. Any earlier subscription for the same user is ended.
    pub fn subscribe(&self, uid: &str) -> FeedSubscription {
        self.subscriptions.subscribe(uid)
    }

    fn push(&self, notification: &Notification, recipient: Option<&User>) {
        let push_sender = match &self.push_sender {
            Some(push_sender) => push_sender,
            None => return,
        };

        let tokens = match recipient {
            Some(user) => user
                .device_token()
                .map(|token| vec![token.to_string()])
                .unwrap_or_default(),
            None => match self.user_store.list_push_tokens() {
                Ok(tokens) => tokens,
                Err(err) => {
                    warn!(
                        "Unable to load push tokens for notification {}: {}",
                        notification.id(),
                        err
                    );
                    return;
                }
            },
        };

        push_sender.send(PushMessage::from(notification), tokens);
    }

    fn publish_feed(&self, uid: &str) {
        if !self.subscriptions.is_subscribed(uid) {
            return;
        }
        match self.load_feed(uid) {
            Ok(feed) => self.subscriptions.publish(uid, feed),
            Err(err) => warn!("Unable to refresh feed for {}: {}", uid, err),
        }
    }
}

#[derive(Debug)]
pub enum NotificationServiceError {
    InternalError(InternalError),
    InvalidArgumentError(InvalidArgumentError),
    NotFoundError(String),
    PermissionDeniedError(String),
    ResourceTemporarilyUnavailableError(ResourceTemporarilyUnavailableError),
}

impl Error for NotificationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotificationServiceError::InternalError(err) => Some(err),
            NotificationServiceError::InvalidArgumentError(err) => Some(err),
            NotificationServiceError::NotFoundError(_) => None,
            NotificationServiceError::PermissionDeniedError(_) => None,
            NotificationServiceError::ResourceTemporarilyUnavailableError(err) => Some(err),
        }
    }
}

impl fmt::Display for NotificationServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotificationServiceError::InternalError(err) => err.fmt(f),
            NotificationServiceError::InvalidArgumentError(err) => err.fmt(f),
            NotificationServiceError::NotFoundError(msg) => f.write_str(msg),
            NotificationServiceError::PermissionDeniedError(msg) => f.write_str(msg),
            NotificationServiceError::ResourceTemporarilyUnavailableError(err) => err.fmt(f),
        }
    }
}

impl From<NotificationStoreError> for NotificationServiceError {
    fn from(err: NotificationStoreError) -> Self {
        match err {
            NotificationStoreError::InternalError(err) => {
                NotificationServiceError::InternalError(err)
            }
            NotificationStoreError::ConstraintViolationError(err) => {
                NotificationServiceError::InternalError(InternalError::from_source(Box::new(err)))
            }
            NotificationStoreError::ResourceTemporarilyUnavailableError(err) => {
                NotificationServiceError::ResourceTemporarilyUnavailableError(err)
            }
            NotificationStoreError::NotFoundError(id) => NotificationServiceError::NotFoundError(
                format!("No notification with id {}", id),
            ),
        }
    }
}

impl From<UserStoreError> for NotificationServiceError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::InternalError(err) => NotificationServiceError::InternalError(err),
            UserStoreError::ConstraintViolationError(err) => {
                NotificationServiceError::InternalError(InternalError::from_source(Box::new(err)))
            }
            UserStoreError::ResourceTemporarilyUnavailableError(err) => {
                NotificationServiceError::ResourceTemporarilyUnavailableError(err)
            }
            UserStoreError::NotFoundError(uid) => {
                NotificationServiceError::NotFoundError(format!("No user with id {}", uid))
            }
        }
    }
}

impl From<NotificationBuildError> for NotificationServiceError {
    fn from(err: NotificationBuildError) -> Self {
        match err {
            NotificationBuildError::MissingField(field) => {
                NotificationServiceError::InvalidArgumentError(InvalidArgumentError::new(
                    field,
                    "Field is required".to_string(),
                ))
            }
            NotificationBuildError::Internal(err) => NotificationServiceError::InternalError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use crate::notifications::MemoryNotificationStore;
    use crate::push::{DispatchReport, PushDispatcher, PushWorker};
    use crate::threading::lifecycle::ShutdownHandle;
    use crate::users::{MemoryUserStore, UserBuilder};

    #[derive(Clone, Default)]
    struct RecordingDispatcher {
        sent: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    }

    impl PushDispatcher for RecordingDispatcher {
        fn dispatch(&self, message: &PushMessage, tokens: &[String]) -> DispatchReport {
            self.sent
                .lock()
                .expect("dispatcher lock poisoned")
                .push((message.id.clone(), tokens.to_vec()));
            DispatchReport::default()
        }
    }

    fn user(uid: &str, is_admin: bool, push_token: &str) -> User {
        UserBuilder::new()
            .with_uid(uid)
            .with_email(&format!("{}@example.com", uid))
            .with_name(uid)
            .with_admin(is_admin)
            .with_push_token(push_token)
            .build()
            .expect("Unable to build user")
    }

    /// Returns a service with an admin and two regular users, one of them without a device.
    fn service() -> (NotificationService, User) {
        let user_store = MemoryUserStore::new();
        let admin = user("admin", true, "");
        user_store.add_user(admin.clone()).expect("Unable to add user");
        user_store
            .add_user(user("alice", false, "alice-device"))
            .expect("Unable to add user");
        user_store
            .add_user(user("bob", false, ""))
            .expect("Unable to add user");

        let service = NotificationService::new(
            Box::new(user_store),
            Box::new(MemoryNotificationStore::new()),
        );
        (service, admin)
    }

    fn request(title: &str, recipient: Option<&str>) -> SendNotificationRequest {
        SendNotificationRequest {
            title: title.to_string(),
            message: "body".to_string(),
            notification_type: None,
            recipient_uid: recipient.map(String::from),
        }
    }

    #[test]
    fn test_send_requires_admin() {
        let (service, _) = service();
        let alice = user("alice", false, "alice-device");

        assert!(matches!(
            service.send_notification(&alice, request("hi", None)),
            Err(NotificationServiceError::PermissionDeniedError(_))
        ));
    }

    #[test]
    fn test_send_rejects_empty_title() {
        let (service, admin) = service();

        assert!(matches!(
            service.send_notification(&admin, request("  ", None)),
            Err(NotificationServiceError::InvalidArgumentError(_))
        ));
    }

    /// A direct send to an unknown user stores nothing.
    #[test]
    fn test_send_to_unknown_recipient() {
        let (service, admin) = service();

        assert!(matches!(
            service.send_notification(&admin, request("hi", Some("nobody"))),
            Err(NotificationServiceError::NotFoundError(_))
        ));
        assert!(service
            .load_feed("nobody")
            .expect("Unable to load feed")
            .is_empty());
    }

    #[test]
    fn test_direct_and_global_feeds() {
        let (service, admin) = service();

        let direct = service
            .send_notification(&admin, request("for alice", Some("alice")))
            .expect("Unable to send");
        service
            .send_notification(&admin, request("for everyone", None))
            .expect("Unable to send");

        assert_eq!(direct.sender_name(), "admin");

        let alice_feed = service.load_feed("alice").expect("Unable to load feed");
        let bob_feed = service.load_feed("bob").expect("Unable to load feed");

        assert_eq!(alice_feed.notifications().len(), 2);
        assert_eq!(alice_feed.unread_count(), 2);
        assert_eq!(bob_feed.notifications().len(), 1);
        assert!(bob_feed.notifications()[0].is_global());
    }

    /// Reading a global notification only affects the reader.
    #[test]
    fn test_mark_global_read_is_per_user() {
        let (service, admin) = service();
        let global = service
            .send_notification(&admin, request("for everyone", None))
            .expect("Unable to send");

        service
            .mark_as_read("alice", global.id())
            .expect("Unable to mark read");
        // again, as a no-op
        service
            .mark_as_read("alice", global.id())
            .expect("Unable to mark read");

        assert_eq!(
            service.load_feed("alice").expect("Unable to load").unread_count(),
            0
        );
        assert_eq!(
            service.load_feed("bob").expect("Unable to load").unread_count(),
            1
        );
    }

    #[test]
    fn test_mark_unknown_or_foreign_notification() {
        let (service, admin) = service();
        let direct = service
            .send_notification(&admin, request("for alice", Some("alice")))
            .expect("Unable to send");

        assert!(matches!(
            service.mark_as_read("alice", "missing"),
            Err(NotificationServiceError::NotFoundError(_))
        ));
        assert!(matches!(
            service.mark_as_read("bob", direct.id()),
            Err(NotificationServiceError::NotFoundError(_))
        ));
    }

    #[test]
    fn test_mark_all_as_read() {
        let (service, admin) = service();
        service
            .send_notification(&admin, request("one", Some("alice")))
            .expect("Unable to send");
        let global = service
            .send_notification(&admin, request("two", None))
            .expect("Unable to send");
        service
            .send_notification(&admin, request("three", None))
            .expect("Unable to send");
        service
            .mark_as_read("alice", global.id())
            .expect("Unable to mark read");

        assert_eq!(service.mark_all_as_read("alice").expect("Unable to mark"), 2);
        assert_eq!(service.mark_all_as_read("alice").expect("Unable to mark"), 0);
        assert_eq!(
            service.load_feed("bob").expect("Unable to load").unread_count(),
            2
        );
    }

    #[test]
    fn test_list_users_requires_admin() {
        let (service, admin) = service();

        assert_eq!(service.list_users(&admin).expect("Unable to list").len(), 3);
        assert!(matches!(
            service.list_users(&user("alice", false, "")),
            Err(NotificationServiceError::PermissionDeniedError(_))
        ));
    }

    /// Global sends go to every registered device; direct sends only to the recipient's device,
    /// and not at all when the recipient has none.
    #[test]
    fn test_push_targets() {
        let (service, admin) = service();
        let dispatcher = RecordingDispatcher::default();
        let mut worker =
            PushWorker::start(Box::new(dispatcher.clone())).expect("Unable to start worker");
        let service = service.with_push_sender(worker.sender());

        let to_alice = service
            .send_notification(&admin, request("alice", Some("alice")))
            .expect("Unable to send");
        service
            .send_notification(&admin, request("bob", Some("bob")))
            .expect("Unable to send");
        let global = service
            .send_notification(&admin, request("all", None))
            .expect("Unable to send");

        worker.signal_shutdown();
        worker
            .wait_for_shutdown()
            .expect("Unable to shut down worker");

        assert_eq!(
            *dispatcher.sent.lock().expect("dispatcher lock poisoned"),
            vec![
                (to_alice.id().to_string(), vec!["alice-device".to_string()]),
                (global.id().to_string(), vec!["alice-device".to_string()]),
            ]
        );
    }

    #[test]
    fn test_subscription_receives_updates() {
        let (service, admin) = service();
        let subscription = service.subscribe("alice");

        service
            .send_notification(&admin, request("hello", Some("alice")))
            .expect("Unable to send");
        let feed = subscription
            .recv_timeout(Duration::from_secs(1))
            .expect("No feed update");
        assert_eq!(feed.unread_count(), 1);

        service.mark_all_as_read("alice").expect("Unable to mark");
        let feed = subscription
            .recv_timeout(Duration::from_secs(1))
            .expect("No feed update");
        assert_eq!(feed.unread_count(), 0);

        // bob is not subscribed, so his direct notification produces nothing for alice
        service
            .send_notification(&admin, request("bob only", Some("bob")))
            .expect("Unable to send");
        assert_eq!(subscription.try_recv(), None);
    }
}
