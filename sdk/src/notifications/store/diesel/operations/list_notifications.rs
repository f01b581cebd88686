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

use diesel::prelude::*;

use super::NotificationStoreOperations;
use crate::notifications::store::diesel::{models::NotificationModel, schema::notification};
use crate::notifications::store::NotificationStoreError;
use crate::notifications::Notification;

pub(in crate::notifications::store::diesel) trait NotificationStoreListNotificationsOperation {
    fn list_direct(&self, uid: &str) -> Result<Vec<Notification>, NotificationStoreError>;

    fn list_global(&self) -> Result<Vec<Notification>, NotificationStoreError>;

    fn get_direct(
        &self,
        uid: &str,
        id: &str,
    ) -> Result<Option<Notification>, NotificationStoreError>;

    fn get_global(&self, id: &str) -> Result<Option<Notification>, NotificationStoreError>;
}

impl<'a> NotificationStoreListNotificationsOperation
    for NotificationStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn list_direct(&self, uid: &str) -> Result<Vec<Notification>, NotificationStoreError> {
        Ok(notification::table
            .filter(notification::recipient_uid.eq(uid))
            .load::<NotificationModel>(self.conn)?
            .into_iter()
            .map(Notification::from)
            .collect())
    }

    fn list_global(&self) -> Result<Vec<Notification>, NotificationStoreError> {
        Ok(notification::table
            .filter(notification::recipient_uid.is_null())
            .load::<NotificationModel>(self.conn)?
            .into_iter()
            .map(Notification::from)
            .collect())
    }

    fn get_direct(
        &self,
        uid: &str,
        id: &str,
    ) -> Result<Option<Notification>, NotificationStoreError> {
        Ok(notification::table
            .filter(notification::id.eq(id))
            .filter(notification::recipient_uid.eq(uid))
            .first::<NotificationModel>(self.conn)
            .optional()?
            .map(Notification::from))
    }

    fn get_global(&self, id: &str) -> Result<Option<Notification>, NotificationStoreError> {
        Ok(notification::table
            .filter(notification::id.eq(id))
            .filter(notification::recipient_uid.is_null())
            .first::<NotificationModel>(self.conn)
            .optional()?
            .map(Notification::from))
    }
}
