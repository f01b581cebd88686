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

use diesel::{dsl::insert_into, prelude::*};

use super::NotificationStoreOperations;
use crate::error::{ConstraintViolationError, ConstraintViolationType};
use crate::notifications::store::diesel::{models::NotificationModel, schema::notification};
use crate::notifications::store::NotificationStoreError;

pub(in crate::notifications::store::diesel) trait NotificationStoreAddNotificationOperation {
    fn add_notification(&self, model: NotificationModel) -> Result<(), NotificationStoreError>;
}

impl<'a> NotificationStoreAddNotificationOperation
    for NotificationStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn add_notification(&self, model: NotificationModel) -> Result<(), NotificationStoreError> {
        self.conn.transaction::<_, NotificationStoreError, _>(|| {
            let duplicate = notification::table
                .filter(notification::id.eq(&model.id))
                .first::<NotificationModel>(self.conn)
                .optional()?;
            if duplicate.is_some() {
                return Err(NotificationStoreError::ConstraintViolationError(
                    ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
                ));
            }

            insert_into(notification::table)
                .values(&model)
                .execute(self.conn)?;

            Ok(())
        })
    }
}
