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

use diesel::{
    dsl::{insert_or_ignore_into, update},
    prelude::*,
};

use super::NotificationStoreOperations;
use crate::notifications::store::diesel::{
    models::ReadMarkerModel,
    schema::{notification, read_marker},
};
use crate::notifications::store::NotificationStoreError;
use crate::notifications::ReadUpdate;

pub(in crate::notifications::store::diesel) trait NotificationStoreApplyReadUpdatesOperation {
    fn apply_read_updates(
        &self,
        uid: &str,
        updates: &[ReadUpdate],
    ) -> Result<(), NotificationStoreError>;
}

impl<'a> NotificationStoreApplyReadUpdatesOperation
    for NotificationStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn apply_read_updates(
        &self,
        uid: &str,
        updates: &[ReadUpdate],
    ) -> Result<(), NotificationStoreError> {
        self.conn.transaction::<_, NotificationStoreError, _>(|| {
            for read_update in updates {
                match read_update {
                    ReadUpdate::Direct(id) => {
                        let updated = update(
                            notification::table
                                .filter(notification::id.eq(id))
                                .filter(notification::recipient_uid.eq(uid)),
                        )
                        .set(notification::is_read.eq(true))
                        .execute(self.conn)?;

                        if updated == 0 {
                            return Err(NotificationStoreError::NotFoundError(id.to_string()));
                        }
                    }
                    ReadUpdate::Global(id) => {
                        let global_count: i64 = notification::table
                            .filter(notification::id.eq(id))
                            .filter(notification::recipient_uid.is_null())
                            .count()
                            .get_result(self.conn)?;

                        if global_count == 0 {
                            return Err(NotificationStoreError::NotFoundError(id.to_string()));
                        }

                        insert_or_ignore_into(read_marker::table)
                            .values(&ReadMarkerModel {
                                user_id: uid.to_string(),
                                notification_id: id.to_string(),
                            })
                            .execute(self.conn)?;
                    }
                }
            }

            Ok(())
        })
    }
}
