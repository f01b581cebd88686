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

use std::collections::HashSet;

use diesel::prelude::*;

use super::NotificationStoreOperations;
use crate::notifications::store::diesel::schema::read_marker;
use crate::notifications::store::NotificationStoreError;

pub(in crate::notifications::store::diesel) trait NotificationStoreListReadMarkersOperation {
    fn list_read_markers(&self, uid: &str) -> Result<HashSet<String>, NotificationStoreError>;
}

impl<'a> NotificationStoreListReadMarkersOperation
    for NotificationStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn list_read_markers(&self, uid: &str) -> Result<HashSet<String>, NotificationStoreError> {
        Ok(read_marker::table
            .filter(read_marker::user_id.eq(uid))
            .select(read_marker::notification_id)
            .load::<String>(self.conn)?
            .into_iter()
            .collect())
    }
}
