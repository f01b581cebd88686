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

use diesel::{dsl::update, prelude::*};

use super::UserStoreOperations;
use crate::users::store::diesel::schema::herald_user;
use crate::users::store::UserStoreError;

pub(in crate::users::store::diesel) trait UserStoreUpdatePushTokenOperation {
    fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), UserStoreError>;
}

impl<'a> UserStoreUpdatePushTokenOperation
    for UserStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), UserStoreError> {
        let updated = update(herald_user::table.filter(herald_user::uid.eq(uid)))
            .set(herald_user::push_token.eq(push_token))
            .execute(self.conn)?;

        if updated == 0 {
            return Err(UserStoreError::NotFoundError(uid.to_string()));
        }

        Ok(())
    }
}
