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

use diesel::{dsl::delete, prelude::*};

use super::UserStoreOperations;
use crate::users::store::diesel::schema::herald_user;
use crate::users::store::UserStoreError;

pub(in crate::users::store::diesel) trait UserStoreRemoveUserOperation {
    fn remove_user(&self, uid: &str) -> Result<(), UserStoreError>;
}

impl<'a> UserStoreRemoveUserOperation
    for UserStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn remove_user(&self, uid: &str) -> Result<(), UserStoreError> {
        delete(herald_user::table.filter(herald_user::uid.eq(uid))).execute(self.conn)?;
        Ok(())
    }
}
