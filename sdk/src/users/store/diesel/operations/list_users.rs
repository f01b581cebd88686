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

use super::UserStoreOperations;
use crate::users::store::diesel::{models::UserModel, schema::herald_user};
use crate::users::store::UserStoreError;
use crate::users::User;

pub(in crate::users::store::diesel) trait UserStoreListUsersOperation {
    fn list_users(&self) -> Result<Vec<User>, UserStoreError>;
}

impl<'a> UserStoreListUsersOperation
    for UserStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        Ok(herald_user::table
            .order((herald_user::name.asc(), herald_user::uid.asc()))
            .load::<UserModel>(self.conn)?
            .into_iter()
            .map(User::from)
            .collect())
    }
}
