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

use super::UserStoreOperations;
use crate::error::{ConstraintViolationError, ConstraintViolationType};
use crate::users::store::diesel::{models::UserModel, schema::herald_user};
use crate::users::store::UserStoreError;

pub(in crate::users::store::diesel) trait UserStoreAddUserOperation {
    fn add_user(&self, user: UserModel) -> Result<(), UserStoreError>;
}

impl<'a> UserStoreAddUserOperation for UserStoreOperations<'a, diesel::sqlite::SqliteConnection> {
    fn add_user(&self, user: UserModel) -> Result<(), UserStoreError> {
        self.conn.transaction::<_, UserStoreError, _>(|| {
            let duplicate = herald_user::table
                .filter(
                    herald_user::uid
                        .eq(&user.uid)
                        .or(herald_user::email.eq(&user.email)),
                )
                .first::<UserModel>(self.conn)
                .optional()?;
            if duplicate.is_some() {
                return Err(UserStoreError::ConstraintViolationError(
                    ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
                ));
            }

            insert_into(herald_user::table)
                .values(&user)
                .execute(self.conn)?;

            Ok(())
        })
    }
}
