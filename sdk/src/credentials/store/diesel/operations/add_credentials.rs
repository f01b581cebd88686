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

use super::CredentialsStoreOperations;
use crate::credentials::store::diesel::{
    models::{NewUserCredentialsModel, UserCredentialsModel},
    schema::user_credentials,
};
use crate::credentials::store::CredentialsStoreError;
use crate::error::{ConstraintViolationError, ConstraintViolationType};

pub(in crate::credentials::store::diesel) trait CredentialsStoreAddCredentialsOperation {
    fn add_credentials(
        &self,
        credentials: NewUserCredentialsModel,
    ) -> Result<(), CredentialsStoreError>;
}

impl<'a> CredentialsStoreAddCredentialsOperation
    for CredentialsStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn add_credentials(
        &self,
        credentials: NewUserCredentialsModel,
    ) -> Result<(), CredentialsStoreError> {
        self.conn.transaction::<_, CredentialsStoreError, _>(|| {
            let duplicate = user_credentials::table
                .filter(
                    user_credentials::email
                        .eq(&credentials.email)
                        .or(user_credentials::user_id.eq(&credentials.user_id)),
                )
                .first::<UserCredentialsModel>(self.conn)
                .optional()?;
            if duplicate.is_some() {
                return Err(CredentialsStoreError::ConstraintViolationError(
                    ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
                ));
            }

            insert_into(user_credentials::table)
                .values(&credentials)
                .execute(self.conn)?;

            Ok(())
        })
    }
}
