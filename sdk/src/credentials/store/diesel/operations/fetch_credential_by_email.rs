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

use super::CredentialsStoreOperations;
use crate::credentials::store::diesel::{models::UserCredentialsModel, schema::user_credentials};
use crate::credentials::store::CredentialsStoreError;
use crate::credentials::UserCredentials;

pub(in crate::credentials::store::diesel) trait CredentialsStoreFetchCredentialByEmailOperation {
    fn fetch_credential_by_email(
        &self,
        email: &str,
    ) -> Result<UserCredentials, CredentialsStoreError>;
}

impl<'a> CredentialsStoreFetchCredentialByEmailOperation
    for CredentialsStoreOperations<'a, diesel::sqlite::SqliteConnection>
{
    fn fetch_credential_by_email(
        &self,
        email: &str,
    ) -> Result<UserCredentials, CredentialsStoreError> {
        user_credentials::table
            .filter(user_credentials::email.eq(email))
            .first::<UserCredentialsModel>(self.conn)
            .optional()?
            .map(UserCredentials::from)
            .ok_or_else(|| CredentialsStoreError::NotFoundError(email.to_string()))
    }
}
