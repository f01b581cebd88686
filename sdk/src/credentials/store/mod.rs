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

#[cfg(feature = "sqlite")]
pub(crate) mod diesel;
mod error;
mod memory;

pub use error::CredentialsStoreError;
pub use memory::MemoryCredentialsStore;
#[cfg(feature = "sqlite")]
pub use self::diesel::DieselCredentialsStore;

use super::UserCredentials;

pub trait CredentialsStore: Send + Sync {
    /// Adds a credential to the underlying storage
    ///
    /// # Arguments
    ///
    ///  * `credentials` - Credentials to be added
    fn add_credentials(&self, credentials: UserCredentials) -> Result<(), CredentialsStoreError>;

    /// Fetches the credentials registered for an email
    ///
    /// # Arguments
    ///
    ///  * `email` - The email the user logs in with
    fn fetch_credential_by_email(
        &self,
        email: &str,
    ) -> Result<UserCredentials, CredentialsStoreError>;

    fn clone_box(&self) -> Box<dyn CredentialsStore>;
}

impl Clone for Box<dyn CredentialsStore> {
    fn clone(&self) -> Box<dyn CredentialsStore> {
        self.clone_box()
    }
}
