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

//! Email and password credentials, stored as bcrypt hashes.

mod error;
pub mod store;

use std::str::FromStr;

use bcrypt::{hash, verify, DEFAULT_COST};

pub use error::{UserCredentialsBuilderError, UserCredentialsError};
pub use store::{CredentialsStore, CredentialsStoreError, MemoryCredentialsStore};
#[cfg(feature = "sqlite")]
pub use store::DieselCredentialsStore;

const MEDIUM_COST: u32 = 8;
const LOW_COST: u32 = 4;

/// The login credentials of one user. `password` holds the bcrypt hash, never the plain text.
#[derive(Clone, Debug, PartialEq)]
pub struct UserCredentials {
    pub user_id: String,
    pub email: String,
    pub password: String,
}

impl UserCredentials {
    pub fn verify_password(&self, password: &str) -> Result<bool, UserCredentialsError> {
        Ok(verify(password, &self.password)?)
    }
}

#[derive(Default)]
pub struct UserCredentialsBuilder {
    user_id: Option<String>,
    email: Option<String>,
    password: Option<String>,
    password_encryption_cost: Option<PasswordEncryptionCost>,
}

impl UserCredentialsBuilder {
    /// Sets the user_id for the user the credentials belong to
    pub fn with_user_id(mut self, user_id: &str) -> UserCredentialsBuilder {
        self.user_id = Some(user_id.to_owned());
        self
    }

    /// Sets the email that will be used to authenticate the user
    pub fn with_email(mut self, email: &str) -> UserCredentialsBuilder {
        self.email = Some(email.to_owned());
        self
    }

    /// Sets the plain text password; it is hashed on build
    pub fn with_password(mut self, password: &str) -> UserCredentialsBuilder {
        self.password = Some(password.to_owned());
        self
    }

    /// Sets the cost to encrypt the password, default is high
    pub fn with_password_encryption_cost(
        mut self,
        cost: PasswordEncryptionCost,
    ) -> UserCredentialsBuilder {
        self.password_encryption_cost = Some(cost);
        self
    }

    /// Consumes the builder, hashes the password and returns `UserCredentials` with the hashed
    /// password
    pub fn build(self) -> Result<UserCredentials, UserCredentialsBuilderError> {
        let user_id = self.user_id.ok_or_else(|| {
            UserCredentialsBuilderError::MissingRequiredField("Missing user_id".to_string())
        })?;
        let email = self.email.ok_or_else(|| {
            UserCredentialsBuilderError::MissingRequiredField("Missing email".to_string())
        })?;
        let password = self.password.ok_or_else(|| {
            UserCredentialsBuilderError::MissingRequiredField("Missing password".to_string())
        })?;

        let cost = self
            .password_encryption_cost
            .unwrap_or(PasswordEncryptionCost::High);

        Ok(UserCredentials {
            user_id,
            email,
            password: hash(password, cost.to_value())?,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordEncryptionCost {
    High,
    Medium,
    Low,
}

impl FromStr for PasswordEncryptionCost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "high" => Ok(PasswordEncryptionCost::High),
            "medium" => Ok(PasswordEncryptionCost::Medium),
            "low" => Ok(PasswordEncryptionCost::Low),
            _ => Err(format!(
                "Invalid cost value {}, must be high, medium or low",
                s
            )),
        }
    }
}

impl PasswordEncryptionCost {
    fn to_value(self) -> u32 {
        match self {
            PasswordEncryptionCost::High => DEFAULT_COST,
            PasswordEncryptionCost::Medium => MEDIUM_COST,
            PasswordEncryptionCost::Low => LOW_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hashes_password() {
        let credentials = UserCredentialsBuilder::default()
            .with_user_id("u1")
            .with_email("ana@example.com")
            .with_password("s3cret")
            .with_password_encryption_cost(PasswordEncryptionCost::Low)
            .build()
            .expect("Unable to build credentials");

        assert_ne!(credentials.password, "s3cret");
        assert!(credentials
            .verify_password("s3cret")
            .expect("Unable to verify password"));
        assert!(!credentials
            .verify_password("wrong")
            .expect("Unable to verify password"));
    }

    #[test]
    fn test_build_missing_password() {
        let result = UserCredentialsBuilder::default()
            .with_user_id("u1")
            .with_email("ana@example.com")
            .build();

        assert!(matches!(
            result,
            Err(UserCredentialsBuilderError::MissingRequiredField(_))
        ));
    }

    #[test]
    fn test_parse_cost() {
        assert_eq!(
            "Medium".parse::<PasswordEncryptionCost>(),
            Ok(PasswordEncryptionCost::Medium)
        );
        assert!("extreme".parse::<PasswordEncryptionCost>().is_err());
    }
}
