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

//! User accounts and their device push tokens.

pub mod store;

use std::error::Error;
use std::fmt;

pub use store::{MemoryUserStore, UserStore, UserStoreError};
#[cfg(feature = "sqlite")]
pub use store::DieselUserStore;

/// A registered user.
///
/// `push_token` is the device token notifications are pushed to. An empty string means the user
/// has no device registered, for example after logging out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    uid: String,
    email: String,
    name: String,
    is_admin: bool,
    #[serde(default)]
    push_token: String,
}

impl User {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn push_token(&self) -> &str {
        &self.push_token
    }

    /// Returns the push token, if one is registered.
    pub fn device_token(&self) -> Option<&str> {
        if self.push_token.is_empty() {
            None
        } else {
            Some(&self.push_token)
        }
    }

    pub(crate) fn set_push_token(&mut self, token: &str) {
        self.push_token = token.to_string();
    }
}

#[derive(Default, Clone)]
pub struct UserBuilder {
    uid: Option<String>,
    email: Option<String>,
    name: Option<String>,
    is_admin: bool,
    push_token: Option<String>,
}

impl UserBuilder {
    pub fn new() -> Self {
        UserBuilder::default()
    }

    pub fn with_uid(mut self, uid: &str) -> Self {
        self.uid = Some(uid.to_string());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_push_token(mut self, push_token: &str) -> Self {
        self.push_token = Some(push_token.to_string());
        self
    }

    pub fn build(self) -> Result<User, UserBuilderError> {
        let uid = self
            .uid
            .ok_or_else(|| UserBuilderError::MissingRequiredField("uid".to_string()))?;
        let email = self
            .email
            .ok_or_else(|| UserBuilderError::MissingRequiredField("email".to_string()))?;
        let name = self
            .name
            .ok_or_else(|| UserBuilderError::MissingRequiredField("name".to_string()))?;

        Ok(User {
            uid,
            email,
            name,
            is_admin: self.is_admin,
            push_token: self.push_token.unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
pub enum UserBuilderError {
    MissingRequiredField(String),
}

impl Error for UserBuilderError {}

impl fmt::Display for UserBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UserBuilderError::MissingRequiredField(ref s) => {
                write!(f, "missing required field: {}", s)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_without_token() {
        let user = UserBuilder::new()
            .with_uid("u1")
            .with_email("ana@example.com")
            .with_name("Ana")
            .build()
            .expect("Unable to build user");

        assert_eq!(user.push_token(), "");
        assert_eq!(user.device_token(), None);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_build_user_missing_email() {
        let result = UserBuilder::new().with_uid("u1").with_name("Ana").build();

        match result {
            Err(UserBuilderError::MissingRequiredField(field)) => assert_eq!(field, "email"),
            Ok(_) => panic!("Built a user without an email"),
        }
    }
}
