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

//! Registration, login and bearer token sessions.

mod error;
mod service;

use std::time::Duration;

use crate::credentials::PasswordEncryptionCost;
use crate::error::InvalidArgumentError;
use crate::users::User;

pub use error::AuthServiceError;
pub use service::AuthService;

pub const DEFAULT_MASTER_PASSWORD: &str = "Admin123!";
pub const DEFAULT_ISSUER: &str = "self-issued";
pub const DEFAULT_ACCESS_TOKEN_DURATION: Duration = Duration::from_secs(5400);

/// Settings for `AuthService`.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    master_password: String,
    token_secret: String,
    issuer: String,
    access_token_duration: Duration,
    password_encryption_cost: PasswordEncryptionCost,
}

impl AuthConfig {
    /// The shared password required to register an administrator.
    pub fn master_password(&self) -> &str {
        &self.master_password
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn access_token_duration(&self) -> Duration {
        self.access_token_duration
    }

    pub fn password_encryption_cost(&self) -> PasswordEncryptionCost {
        self.password_encryption_cost
    }
}

#[derive(Default)]
pub struct AuthConfigBuilder {
    master_password: Option<String>,
    token_secret: Option<String>,
    issuer: Option<String>,
    access_token_duration: Option<Duration>,
    password_encryption_cost: Option<PasswordEncryptionCost>,
}

impl AuthConfigBuilder {
    pub fn new() -> Self {
        AuthConfigBuilder::default()
    }

    pub fn with_master_password(mut self, master_password: &str) -> Self {
        self.master_password = Some(master_password.to_string());
        self
    }

    /// Sets the secret used to sign and verify access tokens. Required.
    pub fn with_token_secret(mut self, token_secret: &str) -> Self {
        self.token_secret = Some(token_secret.to_string());
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    pub fn with_access_token_duration(mut self, duration: Duration) -> Self {
        self.access_token_duration = Some(duration);
        self
    }

    pub fn with_password_encryption_cost(mut self, cost: PasswordEncryptionCost) -> Self {
        self.password_encryption_cost = Some(cost);
        self
    }

    pub fn build(self) -> Result<AuthConfig, InvalidArgumentError> {
        let token_secret = self
            .token_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                InvalidArgumentError::new(
                    "token_secret".to_string(),
                    "A token secret is required".to_string(),
                )
            })?;

        Ok(AuthConfig {
            master_password: self
                .master_password
                .unwrap_or_else(|| DEFAULT_MASTER_PASSWORD.to_string()),
            token_secret,
            issuer: self.issuer.unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            access_token_duration: self
                .access_token_duration
                .unwrap_or(DEFAULT_ACCESS_TOKEN_DURATION),
            password_encryption_cost: self
                .password_encryption_cost
                .unwrap_or(PasswordEncryptionCost::High),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub master_password: Option<String>,
    #[serde(default)]
    pub push_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub push_token: Option<String>,
}

/// A signed-in user together with the bearer token for later requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AuthConfigBuilder::new()
            .with_token_secret("secret")
            .build()
            .expect("Unable to build config");

        assert_eq!(config.master_password(), DEFAULT_MASTER_PASSWORD);
        assert_eq!(config.issuer(), DEFAULT_ISSUER);
        assert_eq!(config.access_token_duration(), Duration::from_secs(5400));
        assert_eq!(
            config.password_encryption_cost(),
            PasswordEncryptionCost::High
        );
    }

    #[test]
    fn test_config_requires_secret() {
        assert!(AuthConfigBuilder::new().build().is_err());
        assert!(AuthConfigBuilder::new()
            .with_token_secret("")
            .build()
            .is_err());
    }
}
