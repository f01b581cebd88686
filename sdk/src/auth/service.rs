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

use super::{AuthConfig, AuthServiceError, LoginRequest, RegisterRequest, Session};
use crate::credentials::{CredentialsStore, CredentialsStoreError, UserCredentialsBuilder};
use crate::error::InvalidArgumentError;
use crate::sessions::{
    validate_token, AccessTokenIssuer, ClaimsBuilder, TokenIssuer, TokenValidationError,
    ADMIN_CLAIM,
};
use crate::users::{User, UserBuilder, UserStore};

/// Registers users, signs them in and resolves bearer tokens back to users.
///
/// A user's push token is refreshed on every login, session restore and token callback, and
/// cleared on logout, so pushes follow the device the user last used.
#[derive(Clone)]
pub struct AuthService {
    user_store: Box<dyn UserStore>,
    credentials_store: Box<dyn CredentialsStore>,
    token_issuer: AccessTokenIssuer,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        user_store: Box<dyn UserStore>,
        credentials_store: Box<dyn CredentialsStore>,
        config: AuthConfig,
    ) -> Self {
        AuthService {
            user_store,
            credentials_store,
            token_issuer: AccessTokenIssuer::new(config.token_secret().to_string()),
            config,
        }
    }

    /// Creates an account and signs it in.
    ///
    /// Registering an administrator requires the configured master password.
    pub fn register(&self, request: RegisterRequest) -> Result<Session, AuthServiceError> {
        let name = request.name.trim();
        let email = normalize_email(&request.email);

        if name.is_empty() {
            return Err(invalid_argument("name", "Name is required"));
        }
        if email.is_empty() {
            return Err(invalid_argument("email", "Email is required"));
        }
        if !email.contains('@') {
            return Err(invalid_argument("email", "Email address is malformed"));
        }
        if request.password.is_empty() {
            return Err(invalid_argument("password", "Password is required"));
        }
        if request.is_admin
            && request.master_password.as_deref() != Some(self.config.master_password())
        {
            return Err(AuthServiceError::PermissionDeniedError(
                "incorrect master password".to_string(),
            ));
        }
        if self.user_store.get_user_by_email(&email)?.is_some() {
            return Err(AuthServiceError::ConflictError(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let uid = uuid::Uuid::new_v4().to_string();

        let credentials = UserCredentialsBuilder::default()
            .with_user_id(&uid)
            .with_email(&email)
            .with_password(&request.password)
            .with_password_encryption_cost(self.config.password_encryption_cost())
            .build()?;
        let user = UserBuilder::new()
            .with_uid(&uid)
            .with_email(&email)
            .with_name(name)
            .with_admin(request.is_admin)
            .with_push_token(request.push_token.as_deref().unwrap_or(""))
            .build()?;

        // credentials reference the user, so the user is written first and removed again if
        // the credentials cannot be stored
        self.user_store.add_user(user.clone())?;
        if let Err(err) = self.credentials_store.add_credentials(credentials) {
            if let Err(remove_err) = self.user_store.remove_user(&uid) {
                error!(
                    "Unable to remove user {} after failed registration: {}",
                    uid, remove_err
                );
            }
            return Err(err.into());
        }

        info!(
            "Registered {} {}",
            if user.is_admin() { "admin" } else { "user" },
            uid
        );

        self.open_session(user)
    }

    /// Signs in with email and password.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub fn login(&self, request: LoginRequest) -> Result<Session, AuthServiceError> {
        let email = normalize_email(&request.email);

        let credentials = match self.credentials_store.fetch_credential_by_email(&email) {
            Ok(credentials) => credentials,
            Err(CredentialsStoreError::NotFoundError(_)) => {
                return Err(AuthServiceError::InvalidCredentialsError)
            }
            Err(err) => return Err(err.into()),
        };

        if !credentials.verify_password(&request.password)? {
            debug!("Rejected login for {}: wrong password", credentials.user_id);
            return Err(AuthServiceError::InvalidCredentialsError);
        }

        let user = self.load_user(&credentials.user_id)?;
        let user = self.refresh_push_token(user, request.push_token.as_deref())?;

        self.open_session(user)
    }

    /// Resumes a session from a still valid token, issuing a fresh one.
    pub fn restore_session(
        &self,
        token: &str,
        push_token: Option<&str>,
    ) -> Result<Session, AuthServiceError> {
        let user = self.authorize(token)?;
        let user = self.refresh_push_token(user, push_token)?;

        self.open_session(user)
    }

    /// Clears the user's push token so the device stops receiving pushes.
    pub fn logout(&self, uid: &str) -> Result<(), AuthServiceError> {
        self.user_store.update_push_token(uid, "")?;
        debug!("Cleared push token for {}", uid);
        Ok(())
    }

    pub fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), AuthServiceError> {
        Ok(self.user_store.update_push_token(uid, push_token)?)
    }

    /// Resolves a bearer token to its user.
    pub fn authorize(&self, token: &str) -> Result<User, AuthServiceError> {
        let claims = validate_token(
            token,
            self.config.token_secret(),
            self.config.issuer(),
            |claims| {
                if claims.user_id().is_empty() {
                    Err(TokenValidationError::InvalidClaim(
                        "user_id is empty".to_string(),
                    ))
                } else {
                    Ok(())
                }
            },
        )
        .map_err(|err| AuthServiceError::InvalidTokenError(err.to_string()))?;

        self.user_store
            .get_user(claims.user_id())?
            .ok_or_else(|| AuthServiceError::InvalidTokenError("unknown user".to_string()))
    }

    fn load_user(&self, uid: &str) -> Result<User, AuthServiceError> {
        self.user_store
            .get_user(uid)?
            .ok_or_else(|| AuthServiceError::NotFoundError(format!("No user with id {}", uid)))
    }

    fn refresh_push_token(
        &self,
        mut user: User,
        push_token: Option<&str>,
    ) -> Result<User, AuthServiceError> {
        if let Some(push_token) = push_token.filter(|token| !token.is_empty()) {
            if push_token != user.push_token() {
                self.user_store.update_push_token(user.uid(), push_token)?;
                user.set_push_token(push_token);
            }
        }
        Ok(user)
    }

    fn open_session(&self, user: User) -> Result<Session, AuthServiceError> {
        let claims = ClaimsBuilder::default()
            .with_user_id(user.uid())
            .with_issuer(self.config.issuer())
            .with_duration(self.config.access_token_duration())
            .with_custom_claim(ADMIN_CLAIM, &user.is_admin().to_string())
            .build()?;
        let token = self.token_issuer.issue_token_with_claims(claims)?;

        Ok(Session { user, token })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_argument(argument: &str, message: &str) -> AuthServiceError {
    AuthServiceError::InvalidArgumentError(InvalidArgumentError::new(
        argument.to_string(),
        message.to_string(),
    ))
}
