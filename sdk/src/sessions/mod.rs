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

//! JSON web tokens used as bearer access tokens.

mod claims;
mod error;
mod token_issuer;

use jsonwebtoken::{decode, Validation};
use serde::Serialize;

pub use claims::{Claims, ClaimsBuilder, ADMIN_CLAIM};
pub use error::{ClaimsBuildError, TokenIssuerError, TokenValidationError};
pub use token_issuer::AccessTokenIssuer;

const DEFAULT_LEEWAY: i64 = 10; // default leeway in seconds.

pub trait TokenIssuer<T: Serialize> {
    /// Issues a JWT token with the given claims
    fn issue_token_with_claims(&self, claims: T) -> Result<String, TokenIssuerError>;
}

/// Decodes and validates a token, returning its claims.
///
/// The signature, issuer and expiration are checked first, then `extra_validation` is run against
/// the decoded claims.
pub fn validate_token<F>(
    token: &str,
    secret: &str,
    issuer: &str,
    extra_validation: F,
) -> Result<Claims, TokenValidationError>
where
    F: Fn(&Claims) -> Result<(), TokenValidationError>,
{
    let validation = default_validation(DEFAULT_LEEWAY, issuer);
    let claims = decode::<Claims>(token, secret.as_bytes(), &validation)?.claims;

    extra_validation(&claims)?;

    Ok(claims)
}

fn default_validation(leeway: i64, issuer: &str) -> Validation {
    let mut validation = Validation::default();
    validation.leeway = leeway;
    validation.iss = Some(issuer.to_string());
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "self-issued";

    fn issue(duration: Duration, admin: bool) -> String {
        let claims = ClaimsBuilder::default()
            .with_user_id("u1")
            .with_issuer(ISSUER)
            .with_duration(duration)
            .with_custom_claim(ADMIN_CLAIM, &admin.to_string())
            .build()
            .expect("Unable to build claims");

        AccessTokenIssuer::new(SECRET.to_string())
            .issue_token_with_claims(claims)
            .expect("Unable to issue token")
    }

    #[test]
    fn test_validate_issued_token() {
        let token = issue(Duration::from_secs(60), true);

        let claims = validate_token(&token, SECRET, ISSUER, |_| Ok(()))
            .expect("Unable to validate token");
        assert_eq!(claims.user_id(), "u1");
        assert!(claims.is_admin());
    }

    #[test]
    fn test_validate_wrong_secret() {
        let token = issue(Duration::from_secs(60), false);

        assert!(validate_token(&token, "other-secret", ISSUER, |_| Ok(())).is_err());
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let token = issue(Duration::from_secs(60), false);

        assert!(validate_token(&token, SECRET, "someone-else", |_| Ok(())).is_err());
    }

    #[test]
    fn test_extra_validation_rejects() {
        let token = issue(Duration::from_secs(60), false);

        let result = validate_token(&token, SECRET, ISSUER, |claims| {
            if claims.is_admin() {
                Ok(())
            } else {
                Err(TokenValidationError::InvalidClaim(
                    "admin claim required".to_string(),
                ))
            }
        });
        assert!(matches!(result, Err(TokenValidationError::InvalidClaim(_))));
    }
}
