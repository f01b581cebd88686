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

use std::error;
use std::fmt;

use crate::auth::AuthServiceError;
use crate::notifications::NotificationServiceError;

/// An error ready to be returned as an HTTP response body of `{status_code, message}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    status_code: u16,

    message: String,

    /// The underlying error, logged but never sent to the client
    #[serde(skip_serializing)]
    source: Option<Box<dyn error::Error>>,
}

impl ErrorResponse {
    /// Create a new ErrorResponse
    ///
    /// # Examples
    /// ```
    /// use herald_sdk::rest_api::resources::error::ErrorResponse;
    ///
    /// let response = ErrorResponse::new(404, "No notification with id n1");
    ///
    /// assert_eq!(404, response.status_code());
    /// assert_eq!("No notification with id n1", response.message());
    /// ```
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            message: message.to_string(),
            source: None,
        }
    }

    /// Create a 500 ErrorResponse with a generic message, keeping `source` for the logs
    pub fn internal_error(source: Box<dyn error::Error>) -> Self {
        error!("Internal error while handling request: {}", source);
        Self {
            status_code: 500,
            message: "An internal error occurred".to_string(),
            source: Some(source),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl error::Error for ErrorResponse {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_ref().map(|s| s.as_ref())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.source {
            Some(ref src) => write!(f, "{}", src),
            None => write!(f, "{}: {}", self.status_code, self.message),
        }
    }
}

impl From<AuthServiceError> for ErrorResponse {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidArgumentError(ref inner) => {
                ErrorResponse::new(400, &inner.to_string())
            }
            AuthServiceError::InvalidCredentialsError | AuthServiceError::InvalidTokenError(_) => {
                ErrorResponse::new(401, &err.to_string())
            }
            AuthServiceError::PermissionDeniedError(ref msg) => ErrorResponse::new(403, msg),
            AuthServiceError::NotFoundError(ref msg) => ErrorResponse::new(404, msg),
            AuthServiceError::ConflictError(ref msg) => ErrorResponse::new(409, msg),
            AuthServiceError::ResourceTemporarilyUnavailableError(_) => {
                ErrorResponse::new(503, "Service temporarily unavailable, try again later")
            }
            AuthServiceError::InternalError(_) => ErrorResponse::internal_error(Box::new(err)),
        }
    }
}

impl From<NotificationServiceError> for ErrorResponse {
    fn from(err: NotificationServiceError) -> Self {
        match err {
            NotificationServiceError::InvalidArgumentError(ref inner) => {
                ErrorResponse::new(400, &inner.to_string())
            }
            NotificationServiceError::PermissionDeniedError(ref msg) => {
                ErrorResponse::new(403, msg)
            }
            NotificationServiceError::NotFoundError(ref msg) => ErrorResponse::new(404, msg),
            NotificationServiceError::ResourceTemporarilyUnavailableError(_) => {
                ErrorResponse::new(503, "Service temporarily unavailable, try again later")
            }
            NotificationServiceError::InternalError(_) => {
                ErrorResponse::internal_error(Box::new(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;
    use serde_json::Result;

    use crate::error::{InternalError, InvalidArgumentError};

    // Deny any unknown fields so we can test for data leaks
    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Response {
        status_code: u16,
        message: String,
    }

    #[test]
    fn test_internal_error_hides_source() -> Result<()> {
        let response = ErrorResponse::from(NotificationServiceError::InternalError(
            InternalError::with_message("database file is locked".to_string()),
        ));
        let json = serde_json::to_string(&response)?;
        let deserialized: Response = serde_json::from_str(&json)?;

        assert_eq!(deserialized.status_code, 500);
        assert_eq!(deserialized.message, "An internal error occurred");
        assert_eq!(response.to_string(), "database file is locked");

        Ok(())
    }

    #[test]
    fn test_auth_error_status_codes() {
        let codes: Vec<u16> = vec![
            AuthServiceError::InvalidArgumentError(InvalidArgumentError::new(
                "email".to_string(),
                "Email is required".to_string(),
            )),
            AuthServiceError::InvalidCredentialsError,
            AuthServiceError::InvalidTokenError("expired".to_string()),
            AuthServiceError::PermissionDeniedError("incorrect master password".to_string()),
            AuthServiceError::NotFoundError("gone".to_string()),
            AuthServiceError::ConflictError("taken".to_string()),
        ]
        .into_iter()
        .map(|err| ErrorResponse::from(err).status_code())
        .collect();

        assert_eq!(codes, vec![400, 401, 401, 403, 404, 409]);
    }

    #[test]
    fn test_notification_error_status_codes() {
        assert_eq!(
            ErrorResponse::from(NotificationServiceError::PermissionDeniedError(
                "admins only".to_string()
            ))
            .status_code(),
            403
        );
        assert_eq!(
            ErrorResponse::from(NotificationServiceError::NotFoundError("n1".to_string()))
                .message(),
            "n1"
        );
    }
}
