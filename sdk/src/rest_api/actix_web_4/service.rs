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

use actix_web_4::{
    dev, http::header::AUTHORIZATION, http::StatusCode, web::Data, Error, FromRequest,
    HttpRequest, HttpResponse, ResponseError,
};
use futures::future::{ready, Ready};

use crate::auth::AuthService;
use crate::error::InternalError;
use crate::notifications::NotificationService;
use crate::rest_api::resources::error::ErrorResponse;
use crate::users::User;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(auth_service: AuthService, notification_service: NotificationService) -> Self {
        AppState {
            auth_service,
            notification_service,
        }
    }
}

impl ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(self)
    }
}

/// The raw token from an `Authorization: Bearer <token>` header, not yet validated.
pub struct BearerToken(pub String);

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(bearer_token(req).map(BearerToken).map_err(Error::from))
    }
}

/// The user named by a valid bearer token.
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(authenticate(req).map_err(Error::from))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ErrorResponse> {
    let token = bearer_token(req)?;
    let state = req.app_data::<Data<AppState>>().ok_or_else(|| {
        ErrorResponse::internal_error(Box::new(InternalError::with_message(
            "App state not found".to_string(),
        )))
    })?;

    let user = state.auth_service.authorize(&token)?;

    Ok(AuthenticatedUser { user, token })
}

fn bearer_token(req: &HttpRequest) -> Result<String, ErrorResponse> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ErrorResponse::new(401, "Missing Authorization header"))?
        .to_str()
        .map_err(|_| ErrorResponse::new(401, "Malformed Authorization header"))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ErrorResponse::new(
            401,
            "Authorization header must be a bearer token",
        )),
    }
}
