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

use crate::auth::AuthService;
use crate::rest_api::resources::{error::ErrorResponse, MessageResponse};
use crate::users::User;

use super::payloads::{LoginRequest, RegisterRequest, RestoreSessionRequest, Session};

pub fn register(
    auth_service: &AuthService,
    request: RegisterRequest,
) -> Result<Session, ErrorResponse> {
    Ok(auth_service.register(request)?)
}

pub fn login(auth_service: &AuthService, request: LoginRequest) -> Result<Session, ErrorResponse> {
    Ok(auth_service.login(request)?)
}

pub fn restore_session(
    auth_service: &AuthService,
    token: &str,
    request: RestoreSessionRequest,
) -> Result<Session, ErrorResponse> {
    Ok(auth_service.restore_session(token, request.push_token.as_deref())?)
}

pub fn logout(auth_service: &AuthService, user: &User) -> Result<MessageResponse, ErrorResponse> {
    auth_service.logout(user.uid())?;
    Ok(MessageResponse::new("Logged out"))
}

pub fn update_push_token(
    auth_service: &AuthService,
    user: &User,
    push_token: &str,
) -> Result<MessageResponse, ErrorResponse> {
    auth_service.update_push_token(user.uid(), push_token)?;
    Ok(MessageResponse::new("Push token updated"))
}
