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

use actix_web_4::{web, HttpResponse};

use crate::rest_api::actix_web_4::{AppState, AuthenticatedUser, BearerToken};
use crate::rest_api::resources::auth::v1;

use super::error_response;

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<v1::RegisterRequest>,
) -> HttpResponse {
    match v1::register(&state.auth_service, body.into_inner()) {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}

pub async fn login(state: web::Data<AppState>, body: web::Json<v1::LoginRequest>) -> HttpResponse {
    match v1::login(&state.auth_service, body.into_inner()) {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}

pub async fn restore_session(
    state: web::Data<AppState>,
    token: BearerToken,
    body: Option<web::Json<v1::RestoreSessionRequest>>,
) -> HttpResponse {
    let request = body.map(|body| body.into_inner()).unwrap_or_default();
    match v1::restore_session(&state.auth_service, &token.0, request) {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}

pub async fn logout(state: web::Data<AppState>, auth: AuthenticatedUser) -> HttpResponse {
    match v1::logout(&state.auth_service, &auth.user) {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(err) => error_response(err),
    }
}

pub async fn update_push_token(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<v1::PushTokenRequest>,
) -> HttpResponse {
    match v1::update_push_token(&state.auth_service, &auth.user, &body.push_token) {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(err) => error_response(err),
    }
}
