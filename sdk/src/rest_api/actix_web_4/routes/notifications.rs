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

use crate::error::InternalError;
use crate::rest_api::actix_web_4::{AppState, AuthenticatedUser};
use crate::rest_api::resources::error::ErrorResponse;
use crate::rest_api::resources::notifications::v1;

use super::error_response;

pub async fn list_notifications(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> HttpResponse {
    match v1::list_notifications(&state.notification_service, &auth.user) {
        Ok(feed) => HttpResponse::Ok().json(feed),
        Err(err) => error_response(err),
    }
}

pub async fn send_notification(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<v1::SendNotificationRequest>,
) -> HttpResponse {
    match v1::send_notification(&state.notification_service, &auth.user, body.into_inner()) {
        Ok(notification) => HttpResponse::Ok().json(notification),
        Err(err) => error_response(err),
    }
}

pub async fn mark_as_read(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    notification_id: web::Path<String>,
) -> HttpResponse {
    match v1::mark_as_read(&state.notification_service, &auth.user, &notification_id) {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(err) => error_response(err),
    }
}

pub async fn mark_all_as_read(state: web::Data<AppState>, auth: AuthenticatedUser) -> HttpResponse {
    match v1::mark_all_as_read(&state.notification_service, &auth.user) {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(err) => error_response(err),
    }
}

/// Long poll: answers with the new feed as soon as it changes, or 204 after the timeout.
pub async fn watch_notifications(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<v1::WatchQuery>,
) -> HttpResponse {
    let subscription = state.notification_service.subscribe(auth.user.uid());
    let timeout = query.timeout();

    match web::block(move || v1::wait_for_feed(subscription, timeout)).await {
        Ok(Some(feed)) => HttpResponse::Ok().json(feed),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(ErrorResponse::internal_error(Box::new(
            InternalError::with_message(format!("Unable to wait for feed: {}", err)),
        ))),
    }
}
