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

use crate::rest_api::actix_web_4::{AppState, AuthenticatedUser};
use crate::rest_api::resources::users::v1;

use super::error_response;

pub async fn list_users(state: web::Data<AppState>, auth: AuthenticatedUser) -> HttpResponse {
    match v1::list_users(&state.notification_service, &auth.user) {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(err) => error_response(err),
    }
}
