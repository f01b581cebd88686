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

use crate::notifications::NotificationService;
use crate::rest_api::resources::error::ErrorResponse;
use crate::users::User;

/// Lists every user for an administrator.
pub fn list_users(
    notification_service: &NotificationService,
    requester: &User,
) -> Result<Vec<User>, ErrorResponse> {
    Ok(notification_service.list_users(requester)?)
}
