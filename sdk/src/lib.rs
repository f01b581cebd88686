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

//! Herald SDK
//!
//! Accounts, sessions and notifications for the Herald notification service. Notifications are
//! either addressed to one user or broadcast to every user; broadcast read state is tracked per
//! reader through read markers and the shared record is never modified.

#[macro_use]
extern crate serde;
#[cfg(feature = "sqlite")]
#[macro_use]
extern crate diesel;
#[cfg(feature = "sqlite")]
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate log;

pub mod auth;
pub mod credentials;
pub mod error;
#[cfg(feature = "sqlite")]
pub mod migrations;
pub mod notifications;
pub mod push;
#[cfg(feature = "rest-api")]
pub mod rest_api;
pub mod sessions;
pub mod store;
pub mod threading;
pub mod users;

pub(crate) fn current_time_millis() -> Result<i64, error::InternalError> {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .map_err(|err| error::InternalError::from_source(Box::new(err)))
}
