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

//! Blocking HTTP client for the Herald REST API.

use std::time::Duration;

use herald_sdk::auth::{LoginRequest, RegisterRequest, Session};
use herald_sdk::notifications::{Notification, SendNotificationRequest};
use herald_sdk::users::User;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Extra time allowed on top of the server-side wait of a watch request.
const WATCH_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct FeedSlice {
    pub data: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Deserialize)]
struct MessageSlice {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UpdatedSlice {
    updated: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorSlice {
    message: String,
}

#[derive(Serialize)]
struct PushTokenPayload<'a> {
    push_token: &'a str,
}

#[derive(Serialize)]
struct RestoreSessionPayload<'a> {
    push_token: Option<&'a str>,
}

pub struct HeraldClient {
    url: String,
    client: Client,
    token: Option<String>,
}

impl HeraldClient {
    pub fn new(url: &str) -> Self {
        HeraldClient {
            url: url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token: None,
        }
    }

    /// Sends later requests with `token` as the bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<Session, CliError> {
        let response = self.post("/auth/register").json(request).send()?;
        parse(response)
    }

    pub fn login(&self, request: &LoginRequest) -> Result<Session, CliError> {
        let response = self.post("/auth/login").json(request).send()?;
        parse(response)
    }

    pub fn restore_session(&self, push_token: Option<&str>) -> Result<Session, CliError> {
        let response = self
            .authorized(self.post("/auth/session"))?
            .json(&RestoreSessionPayload { push_token })
            .send()?;
        parse(response)
    }

    pub fn logout(&self) -> Result<String, CliError> {
        let response = self.authorized(self.post("/auth/logout"))?.send()?;
        parse::<MessageSlice>(response).map(|slice| slice.message)
    }

    pub fn update_push_token(&self, push_token: &str) -> Result<String, CliError> {
        let url = self.endpoint("/auth/push_token");
        debug!("PUT {}", url);
        let response = self
            .authorized(self.client.put(&url))?
            .json(&PushTokenPayload { push_token })
            .send()?;
        parse::<MessageSlice>(response).map(|slice| slice.message)
    }

    pub fn list_users(&self) -> Result<Vec<User>, CliError> {
        let response = self.authorized(self.get("/users"))?.send()?;
        parse(response)
    }

    pub fn list_notifications(&self) -> Result<FeedSlice, CliError> {
        let response = self.authorized(self.get("/notifications"))?.send()?;
        parse(response)
    }

    pub fn send_notification(
        &self,
        request: &SendNotificationRequest,
    ) -> Result<Notification, CliError> {
        let response = self
            .authorized(self.post("/notifications"))?
            .json(request)
            .send()?;
        parse(response)
    }

    pub fn mark_as_read(&self, id: &str) -> Result<String, CliError> {
        let response = self
            .authorized(self.post(&format!("/notifications/{}/read", id)))?
            .send()?;
        parse::<MessageSlice>(response).map(|slice| slice.message)
    }

    pub fn mark_all_as_read(&self) -> Result<usize, CliError> {
        let response = self
            .authorized(self.post("/notifications/read_all"))?
            .send()?;
        parse::<UpdatedSlice>(response).map(|slice| slice.updated)
    }

    /// Waits up to `timeout` for the feed to change. Returns `None` if nothing changed.
    pub fn watch(&self, timeout: Duration) -> Result<Option<FeedSlice>, CliError> {
        let response = self
            .authorized(self.get("/notifications/watch"))?
            .query(&[("timeout_secs", timeout.as_secs())])
            .timeout(timeout + WATCH_GRACE)
            .send()?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        parse(response).map(Some)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        self.client.get(&url)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        self.client.post(&url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, CliError> {
        let token = self.token.as_ref().ok_or_else(|| {
            CliError::SessionError("Not logged in; run `herald login` first".to_string())
        })?;
        Ok(request.bearer_auth(token))
    }
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>()?);
    }

    let body = response.text()?;
    let message = serde_json::from_str::<ErrorSlice>(&body)
        .map(|error| error.message)
        .unwrap_or(body);

    if status == StatusCode::UNAUTHORIZED {
        Err(CliError::SessionError(message))
    } else {
        Err(CliError::DaemonError(message))
    }
}
