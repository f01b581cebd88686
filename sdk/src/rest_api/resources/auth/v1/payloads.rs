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

pub use crate::auth::{LoginRequest, RegisterRequest, Session};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RestoreSessionRequest {
    #[serde(default)]
    pub push_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PushTokenRequest {
    pub push_token: String,
}
