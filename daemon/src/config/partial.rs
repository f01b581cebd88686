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

//! An intermediate representation of the configuration values used by heraldd, taken from
//! different sources into a common representation.

/// Displays the source of the configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeraldConfigSource {
    Default,
    Toml { file: String },
    Environment,
    CommandLine,
}

pub struct PartialHeraldConfig {
    source: HeraldConfigSource,
    bind: Option<String>,
    database_url: Option<String>,
    master_password: Option<String>,
    token_secret: Option<String>,
    token_issuer: Option<String>,
    token_duration: Option<u64>,
    password_cost: Option<String>,
    push_server_key: Option<String>,
    push_url: Option<String>,
    verbosity: Option<log::Level>,
}

impl PartialHeraldConfig {
    pub fn new(source: HeraldConfigSource) -> Self {
        PartialHeraldConfig {
            source,
            bind: None,
            database_url: None,
            master_password: None,
            token_secret: None,
            token_issuer: None,
            token_duration: None,
            password_cost: None,
            push_server_key: None,
            push_url: None,
            verbosity: None,
        }
    }

    pub fn source(&self) -> HeraldConfigSource {
        self.source.clone()
    }

    pub fn bind(&self) -> Option<String> {
        self.bind.clone()
    }

    pub fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    pub fn master_password(&self) -> Option<String> {
        self.master_password.clone()
    }

    pub fn token_secret(&self) -> Option<String> {
        self.token_secret.clone()
    }

    pub fn token_issuer(&self) -> Option<String> {
        self.token_issuer.clone()
    }

    pub fn token_duration(&self) -> Option<u64> {
        self.token_duration
    }

    pub fn password_cost(&self) -> Option<String> {
        self.password_cost.clone()
    }

    pub fn push_server_key(&self) -> Option<String> {
        self.push_server_key.clone()
    }

    pub fn push_url(&self) -> Option<String> {
        self.push_url.clone()
    }

    pub fn verbosity(&self) -> Option<log::Level> {
        self.verbosity
    }

    /// Adds a `bind` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `bind` - Endpoint the REST API will bind to
    ///
    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        self.bind = bind;
        self
    }

    /// Adds a `database_url` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `database_url` - `memory`, `sqlite://<path>` or a path to a `.db` file
    ///
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        self.database_url = database_url;
        self
    }

    /// Adds a `master_password` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `master_password` - Password required to register an administrator
    ///
    pub fn with_master_password(mut self, master_password: Option<String>) -> Self {
        self.master_password = master_password;
        self
    }

    /// Adds a `token_secret` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `token_secret` - Secret used to sign session tokens
    ///
    pub fn with_token_secret(mut self, token_secret: Option<String>) -> Self {
        self.token_secret = token_secret;
        self
    }

    pub fn with_token_issuer(mut self, token_issuer: Option<String>) -> Self {
        self.token_issuer = token_issuer;
        self
    }

    /// Adds a `token_duration` value, in seconds, to the `PartialHeraldConfig` object.
    pub fn with_token_duration(mut self, token_duration: Option<u64>) -> Self {
        self.token_duration = token_duration;
        self
    }

    /// Adds a `password_cost` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `password_cost` - One of `high`, `medium` or `low`
    ///
    pub fn with_password_cost(mut self, password_cost: Option<String>) -> Self {
        self.password_cost = password_cost;
        self
    }

    pub fn with_push_server_key(mut self, push_server_key: Option<String>) -> Self {
        self.push_server_key = push_server_key;
        self
    }

    pub fn with_push_url(mut self, push_url: Option<String>) -> Self {
        self.push_url = push_url;
        self
    }

    /// Adds a `verbosity` value to the `PartialHeraldConfig` object.
    ///
    /// # Arguments
    ///
    /// * `verbosity` - Level of logging to be performed
    ///
    pub fn with_verbosity(mut self, verbosity: Option<log::Level>) -> Self {
        self.verbosity = verbosity;
        self
    }
}
