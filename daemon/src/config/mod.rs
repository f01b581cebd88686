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

//! Configuration to provide the necessary values to start up the Herald daemon.
//!
//! These values may be sourced from command line arguments, environment variables, a TOML file
//! or pre-defined defaults. This module allows for configuration values from each of these
//! sources to be combined into a final `HeraldConfig` object.

mod builder;
mod clap;
mod default;
mod env;
pub mod error;
mod partial;
mod toml;

use std::time::Duration;

use herald_sdk::credentials::PasswordEncryptionCost;

pub use self::builder::{HeraldConfigBuilder, PartialHeraldConfigBuilder};
pub use self::clap::ClapPartialHeraldConfigBuilder;
pub use self::default::DefaultPartialHeraldConfigBuilder;
pub use self::env::EnvPartialHeraldConfigBuilder;
pub use self::partial::{HeraldConfigSource, PartialHeraldConfig};
pub use self::toml::TomlPartialHeraldConfigBuilder;

const REDACTED: &str = "<redacted>";

#[derive(Debug)]
pub struct HeraldConfig {
    bind: (String, HeraldConfigSource),
    database_url: (String, HeraldConfigSource),
    master_password: (String, HeraldConfigSource),
    token_secret: (String, HeraldConfigSource),
    token_issuer: (String, HeraldConfigSource),
    token_duration: (u64, HeraldConfigSource),
    password_cost: (PasswordEncryptionCost, HeraldConfigSource),
    push_server_key: Option<(String, HeraldConfigSource)>,
    push_url: (String, HeraldConfigSource),
    verbosity: (log::Level, HeraldConfigSource),
}

impl HeraldConfig {
    pub fn bind(&self) -> &str {
        &self.bind.0
    }

    pub fn bind_source(&self) -> &HeraldConfigSource {
        &self.bind.1
    }

    pub fn database_url(&self) -> &str {
        &self.database_url.0
    }

    pub fn database_url_source(&self) -> &HeraldConfigSource {
        &self.database_url.1
    }

    pub fn master_password(&self) -> &str {
        &self.master_password.0
    }

    pub fn master_password_source(&self) -> &HeraldConfigSource {
        &self.master_password.1
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret.0
    }

    pub fn token_secret_source(&self) -> &HeraldConfigSource {
        &self.token_secret.1
    }

    pub fn token_issuer(&self) -> &str {
        &self.token_issuer.0
    }

    pub fn token_issuer_source(&self) -> &HeraldConfigSource {
        &self.token_issuer.1
    }

    pub fn token_duration(&self) -> Duration {
        Duration::from_secs(self.token_duration.0)
    }

    pub fn token_duration_source(&self) -> &HeraldConfigSource {
        &self.token_duration.1
    }

    pub fn password_cost(&self) -> PasswordEncryptionCost {
        self.password_cost.0
    }

    pub fn password_cost_source(&self) -> &HeraldConfigSource {
        &self.password_cost.1
    }

    /// The push provider server key. Push delivery is disabled when it is not set.
    pub fn push_server_key(&self) -> Option<&str> {
        self.push_server_key.as_ref().map(|(key, _)| key.as_str())
    }

    pub fn push_server_key_source(&self) -> Option<&HeraldConfigSource> {
        self.push_server_key.as_ref().map(|(_, source)| source)
    }

    pub fn push_url(&self) -> &str {
        &self.push_url.0
    }

    pub fn push_url_source(&self) -> &HeraldConfigSource {
        &self.push_url.1
    }

    pub fn verbosity(&self) -> log::Level {
        self.verbosity.0
    }

    pub fn verbosity_source(&self) -> &HeraldConfigSource {
        &self.verbosity.1
    }

    /// Logs every value and its source. Secrets are redacted.
    pub fn log_as_debug(&self) {
        debug!(
            "Herald Config: bind: {} (source: {:?})",
            self.bind(),
            self.bind_source()
        );
        debug!(
            "Herald Config: database_url: {} (source: {:?})",
            self.database_url(),
            self.database_url_source()
        );
        debug!(
            "Herald Config: master_password: {} (source: {:?})",
            REDACTED,
            self.master_password_source()
        );
        debug!(
            "Herald Config: token_secret: {} (source: {:?})",
            REDACTED,
            self.token_secret_source()
        );
        debug!(
            "Herald Config: token_issuer: {} (source: {:?})",
            self.token_issuer(),
            self.token_issuer_source()
        );
        debug!(
            "Herald Config: token_duration: {}s (source: {:?})",
            self.token_duration.0,
            self.token_duration_source()
        );
        debug!(
            "Herald Config: password_cost: {:?} (source: {:?})",
            self.password_cost(),
            self.password_cost_source()
        );
        match self.push_server_key_source() {
            Some(source) => debug!(
                "Herald Config: push_server_key: {} (source: {:?})",
                REDACTED, source
            ),
            None => debug!("Herald Config: push_server_key: not set, push delivery disabled"),
        }
        debug!(
            "Herald Config: push_url: {} (source: {:?})",
            self.push_url(),
            self.push_url_source()
        );
        debug!(
            "Herald Config: verbosity: {} (source: {:?})",
            self.verbosity(),
            self.verbosity_source()
        );
    }
}
