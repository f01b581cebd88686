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

//! Merges `PartialHeraldConfig` objects into a final `HeraldConfig`.

use std::str::FromStr;

use herald_sdk::credentials::PasswordEncryptionCost;

use crate::config::{
    error::HeraldConfigError, HeraldConfig, HeraldConfigSource, PartialHeraldConfig,
};

/// Builds a `PartialHeraldConfig` from one source of configuration values.
pub trait PartialHeraldConfigBuilder {
    fn build(self) -> Result<PartialHeraldConfig, HeraldConfigError>;
}

/// Combines partial configs into a `HeraldConfig`.
///
/// Partial configs must be added highest precedence first; for each value, the first partial
/// config that sets it wins.
#[derive(Default)]
pub struct HeraldConfigBuilder {
    partial_configs: Vec<PartialHeraldConfig>,
}

macro_rules! first_set {
    ($partials:expr, $field:ident) => {
        $partials
            .iter()
            .find_map(|partial| partial.$field().map(|value| (value, partial.source())))
    };
}

impl HeraldConfigBuilder {
    pub fn new() -> Self {
        HeraldConfigBuilder::default()
    }

    pub fn with_partial_config(mut self, partial: PartialHeraldConfig) -> Self {
        self.partial_configs.push(partial);
        self
    }

    pub fn build(self) -> Result<HeraldConfig, HeraldConfigError> {
        let partials = &self.partial_configs;

        let token_secret = first_set!(partials, token_secret)
            .filter(|(secret, _)| !secret.is_empty())
            .ok_or_else(|| HeraldConfigError::MissingValue("token_secret".to_string()))?;

        let (cost, cost_source) = first_set!(partials, password_cost)
            .ok_or_else(|| HeraldConfigError::MissingValue("password_cost".to_string()))?;
        let password_cost = (
            PasswordEncryptionCost::from_str(&cost).map_err(HeraldConfigError::InvalidArgument)?,
            cost_source,
        );

        Ok(HeraldConfig {
            bind: first_set!(partials, bind)
                .ok_or_else(|| HeraldConfigError::MissingValue("bind".to_string()))?,
            database_url: first_set!(partials, database_url)
                .ok_or_else(|| HeraldConfigError::MissingValue("database_url".to_string()))?,
            master_password: first_set!(partials, master_password)
                .ok_or_else(|| HeraldConfigError::MissingValue("master_password".to_string()))?,
            token_secret,
            token_issuer: first_set!(partials, token_issuer)
                .ok_or_else(|| HeraldConfigError::MissingValue("token_issuer".to_string()))?,
            token_duration: first_set!(partials, token_duration)
                .ok_or_else(|| HeraldConfigError::MissingValue("token_duration".to_string()))?,
            password_cost,
            push_server_key: first_set!(partials, push_server_key),
            push_url: first_set!(partials, push_url)
                .ok_or_else(|| HeraldConfigError::MissingValue("push_url".to_string()))?,
            verbosity: first_set!(partials, verbosity)
                .unwrap_or((log::Level::Info, HeraldConfigSource::Default)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::config::DefaultPartialHeraldConfigBuilder;

    fn defaults() -> PartialHeraldConfig {
        DefaultPartialHeraldConfigBuilder::new()
            .build()
            .expect("Unable to build default config")
    }

    /// Values from a higher precedence layer override lower ones; unset values fall through.
    #[test]
    fn test_precedence() {
        let command_line = PartialHeraldConfig::new(HeraldConfigSource::CommandLine)
            .with_bind(Some("0.0.0.0:1".to_string()));
        let environment = PartialHeraldConfig::new(HeraldConfigSource::Environment)
            .with_bind(Some("0.0.0.0:2".to_string()))
            .with_token_secret(Some("env-secret".to_string()));
        let toml = PartialHeraldConfig::new(HeraldConfigSource::Toml {
            file: "herald.toml".to_string(),
        })
        .with_token_secret(Some("toml-secret".to_string()))
        .with_database_url(Some("sqlite://herald.db".to_string()));

        let config = HeraldConfigBuilder::new()
            .with_partial_config(command_line)
            .with_partial_config(environment)
            .with_partial_config(toml)
            .with_partial_config(defaults())
            .build()
            .expect("Unable to build config");

        assert_eq!(config.bind(), "0.0.0.0:1");
        assert_eq!(config.bind_source(), &HeraldConfigSource::CommandLine);
        assert_eq!(config.token_secret(), "env-secret");
        assert_eq!(config.token_secret_source(), &HeraldConfigSource::Environment);
        assert_eq!(config.database_url(), "sqlite://herald.db");
        assert_eq!(config.master_password(), "Admin123!");
        assert_eq!(config.master_password_source(), &HeraldConfigSource::Default);
        assert_eq!(config.password_cost(), PasswordEncryptionCost::High);
        assert_eq!(config.push_server_key(), None);
        assert_eq!(config.verbosity(), log::Level::Info);
    }

    #[test]
    fn test_missing_token_secret() {
        let result = HeraldConfigBuilder::new()
            .with_partial_config(defaults())
            .build();

        assert!(matches!(result, Err(HeraldConfigError::MissingValue(_))));
    }

    #[test]
    fn test_empty_token_secret() {
        let result = HeraldConfigBuilder::new()
            .with_partial_config(
                PartialHeraldConfig::new(HeraldConfigSource::CommandLine)
                    .with_token_secret(Some(String::new())),
            )
            .with_partial_config(defaults())
            .build();

        assert!(matches!(result, Err(HeraldConfigError::MissingValue(_))));
    }

    #[test]
    fn test_invalid_password_cost() {
        let result = HeraldConfigBuilder::new()
            .with_partial_config(
                PartialHeraldConfig::new(HeraldConfigSource::Environment)
                    .with_token_secret(Some("secret".to_string()))
                    .with_password_cost(Some("extreme".to_string())),
            )
            .with_partial_config(defaults())
            .build();

        assert!(matches!(result, Err(HeraldConfigError::InvalidArgument(_))));
    }
}
