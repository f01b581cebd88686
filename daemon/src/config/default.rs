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

//! `PartialHeraldConfig` builder using default values.

use herald_sdk::auth::{DEFAULT_ACCESS_TOKEN_DURATION, DEFAULT_ISSUER, DEFAULT_MASTER_PASSWORD};
use herald_sdk::push::DEFAULT_FCM_URL;

use crate::config::{
    error::HeraldConfigError, HeraldConfigSource, PartialHeraldConfig, PartialHeraldConfigBuilder,
};

const BIND: &str = "127.0.0.1:8080";
const DATABASE_URL: &str = "memory";
const PASSWORD_COST: &str = "high";

#[derive(Default)]
pub struct DefaultPartialHeraldConfigBuilder;

impl DefaultPartialHeraldConfigBuilder {
    pub fn new() -> Self {
        DefaultPartialHeraldConfigBuilder {}
    }
}

impl PartialHeraldConfigBuilder for DefaultPartialHeraldConfigBuilder {
    fn build(self) -> Result<PartialHeraldConfig, HeraldConfigError> {
        // token_secret and push_server_key have no default
        Ok(PartialHeraldConfig::new(HeraldConfigSource::Default)
            .with_bind(Some(String::from(BIND)))
            .with_database_url(Some(String::from(DATABASE_URL)))
            .with_master_password(Some(String::from(DEFAULT_MASTER_PASSWORD)))
            .with_token_issuer(Some(String::from(DEFAULT_ISSUER)))
            .with_token_duration(Some(DEFAULT_ACCESS_TOKEN_DURATION.as_secs()))
            .with_password_cost(Some(String::from(PASSWORD_COST)))
            .with_push_url(Some(String::from(DEFAULT_FCM_URL)))
            .with_verbosity(Some(log::Level::Info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    /// Verifies that a `PartialHeraldConfig` object is accurately constructed from default values.
    fn test_default_config() {
        let generated_default_config = DefaultPartialHeraldConfigBuilder::new()
            .build()
            .expect("Unable to build default config object");

        assert_eq!(generated_default_config.source(), HeraldConfigSource::Default);
        assert_eq!(generated_default_config.bind(), Some(String::from(BIND)));
        assert_eq!(
            generated_default_config.database_url(),
            Some(String::from("memory"))
        );
        assert_eq!(
            generated_default_config.master_password(),
            Some(String::from("Admin123!"))
        );
        assert_eq!(generated_default_config.token_duration(), Some(5400));
        assert_eq!(
            generated_default_config.push_url(),
            Some(String::from("https://fcm.googleapis.com/fcm/send"))
        );
        assert_eq!(generated_default_config.verbosity(), Some(log::Level::Info));
        assert_eq!(generated_default_config.token_secret(), None);
        assert_eq!(generated_default_config.push_server_key(), None);
    }
}
