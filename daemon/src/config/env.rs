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

//! `PartialHeraldConfig` builder using values from the environment.

use std::env;

use crate::config::{
    error::HeraldConfigError, HeraldConfigSource, PartialHeraldConfig, PartialHeraldConfigBuilder,
};

const BIND_ENV: &str = "HERALD_BIND";
const DATABASE_URL_ENV: &str = "HERALD_DATABASE_URL";
const MASTER_PASSWORD_ENV: &str = "HERALD_MASTER_PASSWORD";
const TOKEN_SECRET_ENV: &str = "HERALD_TOKEN_SECRET";
const TOKEN_ISSUER_ENV: &str = "HERALD_TOKEN_ISSUER";
const TOKEN_DURATION_ENV: &str = "HERALD_TOKEN_DURATION";
const PASSWORD_COST_ENV: &str = "HERALD_PASSWORD_COST";
const PUSH_SERVER_KEY_ENV: &str = "HERALD_PUSH_SERVER_KEY";
const PUSH_URL_ENV: &str = "HERALD_PUSH_URL";

/// Trait to outline a basic read-only environment variable store
pub trait EnvStore {
    /// Returns an environment variable for a given key
    ///
    /// # Arguments
    ///
    /// * `key` - A string slice of the name of the environment variable
    fn get(&self, key: &str) -> Option<String>;
}

/// Implementation of `EnvStore` for OS environment variables
pub struct OsEnvStore;

impl EnvStore for OsEnvStore {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

pub struct EnvPartialHeraldConfigBuilder<S: EnvStore> {
    store: S,
}

/// Implementation of the `PartialHeraldConfigBuilder` trait to create a `PartialHeraldConfig`
/// from environment variables.
impl EnvPartialHeraldConfigBuilder<OsEnvStore> {
    pub fn new() -> Self {
        EnvPartialHeraldConfigBuilder {
            store: OsEnvStore {},
        }
    }
}

impl<S: EnvStore> EnvPartialHeraldConfigBuilder<S> {
    /// Returns an `EnvPartialHeraldConfigBuilder` that will fetch data from the given store.
    #[cfg(test)]
    pub fn from_store(store: S) -> Self {
        EnvPartialHeraldConfigBuilder { store }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|value| !value.is_empty())
    }
}

impl<S: EnvStore> PartialHeraldConfigBuilder for EnvPartialHeraldConfigBuilder<S> {
    fn build(self) -> Result<PartialHeraldConfig, HeraldConfigError> {
        let token_duration = self
            .get(TOKEN_DURATION_ENV)
            .map(|value| {
                value.parse::<u64>().map_err(|_| {
                    HeraldConfigError::InvalidArgument(format!(
                        "{} must be a number of seconds, found {}",
                        TOKEN_DURATION_ENV, value
                    ))
                })
            })
            .transpose()?;

        Ok(PartialHeraldConfig::new(HeraldConfigSource::Environment)
            .with_bind(self.get(BIND_ENV))
            .with_database_url(self.get(DATABASE_URL_ENV))
            .with_master_password(self.get(MASTER_PASSWORD_ENV))
            .with_token_secret(self.get(TOKEN_SECRET_ENV))
            .with_token_issuer(self.get(TOKEN_ISSUER_ENV))
            .with_token_duration(token_duration)
            .with_password_cost(self.get(PASSWORD_COST_ENV))
            .with_push_server_key(self.get(PUSH_SERVER_KEY_ENV))
            .with_push_url(self.get(PUSH_URL_ENV)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    /// Implementation of `EnvStore` that supports arbitrary hashmaps
    pub(crate) struct HashmapEnvStore {
        internal: HashMap<String, String>,
    }

    impl HashmapEnvStore {
        pub fn new(internal: HashMap<String, String>) -> HashmapEnvStore {
            HashmapEnvStore { internal }
        }
    }

    impl EnvStore for HashmapEnvStore {
        fn get(&self, key: &str) -> Option<String> {
            self.internal.get(key).map(ToOwned::to_owned)
        }
    }

    fn store(vars: &[(&str, &str)]) -> HashmapEnvStore {
        HashmapEnvStore::new(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    /// Verifies that unset environment variables result in a `PartialHeraldConfig` with unset
    /// values.
    fn test_empty_env_config() {
        let empty_generated_config = EnvPartialHeraldConfigBuilder::from_store(store(&[]))
            .build()
            .expect("Unable to build `EnvPartialHeraldConfigBuilder`");

        assert_eq!(
            empty_generated_config.source(),
            HeraldConfigSource::Environment
        );
        assert_eq!(empty_generated_config.bind(), None);
        assert_eq!(empty_generated_config.token_secret(), None);
        assert_eq!(empty_generated_config.token_duration(), None);
        assert_eq!(empty_generated_config.verbosity(), None);
    }

    #[test]
    fn test_setup_env_config() {
        let generated_config = EnvPartialHeraldConfigBuilder::from_store(store(&[
            (BIND_ENV, "0.0.0.0:9000"),
            (DATABASE_URL_ENV, "sqlite://herald.db"),
            (TOKEN_SECRET_ENV, "secret"),
            (TOKEN_DURATION_ENV, "60"),
            (PUSH_SERVER_KEY_ENV, "server-key"),
        ]))
        .build()
        .expect("Unable to build `EnvPartialHeraldConfigBuilder`");

        assert_eq!(generated_config.bind(), Some(String::from("0.0.0.0:9000")));
        assert_eq!(
            generated_config.database_url(),
            Some(String::from("sqlite://herald.db"))
        );
        assert_eq!(generated_config.token_secret(), Some(String::from("secret")));
        assert_eq!(generated_config.token_duration(), Some(60));
        assert_eq!(
            generated_config.push_server_key(),
            Some(String::from("server-key"))
        );
        assert_eq!(generated_config.master_password(), None);
    }

    /// A variable set to the empty string counts as unset.
    #[test]
    fn test_empty_value_is_unset() {
        let generated_config =
            EnvPartialHeraldConfigBuilder::from_store(store(&[(PUSH_SERVER_KEY_ENV, "")]))
                .build()
                .expect("Unable to build `EnvPartialHeraldConfigBuilder`");

        assert_eq!(generated_config.push_server_key(), None);
    }

    #[test]
    fn test_invalid_token_duration() {
        let result =
            EnvPartialHeraldConfigBuilder::from_store(store(&[(TOKEN_DURATION_ENV, "soon")]))
                .build();

        assert!(matches!(result, Err(HeraldConfigError::InvalidArgument(_))));
    }
}
