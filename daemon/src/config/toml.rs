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

//! `PartialHeraldConfig` builder using values from a TOML config file.

use std::fs;

use serde::Deserialize;

use crate::config::{
    error::HeraldConfigError, HeraldConfigSource, PartialHeraldConfig, PartialHeraldConfigBuilder,
};

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    bind: Option<String>,
    database_url: Option<String>,
    master_password: Option<String>,
    token_secret: Option<String>,
    token_issuer: Option<String>,
    token_duration: Option<u64>,
    password_cost: Option<String>,
    push_server_key: Option<String>,
    push_url: Option<String>,
}

pub struct TomlPartialHeraldConfigBuilder {
    source: HeraldConfigSource,
    config: TomlConfig,
}

impl TomlPartialHeraldConfigBuilder {
    /// Parses `toml`, which was read from `file`.
    pub fn new(toml: String, file: &str) -> Result<Self, HeraldConfigError> {
        let config = ::toml::from_str::<TomlConfig>(&toml).map_err(|err| {
            HeraldConfigError::ReadError {
                file: file.to_string(),
                err: Box::new(err),
            }
        })?;

        Ok(TomlPartialHeraldConfigBuilder {
            source: HeraldConfigSource::Toml {
                file: file.to_string(),
            },
            config,
        })
    }

    pub fn from_file(file: &str) -> Result<Self, HeraldConfigError> {
        let toml = fs::read_to_string(file).map_err(|err| HeraldConfigError::ReadError {
            file: file.to_string(),
            err: Box::new(err),
        })?;

        Self::new(toml, file)
    }
}

impl PartialHeraldConfigBuilder for TomlPartialHeraldConfigBuilder {
    fn build(self) -> Result<PartialHeraldConfig, HeraldConfigError> {
        let config = self.config;
        Ok(PartialHeraldConfig::new(self.source)
            .with_bind(config.bind)
            .with_database_url(config.database_url)
            .with_master_password(config.master_password)
            .with_token_secret(config.token_secret)
            .with_token_issuer(config.token_issuer)
            .with_token_duration(config.token_duration)
            .with_password_cost(config.password_cost)
            .with_push_server_key(config.push_server_key)
            .with_push_url(config.push_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    static TEST_TOML: &str = r#"
bind = "0.0.0.0:8443"
database_url = "sqlite:///var/lib/herald/herald.db"
token_secret = "from-file"
token_duration = 600
password_cost = "low"
"#;

    #[test]
    fn test_toml_build() {
        let generated_config = TomlPartialHeraldConfigBuilder::new(
            TEST_TOML.to_string(),
            "herald.toml",
        )
        .expect("Unable to parse toml")
        .build()
        .expect("Unable to build toml config");

        assert_eq!(
            generated_config.source(),
            HeraldConfigSource::Toml {
                file: "herald.toml".to_string()
            }
        );
        assert_eq!(generated_config.bind(), Some(String::from("0.0.0.0:8443")));
        assert_eq!(
            generated_config.database_url(),
            Some(String::from("sqlite:///var/lib/herald/herald.db"))
        );
        assert_eq!(generated_config.token_secret(), Some(String::from("from-file")));
        assert_eq!(generated_config.token_duration(), Some(600));
        assert_eq!(generated_config.password_cost(), Some(String::from("low")));
        assert_eq!(generated_config.push_url(), None);
        // verbosity only comes from the command line
        assert_eq!(generated_config.verbosity(), None);
    }

    #[test]
    fn test_toml_unknown_key() {
        let result = TomlPartialHeraldConfigBuilder::new(
            "bindd = \"0.0.0.0:8443\"".to_string(),
            "herald.toml",
        );

        assert!(matches!(result, Err(HeraldConfigError::ReadError { .. })));
    }

    #[test]
    fn test_toml_from_file() {
        let mut file = NamedTempFile::new().expect("Unable to create temp file");
        write!(file, "{}", TEST_TOML).expect("Unable to write temp file");
        let path = file.path().to_str().expect("Invalid temp path").to_string();

        let generated_config = TomlPartialHeraldConfigBuilder::from_file(&path)
            .expect("Unable to read toml file")
            .build()
            .expect("Unable to build toml config");

        assert_eq!(generated_config.source(), HeraldConfigSource::Toml { file: path });
        assert_eq!(generated_config.token_secret(), Some(String::from("from-file")));
    }

    #[test]
    fn test_toml_missing_file() {
        assert!(matches!(
            TomlPartialHeraldConfigBuilder::from_file("/nonexistent/herald.toml"),
            Err(HeraldConfigError::ReadError { .. })
        ));
    }
}
