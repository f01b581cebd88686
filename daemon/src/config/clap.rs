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

//! `PartialHeraldConfig` builder using values from heraldd command line arguments.

use clap::ArgMatches;

use crate::config::{
    error::HeraldConfigError, HeraldConfigSource, PartialHeraldConfig, PartialHeraldConfigBuilder,
};

/// `PartialHeraldConfig` builder using command line arguments, represented as clap `ArgMatches`.
pub struct ClapPartialHeraldConfigBuilder<'a> {
    matches: ArgMatches<'a>,
}

impl<'a> ClapPartialHeraldConfigBuilder<'a> {
    pub fn new(matches: ArgMatches<'a>) -> Self {
        ClapPartialHeraldConfigBuilder { matches }
    }
}

impl PartialHeraldConfigBuilder for ClapPartialHeraldConfigBuilder<'_> {
    fn build(self) -> Result<PartialHeraldConfig, HeraldConfigError> {
        let token_duration = self
            .matches
            .value_of("token_duration")
            .map(|value| {
                value.parse::<u64>().map_err(|_| {
                    HeraldConfigError::InvalidArgument(format!(
                        "token-duration must be a number of seconds, found {}",
                        value
                    ))
                })
            })
            .transpose()?;

        let verbosity = if self.matches.is_present("quiet") {
            Some(log::Level::Error)
        } else {
            match self.matches.occurrences_of("verbose") {
                0 => None,
                1 => Some(log::Level::Debug),
                _ => Some(log::Level::Trace),
            }
        };

        Ok(PartialHeraldConfig::new(HeraldConfigSource::CommandLine)
            .with_bind(self.matches.value_of("bind").map(String::from))
            .with_database_url(self.matches.value_of("database_url").map(String::from))
            .with_master_password(self.matches.value_of("master_password").map(String::from))
            .with_token_secret(self.matches.value_of("token_secret").map(String::from))
            .with_token_issuer(self.matches.value_of("token_issuer").map(String::from))
            .with_token_duration(token_duration)
            .with_password_cost(self.matches.value_of("password_cost").map(String::from))
            .with_push_server_key(self.matches.value_of("push_server_key").map(String::from))
            .with_push_url(self.matches.value_of("push_url").map(String::from))
            .with_verbosity(verbosity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::{clap_app, crate_version};
    use pretty_assertions::assert_eq;

    /// Example configuration values
    static EXAMPLE_BIND: &str = "127.0.0.1:9090";
    static EXAMPLE_DATABASE_URL: &str = "sqlite://herald.db";
    static EXAMPLE_TOKEN_SECRET: &str = "cli-secret";

    // Create an `ArgMatches` object to construct a `ClapPartialHeraldConfigBuilder`
    fn create_arg_matches(args: Vec<&str>) -> ArgMatches<'static> {
        clap_app!(heraldconfigtest =>
            (version: crate_version!())
            (about: "Herald-Config-Test")
            (@arg verbose: -v +multiple)
            (@arg quiet: -q --quiet)
            (@arg bind: -b --bind +takes_value)
            (@arg database_url: --("database-url") +takes_value)
            (@arg token_secret: --("token-secret") +takes_value)
            (@arg token_duration: --("token-duration") +takes_value))
        .get_matches_from(args)
    }

    #[test]
    /// Validate a `PartialHeraldConfig` object can be constructed using command line arguments.
    fn test_setup_command_line_config() {
        let matches = create_arg_matches(vec![
            "Herald-Config-Test",
            "-b",
            EXAMPLE_BIND,
            "--database-url",
            EXAMPLE_DATABASE_URL,
            "--token-secret",
            EXAMPLE_TOKEN_SECRET,
            "--token-duration",
            "120",
            "-vv",
        ]);
        let generated_clap_config = ClapPartialHeraldConfigBuilder::new(matches)
            .build()
            .expect("Unable to build command line config");

        assert_eq!(
            generated_clap_config.source(),
            HeraldConfigSource::CommandLine
        );
        assert_eq!(generated_clap_config.bind(), Some(EXAMPLE_BIND.to_string()));
        assert_eq!(
            generated_clap_config.database_url(),
            Some(EXAMPLE_DATABASE_URL.to_string())
        );
        assert_eq!(
            generated_clap_config.token_secret(),
            Some(EXAMPLE_TOKEN_SECRET.to_string())
        );
        assert_eq!(generated_clap_config.token_duration(), Some(120));
        assert_eq!(generated_clap_config.verbosity(), Some(log::Level::Trace));
        assert_eq!(generated_clap_config.push_server_key(), None);
    }

    #[test]
    fn test_verbosity_flags() {
        let quiet = ClapPartialHeraldConfigBuilder::new(create_arg_matches(vec!["test", "-q"]))
            .build()
            .expect("Unable to build command line config");
        let none = ClapPartialHeraldConfigBuilder::new(create_arg_matches(vec!["test"]))
            .build()
            .expect("Unable to build command line config");

        assert_eq!(quiet.verbosity(), Some(log::Level::Error));
        assert_eq!(none.verbosity(), None);
    }

    #[test]
    fn test_invalid_token_duration() {
        let matches = create_arg_matches(vec!["test", "--token-duration", "soon"]);

        assert!(matches!(
            ClapPartialHeraldConfigBuilder::new(matches).build(),
            Err(HeraldConfigError::InvalidArgument(_))
        ));
    }
}
