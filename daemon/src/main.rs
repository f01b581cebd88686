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

#[macro_use]
extern crate log;

mod config;
mod error;

use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use flexi_logger::{DeferredNow, LogSpecBuilder, Logger};
use herald_sdk::auth::{AuthConfigBuilder, AuthService};
use herald_sdk::error::InternalError;
use herald_sdk::notifications::NotificationService;
use herald_sdk::push::{FcmPushClient, LogPushDispatcher, PushDispatcher, PushWorker};
use herald_sdk::rest_api::{self, AppState};
use herald_sdk::store::{create_store_factory, ConnectionUri};
use herald_sdk::threading::lifecycle::ShutdownHandle;
use log::Record;

use crate::config::{
    ClapPartialHeraldConfigBuilder, DefaultPartialHeraldConfigBuilder,
    EnvPartialHeraldConfigBuilder, HeraldConfig, HeraldConfigBuilder, PartialHeraldConfigBuilder,
    TomlPartialHeraldConfigBuilder,
};
use crate::error::DaemonError;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn log_format(
    w: &mut dyn std::io::Write,
    _: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(w, "[{}] {}", record.level(), record.args())
}

fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new(APP_NAME)
        .version(VERSION)
        .author("Contributors to Herald")
        .about("Herald notification service daemon")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Log verbosely"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .global(true)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::with_name("bind")
                .short("b")
                .long("bind")
                .takes_value(true)
                .help("Connection endpoint for REST API"),
        )
        .arg(
            Arg::with_name("database_url")
                .long("database-url")
                .takes_value(true)
                .help("Storage to use: memory, sqlite://<path> or a path to a .db file"),
        )
        .arg(
            Arg::with_name("master_password")
                .long("master-password")
                .takes_value(true)
                .help("Password required to register an administrator"),
        )
        .arg(
            Arg::with_name("token_secret")
                .long("token-secret")
                .takes_value(true)
                .help("Secret used to sign session tokens"),
        )
        .arg(
            Arg::with_name("token_issuer")
                .long("token-issuer")
                .takes_value(true)
                .help("Issuer recorded in session tokens"),
        )
        .arg(
            Arg::with_name("token_duration")
                .long("token-duration")
                .takes_value(true)
                .help("Lifetime of a session token, in seconds"),
        )
        .arg(
            Arg::with_name("password_cost")
                .long("password-cost")
                .takes_value(true)
                .possible_values(&["high", "medium", "low"])
                .help("Cost of password hashing"),
        )
        .arg(
            Arg::with_name("push_server_key")
                .long("push-server-key")
                .takes_value(true)
                .help("Push provider server key; push delivery is disabled without one"),
        )
        .arg(
            Arg::with_name("push_url")
                .long("push-url")
                .takes_value(true)
                .help("Push provider endpoint"),
        )
}

fn start_logger(level: log::Level) -> Result<(), DaemonError> {
    let mut log_spec_builder = LogSpecBuilder::new();
    log_spec_builder
        .default(level.to_level_filter())
        .module("actix_server", log::LevelFilter::Warn)
        .module("hyper", log::LevelFilter::Warn)
        .module("mio", log::LevelFilter::Warn)
        .module("reqwest", log::LevelFilter::Warn);

    Logger::with(log_spec_builder.build())
        .format(log_format)
        .start()?;

    Ok(())
}

fn load_config(matches: ArgMatches<'static>) -> Result<HeraldConfig, DaemonError> {
    let config_file = matches.value_of("config").map(String::from);

    let clap_config = ClapPartialHeraldConfigBuilder::new(matches).build()?;
    start_logger(clap_config.verbosity().unwrap_or(log::Level::Info))?;

    let mut builder = HeraldConfigBuilder::new()
        .with_partial_config(clap_config)
        .with_partial_config(EnvPartialHeraldConfigBuilder::new().build()?);
    if let Some(file) = config_file {
        builder = builder
            .with_partial_config(TomlPartialHeraldConfigBuilder::from_file(&file)?.build()?);
    }

    let config = builder
        .with_partial_config(DefaultPartialHeraldConfigBuilder::new().build()?)
        .build()?;
    config.log_as_debug();

    Ok(config)
}

fn push_dispatcher(
    push_url: &str,
    server_key: Option<&str>,
) -> Result<Box<dyn PushDispatcher>, InternalError> {
    match server_key {
        Some(server_key) => {
            info!("Push delivery enabled through {}", push_url);
            Ok(Box::new(FcmPushClient::new(push_url, server_key)?))
        }
        None => {
            warn!("No push server key configured; notifications will not be pushed");
            Ok(Box::new(LogPushDispatcher))
        }
    }
}

/// Starts the push worker. The dispatcher is built on the worker thread, away from the actix
/// runtime.
fn start_push_worker(config: &HeraldConfig) -> Result<PushWorker, DaemonError> {
    let push_url = config.push_url().to_string();
    let server_key = config.push_server_key().map(String::from);

    PushWorker::start_with(move || push_dispatcher(&push_url, server_key.as_deref()))
        .map_err(|err| DaemonError::StartUpError(Box::new(err)))
}

async fn run() -> Result<(), DaemonError> {
    let config = load_config(build_app().get_matches())?;

    let connection_uri = ConnectionUri::from_str(config.database_url())?;
    let store_factory = create_store_factory(&connection_uri)
        .map_err(|err| DaemonError::StartUpError(Box::new(err)))?;
    info!("Using {} storage", connection_uri);

    let auth_config = AuthConfigBuilder::new()
        .with_master_password(config.master_password())
        .with_token_secret(config.token_secret())
        .with_issuer(config.token_issuer())
        .with_access_token_duration(config.token_duration())
        .with_password_encryption_cost(config.password_cost())
        .build()?;

    let mut push_worker = start_push_worker(&config)?;

    let auth_service = AuthService::new(
        store_factory.get_user_store(),
        store_factory.get_credentials_store(),
        auth_config,
    );
    let notification_service = NotificationService::new(
        store_factory.get_user_store(),
        store_factory.get_notification_store(),
    )
    .with_push_sender(push_worker.sender());

    info!("Starting REST API on {}", config.bind());
    let result = rest_api::run(
        config.bind(),
        AppState::new(auth_service, notification_service),
    )
    .await
    .map_err(DaemonError::RestApiError);

    // the server has stopped; let the worker drain queued pushes
    push_worker.signal_shutdown();
    push_worker
        .wait_for_shutdown()
        .map_err(|err| DaemonError::ShutdownError(err.to_string()))?;

    result
}

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
