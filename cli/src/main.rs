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
extern crate clap;
#[macro_use]
extern crate log;

mod actions;
mod error;
mod http;
mod session;

use std::env;
use std::time::Duration;

use clap::ArgMatches;
use flexi_logger::{DeferredNow, LogSpecBuilder, Logger};
use herald_sdk::auth::{LoginRequest, RegisterRequest};
use herald_sdk::notifications::{NotificationType, SendNotificationRequest};
use log::Record;

use crate::actions::{auth, notifications, users, Format};
use crate::error::CliError;
use crate::http::HeraldClient;
use crate::session::SessionFile;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

const HERALD_URL: &str = "HERALD_URL";
const HERALD_PASSWORD: &str = "HERALD_PASSWORD";
const HERALD_MASTER_PASSWORD: &str = "HERALD_MASTER_PASSWORD";

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_WATCH_TIMEOUT: u64 = 30;

const AFTER_HELP: &str = r"ENV:
    HERALD_URL              Specifies a default value for --url
    HERALD_PASSWORD         Specifies a default value for --password
    HERALD_MASTER_PASSWORD  Specifies a default value for --master-password";

// log format for cli that will only show the log message
pub fn log_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(w, "{}", record.args(),)
}

fn build_app<'a, 'b>() -> clap::App<'a, 'b> {
    clap_app!(myapp =>
        (name: APP_NAME)
        (version: VERSION)
        (author: "Contributors to Herald")
        (about: "Command line for the Herald notification service")
        (after_help: AFTER_HELP)
        (@setting SubcommandRequiredElseHelp)
        (@arg verbose: -v +multiple +global "Log verbosely")
        (@arg quiet: -q --quiet +global conflicts_with[verbose] "Do not display output")
        (@arg url: --url +takes_value +global "URL of the Herald REST API")
        (@subcommand register =>
            (about: "Create an account and log in")
            (@arg name: --name +takes_value +required "Display name")
            (@arg email: --email +takes_value +required "Email address")
            (@arg password: --password +takes_value "Account password")
            (@arg admin: --admin "Register as an administrator")
            (@arg master_password: --("master-password") +takes_value
                "Master password required to register an administrator")
            (@arg push_token: --("push-token") +takes_value "Device token to push to")
        )
        (@subcommand login =>
            (about: "Log in to an existing account")
            (@arg email: --email +takes_value +required "Email address")
            (@arg password: --password +takes_value "Account password")
            (@arg push_token: --("push-token") +takes_value "Device token to push to")
        )
        (@subcommand logout =>
            (about: "Log out and forget the stored session")
        )
        (@subcommand whoami =>
            (about: "Restore the stored session and show the signed-in user")
            (@arg push_token: --("push-token") +takes_value "Device token to push to")
        )
        (@subcommand token =>
            (about: "Manage the device push token")
            (@setting SubcommandRequiredElseHelp)
            (@subcommand set =>
                (about: "Set the device token notifications are pushed to")
                (@arg push_token: +required "Device token")
            )
        )
        (@subcommand users =>
            (about: "Manage users")
            (@setting SubcommandRequiredElseHelp)
            (@subcommand list =>
                (about: "List all users; requires an administrator")
                (@arg format: -F --format +takes_value possible_value[human csv]
                    "Output format")
            )
        )
        (@subcommand notifications =>
            (about: "Read and send notifications")
            (@setting SubcommandRequiredElseHelp)
            (@subcommand list =>
                (about: "List your notifications, newest first")
                (@arg unread: --unread "Only show unread notifications")
                (@arg format: -F --format +takes_value possible_value[human csv]
                    "Output format")
            )
            (@subcommand read =>
                (about: "Mark a notification as read")
                (@arg id: +required "Notification ID")
            )
            (@subcommand read_all =>
                (name: "read-all")
                (about: "Mark every notification as read")
            )
            (@subcommand send =>
                (about: "Send a notification; requires an administrator")
                (@arg title: --title +takes_value +required "Notification title")
                (@arg message: --message +takes_value +required "Notification body")
                (@arg notification_type: --("type") +takes_value possible_value[regular alert info]
                    "Notification type")
                (@arg to: --to +takes_value
                    "UID of the recipient; sends to every user if omitted")
            )
            (@subcommand watch =>
                (about: "Print your notifications whenever they change")
                (@arg timeout: --timeout +takes_value
                    "Seconds each request waits for a change")
                (@arg once: --once "Exit after the first change")
                (@arg format: -F --format +takes_value possible_value[human csv]
                    "Output format")
            )
        )
    )
}

fn password_arg(matches: &ArgMatches, arg: &str, env_var: &str) -> Option<String> {
    matches
        .value_of(arg)
        .map(String::from)
        .or_else(|| env::var(env_var).ok())
}

fn required_password(matches: &ArgMatches) -> Result<String, CliError> {
    password_arg(matches, "password", HERALD_PASSWORD).ok_or_else(|| {
        CliError::UserError(format!(
            "A password is required; use --password or set {}",
            HERALD_PASSWORD
        ))
    })
}

fn authorized_client(url: &str, session_file: &SessionFile) -> Result<HeraldClient, CliError> {
    let token = session_file.require()?;
    Ok(HeraldClient::new(url).with_token(&token))
}

fn run() -> Result<(), CliError> {
    let matches = build_app().get_matches();

    let log_level = if matches.is_present("quiet") {
        log::LevelFilter::Error
    } else {
        match matches.occurrences_of("verbose") {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    let mut log_spec_builder = LogSpecBuilder::new();
    log_spec_builder
        .default(log_level)
        .module("reqwest", log::LevelFilter::Warn)
        .module("hyper", log::LevelFilter::Warn);

    Logger::with(log_spec_builder.build())
        .format(log_format)
        .start()?;

    let url = matches
        .value_of("url")
        .map(String::from)
        .or_else(|| env::var(HERALD_URL).ok())
        .unwrap_or_else(|| String::from(DEFAULT_URL));
    let session_file = SessionFile::in_home_dir()?;

    match matches.subcommand() {
        ("register", Some(m)) => {
            let request = RegisterRequest {
                name: m.value_of("name").unwrap_or_default().to_string(),
                email: m.value_of("email").unwrap_or_default().to_string(),
                password: required_password(m)?,
                is_admin: m.is_present("admin"),
                master_password: password_arg(m, "master_password", HERALD_MASTER_PASSWORD),
                push_token: m.value_of("push_token").map(String::from),
            };
            auth::do_register(&HeraldClient::new(&url), &session_file, request)?;
        }
        ("login", Some(m)) => {
            let request = LoginRequest {
                email: m.value_of("email").unwrap_or_default().to_string(),
                password: required_password(m)?,
                push_token: m.value_of("push_token").map(String::from),
            };
            auth::do_login(&HeraldClient::new(&url), &session_file, request)?;
        }
        ("logout", Some(_)) => {
            let mut client = HeraldClient::new(&url);
            if let Some(token) = session_file.load()? {
                client = client.with_token(&token);
            }
            auth::do_logout(&client, &session_file)?;
        }
        ("whoami", Some(m)) => {
            let client = authorized_client(&url, &session_file)?;
            auth::do_whoami(&client, &session_file, m.value_of("push_token"))?;
        }
        ("token", Some(m)) => match m.subcommand() {
            ("set", Some(m)) => {
                let client = authorized_client(&url, &session_file)?;
                auth::do_set_push_token(&client, m.value_of("push_token").unwrap_or_default())?;
            }
            _ => unreachable!(),
        },
        ("users", Some(m)) => match m.subcommand() {
            ("list", Some(m)) => {
                let client = authorized_client(&url, &session_file)?;
                users::do_list_users(&client, Format::from_arg(m.value_of("format")))?;
            }
            _ => unreachable!(),
        },
        ("notifications", Some(m)) => {
            let client = authorized_client(&url, &session_file)?;
            match m.subcommand() {
                ("list", Some(m)) => notifications::do_list_notifications(
                    &client,
                    Format::from_arg(m.value_of("format")),
                    m.is_present("unread"),
                )?,
                ("read", Some(m)) => {
                    notifications::do_mark_as_read(&client, m.value_of("id").unwrap_or_default())?
                }
                ("read-all", Some(_)) => notifications::do_mark_all_as_read(&client)?,
                ("send", Some(m)) => {
                    let request = SendNotificationRequest {
                        title: m.value_of("title").unwrap_or_default().to_string(),
                        message: m.value_of("message").unwrap_or_default().to_string(),
                        notification_type: m
                            .value_of("notification_type")
                            .map(|value| value.parse().unwrap_or(NotificationType::Regular)),
                        recipient_uid: m.value_of("to").map(String::from),
                    };
                    notifications::do_send_notification(&client, request)?;
                }
                ("watch", Some(m)) => {
                    let timeout = m
                        .value_of("timeout")
                        .map(|value| {
                            value.parse::<u64>().map_err(|_| {
                                CliError::UserError(format!(
                                    "--timeout must be a number of seconds, found {}",
                                    value
                                ))
                            })
                        })
                        .transpose()?
                        .unwrap_or(DEFAULT_WATCH_TIMEOUT);
                    notifications::do_watch_notifications(
                        &client,
                        Format::from_arg(m.value_of("format")),
                        Duration::from_secs(timeout),
                        m.is_present("once"),
                    )?;
                }
                _ => unreachable!(),
            }
        }
        _ => unreachable!(),
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
