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

use herald_sdk::auth::{LoginRequest, RegisterRequest, Session};
use herald_sdk::users::User;

use crate::error::CliError;
use crate::http::HeraldClient;
use crate::session::SessionFile;

pub fn do_register(
    client: &HeraldClient,
    session_file: &SessionFile,
    request: RegisterRequest,
) -> Result<(), CliError> {
    let session = client.register(&request)?;
    save_session(session_file, &session)?;

    info!(
        "Registered {}{}",
        describe_user(&session.user),
        if session.user.is_admin() {
            " as an administrator"
        } else {
            ""
        }
    );
    Ok(())
}

pub fn do_login(
    client: &HeraldClient,
    session_file: &SessionFile,
    request: LoginRequest,
) -> Result<(), CliError> {
    let session = client.login(&request)?;
    save_session(session_file, &session)?;

    info!("Logged in as {}", describe_user(&session.user));
    Ok(())
}

/// Signs out on the daemon and forgets the local session.
///
/// The local session is removed even if the daemon no longer accepts the token.
pub fn do_logout(client: &HeraldClient, session_file: &SessionFile) -> Result<(), CliError> {
    if session_file.load()?.is_none() {
        info!("Not logged in");
        return Ok(());
    }

    match client.logout() {
        Ok(message) => info!("{}", message),
        Err(CliError::SessionError(message)) => {
            warn!("Session was no longer valid: {}", message)
        }
        Err(err) => return Err(err),
    }

    session_file.remove()
}

/// Restores the stored session, saving the refreshed token, and shows who is signed in.
pub fn do_whoami(
    client: &HeraldClient,
    session_file: &SessionFile,
    push_token: Option<&str>,
) -> Result<(), CliError> {
    let session = client.restore_session(push_token)?;
    save_session(session_file, &session)?;

    display_user(&session.user);
    Ok(())
}

pub fn do_set_push_token(client: &HeraldClient, push_token: &str) -> Result<(), CliError> {
    let message = client.update_push_token(push_token)?;
    info!("{}", message);
    Ok(())
}

fn save_session(session_file: &SessionFile, session: &Session) -> Result<(), CliError> {
    session_file.save(&session.token)
}

fn describe_user(user: &User) -> String {
    format!("{} <{}>", user.name(), user.email())
}

fn display_user(user: &User) {
    println!(
        "{}",
        vec![
            ("UID", user.uid()),
            ("Name", user.name()),
            ("Email", user.email()),
            ("Administrator", if user.is_admin() { "yes" } else { "no" }),
            (
                "Push Token",
                if user.push_token().is_empty() {
                    "<none>"
                } else {
                    user.push_token()
                }
            ),
        ]
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<String>>()
        .join("\n")
    );
}
