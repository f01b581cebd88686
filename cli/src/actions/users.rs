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

use herald_sdk::users::User;

use super::{print_table, Format};
use crate::error::CliError;
use crate::http::HeraldClient;

pub fn do_list_users(client: &HeraldClient, format: Format) -> Result<(), CliError> {
    let users = client.list_users()?;
    display_users(&users, format);
    Ok(())
}

fn display_users(users: &[User], format: Format) {
    print_table(
        format,
        vec!["UID", "NAME", "EMAIL", "ADMIN", "DEVICE"],
        user_rows(users),
    );
}

fn user_rows(users: &[User]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|user| {
            vec![
                user.uid().to_string(),
                user.name().to_string(),
                user.email().to_string(),
                user.is_admin().to_string(),
                user.device_token().is_some().to_string(),
            ]
        })
        .collect()
}
