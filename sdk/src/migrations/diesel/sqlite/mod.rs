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

use diesel::sqlite::SqliteConnection;

use crate::error::InternalError;

embed_migrations!("./src/migrations/diesel/sqlite/migrations");

/// Runs the embedded sqlite migrations against the given connection.
pub fn run_migrations(conn: &SqliteConnection) -> Result<(), InternalError> {
    embedded_migrations::run(conn).map_err(|err| {
        InternalError::from_source_with_prefix(
            Box::new(err),
            "Unable to run sqlite migrations".to_string(),
        )
    })?;

    info!("Successfully applied Herald migrations");

    Ok(())
}
