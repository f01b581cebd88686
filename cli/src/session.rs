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

//! The session token kept between invocations.

use std::fs::{self, create_dir_all, OpenOptions};
use std::io::{self, prelude::*};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::CliError;

const HERALD_DIR: &str = ".herald";
const SESSION_FILE: &str = "session";

/// A file holding the bearer token of the signed-in user.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: PathBuf) -> Self {
        SessionFile { path }
    }

    /// The session file in the current user's home directory, `~/.herald/session`.
    pub fn in_home_dir() -> Result<Self, CliError> {
        let mut path = dirs::home_dir().ok_or_else(|| {
            CliError::UserError("Unable to determine the home directory".to_string())
        })?;
        path.push(HERALD_DIR);
        path.push(SESSION_FILE);
        Ok(SessionFile::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored token, or `None` if no one is signed in.
    pub fn load(&self) -> Result<Option<String>, CliError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CliError::UserError(format!(
                "Failed to read session file '{}': {}",
                self.path.display(),
                err
            ))),
        }
    }

    /// Like `load`, but a missing session is an error.
    pub fn require(&self) -> Result<String, CliError> {
        self.load()?.ok_or_else(|| {
            CliError::SessionError("Not logged in; run `herald login` first".to_string())
        })
    }

    pub fn save(&self, token: &str) -> Result<(), CliError> {
        if let Some(dir) = self.path.parent() {
            create_dir_all(dir)?;
        }

        // only the owner may read the token
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)
            .map_err(|err| {
                CliError::UserError(format!(
                    "Failed to open session file '{}': {}",
                    self.path.display(),
                    err
                ))
            })?;
        writeln!(file, "{}", token)?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Deletes the session file. Removing a session that does not exist is not an error.
    pub fn remove(&self) -> Result<(), CliError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CliError::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;

    use pretty_assertions::assert_eq;
    use tempdir::TempDir;

    fn session_file(dir: &TempDir) -> SessionFile {
        SessionFile::new(dir.path().join(HERALD_DIR).join(SESSION_FILE))
    }

    #[test]
    fn test_save_load_remove() {
        let dir = TempDir::new("herald-session").expect("Unable to create temp dir");
        let session = session_file(&dir);

        assert_eq!(session.load().expect("Unable to load"), None);

        session.save("token-1").expect("Unable to save");
        assert_eq!(
            session.load().expect("Unable to load"),
            Some("token-1".to_string())
        );

        // a shorter token replaces the old one completely
        session.save("t2").expect("Unable to save");
        assert_eq!(session.require().expect("Unable to load"), "t2");

        session.remove().expect("Unable to remove");
        assert_eq!(session.load().expect("Unable to load"), None);
        session.remove().expect("Removing twice should succeed");
    }

    #[test]
    fn test_session_file_is_private() {
        let dir = TempDir::new("herald-session").expect("Unable to create temp dir");
        let session = session_file(&dir);
        session.save("token").expect("Unable to save");

        let mode = fs::metadata(session.path())
            .expect("Unable to stat session file")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_require_without_session() {
        let dir = TempDir::new("herald-session").expect("Unable to create temp dir");

        assert!(matches!(
            session_file(&dir).require(),
            Err(CliError::SessionError(_))
        ));
    }
}
