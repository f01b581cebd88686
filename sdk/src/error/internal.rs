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

use std::error;
use std::fmt;

struct Source {
    prefix: Option<String>,
    source: Box<dyn error::Error>,
}

/// An error which is returned when an unexpected failure occurs inside a store or service.
///
/// Callers are not expected to be able to recover from an `InternalError`; it is reported to the
/// user as a generic failure and the details are logged.
pub struct InternalError {
    message: Option<String>,
    source: Option<Source>,
}

impl InternalError {
    /// Wraps a source error. Display passes the source's message through unmodified.
    ///
    /// ```
    /// use herald_sdk::error::InternalError;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    /// let err = InternalError::from_source(Box::new(io_err));
    /// assert_eq!(format!("{}", err), "disk full");
    /// ```
    pub fn from_source(source: Box<dyn error::Error>) -> Self {
        Self {
            message: None,
            source: Some(Source {
                prefix: None,
                source,
            }),
        }
    }

    /// Wraps a source error, replacing its message with the one given.
    pub fn from_source_with_message(source: Box<dyn error::Error>, message: String) -> Self {
        Self {
            message: Some(message),
            source: Some(Source {
                prefix: None,
                source,
            }),
        }
    }

    /// Wraps a source error. Display is `"{prefix}: {source}"`.
    ///
    /// ```
    /// use herald_sdk::error::InternalError;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    /// let err = InternalError::from_source_with_prefix(
    ///     Box::new(io_err),
    ///     "Unable to store notification".to_string(),
    /// );
    /// assert_eq!(format!("{}", err), "Unable to store notification: disk full");
    /// ```
    pub fn from_source_with_prefix(source: Box<dyn error::Error>, prefix: String) -> Self {
        Self {
            message: None,
            source: Some(Source {
                prefix: Some(prefix),
                source,
            }),
        }
    }

    /// Creates an error from a message alone.
    pub fn with_message(message: String) -> Self {
        Self {
            message: Some(message),
            source: None,
        }
    }
}

impl error::Error for InternalError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_ref().map(|s| s.source.as_ref())
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.message, &self.source) {
            (Some(m), _) => write!(f, "{}", m),
            (None, Some(Source { prefix: Some(p), source })) => write!(f, "{}: {}", p, source),
            (None, Some(Source { prefix: None, source })) => write!(f, "{}", source),
            (None, None) => f.write_str("InternalError"),
        }
    }
}

impl fmt::Debug for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_struct("InternalError");
        if let Some(message) = &self.message {
            debug.field("message", message);
        }
        if let Some(source) = &self.source {
            if let Some(prefix) = &source.prefix {
                debug.field("prefix", prefix);
            }
            debug.field("source", &source.source);
        }
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_source_with_message() {
        let err = InternalError::from_source_with_message(
            Box::new(InternalError::with_message("lost".to_string())),
            "Unable to load feed".to_string(),
        );
        assert_eq!(format!("{}", err), "Unable to load feed");
    }

    #[test]
    fn test_display_without_message_or_source() {
        let err = InternalError {
            message: None,
            source: None,
        };
        assert_eq!(format!("{}", err), "InternalError");
    }

    /// Debug output names every populated field, including the nested source.
    #[test]
    fn test_debug_from_source_with_prefix() {
        let err = InternalError::from_source_with_prefix(
            Box::new(InternalError::with_message("lost".to_string())),
            "prefix".to_string(),
        );
        assert_eq!(
            format!("{:?}", err),
            "InternalError { prefix: \"prefix\", source: InternalError { message: \"lost\" } }"
        );
    }
}
