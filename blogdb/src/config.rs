//! Connection settings for the target database.
//!
//! There is no configuration file: the CLI fills these from `MONGODB_URI` and
//! `BLOGDB_DATABASE` (or the matching flags) and falls back to the defaults below.

use crate::errors::ConfigError;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "blog_platform";
pub const APP_NAME: &str = "blogdb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub uri: String,
    pub database: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl ConnectionSettings {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }

    /// Reject settings the driver would only fail on later, after a slow timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.uri.starts_with("mongodb://") || self.uri.starts_with("mongodb+srv://")) {
            return Err(ConfigError::InvalidUri(self.redacted_uri()));
        }

        if self.database.is_empty() {
            return Err(ConfigError::EmptyDatabase);
        }

        // MongoDB forbids these in database names.
        if let Some(character) = self
            .database
            .chars()
            .find(|c| matches!(c, '/' | '\\' | '.' | ' ' | '"' | '$' | '\0'))
        {
            return Err(ConfigError::InvalidDatabaseName {
                name: self.database.clone(),
                character,
            });
        }

        Ok(())
    }

    /// The connection string with any password replaced, safe to print.
    pub fn redacted_uri(&self) -> String {
        let Some(scheme_end) = self.uri.find("://") else {
            return self.uri.clone();
        };
        let rest_start = scheme_end + 3;
        let rest = &self.uri[rest_start..];
        let host_start = rest.find('/').unwrap_or(rest.len());
        let Some(at) = rest[..host_start].rfind('@') else {
            return self.uri.clone();
        };

        let credentials = &rest[..at];
        let user = credentials.split(':').next().unwrap_or_default();
        format!(
            "{}{user}:****{}",
            &self.uri[..rest_start],
            &rest[at..]
        )
    }
}
