use std::borrow::Cow;

use thiserror::Error;

/// Error type returned by every [`DocumentStore`](crate::store::DocumentStore) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection or index being created is already there.
    #[error("{target} already exists")]
    AlreadyExists { target: String },

    /// A unique index rejected a document (or an index build hit duplicate values).
    #[error("duplicate key in {collection}: {message}")]
    DuplicateKey { collection: String, message: String },

    /// Any other driver failure (network, auth, conflicting index options, ...).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A seed row could not be turned into BSON.
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    /// Failure from a non-MongoDB [`DocumentStore`](crate::store::DocumentStore)
    /// implementation; `MongoStore` reports driver errors as [`StoreError::Mongo`].
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl StoreError {
    pub fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Invalid connection settings detected before touching the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("connection string must start with mongodb:// or mongodb+srv:// (got '{0}')")]
    InvalidUri(String),

    #[error("database name must not be empty")]
    EmptyDatabase,

    #[error("database name '{name}' contains invalid character '{character}'")]
    InvalidDatabaseName { name: String, character: char },
}
