//! Bootstrap for the blog platform's MongoDB database.
//!
//! Makes the fixed collections and indexes exist and inserts the default
//! categories and tags. Every step is idempotent, so the pass can be re-run
//! (or run twice at once) without changing an already prepared database.

pub mod config;
pub mod errors;
pub mod initializer;
pub mod schema;
pub mod seeds;
pub mod status;
pub mod store;

pub use config::ConnectionSettings;
pub use errors::*;
pub use initializer::{Action, InitReport, Initializer, Outcome, Phase, Progress};
pub use schema::{COLLECTIONS, INDEXES, IndexKey, IndexKind, IndexSpec};
pub use seeds::{CategorySeed, DEFAULT_CATEGORIES, DEFAULT_TAGS, SeedRow, TagSeed};
pub use status::{SchemaStatus, inspect};
pub use store::{DocumentStore, MongoStore};

// Re-export driver types so callers don't need to pin their own versions
pub use bson;
pub use mongodb;
