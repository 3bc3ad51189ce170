//! Database seam used by the initializer.
//!
//! [`MongoStore`] is the production implementation; tests drive the
//! initializer through an in-memory store with the same semantics.

mod mongo;

use bson::Document;

use crate::errors::StoreError;
use crate::schema::IndexSpec;

pub use mongo::{MongoStore, classify_error};

/// Operations the bootstrap needs from a document database.
///
/// Implementations must report an existing collection or index as
/// [`StoreError::AlreadyExists`] and a unique-key rejection as
/// [`StoreError::DuplicateKey`]; every other failure is reported as-is.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn list_collection_names(&mut self) -> Result<Vec<String>, StoreError>;

    async fn create_collection(&mut self, name: &str) -> Result<(), StoreError>;

    /// Create the index. Re-creating an identical index succeeds without change.
    async fn create_index(&mut self, spec: &IndexSpec) -> Result<(), StoreError>;

    async fn insert_document(&mut self, collection: &str, document: Document) -> Result<(), StoreError>;

    async fn list_index_names(&mut self, collection: &str) -> Result<Vec<String>, StoreError>;

    async fn count_documents(&mut self, collection: &str, filter: Document) -> Result<u64, StoreError>;
}
