use bson::{Document, doc};
use log::debug;
use mongodb::{
    Client, Database, IndexModel,
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
};

use crate::config::{APP_NAME, ConnectionSettings};
use crate::errors::StoreError;
use crate::schema::IndexSpec;

use super::DocumentStore;

const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;
const INDEX_ALREADY_EXISTS: i32 = 68;
const DUPLICATE_KEY: i32 = 11000;
const DUPLICATE_KEY_ON_UPDATE: i32 = 11001;

/// [`DocumentStore`] backed by a MongoDB database handle.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect and ping, so a wrong URI or unreachable server fails here.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(settings.uri.as_str()).await?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&settings.database);
        db.run_command(doc! { "ping": 1 }).await?;
        debug!("connected to {} ({})", settings.redacted_uri(), settings.database);

        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl DocumentStore for MongoStore {
    async fn list_collection_names(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.list_collection_names().await?)
    }

    async fn create_collection(&mut self, name: &str) -> Result<(), StoreError> {
        self.db
            .create_collection(name)
            .await
            .map_err(|err| classify_error(err, name))
    }

    async fn create_index(&mut self, spec: &IndexSpec) -> Result<(), StoreError> {
        let mut options = IndexOptions::default();
        if spec.unique {
            options.unique = Some(true);
        }
        options.expire_after = spec.expire_after_duration();

        let model = IndexModel::builder()
            .keys(spec.keys_document())
            .options(options)
            .build();

        self.db
            .collection::<Document>(spec.collection)
            .create_index(model)
            .await
            .map(|_| ())
            .map_err(|err| classify_error(err, spec.collection))
    }

    async fn insert_document(&mut self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.db
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map(|_| ())
            .map_err(|err| classify_error(err, collection))
    }

    async fn list_index_names(&mut self, collection: &str) -> Result<Vec<String>, StoreError> {
        match self.db.collection::<Document>(collection).list_index_names().await {
            Ok(names) => Ok(names),
            Err(err) if server_code(&err) == Some(NAMESPACE_NOT_FOUND) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn count_documents(&mut self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Ok(self
            .db
            .collection::<Document>(collection)
            .count_documents(filter)
            .await?)
    }
}

/// Map a driver error onto the store taxonomy.
///
/// Only the specific server codes for "exists" and "duplicate key" are
/// narrowed; anything else (network loss, auth, option conflicts) passes
/// through unchanged.
pub fn classify_error(err: mongodb::error::Error, target: &str) -> StoreError {
    match classify_code(server_code(&err)) {
        Some(Classified::AlreadyExists) => StoreError::AlreadyExists {
            target: target.to_string(),
        },
        Some(Classified::DuplicateKey) => StoreError::DuplicateKey {
            collection: target.to_string(),
            message: err.to_string(),
        },
        None => StoreError::Mongo(err),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Classified {
    AlreadyExists,
    DuplicateKey,
}

fn classify_code(code: Option<i32>) -> Option<Classified> {
    match code? {
        NAMESPACE_EXISTS | INDEX_ALREADY_EXISTS => Some(Classified::AlreadyExists),
        DUPLICATE_KEY | DUPLICATE_KEY_ON_UPDATE => Some(Classified::DuplicateKey),
        _ => None,
    }
}

fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}
