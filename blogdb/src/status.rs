//! Read-only inspection of how far a database matches the fixed tables.

use std::collections::HashSet;

use bson::doc;

use crate::errors::StoreError;
use crate::schema::{COLLECTIONS, indexes_for};
use crate::seeds::{DEFAULT_CATEGORIES, DEFAULT_TAGS, SeedRow};
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatus {
    pub name: &'static str,
    pub exists: bool,
    pub indexes_present: Vec<String>,
    pub indexes_missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedStatus {
    pub collection: &'static str,
    pub name: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaStatus {
    pub collections: Vec<CollectionStatus>,
    pub seeds: Vec<SeedStatus>,
}

impl SchemaStatus {
    /// True when every collection, index, and seed row is in place.
    pub fn is_complete(&self) -> bool {
        self.collections
            .iter()
            .all(|c| c.exists && c.indexes_missing.is_empty())
            && self.seeds.iter().all(|s| s.present)
    }

    pub fn missing_count(&self) -> usize {
        let collections = self.collections.iter().filter(|c| !c.exists).count();
        let indexes: usize = self.collections.iter().map(|c| c.indexes_missing.len()).sum();
        let seeds = self.seeds.iter().filter(|s| !s.present).count();
        collections + indexes + seeds
    }
}

pub async fn inspect<S: DocumentStore>(store: &mut S) -> Result<SchemaStatus, StoreError> {
    let existing: HashSet<String> = store.list_collection_names().await?.into_iter().collect();
    let mut status = SchemaStatus::default();

    for &name in COLLECTIONS {
        let exists = existing.contains(name);
        let listed: HashSet<String> = if exists {
            store.list_index_names(name).await?.into_iter().collect()
        } else {
            HashSet::new()
        };

        let (present, missing): (Vec<String>, Vec<String>) = indexes_for(name)
            .map(|spec| spec.default_name())
            .partition(|index| listed.contains(index));

        status.collections.push(CollectionStatus {
            name,
            exists,
            indexes_present: present,
            indexes_missing: missing,
        });
    }

    inspect_seeds(store, DEFAULT_CATEGORIES, &existing, &mut status).await?;
    inspect_seeds(store, DEFAULT_TAGS, &existing, &mut status).await?;

    Ok(status)
}

async fn inspect_seeds<S: DocumentStore, R: SeedRow>(
    store: &mut S,
    rows: &[R],
    existing: &HashSet<String>,
    status: &mut SchemaStatus,
) -> Result<(), StoreError> {
    for row in rows {
        let present = existing.contains(R::COLLECTION)
            && store
                .count_documents(R::COLLECTION, doc! { "name": row.name() })
                .await?
                > 0;
        status.seeds.push(SeedStatus {
            collection: R::COLLECTION,
            name: row.name(),
            present,
        });
    }
    Ok(())
}
