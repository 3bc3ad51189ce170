//! Default reference rows for the `categories` and `tags` collections.

use bson::Document;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::StoreError;

/// A default row that is inserted once and never touched again by this tool.
pub trait SeedRow {
    /// Target collection.
    const COLLECTION: &'static str;

    /// Value of the uniquely indexed `name` field.
    fn name(&self) -> &'static str;

    /// Build the document to insert, stamped with `created_at`.
    fn to_document(&self, created_at: DateTime<Utc>) -> Result<Document, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySeed {
    pub name: &'static str,
    pub description: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSeed {
    pub name: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Technology",
        description: "Technology related articles",
        slug: "technology",
    },
    CategorySeed {
        name: "Lifestyle",
        description: "Lifestyle and personal development",
        slug: "lifestyle",
    },
    CategorySeed {
        name: "Business",
        description: "Business and entrepreneurship",
        slug: "business",
    },
];

pub const DEFAULT_TAGS: &[TagSeed] = &[
    TagSeed {
        name: "golang",
        description: "Go programming language",
    },
    TagSeed {
        name: "mongodb",
        description: "MongoDB database",
    },
    TagSeed {
        name: "api",
        description: "Application Programming Interface",
    },
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDocument<'a> {
    name: &'a str,
    description: &'a str,
    slug: &'a str,
    post_count: i32,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TagDocument<'a> {
    name: &'a str,
    description: &'a str,
    post_count: i32,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl SeedRow for CategorySeed {
    const COLLECTION: &'static str = "categories";

    fn name(&self) -> &'static str {
        self.name
    }

    fn to_document(&self, created_at: DateTime<Utc>) -> Result<Document, StoreError> {
        let document = CategoryDocument {
            name: self.name,
            description: self.description,
            slug: self.slug,
            post_count: 0,
            created_at,
        };
        Ok(bson::to_document(&document)?)
    }
}

impl SeedRow for TagSeed {
    const COLLECTION: &'static str = "tags";

    fn name(&self) -> &'static str {
        self.name
    }

    fn to_document(&self, created_at: DateTime<Utc>) -> Result<Document, StoreError> {
        let document = TagDocument {
            name: self.name,
            description: self.description,
            post_count: 0,
            created_at,
        };
        Ok(bson::to_document(&document)?)
    }
}
