//! Fixed collection and index tables for the blog platform database.
//!
//! Everything here is static: the initializer walks these tables in order and
//! asks the store to make each entry exist.

use std::fmt;
use std::time::Duration;

use bson::{Bson, Document};

/// Collections the platform expects, in creation order.
pub const COLLECTIONS: &[&str] = &[
    "users",
    "blog_posts",
    "comments",
    "user_interactions",
    "auth_tokens",
    "tags",
    "categories",
    "ai_suggestions",
    "user_sessions",
];

/// One keyed field of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey {
    Ascending(&'static str),
    Descending(&'static str),
    Text(&'static str),
}

impl IndexKey {
    pub fn field(&self) -> &'static str {
        match self {
            IndexKey::Ascending(field) | IndexKey::Descending(field) | IndexKey::Text(field) => field,
        }
    }

    fn value(&self) -> Bson {
        match self {
            IndexKey::Ascending(_) => Bson::Int32(1),
            IndexKey::Descending(_) => Bson::Int32(-1),
            IndexKey::Text(_) => Bson::String("text".to_string()),
        }
    }

    fn name_suffix(&self) -> &'static str {
        match self {
            IndexKey::Ascending(_) => "1",
            IndexKey::Descending(_) => "-1",
            IndexKey::Text(_) => "text",
        }
    }
}

/// Broad category of an index, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Single,
    Compound,
    Unique,
    CompoundUnique,
    Text,
    Ttl,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndexKind::Single => "single",
            IndexKind::Compound => "compound",
            IndexKind::Unique => "unique",
            IndexKind::CompoundUnique => "compound unique",
            IndexKind::Text => "text",
            IndexKind::Ttl => "ttl",
        };
        f.write_str(label)
    }
}

/// A secondary index that must exist on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: &'static [IndexKey],
    pub unique: bool,
    /// Seconds after the indexed timestamp at which the server reaps the document.
    pub expire_after_secs: Option<u64>,
}

impl IndexSpec {
    const fn new(collection: &'static str, keys: &'static [IndexKey]) -> Self {
        Self {
            collection,
            keys,
            unique: false,
            expire_after_secs: None,
        }
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn expire_after(mut self, secs: u64) -> Self {
        self.expire_after_secs = Some(secs);
        self
    }

    /// Key document as the server expects it, e.g. `{ "userId": 1, "postId": 1 }`.
    pub fn keys_document(&self) -> Document {
        let mut keys = Document::new();
        for key in self.keys {
            keys.insert(key.field(), key.value());
        }
        keys
    }

    /// Name the server assigns when none is given (`email_1`, `title_text_content_text`).
    pub fn default_name(&self) -> String {
        self.keys
            .iter()
            .map(|key| format!("{}_{}", key.field(), key.name_suffix()))
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn expire_after_duration(&self) -> Option<Duration> {
        self.expire_after_secs.map(Duration::from_secs)
    }

    pub fn is_text(&self) -> bool {
        self.keys.iter().any(|key| matches!(key, IndexKey::Text(_)))
    }

    pub fn kind(&self) -> IndexKind {
        if self.expire_after_secs.is_some() {
            IndexKind::Ttl
        } else if self.is_text() {
            IndexKind::Text
        } else if self.unique && self.keys.len() > 1 {
            IndexKind::CompoundUnique
        } else if self.unique {
            IndexKind::Unique
        } else if self.keys.len() > 1 {
            IndexKind::Compound
        } else {
            IndexKind::Single
        }
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.collection, self.default_name(), self.kind())
    }
}

use IndexKey::{Ascending as Asc, Descending as Desc, Text};

/// Indexes the platform expects, grouped by collection.
pub const INDEXES: &[IndexSpec] = &[
    IndexSpec::new("users", &[Asc("email")]).unique(),
    IndexSpec::new("users", &[Asc("username")]).unique(),
    IndexSpec::new("users", &[Asc("role")]),
    IndexSpec::new("users", &[Asc("isActive")]),
    IndexSpec::new("blog_posts", &[Asc("authorId")]),
    IndexSpec::new("blog_posts", &[Asc("status")]),
    IndexSpec::new("blog_posts", &[Desc("publishedAt")]),
    IndexSpec::new("blog_posts", &[Desc("viewCount")]),
    IndexSpec::new("blog_posts", &[Desc("likeCount")]),
    IndexSpec::new("blog_posts", &[Asc("tags")]),
    IndexSpec::new("blog_posts", &[Asc("category")]),
    IndexSpec::new("blog_posts", &[Asc("slug")]).unique(),
    IndexSpec::new("blog_posts", &[Text("title"), Text("content"), Text("tags")]),
    IndexSpec::new("comments", &[Asc("postId")]),
    IndexSpec::new("comments", &[Asc("authorId")]),
    IndexSpec::new("comments", &[Asc("parentCommentId")]),
    IndexSpec::new("comments", &[Desc("createdAt")]),
    IndexSpec::new(
        "user_interactions",
        &[Asc("userId"), Asc("postId"), Asc("interactionType")],
    )
    .unique(),
    IndexSpec::new("user_interactions", &[Asc("postId"), Asc("interactionType")]),
    IndexSpec::new("user_interactions", &[Asc("userId")]),
    IndexSpec::new("auth_tokens", &[Asc("userId"), Asc("tokenType")]),
    IndexSpec::new("auth_tokens", &[Asc("token")]).unique(),
    IndexSpec::new("auth_tokens", &[Asc("expiresAt")]).expire_after(0),
    IndexSpec::new("tags", &[Asc("name")]).unique(),
    IndexSpec::new("tags", &[Desc("postCount")]),
    IndexSpec::new("categories", &[Asc("name")]).unique(),
    IndexSpec::new("categories", &[Asc("slug")]).unique(),
    IndexSpec::new("categories", &[Desc("postCount")]),
    IndexSpec::new("ai_suggestions", &[Asc("userId")]),
    IndexSpec::new("ai_suggestions", &[Asc("postId")]),
    IndexSpec::new("ai_suggestions", &[Asc("suggestionType")]),
    IndexSpec::new("ai_suggestions", &[Asc("isUsed")]),
    IndexSpec::new("user_sessions", &[Asc("userId")]),
    IndexSpec::new("user_sessions", &[Asc("sessionId")]).unique(),
    IndexSpec::new("user_sessions", &[Asc("expiresAt")]).expire_after(0),
];

/// Fixed indexes declared for one collection.
pub fn indexes_for(collection: &str) -> impl Iterator<Item = &'static IndexSpec> + '_ {
    INDEXES.iter().filter(move |spec| spec.collection == collection)
}
