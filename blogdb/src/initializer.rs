//! The bootstrap pass: collections, then indexes, then seed rows.
//!
//! Nothing in here aborts. Every attempted action becomes an [`Outcome`];
//! "already exists" replies, and duplicate-key replies for a seed row whose
//! name is already stored, are recorded as [`Action::AlreadyPresent`].
//! Anything else is [`Action::Failed`] and the pass moves on to the next item.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bson::doc;
use chrono::Utc;
use log::{debug, info, warn};

use crate::errors::StoreError;
use crate::schema::{COLLECTIONS, INDEXES, IndexSpec};
use crate::seeds::{DEFAULT_CATEGORIES, DEFAULT_TAGS, SeedRow};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Collections,
    Indexes,
    Seeds,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Collections => "collections",
            Phase::Indexes => "indexes",
            Phase::Seeds => "seed data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Created,
    AlreadyPresent,
    /// The create call succeeded but the index listing beforehand failed, so
    /// whether this pass built it or it was already there is unknown.
    Ensured,
    /// Dry run only: the item is missing and a real run would create it.
    WouldCreate,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub phase: Phase,
    /// Display label: `users`, `users.email_1 (unique)`, `categories: Technology`.
    pub target: String,
    pub action: Action,
}

impl Outcome {
    fn new(phase: Phase, target: impl Into<String>, action: Action) -> Self {
        Self {
            phase,
            target: target.into(),
            action,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.action, Action::Failed(_))
    }
}

/// Receives outcomes as they happen so callers can print progress live.
pub trait Progress {
    fn phase_started(&mut self, _phase: Phase) {}

    fn record(&mut self, outcome: &Outcome);
}

impl Progress for () {
    fn record(&mut self, _outcome: &Outcome) {}
}

/// Everything a pass attempted, in order.
#[derive(Debug, Clone, Default)]
pub struct InitReport {
    pub dry_run: bool,
    pub outcomes: Vec<Outcome>,
}

impl InitReport {
    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(move |outcome| outcome.phase == phase)
    }

    pub fn count(&self, phase: Phase, action: &Action) -> usize {
        self.phase(phase).filter(|outcome| outcome.action == *action).count()
    }

    pub fn failures_in(&self, phase: Phase) -> usize {
        self.phase(phase).filter(|outcome| outcome.is_failure()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Runs the bootstrap pass against a [`DocumentStore`].
pub struct Initializer<S> {
    store: S,
    dry_run: bool,
}

impl<S: DocumentStore> Initializer<S> {
    pub fn new(store: S) -> Self {
        Self { store, dry_run: false }
    }

    /// Inspect only: report what would be created without writing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Collections, then indexes, then seeds. Always runs to the end.
    pub async fn run<P: Progress>(&mut self, progress: &mut P) -> InitReport {
        let mut report = InitReport {
            dry_run: self.dry_run,
            outcomes: Vec::new(),
        };

        self.ensure_collections(&mut report, progress).await;
        self.ensure_indexes(&mut report, progress).await;
        self.load_seeds(&mut report, progress).await;

        info!(
            "bootstrap pass finished: {} action(s), {} failure(s)",
            report.outcomes.len(),
            report.failure_count()
        );
        report
    }

    pub async fn ensure_collections<P: Progress>(&mut self, report: &mut InitReport, progress: &mut P) {
        progress.phase_started(Phase::Collections);

        let existing: HashSet<String> = match self.store.list_collection_names().await {
            Ok(names) => names.into_iter().collect(),
            Err(err) => {
                warn!("could not list collections: {err}");
                if self.dry_run {
                    for name in COLLECTIONS {
                        push(report, progress, Outcome::new(Phase::Collections, *name, Action::Failed(err.to_string())));
                    }
                    return;
                }
                // Fall through: creating an existing collection is reported as AlreadyExists.
                HashSet::new()
            }
        };

        for name in COLLECTIONS {
            let action = if existing.contains(*name) {
                Action::AlreadyPresent
            } else if self.dry_run {
                Action::WouldCreate
            } else {
                debug!("creating collection {name}");
                match self.store.create_collection(name).await {
                    Ok(()) => Action::Created,
                    Err(err) if err.is_already_exists() => Action::AlreadyPresent,
                    Err(err) => failed(&format!("collection {name}"), err),
                }
            };
            push(report, progress, Outcome::new(Phase::Collections, *name, action));
        }
    }

    pub async fn ensure_indexes<P: Progress>(&mut self, report: &mut InitReport, progress: &mut P) {
        progress.phase_started(Phase::Indexes);

        let mut present: HashMap<&'static str, Result<HashSet<String>, String>> = HashMap::new();

        for spec in INDEXES {
            if !present.contains_key(spec.collection) {
                let listed = self
                    .store
                    .list_index_names(spec.collection)
                    .await
                    .map(|names| names.into_iter().collect())
                    .map_err(|err| err.to_string());
                present.insert(spec.collection, listed);
            }
            let listed = match &present[spec.collection] {
                Ok(names) => Ok(names.contains(&spec.default_name())),
                Err(reason) => Err(reason.clone()),
            };

            let action = match listed {
                Ok(true) if self.dry_run => Action::AlreadyPresent,
                Ok(false) if self.dry_run => Action::WouldCreate,
                Err(reason) if self.dry_run => Action::Failed(reason),
                listed => self.create_index(spec, listed.ok()).await,
            };
            push(report, progress, Outcome::new(Phase::Indexes, spec.to_string(), action));
        }
    }

    /// `listed_before` is `None` when the collection's indexes could not be listed.
    async fn create_index(&mut self, spec: &IndexSpec, listed_before: Option<bool>) -> Action {
        debug!("creating index {spec}");
        match self.store.create_index(spec).await {
            // The server accepts an identical index silently; use the listing to tell them apart.
            Ok(()) => match listed_before {
                Some(true) => Action::AlreadyPresent,
                Some(false) => Action::Created,
                None => Action::Ensured,
            },
            Err(err) if err.is_already_exists() => Action::AlreadyPresent,
            Err(err) => failed(&format!("index {spec}"), err),
        }
    }

    pub async fn load_seeds<P: Progress>(&mut self, report: &mut InitReport, progress: &mut P) {
        progress.phase_started(Phase::Seeds);
        self.seed_rows(DEFAULT_CATEGORIES, report, progress).await;
        self.seed_rows(DEFAULT_TAGS, report, progress).await;
    }

    async fn seed_rows<R: SeedRow, P: Progress>(&mut self, rows: &[R], report: &mut InitReport, progress: &mut P) {
        for row in rows {
            let target = format!("{}: {}", R::COLLECTION, row.name());
            let action = if self.dry_run {
                match self
                    .store
                    .count_documents(R::COLLECTION, doc! { "name": row.name() })
                    .await
                {
                    Ok(0) => Action::WouldCreate,
                    Ok(_) => Action::AlreadyPresent,
                    Err(err) => Action::Failed(err.to_string()),
                }
            } else {
                self.insert_row(row).await
            };
            push(report, progress, Outcome::new(Phase::Seeds, target, action));
        }
    }

    async fn insert_row<R: SeedRow>(&mut self, row: &R) -> Action {
        let document = match row.to_document(Utc::now()) {
            Ok(document) => document,
            Err(err) => return failed(&format!("seed {}", row.name()), err),
        };

        debug!("inserting {} into {}", row.name(), R::COLLECTION);
        match self.store.insert_document(R::COLLECTION, document).await {
            Ok(()) => Action::Created,
            Err(err) if err.is_duplicate_key() => self.confirm_stored(row, err).await,
            Err(err) => failed(&format!("seed {}", row.name()), err),
        }
    }

    /// A duplicate key only means "already seeded" when a row with this name
    /// exists; a clash on another unique field (a category `slug`) is a failure.
    async fn confirm_stored<R: SeedRow>(&mut self, row: &R, err: StoreError) -> Action {
        match self
            .store
            .count_documents(R::COLLECTION, doc! { "name": row.name() })
            .await
        {
            Ok(0) => failed(&format!("seed {}", row.name()), err),
            Ok(_) => Action::AlreadyPresent,
            Err(count_err) => failed(&format!("seed {}", row.name()), count_err),
        }
    }
}

fn failed(what: &str, err: StoreError) -> Action {
    warn!("{what} failed: {err}");
    Action::Failed(err.to_string())
}

fn push<P: Progress>(report: &mut InitReport, progress: &mut P, outcome: Outcome) {
    progress.record(&outcome);
    report.outcomes.push(outcome);
}
