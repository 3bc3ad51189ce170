use super::support::*;

#[tokio::test]
async fn dry_run_on_empty_database_writes_nothing() {
    let (store, report) = dry_run(MemoryStore::new()).await;

    assert!(report.dry_run);
    assert_eq!(store.writes, 0);
    assert!(store.collections.is_empty());

    assert_eq!(report.count(Phase::Collections, &Action::WouldCreate), 9);
    assert_eq!(report.count(Phase::Indexes, &Action::WouldCreate), INDEXES.len());
    assert_eq!(report.count(Phase::Seeds, &Action::WouldCreate), 6);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn dry_run_after_real_run_finds_everything() {
    let (store, _) = run(MemoryStore::new()).await;
    let writes = store.writes;

    let (store, report) = dry_run(store).await;

    assert_eq!(store.writes, writes);
    assert!(
        report
            .outcomes
            .iter()
            .all(|outcome| outcome.action == Action::AlreadyPresent)
    );
}

#[tokio::test]
async fn dry_run_reports_partial_state() {
    let store = MemoryStore::new()
        .with_collection("tags")
        .with_document("tags", doc! { "name": "golang", "postCount": 3 });

    let (store, report) = dry_run(store).await;

    assert_eq!(store.writes, 0);
    assert_eq!(find(&report, Phase::Collections, "tags").action, Action::AlreadyPresent);
    assert_eq!(find(&report, Phase::Seeds, "tags: golang").action, Action::AlreadyPresent);
    assert_eq!(find(&report, Phase::Seeds, "tags: api").action, Action::WouldCreate);
    assert_eq!(find(&report, Phase::Indexes, "tags.name_1 (unique)").action, Action::WouldCreate);
}

#[tokio::test]
async fn dry_run_listing_failure_marks_collections_failed() {
    let store = MemoryStore::new().with_fault(Fault::ListCollections);
    let (store, report) = dry_run(store).await;

    assert_eq!(store.writes, 0);
    assert_eq!(report.phase(Phase::Collections).filter(|o| o.is_failure()).count(), 9);
}
