use super::support::*;

#[tokio::test]
async fn failed_collection_does_not_block_the_rest() {
    let store = MemoryStore::new().with_fault(Fault::CreateCollection("comments"));
    let (store, report) = run(store).await;

    assert!(matches!(
        find(&report, Phase::Collections, "comments").action,
        Action::Failed(_)
    ));
    assert_eq!(report.count(Phase::Collections, &Action::Created), 8);
    assert!(store.collections.contains_key("user_sessions"));
    assert_eq!(store.documents("tags").len(), 3);
}

#[tokio::test]
async fn unique_index_over_duplicates_is_reported() {
    let store = MemoryStore::new()
        .with_document("users", doc! { "email": "a@example.com", "username": "a" })
        .with_document("users", doc! { "email": "a@example.com", "username": "b" });

    let (store, report) = run(store).await;

    let outcome = find(&report, Phase::Indexes, "users.email_1 (unique)");
    match &outcome.action {
        Action::Failed(reason) => assert!(reason.contains("duplicate key"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(report.failure_count(), 1);
    assert_eq!(
        find(&report, Phase::Indexes, "users.username_1 (unique)").action,
        Action::Created
    );
    assert!(
        !store
            .index_specs("users")
            .iter()
            .any(|spec| spec.default_name() == "email_1")
    );
    assert_eq!(store.index_specs("user_sessions").len(), 3);
}

#[tokio::test]
async fn failed_index_does_not_block_later_indexes() {
    let store = MemoryStore::new().with_fault(Fault::CreateIndex("title_text_content_text_tags_text"));
    let (store, report) = run(store).await;

    assert!(find(&report, Phase::Indexes, "blog_posts.title_text_content_text_tags_text (text)").is_failure());
    assert_eq!(report.count(Phase::Indexes, &Action::Created), INDEXES.len() - 1);
    assert_eq!(store.index_specs("comments").len(), 4);
    assert_eq!(store.documents("categories").len(), 3);
}

#[tokio::test]
async fn failed_seed_insert_does_not_block_later_rows() {
    let store = MemoryStore::new().with_fault(Fault::Insert("Lifestyle"));
    let (store, report) = run(store).await;

    assert!(find(&report, Phase::Seeds, "categories: Lifestyle").is_failure());
    assert_eq!(store.names_in("categories"), ["Technology", "Business"]);
    assert_eq!(store.names_in("tags"), ["golang", "mongodb", "api"]);
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn retry_after_failure_fills_the_gap() {
    let (mut store, _) = run(MemoryStore::new().with_fault(Fault::Insert("Lifestyle"))).await;
    store.faults.clear();

    let (store, report) = run(store).await;

    assert_eq!(find(&report, Phase::Seeds, "categories: Lifestyle").action, Action::Created);
    assert_eq!(report.count(Phase::Seeds, &Action::AlreadyPresent), 5);
    assert_eq!(store.documents("categories").len(), 3);
}

#[tokio::test]
async fn unlisted_collections_still_attempted() {
    let store = MemoryStore::new()
        .with_collection("users")
        .with_fault(Fault::ListCollections);
    let (store, report) = run(store).await;

    // Listing failed, so "users" is only known to exist from the create reply.
    assert_eq!(find(&report, Phase::Collections, "users").action, Action::AlreadyPresent);
    assert_eq!(report.count(Phase::Collections, &Action::Created), 8);
    assert_eq!(report.failure_count(), 0);
    assert_eq!(store.collections.len(), 9);
}

#[tokio::test]
async fn conflicting_existing_index_is_a_failure() {
    let mut store = MemoryStore::new();
    // Same key, same name, but without the unique option.
    let plain_email = IndexSpec {
        unique: false,
        ..*INDEXES
            .iter()
            .find(|spec| spec.collection == "users" && spec.default_name() == "email_1")
            .expect("users email index")
    };
    store.create_index(&plain_email).await.expect("seed conflicting index");

    let (_, report) = run(store).await;

    assert!(find(&report, Phase::Indexes, "users.email_1 (unique)").is_failure());
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn slug_clash_is_not_mistaken_for_an_existing_row() {
    let store = MemoryStore::new().with_document("categories", doc! { "name": "Tech", "slug": "technology" });
    let (store, report) = run(store).await;

    let outcome = find(&report, Phase::Seeds, "categories: Technology");
    match &outcome.action {
        Action::Failed(reason) => assert!(reason.contains("duplicate key"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(store.names_in("categories"), ["Tech", "Lifestyle", "Business"]);
    assert_eq!(report.failures_in(Phase::Seeds), 1);
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn existing_name_is_still_reported_present() {
    let store = MemoryStore::new().with_document("categories", doc! { "name": "Technology", "slug": "tech" });
    let (store, report) = run(store).await;

    assert_eq!(
        find(&report, Phase::Seeds, "categories: Technology").action,
        Action::AlreadyPresent
    );
    assert_eq!(store.documents("categories").len(), 3);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn unlisted_indexes_are_not_claimed_as_created() {
    let (mut store, _) = run(MemoryStore::new()).await;
    store.faults.push(Fault::ListIndexes("users"));

    let (_, report) = run(store).await;

    assert_eq!(
        find(&report, Phase::Indexes, "users.email_1 (unique)").action,
        Action::Ensured
    );
    assert_eq!(report.count(Phase::Indexes, &Action::Created), 0);
    assert_eq!(
        report.count(Phase::Indexes, &Action::Ensured),
        INDEXES.iter().filter(|spec| spec.collection == "users").count()
    );
    assert_eq!(report.failure_count(), 0);
}
