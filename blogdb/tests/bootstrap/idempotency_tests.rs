use super::support::*;

#[tokio::test]
async fn empty_database_gets_full_layout() {
    let (store, report) = run(MemoryStore::new()).await;

    let mut names: Vec<_> = store.collections.keys().cloned().collect();
    let mut expected: Vec<_> = COLLECTIONS.iter().map(|name| name.to_string()).collect();
    names.sort();
    expected.sort();
    assert_eq!(names, expected);

    assert_eq!(report.count(Phase::Collections, &Action::Created), 9);
    assert_eq!(report.count(Phase::Indexes, &Action::Created), INDEXES.len());
    assert_eq!(report.count(Phase::Seeds, &Action::Created), 6);
    assert_eq!(report.failure_count(), 0);

    for spec in INDEXES {
        assert!(
            store.index_specs(spec.collection).contains(spec),
            "missing index {spec}"
        );
    }

    assert_eq!(store.names_in("categories"), ["Technology", "Lifestyle", "Business"]);
    assert_eq!(store.names_in("tags"), ["golang", "mongodb", "api"]);
    for collection in ["categories", "tags"] {
        for document in store.documents(collection) {
            assert_eq!(document.get_i32("postCount").unwrap(), 0);
            assert!(document.get_datetime("createdAt").is_ok());
        }
    }

    let slugs: Vec<_> = store
        .documents("categories")
        .iter()
        .map(|doc| doc.get_str("slug").unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["technology", "lifestyle", "business"]);
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let (first, _) = run(MemoryStore::new()).await;
    let snapshot = first.clone();

    let (second, report) = run(first).await;

    assert_eq!(second.collections.len(), 9);
    for (name, state) in &snapshot.collections {
        let after = &second.collections[name];
        assert_eq!(after.indexes, state.indexes, "indexes changed on {name}");
        // Same rows, same createdAt: nothing re-stamped.
        assert_eq!(after.documents, state.documents, "documents changed in {name}");
    }

    assert_eq!(second.documents("categories").len(), 3);
    assert_eq!(second.documents("tags").len(), 3);

    assert_eq!(report.failure_count(), 0);
    assert!(
        report.outcomes.iter().all(|outcome| outcome.action == Action::AlreadyPresent),
        "second run should only find existing items: {:?}",
        report
            .outcomes
            .iter()
            .filter(|outcome| outcome.action != Action::AlreadyPresent)
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn preexisting_collections_are_kept_once() {
    let store = MemoryStore::new()
        .with_collection("users")
        .with_collection("tags")
        .with_collection("legacy_posts");

    let (store, report) = run(store).await;

    assert_eq!(store.collections.len(), 10);
    assert!(store.collections.contains_key("legacy_posts"));
    assert_eq!(find(&report, Phase::Collections, "users").action, Action::AlreadyPresent);
    assert_eq!(find(&report, Phase::Collections, "tags").action, Action::AlreadyPresent);
    assert_eq!(find(&report, Phase::Collections, "comments").action, Action::Created);
    assert_eq!(report.count(Phase::Collections, &Action::Created), 7);
}

#[tokio::test]
async fn existing_seed_row_is_left_untouched() {
    let (store, _) = run(MemoryStore::new()).await;
    let original = store.documents("categories")[0].clone();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let (store, report) = run(store).await;

    assert_eq!(store.documents("categories")[0], original);
    assert_eq!(
        find(&report, Phase::Seeds, "categories: Technology").action,
        Action::AlreadyPresent
    );
}

#[tokio::test]
async fn duplicate_category_rejected_by_store() {
    let (mut store, _) = run(MemoryStore::new()).await;

    let err = store
        .insert_document(
            "categories",
            doc! { "name": "Technology", "slug": "technology-2", "postCount": 0 },
        )
        .await
        .expect_err("unique name index should reject the row");
    assert!(err.is_duplicate_key());

    let err = store
        .insert_document("tags", doc! { "name": "golang", "postCount": 0 })
        .await
        .expect_err("unique tag name index should reject the row");
    assert!(err.is_duplicate_key());
}

#[tokio::test]
async fn ttl_indexes_expire_at_zero_seconds() {
    let (store, _) = run(MemoryStore::new()).await;

    for collection in ["auth_tokens", "user_sessions"] {
        let ttl = store
            .index_specs(collection)
            .iter()
            .find(|spec| spec.expire_after_secs.is_some())
            .unwrap_or_else(|| panic!("{collection} has no TTL index"));
        assert_eq!(ttl.default_name(), "expiresAt_1");
        assert_eq!(ttl.expire_after_secs, Some(0));
    }
}

#[tokio::test]
async fn progress_sees_phases_in_order() {
    let mut progress = RecordingProgress::default();
    let mut initializer = Initializer::new(MemoryStore::new());
    let report = initializer.run(&mut progress).await;

    assert_eq!(progress.phases, [Phase::Collections, Phase::Indexes, Phase::Seeds]);
    assert_eq!(progress.outcomes, report.outcomes);
    assert_eq!(progress.outcomes.len(), 9 + INDEXES.len() + 6);
    assert_eq!(progress.outcomes[0].target, "users");
    assert_eq!(progress.outcomes[9].target, "users.email_1 (unique)");
    assert_eq!(
        progress.outcomes.last().map(|outcome| outcome.target.as_str()),
        Some("tags: api")
    );
}
