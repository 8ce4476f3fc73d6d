use std::sync::Arc;
use std::time::Duration;

use catalog_feed::{
    ApplyOutcome, CatalogPipeline, CatalogView, ContentError, ContentRecord,
    InMemoryContentStore, LedgerItem, LedgerResult, LedgerSnapshot, PipelineConfig, StaticItem,
};

use crate::support::{ledger, pipeline, static_catalog, store};

#[tokio::test]
async fn end_to_end_single_ledger_item() {
    let store = InMemoryContentStore::new();
    store.insert(
        "cidA",
        ContentRecord::named("Alpha").with_author_info("Author1"),
    )
    .unwrap();
    let static_item = StaticItem {
        id: 10,
        name: "X".into(),
        author_info: "Y".into(),
        caption: "Z".into(),
        ..Default::default()
    };
    let pipeline = CatalogPipeline::new(
        PipelineConfig::new().with_static_catalog(vec![static_item]),
        Arc::new(store),
    );

    let report = pipeline.refresh(&ledger(&[("cidA", "1000", 5)])).await.unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(report.requested, 1);
    assert!(report.failures.is_empty());

    let entries = pipeline.entries().unwrap();
    assert_eq!(entries[0].id, 1);
    assert_eq!(entries[0].content_uri(), Some("cidA"));
    assert_eq!(entries[1].id, 2);
    assert!(entries[1].origin.is_static());

    let combined = pipeline.combined().unwrap();
    assert_eq!(combined.len(), 2);
    let alpha = combined[0].as_enriched().unwrap();
    assert_eq!(alpha.id, 1);
    assert_eq!(alpha.id_revers, 1);
    assert_eq!(alpha.name, "Alpha");
    assert_eq!(alpha.author_info, "Author1");
    assert_eq!(alpha.price.as_deref(), Some("1000"));
    assert_eq!(alpha.supply_remain, Some(5));
    match &combined[1] {
        CatalogView::Supplement(entry) => {
            assert_eq!(entry.id, 10);
            assert_eq!(entry.name, "X");
            assert_eq!(entry.author_info, "Y");
            assert_eq!(entry.caption, "Z");
        }
        other => panic!("expected supplement, got {:?}", other),
    }

    pipeline.set_query("alph").unwrap();
    let results = pipeline.results().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), 1);
    assert_eq!(results[0].id_revers(), Some(1));
}

#[tokio::test]
async fn static_supplement_visible_before_first_refresh() {
    let pipeline = pipeline(store());
    let combined = pipeline.combined().unwrap();
    assert_eq!(combined.len(), 2);
    assert!(combined
        .iter()
        .all(|view| matches!(view, CatalogView::Supplement(_))));
}

#[tokio::test]
async fn pending_ledger_degrades_to_static() {
    let pipeline = pipeline(store());
    let report = pipeline.refresh(&LedgerSnapshot::Pending).await.unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(report.requested, 0);
    assert!(pipeline.entries().unwrap().iter().all(|e| e.origin.is_static()));

    let report = pipeline
        .refresh(&LedgerSnapshot::Failed("rpc unreachable".into()))
        .await
        .unwrap();
    assert_eq!(report.entries, 2);
}

#[tokio::test]
async fn ledger_entries_precede_static_entries() {
    let pipeline = pipeline(store());
    pipeline
        .refresh(&ledger(&[("cidA", "1", 1), ("cidB", "2", 2), ("cidC", "3", 3)]))
        .await
        .unwrap();

    let entries = pipeline.entries().unwrap();
    assert_eq!(entries.len(), 3 + static_catalog().len());
    let uris: Vec<_> = entries[..3].iter().map(|e| e.content_uri().unwrap()).collect();
    assert_eq!(uris, vec!["cidC", "cidB", "cidA"]);
    assert!(entries[3..].iter().all(|e| e.origin.is_static()));
    let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn partial_failures_leave_missing_markers() {
    let store = store();
    store.fail("cidB", ContentError::Transport("gateway 504".into())).unwrap();
    let pipeline = pipeline(store);

    let report = pipeline
        .refresh(&ledger(&[("cidA", "1", 1), ("cidB", "2", 2), ("cidX", "3", 3)]))
        .await
        .unwrap();
    assert_eq!(report.requested, 3);
    assert_eq!(report.failures.len(), 2);
    assert!(report.outcome.is_updated());

    let cache = pipeline.cache().snapshot().unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.missing_count(), 2);

    // failed slots still produce enriched entries with empty fields
    let combined = pipeline.combined().unwrap();
    let enriched: Vec<_> = combined.iter().filter_map(CatalogView::as_enriched).collect();
    assert_eq!(enriched.len(), 3);
    assert_eq!(enriched[0].name, "");
    assert_eq!(enriched[0].price.as_deref(), Some("3"));
    assert_eq!(enriched[2].name, "Alpha");
}

#[tokio::test]
async fn unchanged_refetch_does_not_update() {
    let pipeline = pipeline(store());
    let snapshot = ledger(&[("cidA", "1", 1)]);

    let first = pipeline.refresh(&snapshot).await.unwrap();
    assert_eq!(first.outcome, ApplyOutcome::Updated { version: 1 });
    assert!(first.rebuilt);
    let cache = pipeline.cache().snapshot().unwrap();
    let combined = pipeline.combined().unwrap();

    let second = pipeline.refresh(&snapshot).await.unwrap();
    assert_eq!(second.outcome, ApplyOutcome::Unchanged);
    assert!(!second.rebuilt);
    assert!(Arc::ptr_eq(&cache, &pipeline.cache().snapshot().unwrap()));
    assert!(Arc::ptr_eq(&combined, &pipeline.combined().unwrap()));
}

#[tokio::test]
async fn price_change_rebuilds_without_cache_update() {
    let pipeline = pipeline(store());
    pipeline.refresh(&ledger(&[("cidA", "1", 7)])).await.unwrap();

    let report = pipeline.refresh(&ledger(&[("cidA", "1", 6)])).await.unwrap();
    assert_eq!(report.outcome, ApplyOutcome::Unchanged);
    assert!(report.rebuilt);
    let combined = pipeline.combined().unwrap();
    assert_eq!(combined[0].as_enriched().unwrap().supply_remain, Some(6));
}

#[tokio::test(start_paused = true)]
async fn overlapping_refreshes_rebuild_after_stale_batch() {
    let store = InMemoryContentStore::new();
    store
        .insert_delayed("cidA", ContentRecord::named("Alpha"), Duration::from_millis(100))
        .unwrap();
    let pipeline = pipeline(store);
    pipeline.refresh(&ledger(&[("cidA", "1", 7)])).await.unwrap();

    // the first refresh swaps in the new sequence, the second sees it unchanged
    let snapshot = ledger(&[("cidA", "1", 6)]);
    let (first, second) = tokio::join!(pipeline.refresh(&snapshot), pipeline.refresh(&snapshot));
    let first = first.unwrap();
    let second = second.unwrap();
    assert!(matches!(first.outcome, ApplyOutcome::Stale { .. }));
    assert_eq!(second.outcome, ApplyOutcome::Unchanged);
    assert!(second.rebuilt);

    let entries = pipeline.entries().unwrap();
    assert_eq!(entries[0].origin.supply_remain(), Some(6));
    let combined = pipeline.combined().unwrap();
    assert_eq!(combined[0].as_enriched().unwrap().supply_remain, Some(6));
}

#[tokio::test]
async fn cached_entries_outlive_their_ledger_item() {
    let pipeline = pipeline(store());
    pipeline
        .refresh(&ledger(&[("cidA", "1", 1), ("cidB", "2", 2)]))
        .await
        .unwrap();
    pipeline.refresh(&ledger(&[("cidA", "1", 1)])).await.unwrap();

    // id 2 keeps its old content but now points at a static entry
    let cache = pipeline.cache().snapshot().unwrap();
    assert_eq!(cache.len(), 2);
    let combined = pipeline.combined().unwrap();
    let second = combined[1].as_enriched().unwrap();
    assert_eq!(second.id, 2);
    assert_eq!(second.name, "Alpha");
    assert_eq!(second.price, None);
    assert_eq!(second.supply_remain, Some(10));
}

#[tokio::test(start_paused = true)]
async fn stale_batch_cannot_overwrite_newer_results() {
    let store = InMemoryContentStore::new();
    store.insert_delayed("cidSlow", ContentRecord::named("Old"), Duration::from_millis(200)).unwrap();
    store.insert("cidFast", ContentRecord::named("New")).unwrap();
    let pipeline = pipeline(store);

    let old = ledger(&[("cidSlow", "1", 1)]);
    let new = ledger(&[("cidFast", "2", 2)]);
    let (old_report, new_report) = tokio::join!(pipeline.refresh(&old), pipeline.refresh(&new));
    let old_report = old_report.unwrap();
    let new_report = new_report.unwrap();

    assert!(old_report.generation < new_report.generation);
    assert!(new_report.outcome.is_updated());
    assert!(matches!(old_report.outcome, ApplyOutcome::Stale { .. }));
    assert!(!old_report.rebuilt);

    let cache = pipeline.cache().snapshot().unwrap();
    let name = cache.get(1).and_then(|c| c.record()).and_then(|r| r.name.clone());
    assert_eq!(name.as_deref(), Some("New"));
    assert_eq!(pipeline.combined().unwrap()[0].name(), Some("New"));
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_is_a_per_entry_failure() {
    let store = store();
    store.insert_delayed("cidSlow", ContentRecord::named("Slow"), Duration::from_secs(30)).unwrap();
    let pipeline = CatalogPipeline::new(
        PipelineConfig::new()
            .with_static_catalog(static_catalog())
            .with_fetch_timeout(Duration::from_secs(1)),
        Arc::new(store),
    );

    let report = pipeline
        .refresh(&ledger(&[("cidA", "1", 1), ("cidSlow", "2", 2)]))
        .await
        .unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error, ContentError::Timeout("cidSlow".into()));
    assert_eq!(report.failures[0].id, 1);
}

#[tokio::test]
async fn static_items_with_uri_are_fetched() {
    let store = store();
    let mut items = static_catalog();
    items[0].uri = "cidC".into();
    let pipeline = CatalogPipeline::new(
        PipelineConfig::new().with_static_catalog(items),
        Arc::new(store),
    );

    let report = pipeline
        .refresh(&LedgerSnapshot::Ready(vec![LedgerItem::error()]))
        .await
        .unwrap();
    assert_eq!(report.requested, 1);

    let combined = pipeline.combined().unwrap();
    let gamma = combined[0].as_enriched().unwrap();
    assert_eq!(gamma.id, 1);
    assert_eq!(gamma.name, "Gamma");
    assert_eq!(gamma.price, None);
    assert_eq!(gamma.supply_remain, Some(10));
    // static items are still appended as supplements
    assert_eq!(combined.len(), 1 + 2);
}

#[tokio::test]
async fn find_by_display_key() {
    let pipeline = pipeline(store());
    pipeline
        .refresh(&LedgerSnapshot::Ready(vec![
            LedgerItem::success(LedgerResult::new("cidA")),
            LedgerItem::success(LedgerResult::new("cidB")),
        ]))
        .await
        .unwrap();

    // ids 1 (Beta) and 2 (Alpha); id_revers counts down from 2
    let beta = pipeline.find_by_id_revers(2).unwrap().unwrap();
    assert_eq!(beta.name, "Beta");
    let alpha = pipeline.find_by_id_revers(1).unwrap().unwrap();
    assert_eq!(alpha.name, "Alpha");
    assert!(pipeline.find_by_id_revers(3).unwrap().is_none());
}
