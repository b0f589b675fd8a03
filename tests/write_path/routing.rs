//! Index Routing Tests
//!
//! Index names per indexing mode, as observed in the store.

use crate::*;

#[test]
fn test_daily_indices_follow_span_time() {
    let (store, memory) = open_with(|b| b);
    store.write_span(&span_at("cart", "checkout", day(2024, 5, 17))).unwrap();
    store.write_span(&span_at("cart", "checkout", day(2024, 5, 18))).unwrap();

    assert_eq!(
        memory.index_names(),
        vec![
            "jaeger-service-2024-05-17".to_string(),
            "jaeger-service-2024-05-18".to_string(),
            "jaeger-span-2024-05-17".to_string(),
            "jaeger-span-2024-05-18".to_string(),
        ]
    );
    assert_eq!(store.mode(), IndexingMode::DirectDated);
}

#[test]
fn test_custom_layouts_and_prefix() {
    let (store, memory) = open_with(|b| b.index_prefix("prod").date_layouts("%Y-%m-%d-%H", "%Y-%m"));
    store.write_span(&span("cart", "checkout")).unwrap();

    assert_eq!(memory.count("prod-jaeger-span-2024-05-17-12", DocumentKind::Span), 1);
    assert_eq!(memory.count("prod-jaeger-service-2024-05", DocumentKind::Service), 1);
}

#[test]
fn test_rollover_aliases_ignore_time() {
    let (store, memory) = open_with(|b| b.use_aliases(true));
    for d in 1..=3 {
        store.write_span(&span_at("cart", "checkout", day(2024, 5, d))).unwrap();
    }
    assert_eq!(
        memory.index_names(),
        vec!["jaeger-service-write".to_string(), "jaeger-span-write".to_string()]
    );
    assert_eq!(memory.count("jaeger-span-write", DocumentKind::Span), 3);
}

#[test]
fn test_archive_modes_skip_service_index() {
    for (aliases, expected) in [(false, "jaeger-span-archive"), (true, "jaeger-span-archive-write")] {
        let (store, memory) = open_with(|b| b.archive(true).use_aliases(aliases));
        store.write_span(&span("cart", "checkout")).unwrap();
        assert_eq!(memory.index_names(), vec![expected.to_string()]);
        assert_eq!(memory.count(expected, DocumentKind::Service), 0);
    }
}

#[test]
fn test_index_names_preview_matches_store() {
    let (store, memory) = open_with(|b| b.index_prefix("p-"));
    let s = span("cart", "checkout");
    let names = store.index_names(&s);
    store.write_span(&s).unwrap();
    assert_eq!(memory.count(&names.span, DocumentKind::Span), 1);
    assert_eq!(memory.count(&names.service, DocumentKind::Service), 1);
    assert!(!names.span.contains("--"));
}

#[test]
fn test_flattened_tags_reach_the_document() {
    let (store, memory) = open_with(|b| b.tags_as_fields(false, ["http.method"]).tag_dot_replacement("_"));
    store.write_span(&span("cart", "checkout")).unwrap();

    let docs = memory.documents("jaeger-span-2024-05-17");
    assert_eq!(docs[0].body["tag"]["http_method"], "GET");
    assert_eq!(docs[0].body["tags"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_config_file_drives_routing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("writer.toml");
    std::fs::write(
        &path,
        "index_prefix = \"staging\"\nuse_read_write_aliases = true\n",
    )
    .unwrap();

    let memory = Arc::new(MemoryStore::new());
    let store = SpanStore::builder()
        .config_file(&path)
        .unwrap()
        .store(memory.clone())
        .open()
        .unwrap();
    store.write_span(&span("cart", "checkout")).unwrap();

    assert_eq!(store.mode(), IndexingMode::AliasRollover);
    assert_eq!(memory.count("staging-jaeger-span-write", DocumentKind::Span), 1);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SpanStore::builder()
        .config_file(dir.path().join("absent.toml"))
        .err()
        .unwrap();
    assert!(matches!(err, Error::Io(_)));
}
