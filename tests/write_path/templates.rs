//! Template Bootstrap Tests

use crate::*;

#[test]
fn test_prefix_is_separator_terminated() {
    let (store, memory) = open_with(|b| b);
    store.create_templates("{\"span\":true}", "{\"service\":true}", "svc").unwrap();
    assert_eq!(
        memory.template_names(),
        vec!["svc-jaeger-service".to_string(), "svc-jaeger-span".to_string()]
    );
    assert_eq!(memory.template("svc-jaeger-service").as_deref(), Some("{\"service\":true}"));
}

#[test]
fn test_no_double_separator() {
    let (store, memory) = open_with(|b| b);
    store.create_templates("{}", "{}", "svc-").unwrap();
    assert_eq!(
        memory.template_names(),
        vec!["svc-jaeger-service".to_string(), "svc-jaeger-span".to_string()]
    );
}

#[test]
fn test_bootstrap_is_repeatable() {
    let (store, memory) = open_with(|b| b);
    store.create_templates("{\"v\":1}", "{}", "").unwrap();
    store.create_templates("{\"v\":2}", "{}", "").unwrap();
    assert_eq!(memory.template("jaeger-span").as_deref(), Some("{\"v\":2}"));
    assert_eq!(store.metrics().index_create_attempts, 4);
}

#[test]
fn test_service_template_skipped_after_span_failure() {
    init_logging();
    let flaky = Arc::new(FlakyStore {
        fail_templates: true,
        ..Default::default()
    });
    let store = SpanStore::builder().store(flaky.clone()).open().unwrap();

    assert!(store.create_templates("{}", "{}", "svc").is_err());
    assert_eq!(*flaky.templates.lock(), vec!["svc-jaeger-span".to_string()]);
    assert_eq!(store.metrics().index_create_failures, 1);
}
