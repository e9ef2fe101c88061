//! Behaviour tests for the Examples service over the in-memory store
//!
//! These exercise the public contract end to end without Docker:
//! validation, not-found rules, pagination and failure propagation.

use chrono::{TimeDelta, TimeZone, Utc};
use domain_examples::*;
use std::sync::Arc;
use test_utils::assertions::assert_ascending;
use test_utils::{SteppingClock, TestDataBuilder};

fn setup() -> (ExampleService<InMemoryExampleRepository>, InMemoryExampleRepository) {
    let clock = Arc::new(SteppingClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        TimeDelta::seconds(1),
    ));
    let repository = InMemoryExampleRepository::new(clock.clone());
    let service = ExampleService::new(repository.clone(), clock);
    (service, repository)
}

fn request(name: &str, description: &str, value: f64, is_active: bool) -> ExampleRequest {
    ExampleRequest {
        name: name.to_string(),
        description: description.to_string(),
        value,
        is_active,
    }
}

async fn seed(service: &ExampleService<InMemoryExampleRepository>, test: &str, count: u64) {
    let builder = TestDataBuilder::from_test_name(test);
    for i in 0..count {
        service
            .create_example(request(
                &builder.name("example", &i.to_string()),
                "",
                builder.value(i),
                true,
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let (service, _) = setup();

    let created = service
        .create_example(request("Widget", "A widget", 9.99, true))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Widget");
    assert_eq!(created.description, "A widget");
    assert_eq!(created.value, 9.99);
    assert!(created.is_active);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = service.get_example_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = service
        .update_example(created.id, request("Widget v2", "Updated", 19.99, false))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Widget v2");
    assert_eq!(updated.description, "Updated");
    assert_eq!(updated.value, 19.99);
    assert!(!updated.is_active);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > updated.created_at);

    service.delete_example(created.id).await.unwrap();
    assert!(matches!(
        service.get_example_by_id(created.id).await,
        Err(ExampleError::NotFound(id)) if id == created.id
    ));
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let (service, _) = setup();
    let created = service
        .create_example(request("Gadget", "", 1.0, true))
        .await
        .unwrap();

    let first = service.get_example_by_id(created.id).await.unwrap();
    let second = service.get_example_by_id(created.id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_consecutive_pages_are_disjoint_and_ordered() {
    let (service, _) = setup();
    seed(&service, "consecutive_pages", 25).await;

    let first: Vec<i64> = service
        .get_all_examples(10, 0)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    let second: Vec<i64> = service
        .get_all_examples(10, 10)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 10);
    assert_ascending(&first, "first page");
    assert_ascending(&second, "second page");
    assert!(first.iter().all(|id| !second.contains(id)));
    assert!(first.last() < second.first());
}

#[tokio::test]
async fn test_oversized_limit_is_clamped() {
    let (service, _) = setup();
    seed(&service, "oversized_limit", 120).await;

    let page = service.get_all_examples(500, 0).await.unwrap();
    assert_eq!(page.len(), MAX_PAGE_SIZE as usize);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let (service, _) = setup();
    seed(&service, "offset_past_end", 3).await;

    assert!(service.get_all_examples(10, 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_pagination_rejected() {
    let (service, _) = setup();

    assert!(matches!(
        service.get_all_examples(0, 0).await,
        Err(ExampleError::Validation(msg)) if msg == "limit must be positive"
    ));
    assert!(matches!(
        service.get_all_examples(10, -1).await,
        Err(ExampleError::Validation(msg)) if msg == "offset must be non-negative"
    ));
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let (service, _) = setup();

    assert!(matches!(
        service.get_example_by_id(999_999).await,
        Err(ExampleError::NotFound(999_999))
    ));
    assert!(matches!(
        service
            .update_example(999_999, request("Widget", "", 1.0, true))
            .await,
        Err(ExampleError::NotFound(999_999))
    ));
    assert!(matches!(
        service.delete_example(999_999).await,
        Err(ExampleError::NotFound(999_999))
    ));
}

#[tokio::test]
async fn test_invalid_create_stores_nothing() {
    let (service, _) = setup();

    let cases = [
        (request("   ", "", 1.0, true), "name is required"),
        (
            request(&"n".repeat(256), "", 1.0, true),
            "name cannot exceed 255 characters",
        ),
        (
            request("Widget", &"d".repeat(1001), 1.0, true),
            "description cannot exceed 1000 characters",
        ),
        (request("Widget", "", -0.01, true), "value cannot be negative"),
        (request("Widget", "", f64::NAN, true), "value cannot be negative"),
    ];

    for (input, expected) in cases {
        match service.create_example(input).await {
            Err(ExampleError::Validation(msg)) => assert_eq!(msg, expected),
            other => panic!("expected validation error {expected:?}, got {other:?}"),
        }
    }

    assert!(service.get_all_examples(10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_update_leaves_record_untouched() {
    let (service, _) = setup();
    let created = service
        .create_example(request("Widget", "A widget", 9.99, true))
        .await
        .unwrap();

    assert!(matches!(
        service
            .update_example(created.id, request("", "", 1.0, true))
            .await,
        Err(ExampleError::Validation(_))
    ));
    assert!(matches!(
        service
            .update_example(created.id, request("Widget", "", f64::NAN, true))
            .await,
        Err(ExampleError::Validation(msg)) if msg == "value cannot be negative"
    ));
    assert_eq!(service.get_example_by_id(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let (service, repository) = setup();
    let created = service
        .create_example(request("Widget", "", 1.0, true))
        .await
        .unwrap();

    repository.set_unavailable(true);

    let err = service
        .create_example(request("Other", "", 1.0, true))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to create example");

    assert!(matches!(
        service.get_example_by_id(created.id).await,
        Err(ExampleError::Persistence { .. })
    ));
    assert!(matches!(
        service.get_all_examples(10, 0).await,
        Err(ExampleError::Persistence { .. })
    ));
    assert!(matches!(
        service.delete_example(created.id).await,
        Err(ExampleError::Persistence { .. })
    ));

    repository.set_unavailable(false);
    assert!(service.get_example_by_id(created.id).await.is_ok());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let (service, repository) = setup();

    service.close().await.unwrap();
    service.close().await.unwrap();

    assert!(repository.is_closed());
    assert!(matches!(
        service.get_all_examples(10, 0).await,
        Err(ExampleError::Persistence { .. })
    ));
}
