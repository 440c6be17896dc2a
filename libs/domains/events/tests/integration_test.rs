//! Integration tests for the Events domain
//!
//! These run against a real MongoDB via testcontainers and check the store
//! semantics the mocks cannot: sort order, regex search, add-to-set joins
//! and partial updates.

use chrono::{Duration, SecondsFormat, Utc};
use domain_events::*;
use ::mongodb::bson::{Document, doc};
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

fn new_event(builder: &TestDataBuilder, title: &str, event_type: &str, days: i64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: "Integration test event".to_string(),
        event_type: event_type.to_string(),
        thumbnail: None,
        location: "Hall".to_string(),
        event_date: Utc::now() + Duration::days(days),
        creator_email: builder.email("creator"),
        joined_users: vec![],
    }
}

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoEventRepository {
    let repo = MongoEventRepository::new(&mongo.database(&builder.database_name()));
    repo.create_indexes().await.unwrap();
    repo
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_event() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("create_and_get");
    let repo = repository(&mongo, &builder).await;

    let ack = repo
        .create(new_event(&builder, "Meetup", "Social", 1))
        .await
        .unwrap();
    assert!(ack.acknowledged);
    assert_object_id(&ack.inserted_id, "inserted id");

    let event = assert_some(repo.get_by_id(&ack.inserted_id).await.unwrap(), "event");
    assert_eq!(event.id, ack.inserted_id);
    assert_eq!(event.title, "Meetup");
    assert!(event.joined_users.is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_filters_and_sorts() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("list_filters");
    let repo = repository(&mongo, &builder).await;

    repo.create(new_event(&builder, "Late Rust Night", "Tech", 10))
        .await
        .unwrap();
    repo.create(new_event(&builder, "Early rust brunch", "Social", 2))
        .await
        .unwrap();
    repo.create(new_event(&builder, "Past picnic", "Social", -3))
        .await
        .unwrap();

    let all = repo.list(&EventFilter::default()).await.unwrap();
    let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Past picnic", "Early rust brunch", "Late Rust Night"]);

    let social = repo
        .list(&EventFilter {
            event_type: Some("Social".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(social.len(), 2);

    let everything = repo
        .list(&EventFilter {
            event_type: Some("All".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    let search = repo
        .list(&EventFilter {
            search: Some("RUST".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(search.len(), 2);

    let upcoming = repo
        .list(&EventFilter {
            upcoming: Some("true".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<_> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Early rust brunch", "Late Rust Night"]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_reads_string_dates() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("string_dates");
    let repo = repository(&mongo, &builder).await;

    repo.create(new_event(&builder, "Stored", "Social", 5))
        .await
        .unwrap();

    let soon = (Utc::now() + Duration::days(1)).to_rfc3339_opts(SecondsFormat::Millis, true);
    let raw = repo.collection().clone_with_type::<Document>();
    raw.insert_many([
        doc! { "title": "Legacy soon", "eventType": "Social", "eventDate": soon },
        doc! { "title": "Legacy past", "eventType": "Social", "eventDate": "2001-01-01" },
    ])
    .await
    .unwrap();

    let all = repo.list(&EventFilter::default()).await.unwrap();
    let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Legacy past", "Legacy soon", "Stored"]);

    let upcoming = repo
        .list(&EventFilter {
            upcoming: Some("true".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<_> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Legacy soon", "Stored"]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_join_is_idempotent() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("join_idempotent");
    let repo = repository(&mongo, &builder).await;

    let ack = repo
        .create(new_event(&builder, "Meetup", "Social", 1))
        .await
        .unwrap();
    let guest = builder.email("guest");

    assert!(repo.join(&ack.inserted_id, &guest).await.unwrap());
    assert!(repo.join(&ack.inserted_id, &guest).await.unwrap());

    let event = assert_some(repo.get_by_id(&ack.inserted_id).await.unwrap(), "event");
    assert_eq!(event.joined_users, vec![guest]);

    let missing = "ffffffffffffffffffffffff";
    assert!(!repo.join(missing, "x@test.local").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_changes_only_supplied_fields() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("partial_update");
    let repo = repository(&mongo, &builder).await;

    let ack = repo
        .create(new_event(&builder, "Meetup", "Social", 1))
        .await
        .unwrap();
    let before = assert_some(repo.get_by_id(&ack.inserted_id).await.unwrap(), "before");

    let changes = EventChanges {
        description: Some("X".into()),
        ..Default::default()
    };
    assert!(repo.update(&ack.inserted_id, changes).await.unwrap());

    let after = assert_some(repo.get_by_id(&ack.inserted_id).await.unwrap(), "after");
    assert_eq!(after.description, "X");
    assert_eq!(after.title, before.title);
    assert_eq!(after.event_date, before.event_date);

    let missing = repo
        .update(
            "ffffffffffffffffffffffff",
            EventChanges {
                title: Some("nope".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!missing);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_reports_count() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("delete_count");
    let repo = repository(&mongo, &builder).await;

    let ack = repo
        .create(new_event(&builder, "Meetup", "Social", 1))
        .await
        .unwrap();

    assert_eq!(repo.delete(&ack.inserted_id).await.unwrap().deleted_count, 1);
    assert_eq!(repo.delete(&ack.inserted_id).await.unwrap().deleted_count, 0);
    assert!(repo.get_by_id(&ack.inserted_id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_malformed_id_is_database_error() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("malformed_id");
    let repo = repository(&mongo, &builder).await;

    let err = repo.get_by_id("not-an-object-id").await.unwrap_err();
    assert!(matches!(err, EventError::Database { .. }));
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_example_scenario() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("example_scenario");
    let service = EventService::new(repository(&mongo, &builder).await);

    let tomorrow = (Utc::now() + Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let ack = service
        .create_event(CreateEvent {
            title: Some("Meetup".into()),
            description: Some("D".into()),
            event_type: Some("Social".into()),
            thumbnail: None,
            location: Some("Hall".into()),
            event_date: Some(tomorrow),
            creator_email: Some("a@x.com".into()),
            joined_users: None,
        })
        .await
        .unwrap();

    let event = service.get_event(&ack.inserted_id).await.unwrap();
    assert!(event.joined_users.is_empty());

    let joined = service
        .join_event(
            &ack.inserted_id,
            JoinEvent {
                user_email: Some("b@x.com".into()),
            },
        )
        .await
        .unwrap();
    assert!(joined.success);

    let event = service.get_event(&ack.inserted_id).await.unwrap();
    assert_eq!(event.joined_users, vec!["b@x.com".to_string()]);
}
