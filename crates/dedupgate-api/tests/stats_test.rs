//! Integration tests for GET /stats and GET /events against PostgreSQL.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_stats_counter_integrity(pool: PgPool) {
    // Arrange: 3 unique events, 2 duplicates.
    for (topic, id) in [("a", "1"), ("a", "2"), ("b", "1"), ("a", "1"), ("b", "1")] {
        let app = common::build_test_app(pool.clone());
        common::post_json(app, "/publish", &common::event_body(topic, id)).await;
    }

    // Act
    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/stats").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["received"], 5);
    assert_eq!(json["unique_processed"], 3);
    assert_eq!(json["duplicate_dropped"], 2);
    assert_eq!(json["topics_active"], 2);
    assert!(json["uptime_seconds"].is_number());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_events_lists_newest_first(pool: PgPool) {
    for id in ["first", "second", "third"] {
        let app = common::build_test_app(pool.clone());
        common::post_json(app, "/publish", &common::event_body("orders", id)).await;
    }

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/events?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    let events = json.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_id"], "third");
    assert_eq!(events[1]["event_id"], "second");
    assert_eq!(events[0]["payload"]["test"], "data");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_events_on_empty_ledger_is_empty_list(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/events").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}
