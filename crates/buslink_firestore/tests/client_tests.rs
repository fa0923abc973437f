// --- File: crates/buslink_firestore/tests/client_tests.rs ---
//! Client behavior against a mock Firestore REST endpoint.

use buslink_firestore::{FirestoreClient, FirestoreError, FirestoreStore};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_ROOT: &str = "/v1/projects/test-project/databases/(default)/documents";

fn client(server: &MockServer) -> FirestoreClient {
    FirestoreClient::new(server.uri(), "test-project")
}

#[tokio::test]
async fn absent_document_reads_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_ROOT}/refunds/ref_missing")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let found = client(&server)
        .get_document("refunds", "ref_missing")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn failed_precondition_on_commit_surfaces_as_contention() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_ROOT}:commit")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "status": "FAILED_PRECONDITION",
                "message": "the stored version (123) does not match the required base version"
            }
        })))
        .mount(&server)
        .await;

    let writes = vec![json!({
        "update": {
            "name": "projects/test-project/databases/(default)/documents/refunds/ref_1",
            "fields": { "status": { "stringValue": "approved" } }
        },
        "currentDocument": { "updateTime": "2026-01-01T00:00:00Z" }
    })];
    let err = client(&server).commit(writes).await.unwrap_err();
    assert!(matches!(err, FirestoreError::Contention));
}

#[tokio::test]
async fn batch_write_tolerates_already_exists_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_ROOT}:batchWrite")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}, {}],
            "status": [
                { "code": 6, "message": "ALREADY_EXISTS" },
                { "code": 0 }
            ]
        })))
        .mount(&server)
        .await;

    let writes = vec![
        json!({ "update": { "name": "n1", "fields": {} }, "currentDocument": { "exists": false } }),
        json!({ "update": { "name": "n1", "fields": {} } }),
    ];
    client(&server).batch_write(writes).await.unwrap();
}

fn sample_trip(id: &str) -> buslink_common::models::Trip {
    buslink_common::models::Trip {
        id: id.to_string(),
        schedule_id: "sch_1".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
        departure_date_time: chrono::NaiveDate::from_ymd_opt(2026, 3, 16)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap(),
        arrival_date_time: chrono::NaiveDate::from_ymd_opt(2026, 3, 16)
            .unwrap()
            .and_hms_opt(11, 45, 0)
            .unwrap(),
        origin_city: "Colombo".to_string(),
        destination_city: "Kandy".to_string(),
        price: 1500.0,
        total_seats: 40,
        status: "scheduled".to_string(),
        booked_seat_numbers: vec![],
        delay_minutes: 0,
    }
}

/// One batchWrite request may carry at most one write per document, so the
/// create-if-absent writes and the masked updates must leave as two
/// sequential requests, creates first.
#[tokio::test]
async fn merge_splits_creates_and_masked_updates_into_separate_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_ROOT}:batchWrite")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}, {}],
            "status": [{ "code": 0 }, { "code": 0 }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let store = FirestoreStore::new(Arc::new(client(&server)));
    use buslink_common::services::CatalogStore;
    store
        .merge_trips(vec![
            sample_trip("trip_sch_1_20260316"),
            sample_trip("trip_sch_1_20260317"),
        ])
        .await
        .unwrap();

    let batches: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with(":batchWrite"))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(batches.len(), 2);

    for batch in &batches {
        let writes = batch["writes"].as_array().unwrap();
        assert_eq!(writes.len(), 2);
        // no request may target the same document twice
        let names: std::collections::HashSet<&str> = writes
            .iter()
            .map(|w| w["update"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), writes.len());
    }

    // creates first, then the masked updates
    for write in batches[0]["writes"].as_array().unwrap() {
        assert_eq!(write["currentDocument"]["exists"], json!(false));
        assert!(write.get("updateMask").is_none());
    }
    for write in batches[1]["writes"].as_array().unwrap() {
        assert!(write.get("currentDocument").is_none());
        let mask = write["updateMask"]["fieldPaths"].as_array().unwrap();
        assert!(mask.contains(&json!("scheduleId")));
        assert!(!mask.contains(&json!("bookedSeatNumbers")));
        assert!(!mask.contains(&json!("status")));
    }
}

/// Migration writes a route's schedule and its cleaned document in one
/// atomic commit, so a failure cannot strand a legacy route with a freshly
/// minted schedule.
#[tokio::test]
async fn route_migration_is_a_single_atomic_commit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_ROOT}:commit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = FirestoreStore::new(Arc::new(client(&server)));
    let route = buslink_common::models::Route {
        id: "route_old_1".to_string(),
        origin_city: "Colombo".to_string(),
        destination_city: "Kandy".to_string(),
        via: None,
        stops: vec![],
        distance_km: 0.0,
        estimated_duration_mins: 0,
        is_active: true,
    };
    let schedule = buslink_common::models::Schedule {
        id: "sch_new_1".to_string(),
        route_id: "route_old_1".to_string(),
        departure_time: "08:00".to_string(),
        recurrence_days: vec![1, 2, 3, 4, 5, 6, 7],
        base_price: 750.0,
        total_seats: 40,
        amenities: vec![],
        bus_number: "NB-1234".to_string(),
        operator_name: "Buslink".to_string(),
        bus_type: "Standard".to_string(),
        conductor_id: None,
    };
    store.migrate_route(&route, &schedule).await.unwrap();

    let commits: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with(":commit"))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(commits.len(), 1);

    let writes = commits[0]["writes"].as_array().unwrap();
    assert_eq!(writes.len(), 2);
    assert!(writes[0]["update"]["name"]
        .as_str()
        .unwrap()
        .ends_with("schedules/sch_new_1"));
    assert!(writes[1]["update"]["name"]
        .as_str()
        .unwrap()
        .ends_with("routes/route_old_1"));
    // the route write strips the legacy fields via its mask
    let mask = writes[1]["updateMask"]["fieldPaths"].as_array().unwrap();
    assert!(mask.contains(&json!("price")));
    assert!(mask.contains(&json!("departureTime")));
    assert!(mask.contains(&json!("originCity")));
}

#[tokio::test]
async fn wipe_deletes_pages_until_empty() {
    let server = MockServer::start().await;

    // first page has one document, later pages are empty
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_ROOT}/trips")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{
                "name": "projects/test-project/databases/(default)/documents/trips/trip_1",
                "fields": {}
            }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_ROOT}/trips")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS_ROOT}:batchWrite")))
        .and(body_partial_json(json!({
            "writes": [{ "delete": "projects/test-project/databases/(default)/documents/trips/trip_1" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}],
            "status": [{ "code": 0 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = FirestoreStore::new(Arc::new(client(&server)));
    let deleted = store.wipe_collection("trips").await.unwrap();
    assert_eq!(deleted, 1);
}
