//! HTTP API tests against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::{Value, json};
use std::sync::Arc;
use student_portal_core::environment::Clock;
use student_portal_core::{OfferingId, OfferingStatus};
use student_portal_runtime::RegistrationConfig;
use student_portal_testing::fixtures::OfferingBuilder;
use student_portal_testing::{InMemoryOfferingStore, test_clock};
use student_portal_web::{AppState, REQUEST_ID_HEADER, build_router};
use tower::ServiceExt;

fn app(store: &InMemoryOfferingStore) -> Router {
    build_router(AppState::new(
        Arc::new(store.clone()),
        Arc::new(test_clock()),
        RegistrationConfig::default(),
    ))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form(email: &str) -> Value {
    json!({
        "name": "Siti Rahma",
        "email": email,
        "phone": "081234567890",
        "class_name": "XII IPA 2",
        "motivation": "Ingin belajar"
    })
}

#[tokio::test]
async fn register_returns_created_registration() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).capacity(2).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &form("Siti@Example.com"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registrant"]["email"], "siti@example.com");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["offering_id"], offering.id.to_string());
    assert_eq!(store.registration_count(offering.id), 1);
}

#[tokio::test]
async fn full_offering_is_conflict_with_capacity_code() {
    let now = test_clock().now();
    let offering = OfferingBuilder::tryout(now).capacity(1).current(1).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &form("late@example.com"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn duplicate_is_conflict_with_its_own_code() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).capacity(5).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
    let uri = format!("/api/offerings/{}/registrations", offering.id);

    let (first, _) = send(app(&store), post_json(&uri, &form("dup@example.com"))).await;
    let (second, body) = send(app(&store), post_json(&uri, &form("DUP@example.com"))).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_REGISTERED");
    assert_eq!(store.offering(offering.id).unwrap().current_participants, 1);
}

#[tokio::test]
async fn closed_window_is_unprocessable() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now)
        .window(now - Duration::days(5), now - Duration::days(1))
        .build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &form("telat@example.com"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "OUTSIDE_REGISTRATION_WINDOW");
}

#[tokio::test]
async fn invalid_fields_are_validation_errors() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &form("no-at-sign"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(store.commit_attempts(), 0);
}

#[tokio::test]
async fn malformed_body_and_id_are_bad_requests() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &json!({ "name": "Missing fields" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(app(&store), get("/api/offerings/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_offering_is_not_found() {
    let store = InMemoryOfferingStore::new();

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", OfferingId::new()),
            &form("ghost@example.com"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn transient_outage_is_service_unavailable() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
    store.fail_next_commits(2);

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/offerings/{}/registrations", offering.id),
            &form("sabar@example.com"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn listing_shows_availability_and_hides_inactive() {
    let now = test_clock().now();
    let open = OfferingBuilder::internship(now).title("Open").capacity(3).build();
    let full = OfferingBuilder::internship(now).title("Full").capacity(1).current(1).build();
    let inactive = OfferingBuilder::internship(now)
        .title("Hidden")
        .status(OfferingStatus::Inactive)
        .build();
    let store = InMemoryOfferingStore::with_offerings([open.clone(), full.clone(), inactive]);

    let (status, body) = send(app(&store), get("/api/offerings?kind=internship")).await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    let availability = |id: OfferingId| {
        listed
            .iter()
            .find(|o| o["id"] == id.to_string())
            .map(|o| o["availability"].clone())
            .unwrap()
    };
    assert_eq!(availability(open.id), "open");
    assert_eq!(availability(full.id), "full");
}

#[tokio::test]
async fn summary_and_detail_endpoints() {
    let now = test_clock().now();
    let offering = OfferingBuilder::tryout(now).capacity(4).current(1).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

    let (status, summary) = send(app(&store), get("/api/offerings/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_offerings"], 1);
    assert_eq!(summary["open_offerings"], 1);
    assert_eq!(summary["total_participants"], 1);

    let (status, detail) = send(app(&store), get(&format!("/api/offerings/{}", offering.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["remaining_places"], 3);
    assert_eq!(detail["kind"], "tryout");
}

#[tokio::test]
async fn registrations_endpoint_lists_committed_registrations() {
    let now = test_clock().now();
    let offering = OfferingBuilder::seminar(now).build();
    let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
    let uri = format!("/api/offerings/{}/registrations", offering.id);

    send(app(&store), post_json(&uri, &form("satu@example.com"))).await;
    let (status, body) = send(app(&store), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn all_registrations_endpoint_joins_offering_titles() {
    let now = test_clock().now();
    let seminar = OfferingBuilder::seminar(now).title("Seminar Karier").build();
    let tryout = OfferingBuilder::tryout(now).title("Tryout Akbar").build();
    let store = InMemoryOfferingStore::with_offerings([seminar.clone(), tryout.clone()]);
    for (offering, email) in [(&seminar, "umi@example.com"), (&tryout, "vino@example.com")] {
        let uri = format!("/api/offerings/{}/registrations", offering.id);
        let (status, _) = send(app(&store), post_json(&uri, &form(email))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(app(&store), get("/api/registrations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(app(&store), get("/api/registrations?kind=tryout")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["offering_title"], "Tryout Akbar");
    assert_eq!(listed[0]["offering_kind"], "tryout");
    assert_eq!(listed[0]["registrant"]["email"], "vino@example.com");

    let (status, body) = send(app(&store), get("/api/registrations?kind=webinar")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn health_ready_and_request_id() {
    let store = InMemoryOfferingStore::new();

    let response = app(&store).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let (status, body) = send(app(&store), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
