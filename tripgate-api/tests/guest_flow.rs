use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use tripgate_api::auth::{IdTokenClaims, SessionAuth, TokenVerifier};
use tripgate_api::submit::SubmitClient;
use tripgate_api::{app, AppState};
use tripgate_core::reservation::ReservationRecord;
use tripgate_core::store::RecordStore;
use tripgate_core::{AccessGuard, SessionCache};
use tripgate_store::app_config::SubmissionConfig;
use tripgate_store::MemoryRecordStore;

const SECRET: &str = "test-secret";

fn jane() -> ReservationRecord {
    ReservationRecord {
        customer_id: Some("cust-1".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: Some("+15551234567".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        trip_id: Some("trip-1".to_string()),
        trip_start: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        trip_end: Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap(),
        destination: Some("Cancun".to_string()),
        valid_until: None,
    }
}

fn test_app(store: Arc<dyn RecordStore>) -> (Router, Arc<SessionCache>) {
    let auth = Arc::new(SessionAuth::new());
    let cache = Arc::new(SessionCache::new());
    let guard = Arc::new(AccessGuard::new(auth.clone(), store.clone(), cache.clone()));

    let state = AppState {
        auth,
        cache: cache.clone(),
        guard,
        verifier: TokenVerifier::new(SECRET),
        submit: SubmitClient::new(SubmissionConfig {
            // Nothing listens here; submissions fail fast.
            url: "http://127.0.0.1:9/flight-info".to_string(),
            token: "test-token".to_string(),
            sender: "tripgate-test".to_string(),
        }),
    };

    (app(state), cache)
}

fn seeded_app() -> (Router, Arc<SessionCache>) {
    let store = Arc::new(MemoryRecordStore::new());
    store.insert(jane());
    test_app(store)
}

fn id_token(email: Option<&str>, phone: Option<&str>) -> String {
    let claims = IdTokenClaims {
        sub: "uid-1".to_string(),
        email: email.map(String::from),
        phone_number: phone.map(String::from),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn sign_in(app: &Router, token: &str) -> StatusCode {
    let body = serde_json::json!({ "id_token": token }).to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/session/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing location header")
        .to_str()
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_draft() -> serde_json::Value {
    serde_json::json!({
        "airline": "Delta",
        "flightNumber": "DL 123",
        "arrivalDate": "2026-03-01",
        "arrivalTime": "14:30:00",
        "numOfGuests": 2,
        "comments": "late arrival"
    })
}

#[tokio::test]
async fn test_unauthenticated_guest_is_sent_to_entry() {
    let (app, _cache) = seeded_app();

    let response = get(&app, "/v1/reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entry");
}

#[tokio::test]
async fn test_signed_in_guest_with_reservation_is_allowed() {
    let (app, cache) = seeded_app();

    // Raw email needs normalizing before it matches the record.
    let status = sign_in(&app, &id_token(Some(" Jane@Example.com "), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let response = get(&app, "/v1/reservation").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["email"], "jane@example.com");
    assert_eq!(body["destination"], "Cancun");
    assert!(cache.current_reservation().is_some());
}

#[tokio::test]
async fn test_phone_guest_matches_normalized_phone() {
    let (app, _cache) = seeded_app();

    sign_in(&app, &id_token(None, Some("+1 555-123-4567"))).await;

    let response = get(&app, "/v1/reservation").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_guest_is_signed_out_with_reason() {
    let (app, cache) = seeded_app();

    sign_in(&app, &id_token(Some("stranger@example.com"), None)).await;

    let response = get(&app, "/v1/reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entry?reason=not-authorized");
    assert_eq!(cache.current_reservation(), None);

    // The guard forced a sign-out, so the next attempt is plain
    // unauthenticated.
    let response = get(&app, "/v1/reservation").await;
    assert_eq!(location(&response), "/entry");
}

#[tokio::test]
async fn test_store_outage_redirects_without_signing_out() {
    struct BrokenStore;

    #[async_trait::async_trait]
    impl RecordStore for BrokenStore {
        async fn find_by_field(
            &self,
            _field: tripgate_core::LookupField,
            _value: &str,
        ) -> Result<Vec<ReservationRecord>, tripgate_core::StoreError> {
            Err(tripgate_core::StoreError::Unavailable("down".to_string()))
        }
    }

    let (app, _cache) = test_app(Arc::new(BrokenStore));
    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;

    let response = get(&app, "/v1/reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entry?reason=lookup-error");

    // Still signed in: the retry hits the lookup again rather than falling
    // back to unauthenticated.
    let response = get(&app, "/v1/reservation").await;
    assert_eq!(location(&response), "/entry?reason=lookup-error");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (app, _cache) = seeded_app();
    let status = sign_in(&app, "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_draft_round_trip_and_validation() {
    let (app, _cache) = seeded_app();
    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;

    let response = put_json(&app, "/v1/flight", valid_draft()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, "/v1/flight").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["flightNumber"], "DL 123");

    // Arrival after the trip ends is rejected and leaves the draft alone.
    let mut late = valid_draft();
    late["arrivalDate"] = serde_json::json!("2026-03-20");
    let response = put_json(&app, "/v1/flight", late).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/v1/flight").await;
    let body = json_body(response).await;
    assert_eq!(body["arrivalDate"], "2026-03-01");
}

#[tokio::test]
async fn test_draft_survives_sign_out_and_back_in() {
    let (app, cache) = seeded_app();
    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;

    put_json(&app, "/v1/flight", valid_draft()).await;
    post(&app, "/v1/session/sign-out").await;

    assert_eq!(cache.current_reservation(), None);
    assert!(cache.current_draft().is_some());

    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;
    let response = get(&app, "/v1/flight").await;
    let body = json_body(response).await;
    assert_eq!(body["airline"], "Delta");
}

#[tokio::test]
async fn test_submit_without_draft_is_rejected() {
    let (app, _cache) = seeded_app();
    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;

    let response = post(&app, "/v1/flight/submit").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_submission_keeps_the_draft() {
    let (app, cache) = seeded_app();
    sign_in(&app, &id_token(Some("jane@example.com"), None)).await;
    put_json(&app, "/v1/flight", valid_draft()).await;

    let response = post(&app, "/v1/flight/submit").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(cache.current_draft().is_some());
}

#[tokio::test]
async fn test_entry_view_maps_reason_codes_to_messages() {
    let (app, _cache) = seeded_app();

    let body = json_body(get(&app, "/entry?reason=not-authorized").await).await;
    assert_eq!(
        body["message"],
        "Please sign in with the email or phone number reserved to your trip."
    );

    let body = json_body(get(&app, "/entry?reason=lookup-error").await).await;
    assert_eq!(
        body["message"],
        "We could not check your reservation just now. Please try again."
    );

    let body = json_body(get(&app, "/entry").await).await;
    assert!(body.get("message").is_none());
}
