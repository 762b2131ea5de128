//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use futures_util::StreamExt as _;
use mockall::predicate::function;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::{AppState, router};
use crate::checkout::{
    CheckoutService, CheckoutSession, CheckoutSessionRequest, MockPaymentGateway, PaymentError,
};
use crate::realtime::ChangeFeed;
use crate::store::StoreError;
use crate::store::test_support::StaticRecordStore;

const FALLBACK_ORIGIN: &str = "https://beam.example";
const BODY_LIMIT: usize = 1 << 20;

fn state_with(gateway: MockPaymentGateway, store: StaticRecordStore) -> AppState {
    AppState::new(
        Arc::new(store),
        CheckoutService::new(Arc::new(gateway)),
        FALLBACK_ORIGIN,
    )
}

fn idle_gateway() -> MockPaymentGateway {
    let mut gateway = MockPaymentGateway::new();
    gateway.expect_create_session().times(0);
    gateway
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .body(Body::empty())
        .expect("request should build")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[rstest]
#[tokio::test]
async fn health_reports_ok() {
    let app = router(state_with(idle_gateway(), StaticRecordStore::default()));

    let response = app.oneshot(get("/health")).await.expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

#[rstest]
#[tokio::test]
async fn checkout_returns_session_id() {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_create_session()
        .with(function(|request: &CheckoutSessionRequest| {
            request.amount_cents == 2550
                && request.product_name == "BEAM Science Donation - stipend"
                && request
                    .success_url
                    .starts_with("https://donate.example/donate?success=true")
        }))
        .times(1)
        .returning(|_| {
            Ok(CheckoutSession {
                id: "cs_test_1".to_owned(),
                url: None,
            })
        });
    let app = router(state_with(gateway, StaticRecordStore::default()));
    let mut request = post_json(
        "/api/create-checkout-session",
        &json!({"amount": 25.5, "donationType": "stipend", "donorName": "Ada"}),
    );
    request.headers_mut().insert(
        header::ORIGIN,
        "https://donate.example".parse().expect("valid header"),
    );

    let response = app.oneshot(request).await.expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"sessionId": "cs_test_1"}));
}

#[rstest]
#[tokio::test]
async fn checkout_without_origin_redirects_to_public_origin() {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_create_session()
        .with(function(|request: &CheckoutSessionRequest| {
            request.cancel_url == "https://beam.example/donate?canceled=true"
        }))
        .times(1)
        .returning(|_| {
            Ok(CheckoutSession {
                id: "cs_test_2".to_owned(),
                url: None,
            })
        });
    let app = router(state_with(gateway, StaticRecordStore::default()));

    let response = app
        .oneshot(post_json(
            "/api/create-checkout-session",
            &json!({"amount": 10}),
        ))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(json!({"amount": 0}))]
#[case(json!({"amount": -5}))]
#[case(json!({"donationType": "general"}))]
#[tokio::test]
async fn invalid_amount_is_rejected_without_payment_call(#[case] body: Value) {
    let app = router(state_with(idle_gateway(), StaticRecordStore::default()));

    let response = app
        .oneshot(post_json("/api/create-checkout-session", &body))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "Invalid amount"}));
}

#[rstest]
#[tokio::test]
async fn malformed_checkout_body_is_a_bad_request() {
    let app = router(state_with(idle_gateway(), StaticRecordStore::default()));
    let request = Request::post("/api/create-checkout-session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request should build");

    let response = app.oneshot(request).await.expect("infallible");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn payment_failure_is_a_generic_internal_error() {
    let mut gateway = MockPaymentGateway::new();
    gateway.expect_create_session().times(1).returning(|_| {
        Err(PaymentError::Api {
            status: 402,
            message: "Your card was declined.".to_owned(),
        })
    });
    let app = router(state_with(gateway, StaticRecordStore::default()));

    let response = app
        .oneshot(post_json(
            "/api/create-checkout-session",
            &json!({"amount": 50}),
        ))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Internal server error"})
    );
}

#[rstest]
#[tokio::test]
async fn donation_items_lists_presets() {
    let app = router(state_with(idle_gateway(), StaticRecordStore::default()));

    let response = app
        .oneshot(get("/api/donation-items"))
        .await
        .expect("infallible");

    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, ["equipment", "stipend", "lab_funding", "general"]);
}

#[rstest]
#[tokio::test]
async fn listing_applies_query_filters() {
    let store = StaticRecordStore::with_rows(vec![json!({
        "id": "c-1",
        "title": "Intro to Circuits",
        "status": "active",
        "max_participants": 10,
        "current_participants": 4
    })]);
    let app = router(state_with(idle_gateway(), store));

    let response = app
        .oneshot(get("/api/listings/classes?status=active&city=Boston&colour=red"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.get("state"), Some(&json!("ready")));
    assert_eq!(body.get("empty"), Some(&json!(false)));
    assert_eq!(
        body.pointer("/cards/0/title"),
        Some(&json!("Intro to Circuits"))
    );
}

#[rstest]
#[tokio::test]
async fn listing_query_reaches_the_store() {
    let store = Arc::new(StaticRecordStore::default());
    let state = AppState::new(
        store.clone(),
        CheckoutService::new(Arc::new(idle_gateway())),
        FALLBACK_ORIGIN,
    );

    let response = router(state)
        .oneshot(get("/api/listings/hubs?type=lab&city=Boston"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    let queries = store.queries();
    let query = queries.first().expect("one query");
    assert_eq!(query.table, "science_hubs");
    let predicates: Vec<(&str, &str)> = query
        .filters
        .iter()
        .map(|filter| (filter.field.as_str(), filter.value.as_str()))
        .collect();
    assert_eq!(predicates, [("city", "Boston"), ("type", "lab")]);
}

#[rstest]
#[tokio::test]
async fn failed_listing_fetch_is_a_bad_gateway() {
    let store = StaticRecordStore::failing(StoreError::Network {
        message: "connection refused".to_owned(),
    });
    let app = router(state_with(idle_gateway(), store));

    let response = app
        .oneshot(get("/api/listings/projects"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body.get("state"), Some(&json!("error")));
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .expect("error message");
    assert!(!message.contains("connection refused"));
}

#[rstest]
#[case("/api/listings/donors")]
#[case("/api/listings/donors/stream")]
#[tokio::test]
async fn unknown_listing_is_not_found(#[case] uri: &str) {
    let app = router(state_with(idle_gateway(), StaticRecordStore::default()));

    let response = app.oneshot(get(uri)).await.expect("infallible");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn webhook_publishes_to_subscribers() {
    let state = state_with(idle_gateway(), StaticRecordStore::default());
    let changes = Arc::clone(state.changes());
    let mut subscription = changes.subscribe("research_projects");
    tokio::task::yield_now().await;

    let response = router(state)
        .oneshot(post_json(
            "/api/changes",
            &json!({"type": "UPDATE", "table": "research_projects", "record": {"id": "p-1"}}),
        ))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let event = tokio::time::timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("event should arrive")
        .expect("feed should be open");
    assert_eq!(event.table, "research_projects");
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some("wrong"), StatusCode::UNAUTHORIZED)]
#[case(Some("s3cret"), StatusCode::ACCEPTED)]
#[tokio::test]
async fn webhook_secret_is_enforced(#[case] presented: Option<&str>, #[case] expected: StatusCode) {
    let state = state_with(idle_gateway(), StaticRecordStore::default())
        .with_webhook_secret(Some("s3cret".to_owned()));
    let mut request = post_json(
        "/api/changes",
        &json!({"type": "INSERT", "table": "science_hubs"}),
    );
    if let Some(secret) = presented {
        request
            .headers_mut()
            .insert("x-webhook-secret", secret.parse().expect("valid header"));
    }

    let response = router(state).oneshot(request).await.expect("infallible");

    assert_eq!(response.status(), expected);
}

#[rstest]
#[case(None, false)]
#[case(Some(""), false)]
#[case(Some("s3cret"), true)]
fn blank_webhook_secret_leaves_changes_open(
    #[case] secret: Option<&str>,
    #[case] expected: bool,
) {
    let state = state_with(idle_gateway(), StaticRecordStore::default())
        .with_webhook_secret(secret.map(str::to_owned));

    assert_eq!(state.requires_webhook_secret(), expected);
}

#[rstest]
#[tokio::test]
async fn unsecured_webhook_accepts_anonymous_notifications() {
    let state = state_with(idle_gateway(), StaticRecordStore::default());
    let request = post_json(
        "/api/changes",
        &json!({"type": "UPDATE", "table": "science_hubs"}),
    );

    let response = router(state).oneshot(request).await.expect("infallible");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[rstest]
#[tokio::test]
async fn stream_sends_snapshots_and_releases_subscription_on_disconnect() {
    let state = state_with(idle_gateway(), StaticRecordStore::default());
    let changes = Arc::clone(state.changes());

    let response = router(state)
        .oneshot(get("/api/listings/projects/stream"))
        .await
        .expect("infallible");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/event-stream")
    );

    let mut frames = response.into_body().into_data_stream();
    let first = tokio::time::timeout(Duration::from_secs(1), frames.next())
        .await
        .expect("first event should arrive")
        .expect("stream should be open")
        .expect("frame should be readable");
    let text = String::from_utf8(first.to_vec()).expect("utf-8 frame");
    assert!(text.contains("event: snapshot"), "unexpected frame: {text}");
    assert!(text.contains("\"listing\":\"projects\""));
    assert_eq!(changes.active_subscriptions(), 1);

    drop(frames);
    for _ in 0..50 {
        if changes.active_subscriptions() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(changes.active_subscriptions(), 0);
}
