use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rail_api::{app, AppState};
use rail_core::{LedgerPolicy, SeatId, SectionLayout};
use rail_shared::ReservationEvent;
use rail_store::{app_config::PacingConfig, EventProducer, ReservationStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state(sections: &[&str], seats: u32) -> AppState {
    let layout = SectionLayout::new(sections.iter().map(|s| s.to_string()).collect(), seats).unwrap();
    AppState::new(
        ReservationStore::new(layout, LedgerPolicy::default()),
        EventProducer::new(16),
        PacingConfig::default(),
    )
}

fn purchase_body(email: &str) -> Value {
    json!({
        "from": "London",
        "to": "France",
        "user_first_name": "John",
        "user_last_name": "Doe",
        "user_email": email,
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_purchase_and_view_receipt() {
    let app = app(test_state(&["A", "B"], 10));

    let (status, receipt) = send(&app, "POST", "/v1/tickets", Some(purchase_body("john.doe@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["from"], "London");
    assert_eq!(receipt["to"], "France");
    assert_eq!(receipt["user_first_name"], "John");
    assert_eq!(receipt["user_email"], "john.doe@example.com");
    assert_eq!(receipt["seat_section"], "A");
    assert_eq!(receipt["seat_number"], 1);
    assert!(receipt["price_paid"].as_f64().unwrap() > 0.0);

    let (status, viewed) = send(&app, "GET", "/v1/tickets/john.doe@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(viewed, receipt);
}

#[tokio::test]
async fn test_duplicate_and_invalid_purchases() {
    let app = app(test_state(&["A", "B"], 10));

    send(&app, "POST", "/v1/tickets", Some(purchase_body("john.doe@example.com"))).await;
    let (status, body) = send(&app, "POST", "/v1/tickets", Some(purchase_body("john.doe@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already holds"));

    let (status, _) = send(&app, "POST", "/v1/tickets", Some(purchase_body(""))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, availability) = send(&app, "GET", "/v1/availability", None).await;
    assert_eq!(availability["total_available"], 19);
}

#[tokio::test]
async fn test_sold_out_train() {
    let app = app(test_state(&["A"], 1));

    let (status, _) = send(&app, "POST", "/v1/tickets", Some(purchase_body("first@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/v1/tickets", Some(purchase_body("second@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "All sections are full");
}

#[tokio::test]
async fn test_users_by_section() {
    let app = app(test_state(&["A", "B"], 1));
    send(&app, "POST", "/v1/tickets", Some(purchase_body("a@example.com"))).await;
    send(&app, "POST", "/v1/tickets", Some(purchase_body("b@example.com"))).await;

    let (status, body) = send(&app, "GET", "/v1/sections/B/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "user_seats": [{ "user_email": "b@example.com", "seat_section": "B", "seat_number": 1 }] })
    );

    let (status, body) = send(&app, "GET", "/v1/sections/C/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_seats"], json!([]));
}

#[tokio::test]
async fn test_modify_seat() {
    let state = test_state(&["A", "B"], 10);
    let app = app(state.clone());
    send(&app, "POST", "/v1/tickets", Some(purchase_body("x@example.com"))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/v1/tickets/x@example.com/seat",
        Some(json!({ "new_section": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "seat_section": "B", "seat_number": 1 }));
    assert_eq!(state.store.occupancy(&SeatId::new("A", 1)).await, 0);
    assert_eq!(state.store.occupancy(&SeatId::new("B", 1)).await, 1);

    let (_, receipt) = send(&app, "GET", "/v1/tickets/x@example.com", None).await;
    assert_eq!(receipt["seat_section"], "B");

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/tickets/x@example.com/seat",
        Some(json!({ "new_section": "Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_user() {
    let state = test_state(&["A", "B"], 10);
    let app = app(state.clone());
    send(&app, "POST", "/v1/tickets", Some(purchase_body("x@example.com"))).await;

    let (status, body) = send(&app, "DELETE", "/v1/tickets/x@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert!(!state.store.is_seat_occupied(&SeatId::new("A", 1)).await);

    let (status, _) = send(&app, "GET", "/v1/tickets/x@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/v1/tickets/x@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (_, receipt) = send(&app, "POST", "/v1/tickets", Some(purchase_body("y@example.com"))).await;
    assert_eq!(receipt["seat_section"], "A");
    assert_eq!(receipt["seat_number"], 1);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = app(test_state(&["A", "B"], 10));

    let (status, _) = send(&app, "GET", "/v1/tickets/ghost@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/tickets/ghost@example.com/seat",
        Some(json!({ "new_section": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mutations_publish_events() {
    let state = test_state(&["A", "B"], 10);
    let mut rx = state.events.subscribe();
    let app = app(state);

    send(&app, "POST", "/v1/tickets", Some(purchase_body("x@example.com"))).await;
    send(&app, "PUT", "/v1/tickets/x@example.com/seat", Some(json!({ "new_section": "B" }))).await;
    send(&app, "DELETE", "/v1/tickets/x@example.com", None).await;

    let mut events = Vec::new();
    for _ in 0..3 {
        events.push(rx.recv().await.unwrap());
    }
    let kinds: Vec<&str> = events.iter().map(ReservationEvent::kind).collect();
    assert_eq!(kinds, vec!["ticket_purchased", "seat_changed", "ticket_cancelled"]);

    match &events[1] {
        ReservationEvent::SeatChanged { email, from_section, to_section, .. } => {
            assert_eq!(email, "x@example.com");
            assert_eq!(from_section, "A");
            assert_eq!(to_section, "B");
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Failed mutations publish nothing
    send(&app, "DELETE", "/v1/tickets/x@example.com", None).await;
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn test_health() {
    let app = app(test_state(&["A"], 1));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pacing_delays_api_requests() {
    let layout = SectionLayout::new(vec!["A".to_string()], 1).unwrap();
    let state = AppState::new(
        ReservationStore::new(layout, LedgerPolicy::default()),
        EventProducer::new(4),
        PacingConfig { delay_ms: 50 },
    );
    let app = app(state);

    let started = tokio::time::Instant::now();
    let (status, _) = send(&app, "GET", "/v1/availability", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
}
