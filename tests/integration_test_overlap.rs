mod common;

use axum::{body::Body, http::{header, Request, StatusCode}};
use common::{booking_payload, parse_body, AuthHeaders, TestApp};
use tower::ServiceExt;

async fn submit_ok(app: &TestApp, email: &str, from: &str, to: &str) -> String {
    let res = app.submit(booking_payload(email, from, to)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn confirm(app: &TestApp, auth: &AuthHeaders, id: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("PATCH")
            .uri(format!("/api/booking/{}/confirm", id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty())
            .unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_pending_requests_do_not_block_dates() {
    let app = TestApp::new().await;

    submit_ok(&app, "a@x.com", "2025-05-10", "2025-05-12").await;
    // Same dates, different identity: still accepted while nothing is confirmed.
    submit_ok(&app, "b@x.com", "2025-05-10", "2025-05-12").await;
}

#[tokio::test]
async fn test_confirmed_booking_blocks_overlapping_submission() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let id = submit_ok(&app, "a@x.com", "2025-05-10", "2025-05-12").await;
    assert_eq!(confirm(&app, &auth, &id).await.status(), StatusCode::OK);

    let res = app.submit(booking_payload("b@x.com", "2025-05-11", "2025-05-14")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["message"], "These dates are already booked. Please choose different dates.");
}

#[tokio::test]
async fn test_overlap_boundaries_are_inclusive() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let id = submit_ok(&app, "a@x.com", "2025-05-10", "2025-05-12").await;
    assert_eq!(confirm(&app, &auth, &id).await.status(), StatusCode::OK);

    // Shares the last confirmed day.
    let touching = app.submit(booking_payload("b@x.com", "2025-05-12", "2025-05-14")).await;
    assert_eq!(touching.status(), StatusCode::CONFLICT);

    // Starts the day after; no shared calendar day.
    let adjacent = app.submit(booking_payload("c@x.com", "2025-05-13", "2025-05-15")).await;
    assert_eq!(adjacent.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_confirming_second_overlapping_request_fails() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let first = submit_ok(&app, "a@x.com", "2025-05-10", "2025-05-12").await;
    let second = submit_ok(&app, "b@x.com", "2025-05-11", "2025-05-13").await;

    assert_eq!(confirm(&app, &auth, &first).await.status(), StatusCode::OK);

    // Confirming the second would create two overlapping confirmed bookings.
    let res = confirm(&app, &auth, &second).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["message"], "These dates were already confirmed for another booking.");

    // The loser stays pending for the admin to reject.
    let listed = app.state.booking_repo.find_by_id(&second).await.unwrap().unwrap();
    assert_eq!(listed.status, "pending");
}

#[tokio::test]
async fn test_concurrent_overlapping_confirms_leave_one_confirmed() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let first = submit_ok(&app, "a@x.com", "2025-05-10", "2025-05-12").await;
    let second = submit_ok(&app, "b@x.com", "2025-05-11", "2025-05-13").await;

    let (res_a, res_b) = tokio::join!(
        confirm(&app, &auth, &first),
        confirm(&app, &auth, &second),
    );

    let ok_count = [res_a.status(), res_b.status()]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(ok_count, 1);

    // Whichever interleaving, exactly one booking may end up confirmed.
    let confirmed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = 'confirmed'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(confirmed, 1);
}
