//! Browser-facing routes, driven through the router with `oneshot`.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use common::{summary, TestApp};
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn get(app: &TestApp, uri: &str) -> Response {
    app.router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &TestApp, uri: &str, form: &str) -> Response {
    app.router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;

    let response = get(&app, "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn first_view_loads_list_once() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.api)
        .await;

    let first = get(&app, "/").await;
    assert_eq!(first.status(), StatusCode::OK);
    let html = body_text(first).await;
    assert!(html.contains("No invoices found yet."));
    assert!(!html.contains("<table"));

    let second = get(&app, "/").await;
    assert_eq!(second.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_lists_rows_after_refresh() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            summary("inv-1", "DRAFT", 10.0),
            summary("inv-2", "FINAL", 20.0)
        ])))
        .mount(&app.api)
        .await;

    let response = post_form(&app, "/invoices/refresh", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = body_text(get(&app, "/").await).await;
    assert_eq!(html.matches("data-invoice-id=").count(), 2);
}

#[tokio::test]
async fn list_error_is_shown_inline() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.api)
        .await;

    let response = get(&app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Error loading invoices"));
    assert!(html.contains("Request failed with status 500"));
    assert!(!html.contains("No invoices found yet."));
}

#[tokio::test]
async fn generate_posts_payload_and_redirects() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/v1/invoices/generate"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::invoice("inv-9", 0.0)),
        )
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.api)
        .await;

    let response = post_form(
        &app,
        "/invoices/generate",
        "order_xml=%3COrder%2F%3E&customer_id=CUST-1&due_date=2026-11-19\
         &total_amount=abc&currency=AUD&contract_ref=CTR-1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let body = app.body_of("/v1/invoices/generate").await;
    assert_eq!(body["orderDocument"], "<Order/>");
    assert_eq!(body["userData"]["customerId"], "CUST-1");
    assert_eq!(body["userData"]["totalAmount"].as_f64(), Some(0.0));

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("Invoice inv-9 generated with total 0"));
}

#[tokio::test]
async fn confirm_page_offers_yes_and_no() {
    let app = TestApp::spawn().await;

    let response = get(&app, "/invoices/inv-1/delete").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Delete invoice inv-1? This cannot be undone."));
    assert!(html.contains("value=\"yes\""));
    assert!(html.contains("value=\"no\""));
    assert!(app.calls().await.is_empty());
}

#[tokio::test]
async fn declining_delete_sends_nothing_upstream() {
    let app = TestApp::spawn().await;

    let response = post_form(&app, "/invoices/inv-1/delete", "confirm=no").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.calls().await.is_empty());
}

#[tokio::test]
async fn confirmed_delete_reloads_list() {
    let app = TestApp::spawn().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/invoices/inv-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.api)
        .await;

    let response = post_form(&app, "/invoices/inv-1/delete", "confirm=yes").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        app.calls().await,
        vec![
            ("DELETE".to_string(), "/v1/invoices/inv-1".to_string()),
            ("GET".to_string(), "/v1/invoices".to_string()),
        ]
    );
}

#[tokio::test]
async fn raise_credit_redirects_to_credit_panel() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/v1/credits"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::credit("cr-5", "inv-1", 12.5)),
        )
        .mount(&app.api)
        .await;

    let response = post_form(&app, "/credits", "invoice_id=inv-1&amount=12.5").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/#credits");
    assert_eq!(app.count("GET", "/v1/invoices").await, 0);
    assert_eq!(
        app.dashboard().snapshot().await.last_credit.map(|c| c.credit_id),
        Some("cr-5".to_string())
    );
}

#[tokio::test]
async fn export_returns_xml_attachment() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices/inv-1/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<Invoice/>"))
        .mount(&app.api)
        .await;

    let response = get(&app, "/invoices/inv-1/export").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"invoice-inv-1.xml\""
    );
    assert_eq!(body_text(response).await, "<Invoice/>");
}

#[tokio::test]
async fn export_of_missing_invoice_is_not_found() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices/nope/export"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NOT_FOUND",
            "message": "Invoice not found"
        })))
        .mount(&app.api)
        .await;

    let response = get(&app, "/invoices/nope/export").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_page_shows_upstream_error_inline() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NOT_FOUND",
            "message": "Invoice not found"
        })))
        .mount(&app.api)
        .await;

    let response = get(&app, "/invoices/nope").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invoice not found"));
}

#[tokio::test]
async fn request_id_is_forwarded_to_invoice_api() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .and(header_eq("x-request-id", "req-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    app.api.verify().await;
}

#[tokio::test]
async fn stylesheet_is_served() {
    let app = TestApp::spawn().await;

    let response = get(&app, "/static/dashboard.css").await;

    assert_eq!(response.status(), StatusCode::OK);
}
