//! Request-level tests for the account service
//!
//! Drives the full actix app in-process: routing, extractors, error mapping
//! and the ledger underneath.

use account_service::handlers;
use actix_web::{http::StatusCode, test, web, App};
use futures_util::future::join_all;
use ledger_core::{Config, Ledger};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_ledger() -> Arc<Ledger> {
    let mut config = Config::default();
    config.retry.delay_ms = 10;
    Arc::new(Ledger::in_memory(config).unwrap())
}

macro_rules! init_app {
    ($ledger:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ledger.clone()))
                .configure(handlers::configure_routes),
        )
        .await
    };
}

macro_rules! create_account {
    ($app:expr, $balance:expr) => {{
        let req = test::TestRequest::post()
            .uri("/accounts")
            .set_json(json!({ "balance": $balance }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["id"].as_u64().unwrap()
    }};
}

macro_rules! balance_of {
    ($app:expr, $id:expr) => {{
        let req = test::TestRequest::get()
            .uri(&format!("/accounts/{}", $id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["account"]["balance"].as_f64().unwrap()
    }};
}

// ===== Common operations =====

#[actix_web::test]
async fn test_create_account() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);

    let req = test::TestRequest::post()
        .uri("/accounts")
        .set_json(json!({ "balance": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("id").is_some());
    assert_eq!(body["balance"].as_f64(), Some(100.0));
}

#[actix_web::test]
async fn test_get_account_details() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["account"]["id"].as_u64(), Some(id));
    assert_eq!(body["account"]["balance"].as_f64(), Some(100.0));
    assert_eq!(body["message"], "You have 100 in your account.");
}

#[actix_web::test]
async fn test_deposit() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let req = test::TestRequest::post()
        .uri(&format!("/accounts/{}/deposit", id))
        .set_json(json!({ "amount": 50 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["balance"].as_f64(), Some(150.0));
}

#[actix_web::test]
async fn test_withdraw() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let req = test::TestRequest::post()
        .uri(&format!("/accounts/{}/withdraw", id))
        .set_json(json!({ "amount": 30 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["balance"].as_f64(), Some(70.0));
}

#[actix_web::test]
async fn test_transfer() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let from = create_account!(app, 100);
    let to = create_account!(app, 50);

    let req = test::TestRequest::post()
        .uri("/accounts/transfer")
        .set_json(json!({ "fromId": from, "toId": to, "amount": 20 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Transfer successful");
    assert_eq!(balance_of!(app, from), 80.0);
    assert_eq!(balance_of!(app, to), 70.0);
}

// ===== Concurrent requests =====

#[actix_web::test]
async fn test_concurrent_deposits() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let deposits = (0..10).map(|_| {
        let req = test::TestRequest::post()
            .uri(&format!("/accounts/{}/deposit", id))
            .set_json(json!({ "amount": 10 }))
            .to_request();
        test::call_service(&app, req)
    });
    for resp in join_all(deposits).await {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(balance_of!(app, id), 200.0);
}

#[actix_web::test]
async fn test_concurrent_withdrawals() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let withdrawals = (0..10).map(|_| {
        let req = test::TestRequest::post()
            .uri(&format!("/accounts/{}/withdraw", id))
            .set_json(json!({ "amount": 10 }))
            .to_request();
        test::call_service(&app, req)
    });
    for resp in join_all(withdrawals).await {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(balance_of!(app, id), 0.0);
}

#[actix_web::test]
async fn test_concurrent_transfers() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let from = create_account!(app, 100);
    let to = create_account!(app, 50);

    let transfers = (0..10).map(|_| {
        let req = test::TestRequest::post()
            .uri("/accounts/transfer")
            .set_json(json!({ "fromId": from, "toId": to, "amount": 10 }))
            .to_request();
        test::call_service(&app, req)
    });
    for resp in join_all(transfers).await {
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(balance_of!(app, from), 0.0);
    assert_eq!(balance_of!(app, to), 150.0);
}

// ===== Failure scenarios =====

#[actix_web::test]
async fn test_withdraw_more_than_available() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 100);

    let req = test::TestRequest::post()
        .uri(&format!("/accounts/{}/withdraw", id))
        .set_json(json!({ "amount": 200 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INSUFFICIENT_BALANCE");
    assert_eq!(body["message"], "Insufficient balance");
    assert_eq!(balance_of!(app, id), 100.0);
}

#[actix_web::test]
async fn test_transfer_more_than_available() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let from = create_account!(app, 100);
    let to = create_account!(app, 50);

    let req = test::TestRequest::post()
        .uri("/accounts/transfer")
        .set_json(json!({ "fromId": from, "toId": to, "amount": 200 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient balance");
}

#[actix_web::test]
async fn test_missing_account_operations() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);

    for uri in ["/accounts/999/deposit", "/accounts/999/withdraw"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({ "amount": 50 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Account not found");
    }

    let req = test::TestRequest::get().uri("/accounts/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ledger.store().is_empty());
}

#[actix_web::test]
async fn test_transfer_with_missing_endpoint() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 50);

    for (from, to) in [(999, id), (id, 999)] {
        let req = test::TestRequest::post()
            .uri("/accounts/transfer")
            .set_json(json!({ "fromId": from, "toId": to, "amount": 50 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "One or both accounts not found");
    }
    assert_eq!(balance_of!(app, id), 50.0);
}

#[actix_web::test]
async fn test_deposit_past_decimal_range() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, "79228162514264337593543950335");

    let req = test::TestRequest::post()
        .uri(&format!("/accounts/{}/deposit", id))
        .set_json(json!({ "amount": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Amount out of range");

    // The worker survived and the balance is untouched
    let account = ledger.get_account(ledger_core::AccountId::new(id)).await.unwrap();
    assert_eq!(account.balance, rust_decimal::Decimal::MAX);
}

#[actix_web::test]
async fn test_transfer_to_same_account() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    let id = create_account!(app, 50);

    let req = test::TestRequest::post()
        .uri("/accounts/transfer")
        .set_json(json!({ "fromId": id, "toId": id, "amount": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Cannot transfer to the same account");
}

#[actix_web::test]
async fn test_invalid_create_requests() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);

    for body in [json!({ "balance": -5 }), json!({ "balance": "abc" }), json!({})] {
        let req = test::TestRequest::post()
            .uri("/accounts")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
    assert!(ledger.store().is_empty());
}

#[actix_web::test]
async fn test_non_numeric_id_is_not_found() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);

    let req = test::TestRequest::get().uri("/accounts/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Account not found");
}

// ===== Operational endpoints =====

#[actix_web::test]
async fn test_health_and_metrics() {
    let ledger = create_test_ledger();
    let app = init_app!(ledger);
    create_account!(app, 10);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["accounts"], 1);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let text = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(text.contains("ledger_operations_total"));
    assert!(text.contains("operation=\"create\""));
}
