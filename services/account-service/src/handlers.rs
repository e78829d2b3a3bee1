use crate::errors::{ApiError, ApiResult};
use crate::models::*;
use actix_web::{web, HttpResponse};
use ledger_core::{AccountId, Ledger};
use std::sync::Arc;
use tracing::info;

// ===== Health Check =====
pub async fn health_check(ledger: web::Data<Arc<Ledger>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: ledger.config().service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        accounts: ledger.store().len(),
    })
}

// ===== Prometheus Metrics =====
pub async fn metrics(ledger: web::Data<Arc<Ledger>>) -> ApiResult<HttpResponse> {
    let body = ledger
        .metrics()
        .render()
        .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Create Account =====
pub async fn create_account(
    req: web::Json<CreateAccountRequest>,
    ledger: web::Data<Arc<Ledger>>,
) -> ApiResult<HttpResponse> {
    let account = ledger.create_account(req.balance).await?;
    Ok(HttpResponse::Created().json(account))
}

// ===== Get Account =====
pub async fn get_account(
    path: web::Path<u64>,
    ledger: web::Data<Arc<Ledger>>,
) -> ApiResult<HttpResponse> {
    let account = ledger.get_account(AccountId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

// ===== Deposit =====
pub async fn deposit(
    path: web::Path<u64>,
    req: web::Json<AmountRequest>,
    ledger: web::Data<Arc<Ledger>>,
) -> ApiResult<HttpResponse> {
    let account = ledger
        .deposit(AccountId::new(path.into_inner()), req.amount)
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

// ===== Withdraw =====
pub async fn withdraw(
    path: web::Path<u64>,
    req: web::Json<AmountRequest>,
    ledger: web::Data<Arc<Ledger>>,
) -> ApiResult<HttpResponse> {
    let account = ledger
        .withdraw(AccountId::new(path.into_inner()), req.amount)
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

// ===== Transfer =====
pub async fn transfer(
    req: web::Json<TransferRequest>,
    ledger: web::Data<Arc<Ledger>>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let receipt = ledger
        .transfer(
            AccountId::new(req.from_id),
            AccountId::new(req.to_id),
            req.amount,
        )
        .await?;

    info!(
        from = %receipt.from.id,
        to = %receipt.to.id,
        amount = %receipt.amount,
        "Transfer request served"
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new("Transfer successful")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    // Ids are numeric; anything else cannot name an account
    .app_data(web::PathConfig::default().error_handler(|_err, _req| {
        ApiError::Ledger(ledger_core::Error::account_not_found()).into()
    }))
    .service(
        web::scope("/accounts")
            .route("", web::post().to(create_account))
            .route("/transfer", web::post().to(transfer))
            .route("/{id}", web::get().to(get_account))
            .route("/{id}/deposit", web::post().to(deposit))
            .route("/{id}/withdraw", web::post().to(withdraw)),
    )
    .route("/health", web::get().to(health_check))
    .route("/metrics", web::get().to(metrics));
}
