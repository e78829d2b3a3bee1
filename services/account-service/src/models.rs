use ledger_core::Account;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ===== Requests =====
#[derive(Debug, Deserialize, Clone)]
pub struct CreateAccountRequest {
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_id: u64,
    pub to_id: u64,
    pub amount: Decimal,
}

// ===== Responses =====
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account: Account,
    pub message: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let message = format!("You have {} in your account.", account.balance.normalize());
        Self { account, message }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub accounts: usize,
}
