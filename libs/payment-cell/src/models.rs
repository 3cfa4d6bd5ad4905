use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_database::{Collection, Record};
use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

/// A ledger entry. The payee (the doctor) owns the entry; the payer is the
/// patient it was collected from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub payee_id: String,
    pub payer_id: String,
    pub amount: f64,
    pub paid_at: NaiveDateTime,
    #[serde(default)]
    pub mode: PaymentMode,
    #[serde(default)]
    pub status: PaymentStatus,
    /// Service billed, e.g. "Consultation" or "Follow-up".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Payment {
    const COLLECTION: Collection = Collection::Payments;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub payee_id: String,
    pub payer_id: String,
    pub amount: f64,
    /// Defaults to now when absent.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub mode: Option<PaymentMode>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(rename = "type", default)]
    pub service: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payer not found")]
    PayerNotFound,

    #[error("Payee not found")]
    PayeeNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] anyhow::Error),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::PayerNotFound | PaymentError::PayeeNotFound => {
                AppError::NotFound(err.to_string())
            }
            PaymentError::ValidationError(msg) => AppError::ValidationError(msg),
            PaymentError::DatabaseError(e) => AppError::Database(e.to_string()),
        }
    }
}
