use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, Query, Repository};
use shared_models::user::User;
use shared_utils::display::{clinic_now, parse_date_label, parse_time_label};

use crate::models::{Payment, PaymentError, RecordPaymentRequest};

pub struct LedgerService {
    payments: Repository<Payment>,
    users: Repository<User>,
}

impl LedgerService {
    pub fn new(state: &AppState) -> Self {
        Self {
            payments: Repository::new(state.store.clone()),
            users: Repository::new(state.store.clone()),
        }
    }

    pub async fn record(&self, request: RecordPaymentRequest) -> Result<Payment, PaymentError> {
        if !request.amount.is_finite() || request.amount < 0.0 {
            return Err(PaymentError::ValidationError(format!(
                "Payment amount must be a non-negative number, got {}",
                request.amount
            )));
        }

        let now = clinic_now();
        let date = match request.date.as_deref() {
            Some(label) => parse_date_label(label)
                .map_err(|e| PaymentError::ValidationError(e.to_string()))?,
            None => now.date(),
        };
        let time = match request.time.as_deref() {
            Some(label) => parse_time_label(label)
                .map_err(|e| PaymentError::ValidationError(e.to_string()))?,
            None => now.time(),
        };

        let parties = self.users.get_many([request.payee_id.as_str(), request.payer_id.as_str()]).await?;
        if !parties.get(&request.payee_id).map(User::is_doctor).unwrap_or(false) {
            return Err(PaymentError::PayeeNotFound);
        }
        if !parties.get(&request.payer_id).map(User::is_patient).unwrap_or(false) {
            return Err(PaymentError::PayerNotFound);
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            payee_id: request.payee_id,
            payer_id: request.payer_id,
            amount: request.amount,
            paid_at: date.and_time(time),
            mode: request.mode.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            service: request.service,
            category: request.category,
            created_at: Utc::now(),
        };

        let stored = self.payments.insert(&payment).await?;
        info!("Recorded payment {} of {} from {} to {}", stored.id, stored.amount, stored.payer_id, stored.payee_id);
        Ok(stored)
    }

    /// Entries owned by a doctor, newest first.
    pub async fn received_by(&self, payee_id: &str) -> Result<Vec<Payment>, PaymentError> {
        debug!("Fetching ledger for payee {}", payee_id);

        let query = Query::new().eq("payeeId", payee_id).newest_first();
        Ok(self.payments.find(&query).await?)
    }

    /// Entries a patient paid, newest first.
    pub async fn paid_by(&self, payer_id: &str) -> Result<Vec<Payment>, PaymentError> {
        debug!("Fetching payments made by {}", payer_id);

        let query = Query::new().eq("payerId", payer_id).newest_first();
        Ok(self.payments.find(&query).await?)
    }
}
