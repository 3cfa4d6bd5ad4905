use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use notification_cell::router::notification_routes;
use shared_database::AppState;

use crate::handlers;

/// Routes of the doctor app, mounted under `/api/doctor`.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dashboard/{id}", get(handlers::get_dashboard))
        .route("/appointments", post(handlers::create_appointment))
        .route("/appointments/{id}", get(handlers::list_appointments))
        .route("/patients/{id}", get(handlers::list_patients))
        .route("/payments", post(handlers::record_payment))
        .route("/payments/{id}", get(handlers::list_payments))
        .route("/profile/{id}", get(handlers::get_profile).put(handlers::update_profile))
        .route("/patient/{id}/history", get(handlers::get_patient_history))
        .route("/prescription", post(handlers::create_prescription))
        .with_state(state.clone())
        .merge(notification_routes(state))
}
