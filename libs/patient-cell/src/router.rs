use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use notification_cell::router::notification_routes;
use shared_database::AppState;

use crate::handlers;

/// Routes of the patient app, mounted under `/api/patient`.
pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dashboard/{id}", get(handlers::get_dashboard))
        .route("/appointments/{id}", get(handlers::list_appointments))
        .route("/book", post(handlers::book_appointment))
        .route("/reschedule/{id}", put(handlers::reschedule_appointment))
        .route("/payments/{id}", get(handlers::list_payments))
        .route("/profile/{id}", get(handlers::get_profile).put(handlers::update_profile))
        .route("/vitals/{id}", get(handlers::list_vitals).post(handlers::add_vital))
        .route("/prescriptions/{id}", get(handlers::list_prescriptions))
        .route("/documents/{id}", get(handlers::list_documents).post(handlers::upload_document))
        .route("/register", post(handlers::register_patient))
        .with_state(state.clone())
        .merge(notification_routes(state))
}
