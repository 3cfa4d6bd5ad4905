use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use shared_database::AppState;

use crate::handlers;

/// Notification endpoints shared by the patient and doctor surfaces.
pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/notifications/{id}",
            get(handlers::list_notifications).delete(handlers::delete_notification),
        )
        .route("/notifications/{id}/read", put(handlers::mark_notification_read))
        .route("/notifications/user/{id}/read-all", put(handlers::mark_all_notifications_read))
        .with_state(state)
}
