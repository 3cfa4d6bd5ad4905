use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::Notification;
use crate::services::NotificationService;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let service = NotificationService::new(&state);
    let notifications = service.list_for_recipient(&user_id).await?;

    Ok(Json(notifications))
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    let service = NotificationService::new(&state);
    let notification = service.mark_read(&notification_id).await?;

    Ok(Json(notification))
}

pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationService::new(&state);
    service.delete(&notification_id).await?;

    Ok(Json(json!({ "message": "Notification deleted" })))
}

pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationService::new(&state);
    service.mark_all_read(&user_id).await?;

    Ok(Json(json!({ "message": "All notifications marked as read" })))
}
