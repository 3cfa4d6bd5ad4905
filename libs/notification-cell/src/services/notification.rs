use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, Query, Repository};

use crate::models::{NewNotification, Notification, NotificationError};

pub struct NotificationService {
    notifications: Repository<Notification>,
}

fn mark_read_patch() -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert("unread".to_string(), json!(false));
    patch
}

impl NotificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            notifications: Repository::new(state.store.clone()),
        }
    }

    pub async fn notify(&self, request: NewNotification) -> Result<Notification, NotificationError> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            kind: request.kind,
            title: request.title,
            message: request.message,
            time: request.time,
            unread: true,
            created_at: Utc::now(),
        };

        let stored = self.notifications.insert(&notification).await?;
        info!("Created {} notification {} for user {}", stored.kind, stored.id, stored.user_id);
        Ok(stored)
    }

    /// All notifications addressed to `user_id`, newest first.
    pub async fn list_for_recipient(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        debug!("Fetching notifications for user: {}", user_id);

        let query = Query::new().eq("userId", user_id).newest_first();
        Ok(self.notifications.find(&query).await?)
    }

    /// Marks one notification read. Already-read notifications succeed unchanged.
    pub async fn mark_read(&self, notification_id: &str) -> Result<Notification, NotificationError> {
        debug!("Marking notification read: {}", notification_id);

        self.notifications
            .update(notification_id, mark_read_patch())
            .await?
            .ok_or(NotificationError::NotFound)
    }

    pub async fn delete(&self, notification_id: &str) -> Result<Notification, NotificationError> {
        let removed = self.notifications
            .delete(notification_id)
            .await?
            .ok_or(NotificationError::NotFound)?;

        info!("Deleted notification {}", notification_id);
        Ok(removed)
    }

    /// Sets `unread = false` on every notification of the recipient, read or not.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, NotificationError> {
        let query = Query::new().eq("userId", user_id);
        let touched = self.notifications.update_many(&query, mark_read_patch()).await?;

        info!("Marked {} notifications read for user {}", touched, user_id);
        Ok(touched)
    }
}
