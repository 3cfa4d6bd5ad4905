use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, Query, Repository};
use shared_models::user::User;

use crate::models::{AddVitalRequest, HealthProfileError, Vital, VITAL_HISTORY_LIMIT};

const DEFAULT_STATUS: &str = "normal";
const DEFAULT_TREND: &str = "stable";

pub struct VitalService {
    vitals: Repository<Vital>,
    users: Repository<User>,
}

impl VitalService {
    pub fn new(state: &AppState) -> Self {
        Self {
            vitals: Repository::new(state.store.clone()),
            users: Repository::new(state.store.clone()),
        }
    }

    /// A patient's vitals, newest first.
    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Vital>, HealthProfileError> {
        debug!("Fetching vitals for patient {}", patient_id);

        let query = Query::new().eq("patientId", patient_id).newest_first();
        Ok(self.vitals.find(&query).await?)
    }

    pub async fn add(&self, patient_id: &str, request: AddVitalRequest) -> Result<Vital, HealthProfileError> {
        match self.users.get(patient_id).await? {
            Some(user) if user.is_patient() => {}
            _ => return Err(HealthProfileError::PatientNotFound),
        }

        let now = Utc::now();
        let vital = Vital {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            label: request.label,
            value: request.value,
            unit: request.unit,
            status: request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            trend: request.trend.unwrap_or_else(|| DEFAULT_TREND.to_string()),
            history: bounded_history(request.history.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        let stored = self.vitals.insert(&vital).await?;
        info!("Recorded {} for patient {}", stored.label, patient_id);
        Ok(stored)
    }
}

/// Keeps the most recent `VITAL_HISTORY_LIMIT` readings, oldest first.
fn bounded_history(mut history: Vec<String>) -> Vec<String> {
    if history.len() > VITAL_HISTORY_LIMIT {
        history.drain(..history.len() - VITAL_HISTORY_LIMIT);
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_drops_oldest_readings() {
        let readings: Vec<String> = (1..=15).map(|n| n.to_string()).collect();
        let kept = bounded_history(readings);

        assert_eq!(kept.len(), VITAL_HISTORY_LIMIT);
        assert_eq!(kept.first().map(String::as_str), Some("4"));
        assert_eq!(kept.last().map(String::as_str), Some("15"));
    }

    #[test]
    fn short_history_is_untouched() {
        let kept = bounded_history(vec!["72".to_string(), "75".to_string()]);
        assert_eq!(kept, vec!["72", "75"]);
    }
}
