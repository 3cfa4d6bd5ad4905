use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, Query, Repository};
use shared_models::user::User;
use shared_utils::display::today_label;

use crate::models::{CreatePrescriptionRequest, HealthProfileError, Prescription, PrescriptionStatus};

pub struct PrescriptionService {
    prescriptions: Repository<Prescription>,
    users: Repository<User>,
}

impl PrescriptionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            prescriptions: Repository::new(state.store.clone()),
            users: Repository::new(state.store.clone()),
        }
    }

    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Prescription>, HealthProfileError> {
        debug!("Fetching prescriptions for patient {}", patient_id);

        let query = Query::new().eq("patientId", patient_id).newest_first();
        Ok(self.prescriptions.find(&query).await?)
    }

    /// Issues a prescription dated today. Medicines keep the order given.
    pub async fn create(&self, request: CreatePrescriptionRequest) -> Result<Prescription, HealthProfileError> {
        if request.medicines.iter().any(|m| m.name.trim().is_empty()) {
            return Err(HealthProfileError::ValidationError("Every medicine needs a name".to_string()));
        }

        let parties = self.users
            .get_many([request.patient_id.as_str(), request.doctor_id.as_str()])
            .await?;
        if !parties.get(&request.patient_id).map(User::is_patient).unwrap_or(false) {
            return Err(HealthProfileError::PatientNotFound);
        }
        if !parties.get(&request.doctor_id).map(User::is_doctor).unwrap_or(false) {
            return Err(HealthProfileError::DoctorNotFound);
        }

        let prescription = Prescription {
            id: Uuid::new_v4().to_string(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: today_label(),
            diagnosis: request.diagnosis,
            status: PrescriptionStatus::Active,
            medicines: request.medicines,
            notes: request.notes,
            created_at: Utc::now(),
        };

        let stored = self.prescriptions.insert(&prescription).await?;
        info!(
            "Doctor {} prescribed {} medicine(s) to patient {}",
            stored.doctor_id,
            stored.medicines.len(),
            stored.patient_id
        );
        Ok(stored)
    }
}
