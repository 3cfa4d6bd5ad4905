use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, Query, Repository};
use shared_models::user::User;
use shared_utils::display::today_label;

use crate::models::{
    Document, HealthProfileError, UploadDocumentRequest, DEFAULT_DOCUMENT_EXTENSION,
    DEFAULT_DOCUMENT_SIZE, DEFAULT_DOCUMENT_URL,
};

/// Document metadata only; file bytes never pass through here.
pub struct DocumentService {
    documents: Repository<Document>,
    users: Repository<User>,
}

impl DocumentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            documents: Repository::new(state.store.clone()),
            users: Repository::new(state.store.clone()),
        }
    }

    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Document>, HealthProfileError> {
        debug!("Fetching documents for patient {}", patient_id);

        let query = Query::new().eq("patientId", patient_id).newest_first();
        Ok(self.documents.find(&query).await?)
    }

    pub async fn upload(
        &self,
        patient_id: &str,
        request: UploadDocumentRequest,
    ) -> Result<Document, HealthProfileError> {
        if request.name.trim().is_empty() {
            return Err(HealthProfileError::ValidationError("Document name cannot be empty".to_string()));
        }

        let mut ids = vec![patient_id];
        if let Some(doctor_id) = request.doctor_id.as_deref() {
            ids.push(doctor_id);
        }
        let users = self.users.get_many(ids).await?;

        if !users.get(patient_id).map(User::is_patient).unwrap_or(false) {
            return Err(HealthProfileError::PatientNotFound);
        }
        if let Some(doctor_id) = request.doctor_id.as_deref() {
            if !users.get(doctor_id).map(User::is_doctor).unwrap_or(false) {
                return Err(HealthProfileError::DoctorNotFound);
            }
        }

        let document = Document {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            doctor_id: request.doctor_id,
            name: request.name,
            doc_type: request.doc_type,
            size: Some(request.size.unwrap_or_else(|| DEFAULT_DOCUMENT_SIZE.to_string())),
            date: Some(request.date.unwrap_or_else(today_label)),
            file_url: Some(request.file_url.unwrap_or_else(|| DEFAULT_DOCUMENT_URL.to_string())),
            extension: Some(request.extension.unwrap_or_else(|| DEFAULT_DOCUMENT_EXTENSION.to_string())),
            color: None,
            created_at: Utc::now(),
        };

        let stored = self.documents.insert(&document).await?;
        info!("Stored document {} for patient {}", stored.id, patient_id);
        Ok(stored)
    }
}
