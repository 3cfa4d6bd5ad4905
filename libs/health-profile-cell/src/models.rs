use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use appointment_cell::AppointmentError;
use shared_database::{Collection, Record};
use shared_models::error::AppError;

/// Prior readings kept on a vital; older values are dropped first.
pub const VITAL_HISTORY_LIMIT: usize = 12;

pub const DEFAULT_DOCUMENT_SIZE: &str = "1.2 MB";
pub const DEFAULT_DOCUMENT_URL: &str = "https://example.com/mock-file.pdf";
pub const DEFAULT_DOCUMENT_EXTENSION: &str = "PDF";

pub const FEMALE_AVATAR_URL: &str = "https://i.pinimg.com/736x/c4/ee/1e/c4ee1e8a63ad02db5faf5827d4fcc083.jpg";
pub const MALE_AVATAR_URL: &str = "https://i.pinimg.com/1200x/fb/a6/4b/fba64b5c2a843b3f68d5cf04e4e9913b.jpg";

// ==============================================================================
// RECORDS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vital {
    pub id: String,
    pub patient_id: String,
    /// e.g. "Blood Pressure", "Heart Rate"
    pub label: String,
    pub value: String,
    pub unit: String,
    pub status: String,
    pub trend: String,
    #[serde(default)]
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Vital {
    const COLLECTION: Collection = Collection::Vitals;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub patient_id: String,
    /// Issuing doctor, absent for patient uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Document {
    const COLLECTION: Collection = Collection::Documents;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    /// Form, e.g. "Tablet" or "Syrup".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    /// e.g. "1-0-1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub status: PrescriptionStatus,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Prescription {
    const COLLECTION: Collection = Collection::Prescriptions;

    fn id(&self) -> &str {
        &self.id
    }
}

// ==============================================================================
// REQUESTS
// ==============================================================================

/// Fields a patient may change on their profile. Anything else in the body
/// is dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_name: Option<String>,
}

/// Fields a doctor may change on their profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub specialization: Option<String>,
    pub hospital: Option<String>,
    pub experience: Option<String>,
    pub is_available: Option<bool>,
    pub qualification: Option<String>,
    pub consultation_fee: Option<f64>,
    pub registration_number: Option<String>,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatientRequest {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub condition: Option<String>,
    pub image: Option<String>,
    /// Visit mode label, e.g. "Video Call" or "In-Person".
    pub mode: Option<String>,
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVitalRequest {
    pub label: String,
    pub value: String,
    pub unit: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HealthProfileError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] anyhow::Error),
}

impl From<HealthProfileError> for AppError {
    fn from(err: HealthProfileError) -> Self {
        match err {
            HealthProfileError::PatientNotFound | HealthProfileError::DoctorNotFound => {
                AppError::NotFound(err.to_string())
            }
            HealthProfileError::ValidationError(msg) => AppError::ValidationError(msg),
            HealthProfileError::Appointment(e) => e.into(),
            HealthProfileError::DatabaseError(e) => AppError::Database(e.to_string()),
        }
    }
}
