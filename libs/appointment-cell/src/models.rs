// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_database::{Collection, Record};
use shared_models::error::AppError;
use shared_utils::display::{date_label, time_label, LabelError};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    /// Clinic-local wall-clock start. Display labels are derived from it.
    pub scheduled_at: NaiveDateTime,
    /// Free-text visit type, e.g. "Regular Checkup" or "Fever".
    #[serde(rename = "type")]
    pub visit_type: String,
    #[serde(default)]
    pub mode: AppointmentMode,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn date_label(&self) -> String {
        date_label(self.scheduled_at.date())
    }

    pub fn time_label(&self) -> String {
        time_label(self.scheduled_at.time())
    }
}

impl Record for Appointment {
    const COLLECTION: Collection = Collection::Appointments;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Upcoming,
    Today,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Today => "today",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentMode {
    #[default]
    #[serde(rename = "in-person")]
    InPerson,
    #[serde(rename = "online")]
    Online,
}

impl AppointmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentMode::InPerson => "in-person",
            AppointmentMode::Online => "online",
        }
    }

    /// Maps a registration label such as "Video Call" or "Clinic Visit".
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("video") {
            AppointmentMode::Online
        } else {
            AppointmentMode::InPerson
        }
    }
}

impl fmt::Display for AppointmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing filters accepted by `?type=` on the doctor appointments endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentFilter {
    #[default]
    All,
    Today,
    Upcoming,
    Online,
    Past,
}

impl AppointmentFilter {
    /// Unknown or missing values list everything.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("today") => AppointmentFilter::Today,
            Some("upcoming") => AppointmentFilter::Upcoming,
            Some("online") => AppointmentFilter::Online,
            Some("past") => AppointmentFilter::Past,
            _ => AppointmentFilter::All,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    #[serde(default)]
    pub mode: Option<AppointmentMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    #[serde(default)]
    pub mode: Option<AppointmentMode>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A stored appointment with its display labels.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub date: String,
    pub time: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            date: appointment.date_label(),
            time: appointment.time_label(),
            appointment,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(#[from] LabelError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::PatientNotFound
            | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidSchedule(_) | AppointmentError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::DatabaseError(e) => AppError::Database(e.to_string()),
        }
    }
}
