// libs/appointment-cell/src/services/lifecycle.rs
use std::collections::HashMap;

use chrono::{NaiveDateTime, Timelike, Utc};
use serde_json::{json, Map};
use tracing::{debug, info};
use uuid::Uuid;

use notification_cell::{NewNotification, NotificationKind, NotificationService};
use shared_database::{AppState, Direction, Query, Repository};
use shared_models::user::User;
use shared_utils::display::{clinic_now, parse_schedule};

use crate::models::{
    Appointment, AppointmentError, AppointmentFilter, AppointmentMode, AppointmentStatus,
    BookAppointmentRequest, CreateAppointmentRequest, RescheduleAppointmentRequest,
};

pub const DEFAULT_DURATION: &str = "30 min";

const BOOKING_TITLE: &str = "New Booking";
const BOOKING_MESSAGE: &str = "You have a new appointment request.";
const BOOKING_TIME_LABEL: &str = "Just now";

/// Owns appointment creation and status changes, plus the side effects they
/// trigger. None of the writes here are transactional: a booking whose
/// notification fails to write stays booked.
pub struct AppointmentLifecycleService {
    appointments: Repository<Appointment>,
    users: Repository<User>,
    notifications: NotificationService,
}

struct NewAppointment {
    patient_id: String,
    doctor_id: String,
    scheduled_at: NaiveDateTime,
    visit_type: String,
    mode: AppointmentMode,
    status: AppointmentStatus,
    duration: Option<String>,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            appointments: Repository::new(state.store.clone()),
            users: Repository::new(state.store.clone()),
            notifications: NotificationService::new(state),
        }
    }

    /// Patient-initiated booking. Creates an `upcoming` appointment and tells
    /// the doctor about it.
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, AppointmentError> {
        info!("Booking appointment for patient {} with doctor {}", request.patient_id, request.doctor_id);

        let scheduled_at = parse_schedule(&request.date, &request.time)?;
        self.ensure_participants(&request.patient_id, &request.doctor_id).await?;

        let appointment = self.insert(NewAppointment {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            scheduled_at,
            visit_type: request.visit_type,
            mode: request.mode.unwrap_or_default(),
            status: AppointmentStatus::Upcoming,
            duration: None,
        }).await?;

        self.notifications.notify(NewNotification {
            user_id: appointment.doctor_id.clone(),
            kind: NotificationKind::Appointment,
            title: BOOKING_TITLE.to_string(),
            message: BOOKING_MESSAGE.to_string(),
            time: Some(BOOKING_TIME_LABEL.to_string()),
        }).await.map_err(|e| AppointmentError::DatabaseError(e.into()))?;

        Ok(appointment)
    }

    /// Doctor-initiated creation: same as booking, without the notification.
    pub async fn create_by_doctor(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppointmentError> {
        info!("Doctor {} creating appointment for patient {}", request.doctor_id, request.patient_id);

        let scheduled_at = parse_schedule(&request.date, &request.time)?;
        self.ensure_participants(&request.patient_id, &request.doctor_id).await?;

        self.insert(NewAppointment {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            scheduled_at,
            visit_type: request.visit_type,
            mode: request.mode.unwrap_or_default(),
            status: AppointmentStatus::Upcoming,
            duration: Some(request.duration.unwrap_or_else(|| DEFAULT_DURATION.to_string())),
        }).await
    }

    /// Walk-in visit created at registration: scheduled now, status `today`.
    pub async fn create_same_day(
        &self,
        patient_id: &str,
        doctor_id: &str,
        condition: &str,
        mode_label: &str,
    ) -> Result<Appointment, AppointmentError> {
        self.ensure_participants(patient_id, doctor_id).await?;

        let now = clinic_now();
        let scheduled_at = now
            .with_second(0)
            .and_then(|at| at.with_nanosecond(0))
            .unwrap_or(now);

        self.insert(NewAppointment {
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            scheduled_at,
            visit_type: condition.to_string(),
            mode: AppointmentMode::from_label(mode_label),
            status: AppointmentStatus::Today,
            duration: None,
        }).await
    }

    /// Moves an appointment and resets it to `upcoming`, whatever its prior
    /// status, including completed or cancelled ones.
    pub async fn reschedule(
        &self,
        appointment_id: &str,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let scheduled_at = parse_schedule(&request.date, &request.time)?;

        let mut patch = Map::new();
        patch.insert("scheduledAt".to_string(), json!(scheduled_at));
        patch.insert("status".to_string(), json!(AppointmentStatus::Upcoming));

        let appointment = self.appointments
            .update(appointment_id, patch)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        info!(
            "Rescheduled appointment {} to {} (reason: {})",
            appointment_id,
            scheduled_at,
            request.reason.as_deref().unwrap_or("none given")
        );
        Ok(appointment)
    }

    /// Doctor's appointments matching `filter`, most recently created first.
    pub async fn list_for_doctor(
        &self,
        doctor_id: &str,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for doctor {} ({:?})", doctor_id, filter);

        let query = Query::new().eq("doctorId", doctor_id);
        let query = match filter {
            AppointmentFilter::All => query,
            AppointmentFilter::Today => query.eq("status", AppointmentStatus::Today.as_str()),
            AppointmentFilter::Upcoming => query.eq("status", AppointmentStatus::Upcoming.as_str()),
            AppointmentFilter::Online => query.eq("mode", AppointmentMode::Online.as_str()),
            AppointmentFilter::Past => query.eq("status", AppointmentStatus::Completed.as_str()),
        };

        Ok(self.appointments.find(&query.newest_first()).await?)
    }

    /// Patient's appointments, most recently created first.
    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for patient {}", patient_id);

        let query = Query::new().eq("patientId", patient_id).newest_first();
        Ok(self.appointments.find(&query).await?)
    }

    /// Earliest scheduled `upcoming` appointment of a doctor.
    pub async fn next_for_doctor(&self, doctor_id: &str) -> Result<Option<Appointment>, AppointmentError> {
        let query = Query::new()
            .eq("doctorId", doctor_id)
            .eq("status", AppointmentStatus::Upcoming.as_str())
            .order_by("scheduledAt", Direction::Asc);

        Ok(self.appointments.find_one(&query).await?)
    }

    /// Earliest scheduled appointment of a patient that is still ahead,
    /// i.e. `upcoming` or `today`.
    pub async fn next_for_patient(&self, patient_id: &str) -> Result<Option<Appointment>, AppointmentError> {
        let query = Query::new()
            .eq("patientId", patient_id)
            .any_of("status", [AppointmentStatus::Upcoming.as_str(), AppointmentStatus::Today.as_str()])
            .order_by("scheduledAt", Direction::Asc);

        Ok(self.appointments.find_one(&query).await?)
    }

    /// Visits a patient attended or is attending (`completed` or `today`),
    /// most recently created first.
    pub async fn list_visits(&self, patient_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let query = Query::new()
            .eq("patientId", patient_id)
            .any_of("status", visit_statuses())
            .newest_first();

        Ok(self.appointments.find(&query).await?)
    }

    /// Latest attended visit per patient, keyed by patient id.
    pub async fn latest_visits(&self) -> Result<HashMap<String, Appointment>, AppointmentError> {
        let query = Query::new()
            .any_of("status", visit_statuses())
            .order_by("scheduledAt", Direction::Desc);

        let mut latest = HashMap::new();
        for appointment in self.appointments.find(&query).await? {
            latest.entry(appointment.patient_id.clone()).or_insert(appointment);
        }
        Ok(latest)
    }

    async fn ensure_participants(&self, patient_id: &str, doctor_id: &str) -> Result<(), AppointmentError> {
        let participants = self.users.get_many([patient_id, doctor_id]).await?;

        if !participants.get(patient_id).map(User::is_patient).unwrap_or(false) {
            return Err(AppointmentError::PatientNotFound);
        }
        if !participants.get(doctor_id).map(User::is_doctor).unwrap_or(false) {
            return Err(AppointmentError::DoctorNotFound);
        }
        Ok(())
    }

    async fn insert(&self, new: NewAppointment) -> Result<Appointment, AppointmentError> {
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            scheduled_at: new.scheduled_at,
            visit_type: new.visit_type,
            mode: new.mode,
            status: new.status,
            duration: new.duration,
            notes: None,
            created_at: Utc::now(),
        };

        let stored = self.appointments.insert(&appointment).await?;
        info!("Created {} appointment {} ({})", stored.status, stored.id, stored.mode);
        Ok(stored)
    }
}

fn visit_statuses() -> [&'static str; 2] {
    [AppointmentStatus::Completed.as_str(), AppointmentStatus::Today.as_str()]
}
