use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use futures::try_join;
use serde::Deserialize;
use tracing::debug;

use appointment_cell::{
    AppointmentFilter, AppointmentLifecycleService, AppointmentResponse, CreateAppointmentRequest,
};
use health_profile_cell::{
    CreatePrescriptionRequest, DocumentService, Prescription, PrescriptionService, ProfileService,
    UpdateDoctorProfile, VitalService,
};
use payment_cell::{LedgerService, RecordPaymentRequest};
use shared_database::{AppState, Repository};
use shared_models::error::AppError;
use shared_models::extract::AppJson;
use shared_models::user::User;

use crate::views::{self, DoctorAppointment, DoctorDashboard, DoctorPayment, PatientHistory, PatientSummary};

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

async fn users_by_id<'a, I>(state: &AppState, ids: I) -> Result<HashMap<String, User>, AppError>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(Repository::<User>::new(state.store.clone()).get_many(ids).await?)
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorDashboard>, AppError> {
    let profiles = ProfileService::new(&state);
    let lifecycle = AppointmentLifecycleService::new(&state);

    let (doctor, checked_in, upcoming) = try_join!(
        async { profiles.doctor(&doctor_id).await.map_err(AppError::from) },
        async {
            lifecycle
                .list_for_doctor(&doctor_id, AppointmentFilter::Today)
                .await
                .map_err(AppError::from)
        },
        async { lifecycle.next_for_doctor(&doctor_id).await.map_err(AppError::from) },
    )?;

    let patient_ids = checked_in.iter().chain(upcoming.iter()).map(|a| a.patient_id.as_str());
    let patients = users_by_id(&state, patient_ids).await?;

    Ok(Json(views::dashboard(&doctor, &checked_in, upcoming.as_ref(), &patients)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<DoctorAppointment>>, AppError> {
    let filter = AppointmentFilter::parse(query.kind.as_deref());
    let appointments = AppointmentLifecycleService::new(&state)
        .list_for_doctor(&doctor_id, filter)
        .await?;
    let patients = users_by_id(&state, appointments.iter().map(|a| a.patient_id.as_str())).await?;

    Ok(Json(
        appointments
            .iter()
            .map(|a| views::appointment(a, patients.get(&a.patient_id)))
            .collect(),
    ))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = AppointmentLifecycleService::new(&state)
        .create_by_doctor(request)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// Every registered patient. The listing is clinic-wide, not limited to the
/// doctor's own patients.
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<PatientSummary>>, AppError> {
    debug!("Listing patients for doctor {}", doctor_id);

    let profiles = ProfileService::new(&state);
    let lifecycle = AppointmentLifecycleService::new(&state);

    let (patients, last_visits) = try_join!(
        async { profiles.list_patients().await.map_err(AppError::from) },
        async { lifecycle.latest_visits().await.map_err(AppError::from) },
    )?;

    Ok(Json(
        patients
            .iter()
            .enumerate()
            .map(|(idx, p)| views::patient_summary(idx, p, last_visits.get(&p.id)))
            .collect(),
    ))
}

pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<DoctorPayment>>, AppError> {
    let payments = LedgerService::new(&state).received_by(&doctor_id).await?;
    let patients = users_by_id(&state, payments.iter().map(|p| p.payer_id.as_str())).await?;

    Ok(Json(
        payments
            .iter()
            .map(|p| views::payment(p, patients.get(&p.payer_id)))
            .collect(),
    ))
}

pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<DoctorPayment>), AppError> {
    let payment = LedgerService::new(&state).record(request).await?;
    let patients = users_by_id(&state, [payment.payer_id.as_str()]).await?;

    Ok((StatusCode::CREATED, Json(views::payment(&payment, patients.get(&payment.payer_id)))))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let doctor = ProfileService::new(&state).doctor(&doctor_id).await?;

    Ok(Json(doctor))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    AppJson(update): AppJson<UpdateDoctorProfile>,
) -> Result<Json<User>, AppError> {
    let doctor = ProfileService::new(&state)
        .update_doctor(&doctor_id, update)
        .await?;

    Ok(Json(doctor))
}

pub async fn get_patient_history(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientHistory>, AppError> {
    let vitals = VitalService::new(&state);
    let lifecycle = AppointmentLifecycleService::new(&state);
    let documents = DocumentService::new(&state);

    let (vitals, visits, documents) = try_join!(
        async { vitals.list_for_patient(&patient_id).await.map_err(AppError::from) },
        async { lifecycle.list_visits(&patient_id).await.map_err(AppError::from) },
        async { documents.list_for_patient(&patient_id).await.map_err(AppError::from) },
    )?;

    Ok(Json(views::history(vitals, &visits, &documents)))
}

pub async fn create_prescription(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), AppError> {
    let prescription = PrescriptionService::new(&state).create(request).await?;

    Ok((StatusCode::CREATED, Json(prescription)))
}
