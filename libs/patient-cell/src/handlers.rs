use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use futures::try_join;

use appointment_cell::{
    AppointmentLifecycleService, AppointmentResponse, BookAppointmentRequest,
    RescheduleAppointmentRequest,
};
use health_profile_cell::{
    AddVitalRequest, DocumentService, PrescriptionService, ProfileService, RegisterPatientRequest,
    UpdatePatientProfile, Vital, VitalService, UploadDocumentRequest,
};
use payment_cell::LedgerService;
use shared_database::{AppState, Repository};
use shared_models::error::AppError;
use shared_models::extract::AppJson;
use shared_models::user::User;

use crate::views::{self, HealthRecord, PatientAppointment, PatientDashboard, PatientPayment, PatientPrescription};

/// Resolves the users a listing refers to, in one read.
async fn users_by_id<'a, I>(state: &AppState, ids: I) -> Result<HashMap<String, User>, AppError>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(Repository::<User>::new(state.store.clone()).get_many(ids).await?)
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDashboard>, AppError> {
    let profiles = ProfileService::new(&state);
    let lifecycle = AppointmentLifecycleService::new(&state);

    let (patient, upcoming) = try_join!(
        async { profiles.patient(&patient_id).await.map_err(AppError::from) },
        async { lifecycle.next_for_patient(&patient_id).await.map_err(AppError::from) },
    )?;

    let doctors = users_by_id(&state, upcoming.iter().map(|a| a.doctor_id.as_str())).await?;
    let upcoming = upcoming.as_ref().map(|a| (a, doctors.get(&a.doctor_id)));

    Ok(Json(views::dashboard(&patient, upcoming)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<PatientAppointment>>, AppError> {
    let appointments = AppointmentLifecycleService::new(&state)
        .list_for_patient(&patient_id)
        .await?;
    let doctors = users_by_id(&state, appointments.iter().map(|a| a.doctor_id.as_str())).await?;

    Ok(Json(
        appointments
            .iter()
            .map(|a| views::appointment(a, doctors.get(&a.doctor_id)))
            .collect(),
    ))
}

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = AppointmentLifecycleService::new(&state).book(request).await?;

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    AppJson(request): AppJson<RescheduleAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = AppointmentLifecycleService::new(&state)
        .reschedule(&appointment_id, request)
        .await?;

    Ok(Json(appointment.into()))
}

pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<PatientPayment>>, AppError> {
    let payments = LedgerService::new(&state).paid_by(&patient_id).await?;
    let doctors = users_by_id(&state, payments.iter().map(|p| p.payee_id.as_str())).await?;

    Ok(Json(
        payments
            .iter()
            .map(|p| views::payment(p, doctors.get(&p.payee_id)))
            .collect(),
    ))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let patient = ProfileService::new(&state).patient(&patient_id).await?;

    Ok(Json(patient))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    AppJson(update): AppJson<UpdatePatientProfile>,
) -> Result<Json<User>, AppError> {
    let patient = ProfileService::new(&state)
        .update_patient(&patient_id, update)
        .await?;

    Ok(Json(patient))
}

pub async fn list_vitals(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Vital>>, AppError> {
    let vitals = VitalService::new(&state).list_for_patient(&patient_id).await?;

    Ok(Json(vitals))
}

pub async fn add_vital(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    AppJson(request): AppJson<AddVitalRequest>,
) -> Result<(StatusCode, Json<Vital>), AppError> {
    let vital = VitalService::new(&state).add(&patient_id, request).await?;

    Ok((StatusCode::CREATED, Json(vital)))
}

pub async fn list_prescriptions(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<PatientPrescription>>, AppError> {
    let prescriptions = PrescriptionService::new(&state)
        .list_for_patient(&patient_id)
        .await?;
    let doctors = users_by_id(&state, prescriptions.iter().map(|p| p.doctor_id.as_str())).await?;

    Ok(Json(
        prescriptions
            .iter()
            .map(|p| views::prescription(p, doctors.get(&p.doctor_id)))
            .collect(),
    ))
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<HealthRecord>>, AppError> {
    let documents = DocumentService::new(&state).list_for_patient(&patient_id).await?;
    let doctors = users_by_id(&state, documents.iter().filter_map(|d| d.doctor_id.as_deref())).await?;

    Ok(Json(
        documents
            .iter()
            .map(|d| views::document(d, d.doctor_id.as_ref().and_then(|id| doctors.get(id))))
            .collect(),
    ))
}

pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    AppJson(request): AppJson<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<HealthRecord>), AppError> {
    let document = DocumentService::new(&state).upload(&patient_id, request).await?;

    Ok((StatusCode::CREATED, Json(views::uploaded_document(&document))))
}

pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<RegisterPatientRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let patient = ProfileService::new(&state).register_patient(request).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}
