use assert_matches::assert_matches;

use appointment_cell::{AppointmentLifecycleService, AppointmentMode, AppointmentStatus};
use health_profile_cell::*;
use shared_config::AppConfig;
use shared_database::Collection;
use shared_utils::test_utils::{TestContext, TestUser};

fn registration(name: &str, gender: &str) -> RegisterPatientRequest {
    RegisterPatientRequest {
        name: name.to_string(),
        gender: Some(gender.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_assigns_default_avatar_by_gender() {
    let ctx = TestContext::new();
    let service = ProfileService::new(&ctx.state);

    let male = service.register_patient(registration("Test", "Male")).await.unwrap();
    let female = service.register_patient(registration("Asha", "Female")).await.unwrap();

    assert!(male.is_patient());
    assert_eq!(male.image.as_deref(), Some(MALE_AVATAR_URL));
    assert_eq!(female.image.as_deref(), Some(FEMALE_AVATAR_URL));
    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
}

#[tokio::test]
async fn register_with_condition_and_video_mode_opens_online_visit_today() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let service = ProfileService::new(&ctx.state);

    let mut request = registration("Test", "Male");
    request.condition = Some("Fever".to_string());
    request.mode = Some("Video Call".to_string());
    request.doctor_id = Some(doctor.id.clone());

    let patient = service.register_patient(request).await.unwrap();

    let appointments = AppointmentLifecycleService::new(&ctx.state)
        .list_for_patient(&patient.id)
        .await
        .unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].mode, AppointmentMode::Online);
    assert_eq!(appointments[0].status, AppointmentStatus::Today);
    assert_eq!(appointments[0].visit_type, "Fever");
    assert_eq!(appointments[0].doctor_id, doctor.id);
}

#[tokio::test]
async fn register_falls_back_to_configured_doctor() {
    let default_doctor = TestUser::doctor("Dr. Default");
    let mut config = AppConfig::in_memory();
    config.default_doctor_id = Some(default_doctor.id.clone());
    let ctx = TestContext::with_config(config);
    ctx.seed(default_doctor.to_user()).await;

    let mut request = registration("Test", "Male");
    request.condition = Some("Cough".to_string());
    request.mode = Some("In-Person".to_string());

    let patient = ProfileService::new(&ctx.state).register_patient(request).await.unwrap();

    let visits = AppointmentLifecycleService::new(&ctx.state).list_visits(&patient.id).await.unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].doctor_id, default_doctor.id);
    assert_eq!(visits[0].mode, AppointmentMode::InPerson);
}

#[tokio::test]
async fn register_with_unknown_doctor_creates_nothing() {
    let ctx = TestContext::new();
    let service = ProfileService::new(&ctx.state);

    let mut request = registration("Test", "Male");
    request.condition = Some("Fever".to_string());
    request.mode = Some("Video Call".to_string());
    request.doctor_id = Some("ghost".to_string());

    assert_matches!(service.register_patient(request).await, Err(HealthProfileError::DoctorNotFound));

    assert_eq!(ctx.store.count(Collection::Users).await, 0);
    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
}

#[tokio::test]
async fn register_without_any_doctor_creates_the_account_only() {
    let ctx = TestContext::new();
    let service = ProfileService::new(&ctx.state);

    let mut request = registration("Test", "Male");
    request.condition = Some("Fever".to_string());
    request.mode = Some("Video Call".to_string());

    let patient = service.register_patient(request).await.unwrap();

    assert!(patient.is_patient());
    assert_eq!(ctx.store.count(Collection::Users).await, 1);
    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
}

#[tokio::test]
async fn patient_update_ignores_doctor_fields() {
    let ctx = TestContext::new();
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = ProfileService::new(&ctx.state);

    // `specialization` is not a patient field, so it never reaches the update.
    let update: UpdatePatientProfile = serde_json::from_value(serde_json::json!({
        "bloodGroup": "B+",
        "specialization": "Cardiology",
        "role": "doctor"
    }))
    .unwrap();

    let updated = service.update_patient(&patient.id, update).await.unwrap();
    assert!(updated.is_patient());
    assert_eq!(updated.patient_profile().and_then(|p| p.blood_group.as_deref()), Some("B+"));

    let stored = serde_json::to_value(service.patient(&patient.id).await.unwrap()).unwrap();
    assert!(stored.get("specialization").is_none());
    assert_eq!(stored["role"], "patient");
}

#[tokio::test]
async fn doctor_update_applies_allow_listed_fields() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let service = ProfileService::new(&ctx.state);

    let updated = service
        .update_doctor(&doctor.id, UpdateDoctorProfile {
            hospital: Some("City Care".to_string()),
            consultation_fee: Some(650.0),
            is_available: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let profile = updated.doctor_profile().unwrap();
    assert_eq!(profile.hospital.as_deref(), Some("City Care"));
    assert_eq!(profile.consultation_fee, Some(650.0));
    assert_eq!(profile.is_available, Some(false));
    // Untouched fields survive.
    assert_eq!(profile.specialization.as_deref(), Some("General Medicine"));
}

#[tokio::test]
async fn profiles_resolve_only_the_matching_role() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = ProfileService::new(&ctx.state);

    assert_matches!(service.patient(&doctor.id).await, Err(HealthProfileError::PatientNotFound));
    assert_matches!(service.doctor(&patient.id).await, Err(HealthProfileError::DoctorNotFound));
    assert_matches!(
        service.update_patient("missing", UpdatePatientProfile::default()).await,
        Err(HealthProfileError::PatientNotFound)
    );
}

#[tokio::test]
async fn list_patients_excludes_doctors() {
    let ctx = TestContext::new();
    ctx.seed_doctor("Dr. Amit Verma").await;
    ctx.seed_patient("Rahul Sharma").await;
    ctx.seed_patient("Priya Patel").await;

    let patients = ProfileService::new(&ctx.state).list_patients().await.unwrap();
    let names: Vec<_> = patients.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Rahul Sharma", "Priya Patel"]);
}
