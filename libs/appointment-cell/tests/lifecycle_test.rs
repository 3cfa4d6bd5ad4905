use assert_matches::assert_matches;
use serde_json::{json, Map};

use appointment_cell::models::*;
use appointment_cell::services::AppointmentLifecycleService;
use notification_cell::NotificationService;
use shared_database::{Collection, Repository};
use shared_utils::test_utils::TestContext;

fn booking(patient_id: &str, doctor_id: &str, date: &str, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id: patient_id.to_string(),
        doctor_id: doctor_id.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        visit_type: "Regular Checkup".to_string(),
        mode: None,
    }
}

fn doctor_created(patient_id: &str, doctor_id: &str, visit_type: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id: patient_id.to_string(),
        doctor_id: doctor_id.to_string(),
        date: "Dec 15, 2025".to_string(),
        time: "10:30 AM".to_string(),
        visit_type: visit_type.to_string(),
        mode: Some(AppointmentMode::Online),
        duration: None,
    }
}

async fn set_status(ctx: &TestContext, appointment_id: &str, status: AppointmentStatus) {
    let mut patch = Map::new();
    patch.insert("status".to_string(), json!(status));
    Repository::<Appointment>::new(ctx.state.store.clone())
        .update(appointment_id, patch)
        .await
        .unwrap()
        .expect("appointment exists");
}

#[tokio::test]
async fn booking_creates_one_upcoming_appointment_and_one_doctor_notification() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    let appointment = service
        .book(booking(&patient.id, &doctor.id, "Dec 15, 2025", "10:30 AM"))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Upcoming);
    assert_eq!(appointment.mode, AppointmentMode::InPerson);
    assert_eq!(appointment.date_label(), "Dec 15, 2025");
    assert_eq!(appointment.time_label(), "10:30 AM");
    assert_eq!(ctx.store.count(Collection::Appointments).await, 1);
    assert_eq!(ctx.store.count(Collection::Notifications).await, 1);

    let notifications = NotificationService::new(&ctx.state)
        .list_for_recipient(&doctor.id)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "New Booking");
    assert_eq!(notifications[0].time.as_deref(), Some("Just now"));
    assert!(notifications[0].unread);
}

#[tokio::test]
async fn booking_with_unknown_participants_writes_nothing() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    assert_matches!(
        service.book(booking(&patient.id, "ghost", "Dec 15, 2025", "10:30 AM")).await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        service.book(booking("ghost", &doctor.id, "Dec 15, 2025", "10:30 AM")).await,
        Err(AppointmentError::PatientNotFound)
    );
    // Roles are checked too: a doctor cannot stand in for the patient.
    assert_matches!(
        service.book(booking(&doctor.id, &doctor.id, "Dec 15, 2025", "10:30 AM")).await,
        Err(AppointmentError::PatientNotFound)
    );

    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
    assert_eq!(ctx.store.count(Collection::Notifications).await, 0);
}

#[tokio::test]
async fn booking_rejects_unparseable_schedule() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    assert_matches!(
        service.book(booking(&patient.id, &doctor.id, "someday", "10:30 AM")).await,
        Err(AppointmentError::InvalidSchedule(_))
    );
}

#[tokio::test]
async fn double_booking_the_same_slot_is_accepted() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let first = ctx.seed_patient("Rahul Sharma").await;
    let second = ctx.seed_patient("Priya Patel").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    service.book(booking(&first.id, &doctor.id, "Dec 15, 2025", "10:30 AM")).await.unwrap();
    service.book(booking(&second.id, &doctor.id, "Dec 15, 2025", "10:30 AM")).await.unwrap();

    assert_eq!(ctx.store.count(Collection::Appointments).await, 2);
}

#[tokio::test]
async fn doctor_created_appointments_default_duration_and_skip_notification() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    let appointment = service
        .create_by_doctor(doctor_created(&patient.id, &doctor.id, "Follow-up"))
        .await
        .unwrap();

    assert_eq!(appointment.duration.as_deref(), Some("30 min"));
    assert_eq!(appointment.status, AppointmentStatus::Upcoming);
    assert_eq!(appointment.mode, AppointmentMode::Online);
    assert_eq!(ctx.store.count(Collection::Notifications).await, 0);
}

#[tokio::test]
async fn reschedule_resurrects_completed_appointments_as_upcoming() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    for prior in [AppointmentStatus::Completed, AppointmentStatus::Cancelled, AppointmentStatus::Today] {
        let appointment = service
            .create_by_doctor(doctor_created(&patient.id, &doctor.id, "Checkup"))
            .await
            .unwrap();
        set_status(&ctx, &appointment.id, prior).await;

        let moved = service
            .reschedule(&appointment.id, RescheduleAppointmentRequest {
                date: "Jan 5, 2026".to_string(),
                time: "04:00 PM".to_string(),
                reason: Some("Travel".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(moved.status, AppointmentStatus::Upcoming);
        assert_eq!(moved.date_label(), "Jan 5, 2026");
        assert_eq!(moved.time_label(), "04:00 PM");
    }
}

#[tokio::test]
async fn reschedule_of_unknown_appointment_is_not_found() {
    let ctx = TestContext::new();
    let service = AppointmentLifecycleService::new(&ctx.state);

    let result = service
        .reschedule("missing", RescheduleAppointmentRequest {
            date: "Jan 5, 2026".to_string(),
            time: "04:00 PM".to_string(),
            reason: None,
        })
        .await;

    assert_matches!(result, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn doctor_listing_is_newest_created_first_and_filters() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    let mut created = Vec::new();
    for visit_type in ["A", "B", "C"] {
        let mut request = doctor_created(&patient.id, &doctor.id, visit_type);
        request.mode = if visit_type == "B" { Some(AppointmentMode::Online) } else { None };
        created.push(service.create_by_doctor(request).await.unwrap());
    }
    set_status(&ctx, &created[0].id, AppointmentStatus::Completed).await;

    let all = service.list_for_doctor(&doctor.id, AppointmentFilter::All).await.unwrap();
    let order: Vec<_> = all.iter().map(|a| a.visit_type.as_str()).collect();
    assert_eq!(order, vec!["C", "B", "A"]);

    let online = service.list_for_doctor(&doctor.id, AppointmentFilter::Online).await.unwrap();
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].visit_type, "B");

    let past = service.list_for_doctor(&doctor.id, AppointmentFilter::Past).await.unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].visit_type, "A");

    let upcoming = service.list_for_doctor(&doctor.id, AppointmentFilter::Upcoming).await.unwrap();
    assert_eq!(upcoming.len(), 2);
    assert!(service.list_for_doctor(&doctor.id, AppointmentFilter::Today).await.unwrap().is_empty());
}

#[tokio::test]
async fn next_upcoming_sorts_on_the_schedule_not_the_label() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Rahul Sharma").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    // "Dec" sorts before "Feb" as text, but February 2026 is later.
    service.book(booking(&patient.id, &doctor.id, "Feb 2, 2026", "09:00 AM")).await.unwrap();
    service.book(booking(&patient.id, &doctor.id, "Dec 20, 2025", "11:00 AM")).await.unwrap();
    service.book(booking(&patient.id, &doctor.id, "Dec 20, 2025", "09:30 AM")).await.unwrap();

    let next = service.next_for_doctor(&doctor.id).await.unwrap().unwrap();
    assert_eq!(next.date_label(), "Dec 20, 2025");
    assert_eq!(next.time_label(), "09:30 AM");

    let next_for_patient = service.next_for_patient(&patient.id).await.unwrap().unwrap();
    assert_eq!(next_for_patient.id, next.id);
}

#[tokio::test]
async fn same_day_visit_uses_mode_label() {
    let ctx = TestContext::new();
    let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
    let patient = ctx.seed_patient("Test").await;
    let service = AppointmentLifecycleService::new(&ctx.state);

    let video = service.create_same_day(&patient.id, &doctor.id, "Fever", "Video Call").await.unwrap();
    let clinic = service.create_same_day(&patient.id, &doctor.id, "Cough", "Clinic Visit").await.unwrap();

    assert_eq!(video.status, AppointmentStatus::Today);
    assert_eq!(video.mode, AppointmentMode::Online);
    assert_eq!(video.visit_type, "Fever");
    assert_eq!(clinic.mode, AppointmentMode::InPerson);

    let visits = service.list_visits(&patient.id).await.unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].id, clinic.id);

    let latest = service.latest_visits().await.unwrap();
    assert!(latest.contains_key(&patient.id));
}
