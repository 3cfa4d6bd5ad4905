//! Response shapes for the patient app. Each formatter joins one entity with
//! the user it references and fills display defaults where that user, or one
//! of its fields, is missing.

use serde::Serialize;

use appointment_cell::{Appointment, AppointmentMode, AppointmentStatus};
use health_profile_cell::{Document, Medicine, Prescription, PrescriptionStatus};
use payment_cell::{Payment, PaymentMode, PaymentStatus};
use shared_models::user::User;
use shared_utils::display::{date_label, time_label};

pub const DEFAULT_DOCTOR_RATING: f64 = 4.9;
pub const DEFAULT_CONSULTATION_FEE: f64 = 800.0;
pub const UNKNOWN_DOCTOR: &str = "Unknown Doctor";
pub const SELF_UPLOADED: &str = "Self Uploaded";
pub const DEFAULT_PAYMENT_TYPE: &str = "Consultation";

const LAB_REPORT_COLORS: [&str; 2] = ["#EF4444", "#DB2777"];
const PRESCRIPTION_COLORS: [&str; 2] = ["#0A6659", "#0D8B7A"];
const DEFAULT_DOCUMENT_COLORS: [&str; 2] = ["#3B82F6", "#9333EA"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDashboard {
    pub patient_name: String,
    pub patient_image: Option<String>,
    pub upcoming_appointment: Option<UpcomingVisit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingVisit {
    pub id: String,
    pub doctor_name: String,
    pub specialty: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub doctor_image: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: String,
}

pub fn dashboard(patient: &User, upcoming: Option<(&Appointment, Option<&User>)>) -> PatientDashboard {
    PatientDashboard {
        patient_name: patient.name.clone(),
        patient_image: patient.image.clone(),
        upcoming_appointment: upcoming.map(|(appointment, doctor)| {
            let profile = doctor.and_then(User::doctor_profile);
            UpcomingVisit {
                id: appointment.id.clone(),
                doctor_name: doctor_name(doctor),
                specialty: profile.and_then(|p| p.specialization.clone()),
                rating: profile.and_then(|p| p.rating),
                reviews: profile.and_then(|p| p.reviews),
                doctor_image: doctor.and_then(|d| d.image.clone()),
                date: appointment.date_label(),
                time: appointment.time_label(),
                visit_type: appointment.visit_type.clone(),
            }
        }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointment {
    pub id: String,
    pub doctor_name: String,
    pub specialty: Option<String>,
    pub doctor_image: Option<String>,
    pub rating: f64,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    /// The visit mode; the app picks its video/in-person icon from it.
    #[serde(rename = "type")]
    pub mode: AppointmentMode,
    pub fee: f64,
}

pub fn appointment(appointment: &Appointment, doctor: Option<&User>) -> PatientAppointment {
    let profile = doctor.and_then(User::doctor_profile);
    PatientAppointment {
        id: appointment.id.clone(),
        doctor_name: doctor_name(doctor),
        specialty: profile.and_then(|p| p.specialization.clone()),
        doctor_image: doctor.and_then(|d| d.image.clone()),
        rating: profile.and_then(|p| p.rating).unwrap_or(DEFAULT_DOCTOR_RATING),
        date: appointment.date_label(),
        time: appointment.time_label(),
        status: appointment.status,
        mode: appointment.mode,
        fee: profile.and_then(|p| p.consultation_fee).unwrap_or(DEFAULT_CONSULTATION_FEE),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayment {
    pub id: String,
    pub doctor_name: String,
    pub amount: f64,
    pub date: String,
    pub time: String,
    pub mode: PaymentMode,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub service: String,
}

pub fn payment(payment: &Payment, doctor: Option<&User>) -> PatientPayment {
    PatientPayment {
        id: payment.id.clone(),
        doctor_name: doctor_name(doctor),
        amount: payment.amount,
        date: date_label(payment.paid_at.date()),
        time: time_label(payment.paid_at.time()),
        mode: payment.mode,
        status: payment.status,
        service: payment.service.clone().unwrap_or_else(|| DEFAULT_PAYMENT_TYPE.to_string()),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPrescription {
    pub id: String,
    pub date: String,
    pub doctor_name: String,
    /// Resolved doctor name, absent when the doctor no longer resolves.
    pub doctor: Option<String>,
    pub diagnosis: Option<String>,
    pub medicines: Vec<Medicine>,
    pub status: PrescriptionStatus,
}

pub fn prescription(prescription: &Prescription, doctor: Option<&User>) -> PatientPrescription {
    PatientPrescription {
        id: prescription.id.clone(),
        date: prescription.date.clone(),
        doctor_name: doctor_name(doctor),
        doctor: doctor.map(|d| d.name.clone()),
        diagnosis: prescription.diagnosis.clone(),
        medicines: prescription.medicines.clone(),
        status: prescription.status,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub doctor_name: String,
    pub date: Option<String>,
    pub file_size: Option<String>,
    pub color: [&'static str; 2],
}

pub fn document(document: &Document, doctor: Option<&User>) -> HealthRecord {
    record(document, doctor_name(doctor))
}

/// Freshly uploaded documents are always the patient's own.
pub fn uploaded_document(document: &Document) -> HealthRecord {
    record(document, SELF_UPLOADED.to_string())
}

fn record(document: &Document, doctor_name: String) -> HealthRecord {
    HealthRecord {
        id: document.id.clone(),
        title: document.name.clone(),
        doc_type: document.doc_type.clone(),
        doctor_name,
        date: document.date.clone(),
        file_size: document.size.clone(),
        color: palette(&document.doc_type),
    }
}

pub fn palette(doc_type: &str) -> [&'static str; 2] {
    match doc_type {
        "Lab Report" => LAB_REPORT_COLORS,
        "Prescription" => PRESCRIPTION_COLORS,
        _ => DEFAULT_DOCUMENT_COLORS,
    }
}

fn doctor_name(doctor: Option<&User>) -> String {
    doctor.map(|d| d.name.clone()).unwrap_or_else(|| UNKNOWN_DOCTOR.to_string())
}
