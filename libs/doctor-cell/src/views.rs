//! Response shapes for the doctor app.

use std::collections::HashMap;

use serde::Serialize;

use appointment_cell::services::lifecycle::DEFAULT_DURATION;
use appointment_cell::{Appointment, AppointmentMode, AppointmentStatus};
use health_profile_cell::{Document, Vital};
use payment_cell::{Payment, PaymentMode, PaymentStatus};
use shared_models::user::User;
use shared_utils::display::{date_label, time_label};

pub const UNKNOWN_PATIENT: &str = "Unknown Patient";
pub const CHECKED_IN_DEFAULT_AGE: u32 = 30;
pub const UPCOMING_DEFAULT_AGE: u32 = 28;
pub const CHECKED_IN_WAIT: &str = "10 min";
pub const NO_NEXT_APPOINTMENT: &str = "None";
pub const NO_VISITS: &str = "No visits";
pub const HISTORY_SUMMARY: &str = "Patient has been under regular care. Recent vitals are stable.";

const PATIENT_CONDITIONS: [&str; 2] = ["Fever & Cold", "Regular Checkup"];
const PATIENT_STATUSES: [&str; 2] = ["active", "inactive"];
const PATIENT_CATEGORIES: [&str; 3] = ["followup", "new", "today"];

/// Placeholder earnings by hour until payments are aggregated.
const EARNINGS_CHART: [(&str, u32); 6] = [
    ("9AM", 50),
    ("10AM", 75),
    ("11AM", 60),
    ("12PM", 90),
    ("1PM", 70),
    ("2PM", 85),
];

// ==============================================================================
// DASHBOARD
// ==============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub doctor_name: String,
    pub doctor_image: Option<String>,
    pub stats: DashboardStats,
    pub checked_in_patients: Vec<CheckedInPatient>,
    pub upcoming_appointment: Option<NextPatient>,
    pub earnings_chart: Vec<EarningsPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub patients_waiting: usize,
    pub next_appt_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInPatient {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub gender: Option<String>,
    pub case: String,
    pub status: &'static str,
    pub wait_time: &'static str,
    pub age: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPatient {
    pub patient_name: String,
    pub patient_image: Option<String>,
    pub patient_gender: Option<String>,
    pub time: String,
    pub date: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub age: u32,
}

#[derive(Debug, Serialize)]
pub struct EarningsPoint {
    pub time: &'static str,
    pub amount: u32,
}

pub fn dashboard(
    doctor: &User,
    checked_in: &[Appointment],
    upcoming: Option<&Appointment>,
    patients: &HashMap<String, User>,
) -> DoctorDashboard {
    DoctorDashboard {
        doctor_name: doctor.name.clone(),
        doctor_image: doctor.image.clone(),
        stats: DashboardStats {
            patients_waiting: checked_in.len(),
            next_appt_time: upcoming
                .map(Appointment::time_label)
                .unwrap_or_else(|| NO_NEXT_APPOINTMENT.to_string()),
        },
        checked_in_patients: checked_in
            .iter()
            .map(|a| {
                let patient = patients.get(&a.patient_id);
                CheckedInPatient {
                    id: a.patient_id.clone(),
                    name: patient_name(patient),
                    image: patient.and_then(|p| p.image.clone()),
                    gender: patient.and_then(|p| p.gender.clone()),
                    case: a.visit_type.clone(),
                    status: "checked-in",
                    wait_time: CHECKED_IN_WAIT,
                    age: patient.and_then(|p| p.age).unwrap_or(CHECKED_IN_DEFAULT_AGE),
                }
            })
            .collect(),
        upcoming_appointment: upcoming.map(|a| {
            let patient = patients.get(&a.patient_id);
            NextPatient {
                patient_name: patient_name(patient),
                patient_image: patient.and_then(|p| p.image.clone()),
                patient_gender: patient.and_then(|p| p.gender.clone()),
                time: a.time_label(),
                date: a.date_label(),
                visit_type: a.visit_type.clone(),
                age: patient.and_then(|p| p.age).unwrap_or(UPCOMING_DEFAULT_AGE),
            }
        }),
        earnings_chart: EARNINGS_CHART
            .iter()
            .map(|&(time, amount)| EarningsPoint { time, amount })
            .collect(),
    }
}

// ==============================================================================
// LISTINGS
// ==============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAppointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_image: Option<String>,
    pub time: String,
    pub date: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub mode: AppointmentMode,
    pub duration: String,
    pub status: AppointmentStatus,
    pub age: u32,
}

pub fn appointment(appointment: &Appointment, patient: Option<&User>) -> DoctorAppointment {
    DoctorAppointment {
        id: appointment.id.clone(),
        patient_id: appointment.patient_id.clone(),
        patient_name: patient_name(patient),
        patient_image: patient.and_then(|p| p.image.clone()),
        time: appointment.time_label(),
        date: appointment.date_label(),
        visit_type: appointment.visit_type.clone(),
        mode: appointment.mode,
        duration: appointment.duration.clone().unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        status: appointment.status,
        age: patient.and_then(|p| p.age).unwrap_or(UPCOMING_DEFAULT_AGE),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub last_visit: String,
    pub condition: String,
    pub image: Option<String>,
    pub status: &'static str,
    pub category: &'static str,
}

/// `idx` is the patient's position in the listing; it drives the placeholder
/// age, condition, status and category.
pub fn patient_summary(idx: usize, patient: &User, last_visit: Option<&Appointment>) -> PatientSummary {
    PatientSummary {
        id: patient.id.clone(),
        name: patient.name.clone(),
        age: patient.age.unwrap_or(25 + (idx % 20) as u32),
        last_visit: last_visit
            .map(Appointment::date_label)
            .unwrap_or_else(|| NO_VISITS.to_string()),
        condition: patient
            .patient_profile()
            .and_then(|p| p.condition.clone())
            .unwrap_or_else(|| PATIENT_CONDITIONS[idx % PATIENT_CONDITIONS.len()].to_string()),
        image: patient.image.clone(),
        status: PATIENT_STATUSES[idx % PATIENT_STATUSES.len()],
        category: PATIENT_CATEGORIES[idx % PATIENT_CATEGORIES.len()],
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPayment {
    pub id: String,
    pub patient_name: String,
    pub amount: f64,
    pub date: String,
    pub time: String,
    pub mode: PaymentMode,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub service: String,
    pub category: String,
}

pub fn payment(payment: &Payment, patient: Option<&User>) -> DoctorPayment {
    DoctorPayment {
        id: payment.id.clone(),
        patient_name: patient_name(patient),
        amount: payment.amount,
        date: date_label(payment.paid_at.date()),
        time: time_label(payment.paid_at.time()),
        mode: payment.mode,
        status: payment.status,
        service: payment.service.clone().unwrap_or_else(|| "Consultation".to_string()),
        category: payment.category.clone().unwrap_or_else(|| "today".to_string()),
    }
}

// ==============================================================================
// PATIENT HISTORY
// ==============================================================================

#[derive(Debug, Serialize)]
pub struct PatientHistory {
    pub summary: &'static str,
    pub vitals: Vec<Vital>,
    pub visits: Vec<HistoryVisit>,
    pub documents: Vec<HistoryDocument>,
}

#[derive(Debug, Serialize)]
pub struct HistoryVisit {
    pub title: String,
    pub date: String,
    pub status: &'static str,
    pub fee: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HistoryDocument {
    pub name: String,
    pub size: String,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub ext: String,
    pub color: String,
}

pub fn history(vitals: Vec<Vital>, visits: &[Appointment], documents: &[Document]) -> PatientHistory {
    PatientHistory {
        summary: HISTORY_SUMMARY,
        vitals,
        visits: visits
            .iter()
            .map(|v| HistoryVisit {
                title: v.visit_type.clone(),
                date: format!("{} • {}", v.date_label(), v.time_label()),
                status: "Healthy",
                fee: "₹800",
            })
            .collect(),
        documents: documents
            .iter()
            .map(|d| HistoryDocument {
                name: d.name.clone(),
                size: d.size.clone().unwrap_or_else(|| "1MB".to_string()),
                date: d.date.clone(),
                doc_type: d.doc_type.clone(),
                ext: d.extension.clone().unwrap_or_else(|| "PDF".to_string()),
                color: d.color.clone().unwrap_or_else(|| "#3B82F6".to_string()),
            })
            .collect(),
    }
}

fn patient_name(patient: Option<&User>) -> String {
    patient.map(|p| p.name.clone()).unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
}
