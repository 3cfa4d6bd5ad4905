use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_database::{Collection, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => write!(f, "doctor"),
            Role::Patient => write!(f, "patient"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_patients: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_name: Option<String>,
    /// Presenting condition captured at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Role-specific attributes; the `role` tag selects which payload is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Doctor(DoctorProfile),
    Patient(PatientProfile),
}

/// An account. The role is fixed at creation; profile updates never touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl User {
    pub fn role(&self) -> Role {
        match self.profile {
            RoleProfile::Doctor(_) => Role::Doctor,
            RoleProfile::Patient(_) => Role::Patient,
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.role() == Role::Doctor
    }

    pub fn is_patient(&self) -> bool {
        self.role() == Role::Patient
    }

    pub fn doctor_profile(&self) -> Option<&DoctorProfile> {
        match &self.profile {
            RoleProfile::Doctor(profile) => Some(profile),
            RoleProfile::Patient(_) => None,
        }
    }

    pub fn patient_profile(&self) -> Option<&PatientProfile> {
        match &self.profile {
            RoleProfile::Patient(profile) => Some(profile),
            RoleProfile::Doctor(_) => None,
        }
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_tag_selects_the_profile_payload() {
        let user: User = serde_json::from_value(json!({
            "id": "d-1",
            "name": "Dr. Amit Verma",
            "role": "doctor",
            "specialization": "General Medicine",
            "rating": 4.8,
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.role(), Role::Doctor);
        assert_eq!(
            user.doctor_profile().and_then(|p| p.specialization.as_deref()),
            Some("General Medicine")
        );
        assert!(user.patient_profile().is_none());
    }

    #[test]
    fn serializes_flat_with_role_tag() {
        let user = User {
            id: "p-1".into(),
            name: "Rahul Sharma".into(),
            email: None,
            phone: None,
            gender: Some("Male".into()),
            age: Some(27),
            address: None,
            bio: None,
            image: None,
            created_at: Utc::now(),
            profile: RoleProfile::Patient(PatientProfile {
                blood_group: Some("O+".into()),
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "patient");
        assert_eq!(value["bloodGroup"], "O+");
        assert!(value.get("specialization").is_none());
        assert!(value.get("email").is_none());
    }
}
