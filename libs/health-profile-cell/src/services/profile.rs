use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::AppointmentLifecycleService;
use shared_database::{AppState, Direction, Query, Repository};
use shared_models::user::{PatientProfile, Role, RoleProfile, User};

use crate::models::{
    HealthProfileError, RegisterPatientRequest, UpdateDoctorProfile, UpdatePatientProfile,
    FEMALE_AVATAR_URL, MALE_AVATAR_URL,
};

pub struct ProfileService {
    users: Repository<User>,
    appointments: AppointmentLifecycleService,
    default_doctor_id: Option<String>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: Repository::new(state.store.clone()),
            appointments: AppointmentLifecycleService::new(state),
            default_doctor_id: state.config.default_doctor_id.clone(),
        }
    }

    pub async fn patient(&self, patient_id: &str) -> Result<User, HealthProfileError> {
        debug!("Fetching patient profile {}", patient_id);
        self.user_with_role(patient_id, Role::Patient).await
    }

    pub async fn doctor(&self, doctor_id: &str) -> Result<User, HealthProfileError> {
        debug!("Fetching doctor profile {}", doctor_id);
        self.user_with_role(doctor_id, Role::Doctor).await
    }

    pub async fn update_patient(
        &self,
        patient_id: &str,
        update: UpdatePatientProfile,
    ) -> Result<User, HealthProfileError> {
        let current = self.patient(patient_id).await?;
        self.apply(current, patch_from(&update)?, Role::Patient).await
    }

    pub async fn update_doctor(
        &self,
        doctor_id: &str,
        update: UpdateDoctorProfile,
    ) -> Result<User, HealthProfileError> {
        let current = self.doctor(doctor_id).await?;
        self.apply(current, patch_from(&update)?, Role::Doctor).await
    }

    /// Every patient account, in registration order.
    pub async fn list_patients(&self) -> Result<Vec<User>, HealthProfileError> {
        let query = Query::new().eq("role", Role::Patient.to_string()).order_by("createdAt", Direction::Asc);
        Ok(self.users.find(&query).await?)
    }

    /// Creates a patient account. When the request carries both a condition
    /// and a visit mode, a same-day appointment is opened with the requested
    /// doctor, or the clinic default. Without either, only the account is created.
    pub async fn register_patient(&self, request: RegisterPatientRequest) -> Result<User, HealthProfileError> {
        if request.name.trim().is_empty() {
            return Err(HealthProfileError::ValidationError("Patient name is required".to_string()));
        }

        let visit = match (request.condition.as_deref(), request.mode.as_deref()) {
            (Some(condition), Some(mode)) => match self.visit_doctor(request.doctor_id.as_deref()) {
                Some(doctor_id) => {
                    self.doctor(&doctor_id).await?;
                    Some((doctor_id, condition.to_string(), mode.to_string()))
                }
                None => {
                    warn!("No doctor for the same-day visit of {}; DEFAULT_DOCTOR_ID is unset", request.name);
                    None
                }
            },
            _ => None,
        };

        let image = request.image.unwrap_or_else(|| default_avatar(request.gender.as_deref()).to_string());
        let patient = User {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            gender: request.gender,
            age: request.age,
            address: None,
            bio: None,
            image: Some(image),
            created_at: Utc::now(),
            profile: RoleProfile::Patient(PatientProfile {
                condition: request.condition,
                ..Default::default()
            }),
        };

        let patient = self.users.insert(&patient).await?;
        info!("Registered patient {}", patient.id);

        if let Some((doctor_id, condition, mode)) = visit {
            let appointment = self.appointments
                .create_same_day(&patient.id, &doctor_id, &condition, &mode)
                .await?;
            info!("Opened same-day visit {} for patient {}", appointment.id, patient.id);
        }

        Ok(patient)
    }

    fn visit_doctor(&self, requested: Option<&str>) -> Option<String> {
        requested.or(self.default_doctor_id.as_deref()).map(str::to_string)
    }

    async fn user_with_role(&self, id: &str, role: Role) -> Result<User, HealthProfileError> {
        match self.users.get(id).await? {
            Some(user) if user.role() == role => Ok(user),
            _ => Err(not_found(role)),
        }
    }

    async fn apply(&self, current: User, patch: Map<String, Value>, role: Role) -> Result<User, HealthProfileError> {
        if patch.is_empty() {
            return Ok(current);
        }

        debug!("Updating {} {} ({} fields)", role, current.id, patch.len());
        let updated = self.users
            .update(&current.id, patch)
            .await?
            .ok_or_else(|| not_found(role))?;

        info!("Updated {} profile {}", role, updated.id);
        Ok(updated)
    }
}

fn not_found(role: Role) -> HealthProfileError {
    match role {
        Role::Patient => HealthProfileError::PatientNotFound,
        Role::Doctor => HealthProfileError::DoctorNotFound,
    }
}

/// Present fields of an allow-list struct as a store patch.
fn patch_from<T: Serialize>(update: &T) -> Result<Map<String, Value>, HealthProfileError> {
    let value = serde_json::to_value(update).map_err(|e| HealthProfileError::ValidationError(e.to_string()))?;
    Ok(match value {
        Value::Object(fields) => fields.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Map::new(),
    })
}

pub fn default_avatar(gender: Option<&str>) -> &'static str {
    match gender {
        Some(g) if g.eq_ignore_ascii_case("female") => FEMALE_AVATAR_URL,
        _ => MALE_AVATAR_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_defaults_by_gender() {
        assert_eq!(default_avatar(Some("Female")), FEMALE_AVATAR_URL);
        assert_eq!(default_avatar(Some("Male")), MALE_AVATAR_URL);
        assert_eq!(default_avatar(None), MALE_AVATAR_URL);
    }

    #[test]
    fn patch_keeps_only_present_fields() {
        let patch = patch_from(&UpdatePatientProfile {
            blood_group: Some("O+".to_string()),
            age: Some(31),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(patch.len(), 2);
        assert_eq!(patch["bloodGroup"], "O+");
        assert_eq!(patch["age"], 31);
    }
}
