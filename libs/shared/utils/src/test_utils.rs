use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{AppState, InMemoryStore, Repository};
use shared_models::user::{DoctorProfile, PatientProfile, RoleProfile, User};

/// An in-memory service plus helpers for seeding accounts.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: Arc<AppState>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::with_config(AppConfig::in_memory())
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = Arc::new(AppState::new(config, store.clone()));
        Self { store, state }
    }

    pub fn users(&self) -> Repository<User> {
        Repository::new(self.state.store.clone())
    }

    pub async fn seed_doctor(&self, name: &str) -> User {
        let doctor = TestUser::doctor(name).to_user();
        self.users().insert(&doctor).await.expect("seed doctor")
    }

    pub async fn seed_patient(&self, name: &str) -> User {
        let patient = TestUser::patient(name).to_user();
        self.users().insert(&patient).await.expect("seed patient")
    }

    pub async fn seed(&self, user: User) -> User {
        self.users().insert(&user).await.expect("seed user")
    }
}

pub struct TestUser {
    pub id: String,
    pub name: String,
    pub profile: RoleProfile,
}

impl TestUser {
    pub fn doctor(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            profile: RoleProfile::Doctor(DoctorProfile {
                specialization: Some("General Medicine".to_string()),
                rating: Some(4.8),
                reviews: Some(210),
                ..Default::default()
            }),
        }
    }

    pub fn patient(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            profile: RoleProfile::Patient(PatientProfile::default()),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(format!("{}@example.com", self.name.to_lowercase().replace(' ', "."))),
            phone: None,
            gender: None,
            age: None,
            address: None,
            bio: None,
            image: None,
            created_at: Utc::now(),
            profile: self.profile.clone(),
        }
    }
}
