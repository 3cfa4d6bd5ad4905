pub mod error;
pub mod extract;
pub mod user;

pub use error::AppError;
pub use extract::AppJson;
pub use user::{DoctorProfile, PatientProfile, Role, RoleProfile, User};
