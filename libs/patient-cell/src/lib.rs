pub mod handlers;
pub mod router;
pub mod views;

pub use router::patient_routes;
