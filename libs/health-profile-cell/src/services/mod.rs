pub mod document;
pub mod prescription;
pub mod profile;
pub mod vitals;

pub use document::DocumentService;
pub use prescription::PrescriptionService;
pub use profile::ProfileService;
pub use vitals::VitalService;
