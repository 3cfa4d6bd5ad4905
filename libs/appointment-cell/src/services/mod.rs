pub mod lifecycle;

pub use lifecycle::AppointmentLifecycleService;
