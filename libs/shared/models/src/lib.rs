pub mod error;
pub mod serde_time;
pub mod scheduling;
pub mod user;

pub use error::AppError;
pub use scheduling::{Appointment, AppointmentStatus, TimeSlot};
pub use user::{DoctorProfile, PatientProfile, RoleProfile, User, UserRole};
