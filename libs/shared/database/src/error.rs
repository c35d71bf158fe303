use thiserror::Error;

use shared_models::error::AppError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Every failure leaves the store exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Time slot not found: {0}")]
    SlotNotFound(String),

    #[error("No open slot for doctor {doctor_id} on {date} at {time}")]
    SlotUnavailable {
        doctor_id: String,
        date: String,
        time: String,
    },

    #[error("Time slot {0} is booked and cannot be deleted")]
    SlotBooked(String),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Appointment {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("A user with email {0} already exists")]
    EmailTaken(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(_)
            | StoreError::DoctorNotFound(_)
            | StoreError::PatientNotFound(_)
            | StoreError::SlotNotFound(_)
            | StoreError::AppointmentNotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::SlotUnavailable { .. }
            | StoreError::SlotBooked(_)
            | StoreError::AlreadyCancelled(_)
            | StoreError::EmailTaken(_) => AppError::Conflict(err.to_string()),
        }
    }
}
