// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_database::StoreError;
use shared_models::{Appointment, AppointmentStatus};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    #[serde(with = "shared_models::serde_time")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleAppointmentRequest {
    pub new_date: NaiveDate,
    #[serde(with = "shared_models::serde_time")]
    pub new_time: NaiveTime,
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

pub const DASHBOARD_UPCOMING_LIMIT: usize = 5;

/// An appointment together with the status a reader should see right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub effective_status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointmentOverview {
    pub patient_id: String,
    pub upcoming: Vec<AppointmentView>,
    pub past: Vec<AppointmentView>,
    pub cancelled: Vec<AppointmentView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub doctor_id: String,
    pub total_appointments: usize,
    /// Distinct patients across all of the doctor's appointments.
    pub total_patients: usize,
    /// Scheduled and still ahead, soonest first, at most
    /// `DASHBOARD_UPCOMING_LIMIT` entries.
    pub upcoming: Vec<Appointment>,
    /// Scheduled for today's date, whether or not already started.
    pub today: Vec<Appointment>,
    pub available_slots: usize,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
