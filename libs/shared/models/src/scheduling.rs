use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// TIME SLOTS
// ==============================================================================

/// A bookable (doctor, date, time) unit published by a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    #[serde(with = "crate::serde_time")]
    pub time: NaiveTime,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

impl TimeSlot {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn matches(&self, doctor_id: &str, date: NaiveDate, time: NaiveTime) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.time == time
    }

    pub fn is_open(&self) -> bool {
        !self.is_booked
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    /// The slot this appointment reserved.
    pub slot_id: String,
    pub date: NaiveDate,
    #[serde(with = "crate::serde_time")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub doctor_name: String,
    pub patient_name: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Status as a reader sees it at `now`: a scheduled visit whose start has
    /// passed counts as completed. The stored status never changes for this.
    pub fn effective_status(&self, now: NaiveDateTime) -> AppointmentStatus {
        match self.status {
            AppointmentStatus::Scheduled if self.starts_at() <= now => AppointmentStatus::Completed,
            status => status,
        }
    }

    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.status == AppointmentStatus::Scheduled && self.starts_at() > now
    }
}
