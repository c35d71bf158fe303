use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::{TimeSlot, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    /// Free text matched against name and specialization.
    pub query: Option<String>,
    pub specialization: Option<String>,
}

/// A doctor as listed in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    #[serde(flatten)]
    pub doctor: User,
    pub available_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSlotRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
    #[serde(with = "shared_models::serde_time")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSchedule {
    pub doctor_id: String,
    pub days: Vec<ScheduleDay>,
    pub total_slots: usize,
    pub booked_slots: usize,
}
