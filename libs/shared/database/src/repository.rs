use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use shared_models::{Appointment, RoleProfile, TimeSlot, User, UserRole};

use crate::error::StoreResult;

pub type SharedRepository = Arc<dyn ClinicRepository>;

/// Registration payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub profile: RoleProfile,
}

/// Narrows an appointment listing to one participant.
///
/// Without a user id every appointment is returned. With one, `role` picks
/// whether it is matched against the doctor or the patient side; admin or no
/// role falls back to the full list.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub user_id: Option<String>,
    pub role: Option<UserRole>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(doctor_id.into()),
            role: Some(UserRole::Doctor),
        }
    }

    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(patient_id.into()),
            role: Some(UserRole::Patient),
        }
    }

    pub fn accepts(&self, appointment: &Appointment) -> bool {
        match (self.user_id.as_deref(), self.role) {
            (Some(id), Some(UserRole::Doctor)) => appointment.doctor_id == id,
            (Some(id), Some(UserRole::Patient)) => appointment.patient_id == id,
            _ => true,
        }
    }
}

/// The clinic's system of record: user directory, doctors' time slots and
/// appointments.
///
/// `book_slot` and `cancel_appointment` must be atomic with respect to each
/// other: a slot is booked by at most one appointment at a time.
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn register_user(&self, user: NewUser) -> StoreResult<User>;
    async fn get_user(&self, user_id: &str) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;
    async fn list_doctors(&self) -> Vec<User>;
    async fn get_doctor(&self, doctor_id: &str) -> StoreResult<User>;

    async fn create_slot(&self, doctor_id: &str, date: NaiveDate, time: NaiveTime) -> StoreResult<TimeSlot>;
    async fn list_slots(&self, doctor_id: Option<&str>) -> Vec<TimeSlot>;
    async fn delete_slot(&self, slot_id: &str) -> StoreResult<()>;

    async fn book_slot(
        &self,
        doctor_id: &str,
        patient_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment>;
    async fn cancel_appointment(&self, appointment_id: &str) -> StoreResult<Appointment>;
    async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment>;
    async fn get_appointment(&self, appointment_id: &str) -> StoreResult<Appointment>;
    async fn list_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment>;
}
