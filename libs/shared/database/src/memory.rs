use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::serde_time::format_time;
use shared_models::{Appointment, AppointmentStatus, RoleProfile, TimeSlot, User};

use crate::error::{StoreError, StoreResult};
use crate::repository::{AppointmentFilter, ClinicRepository, NewUser};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Plain clinic state. All transitions are synchronous and either apply
/// completely or leave the state untouched.
#[derive(Debug, Default, Clone)]
pub struct StoreState {
    users: Vec<User>,
    slots: Vec<TimeSlot>,
    appointments: Vec<Appointment>,
}

impl StoreState {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn doctor(&self, doctor_id: &str) -> Option<&User> {
        self.user(doctor_id).filter(|u| u.is_doctor())
    }

    fn patient(&self, patient_id: &str) -> Option<&User> {
        self.user(patient_id).filter(|u| u.is_patient())
    }

    pub fn register_user(&mut self, new_user: NewUser) -> StoreResult<User> {
        let email = new_user.email.trim().to_string();
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(StoreError::EmailTaken(email));
        }

        let user = User {
            id: new_id(),
            email,
            name: new_user.name,
            phone: new_user.phone,
            profile: new_user.profile,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn create_slot(&mut self, doctor_id: &str, date: NaiveDate, time: NaiveTime) -> StoreResult<TimeSlot> {
        if self.doctor(doctor_id).is_none() {
            return Err(StoreError::DoctorNotFound(doctor_id.to_string()));
        }

        // Identical slots may coexist.
        let slot = TimeSlot {
            id: new_id(),
            doctor_id: doctor_id.to_string(),
            date,
            time,
            is_booked: false,
            patient_id: None,
        };
        self.slots.push(slot.clone());
        Ok(slot)
    }

    pub fn list_slots(&self, doctor_id: Option<&str>) -> Vec<TimeSlot> {
        self.slots
            .iter()
            .filter(|s| doctor_id.map_or(true, |id| s.doctor_id == id))
            .cloned()
            .collect()
    }

    pub fn delete_slot(&mut self, slot_id: &str) -> StoreResult<()> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == slot_id)
            .ok_or_else(|| StoreError::SlotNotFound(slot_id.to_string()))?;

        if self.slots[index].is_booked {
            return Err(StoreError::SlotBooked(slot_id.to_string()));
        }

        self.slots.remove(index);
        Ok(())
    }

    pub fn book_slot(
        &mut self,
        doctor_id: &str,
        patient_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment> {
        // Resolve everything before touching state.
        let doctor = self
            .doctor(doctor_id)
            .ok_or_else(|| StoreError::DoctorNotFound(doctor_id.to_string()))?;
        let patient = self
            .patient(patient_id)
            .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))?;
        let slot_index = self
            .slots
            .iter()
            .position(|s| s.is_open() && s.matches(doctor_id, date, time))
            .ok_or_else(|| StoreError::SlotUnavailable {
                doctor_id: doctor_id.to_string(),
                date: date.to_string(),
                time: format_time(&time),
            })?;

        let appointment = Appointment {
            id: new_id(),
            doctor_id: doctor_id.to_string(),
            patient_id: patient_id.to_string(),
            slot_id: self.slots[slot_index].id.clone(),
            date,
            time,
            status: AppointmentStatus::Scheduled,
            doctor_name: doctor.name.clone(),
            patient_name: patient.name.clone(),
            specialization: doctor.specialization().unwrap_or_default().to_string(),
            created_at: Utc::now(),
        };

        let slot = &mut self.slots[slot_index];
        slot.is_booked = true;
        slot.patient_id = Some(patient_id.to_string());

        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    pub fn cancel_appointment(&mut self, appointment_id: &str) -> StoreResult<Appointment> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or_else(|| StoreError::AppointmentNotFound(appointment_id.to_string()))?;

        if self.appointments[index].is_cancelled() {
            return Err(StoreError::AlreadyCancelled(appointment_id.to_string()));
        }

        let appointment = &mut self.appointments[index];
        appointment.status = AppointmentStatus::Cancelled;

        let held_by_appointment = |s: &TimeSlot| {
            s.is_booked && s.patient_id.as_deref() == Some(appointment.patient_id.as_str())
        };
        let slot = self
            .slots
            .iter()
            .position(|s| s.id == appointment.slot_id && held_by_appointment(s))
            .or_else(|| {
                self.slots.iter().position(|s| {
                    held_by_appointment(s)
                        && s.matches(&appointment.doctor_id, appointment.date, appointment.time)
                })
            });

        if let Some(slot_index) = slot {
            let slot = &mut self.slots[slot_index];
            slot.is_booked = false;
            slot.patient_id = None;
        }

        Ok(appointment.clone())
    }

    /// Move a scheduled appointment onto another open slot of the same doctor.
    /// The new slot is reserved and the old one released in one step.
    pub fn reschedule_appointment(
        &mut self,
        appointment_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or_else(|| StoreError::AppointmentNotFound(appointment_id.to_string()))?;

        let current = &self.appointments[index];
        if current.is_cancelled() {
            return Err(StoreError::AlreadyCancelled(appointment_id.to_string()));
        }
        let doctor_id = current.doctor_id.clone();
        let patient_id = current.patient_id.clone();
        let old_slot_id = current.slot_id.clone();

        let new_slot_index = self
            .slots
            .iter()
            .position(|s| s.is_open() && s.matches(&doctor_id, date, time))
            .ok_or_else(|| StoreError::SlotUnavailable {
                doctor_id: doctor_id.clone(),
                date: date.to_string(),
                time: format_time(&time),
            })?;

        if let Some(old_slot) = self
            .slots
            .iter_mut()
            .find(|s| s.id == old_slot_id && s.is_booked && s.patient_id.as_deref() == Some(patient_id.as_str()))
        {
            old_slot.is_booked = false;
            old_slot.patient_id = None;
        }

        let new_slot = &mut self.slots[new_slot_index];
        new_slot.is_booked = true;
        new_slot.patient_id = Some(patient_id);

        let appointment = &mut self.appointments[index];
        appointment.slot_id = new_slot.id.clone();
        appointment.date = date;
        appointment.time = time;
        Ok(appointment.clone())
    }

    pub fn list_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| filter.accepts(a))
            .cloned()
            .collect()
    }
}

/// Process-owned clinic store. One write lock covers each whole transition,
/// so concurrent requests cannot double-book a slot.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state, for inspection.
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ClinicRepository for InMemoryStore {
    async fn register_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let user = state.register_user(user)?;
        info!("Registered {} {} ({})", user.role(), user.id, user.email);
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.state
            .read()
            .await
            .user(user_id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let email = email.trim();
        self.state
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))
    }

    async fn list_doctors(&self) -> Vec<User> {
        self.state
            .read()
            .await
            .users
            .iter()
            .filter(|u| matches!(u.profile, RoleProfile::Doctor(_)))
            .cloned()
            .collect()
    }

    async fn get_doctor(&self, doctor_id: &str) -> StoreResult<User> {
        self.state
            .read()
            .await
            .doctor(doctor_id)
            .cloned()
            .ok_or_else(|| StoreError::DoctorNotFound(doctor_id.to_string()))
    }

    async fn create_slot(&self, doctor_id: &str, date: NaiveDate, time: NaiveTime) -> StoreResult<TimeSlot> {
        let slot = self.state.write().await.create_slot(doctor_id, date, time)?;
        debug!("Created slot {} for doctor {} on {} at {}", slot.id, doctor_id, date, format_time(&time));
        Ok(slot)
    }

    async fn list_slots(&self, doctor_id: Option<&str>) -> Vec<TimeSlot> {
        self.state.read().await.list_slots(doctor_id)
    }

    async fn delete_slot(&self, slot_id: &str) -> StoreResult<()> {
        self.state.write().await.delete_slot(slot_id)?;
        debug!("Deleted slot {}", slot_id);
        Ok(())
    }

    async fn book_slot(
        &self,
        doctor_id: &str,
        patient_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment> {
        let appointment = self
            .state
            .write()
            .await
            .book_slot(doctor_id, patient_id, date, time)?;
        info!(
            "Booked appointment {} (slot {}) for patient {} with doctor {}",
            appointment.id, appointment.slot_id, patient_id, doctor_id
        );
        Ok(appointment)
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        let appointment = self.state.write().await.cancel_appointment(appointment_id)?;
        info!("Cancelled appointment {} and released slot {}", appointment.id, appointment.slot_id);
        Ok(appointment)
    }

    async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StoreResult<Appointment> {
        let appointment = self
            .state
            .write()
            .await
            .reschedule_appointment(appointment_id, date, time)?;
        info!(
            "Rescheduled appointment {} to {} at {} (slot {})",
            appointment.id,
            date,
            format_time(&time),
            appointment.slot_id
        );
        Ok(appointment)
    }

    async fn get_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        self.state
            .read()
            .await
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned()
            .ok_or_else(|| StoreError::AppointmentNotFound(appointment_id.to_string()))
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        self.state.read().await.list_appointments(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::{DoctorProfile, PatientProfile, UserRole};

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn time(raw: &str) -> NaiveTime {
        shared_models::serde_time::parse_time(raw).unwrap()
    }

    fn user(id: &str, name: &str, profile: RoleProfile) -> User {
        User {
            id: id.into(),
            email: format!("{}@clinic.test", id),
            name: name.into(),
            phone: None,
            profile,
        }
    }

    fn state() -> StoreState {
        StoreState::with_users(vec![
            user(
                "1",
                "Dr. John Smith",
                RoleProfile::Doctor(DoctorProfile {
                    specialization: "Cardiology".into(),
                    experience: 15,
                    rating: 4.8,
                }),
            ),
            user("4", "John Doe", RoleProfile::Patient(PatientProfile::default())),
            user("9", "Ada Admin", RoleProfile::Admin),
        ])
    }

    #[test]
    fn booking_an_open_slot_reserves_it() {
        let mut state = state();
        let slot = state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();

        let appointment = state
            .book_slot("1", "4", date("2024-07-01"), time("09:00"))
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.slot_id, slot.id);
        assert_eq!(appointment.doctor_name, "Dr. John Smith");
        assert_eq!(appointment.patient_name, "John Doe");
        assert_eq!(appointment.specialization, "Cardiology");

        let booked = &state.slots()[0];
        assert!(booked.is_booked);
        assert_eq!(booked.patient_id.as_deref(), Some("4"));
        assert_eq!(state.appointments().len(), 1);
    }

    #[test]
    fn second_booking_of_same_slot_fails_without_side_effects() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        let before = state.clone();

        let second = state.book_slot("1", "4", date("2024-07-01"), time("09:00"));

        assert_matches!(second, Err(StoreError::SlotUnavailable { .. }));
        assert_eq!(state.slots(), before.slots());
        assert_eq!(state.appointments().len(), 1);
    }

    #[test]
    fn unknown_participants_do_not_consume_the_slot() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();

        assert_matches!(
            state.book_slot("2", "4", date("2024-07-01"), time("09:00")),
            Err(StoreError::DoctorNotFound(id)) if id == "2"
        );
        // A doctor id is not a patient.
        assert_matches!(
            state.book_slot("1", "1", date("2024-07-01"), time("09:00")),
            Err(StoreError::PatientNotFound(_))
        );
        assert_matches!(
            state.book_slot("1", "4", date("2024-07-01"), time("10:00")),
            Err(StoreError::SlotUnavailable { .. })
        );

        assert!(state.slots()[0].is_open());
        assert!(state.appointments().is_empty());
    }

    #[test]
    fn duplicate_slots_book_independently() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();

        let first = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        let second = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        assert_ne!(first.slot_id, second.slot_id);

        // Cancelling the second frees exactly its own slot.
        state.cancel_appointment(&second.id).unwrap();
        let first_slot = state.slots().iter().find(|s| s.id == first.slot_id).unwrap();
        let second_slot = state.slots().iter().find(|s| s.id == second.slot_id).unwrap();
        assert!(first_slot.is_booked);
        assert!(second_slot.is_open());
    }

    #[test]
    fn cancel_frees_slot_for_rebooking() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        let appointment = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();

        let cancelled = state.cancel_appointment(&appointment.id).unwrap();

        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        assert!(state.slots()[0].is_open());
        assert_eq!(state.slots()[0].patient_id, None);
        assert!(state.book_slot("1", "4", date("2024-07-01"), time("09:00")).is_ok());
    }

    #[test]
    fn cancel_twice_is_rejected_and_leaves_rebooked_slot_alone() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        let first = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        state.cancel_appointment(&first.id).unwrap();
        let rebooked = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();

        assert_matches!(
            state.cancel_appointment(&first.id),
            Err(StoreError::AlreadyCancelled(_))
        );
        assert!(state.slots()[0].is_booked);
        assert_eq!(rebooked.slot_id, state.slots()[0].id);
    }

    #[test]
    fn cancel_unknown_appointment_mutates_nothing() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        let before = state.clone();

        assert_matches!(
            state.cancel_appointment("missing"),
            Err(StoreError::AppointmentNotFound(_))
        );
        assert_eq!(state.slots(), before.slots());
        assert_eq!(state.appointments(), before.appointments());
    }

    #[test]
    fn reschedule_moves_the_reservation() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        let later = state.create_slot("1", date("2024-07-02"), time("14:00")).unwrap();
        let appointment = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();

        let moved = state
            .reschedule_appointment(&appointment.id, date("2024-07-02"), time("14:00"))
            .unwrap();

        assert_eq!(moved.id, appointment.id);
        assert_eq!(moved.slot_id, later.id);
        assert_eq!(moved.status, AppointmentStatus::Scheduled);
        assert!(state.slots()[0].is_open());
        assert!(state.slots()[1].is_booked);
        assert_eq!(state.slots()[1].patient_id.as_deref(), Some("4"));
    }

    #[test]
    fn reschedule_to_taken_slot_changes_nothing() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        let appointment = state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();
        let before = state.clone();

        assert_matches!(
            state.reschedule_appointment(&appointment.id, date("2024-07-01"), time("09:00")),
            Err(StoreError::SlotUnavailable { .. })
        );
        assert_eq!(state.slots(), before.slots());
        assert_eq!(state.appointments(), before.appointments());
    }

    #[test]
    fn booked_slot_cannot_be_deleted() {
        let mut state = state();
        let open = state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        let taken = state.create_slot("1", date("2024-07-01"), time("10:00")).unwrap();
        state.book_slot("1", "4", date("2024-07-01"), time("10:00")).unwrap();

        assert_matches!(state.delete_slot(&taken.id), Err(StoreError::SlotBooked(_)));
        assert!(state.delete_slot(&open.id).is_ok());
        assert_matches!(state.delete_slot(&open.id), Err(StoreError::SlotNotFound(_)));
        assert_eq!(state.slots().len(), 1);
    }

    #[test]
    fn slots_require_a_known_doctor() {
        let mut state = state();
        assert_matches!(
            state.create_slot("4", date("2024-07-01"), time("09:00")),
            Err(StoreError::DoctorNotFound(_))
        );
        assert!(state.slots().is_empty());
    }

    #[test]
    fn appointment_filter_follows_role() {
        let mut state = state();
        state.create_slot("1", date("2024-07-01"), time("09:00")).unwrap();
        state.book_slot("1", "4", date("2024-07-01"), time("09:00")).unwrap();

        assert_eq!(state.list_appointments(&AppointmentFilter::for_doctor("1")).len(), 1);
        assert_eq!(state.list_appointments(&AppointmentFilter::for_patient("1")).len(), 0);
        assert_eq!(state.list_appointments(&AppointmentFilter::for_patient("4")).len(), 1);
        let admin = AppointmentFilter {
            user_id: Some("9".into()),
            role: Some(UserRole::Admin),
        };
        assert_eq!(state.list_appointments(&admin).len(), 1);
        assert_eq!(state.list_appointments(&AppointmentFilter::default()).len(), 1);
    }

    #[test]
    fn registration_rejects_duplicate_email() {
        let mut state = state();
        let new_user = NewUser {
            email: "1@CLINIC.test".into(),
            name: "Someone Else".into(),
            phone: None,
            profile: RoleProfile::Patient(PatientProfile::default()),
        };
        assert_matches!(state.register_user(new_user), Err(StoreError::EmailTaken(_)));
        assert_eq!(state.users().len(), 3);
    }
}
