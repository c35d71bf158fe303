use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use shared_database::{SharedRepository, StoreResult};
use shared_models::TimeSlot;

use crate::models::{CreateTimeSlotRequest, DoctorSchedule, ScheduleDay};

pub struct AvailabilityService {
    repository: SharedRepository,
}

impl AvailabilityService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// Publish a new open slot. Identical slots are allowed to coexist.
    pub async fn create_time_slot(&self, request: CreateTimeSlotRequest) -> StoreResult<TimeSlot> {
        debug!("Creating time slot for doctor: {}", request.doctor_id);

        let slot = self
            .repository
            .create_slot(&request.doctor_id, request.date, request.time)
            .await?;

        info!("Doctor {} opened slot {} on {}", slot.doctor_id, slot.id, slot.date);
        Ok(slot)
    }

    pub async fn list_time_slots(&self, doctor_id: Option<&str>) -> Vec<TimeSlot> {
        self.repository.list_slots(doctor_id).await
    }

    /// Remove an open slot. Booked slots must be freed by cancelling first.
    pub async fn delete_time_slot(&self, slot_id: &str) -> StoreResult<()> {
        debug!("Deleting time slot: {}", slot_id);
        self.repository.delete_slot(slot_id).await
    }

    /// Open slots starting strictly after `now`, earliest first.
    pub async fn get_available_slots(&self, doctor_id: &str, now: NaiveDateTime) -> StoreResult<Vec<TimeSlot>> {
        self.repository.get_doctor(doctor_id).await?;

        let mut slots: Vec<TimeSlot> = self
            .repository
            .list_slots(Some(doctor_id))
            .await
            .into_iter()
            .filter(|slot| slot.is_open() && slot.starts_at() > now)
            .collect();
        slots.sort_by_key(TimeSlot::starts_at);

        debug!("Doctor {} has {} open future slots", doctor_id, slots.len());
        Ok(slots)
    }

    /// All of a doctor's slots grouped per day, days ascending and each day
    /// ordered by time.
    pub async fn get_schedule(&self, doctor_id: &str) -> StoreResult<DoctorSchedule> {
        self.repository.get_doctor(doctor_id).await?;

        let slots = self.repository.list_slots(Some(doctor_id)).await;
        let total_slots = slots.len();
        let booked_slots = slots.iter().filter(|slot| slot.is_booked).count();

        let mut by_date: BTreeMap<_, Vec<TimeSlot>> = BTreeMap::new();
        for slot in slots {
            by_date.entry(slot.date).or_default().push(slot);
        }

        let days = by_date
            .into_iter()
            .map(|(date, mut slots)| {
                slots.sort_by_key(|slot| slot.time);
                ScheduleDay { date, slots }
            })
            .collect();

        Ok(DoctorSchedule {
            doctor_id: doctor_id.to_string(),
            days,
            total_slots,
            booked_slots,
        })
    }
}
