use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use shared_database::{SharedRepository, StoreResult};
use shared_models::User;

use crate::models::{DoctorSearchFilters, DoctorSummary};

pub struct DoctorService {
    repository: SharedRepository,
}

impl DoctorService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> StoreResult<User> {
        debug!("Fetching doctor: {}", doctor_id);
        self.repository.get_doctor(doctor_id).await
    }

    /// Doctors matching the filters, each with its count of open slots.
    pub async fn search_doctors(&self, filters: &DoctorSearchFilters) -> Vec<DoctorSummary> {
        debug!("Searching doctors with filters: {:?}", filters);

        let needle = filters
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let specialization = filters
            .specialization
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut open_slots: HashMap<String, usize> = HashMap::new();
        for slot in self.repository.list_slots(None).await {
            if slot.is_open() {
                *open_slots.entry(slot.doctor_id).or_default() += 1;
            }
        }

        self.repository
            .list_doctors()
            .await
            .into_iter()
            .filter(|doctor| {
                let doctor_specialization = doctor.specialization().unwrap_or_default();
                let text_match = needle.as_ref().map_or(true, |needle| {
                    doctor.name.to_lowercase().contains(needle)
                        || doctor_specialization.to_lowercase().contains(needle)
                });
                let specialization_match = specialization.map_or(true, |wanted| {
                    doctor_specialization.eq_ignore_ascii_case(wanted)
                });
                text_match && specialization_match
            })
            .map(|doctor| DoctorSummary {
                available_slots: open_slots.get(&doctor.id).copied().unwrap_or(0),
                doctor,
            })
            .collect()
    }

    pub async fn list_specializations(&self) -> Vec<String> {
        self.repository
            .list_doctors()
            .await
            .iter()
            .filter_map(|doctor| doctor.specialization().map(str::to_string))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
