use chrono::{Days, NaiveDate, NaiveTime};
use tracing::info;

use shared_models::{DoctorProfile, PatientProfile, RoleProfile, User};

use crate::error::StoreResult;
use crate::memory::StoreState;

/// Hours at which every sample doctor opens a slot.
pub const SAMPLE_SLOT_HOURS: [u32; 6] = [9, 10, 11, 14, 15, 16];

fn doctor(id: &str, email: &str, name: &str, specialization: &str, experience: u32, rating: f32, phone: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        phone: Some(phone.to_string()),
        profile: RoleProfile::Doctor(DoctorProfile {
            specialization: specialization.to_string(),
            experience,
            rating,
        }),
    }
}

pub fn sample_users() -> Vec<User> {
    vec![
        doctor("1", "dr.smith@hospital.com", "Dr. John Smith", "Cardiology", 15, 4.8, "+1-555-0101"),
        doctor("2", "dr.johnson@hospital.com", "Dr. Emily Johnson", "Dermatology", 12, 4.9, "+1-555-0102"),
        doctor("3", "dr.williams@hospital.com", "Dr. Michael Williams", "Pediatrics", 10, 4.7, "+1-555-0103"),
        User {
            id: "4".to_string(),
            email: "patient@email.com".to_string(),
            name: "John Doe".to_string(),
            phone: Some("+1-555-0201".to_string()),
            profile: RoleProfile::Patient(PatientProfile {
                date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15),
                medical_history: None,
            }),
        },
    ]
}

/// Sample directory plus a week-style grid of open slots for every doctor,
/// starting the day after `today`.
pub fn sample_state(today: NaiveDate, days: u32) -> StoreResult<StoreState> {
    let mut state = StoreState::with_users(sample_users());
    let doctor_ids: Vec<String> = state
        .users()
        .iter()
        .filter(|u| u.is_doctor())
        .map(|u| u.id.clone())
        .collect();

    let times: Vec<NaiveTime> = SAMPLE_SLOT_HOURS
        .iter()
        .filter_map(|&hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect();

    for doctor_id in &doctor_ids {
        for offset in 1..=u64::from(days) {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            for &time in &times {
                state.create_slot(doctor_id, date, time)?;
            }
        }
    }

    info!(
        "Seeded {} users and {} time slots",
        state.users().len(),
        state.slots().len()
    );
    Ok(state)
}
