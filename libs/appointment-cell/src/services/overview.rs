use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use shared_database::{AppointmentFilter, SharedRepository, StoreError};
use shared_models::{Appointment, AppointmentStatus};

use crate::models::{
    AppointmentError, AppointmentView, DoctorDashboard, PatientAppointmentOverview,
    DASHBOARD_UPCOMING_LIMIT,
};

/// Read-side views over appointments. "Completed" is derived here from the
/// clock; the store never writes it.
pub struct AppointmentOverviewService {
    repository: SharedRepository,
}

impl AppointmentOverviewService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn patient_overview(
        &self,
        patient_id: &str,
        now: NaiveDateTime,
    ) -> Result<PatientAppointmentOverview, AppointmentError> {
        let patient = self.repository.get_user(patient_id).await?;
        if !patient.is_patient() {
            return Err(StoreError::PatientNotFound(patient_id.to_string()).into());
        }

        let mut overview = PatientAppointmentOverview {
            patient_id: patient.id,
            upcoming: Vec::new(),
            past: Vec::new(),
            cancelled: Vec::new(),
        };

        for appointment in self
            .repository
            .list_appointments(&AppointmentFilter::for_patient(patient_id))
            .await
        {
            let effective_status = appointment.effective_status(now);
            let bucket = match effective_status {
                AppointmentStatus::Cancelled => &mut overview.cancelled,
                AppointmentStatus::Completed => &mut overview.past,
                AppointmentStatus::Scheduled => &mut overview.upcoming,
            };
            bucket.push(AppointmentView {
                appointment,
                effective_status,
            });
        }

        overview.upcoming.sort_by_key(|view| view.appointment.starts_at());
        // Most recent first.
        overview.past.sort_by_key(|view| std::cmp::Reverse(view.appointment.starts_at()));

        debug!(
            "Patient {}: {} upcoming, {} past, {} cancelled",
            patient_id,
            overview.upcoming.len(),
            overview.past.len(),
            overview.cancelled.len()
        );
        Ok(overview)
    }

    pub async fn doctor_dashboard(
        &self,
        doctor_id: &str,
        now: NaiveDateTime,
    ) -> Result<DoctorDashboard, AppointmentError> {
        self.repository.get_doctor(doctor_id).await?;

        let appointments = self
            .repository
            .list_appointments(&AppointmentFilter::for_doctor(doctor_id))
            .await;

        let mut upcoming: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.is_upcoming(now))
            .cloned()
            .collect();
        upcoming.sort_by_key(Appointment::starts_at);
        upcoming.truncate(DASHBOARD_UPCOMING_LIMIT);

        let total_patients = appointments
            .iter()
            .map(|a| a.patient_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut today: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled && a.date == now.date())
            .cloned()
            .collect();
        today.sort_by_key(|a| a.time);

        let available_slots = self
            .repository
            .list_slots(Some(doctor_id))
            .await
            .iter()
            .filter(|slot| slot.is_open() && slot.starts_at() > now)
            .count();

        Ok(DoctorDashboard {
            doctor_id: doctor_id.to_string(),
            total_appointments: appointments.len(),
            total_patients,
            upcoming,
            today,
            available_slots,
        })
    }
}
