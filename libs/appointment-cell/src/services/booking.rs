// libs/appointment-cell/src/services/booking.rs
use tracing::{debug, info, warn};

use shared_database::{AppointmentFilter, SharedRepository};
use shared_models::Appointment;
use shared_utils::validation::require_non_empty;

use crate::models::{AppointmentError, BookAppointmentRequest, RescheduleAppointmentRequest};

pub struct AppointmentBookingService {
    repository: SharedRepository,
}

impl AppointmentBookingService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// Reserve the first open slot matching doctor, date and time for the
    /// patient. On any failure nothing is reserved.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let doctor_id = require_non_empty("doctorId", &request.doctor_id)
            .map_err(AppointmentError::ValidationError)?;
        let patient_id = require_non_empty("patientId", &request.patient_id)
            .map_err(AppointmentError::ValidationError)?;

        info!(
            "Booking appointment for patient {} with doctor {} on {} at {}",
            patient_id,
            doctor_id,
            request.date,
            request.time.format("%H:%M")
        );

        let appointment = self
            .repository
            .book_slot(doctor_id, patient_id, request.date, request.time)
            .await
            .map_err(|e| {
                warn!("Booking failed for patient {}: {}", patient_id, e);
                AppointmentError::from(e)
            })?;

        Ok(appointment)
    }

    /// Mark the appointment cancelled and release its slot.
    pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment: {}", appointment_id);
        Ok(self.repository.cancel_appointment(appointment_id).await?)
    }

    pub async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Rescheduling appointment {} to {} at {}",
            appointment_id,
            request.new_date,
            request.new_time.format("%H:%M")
        );

        Ok(self
            .repository
            .reschedule_appointment(appointment_id, request.new_date, request.new_time)
            .await?)
    }

    pub async fn get_appointment(&self, appointment_id: &str) -> Result<Appointment, AppointmentError> {
        Ok(self.repository.get_appointment(appointment_id).await?)
    }

    pub async fn list_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        let appointments = self.repository.list_appointments(filter).await;
        debug!("Found {} appointments for filter {:?}", appointments.len(), filter);
        appointments
    }
}
