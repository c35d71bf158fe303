// libs/appointment-cell/src/router.rs
use axum::{
    Router,
    routing::{get, post, put},
};

use shared_database::SharedRepository;

use crate::handlers;

pub fn appointment_routes(repository: SharedRepository) -> Router {
    Router::new()
        // Core booking
        .route("/", post(handlers::book_appointment).get(handlers::list_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .route("/{appointment_id}/reschedule", put(handlers::reschedule_appointment))

        // Overviews
        .route("/patients/{patient_id}/overview", get(handlers::get_patient_overview))
        .route("/doctors/{doctor_id}/dashboard", get(handlers::get_doctor_dashboard))

        .with_state(repository)
}
