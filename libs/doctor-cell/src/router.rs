use axum::{
    Router,
    routing::{delete, get},
};

use shared_database::SharedRepository;

use crate::handlers;

pub fn doctor_routes(repository: SharedRepository) -> Router {
    Router::new()
        // Doctor directory
        .route("/", get(handlers::search_doctors))
        .route("/specializations", get(handlers::list_specializations))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/available-slots", get(handlers::get_available_slots))
        .route("/{doctor_id}/schedule", get(handlers::get_doctor_schedule))

        // Schedule management
        .route("/time-slots", get(handlers::list_time_slots).post(handlers::create_time_slot))
        .route("/time-slots/{slot_id}", delete(handlers::delete_time_slot))

        .with_state(repository)
}
