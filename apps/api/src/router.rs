use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use shared_database::SharedRepository;
use user_cell::router::user_routes;

pub fn create_router(repository: SharedRepository) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/users", user_routes(repository.clone()))
        .nest("/doctors", doctor_routes(repository.clone()))
        .nest("/appointments", appointment_routes(repository))
}
