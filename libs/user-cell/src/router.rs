use axum::{
    Router,
    routing::{get, post},
};

use shared_database::SharedRepository;

use crate::handlers;

pub fn user_routes(repository: SharedRepository) -> Router {
    Router::new()
        .route("/register", post(handlers::register_user))
        .route("/lookup", get(handlers::lookup_user))
        .route("/{user_id}", get(handlers::get_user))
        .with_state(repository)
}
