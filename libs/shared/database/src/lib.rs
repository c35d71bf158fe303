pub mod error;
pub mod memory;
pub mod repository;
pub mod seed;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, StoreState};
pub use repository::{AppointmentFilter, ClinicRepository, NewUser, SharedRepository};
