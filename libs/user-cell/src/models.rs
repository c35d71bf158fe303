use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_database::StoreError;
use shared_models::UserRole;

/// Starting rating for newly registered doctors.
pub const DEFAULT_DOCTOR_RATING: f32 = 4.5;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,

    // Doctor fields
    pub specialization: Option<String>,
    pub experience: Option<u32>,

    // Patient fields
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailLookupQuery {
    pub email: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
