use tracing::{debug, info, warn};

use shared_database::{NewUser, SharedRepository};
use shared_models::{DoctorProfile, PatientProfile, RoleProfile, User, UserRole};
use shared_utils::validation::{require_non_empty, validate_email, validate_phone};

use crate::models::{RegisterUserRequest, UserError, DEFAULT_DOCTOR_RATING};

pub struct UserService {
    repository: SharedRepository,
}

impl UserService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<User, UserError> {
        let new_user = Self::validate_registration(request)?;
        info!("Registering {} account for {}", new_user.profile.role(), new_user.email);

        self.repository.register_user(new_user).await.map_err(|e| {
            warn!("Registration failed: {}", e);
            UserError::from(e)
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, UserError> {
        debug!("Fetching user: {}", user_id);
        Ok(self.repository.get_user(user_id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, UserError> {
        let email = require_non_empty("email", email).map_err(UserError::ValidationError)?;
        debug!("Looking up user by email: {}", email);
        Ok(self.repository.find_user_by_email(email).await?)
    }

    fn validate_registration(request: RegisterUserRequest) -> Result<NewUser, UserError> {
        let name = require_non_empty("name", &request.name).map_err(UserError::ValidationError)?;
        let email = request.email.trim();
        if !validate_email(email) {
            return Err(UserError::ValidationError(format!("Invalid email address: {}", email)));
        }

        let phone = request
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(phone) = phone {
            if !validate_phone(phone) {
                return Err(UserError::ValidationError(format!("Invalid phone number: {}", phone)));
            }
        }

        let profile = match request.role {
            UserRole::Doctor => {
                let specialization = request
                    .specialization
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        UserError::ValidationError("Doctors must have a specialization".to_string())
                    })?;
                RoleProfile::Doctor(DoctorProfile {
                    specialization: specialization.to_string(),
                    experience: request.experience.unwrap_or(0),
                    rating: DEFAULT_DOCTOR_RATING,
                })
            }
            UserRole::Patient => RoleProfile::Patient(PatientProfile {
                date_of_birth: request.date_of_birth,
                medical_history: request.medical_history.filter(|h| !h.trim().is_empty()),
            }),
            UserRole::Admin => RoleProfile::Admin,
        };

        Ok(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            profile,
        })
    }
}
