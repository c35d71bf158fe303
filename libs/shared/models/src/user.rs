use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Patient,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Doctor => write!(f, "doctor"),
            UserRole::Patient => write!(f, "patient"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub specialization: String,
    /// Years in practice.
    pub experience: u32,
    pub rating: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

/// Role-specific fields. Serialized flat next to the user's identity,
/// tagged by `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Doctor(DoctorProfile),
    Patient(PatientProfile),
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            RoleProfile::Doctor(_) => UserRole::Doctor,
            RoleProfile::Patient(_) => UserRole::Patient,
            RoleProfile::Admin => UserRole::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl User {
    pub fn role(&self) -> UserRole {
        self.profile.role()
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self.profile, RoleProfile::Doctor(_))
    }

    pub fn is_patient(&self) -> bool {
        matches!(self.profile, RoleProfile::Patient(_))
    }

    pub fn doctor_profile(&self) -> Option<&DoctorProfile> {
        match &self.profile {
            RoleProfile::Doctor(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn specialization(&self) -> Option<&str> {
        self.doctor_profile().map(|p| p.specialization.as_str())
    }
}
