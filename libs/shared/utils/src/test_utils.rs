use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
};
use chrono::{Days, Local, NaiveDate, NaiveTime};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::{seed::sample_state, ClinicRepository, InMemoryStore, NewUser, SharedRepository};
use shared_models::{DoctorProfile, PatientProfile, RoleProfile, TimeSlot, UserRole};

/// Ids of the sample directory seeded by `TestClinic::seeded`.
pub const SAMPLE_CARDIOLOGIST_ID: &str = "1";
pub const SAMPLE_DERMATOLOGIST_ID: &str = "2";
pub const SAMPLE_PEDIATRICIAN_ID: &str = "3";
pub const SAMPLE_PATIENT_ID: &str = "4";

pub struct TestConfig {
    pub port: u16,
    pub seed_sample_data: bool,
    pub sample_slot_days: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            port: 0,
            seed_sample_data: false,
            sample_slot_days: 0,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            port: self.port,
            seed_sample_data: self.seed_sample_data,
            sample_slot_days: self.sample_slot_days,
            ..AppConfig::default()
        }
    }
}

pub struct TestUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub specialization: Option<String>,
}

impl TestUser {
    pub fn new(email: &str, name: &str, role: UserRole) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            role,
            specialization: None,
        }
    }

    pub fn doctor(email: &str, specialization: &str) -> Self {
        Self {
            specialization: Some(specialization.to_string()),
            ..Self::new(email, "Dr. Test", UserRole::Doctor)
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "Test Patient", UserRole::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "Test Admin", UserRole::Admin)
    }

    pub fn to_new_user(&self) -> NewUser {
        let profile = match self.role {
            UserRole::Doctor => RoleProfile::Doctor(DoctorProfile {
                specialization: self.specialization.clone().unwrap_or_default(),
                experience: 5,
                rating: 4.5,
            }),
            UserRole::Patient => RoleProfile::Patient(PatientProfile::default()),
            UserRole::Admin => RoleProfile::Admin,
        };

        NewUser {
            email: self.email.clone(),
            name: self.name.clone(),
            phone: None,
            profile,
        }
    }

    /// Body for `POST /users/register`.
    pub fn registration_json(&self) -> Value {
        let mut body = json!({
            "email": self.email,
            "name": self.name,
            "role": self.role,
        });
        if let Some(specialization) = &self.specialization {
            body["specialization"] = json!(specialization);
            body["experience"] = json!(5);
        }
        body
    }
}

/// An isolated store per test.
pub struct TestClinic {
    pub store: Arc<InMemoryStore>,
}

impl TestClinic {
    pub fn empty() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }

    /// The sample directory (three doctors, one patient) without slots.
    pub fn seeded() -> Self {
        let state = sample_state(today(), 0).expect("sample directory must seed");
        Self {
            store: Arc::new(InMemoryStore::from_state(state)),
        }
    }

    pub fn repository(&self) -> SharedRepository {
        self.store.clone()
    }

    pub async fn add_slot(&self, doctor_id: &str, date: NaiveDate, time: NaiveTime) -> TimeSlot {
        self.store
            .create_slot(doctor_id, date, time)
            .await
            .expect("test slot must be created")
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today()
        .checked_add_days(Days::new(days))
        .expect("date within range")
}

pub fn days_before_today(days: u64) -> NaiveDate {
    today()
        .checked_sub_days(Days::new(days))
        .expect("date within range")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date must be YYYY-MM-DD")
}

pub fn time(raw: &str) -> NaiveTime {
    shared_models::serde_time::parse_time(raw).expect("test time must be HH:MM")
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
