use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_database::SharedRepository;
use shared_models::error::AppError;
use shared_utils::clock::local_now;
use shared_utils::validation::require_non_empty;

use crate::models::{CreateTimeSlotRequest, DoctorSearchFilters};
use crate::services::{availability::AvailabilityService, doctor::DoctorService};

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub q: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotQuery {
    pub doctor_id: Option<String>,
}

// ==============================================================================
// DOCTOR DIRECTORY
// ==============================================================================

#[axum::debug_handler]
pub async fn search_doctors(
    State(repository): State<SharedRepository>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(Arc::clone(&repository));

    let filters = DoctorSearchFilters {
        query: query.q,
        specialization: query.specialization,
    };
    let doctors = doctor_service.search_doctors(&filters).await;

    Ok(Json(json!({
        "success": true,
        "total": doctors.len(),
        "doctors": doctors,
    })))
}

#[axum::debug_handler]
pub async fn list_specializations(
    State(repository): State<SharedRepository>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(Arc::clone(&repository));
    let specializations = doctor_service.list_specializations().await;

    Ok(Json(json!({
        "success": true,
        "specializations": specializations,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(repository): State<SharedRepository>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(Arc::clone(&repository));
    let doctor = doctor_service.get_doctor(&doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(repository): State<SharedRepository>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(Arc::clone(&repository));
    let slots = availability_service
        .get_available_slots(&doctor_id, local_now())
        .await?;

    Ok(Json(json!({
        "success": true,
        "doctorId": doctor_id,
        "slots": slots,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(repository): State<SharedRepository>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(Arc::clone(&repository));
    let schedule = availability_service.get_schedule(&doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule,
    })))
}

// ==============================================================================
// TIME SLOT MANAGEMENT
// ==============================================================================

#[axum::debug_handler]
pub async fn create_time_slot(
    State(repository): State<SharedRepository>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_non_empty("doctorId", &request.doctor_id).map_err(AppError::ValidationError)?;

    let availability_service = AvailabilityService::new(Arc::clone(&repository));
    let slot = availability_service.create_time_slot(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "slot": slot,
            "message": "Time slot created",
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_time_slots(
    State(repository): State<SharedRepository>,
    Query(query): Query<TimeSlotQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(Arc::clone(&repository));
    let slots = availability_service
        .list_time_slots(query.doctor_id.as_deref())
        .await;

    Ok(Json(json!({
        "success": true,
        "slots": slots,
    })))
}

#[axum::debug_handler]
pub async fn delete_time_slot(
    State(repository): State<SharedRepository>,
    Path(slot_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(Arc::clone(&repository));
    availability_service.delete_time_slot(&slot_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Time slot deleted",
    })))
}
