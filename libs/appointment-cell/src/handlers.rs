// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_database::{AppointmentFilter, SharedRepository};
use shared_models::error::AppError;
use shared_models::UserRole;
use shared_utils::clock::local_now;

use crate::models::{AppointmentError, BookAppointmentRequest, RescheduleAppointmentRequest};
use crate::services::{AppointmentBookingService, AppointmentOverviewService};

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQueryParams {
    pub user_id: Option<String>,
    pub role: Option<String>,
}

impl AppointmentQueryParams {
    fn into_filter(self) -> Result<AppointmentFilter, AppError> {
        let role = self
            .role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(str::parse::<UserRole>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(AppointmentFilter {
            user_id: self.user_id.filter(|id| !id.trim().is_empty()),
            role,
        })
    }
}

fn to_app_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::Store(e) => AppError::from(e),
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
    }
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(repository): State<SharedRepository>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = AppointmentBookingService::new(Arc::clone(&repository));

    let appointment = booking_service
        .book_appointment(request)
        .await
        .map_err(to_app_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(repository): State<SharedRepository>,
    Query(params): Query<AppointmentQueryParams>,
) -> Result<Json<Value>, AppError> {
    let filter = params.into_filter()?;
    let booking_service = AppointmentBookingService::new(Arc::clone(&repository));

    let appointments = booking_service.list_appointments(&filter).await;

    Ok(Json(json!({
        "success": true,
        "total": appointments.len(),
        "appointments": appointments,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(repository): State<SharedRepository>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(Arc::clone(&repository));

    let appointment = booking_service
        .get_appointment(&appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(repository): State<SharedRepository>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(Arc::clone(&repository));

    let appointment = booking_service
        .cancel_appointment(&appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled successfully"
    })))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(repository): State<SharedRepository>,
    Path(appointment_id): Path<String>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(Arc::clone(&repository));

    let appointment = booking_service
        .reschedule_appointment(&appointment_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment rescheduled successfully"
    })))
}

// ==============================================================================
// OVERVIEW HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_patient_overview(
    State(repository): State<SharedRepository>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let overview_service = AppointmentOverviewService::new(Arc::clone(&repository));

    let overview = overview_service
        .patient_overview(&patient_id, local_now())
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "overview": overview,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_dashboard(
    State(repository): State<SharedRepository>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let overview_service = AppointmentOverviewService::new(Arc::clone(&repository));

    let dashboard = overview_service
        .doctor_dashboard(&doctor_id, local_now())
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "dashboard": dashboard,
    })))
}
