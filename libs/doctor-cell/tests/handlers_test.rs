// libs/doctor-cell/tests/handlers_test.rs

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Json,
};
use serde_json::json;
use tower::ServiceExt;

use doctor_cell::handlers::*;
use doctor_cell::models::CreateTimeSlotRequest;
use doctor_cell::router::doctor_routes;
use shared_database::ClinicRepository;
use shared_models::error::AppError;
use shared_utils::test_utils::{
    days_from_today, json_request, response_json, time, TestClinic, SAMPLE_CARDIOLOGIST_ID,
    SAMPLE_DERMATOLOGIST_ID, SAMPLE_PATIENT_ID,
};

#[tokio::test]
async fn test_search_doctors_by_specialization() {
    let clinic = TestClinic::seeded();

    let result = search_doctors(
        State(clinic.repository()),
        Query(DoctorSearchQuery {
            q: None,
            specialization: Some("dermatology".to_string()),
        }),
    )
    .await;

    let body = result.unwrap().0;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["id"], SAMPLE_DERMATOLOGIST_ID);
    assert_eq!(body["doctors"][0]["availableSlots"], 0);
}

#[tokio::test]
async fn test_search_doctors_free_text_matches_name() {
    let clinic = TestClinic::seeded();

    let body = search_doctors(
        State(clinic.repository()),
        Query(DoctorSearchQuery {
            q: Some("smith".to_string()),
            specialization: None,
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["name"], "Dr. John Smith");
}

#[tokio::test]
async fn test_get_doctor_rejects_patient_id() {
    let clinic = TestClinic::seeded();

    let result = get_doctor(State(clinic.repository()), Path(SAMPLE_PATIENT_ID.to_string())).await;

    match result {
        Err(AppError::NotFound(msg)) => assert!(msg.contains(SAMPLE_PATIENT_ID)),
        other => panic!("Expected NotFound, got {:?}", other.map(|json| json.0)),
    }
}

#[tokio::test]
async fn test_create_time_slot_returns_created() {
    let clinic = TestClinic::seeded();
    let date = days_from_today(3);

    let (status, Json(body)) = create_time_slot(
        State(clinic.repository()),
        Json(CreateTimeSlotRequest {
            doctor_id: SAMPLE_CARDIOLOGIST_ID.to_string(),
            date,
            time: time("09:00"),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slot"]["doctorId"], SAMPLE_CARDIOLOGIST_ID);
    assert_eq!(body["slot"]["time"], "09:00");
    assert_eq!(body["slot"]["isBooked"], false);
    assert_eq!(clinic.repository().list_slots(None).await.len(), 1);
}

#[tokio::test]
async fn test_create_time_slot_blank_doctor_is_validation_error() {
    let clinic = TestClinic::seeded();

    let result = create_time_slot(
        State(clinic.repository()),
        Json(CreateTimeSlotRequest {
            doctor_id: "  ".to_string(),
            date: days_from_today(1),
            time: time("10:00"),
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_delete_booked_slot_is_conflict() {
    let clinic = TestClinic::seeded();
    let date = days_from_today(2);
    let slot = clinic.add_slot(SAMPLE_CARDIOLOGIST_ID, date, time("11:00")).await;
    clinic
        .repository()
        .book_slot(SAMPLE_CARDIOLOGIST_ID, SAMPLE_PATIENT_ID, date, time("11:00"))
        .await
        .unwrap();

    let result = delete_time_slot(State(clinic.repository()), Path(slot.id.clone())).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(clinic.repository().list_slots(None).await.len(), 1);
}

// ==============================================================================
// ROUTER
// ==============================================================================

#[tokio::test]
async fn test_router_time_slot_lifecycle() {
    let clinic = TestClinic::seeded();
    let app = doctor_routes(clinic.repository());
    let date = days_from_today(4);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/time-slots",
            Some(json!({
                "doctorId": SAMPLE_CARDIOLOGIST_ID,
                "date": date.to_string(),
                "time": "14:00",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let slot_id = response_json(response).await["slot"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::GET,
            &format!("/time-slots?doctorId={}", SAMPLE_CARDIOLOGIST_ID),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(json_request(Method::DELETE, &format!("/time-slots/{}", slot_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(Method::DELETE, &format!("/time-slots/{}", slot_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_router_slot_for_unknown_doctor_is_not_found() {
    let clinic = TestClinic::seeded();
    let app = doctor_routes(clinic.repository());

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/time-slots",
            Some(json!({
                "doctorId": "missing",
                "date": "2024-07-01",
                "time": "09:00",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_router_lists_specializations_sorted() {
    let clinic = TestClinic::seeded();
    let app = doctor_routes(clinic.repository());

    let response = app
        .oneshot(json_request(Method::GET, "/specializations", None))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(
        body["specializations"],
        json!(["Cardiology", "Dermatology", "Pediatrics"])
    );
}

#[tokio::test]
async fn test_available_slots_payload_uses_camel_case() {
    let clinic = TestClinic::seeded();
    clinic
        .add_slot(SAMPLE_CARDIOLOGIST_ID, days_from_today(1), time("09:00"))
        .await;

    let Json(body) = get_available_slots(
        State(clinic.repository()),
        Path(SAMPLE_CARDIOLOGIST_ID.to_string()),
    )
    .await
    .unwrap();

    assert_eq!(body["doctorId"], SAMPLE_CARDIOLOGIST_ID);
    assert!(body.get("doctor_id").is_none());
    assert_eq!(body["slots"][0]["doctorId"], SAMPLE_CARDIOLOGIST_ID);
    assert_eq!(body["slots"][0]["time"], "09:00");
}
