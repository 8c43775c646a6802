use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::checkin::AdmissionController;
use crate::model::check_in::CheckInRequest;

/// Bodies that fail to deserialize get the same `{"error": ...}` shape as
/// rejected check-ins.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!(error = %message, "Rejected malformed check-in body");
        let response = HttpResponse::BadRequest().json(json!({ "error": message }));
        InternalError::from_response(err, response).into()
    })
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Check-in recorded", body = crate::model::check_in::CheckInRecord),
        (status = 400, description = "Rejected check-in", body = Object, example = json!({
            "error": "User already checked in within 5 minutes on this day."
        })),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Internal Server Error"
        }))
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    controller: web::Data<AdmissionController>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let record = controller.admit(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Latest record of a student, used to pre-fill the check-in form
#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}",
    params(
        ("student_id", Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Most recent check-in", body = crate::model::check_in::CheckInRecord),
        (status = 404, description = "No record for this student", body = Object, example = json!({
            "error": "No record found for this Student ID."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn latest_for_student(
    controller: web::Data<AdmissionController>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let student_id = path.into_inner();
    debug!(student_id = %student_id, "Fetching latest check-in");

    let record = controller
        .store()
        .latest_for_student(student_id.trim())
        .await
        .map_err(|e| {
            error!(error = %e, student_id = %student_id, "Failed to fetch latest check-in");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "No record found for this Student ID."
        }))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web::Data};
    use serde_json::Value;

    use super::*;
    use crate::checkin::CooldownSettings;
    use crate::store::MemoryCheckInStore;

    fn controller() -> AdmissionController {
        AdmissionController::new(
            Arc::new(MemoryCheckInStore::new()),
            CooldownSettings::default(),
            Duration::from_secs(60),
        )
    }

    macro_rules! app {
        ($controller:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new($controller))
                    .app_data(json_config())
                    .route("/attendance", web::post().to(check_in))
                    .route("/attendance/student/{student_id}", web::get().to(latest_for_student)),
            )
            .await
        };
    }

    fn post(body: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/attendance").set_json(body)
    }

    #[actix_web::test]
    async fn admitted_check_in_returns_201_with_record() {
        let app = app!(controller());

        let resp = test::call_service(
            &app,
            post(json!({
                "studentId": "S1",
                "studentName": "Juan Dela Cruz",
                "dutyType": "Library",
                "encodedTime": "03/14/2024 02:30 PM",
                "latitude": 14.5995,
                "longitude": 120.9842
            }))
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["studentId"], "S1");
        assert_eq!(body["encodedTime"], "03/14/2024 02:30 PM");
        assert_eq!(body["dutyType"], "Library");
        assert_eq!(body["photoUrl"], Value::Null);
        assert!(body["id"].is_u64());
        assert!(body["createdAt"].is_string());
        assert!(body.get("checkedInAt").is_none());
    }

    #[actix_web::test]
    async fn rejections_return_400_with_message() {
        let app = app!(controller());
        let body = json!({ "studentId": "S1", "encodedTime": "03/14/2024 09:00 AM" });

        let first = test::call_service(&app, post(body.clone()).to_request()).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let dup = test::call_service(&app, post(body).to_request()).await;
        assert_eq!(dup.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(dup).await;
        assert_eq!(msg["error"], "User already checked in at this exact time.");

        let soon = test::call_service(
            &app,
            post(json!({ "studentId": "S1", "encodedTime": "03/14/2024 09:03 AM" })).to_request(),
        )
        .await;
        assert_eq!(soon.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(soon).await;
        assert_eq!(msg["error"], "User already checked in within 5 minutes on this day.");

        let bad = test::call_service(
            &app,
            post(json!({ "studentId": "S1", "encodedTime": "2024-03-14 14:30" })).to_request(),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(bad).await;
        assert_eq!(msg["error"], "Invalid time format, expected MM/DD/YYYY hh:mm AM|PM");
    }

    #[actix_web::test]
    async fn latest_lookup_returns_404_then_the_newest_record() {
        let app = app!(controller());

        let req = test::TestRequest::get().uri("/attendance/student/S1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        for time in ["03/14/2024 09:00 AM", "03/14/2024 10:00 AM"] {
            let req = post(json!({ "studentId": "S1", "encodedTime": time })).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/attendance/student/S1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["encodedTime"], "03/14/2024 10:00 AM");
    }

    #[actix_web::test]
    async fn missing_student_id_field_is_a_json_rejection() {
        let app = app!(controller());

        let resp = test::call_service(
            &app,
            post(json!({ "encodedTime": "03/14/2024 09:00 AM" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(resp).await;
        assert_eq!(msg["error"], "Student ID is required");

        let resp = test::call_service(&app, post(json!({ "studentId": "S1" })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(resp).await;
        assert_eq!(msg["error"], "Invalid time format, expected MM/DD/YYYY hh:mm AM|PM");
    }

    #[actix_web::test]
    async fn undecodable_bodies_get_a_json_error() {
        let app = app!(controller());

        let wrong_type = post(json!({ "studentId": 42, "encodedTime": "03/14/2024 09:00 AM" }));
        let resp = test::call_service(&app, wrong_type.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(resp).await;
        assert!(msg["error"].as_str().unwrap().contains("Json deserialize error"));

        let garbage = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json");
        let resp = test::call_service(&app, garbage.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let msg: Value = test::read_body_json(resp).await;
        assert!(msg["error"].is_string());
    }
}
