use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "studentId": "2021-00123",
        "studentName": "Juan Dela Cruz",
        "yearLevel": "3rd Year",
        "course": "BSIT",
        "dutyType": "Library",
        "room": "LIB-2",
        "classStatus": "No Class",
        "facilitatorStatus": "Present",
        "encodedTime": "03/14/2024 02:30 PM",
        "photoUrl": "/uploads/1710397800000-selfie.jpg",
        "latitude": 14.5995,
        "longitude": 120.9842,
        "address": "Manila",
        "createdAt": "2024-03-14T06:30:12Z"
    })
)]
pub struct CheckInRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "2021-00123")]
    pub student_id: String,

    #[schema(nullable = true)]
    pub student_name: Option<String>,
    #[schema(nullable = true)]
    pub year_level: Option<String>,
    #[schema(nullable = true)]
    pub course: Option<String>,
    #[schema(nullable = true)]
    pub duty_type: Option<String>,
    #[schema(nullable = true)]
    pub room: Option<String>,
    #[schema(nullable = true)]
    pub class_status: Option<String>,
    #[schema(nullable = true)]
    pub facilitator_status: Option<String>,

    /// Canonical `MM/DD/YYYY hh:mm AM|PM`.
    #[schema(example = "03/14/2024 02:30 PM")]
    pub encoded_time: String,

    /// Parsed `encoded_time`, used for cooldown arithmetic.
    #[serde(skip)]
    pub checked_in_at: NaiveDateTime,

    #[schema(nullable = true)]
    pub photo_url: Option<String>,
    #[schema(nullable = true)]
    pub latitude: Option<f64>,
    #[schema(nullable = true)]
    pub longitude: Option<f64>,
    #[schema(nullable = true)]
    pub address: Option<String>,

    #[schema(
        example = "2024-03-14T06:30:12Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,
}

/// Body of a check-in submission. `photo_url` is resolved by the upload
/// layer before this reaches the admission controller.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    // Missing fields fall through to the admission checks, which reject them
    // with the usual messages.
    #[serde(default)]
    #[schema(example = "2021-00123")]
    pub student_id: String,
    #[serde(default)]
    #[schema(example = "03/14/2024 02:30 PM")]
    pub encoded_time: String,

    #[schema(example = "Juan Dela Cruz")]
    pub student_name: Option<String>,
    #[schema(example = "3rd Year")]
    pub year_level: Option<String>,
    #[schema(example = "BSIT")]
    pub course: Option<String>,
    #[schema(example = "Library")]
    pub duty_type: Option<String>,
    #[schema(example = "LIB-2")]
    pub room: Option<String>,
    #[schema(example = "No Class")]
    pub class_status: Option<String>,
    #[schema(example = "Present")]
    pub facilitator_status: Option<String>,
    pub photo_url: Option<String>,
    #[schema(example = 14.5995)]
    pub latitude: Option<f64>,
    #[schema(example = 120.9842)]
    pub longitude: Option<f64>,
    #[schema(example = "Manila")]
    pub address: Option<String>,
}

/// A check-in that passed admission and is ready to be stored.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub student_id: String,
    pub student_name: Option<String>,
    pub year_level: Option<String>,
    pub course: Option<String>,
    pub duty_type: Option<String>,
    pub room: Option<String>,
    pub class_status: Option<String>,
    pub facilitator_status: Option<String>,
    pub encoded_time: String,
    pub checked_in_at: NaiveDateTime,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

impl NewCheckIn {
    pub fn from_request(
        request: CheckInRequest,
        student_id: String,
        encoded_time: String,
        checked_in_at: NaiveDateTime,
    ) -> Self {
        Self {
            student_id,
            student_name: request.student_name,
            year_level: request.year_level,
            course: request.course,
            duty_type: request.duty_type,
            room: request.room,
            class_status: request.class_status,
            facilitator_status: request.facilitator_status,
            encoded_time,
            checked_in_at,
            photo_url: request.photo_url,
            latitude: request.latitude,
            longitude: request.longitude,
            address: request.address,
        }
    }

    pub fn into_record(self, id: u64, created_at: DateTime<Utc>) -> CheckInRecord {
        CheckInRecord {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            year_level: self.year_level,
            course: self.course,
            duty_type: self.duty_type,
            room: self.room,
            class_status: self.class_status,
            facilitator_status: self.facilitator_status,
            encoded_time: self.encoded_time,
            checked_in_at: self.checked_in_at,
            photo_url: self.photo_url,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            created_at,
        }
    }
}
