use chrono::{NaiveDateTime, Utc};

use crate::checkin::time::{CANONICAL_FORMAT, normalize};
use crate::model::check_in::{CheckInRecord, NewCheckIn};

pub fn check_in(student_id: &str, raw: &str) -> NewCheckIn {
    let time = normalize(raw).unwrap();
    NewCheckIn {
        student_id: student_id.to_string(),
        student_name: None,
        year_level: None,
        course: None,
        duty_type: None,
        room: None,
        class_status: None,
        facilitator_status: None,
        encoded_time: time.canonical,
        checked_in_at: time.at,
        photo_url: None,
        latitude: None,
        longitude: None,
        address: None,
    }
}

pub fn record_at(student_id: &str, at: NaiveDateTime) -> CheckInRecord {
    let mut new = check_in(student_id, "01/01/2024 12:00 AM");
    new.encoded_time = at.format(CANONICAL_FORMAT).to_string();
    new.checked_in_at = at;
    new.into_record(0, Utc::now())
}
