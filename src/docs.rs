use crate::model::check_in::{CheckInRecord, CheckInRequest};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Check-in API",
        version = "1.0.0",
        description = r#"
## Attendance Check-in Service

Records student duty check-ins and keeps the attendance log free of repeats.

### 🔹 Admission rules
- **Canonical time**: `encodedTime` must be `MM/DD/YYYY hh:mm AM|PM`
- **Exact duplicate**: the same `studentId` + `encodedTime` is accepted once
- **Cooldown**: two check-ins by one student on the same day must be at least
  `COOLDOWN_MINUTES` apart (default 5); earlier and later times count alike
- Check-ins on different calendar days never affect each other

### 📦 Response Format
- `201` with the stored record on success
- `400` with `{"error": "..."}` when a check-in is rejected

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::latest_for_student,
    ),
    components(
        schemas(
            CheckInRequest,
            CheckInRecord
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance check-in APIs"),
    )
)]
pub struct ApiDoc;

/// Handlers are documented under `/api`; rewrite their paths to the prefix the
/// routes are actually mounted on.
pub fn openapi(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = api_prefix.trim_end_matches('/');

    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| match path.strip_prefix("/api") {
            Some(rest) => (format!("{prefix}{rest}"), item),
            None => (path, item),
        })
        .collect();
    doc
}
