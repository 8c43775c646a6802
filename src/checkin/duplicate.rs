use tracing::debug;

use crate::store::{CheckInStore, StoreResult};

/// True when `student_id` already has a record at exactly `canonical_time`.
pub async fn exists_exact(
    store: &dyn CheckInStore,
    student_id: &str,
    canonical_time: &str,
) -> StoreResult<bool> {
    let found = store.find_exact(student_id, canonical_time).await?;

    if let Some(existing) = &found {
        debug!(
            student_id,
            encoded_time = canonical_time,
            existing_id = existing.id,
            "Exact check-in match found"
        );
    }

    Ok(found.is_some())
}
