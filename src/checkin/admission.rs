use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::checkin::cooldown::{self, CooldownDecision, CooldownSettings};
use crate::checkin::duplicate;
use crate::checkin::error::CheckInError;
use crate::checkin::locks::StudentLocks;
use crate::checkin::time;
use crate::model::check_in::{CheckInRecord, CheckInRequest, NewCheckIn};
use crate::store::{CheckInStore, StoreError};

/// Decides whether a submitted check-in is stored.
///
/// Every call is a single pass: validate, normalize, then under the
/// student's lock run the exact-duplicate gate, the cooldown rule and the
/// insert. A rejected check-in never reaches the store.
#[derive(Clone)]
pub struct AdmissionController {
    store: Arc<dyn CheckInStore>,
    locks: StudentLocks,
    cooldown: CooldownSettings,
}

impl AdmissionController {
    pub fn new(store: Arc<dyn CheckInStore>, cooldown: CooldownSettings, lock_idle: Duration) -> Self {
        Self {
            store,
            locks: StudentLocks::new(lock_idle),
            cooldown,
        }
    }

    pub fn store(&self) -> &dyn CheckInStore {
        self.store.as_ref()
    }

    #[instrument(
        name = "check_in_admit",
        skip(self, request),
        fields(student_id = %request.student_id, encoded_time = %request.encoded_time)
    )]
    pub async fn admit(&self, request: CheckInRequest) -> Result<CheckInRecord, CheckInError> {
        let student_id = request.student_id.trim().to_string();
        if student_id.is_empty() {
            info!("Rejected: missing student id");
            return Err(CheckInError::MissingStudentId);
        }

        let normalized = time::normalize(&request.encoded_time).inspect_err(|_| {
            info!("Rejected: invalid time format");
        })?;

        let lock = self.locks.handle(&student_id).await;
        let _guard = lock.lock().await;

        let exact = duplicate::exists_exact(self.store(), &student_id, &normalized.canonical)
            .await
            .map_err(|e| self.store_failure(e))?;
        if exact {
            info!(canonical = %normalized.canonical, "Rejected: exact duplicate");
            return Err(CheckInError::ExactDuplicate);
        }

        let decision = cooldown::check_cooldown(
            self.store(),
            &student_id,
            normalized.day_key,
            normalized.at,
            &self.cooldown,
        )
        .await
        .map_err(|e| self.store_failure(e))?;

        if let CooldownDecision::Rejected { elapsed_minutes } = decision {
            warn!(
                elapsed_minutes,
                min_interval_minutes = self.cooldown.min_interval_minutes(),
                "Rejected: cooldown violation"
            );
            return Err(CheckInError::CooldownViolation {
                elapsed_minutes,
                min_interval_minutes: self.cooldown.min_interval_minutes(),
            });
        }

        let check_in = NewCheckIn::from_request(request, student_id, normalized.canonical, normalized.at);
        let record = self.store.insert(check_in).await.map_err(|e| self.store_failure(e))?;

        info!(id = record.id, "Check-in admitted");
        Ok(record)
    }

    fn store_failure(&self, e: StoreError) -> CheckInError {
        let e = CheckInError::from(e);
        if !e.is_rejection() {
            error!(error = %e, "Check-in store failure");
        }
        e
    }
}
