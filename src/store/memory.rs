use chrono::{NaiveDate, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::lock::Mutex;

use super::{CheckInStore, StoreError, StoreResult};
use crate::model::check_in::{CheckInRecord, NewCheckIn};

/// Process-local store with the same uniqueness rule as the `check_ins`
/// table. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryCheckInStore {
    records: Mutex<Vec<CheckInRecord>>,
}

impl MemoryCheckInStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

impl CheckInStore for MemoryCheckInStore {
    fn find_exact<'a>(
        &'a self,
        student_id: &'a str,
        encoded_time: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>> {
        async move {
            let records = self.records.lock().await;
            Ok(records
                .iter()
                .find(|r| r.student_id == student_id && r.encoded_time == encoded_time)
                .cloned())
        }
        .boxed()
    }

    fn find_same_day<'a>(
        &'a self,
        student_id: &'a str,
        day: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<CheckInRecord>>> {
        async move {
            let records = self.records.lock().await;
            Ok(records
                .iter()
                .filter(|r| r.student_id == student_id && r.checked_in_at.date() == day)
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn insert(&self, check_in: NewCheckIn) -> BoxFuture<'_, StoreResult<CheckInRecord>> {
        async move {
            let mut records = self.records.lock().await;

            if records
                .iter()
                .any(|r| r.student_id == check_in.student_id && r.encoded_time == check_in.encoded_time)
            {
                return Err(StoreError::UniqueViolation);
            }

            let id = records.len() as u64 + 1;
            let record = check_in.into_record(id, Utc::now());
            records.push(record.clone());
            Ok(record)
        }
        .boxed()
    }

    fn latest_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>> {
        async move {
            let records = self.records.lock().await;
            Ok(records
                .iter()
                .rev()
                .find(|r| r.student_id == student_id)
                .cloned())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::testing::check_in as new_check_in;

    #[actix_web::test]
    async fn insert_assigns_ids_and_rejects_exact_repeats() {
        let store = MemoryCheckInStore::new();

        let first = store.insert(new_check_in("S1", "03/14/2024 09:00 AM")).await.unwrap();
        let second = store.insert(new_check_in("S2", "03/14/2024 09:00 AM")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let repeat = store.insert(new_check_in("S1", "03/14/2024 09:00 AM")).await;
        assert!(matches!(repeat, Err(StoreError::UniqueViolation)));
        assert_eq!(store.len().await, 2);
    }

    #[actix_web::test]
    async fn same_day_lookup_ignores_other_days_and_students() {
        let store = MemoryCheckInStore::new();
        store.insert(new_check_in("S1", "03/13/2024 11:58 PM")).await.unwrap();
        store.insert(new_check_in("S1", "03/14/2024 08:00 AM")).await.unwrap();
        store.insert(new_check_in("S1", "03/14/2024 01:00 PM")).await.unwrap();
        store.insert(new_check_in("S2", "03/14/2024 08:00 AM")).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let found = store.find_same_day("S1", day).await.unwrap();
        let times: Vec<_> = found.iter().map(|r| r.encoded_time.as_str()).collect();
        assert_eq!(times, ["03/14/2024 08:00 AM", "03/14/2024 01:00 PM"]);
    }

    #[actix_web::test]
    async fn latest_is_by_creation_not_by_encoded_time() {
        let store = MemoryCheckInStore::new();
        store.insert(new_check_in("S1", "03/14/2024 05:00 PM")).await.unwrap();
        store.insert(new_check_in("S1", "03/14/2024 08:00 AM")).await.unwrap();

        let latest = store.latest_for_student("S1").await.unwrap().unwrap();
        assert_eq!(latest.encoded_time, "03/14/2024 08:00 AM");
        assert!(store.latest_for_student("nobody").await.unwrap().is_none());
    }
}
