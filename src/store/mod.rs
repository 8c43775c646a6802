pub mod memory;
pub mod mysql;

use chrono::NaiveDate;
use derive_more::Display;
use futures::future::BoxFuture;

use crate::model::check_in::{CheckInRecord, NewCheckIn};

pub use memory::MemoryCheckInStore;
pub use mysql::MySqlCheckInStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Display)]
pub enum StoreError {
    /// `(student_id, encoded_time)` already exists.
    #[display(fmt = "duplicate check-in")]
    UniqueViolation,

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::UniqueViolation => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
        }
        StoreError::Database(e)
    }
}

/// Where admitted check-ins live.
///
/// Implementations must reject an insert whose `(student_id, encoded_time)`
/// already exists with [`StoreError::UniqueViolation`].
pub trait CheckInStore: Send + Sync {
    fn find_exact<'a>(
        &'a self,
        student_id: &'a str,
        encoded_time: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>>;

    /// Records of `student_id` whose check-in time falls on `day`,
    /// oldest `created_at` first.
    fn find_same_day<'a>(
        &'a self,
        student_id: &'a str,
        day: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<CheckInRecord>>>;

    fn insert(&self, check_in: NewCheckIn) -> BoxFuture<'_, StoreResult<CheckInRecord>>;

    /// Most recently created record of `student_id`.
    fn latest_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>>;
}
