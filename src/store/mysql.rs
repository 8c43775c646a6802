use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::MySqlPool;
use tracing::debug;

use super::{CheckInStore, StoreResult};
use crate::model::check_in::{CheckInRecord, NewCheckIn};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        student_id,
        student_name,
        year_level,
        course,
        duty_type,
        room,
        class_status,
        facilitator_status,
        encoded_time,
        checked_in_at,
        photo_url,
        latitude,
        longitude,
        address,
        created_at
    FROM check_ins
"#;

/// `check_ins` table, see `schema/check_ins.sql`.
#[derive(Clone)]
pub struct MySqlCheckInStore {
    pool: MySqlPool,
}

impl MySqlCheckInStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: u64) -> StoreResult<CheckInRecord> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let record = sqlx::query_as::<_, CheckInRecord>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }
}

impl CheckInStore for MySqlCheckInStore {
    fn find_exact<'a>(
        &'a self,
        student_id: &'a str,
        encoded_time: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>> {
        async move {
            let sql = format!("{SELECT_COLUMNS} WHERE student_id = ? AND encoded_time = ? LIMIT 1");
            debug!(student_id, encoded_time, "Looking up exact check-in");

            let record = sqlx::query_as::<_, CheckInRecord>(&sql)
                .bind(student_id)
                .bind(encoded_time)
                .fetch_optional(&self.pool)
                .await?;
            Ok(record)
        }
        .boxed()
    }

    fn find_same_day<'a>(
        &'a self,
        student_id: &'a str,
        day: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<CheckInRecord>>> {
        async move {
            let sql = format!(
                "{SELECT_COLUMNS} WHERE student_id = ? AND checked_in_on = ? ORDER BY created_at ASC, id ASC"
            );
            debug!(student_id, day = %day, "Fetching same-day check-ins");

            let records = sqlx::query_as::<_, CheckInRecord>(&sql)
                .bind(student_id)
                .bind(day)
                .fetch_all(&self.pool)
                .await?;
            Ok(records)
        }
        .boxed()
    }

    fn insert(&self, check_in: NewCheckIn) -> BoxFuture<'_, StoreResult<CheckInRecord>> {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO check_ins
                (student_id, student_name, year_level, course, duty_type, room,
                 class_status, facilitator_status, encoded_time, checked_in_at,
                 checked_in_on, photo_url, latitude, longitude, address)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&check_in.student_id)
            .bind(&check_in.student_name)
            .bind(&check_in.year_level)
            .bind(&check_in.course)
            .bind(&check_in.duty_type)
            .bind(&check_in.room)
            .bind(&check_in.class_status)
            .bind(&check_in.facilitator_status)
            .bind(&check_in.encoded_time)
            .bind(check_in.checked_in_at)
            .bind(check_in.checked_in_at.date())
            .bind(&check_in.photo_url)
            .bind(check_in.latitude)
            .bind(check_in.longitude)
            .bind(&check_in.address)
            .execute(&self.pool)
            .await?;

            self.fetch_by_id(result.last_insert_id()).await
        }
        .boxed()
    }

    fn latest_for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<CheckInRecord>>> {
        async move {
            let sql = format!(
                "{SELECT_COLUMNS} WHERE student_id = ? ORDER BY created_at DESC, id DESC LIMIT 1"
            );

            let record = sqlx::query_as::<_, CheckInRecord>(&sql)
                .bind(student_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(record)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    const SCHEMA: &str = include_str!("../../schema/check_ins.sql");

    fn column(name: &str) -> &'static str {
        SCHEMA
            .lines()
            .find(|line| line.trim_start().starts_with(&format!("{name} ")))
            .unwrap_or_else(|| panic!("column {name} missing from schema"))
    }

    #[test]
    fn key_columns_compare_exactly() {
        // The default collation folds case and trailing spaces, which would
        // let "S1" and "s1" share rows while holding different locks.
        assert!(column("student_id").contains("COLLATE utf8mb4_bin"));
        assert!(column("encoded_time").contains("COLLATE utf8mb4_bin"));
    }

    #[test]
    fn selected_columns_exist_in_the_schema() {
        let selected = super::SELECT_COLUMNS
            .lines()
            .map(|line| line.trim().trim_end_matches(','))
            .filter(|line| !line.is_empty() && *line != "SELECT" && !line.starts_with("FROM"));
        for name in selected {
            column(name);
        }
        column("checked_in_on");
    }
}
