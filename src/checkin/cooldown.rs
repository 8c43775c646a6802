use chrono::{Duration, NaiveDate, NaiveDateTime};
use strum_macros::{AsRefStr, EnumString};

use crate::model::check_in::CheckInRecord;
use crate::store::{CheckInStore, StoreResult};

/// Which same-day record a candidate is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CooldownPolicy {
    /// The same-day record closest in time to the candidate.
    #[default]
    Nearest,
    /// The first same-day record the store returns (oldest by creation).
    First,
}

/// Same-day records are never more than a day apart, so a longer interval
/// behaves exactly like this one.
pub const MAX_COOLDOWN_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Copy)]
pub struct CooldownSettings {
    pub min_interval: Duration,
    pub policy: CooldownPolicy,
}

impl CooldownSettings {
    pub fn new(min_interval_minutes: i64, policy: CooldownPolicy) -> Self {
        Self {
            min_interval: Duration::minutes(min_interval_minutes.clamp(0, MAX_COOLDOWN_MINUTES)),
            policy,
        }
    }

    pub fn min_interval_minutes(&self) -> i64 {
        self.min_interval.num_minutes()
    }
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self::new(5, CooldownPolicy::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    Allowed,
    Rejected { elapsed_minutes: i64 },
}

/// Fetch `student_id`'s records on `day_key` and judge `candidate` against them.
pub async fn check_cooldown(
    store: &dyn CheckInStore,
    student_id: &str,
    day_key: NaiveDate,
    candidate: NaiveDateTime,
    settings: &CooldownSettings,
) -> StoreResult<CooldownDecision> {
    let same_day = store.find_same_day(student_id, day_key).await?;
    Ok(evaluate(candidate, &same_day, settings))
}

/// Records from a different calendar day than `candidate` never count,
/// whatever the store handed back.
pub fn evaluate(
    candidate: NaiveDateTime,
    existing: &[CheckInRecord],
    settings: &CooldownSettings,
) -> CooldownDecision {
    let mut same_day = existing
        .iter()
        .filter(|r| r.checked_in_at.date() == candidate.date());

    let compared = match settings.policy {
        CooldownPolicy::Nearest => same_day.min_by_key(|r| (r.checked_in_at - candidate).abs()),
        CooldownPolicy::First => same_day.next(),
    };

    let Some(compared) = compared else {
        return CooldownDecision::Allowed;
    };

    let elapsed = (candidate - compared.checked_in_at).abs();
    if elapsed < settings.min_interval {
        CooldownDecision::Rejected {
            elapsed_minutes: elapsed.num_minutes(),
        }
    } else {
        CooldownDecision::Allowed
    }
}
