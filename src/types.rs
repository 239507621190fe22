//! Core types shared by the admission and subscription components.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Every plan month is billed as this many days.
pub const DAYS_PER_PLAN_MONTH: i64 = 30;

/// Opaque member identifier.
///
/// Snapshots may carry numeric IDs; coercing those to strings is the job
/// of whatever reads the snapshot.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        MemberId(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        MemberId(s)
    }
}

/// Seconds since Unix epoch, no time zone attached.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Timestamp(secs)
    }

    pub fn plus_seconds(self, seconds: i64) -> Self {
        Timestamp(self.0.saturating_add(seconds))
    }

    pub fn plus_days(self, days: i64) -> Self {
        self.plus_seconds(days.saturating_mul(SECONDS_PER_DAY))
    }

    /// Signed seconds from `self` until `later` (negative if `later` is in the past).
    pub fn seconds_until(self, later: Timestamp) -> i64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Plan duration class.
///
/// Records keep the duration code they were given verbatim; this enum is
/// only used to derive the length of a plan from that code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl PlanDuration {
    pub const ALL: [PlanDuration; 4] = [
        PlanDuration::OneMonth,
        PlanDuration::ThreeMonths,
        PlanDuration::SixMonths,
        PlanDuration::OneYear,
    ];

    /// Wire code, e.g. `"3_months"`.
    pub fn code(self) -> &'static str {
        match self {
            PlanDuration::OneMonth => "1_month",
            PlanDuration::ThreeMonths => "3_months",
            PlanDuration::SixMonths => "6_months",
            PlanDuration::OneYear => "1_year",
        }
    }

    pub fn months(self) -> i64 {
        match self {
            PlanDuration::OneMonth => 1,
            PlanDuration::ThreeMonths => 3,
            PlanDuration::SixMonths => 6,
            PlanDuration::OneYear => 12,
        }
    }

    /// Plan length in seconds (months of 30 days).
    pub fn length_seconds(self) -> i64 {
        self.months() * DAYS_PER_PLAN_MONTH * SECONDS_PER_DAY
    }

    /// Map a code to a duration, falling back to one month for unknown codes.
    pub fn from_code_lenient(code: &str) -> Self {
        code.parse().unwrap_or_else(|_| {
            tracing::debug!("unknown duration code {code:?}, treating as 1_month");
            PlanDuration::OneMonth
        })
    }

    /// Expiry of a plan with the given code starting at `start`.
    pub fn expiry_for(code: &str, start: Timestamp) -> Timestamp {
        start.plus_seconds(Self::from_code_lenient(code).length_seconds())
    }
}

impl FromStr for PlanDuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanDuration::ALL
            .into_iter()
            .find(|d| d.code() == s)
            .ok_or_else(|| CoreError::UnknownDuration(s.to_string()))
    }
}

impl fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
