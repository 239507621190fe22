//! Notification types.

use crate::types::{MemberId, Timestamp};
use serde::{Deserialize, Serialize};

/// Configuration for renewal reminder scans.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReminderConfig {
    /// Remind members whose plan expires within this many days.
    /// Default: 7
    pub reminder_window_days: i64,

    /// Offer the early renewal discount within this many days of expiry.
    /// Default: 14
    pub discount_window_days: i64,

    /// Discount offered inside the discount window, in percent.
    /// Default: 10
    pub discount_percent: u32,

    /// Max queued notifications before new ones are dropped (None = unbounded).
    /// `Some(0)` is treated as unbounded.
    pub queue_capacity: Option<usize>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            reminder_window_days: 7,
            discount_window_days: 14,
            discount_percent: 10,
            queue_capacity: None,
        }
    }
}

/// An advisory message for one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub member_id: MemberId,
    pub message: String,
    pub expiry_epoch: Timestamp,
}

impl Notification {
    pub fn new(member_id: MemberId, message: impl Into<String>, expiry: Timestamp) -> Self {
        Self {
            member_id,
            message: message.into(),
            expiry_epoch: expiry,
        }
    }
}
