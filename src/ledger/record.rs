//! A member's subscription and its archived prior states.

use crate::types::{MemberId, PlanDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An archived plan state. Never modified once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub plan_name: String,
    pub duration: String,
    pub start_epoch: Timestamp,
    pub expiry_epoch: Timestamp,
    pub price: f64,
}

/// Current plan state of one member plus its history chain.
///
/// The duration code is kept verbatim, even when it is not one the
/// duration table knows; such codes are billed as one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    member_id: MemberId,
    plan_name: String,
    duration: String,
    start_epoch: Timestamp,
    expiry_epoch: Timestamp,
    price: f64,
    active: bool,
    /// Newest first.
    #[serde(default)]
    history: VecDeque<HistoryEntry>,
}

impl SubscriptionRecord {
    /// Start a new active subscription at `start`.
    pub fn new(
        member_id: impl Into<MemberId>,
        plan_name: impl Into<String>,
        duration: impl Into<String>,
        price: f64,
        start: Timestamp,
    ) -> Self {
        let duration = duration.into();
        let expiry_epoch = PlanDuration::expiry_for(&duration, start);
        Self {
            member_id: member_id.into(),
            plan_name: plan_name.into(),
            duration,
            start_epoch: start,
            expiry_epoch,
            price,
            active: true,
            history: VecDeque::new(),
        }
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn start(&self) -> Timestamp {
        self.start_epoch
    }

    pub fn expiry(&self) -> Timestamp {
        self.expiry_epoch
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Archived states, newest first.
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expiry_epoch
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// Seconds left until expiry (negative once expired).
    pub fn seconds_remaining(&self, now: Timestamp) -> i64 {
        now.seconds_until(self.expiry_epoch)
    }

    /// The current state as a history entry.
    pub fn current_entry(&self) -> HistoryEntry {
        HistoryEntry {
            plan_name: self.plan_name.clone(),
            duration: self.duration.clone(),
            start_epoch: self.start_epoch,
            expiry_epoch: self.expiry_epoch,
            price: self.price,
        }
    }

    /// Push the current state onto the front of the history chain.
    pub(crate) fn archive_current(&mut self) {
        let entry = self.current_entry();
        self.history.push_front(entry);
    }

    /// Archive the current state and switch to a new plan starting at `now`.
    pub fn renew(
        &mut self,
        plan_name: impl Into<String>,
        duration: impl Into<String>,
        price: f64,
        now: Timestamp,
    ) {
        self.archive_current();
        self.plan_name = plan_name.into();
        self.duration = duration.into();
        self.price = price;
        self.start_epoch = now;
        self.expiry_epoch = PlanDuration::expiry_for(&self.duration, now);
    }
}
