//! Indexed collection of subscription records.

use super::record::{HistoryEntry, SubscriptionRecord};
use crate::error::{CoreError, Result};
use crate::types::{MemberId, PlanDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Ledger configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Reject duration codes outside the duration table on `add` and `renew`
    /// instead of billing them as one month.
    pub strict_durations: bool,
}

/// Result of a renewal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenewOutcome {
    Renewed { expiry: Timestamp },
    NotFound,
}

/// Result of cancelling a subscription.
#[derive(Clone, Debug, PartialEq)]
pub enum SubscriptionCancelOutcome {
    /// The record was removed from the ledger. It is returned with its final
    /// state archived at the head of its history.
    Cancelled { record: SubscriptionRecord },
    NotFound,
}

/// All members' subscription records, indexed by member.
///
/// The index maps each member to the record's position and is rebuilt after
/// every insert or delete.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionLedger {
    config: LedgerConfig,
    records: Vec<SubscriptionRecord>,
    index: HashMap<MemberId, usize>,
}

impl SubscriptionLedger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load a persisted ledger snapshot.
    ///
    /// If a member appears more than once, only the last record is kept.
    pub fn from_records(config: LedgerConfig, records: Vec<SubscriptionRecord>) -> Self {
        let mut last_pos: HashMap<MemberId, usize> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if let Some(prev) = last_pos.insert(record.member_id().clone(), pos) {
                warn!(
                    "member {} has records at {prev} and {pos}; dropping the earlier one",
                    record.member_id()
                );
            }
        }
        let records = records
            .into_iter()
            .enumerate()
            .filter(|(pos, r)| last_pos.get(r.member_id()) == Some(pos))
            .map(|(_, r)| r)
            .collect();

        let mut ledger = Self {
            config,
            records,
            index: HashMap::new(),
        };
        ledger.rebuild_index();
        ledger
    }

    /// Parse a ledger from a JSON array of subscription snapshots.
    pub fn from_json(config: LedgerConfig, value: &serde_json::Value) -> Result<Self> {
        let records = Vec::<SubscriptionRecord>::deserialize(value)?;
        Ok(Self::from_records(config, records))
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.records)?)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Add a new subscription.
    pub fn add(&mut self, record: SubscriptionRecord) -> Result<()> {
        if self.index.contains_key(record.member_id()) {
            return Err(CoreError::DuplicateMember(record.member_id().clone()));
        }
        self.check_duration(record.duration())?;

        info!(
            "subscription added for {} ({}, {})",
            record.member_id(),
            record.plan_name(),
            record.duration()
        );
        self.records.push(record);
        self.rebuild_index();
        Ok(())
    }

    /// Look up a member's record.
    pub fn find(&self, member: &MemberId) -> Option<&SubscriptionRecord> {
        self.index.get(member).and_then(|&pos| self.records.get(pos))
    }

    fn find_mut(&mut self, member: &MemberId) -> Option<&mut SubscriptionRecord> {
        match self.index.get(member) {
            Some(&pos) => self.records.get_mut(pos),
            None => None,
        }
    }

    /// Archive the member's current plan and replace it with a new one starting at `now`.
    pub fn renew(
        &mut self,
        member: &MemberId,
        plan_name: impl Into<String>,
        duration: impl Into<String>,
        price: f64,
        now: Timestamp,
    ) -> Result<RenewOutcome> {
        let duration = duration.into();
        self.check_duration(&duration)?;

        let Some(record) = self.find_mut(member) else {
            debug!("renew for unknown member {member}");
            return Ok(RenewOutcome::NotFound);
        };
        record.renew(plan_name, duration, price, now);
        info!(
            "subscription renewed for {member}: {} until {:?} (history {})",
            record.plan_name(),
            record.expiry(),
            record.history().len()
        );
        Ok(RenewOutcome::Renewed {
            expiry: record.expiry(),
        })
    }

    /// Archive the member's current plan and remove the record from the ledger.
    pub fn cancel(&mut self, member: &MemberId) -> SubscriptionCancelOutcome {
        let Some(&pos) = self.index.get(member) else {
            debug!("cancel for unknown member {member}");
            return SubscriptionCancelOutcome::NotFound;
        };
        if pos >= self.records.len() {
            return SubscriptionCancelOutcome::NotFound;
        }

        let mut record = self.records.remove(pos);
        record.archive_current();
        self.rebuild_index();
        info!("subscription cancelled for {member}");
        SubscriptionCancelOutcome::Cancelled { record }
    }

    /// Drop a record without archiving it. Returns whether one was removed.
    pub fn remove(&mut self, member: &MemberId) -> bool {
        match self.index.get(member) {
            Some(&pos) if pos < self.records.len() => {
                self.records.remove(pos);
                self.rebuild_index();
                debug!("subscription removed for {member}");
                true
            }
            _ => false,
        }
    }

    /// Whether a record has expired at `now`.
    pub fn is_expired(record: &SubscriptionRecord, now: Timestamp) -> bool {
        record.is_expired_at(now)
    }

    /// Records that have not expired yet but will within `days` of `now`.
    pub fn expiring_within(&self, days: i64, now: Timestamp) -> Vec<&SubscriptionRecord> {
        let threshold = now.plus_days(days);
        self.records
            .iter()
            .filter(|r| !r.is_expired_at(now) && r.expiry() <= threshold)
            .collect()
    }

    /// A member's archived states, newest first.
    pub fn history(&self, member: &MemberId) -> Option<&VecDeque<HistoryEntry>> {
        self.find(member).map(|r| r.history())
    }

    /// Records in ledger order.
    pub fn records(&self) -> &[SubscriptionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<SubscriptionRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_duration(&self, code: &str) -> Result<()> {
        if self.config.strict_durations {
            code.parse::<PlanDuration>()?;
        }
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, record) in self.records.iter().enumerate() {
            self.index.insert(record.member_id().clone(), pos);
        }
    }
}
