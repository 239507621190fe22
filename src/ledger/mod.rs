//! Subscription ledger: one record per member with an append-only renewal history.

mod manager;
mod record;

pub use manager::{LedgerConfig, RenewOutcome, SubscriptionCancelOutcome, SubscriptionLedger};
pub use record::{HistoryEntry, SubscriptionRecord};
