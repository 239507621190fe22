//! # Roster
//!
//! Admission and subscription lifecycle core for a facility membership
//! service. Everything here is an in-memory transformation over plain
//! snapshots; reading and writing those snapshots is left to the host.
//!
//! ## Core Concepts
//!
//! - **Sessions**: capacity-bound class rosters with a FIFO waitlist
//! - **Ledger**: one subscription record per member with an append-only history
//! - **Notifications**: renewal reminders derived from upcoming expiries
//! - **Store**: a shared handle that serializes mutations per session and per ledger
//!
//! ## Example
//!
//! ```ignore
//! use roster::{FacilityStore, MemberId, Session, StoreConfig, SubscriptionRecord, Timestamp};
//!
//! let store = FacilityStore::new(StoreConfig::default());
//! store.create_session(Session::new("spin", 12).with_instructor("Ana"))?;
//!
//! let outcome = store.book("spin", &MemberId::from("1042"))?;
//!
//! store.subscribe(SubscriptionRecord::new("1042", "Gold", "3_months", 84.99, Timestamp::now()))?;
//! let reminders = store.scan_renewal_reminders(Timestamp::now());
//! ```

pub mod error;
pub mod ledger;
pub mod notifications;
pub mod sessions;
pub mod store;
pub mod types;

// Re-exports
pub use error::{CoreError, Result};
pub use ledger::{
    HistoryEntry, LedgerConfig, RenewOutcome, SubscriptionCancelOutcome, SubscriptionLedger,
    SubscriptionRecord,
};
pub use notifications::{Notification, NotificationScheduler, NotificationSink, ReminderConfig};
pub use sessions::{
    BookingOutcome, CancelOutcome, Roster, Session, SessionAdmissionController, WaitlistQueue,
};
pub use store::{FacilityStore, StoreConfig};
pub use types::*;
