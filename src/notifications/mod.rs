//! Renewal reminders derived from the subscription ledger.
//!
//! The scheduler never mutates the ledger. A scan produces [`Notification`]s
//! and pushes them onto an outbound queue in ledger order; a delivery step
//! (email, SMS, ...) drains that queue strictly first-in first-out through a
//! [`NotificationSink`].

mod scheduler;
mod types;

pub use scheduler::{NotificationScheduler, NotificationSink};
pub use types::{Notification, ReminderConfig};
