//! Class sessions: capacity-bound rosters with a FIFO waitlist.
//!
//! A session is loaded from a [`Session`] snapshot into a
//! [`SessionAdmissionController`], mutated through `book` / `cancel`, and
//! handed back as a snapshot for persistence.
//!
//! # Example
//!
//! ```ignore
//! let mut class = SessionAdmissionController::from_snapshot(Session::new("spin", 2));
//!
//! class.book(&"A".into()); // Admitted
//! class.book(&"B".into()); // Admitted
//! class.book(&"C".into()); // Waitlisted
//!
//! // Freeing a seat promotes the head of the waitlist.
//! let outcome = class.cancel(&"A".into());
//! assert_eq!(outcome.promoted(), Some(&"C".into()));
//! ```

mod controller;
mod roster;
mod types;
mod waitlist;

pub use controller::SessionAdmissionController;
pub use roster::Roster;
pub use types::{BookingOutcome, CancelOutcome, Session};
pub use waitlist::WaitlistQueue;
