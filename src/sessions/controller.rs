//! Booking and cancellation for a single session.

use super::roster::Roster;
use super::types::{BookingOutcome, CancelOutcome, Session};
use super::waitlist::WaitlistQueue;
use crate::types::MemberId;
use tracing::{debug, warn};

/// Decides whether a participant is admitted, queued, or removed.
///
/// Invariants held after every call:
/// - the roster never grows past the capacity
/// - nobody is on the roster and the waitlist at the same time
/// - the waitlist is promoted strictly in arrival order
#[derive(Clone, Debug)]
pub struct SessionAdmissionController {
    name: String,
    instructor: String,
    time: String,
    image_path: String,
    roster: Roster,
    waitlist: WaitlistQueue,
}

impl SessionAdmissionController {
    /// Load a session snapshot.
    ///
    /// Waitlist entries that are also on the roster are dropped from the
    /// waitlist so the two stay disjoint.
    pub fn from_snapshot(session: Session) -> Self {
        if session.capacity <= 0 {
            warn!(
                "session {} has non-positive capacity {}; all bookings will be waitlisted",
                session.name, session.capacity
            );
        }

        let roster = Roster::from_members(session.capacity, session.participants);
        let waiting: Vec<MemberId> = session
            .waitlist
            .into_iter()
            .filter(|m| {
                let admitted = roster.contains(m);
                if admitted {
                    warn!("{m} is both admitted and waiting in {}; keeping the seat", session.name);
                }
                !admitted
            })
            .collect();

        Self {
            name: session.name,
            instructor: session.instructor,
            time: session.time,
            image_path: session.image_path,
            roster,
            waitlist: WaitlistQueue::from_members(waiting),
        }
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> Session {
        Session {
            name: self.name.clone(),
            capacity: self.roster.capacity(),
            participants: self.roster.members().to_vec(),
            waitlist: self.waitlist.to_vec(),
            instructor: self.instructor.clone(),
            time: self.time.clone(),
            image_path: self.image_path.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> i64 {
        self.roster.capacity()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn waitlist(&self) -> &WaitlistQueue {
        &self.waitlist
    }

    /// Book a participant.
    pub fn book(&mut self, participant: &MemberId) -> BookingOutcome {
        if self.roster.contains(participant) {
            debug!("{participant} already admitted to {}", self.name);
            return BookingOutcome::AlreadyAdmitted;
        }

        if let Some(position) = self.waitlist.position(participant) {
            if !self.roster.has_room() {
                return BookingOutcome::AlreadyWaitlisted { position };
            }
            self.waitlist.remove(participant);
            let admitted = self.roster.try_admit(participant.clone());
            debug_assert!(admitted, "roster had room and no duplicate");
            debug!("{participant} promoted from waitlist of {}", self.name);
            return BookingOutcome::Admitted { promoted: true };
        }

        if self.roster.try_admit(participant.clone()) {
            debug!(
                "{participant} admitted to {} ({}/{})",
                self.name,
                self.roster.len(),
                self.roster.capacity()
            );
            return BookingOutcome::Admitted { promoted: false };
        }

        if !self.roster.has_valid_capacity() {
            warn!(
                "session {} has invalid capacity {}; waitlisting {participant}",
                self.name,
                self.roster.capacity()
            );
        }
        let position = self.waitlist.len();
        self.waitlist.push_back(participant.clone());
        debug!("{participant} waitlisted for {} at position {position}", self.name);
        BookingOutcome::Waitlisted { position }
    }

    /// Cancel a participant's booking or waitlist entry.
    ///
    /// Freeing a roster seat promotes the head of the waitlist into it.
    pub fn cancel(&mut self, participant: &MemberId) -> CancelOutcome {
        if self.roster.remove(participant) {
            let promoted = self.promote_next();
            debug!(
                "{participant} cancelled from {}; promoted {:?}",
                self.name, promoted
            );
            return CancelOutcome::Removed { promoted };
        }

        if self.waitlist.remove(participant) {
            debug!("{participant} left the waitlist of {}", self.name);
            return CancelOutcome::Removed { promoted: None };
        }

        CancelOutcome::NotFound
    }

    /// Move the waitlist head onto the roster if a seat is free.
    fn promote_next(&mut self) -> Option<MemberId> {
        if !self.roster.has_room() {
            return None;
        }
        let next = self.waitlist.pop_front()?;
        let admitted = self.roster.try_admit(next.clone());
        debug_assert!(admitted, "waitlist head was already on the roster");
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MemberId {
        MemberId::from(s)
    }

    fn controller(capacity: i64) -> SessionAdmissionController {
        SessionAdmissionController::from_snapshot(Session::new("spin", capacity))
    }

    #[test]
    fn test_capacity_two_scenario() {
        let mut class = controller(2);

        assert_eq!(class.book(&id("A")), BookingOutcome::Admitted { promoted: false });
        assert_eq!(class.book(&id("B")), BookingOutcome::Admitted { promoted: false });
        assert_eq!(class.book(&id("C")), BookingOutcome::Waitlisted { position: 0 });

        let outcome = class.cancel(&id("A"));
        assert_eq!(outcome, CancelOutcome::Removed { promoted: Some(id("C")) });

        let snapshot = class.snapshot();
        assert_eq!(snapshot.participants, vec![id("B"), id("C")]);
        assert!(snapshot.waitlist.is_empty());
    }

    #[test]
    fn test_book_twice_is_idempotent() {
        let mut class = controller(3);
        class.book(&id("A"));
        let before = class.snapshot();

        assert_eq!(class.book(&id("A")), BookingOutcome::AlreadyAdmitted);
        assert_eq!(class.snapshot(), before);
    }

    #[test]
    fn test_rebook_waitlisted_without_room() {
        let mut class = controller(1);
        class.book(&id("A"));
        class.book(&id("B"));

        assert_eq!(class.book(&id("B")), BookingOutcome::AlreadyWaitlisted { position: 0 });
        assert_eq!(class.waitlist().len(), 1);
    }

    #[test]
    fn test_rebook_waitlisted_with_room_promotes() {
        // A roster loaded below capacity with people still waiting.
        let mut session = Session::new("spin", 2);
        session.participants = vec![id("A")];
        session.waitlist = vec![id("B"), id("C"), id("D")];
        let mut class = SessionAdmissionController::from_snapshot(session);

        assert_eq!(class.book(&id("C")), BookingOutcome::Admitted { promoted: true });
        assert_eq!(class.roster().members(), &[id("A"), id("C")]);
        assert_eq!(class.waitlist().to_vec(), vec![id("B"), id("D")]);
    }

    #[test]
    fn test_zero_capacity_always_waitlists() {
        let mut class = controller(0);
        assert_eq!(class.book(&id("A")), BookingOutcome::Waitlisted { position: 0 });
        assert_eq!(class.book(&id("B")), BookingOutcome::Waitlisted { position: 1 });
        assert!(class.roster().is_empty());
    }

    #[test]
    fn test_negative_capacity_cancel_does_not_promote() {
        let mut class = controller(-1);
        class.book(&id("A"));
        class.book(&id("B"));

        assert_eq!(class.cancel(&id("A")), CancelOutcome::Removed { promoted: None });
        assert!(class.roster().is_empty());
        assert_eq!(class.waitlist().to_vec(), vec![id("B")]);
    }

    #[test]
    fn test_cancel_waitlisted_member() {
        let mut class = controller(1);
        class.book(&id("A"));
        class.book(&id("B"));
        class.book(&id("C"));
        class.book(&id("D"));

        assert_eq!(class.cancel(&id("C")), CancelOutcome::Removed { promoted: None });
        assert_eq!(class.waitlist().to_vec(), vec![id("B"), id("D")]);
        assert_eq!(class.roster().members(), &[id("A")]);
    }

    #[test]
    fn test_cancel_unknown_member() {
        let mut class = controller(2);
        class.book(&id("A"));
        let before = class.snapshot();

        assert_eq!(class.cancel(&id("Z")), CancelOutcome::NotFound);
        assert_eq!(class.snapshot(), before);
    }

    #[test]
    fn test_cancel_with_empty_waitlist() {
        let mut class = controller(2);
        class.book(&id("A"));
        assert_eq!(class.cancel(&id("A")), CancelOutcome::Removed { promoted: None });
        assert!(class.roster().is_empty());
    }

    #[test]
    fn test_snapshot_overlap_is_repaired() {
        let mut session = Session::new("spin", 2);
        session.participants = vec![id("A")];
        session.waitlist = vec![id("A"), id("B")];
        let class = SessionAdmissionController::from_snapshot(session);

        assert_eq!(class.waitlist().to_vec(), vec![id("B")]);
    }

    #[test]
    fn test_snapshot_keeps_metadata() {
        let session = Session::new("boxing", 4)
            .with_instructor("Lee")
            .with_time("18:30")
            .with_image_path("img/boxing.png");
        let class = SessionAdmissionController::from_snapshot(session.clone());
        assert_eq!(class.snapshot(), session);
    }
}
