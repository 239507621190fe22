//! Session snapshot and admission result types.

use crate::types::MemberId;
use serde::{Deserialize, Serialize, Serializer};

/// Persisted form of one class session.
///
/// Derived counters (`currentParticipants`, `waitlistSize`) are written on
/// serialization and ignored when reading.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub capacity: i64,
    #[serde(default)]
    pub participants: Vec<MemberId>,
    #[serde(default)]
    pub waitlist: Vec<MemberId>,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub image_path: String,
}

impl Session {
    /// Empty session with no descriptive metadata.
    pub fn new(name: impl Into<String>, capacity: i64) -> Self {
        Self {
            name: name.into(),
            capacity,
            participants: Vec::new(),
            waitlist: Vec::new(),
            instructor: String::new(),
            time: String::new(),
            image_path: String::new(),
        }
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    /// Parse a session from its JSON document.
    pub fn from_json(value: &serde_json::Value) -> crate::Result<Self> {
        Ok(Session::deserialize(value)?)
    }

    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionWire<'a> {
    name: &'a str,
    capacity: i64,
    current_participants: usize,
    participants: &'a [MemberId],
    waitlist: &'a [MemberId],
    waitlist_size: usize,
    instructor: &'a str,
    time: &'a str,
    image_path: &'a str,
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SessionWire {
            name: &self.name,
            capacity: self.capacity,
            current_participants: self.participants.len(),
            participants: &self.participants,
            waitlist: &self.waitlist,
            waitlist_size: self.waitlist.len(),
            instructor: &self.instructor,
            time: &self.time,
            image_path: &self.image_path,
        }
        .serialize(serializer)
    }
}

/// Result of a booking request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Placed on the roster. `promoted` is set when the member came off the waitlist.
    Admitted { promoted: bool },
    /// Newly queued at the given zero-based waitlist position.
    Waitlisted { position: usize },
    /// Already queued and still no room; nothing changed.
    AlreadyWaitlisted { position: usize },
    /// Already on the roster; nothing changed.
    AlreadyAdmitted,
}

impl BookingOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(
            self,
            BookingOutcome::Admitted { .. } | BookingOutcome::AlreadyAdmitted
        )
    }

    pub fn is_waitlisted(&self) -> bool {
        matches!(
            self,
            BookingOutcome::Waitlisted { .. } | BookingOutcome::AlreadyWaitlisted { .. }
        )
    }
}

/// Result of a cancellation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Removed from the roster or waitlist. `promoted` names the waitlisted
    /// member who took the freed seat, if any.
    Removed { promoted: Option<MemberId> },
    /// Neither admitted nor waiting; nothing changed.
    NotFound,
}

impl CancelOutcome {
    pub fn promoted(&self) -> Option<&MemberId> {
        match self {
            CancelOutcome::Removed { promoted } => promoted.as_ref(),
            CancelOutcome::NotFound => None,
        }
    }
}
