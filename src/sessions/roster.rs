//! Admitted participants of one session.

use crate::types::MemberId;

/// Ordered set of admitted participants, bound by a capacity.
///
/// Insertion order is admission order. A capacity of zero or less never
/// has room, so every booking against it lands on the waitlist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    capacity: i64,
    members: Vec<MemberId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            members: Vec::new(),
        }
    }

    /// Rebuild a roster from persisted members, dropping duplicates.
    ///
    /// A snapshot holding more members than the capacity is kept as is; the
    /// roster simply reports no room until it drains below the bound.
    pub fn from_members(capacity: i64, members: Vec<MemberId>) -> Self {
        let mut roster = Self::new(capacity);
        for member in members {
            if !roster.insert(member.clone()) {
                tracing::warn!("dropping duplicate roster entry {member}");
            }
        }
        if roster.capacity > 0 && roster.len() as i64 > roster.capacity {
            tracing::warn!(
                "roster holds {} members but capacity is {}",
                roster.len(),
                roster.capacity
            );
        }
        roster
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Whether the capacity is a usable (positive) bound.
    pub fn has_valid_capacity(&self) -> bool {
        self.capacity > 0
    }

    /// Whether another member can be admitted.
    pub fn has_room(&self) -> bool {
        self.has_valid_capacity() && (self.members.len() as i64) < self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    /// Admit a member if there is room and they are not already present.
    pub fn try_admit(&mut self, member: MemberId) -> bool {
        if !self.has_room() {
            return false;
        }
        self.insert(member)
    }

    /// Remove a member, preserving the order of the others.
    pub fn remove(&mut self, member: &MemberId) -> bool {
        match self.members.iter().position(|m| m == member) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }

    /// Append without the capacity check.
    fn insert(&mut self, member: MemberId) -> bool {
        if self.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::from(*n)).collect()
    }

    #[test]
    fn test_admit_until_full() {
        let mut roster = Roster::new(2);
        assert!(roster.try_admit("a".into()));
        assert!(roster.try_admit("b".into()));
        assert!(!roster.try_admit("c".into()));
        assert_eq!(roster.members(), ids(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_no_duplicates() {
        let mut roster = Roster::new(5);
        assert!(roster.try_admit("a".into()));
        assert!(!roster.try_admit("a".into()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_non_positive_capacity_has_no_room() {
        assert!(!Roster::new(0).has_room());
        assert!(!Roster::new(-3).has_room());
        assert!(!Roster::new(-3).has_valid_capacity());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut roster = Roster::from_members(5, ids(&["a", "b", "c"]));
        assert!(roster.remove(&"b".into()));
        assert!(!roster.remove(&"zz".into()));
        assert_eq!(roster.members(), ids(&["a", "c"]).as_slice());
    }

    #[test]
    fn test_from_members_dedupes() {
        let roster = Roster::from_members(5, ids(&["a", "b", "a"]));
        assert_eq!(roster.members(), ids(&["a", "b"]).as_slice());
    }
}
