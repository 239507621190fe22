//! FIFO waitlist for one session.

use crate::types::MemberId;
use std::collections::VecDeque;

/// Members waiting for a freed roster slot, earliest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitlistQueue {
    queue: VecDeque<MemberId>,
}

impl WaitlistQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted order, dropping duplicates.
    pub fn from_members(members: Vec<MemberId>) -> Self {
        let mut queue = Self::new();
        for member in members {
            if !queue.push_back(member.clone()) {
                tracing::warn!("dropping duplicate waitlist entry {member}");
            }
        }
        queue
    }

    /// Queue a member at the tail. Returns false if already queued.
    pub fn push_back(&mut self, member: MemberId) -> bool {
        if self.contains(&member) {
            return false;
        }
        self.queue.push_back(member);
        true
    }

    /// Take the earliest-queued member.
    pub fn pop_front(&mut self) -> Option<MemberId> {
        self.queue.pop_front()
    }

    pub fn front(&self) -> Option<&MemberId> {
        self.queue.front()
    }

    /// Remove a member wherever they sit; the rest keep their relative order.
    pub fn remove(&mut self, member: &MemberId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|m| m != member);
        self.queue.len() != before
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.queue.contains(member)
    }

    /// Zero-based position in the queue.
    pub fn position(&self, member: &MemberId) -> Option<usize> {
        self.queue.iter().position(|m| m == member)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberId> {
        self.queue.iter()
    }

    pub fn to_vec(&self) -> Vec<MemberId> {
        self.queue.iter().cloned().collect()
    }
}
