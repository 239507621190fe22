//! Renewal reminder scans and the outbound notification queue.

use super::types::{Notification, ReminderConfig};
use crate::ledger::{SubscriptionLedger, SubscriptionRecord};
use crate::types::{Timestamp, SECONDS_PER_DAY};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

/// Receives drained notifications, one at a time, in queue order.
pub trait NotificationSink {
    fn deliver(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn deliver(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Derives renewal reminders and holds them until delivery.
pub struct NotificationScheduler {
    config: ReminderConfig,
    sender: Sender<Notification>,
    receiver: Receiver<Notification>,
}

impl NotificationScheduler {
    pub fn new(config: ReminderConfig) -> Self {
        let (sender, receiver) = match config.queue_capacity {
            Some(0) => {
                warn!("notification queue capacity 0 would drop every reminder; using an unbounded queue");
                unbounded()
            }
            Some(cap) => bounded(cap),
            None => unbounded(),
        };
        Self {
            config,
            sender,
            receiver,
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Reminders due at `now`, in ledger order. Does not touch the queue.
    ///
    /// A record is due when it has not expired and expires within the
    /// reminder window. With the default windows (7 and 14 days) every due
    /// reminder falls inside the discount window and carries the discount.
    pub fn reminders_for(&self, ledger: &SubscriptionLedger, now: Timestamp) -> Vec<Notification> {
        ledger
            .iter()
            .filter_map(|record| self.reminder(record, now))
            .collect()
    }

    /// Derive due reminders and enqueue them. Returns the derived reminders.
    pub fn scan_renewal_reminders(
        &self,
        ledger: &SubscriptionLedger,
        now: Timestamp,
    ) -> Vec<Notification> {
        let reminders = self.reminders_for(ledger, now);
        for notification in &reminders {
            self.enqueue(notification.clone());
        }
        debug!(
            "reminder scan at {:?}: {} of {} records due",
            now,
            reminders.len(),
            ledger.len()
        );
        reminders
    }

    /// Queue a notification. Returns false if it was dropped.
    pub fn enqueue(&self, notification: Notification) -> bool {
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(n)) => {
                warn!("notification queue full, dropping reminder for {}", n.member_id);
                false
            }
            Err(TrySendError::Disconnected(n)) => {
                warn!("notification queue closed, dropping reminder for {}", n.member_id);
                false
            }
        }
    }

    /// Number of queued notifications.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.receiver.try_iter().collect()
    }

    /// Hand every queued notification to `sink`, oldest first. Returns the count delivered.
    pub fn process(&self, sink: &mut dyn NotificationSink) -> usize {
        let mut delivered = 0;
        for notification in self.receiver.try_iter() {
            sink.deliver(notification);
            delivered += 1;
        }
        delivered
    }

    fn reminder(&self, record: &SubscriptionRecord, now: Timestamp) -> Option<Notification> {
        if record.is_expired_at(now)
            || record.expiry() > now.plus_days(self.config.reminder_window_days)
        {
            return None;
        }

        let remaining = record.seconds_remaining(now);
        let discount = if record.expiry() <= now.plus_days(self.config.discount_window_days) {
            self.config.discount_percent
        } else {
            0
        };
        let message = format!(
            "Your subscription expires in {} days. Early renewal discount: {}%",
            remaining / SECONDS_PER_DAY,
            discount
        );
        Some(Notification::new(
            record.member_id().clone(),
            message,
            record.expiry(),
        ))
    }
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new(ReminderConfig::default())
    }
}
