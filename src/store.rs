//! Process-wide handle over sessions, the subscription ledger and reminders.

use crate::error::{CoreError, Result};
use crate::ledger::{
    HistoryEntry, LedgerConfig, RenewOutcome, SubscriptionCancelOutcome, SubscriptionLedger,
    SubscriptionRecord,
};
use crate::notifications::{Notification, NotificationScheduler, NotificationSink, ReminderConfig};
use crate::sessions::{BookingOutcome, CancelOutcome, Session, SessionAdmissionController};
use crate::types::{MemberId, Timestamp};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Store configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Subscription ledger settings.
    pub ledger: LedgerConfig,

    /// Renewal reminder settings.
    pub reminders: ReminderConfig,
}

impl StoreConfig {
    /// Parse a configuration document; missing fields take their defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(StoreConfig::deserialize(value)?)
    }
}

type SessionHandle = Arc<Mutex<SessionAdmissionController>>;

/// Shared state for all request handlers.
///
/// Each session sits behind its own mutex, so bookings for different
/// sessions proceed in parallel while bookings for the same session are
/// applied one at a time. The ledger is guarded as a whole: lookups and
/// expiry scans share a read lock, mutations take the write lock. Lock
/// waits never time out.
pub struct FacilityStore {
    config: StoreConfig,

    /// Sessions by name.
    sessions: RwLock<HashMap<String, SessionHandle>>,

    /// Subscription records.
    ledger: RwLock<SubscriptionLedger>,

    /// Outbound reminder queue.
    notifications: NotificationScheduler,
}

impl FacilityStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ledger: RwLock::new(SubscriptionLedger::new(config.ledger.clone())),
            notifications: NotificationScheduler::new(config.reminders.clone()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Session Operations ---

    /// Register a session from its snapshot.
    pub fn create_session(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&session.name) {
            return Err(CoreError::SessionExists(session.name));
        }
        info!("session {} created (capacity {})", session.name, session.capacity);
        let name = session.name.clone();
        let controller = SessionAdmissionController::from_snapshot(session);
        sessions.insert(name, Arc::new(Mutex::new(controller)));
        Ok(())
    }

    /// Insert or overwrite a session with the given snapshot.
    pub fn replace_session(&self, session: Session) {
        let name = session.name.clone();
        let controller = SessionAdmissionController::from_snapshot(session);
        let mut sessions = self.sessions.write();
        if let Some(handle) = sessions.get(&name) {
            *handle.lock() = controller;
            return;
        }
        sessions.insert(name, Arc::new(Mutex::new(controller)));
    }

    /// Replace every session with the given snapshots.
    pub fn load_sessions(&self, snapshots: Vec<Session>) {
        let loaded: HashMap<String, SessionHandle> = snapshots
            .into_iter()
            .map(|s| {
                let controller = SessionAdmissionController::from_snapshot(s);
                (controller.name().to_string(), Arc::new(Mutex::new(controller)))
            })
            .collect();
        info!("loaded {} sessions", loaded.len());
        *self.sessions.write() = loaded;
    }

    /// Book a participant into a session.
    pub fn book(&self, session: &str, participant: &MemberId) -> Result<BookingOutcome> {
        let handle = self.session_handle(session)?;
        let outcome = handle.lock().book(participant);
        Ok(outcome)
    }

    /// Cancel a participant's booking or waitlist entry.
    pub fn cancel_booking(&self, session: &str, participant: &MemberId) -> Result<CancelOutcome> {
        let handle = self.session_handle(session)?;
        let outcome = handle.lock().cancel(participant);
        if let Some(promoted) = outcome.promoted() {
            info!("{promoted} promoted into {session} after {participant} cancelled");
        }
        Ok(outcome)
    }

    /// Snapshot of one session.
    pub fn session(&self, name: &str) -> Result<Session> {
        let handle = self.session_handle(name)?;
        let snapshot = handle.lock().snapshot();
        Ok(snapshot)
    }

    /// Snapshots of every session, ordered by name.
    pub fn sessions(&self) -> Vec<Session> {
        let mut handles: Vec<(String, SessionHandle)> = self
            .sessions
            .read()
            .iter()
            .map(|(name, handle)| (name.clone(), Arc::clone(handle)))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));
        handles.iter().map(|(_, h)| h.lock().snapshot()).collect()
    }

    /// Session names, sorted.
    pub fn session_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn session_handle(&self, name: &str) -> Result<SessionHandle> {
        self.sessions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::SessionNotFound(name.to_string()))
    }

    // --- Subscription Operations ---

    /// Replace the ledger with a persisted snapshot.
    pub fn load_ledger(&self, records: Vec<SubscriptionRecord>) {
        let ledger = SubscriptionLedger::from_records(self.config.ledger.clone(), records);
        info!("loaded {} subscriptions", ledger.len());
        *self.ledger.write() = ledger;
    }

    /// All records in ledger order.
    pub fn ledger_snapshot(&self) -> Vec<SubscriptionRecord> {
        self.ledger.read().records().to_vec()
    }

    /// Start a subscription for a member who has none.
    pub fn subscribe(&self, record: SubscriptionRecord) -> Result<()> {
        self.ledger.write().add(record)
    }

    pub fn find_subscription(&self, member: &MemberId) -> Option<SubscriptionRecord> {
        self.ledger.read().find(member).cloned()
    }

    pub fn subscription_history(&self, member: &MemberId) -> Option<Vec<HistoryEntry>> {
        self.ledger.read().history(member).map(|h| h.iter().cloned().collect())
    }

    /// Renew a member's plan starting at `now`.
    pub fn renew(
        &self,
        member: &MemberId,
        plan_name: impl Into<String>,
        duration: impl Into<String>,
        price: f64,
        now: Timestamp,
    ) -> Result<RenewOutcome> {
        self.ledger
            .write()
            .renew(member, plan_name, duration, price, now)
    }

    /// Cancel a member's subscription, removing it from the ledger.
    pub fn cancel_subscription(&self, member: &MemberId) -> SubscriptionCancelOutcome {
        self.ledger.write().cancel(member)
    }

    /// Subscriptions that have not expired but will within `days` of `now`.
    pub fn expiring_within(&self, days: i64, now: Timestamp) -> Vec<SubscriptionRecord> {
        self.ledger
            .read()
            .expiring_within(days, now)
            .into_iter()
            .cloned()
            .collect()
    }

    // --- Notifications ---

    /// Enqueue renewal reminders due at `now` and return them.
    pub fn scan_renewal_reminders(&self, now: Timestamp) -> Vec<Notification> {
        let ledger = self.ledger.read();
        self.notifications.scan_renewal_reminders(&ledger, now)
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifications.pending()
    }

    /// Take every queued reminder, oldest first.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Deliver every queued reminder to `sink`, oldest first.
    pub fn process_notifications(&self, sink: &mut dyn NotificationSink) -> usize {
        self.notifications.process(sink)
    }
}

impl Default for FacilityStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
