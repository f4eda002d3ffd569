//! Debounced write-through of edited outline/questions.
//!
//! Edits are folded into one pending `CacheUpdate`. The update goes out after
//! a quiet period, or right away when a flush is requested. Only one write is
//! in flight at a time so the backend sees updates in edit order.

use std::time::{Duration, Instant};

use crate::api::CacheUpdate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Pending,
    InFlight,
    Synced,
    Failed(String),
}

impl SyncStatus {
    pub fn label(&self) -> String {
        match self {
            SyncStatus::Idle => "cache: idle".to_string(),
            SyncStatus::Pending => "cache: pending".to_string(),
            SyncStatus::InFlight => "cache: saving...".to_string(),
            SyncStatus::Synced => "cache: saved".to_string(),
            SyncStatus::Failed(message) => format!("cache: failed ({message})"),
        }
    }
}

#[derive(Debug)]
pub struct CacheSync {
    debounce: Duration,
    pending: Option<CacheUpdate>,
    last_edit: Option<Instant>,
    flush_requested: bool,
    in_flight: bool,
    status: SyncStatus,
}

impl CacheSync {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_edit: None,
            flush_requested: false,
            in_flight: false,
            status: SyncStatus::Idle,
        }
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Queue an edit; restarts the quiet period
    pub fn record(&mut self, update: CacheUpdate, now: Instant) {
        if update.is_empty() {
            return;
        }
        match self.pending.as_mut() {
            Some(pending) => pending.merge(update),
            None => self.pending = Some(update),
        }
        self.last_edit = Some(now);
        if !self.in_flight {
            self.status = SyncStatus::Pending;
        }
    }

    /// Send the pending update at the next opportunity, skipping the debounce
    pub fn request_flush(&mut self) {
        if self.pending.is_some() {
            self.flush_requested = true;
        }
    }

    /// Hand out the pending update if it is due and nothing is in flight.
    /// The caller must report the outcome through `finish`.
    pub fn take_ready(&mut self, now: Instant) -> Option<CacheUpdate> {
        if self.in_flight || self.pending.is_none() {
            return None;
        }

        let quiet = self
            .last_edit
            .map(|at| now.saturating_duration_since(at) >= self.debounce)
            .unwrap_or(true);
        if !self.flush_requested && !quiet {
            return None;
        }

        self.flush_requested = false;
        self.in_flight = true;
        self.status = SyncStatus::InFlight;
        self.pending.take()
    }

    /// Take whatever is pending regardless of timing (used on shutdown)
    pub fn take_all(&mut self) -> Option<CacheUpdate> {
        self.flush_requested = false;
        self.pending.take()
    }

    /// Record the outcome of the write handed out by `take_ready`
    pub fn finish(&mut self, outcome: Result<(), String>) {
        self.in_flight = false;
        self.status = match outcome {
            Err(message) => SyncStatus::Failed(message),
            Ok(()) if self.pending.is_some() => SyncStatus::Pending,
            Ok(()) => SyncStatus::Synced,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    #[test]
    fn test_waits_for_quiet_period() {
        let start = Instant::now();
        let mut sync = CacheSync::new(DEBOUNCE);
        sync.record(CacheUpdate::outline("O"), start);

        assert_eq!(sync.take_ready(start + Duration::from_millis(100)), None);
        assert_eq!(*sync.status(), SyncStatus::Pending);

        let update = sync.take_ready(start + DEBOUNCE).unwrap();
        assert_eq!(update, CacheUpdate::outline("O"));
        assert_eq!(*sync.status(), SyncStatus::InFlight);
    }

    #[test]
    fn test_new_edit_restarts_debounce_and_merges() {
        let start = Instant::now();
        let mut sync = CacheSync::new(DEBOUNCE);
        sync.record(CacheUpdate::outline("O1"), start);
        sync.record(CacheUpdate::questions("Q1"), start + Duration::from_millis(400));
        sync.record(CacheUpdate::outline("O2"), start + Duration::from_millis(450));

        assert_eq!(sync.take_ready(start + Duration::from_millis(600)), None);

        let update = sync.take_ready(start + Duration::from_millis(950)).unwrap();
        assert_eq!(update.outline.as_deref(), Some("O2"));
        assert_eq!(update.questions.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_flush_skips_debounce() {
        let start = Instant::now();
        let mut sync = CacheSync::new(DEBOUNCE);
        sync.record(CacheUpdate::questions("Q"), start);
        sync.request_flush();

        assert!(sync.take_ready(start).is_some());
    }

    #[test]
    fn test_one_write_in_flight() {
        let start = Instant::now();
        let mut sync = CacheSync::new(Duration::ZERO);
        sync.record(CacheUpdate::outline("O1"), start);
        assert!(sync.take_ready(start).is_some());

        sync.record(CacheUpdate::outline("O2"), start);
        assert_eq!(sync.take_ready(start), None);
        assert_eq!(*sync.status(), SyncStatus::InFlight);

        sync.finish(Ok(()));
        assert_eq!(*sync.status(), SyncStatus::Pending);
        assert_eq!(sync.take_ready(start).unwrap(), CacheUpdate::outline("O2"));

        sync.finish(Ok(()));
        assert_eq!(*sync.status(), SyncStatus::Synced);
    }

    #[test]
    fn test_failure_is_reported_not_retried() {
        let start = Instant::now();
        let mut sync = CacheSync::new(Duration::ZERO);
        sync.record(CacheUpdate::outline("O1"), start);
        sync.take_ready(start).unwrap();

        sync.finish(Err("HTTP 500".to_string()));
        assert_eq!(*sync.status(), SyncStatus::Failed("HTTP 500".to_string()));
        assert!(!sync.has_pending());
        assert_eq!(sync.take_ready(start), None);
    }

    #[test]
    fn test_empty_update_ignored() {
        let mut sync = CacheSync::new(DEBOUNCE);
        sync.record(CacheUpdate::default(), Instant::now());
        assert!(!sync.has_pending());
        assert_eq!(*sync.status(), SyncStatus::Idle);
    }
}
