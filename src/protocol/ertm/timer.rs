//! Single-slot alarm shared by the retransmission and monitor timers.
//!
//! ERTM never runs both timers at once: the monitor timer replaces the
//! retransmission timer when a poll goes out, and the retransmission timer
//! cannot start while a poll is outstanding. Holding at most one
//! `(kind, deadline)` pair makes that exclusion structural.
use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKind {
    Retransmission,
    Monitor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlarmSlot {
    armed: Option<(TimerKind, Instant)>,
}

impl AlarmSlot {
    pub const fn new() -> Self {
        Self { armed: None }
    }

    pub fn armed(&self) -> Option<TimerKind> {
        self.armed.map(|(kind, _)| kind)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|(_, deadline)| deadline)
    }

    /// Arm the retransmission timer unless it is already running or the
    /// monitor timer holds the slot.
    pub fn start_retransmission(&mut self, now: Instant, timeout: Duration) {
        if self.armed.is_none() {
            self.armed = Some((TimerKind::Retransmission, now + timeout));
        }
    }

    /// Re-arm the retransmission timer from `now`. No-op while monitoring.
    pub fn restart_retransmission(&mut self, now: Instant, timeout: Duration) {
        if self.armed() != Some(TimerKind::Monitor) {
            self.armed = Some((TimerKind::Retransmission, now + timeout));
        }
    }

    pub fn stop_retransmission(&mut self) {
        if self.armed() == Some(TimerKind::Retransmission) {
            self.armed = None;
        }
    }

    /// Arm the monitor timer, replacing whatever was armed.
    pub fn start_monitor(&mut self, now: Instant, timeout: Duration) {
        self.armed = Some((TimerKind::Monitor, now + timeout));
    }

    pub fn stop_monitor(&mut self) {
        if self.armed() == Some(TimerKind::Monitor) {
            self.armed = None;
        }
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Disarm and return the timer whose deadline is at or before `now`.
    pub fn take_expired(&mut self, now: Instant) -> Option<TimerKind> {
        match self.armed {
            Some((kind, deadline)) if deadline <= now => {
                self.armed = None;
                Some(kind)
            }
            _ => None,
        }
    }
}
