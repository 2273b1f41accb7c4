use std::time::{Duration, Instant};

/// Bookkeeping for the single submission slot of a wizard.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRunState {
    in_flight: Option<u64>,
    attempts: u32,
    last_started_at: Option<Instant>,
    sequence: u64,
}

impl SubmissionRunState {
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_run_id(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_started_at(&self) -> Option<Instant> {
        self.last_started_at
    }

    /// Claims the slot. `None` while another run holds it.
    pub fn try_start(&mut self, now: Instant) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        self.sequence = self.sequence.saturating_add(1);
        self.attempts = self.attempts.saturating_add(1);
        self.in_flight = Some(self.sequence);
        self.last_started_at = Some(now);
        Some(self.sequence)
    }

    /// Releases the slot if `run_id` holds it and reports how long the run
    /// took. `None` for stale ids.
    pub fn finish(&mut self, run_id: u64, now: Instant) -> Option<Duration> {
        if self.in_flight != Some(run_id) {
            return None;
        }
        self.in_flight = None;
        Some(
            self.last_started_at
                .map(|started| now.saturating_duration_since(started))
                .unwrap_or_default(),
        )
    }

    pub fn reset(&mut self) {
        let sequence = self.sequence;
        *self = Self {
            sequence,
            ..Self::default()
        };
    }
}
