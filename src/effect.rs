//! Effect episode state machine.
//!
//! Idle -> Active on a fire signal, Active -> Idle after a fixed duration.
//! Delayed signals sit in a small timer queue keyed by absolute due time and
//! are polled once per frame, so timing is driven entirely by the `now`
//! values the caller passes in.

/// Signals raised by the sequencer for external collaborators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectSignal {
    /// Show the final message (once per episode)
    RevealMessage,
    /// Episode over; the next trigger will be accepted
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectState {
    Idle,
    Active { started_at: f64 },
}

#[derive(Clone, Copy, Debug)]
struct ScheduledSignal {
    due: f64,
    signal: EffectSignal,
}

pub struct EffectSequencer {
    state: EffectState,
    timers: Vec<ScheduledSignal>,
    reveal_delay_ms: f64,
    duration_ms: f64,
}

impl EffectSequencer {
    pub fn new(reveal_delay_ms: f64, duration_ms: f64) -> Self {
        Self {
            state: EffectState::Idle,
            timers: Vec::new(),
            reveal_delay_ms,
            duration_ms,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> EffectState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EffectState::Active { .. })
    }

    pub fn started_at(&self) -> Option<f64> {
        match self.state {
            EffectState::Active { started_at } => Some(started_at),
            EffectState::Idle => None,
        }
    }

    /// Enter Active at `now` and schedule the episode's signals
    /// Returns false (and changes nothing) if an episode is already running
    pub fn begin(&mut self, now: f64) -> bool {
        if self.is_active() {
            return false;
        }

        self.state = EffectState::Active { started_at: now };
        self.timers.clear();
        self.timers.push(ScheduledSignal {
            due: now + self.reveal_delay_ms,
            signal: EffectSignal::RevealMessage,
        });
        self.timers.push(ScheduledSignal {
            due: now + self.duration_ms,
            signal: EffectSignal::Ended,
        });
        true
    }

    /// Fire every timer due at or before `now`, earliest first
    pub fn poll(&mut self, now: f64) -> Vec<EffectSignal> {
        if self.timers.iter().all(|t| t.due > now) {
            return Vec::new();
        }

        let mut due: Vec<ScheduledSignal> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));

        for timer in &due {
            if timer.signal == EffectSignal::Ended {
                self.state = EffectState::Idle;
            }
        }
        due.into_iter().map(|t| t.signal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> EffectSequencer {
        EffectSequencer::new(3500.0, 6000.0)
    }

    #[test]
    fn begin_activates_once() {
        let mut seq = sequencer();
        assert!(seq.begin(1000.0));
        assert_eq!(seq.started_at(), Some(1000.0));

        assert!(!seq.begin(2000.0));
        assert_eq!(seq.started_at(), Some(1000.0));
    }

    #[test]
    fn reveal_fires_exactly_once_at_its_delay() {
        let mut seq = sequencer();
        seq.begin(0.0);
        assert!(seq.poll(3499.0).is_empty());
        assert_eq!(seq.poll(3500.0), vec![EffectSignal::RevealMessage]);
        assert!(seq.poll(3600.0).is_empty());
        assert!(seq.is_active());
    }

    #[test]
    fn ends_after_duration_and_accepts_next_trigger() {
        let mut seq = sequencer();
        seq.begin(0.0);
        seq.poll(3500.0);
        assert!(seq.poll(5999.0).is_empty());
        assert_eq!(seq.poll(6000.0), vec![EffectSignal::Ended]);
        assert_eq!(seq.state(), EffectState::Idle);

        assert!(seq.begin(6001.0));
        assert_eq!(seq.started_at(), Some(6001.0));
    }

    #[test]
    fn late_poll_delivers_both_signals_in_order() {
        let mut seq = sequencer();
        seq.begin(0.0);
        assert_eq!(
            seq.poll(10_000.0),
            vec![EffectSignal::RevealMessage, EffectSignal::Ended]
        );
        assert!(!seq.is_active());
    }

    #[test]
    fn idle_poll_is_quiet() {
        let mut seq = sequencer();
        assert!(seq.poll(1e9).is_empty());
        assert_eq!(seq.started_at(), None);
    }
}
