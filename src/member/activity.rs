//! Decaying conversation-activity weights.
//!
//! Each participant carries one tracker. Incoming and outgoing message
//! weights decay exponentially with wall-clock time so that older
//! activity asymptotically vanishes; the combined weight orders
//! participants by "most active conversation partner".

use chrono::{DateTime, Utc};

/// Exponentially decaying activity accumulators.
///
/// Owned by exactly one participant. Mutation happens on the single
/// protocol-event-processing path, so no locking is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTracker {
    incoming: f64,
    outgoing: f64,
    /// Per-second decay multiplier, strictly inside (0, 1).
    decay_factor: f64,
    last_fade: Option<DateTime<Utc>>,
}

impl ActivityTracker {
    pub fn new(decay_factor: f64) -> Self {
        debug_assert!(decay_factor > 0.0 && decay_factor < 1.0);
        Self {
            incoming: 0.0,
            outgoing: 0.0,
            decay_factor,
            last_fade: None,
        }
    }

    /// Apply pending decay for the time elapsed since the last fade and
    /// advance the fade timestamp. Negative elapsed time (server-time
    /// skew) applies no decay.
    fn fade(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.last_fade {
            let elapsed = (now - last).num_milliseconds() as f64 / 1000.0;
            if elapsed > 0.0 {
                let factor = self.decay_factor.powf(elapsed);
                self.incoming *= factor;
                self.outgoing *= factor;
            }
        }
        self.last_fade = Some(now);
    }

    /// Record one unit of conversation received from the participant.
    pub fn record_incoming(&mut self, now: DateTime<Utc>) {
        self.fade(now);
        self.incoming += 1.0;
    }

    /// Record one unit of conversation sent to the participant.
    pub fn record_outgoing(&mut self, now: DateTime<Utc>) {
        self.fade(now);
        self.outgoing += 1.0;
    }

    /// Combined weight after applying pending decay. Adds nothing, so
    /// repeated queries never increase the result.
    pub fn total_weight(&mut self, now: DateTime<Utc>) -> f64 {
        self.fade(now);
        self.incoming + self.outgoing
    }

    pub fn incoming_weight(&self) -> f64 {
        self.incoming
    }

    pub fn outgoing_weight(&self) -> f64 {
        self.outgoing
    }

    pub fn last_fade(&self) -> Option<DateTime<Utc>> {
        self.last_fade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn fresh_tracker_has_zero_weight() {
        let mut tracker = ActivityTracker::new(0.5);
        assert_eq!(tracker.total_weight(t0()), 0.0);
    }

    #[test]
    fn record_adds_one_unit() {
        let mut tracker = ActivityTracker::new(0.5);
        tracker.record_incoming(t0());
        assert_eq!(tracker.incoming_weight(), 1.0);
        assert_eq!(tracker.total_weight(t0()), 1.0);
    }

    #[test]
    fn weights_halve_per_second_at_factor_half() {
        let mut tracker = ActivityTracker::new(0.5);
        tracker.record_incoming(t0());
        tracker.record_outgoing(t0());

        let weight = tracker.total_weight(t0() + TimeDelta::seconds(1));
        assert!((weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn decay_applies_before_adding_unit() {
        let mut tracker = ActivityTracker::new(0.5);
        tracker.record_incoming(t0());
        tracker.record_incoming(t0() + TimeDelta::seconds(1));
        // 1.0 decayed to 0.5, then one unit added.
        assert!((tracker.incoming_weight() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn clock_skew_applies_no_decay() {
        let mut tracker = ActivityTracker::new(0.5);
        tracker.record_incoming(t0());
        let weight = tracker.total_weight(t0() - TimeDelta::seconds(30));
        assert_eq!(weight, 1.0);
    }

    proptest! {
        #[test]
        fn weight_is_non_increasing_without_records(
            factor in 0.01f64..0.999,
            gap_one in 0i64..100_000,
            gap_two in 1i64..100_000,
        ) {
            let mut tracker = ActivityTracker::new(factor);
            tracker.record_incoming(t0());
            tracker.record_outgoing(t0());

            let first = tracker.total_weight(t0() + TimeDelta::seconds(gap_one));
            let second =
                tracker.total_weight(t0() + TimeDelta::seconds(gap_one + gap_two));
            prop_assert!(second <= first);
        }
    }
}
