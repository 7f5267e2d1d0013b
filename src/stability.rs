//! Temporal smoothing of per-frame classifier output.
//!
//! Two distinct situations get two distinct treatments: a visible hand with
//! a low-confidence frame keeps the previous stable symbol (hysteresis, no
//! flicker), while a lost hand clears the stable symbol and ages the buffer
//! out (hard reset).

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::types::{GestureCandidate, Symbol};

/// One confidently recognized symbol and when it was recognized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferEntry {
    pub symbol: Symbol,
    pub timestamp: Instant,
}

pub struct StabilityFilter {
    confidence_threshold: f32,
    buffer_capacity: usize,
    stale_horizon: Duration,
    buffer: VecDeque<BufferEntry>,
    last_stable: Option<Symbol>,
}

impl StabilityFilter {
    pub fn new(confidence_threshold: f32, buffer_capacity: usize, stale_horizon: Duration) -> Self {
        Self {
            // A threshold outside (0, 1] would either pass everything or
            // nothing; clamp rather than propagate a misconfiguration.
            confidence_threshold: confidence_threshold.clamp(f32::EPSILON, 1.0),
            buffer_capacity,
            stale_horizon,
            buffer: VecDeque::with_capacity(buffer_capacity),
            last_stable: None,
        }
    }

    /// Advance the filter by one frame and return the symbol to emit.
    ///
    /// `hand_present` is false both when the provider saw nothing and when
    /// the landmark data was unusable; either way the reset path runs.
    pub fn update(
        &mut self,
        candidate: Option<GestureCandidate>,
        hand_present: bool,
        now: Instant,
    ) -> Option<Symbol> {
        if !hand_present {
            self.purge_stale(now);
            self.last_stable = None;
            return None;
        }

        match candidate {
            Some(candidate) if candidate.confidence > self.confidence_threshold => {
                self.last_stable = Some(candidate.symbol);
                self.buffer.push_back(BufferEntry {
                    symbol: candidate.symbol,
                    timestamp: now,
                });
                while self.buffer.len() > self.buffer_capacity {
                    self.buffer.pop_front();
                }
                Some(candidate.symbol)
            }
            // Low confidence or no candidate at all: hold the last stable
            // symbol and leave the buffer untouched.
            _ => self.last_stable,
        }
    }

    /// The last `count` confidently recognized symbols, oldest first.
    pub fn recent_symbols(&self, count: usize) -> impl Iterator<Item = Symbol> + '_ {
        let skip = self.buffer.len().saturating_sub(count);
        self.buffer.iter().skip(skip).map(|entry| entry.symbol)
    }

    pub fn last_stable(&self) -> Option<Symbol> {
        self.last_stable
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn purge_stale(&mut self, now: Instant) {
        let horizon = self.stale_horizon;
        self.buffer
            .retain(|entry| now.duration_since(entry.timestamp) < horizon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 0.65;
    const CAPACITY: usize = 10;
    const HORIZON: Duration = Duration::from_millis(2000);

    fn filter() -> StabilityFilter {
        StabilityFilter::new(THRESHOLD, CAPACITY, HORIZON)
    }

    fn candidate(symbol: Symbol, confidence: f32) -> Option<GestureCandidate> {
        Some(GestureCandidate { symbol, confidence })
    }

    #[test]
    fn confident_candidate_becomes_stable_and_buffered() {
        let mut filter = filter();
        let now = Instant::now();
        let emitted = filter.update(candidate(Symbol::A, 0.8), true, now);
        assert_eq!(emitted, Some(Symbol::A));
        assert_eq!(filter.last_stable(), Some(Symbol::A));
        assert_eq!(filter.buffer_len(), 1);
    }

    #[test]
    fn low_confidence_holds_previous_symbol() {
        let mut filter = filter();
        let t0 = Instant::now();
        filter.update(candidate(Symbol::A, 0.8), true, t0);

        let emitted = filter.update(candidate(Symbol::B, 0.5), true, t0 + Duration::from_millis(33));
        assert_eq!(emitted, Some(Symbol::A));
        assert_eq!(filter.buffer_len(), 1, "held frames must not append");
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut filter = filter();
        let t0 = Instant::now();
        filter.update(candidate(Symbol::A, 0.8), true, t0);

        // Exactly at the threshold does not override.
        let at_threshold = filter.update(
            candidate(Symbol::B, THRESHOLD),
            true,
            t0 + Duration::from_millis(33),
        );
        assert_eq!(at_threshold, Some(Symbol::A));

        let above = filter.update(
            candidate(Symbol::B, THRESHOLD + 0.01),
            true,
            t0 + Duration::from_millis(66),
        );
        assert_eq!(above, Some(Symbol::B));
    }

    #[test]
    fn no_candidate_with_hand_present_holds() {
        let mut filter = filter();
        let t0 = Instant::now();
        filter.update(candidate(Symbol::C, 0.9), true, t0);
        let emitted = filter.update(None, true, t0 + Duration::from_millis(33));
        assert_eq!(emitted, Some(Symbol::C));
    }

    #[test]
    fn lost_hand_clears_stable_symbol() {
        let mut filter = filter();
        let t0 = Instant::now();
        filter.update(candidate(Symbol::A, 0.8), true, t0);
        let emitted = filter.update(None, false, t0 + Duration::from_millis(33));
        assert_eq!(emitted, None);
        assert_eq!(filter.last_stable(), None);
    }

    #[test]
    fn lost_hand_purges_only_stale_entries() {
        let mut filter = filter();
        let t0 = Instant::now();
        filter.update(candidate(Symbol::A, 0.8), true, t0);
        filter.update(candidate(Symbol::B, 0.8), true, t0 + Duration::from_millis(1500));

        // 1.9 s after the first entry: nothing is past the horizon yet.
        filter.update(None, false, t0 + Duration::from_millis(1900));
        assert_eq!(filter.buffer_len(), 2);

        // 2.5 s: the first entry has aged out, the second has not.
        filter.update(None, false, t0 + Duration::from_millis(2500));
        assert_eq!(filter.buffer_len(), 1);
        let remaining: Vec<Symbol> = filter.recent_symbols(CAPACITY).collect();
        assert_eq!(remaining, vec![Symbol::B]);
    }

    #[test]
    fn buffer_evicts_oldest_beyond_capacity() {
        let mut filter = filter();
        let t0 = Instant::now();
        for step in 0..(CAPACITY + 3) {
            let symbol = if step < 3 { Symbol::A } else { Symbol::B };
            filter.update(
                candidate(symbol, 0.9),
                true,
                t0 + Duration::from_millis(step as u64 * 10),
            );
            assert!(filter.buffer_len() <= CAPACITY);
        }
        assert_eq!(filter.buffer_len(), CAPACITY);
        // The three A entries were pushed out first.
        assert!(filter.recent_symbols(CAPACITY).all(|s| s == Symbol::B));
    }

    #[test]
    fn recent_symbols_are_chronological() {
        let mut filter = filter();
        let t0 = Instant::now();
        for (step, symbol) in [Symbol::H, Symbol::E, Symbol::L].into_iter().enumerate() {
            filter.update(
                candidate(symbol, 0.9),
                true,
                t0 + Duration::from_millis(step as u64 * 10),
            );
        }
        let recent: Vec<Symbol> = filter.recent_symbols(2).collect();
        assert_eq!(recent, vec![Symbol::E, Symbol::L]);
    }

    #[test]
    fn out_of_range_threshold_is_clamped() {
        let mut filter = StabilityFilter::new(4.2, CAPACITY, HORIZON);
        let emitted = filter.update(candidate(Symbol::A, 1.0), true, Instant::now());
        // Clamped to 1.0, so a perfect-confidence candidate still cannot
        // strictly exceed it.
        assert_eq!(emitted, None);

        let mut permissive = StabilityFilter::new(-1.0, CAPACITY, HORIZON);
        let emitted = permissive.update(candidate(Symbol::A, 0.1), true, Instant::now());
        assert_eq!(emitted, Some(Symbol::A));
    }
}
