//! Wave pattern detection over a sliding hop window.
//!
//! Signal timestamps accumulate in a ring buffer.  Windows open every
//! `hop` and are evaluated when they close, each covering the trailing
//! `window` interval; an evaluation counting at least `min_signals`
//! emits exactly one [`GestureEvent::WaveDetected`].  Below-threshold
//! windows are silent — absence is never an error — and tearing the
//! detector down mid-window simply drops the partial accumulation.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// GestureEvent
// ════════════════════════════════════════════════════════════════════════════

/// Terminal output of the pipeline, delivered to sinks and forgotten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    /// At least the configured number of direction changes landed
    /// inside one evaluation window.
    WaveDetected,
}

// ════════════════════════════════════════════════════════════════════════════
// WaveConfig
// ════════════════════════════════════════════════════════════════════════════

/// Wave-window tuning.
///
/// The defaults (3 s window, 0.5 s hop, ≥3 signals) are demo-tuned
/// values with no deeper derivation, so they stay configurable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Length of each evaluation window.
    pub window:      Duration,
    /// Interval between window openings (and, once the first window
    /// has closed, between evaluations).
    pub hop:         Duration,
    /// Signals required inside one window to call it a wave.
    pub min_signals: usize,
}

impl Default for WaveConfig {
    fn default() -> Self {
        WaveConfig {
            window:      Duration::from_secs(3),
            hop:         Duration::from_millis(500),
            min_signals: 3,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WaveDetector
// ════════════════════════════════════════════════════════════════════════════

/// Stateful wave recogniser.
///
/// The caller owns the clock: [`record`](WaveDetector::record) takes
/// signal timestamps, [`poll`](WaveDetector::poll) evaluates every
/// window due by `now`.  The first evaluation falls one full window
/// after `start`, subsequent ones every hop — the window that opened at
/// `start + k·hop` is scored when it closes at `start + k·hop + window`.
#[derive(Debug)]
pub struct WaveDetector {
    cfg:       WaveConfig,
    signals:   VecDeque<Instant>,
    next_eval: Instant,
}

impl WaveDetector {
    pub fn new(cfg: WaveConfig, start: Instant) -> Self {
        WaveDetector {
            cfg,
            signals:   VecDeque::new(),
            next_eval: start + cfg.window,
        }
    }

    /// Record one direction signal.
    ///
    /// Timestamps must be non-decreasing; the session guarantees that
    /// by serializing frame processing.
    pub fn record(&mut self, at: Instant) {
        self.signals.push_back(at);
    }

    /// Evaluate every window due by `now`.
    ///
    /// Returns one event per window that met the threshold.  Signals
    /// that have slid out of the trailing interval are pruned as each
    /// window is scored.
    pub fn poll(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        while self.next_eval <= now {
            let eval_at = self.next_eval;
            self.next_eval += self.cfg.hop;

            // Prune signals older than the trailing window.  The old
            // edge is inclusive: a signal exactly `window` ago still
            // counts for this evaluation.
            let cutoff = eval_at - self.cfg.window;
            while matches!(self.signals.front(), Some(&t) if t < cutoff) {
                self.signals.pop_front();
            }

            let count = self.signals.iter().take_while(|&&t| t <= eval_at).count();
            if count >= self.cfg.min_signals {
                debug!("wave: {} signals in trailing window", count);
                events.push(GestureEvent::WaveDetected);
            }
        }

        events
    }

    /// Signals currently retained (pruning happens on evaluation).
    pub fn pending_signals(&self) -> usize {
        self.signals.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    fn detector(base: Instant) -> WaveDetector {
        WaveDetector::new(WaveConfig::default(), base)
    }

    #[test]
    fn three_signals_in_window_make_one_wave() {
        // Signals at 0.0 / 0.6 / 1.2 s.  The window closing at 3.0 s
        // covers all three; the one closing at 3.5 s covers [0.5, 3.5]
        // and only two.
        let base = Instant::now();
        let mut w = detector(base);
        w.record(at(base, 0));
        w.record(at(base, 600));
        w.record(at(base, 1200));

        assert_eq!(w.poll(at(base, 3000)), vec![GestureEvent::WaveDetected]);
        assert!(w.poll(at(base, 3600)).is_empty());
    }

    #[test]
    fn two_signals_never_wave() {
        let base = Instant::now();
        let mut w = detector(base);
        w.record(at(base, 100));
        w.record(at(base, 200));
        assert!(w.poll(at(base, 10_000)).is_empty());
    }

    #[test]
    fn no_evaluation_before_first_window_closes() {
        let base = Instant::now();
        let mut w = detector(base);
        w.record(at(base, 100));
        w.record(at(base, 200));
        w.record(at(base, 300));
        // 2.9 s: the first window has not closed yet.
        assert!(w.poll(at(base, 2900)).is_empty());
        // 3.0 s: it closes, counting all three.
        assert_eq!(w.poll(at(base, 3000)).len(), 1);
    }

    #[test]
    fn overlapping_windows_each_emit() {
        // Signals spread so both the 3.0 s and 3.5 s windows hold three.
        let base = Instant::now();
        let mut w = detector(base);
        w.record(at(base, 1000));
        w.record(at(base, 1600));
        w.record(at(base, 2200));
        let events = w.poll(at(base, 3500));
        assert_eq!(events.len(), 2); // evaluations at 3.0 and 3.5
    }

    #[test]
    fn signal_on_trailing_edge_still_counts() {
        // A signal exactly `window` before the evaluation is inside.
        let base = Instant::now();
        let mut w = detector(base);
        w.record(at(base, 0));
        w.record(at(base, 0));
        w.record(at(base, 0));
        assert_eq!(w.poll(at(base, 3000)).len(), 1);
        // By 3.5 s they have all slid out.
        assert!(w.poll(at(base, 3500)).is_empty());
        assert_eq!(w.pending_signals(), 0);
    }

    #[test]
    fn poll_catches_up_missed_evaluations() {
        // A late poll scores every window due since the last one.
        let base = Instant::now();
        let mut w = detector(base);
        for ms in [2600, 2700, 2800] {
            w.record(at(base, ms));
        }
        // Evaluations at 3.0..=5.5 s all contain the burst; at 6.0 s
        // the window is [3.0, 6.0] and empty.
        let events = w.poll(at(base, 6000));
        assert_eq!(events.len(), 6);
        assert!(w.poll(at(base, 6400)).is_empty());
    }

    #[test]
    fn custom_threshold_respected() {
        let base = Instant::now();
        let cfg = WaveConfig { min_signals: 5, ..WaveConfig::default() };
        let mut w = WaveDetector::new(cfg, base);
        for ms in [2000, 2100, 2200, 2300] {
            w.record(at(base, ms));
        }
        assert!(w.poll(at(base, 3000)).is_empty()); // 4 < 5
        w.record(at(base, 3200));
        assert_eq!(w.poll(at(base, 3500)).len(), 1); // [0.5, 3.5] holds 5
    }
}
