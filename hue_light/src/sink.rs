//! Deduplicating light sink and its worker thread.
//!
//! The sink remembers the last color it actually sent and compares
//! before issuing a new command, so a stream of identical wave events
//! costs one HTTP round trip, not one per wave.  [`LightHandle`] puts
//! the sink on its own thread: callers hand over a color and move on —
//! actuation is fire-and-forget, and a slow or absent bridge never
//! stalls detection.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::warn;

use crate::bridge::{LightOut, LightState};
use crate::color::Color;

// ════════════════════════════════════════════════════════════════════════════
// LightSink
// ════════════════════════════════════════════════════════════════════════════

/// Pushes color changes at the configured bulbs, skipping repeats.
pub struct LightSink {
    out:       Box<dyn LightOut>,
    bulbs:     Vec<u8>,
    last_sent: Option<Color>,
}

impl LightSink {
    pub fn new(out: Box<dyn LightOut>, bulbs: Vec<u8>) -> Self {
        LightSink { out, bulbs, last_sent: None }
    }

    /// Send `color` to every bulb unless it matches the last color
    /// sent.
    ///
    /// `last_sent` only advances when every bulb accepted the state, so
    /// a failed send is retried by the next request for the same color.
    /// Failures are logged and swallowed; the caller never sees them.
    pub fn set_color(&mut self, color: Color) {
        if self.last_sent == Some(color) {
            return;
        }

        let state = LightState::for_color(color);
        let mut all_ok = true;
        for &bulb in &self.bulbs {
            if let Err(e) = self.out.set_state(bulb, &state) {
                warn!("bulb {} update failed: {}", bulb, e);
                all_ok = false;
            }
        }

        if all_ok {
            self.last_sent = Some(color);
        }
    }

    /// The color the bulbs were last successfully set to.
    pub fn last_sent(&self) -> Option<Color> {
        self.last_sent
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LightHandle — the worker thread
// ════════════════════════════════════════════════════════════════════════════

enum Command {
    SetColor(Color),
}

/// Handle to a [`LightSink`] running on its own thread.
///
/// The worker is the only writer of the sink's `last_sent`, which keeps
/// the compare-then-send discipline race-free without a lock.  The
/// thread exits once every handle has been dropped.
#[derive(Clone)]
pub struct LightHandle {
    cmd_tx: Sender<Command>,
}

impl LightHandle {
    pub fn spawn(sink: LightSink) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        thread::Builder::new()
            .name("light-sink".into())
            .spawn(move || light_thread(sink, cmd_rx))
            .expect("spawn light worker");
        LightHandle { cmd_tx }
    }

    /// Request a color change.  Non-blocking; duplicates are filtered
    /// by the worker.
    pub fn set_color(&self, color: Color) {
        let _ = self.cmd_tx.send(Command::SetColor(color));
    }
}

fn light_thread(mut sink: LightSink, cmd_rx: Receiver<Command>) {
    for cmd in cmd_rx {
        match cmd {
            Command::SetColor(color) => sink.set_color(color),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
