//! Top-level application wiring.
//!
//! `run` connects the pieces: the visualizer's window feeds cursor
//! positions to the sim sensor, the session turns frames into gesture
//! events, and the render loop drains the session's UI events into the
//! [`ViewState`] it draws each frame.

use std::sync::mpsc::{self, TryRecvError};

use tracing::warn;

use hue_light::{BridgeConfig, HueBridge, LightHandle, LightSink, NullOut};

use crate::sensor::{SimInput, SimSensor};
use crate::session::{Session, SessionConfig, UiEvent};
use crate::visualizer::{ViewState, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// Hue bridge to drive; `None` runs with the null light backend.
    pub bridge:  Option<BridgeConfig>,
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Entry point called from `main.rs`.  Builds the light worker, the
/// visualizer, the sim sensor and the session, then drives the
/// event/render loop at ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    // ── Light worker ──────────────────────────────────────────────────────
    let sink = match &cfg.bridge {
        Some(bridge) => LightSink::new(
            Box::new(HueBridge::new(bridge.clone())),
            bridge.bulbs.clone(),
        ),
        None => LightSink::new(Box::new(NullOut), Vec::new()),
    };
    let light = LightHandle::spawn(sink);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut vis = Visualizer::new(sim_tx, cfg.session.targets.clone())?;

    // ── Session ───────────────────────────────────────────────────────────
    let reach = cfg.session.reach;
    let mut session = Session::new(cfg.session);
    let ui_rx = session
        .start(Box::new(SimSensor::new(sim_rx, reach)), light)
        .map_err(|e| e.to_string())?;

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut view = ViewState {
        status: "Ready — wave to set the light".to_string(),
        ..ViewState::default()
    };

    while vis.is_open() {
        // 1. Forward window input to the sim sensor
        if !vis.poll_input() {
            break;
        }

        // 2. Drain session events into the view
        loop {
            match ui_rx.try_recv() {
                Ok(UiEvent::Status(s)) => {
                    // The wave notice appends to the last direction,
                    // like the original info box.
                    if s == "... WAVE!" {
                        view.status.push_str(" ... WAVE!");
                    } else {
                        view.status = s;
                    }
                }
                Ok(UiEvent::ColorFrame(frame)) => view.frame = Some(frame),
                Ok(UiEvent::Hands { left, right }) => view.hands = Some((left, right)),
                Ok(UiEvent::ColorSelected(color)) => view.selected = Some(color),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("session event stream ended");
                    session.stop();
                    return Ok(());
                }
            }
        }

        // 3. Render
        vis.render(&view);
    }

    session.stop();
    Ok(())
}
