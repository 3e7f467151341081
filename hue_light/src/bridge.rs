//! Hue bridge HTTP client.
//!
//! The bridge speaks small JSON bodies over plain HTTP: a one-time
//! `POST /api` registration, then `PUT
//! /api/{username}/lights/{bulb}/state` per state change.  The output
//! seam is the [`LightOut`] trait so the sink can run against the real
//! bridge, a null backend when none is configured, or a recording mock
//! in tests.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::color::Color;

/// Bridge hue resolution: degrees × 182.04 spans the u16 range.
const HUE_SCALE: f32 = 182.04;
/// Bridge saturation resolution.
const SAT_SCALE: f32 = 254.0;

// ════════════════════════════════════════════════════════════════════════════
// LightState — the JSON body
// ════════════════════════════════════════════════════════════════════════════

/// Target state for one bulb, serialized verbatim as the PUT body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LightState {
    pub on:  bool,
    pub hue: u16,
    pub sat: u8,
}

impl LightState {
    /// Build a state from a hue angle in degrees (0–360) and a
    /// saturation fraction (0–1).
    pub fn from_hue_sat(hue_degrees: f32, saturation: f32) -> Self {
        let hue = (hue_degrees * HUE_SCALE).round().clamp(0.0, u16::MAX as f32) as u16;
        let sat = (saturation * SAT_SCALE).round().clamp(0.0, SAT_SCALE) as u8;
        LightState { on: true, hue, sat }
    }

    pub fn for_color(color: Color) -> Self {
        Self::from_hue_sat(color.hue_degrees(), color.saturation())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// BridgeConfig / errors
// ════════════════════════════════════════════════════════════════════════════

/// Connection settings for one bridge.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Bridge IP or hostname.
    pub host:     String,
    /// API username registered with the bridge.
    pub username: String,
    /// Bulb numbers to drive.
    pub bulbs:    Vec<u8>,
    pub timeout:  Duration,
}

impl BridgeConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        BridgeConfig {
            host:     host.into(),
            username: username.into(),
            bulbs:    vec![1],
            timeout:  Duration::from_secs(2),
        }
    }

    fn state_url(&self, bulb: u8) -> String {
        format!(
            "http://{}/api/{}/lights/{}/state",
            self.host, self.username, bulb
        )
    }

    fn register_url(&self) -> String {
        format!("http://{}/api", self.host)
    }
}

/// Actuation failure.  Observed and logged by the sink; never
/// propagated into the detection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge request failed: {0}")]
    Http(#[from] reqwest::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// LightOut — output seam
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can push a [`LightState`] at a numbered bulb.
pub trait LightOut: Send {
    fn set_state(&mut self, bulb: u8, state: &LightState) -> Result<(), BridgeError>;
}

// ── HueBridge backend ───────────────────────────────────────────────────────

/// Blocking HTTP client against a real bridge.
pub struct HueBridge {
    cfg:    BridgeConfig,
    client: reqwest::blocking::Client,
}

impl HueBridge {
    pub fn new(cfg: BridgeConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        HueBridge { cfg, client }
    }

    /// One-time user registration with the bridge (press-link flow).
    pub fn register(&self, devicetype: &str) -> Result<(), BridgeError> {
        #[derive(Serialize)]
        struct Registration<'a> {
            username:   &'a str,
            devicetype: &'a str,
        }

        let body = Registration {
            username:   &self.cfg.username,
            devicetype,
        };
        let resp = self
            .client
            .post(self.cfg.register_url())
            .json(&body)
            .send()?;
        info!("bridge registration: {}", resp.status());
        Ok(())
    }
}

impl LightOut for HueBridge {
    fn set_state(&mut self, bulb: u8, state: &LightState) -> Result<(), BridgeError> {
        let resp = self
            .client
            .put(self.cfg.state_url(bulb))
            .json(state)
            .send()?;
        debug!("bulb {} state {:?}: {}", bulb, state, resp.status());
        Ok(())
    }
}

// ── Null backend (no bridge configured) ─────────────────────────────────────

/// Swallows every state change.  Used when the demo runs without a
/// bridge on the network.
pub struct NullOut;

impl LightOut for NullOut {
    fn set_state(&mut self, _bulb: u8, _state: &LightState) -> Result<(), BridgeError> {
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
