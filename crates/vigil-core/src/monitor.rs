//! Tick-level detection policy.
//!
//! One observation per tick: push into the window, wait for the window to
//! fill, then score the whole snapshot and read only the newest element's
//! flag. Older elements are never retroactively re-flagged, so anomaly
//! history stays stable across later resizes and parameter changes.

use crate::algo::DetectorSettings;
use crate::error::ConfigError;
use crate::window::SignalWindow;

/// Outcome of feeding one observation through the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Sequence index of the observation (0-based time step).
    pub seq: u64,
    pub value: f64,
    /// Oldest value evicted by this push, if the window was full.
    pub evicted: Option<f64>,
    /// Whether the detector ran; it is skipped until the window is full,
    /// since dispersion estimates over a partial window are too unstable
    /// to act on.
    pub detection_ran: bool,
    /// Flag for the newest element only.
    pub is_anomaly: bool,
}

/// Owns the signal window and the current detector settings.
#[derive(Debug, Clone)]
pub struct SignalMonitor {
    window: SignalWindow,
    settings: DetectorSettings,
    seq: u64,
}

impl SignalMonitor {
    pub fn new(capacity: usize, settings: DetectorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            window: SignalWindow::new(capacity)?,
            settings,
            seq: 0,
        })
    }

    /// Record one observation and decide whether it is anomalous.
    pub fn observe(&mut self, value: f64) -> Tick {
        let seq = self.seq;
        self.seq += 1;
        let evicted = self.window.push(value);

        if !self.window.is_full() {
            return Tick {
                seq,
                value,
                evicted,
                detection_ran: false,
                is_anomaly: false,
            };
        }

        let snapshot = self.window.snapshot();
        let flags = self.settings.detect(&snapshot);
        let is_anomaly = flags.last().copied().unwrap_or(false);

        Tick {
            seq,
            value,
            evicted,
            detection_ran: true,
            is_anomaly,
        }
    }

    /// Swap in new detector settings; the next observation uses them.
    /// History is not recomputed.
    pub fn set_settings(&mut self, settings: DetectorSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Change the window capacity mid-run.
    pub fn resize_window(&mut self, capacity: usize) -> Result<(), ConfigError> {
        self.window.resize(capacity)
    }

    pub fn window(&self) -> &SignalWindow {
        &self.window
    }

    /// Clear the window and the sequence counter; settings and capacity
    /// are kept.
    pub fn reset(&mut self) {
        self.window.clear();
        self.seq = 0;
    }
}
