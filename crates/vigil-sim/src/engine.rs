//! Dashboard simulation engine.
//!
//! Owns the full simulation state explicitly — monitor, generator, value
//! history, anomaly records, capped log — instead of scattering it across
//! ambient globals. `tick()` advances exactly one step and is driven
//! externally: by a timer task in serve mode, by a loop in headless mode,
//! or directly from tests. There is no internal sleep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vigil_core::{ConfigError, DetectorSettings, Method, SignalMonitor};

use crate::generator::{GeneratorConfig, RandomWalk};
use crate::log::AnomalyLog;

/// Engine running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Stopped,
    Running,
    Paused,
}

/// A detected outlier, recorded at the moment of detection and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// 0-based time step of the flagged observation.
    pub time_step: u64,
    pub value: f64,
    pub detected_at: DateTime<Utc>,
}

/// One tick's outcome, for callers that render incrementally.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickReport {
    pub time_step: u64,
    pub value: f64,
    pub detection_ran: bool,
    pub anomaly: Option<AnomalyRecord>,
}

/// Counters exposed on the status surface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineStats {
    pub tick_count: u64,
    pub anomaly_count: u64,
}

/// Status snapshot for controls and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub state: EngineState,
    pub time_step: u64,
    pub window_len: usize,
    pub window_capacity: usize,
    pub settings: DetectorSettings,
    pub stats: EngineStats,
}

/// Raw chart feed: the full value history (index = time step) plus every
/// anomaly record. No formatting or styling happens here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub values: Vec<f64>,
    pub anomalies: Vec<AnomalyRecord>,
}

pub struct DashboardEngine {
    monitor: SignalMonitor,
    generator: RandomWalk,
    state: EngineState,
    history: Vec<f64>,
    anomalies: Vec<AnomalyRecord>,
    log: AnomalyLog,
    stats: EngineStats,
}

impl DashboardEngine {
    pub fn new(
        window_capacity: usize,
        settings: DetectorSettings,
        generator: GeneratorConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            monitor: SignalMonitor::new(window_capacity, settings)?,
            generator: RandomWalk::new(generator),
            state: EngineState::Stopped,
            history: Vec::new(),
            anomalies: Vec::new(),
            log: AnomalyLog::new(),
            stats: EngineStats::default(),
        })
    }

    /// Start (or resume) the simulation.
    pub fn start(&mut self) {
        self.state = EngineState::Running;
        info!(method = self.monitor.settings().method.name(), "simulation started");
    }

    pub fn stop(&mut self) {
        self.state = EngineState::Stopped;
        info!("simulation stopped");
    }

    pub fn pause(&mut self) {
        if self.state == EngineState::Running {
            self.state = EngineState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == EngineState::Paused {
            self.state = EngineState::Running;
        }
    }

    /// Discard all simulation state: window, histories, log, counters, and
    /// the generator's position. Capacity and detector settings are kept.
    pub fn reset(&mut self) {
        self.state = EngineState::Stopped;
        self.monitor.reset();
        self.generator.reset();
        self.history.clear();
        self.anomalies.clear();
        self.log.clear();
        self.stats = EngineStats::default();
        info!("simulation reset");
    }

    /// Advance one step. Returns `None` unless the engine is running.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.state != EngineState::Running {
            return None;
        }

        let value = self.generator.next_value();
        let tick = self.monitor.observe(value);
        self.history.push(value);
        self.stats.tick_count += 1;

        let anomaly = if tick.is_anomaly {
            let record = AnomalyRecord {
                time_step: tick.seq,
                value,
                detected_at: Utc::now(),
            };
            self.anomalies.push(record);
            self.log.record(&record);
            self.stats.anomaly_count += 1;
            warn!(
                time_step = record.time_step,
                value = record.value,
                method = self.monitor.settings().method.name(),
                "anomaly detected"
            );
            Some(record)
        } else {
            debug!(time_step = tick.seq, value, detection_ran = tick.detection_ran, "tick");
            None
        };

        Some(TickReport {
            time_step: tick.seq,
            value,
            detection_ran: tick.detection_ran,
            anomaly,
        })
    }

    // --- Mid-run controls ---------------------------------------------

    pub fn set_method(&mut self, method: Method) -> Result<(), ConfigError> {
        let settings = DetectorSettings {
            method,
            ..*self.monitor.settings()
        };
        self.monitor.set_settings(settings)
    }

    pub fn set_z_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        let settings = DetectorSettings {
            z_threshold: threshold,
            ..*self.monitor.settings()
        };
        self.monitor.set_settings(settings)
    }

    pub fn set_mad_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        let settings = DetectorSettings {
            mad_threshold: threshold,
            ..*self.monitor.settings()
        };
        self.monitor.set_settings(settings)
    }

    pub fn set_contamination(&mut self, contamination: f64) -> Result<(), ConfigError> {
        let settings = DetectorSettings {
            contamination,
            ..*self.monitor.settings()
        };
        self.monitor.set_settings(settings)
    }

    pub fn set_settings(&mut self, settings: DetectorSettings) -> Result<(), ConfigError> {
        self.monitor.set_settings(settings)
    }

    pub fn set_window_capacity(&mut self, capacity: usize) -> Result<(), ConfigError> {
        self.monitor.resize_window(capacity)
    }

    // --- Read surfaces ------------------------------------------------

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn settings(&self) -> &DetectorSettings {
        self.monitor.settings()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn anomalies(&self) -> &[AnomalyRecord] {
        &self.anomalies
    }

    pub fn log(&self) -> &AnomalyLog {
        &self.log
    }

    pub fn chart(&self) -> ChartData {
        ChartData {
            values: self.history.clone(),
            anomalies: self.anomalies.clone(),
        }
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state: self.state,
            time_step: self.stats.tick_count,
            window_len: self.monitor.window().len(),
            window_capacity: self.monitor.window().capacity(),
            settings: *self.monitor.settings(),
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_engine(capacity: usize) -> DashboardEngine {
        // A flat walk so state-machine tests never trip the detector.
        DashboardEngine::new(
            capacity,
            DetectorSettings::default(),
            GeneratorConfig {
                drift_std: 0.0,
                shock_std: 0.0,
                shock_probability: 0.0,
                ..GeneratorConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn state_machine_transitions() {
        let mut engine = quiet_engine(5);
        assert_eq!(engine.state(), EngineState::Stopped);

        engine.start();
        assert_eq!(engine.state(), EngineState::Running);

        engine.pause();
        assert_eq!(engine.state(), EngineState::Paused);

        engine.resume();
        assert_eq!(engine.state(), EngineState::Running);

        engine.stop();
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut engine = quiet_engine(5);
        assert!(engine.tick().is_none());

        engine.start();
        engine.pause();
        assert!(engine.tick().is_none());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn detection_gated_until_window_fills() {
        let mut engine = quiet_engine(4);
        engine.start();
        for i in 0..3 {
            let report = engine.tick().unwrap();
            assert_eq!(report.time_step, i);
            assert!(!report.detection_ran);
        }
        let report = engine.tick().unwrap();
        assert!(report.detection_ran, "the filling tick is the first eligible");
    }

    #[test]
    fn history_grows_one_value_per_tick() {
        let mut engine = quiet_engine(3);
        engine.start();
        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.history().len(), 10);
        assert_eq!(engine.stats().tick_count, 10);
    }

    #[test]
    fn flat_signal_emits_no_anomalies() {
        let mut engine = quiet_engine(5);
        engine.start();
        for _ in 0..50 {
            let report = engine.tick().unwrap();
            assert!(report.anomaly.is_none());
        }
        assert!(engine.anomalies().is_empty());
        assert_eq!(engine.stats().anomaly_count, 0);
    }

    #[test]
    fn reset_returns_to_initial_conditions() {
        let mut engine = quiet_engine(5);
        engine.start();
        for _ in 0..20 {
            engine.tick();
        }
        engine.reset();

        assert_eq!(engine.state(), EngineState::Stopped);
        assert!(engine.history().is_empty());
        assert!(engine.anomalies().is_empty());
        assert!(engine.log().is_empty());
        assert_eq!(engine.stats().tick_count, 0);

        // The next tick behaves as a fresh start.
        engine.start();
        let report = engine.tick().unwrap();
        assert_eq!(report.time_step, 0);
        assert_eq!(report.value, 100.0);
        assert!(!report.detection_ran);
    }

    #[test]
    fn invalid_reconfiguration_is_rejected_and_state_kept() {
        let mut engine = quiet_engine(5);
        let before = *engine.settings();
        assert!(engine.set_z_threshold(-2.0).is_err());
        assert!(engine.set_contamination(0.9).is_err());
        assert!(engine.set_window_capacity(0).is_err());
        assert_eq!(*engine.settings(), before);
    }
}
