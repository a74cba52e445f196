//! # vigil-sim — live anomaly-detection dashboard simulation
//!
//! Simulates a noisy value stream, runs the vigil-core detectors over a
//! sliding window on every tick, and feeds external renderers the raw
//! chart series plus a scrolling anomaly log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    DashboardEngine                       │
//! │  ┌────────────┐   ┌───────────────┐   ┌──────────────┐   │
//! │  │ RandomWalk │──▶│ SignalMonitor │──▶│ AnomalyLog + │   │
//! │  │ (generator)│   │ (vigil-core)  │   │ record feed  │   │
//! │  └────────────┘   └───────────────┘   └──────────────┘   │
//! │          ▲ tick() driven externally                      │
//! └──────────┼───────────────────────────────────────────────┘
//!            │
//!   timer task (serve) / loop (run) / test harness
//! ```
//!
//! The engine never sleeps on its own: `tick()` advances exactly one step,
//! so tests run deterministically without wall-clock delays, the CLI loops
//! as fast as it likes, and serve mode schedules ticks with a tokio
//! interval.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vigil_core::DetectorSettings;
//! use vigil_sim::{DashboardEngine, GeneratorConfig};
//!
//! let mut engine =
//!     DashboardEngine::new(100, DetectorSettings::default(), GeneratorConfig::default())
//!         .unwrap();
//! engine.start();
//! loop {
//!     if let Some(report) = engine.tick() {
//!         if let Some(anomaly) = report.anomaly {
//!             println!("anomaly at step {}: {:.2}", anomaly.time_step, anomaly.value);
//!         }
//!     }
//! }
//! ```

pub mod api;
pub mod engine;
pub mod generator;
pub mod log;

pub use api::{
    create_shared_state, router, ApiResponse, ConfigureRequest, DashboardSnapshot, SharedState,
    SimulationState,
};
pub use engine::{
    AnomalyRecord, ChartData, DashboardEngine, EngineState, EngineStats, EngineStatus, TickReport,
};
pub use generator::{GeneratorConfig, RandomWalk};
pub use log::AnomalyLog;
