//! # vigil-core — windowed anomaly detection
//!
//! The detection core behind the vigil live dashboard: a fixed-capacity
//! signal window, three interchangeable outlier detectors, and the
//! tick-level policy that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                 SignalMonitor                     │
//! │  ┌──────────────┐        ┌─────────────────────┐  │
//! │  │ SignalWindow │──────▶ │  DetectorSettings   │  │
//! │  │ (FIFO, cap C)│snapshot│  z-score | MAD |    │  │
//! │  └──────────────┘        │  isolation forest   │  │
//! │                          └─────────────────────┘  │
//! │                  newest flag only ▼               │
//! │                        Tick                       │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Key design points
//!
//! 1. **Per-call scoring** — detectors are pure functions over the window
//!    snapshot; no model state survives between ticks. The isolation
//!    forest refits its whole ensemble every call.
//! 2. **Full-window gating** — detection is skipped until the window has
//!    filled to capacity, so unstable small-sample statistics never emit
//!    anomalies.
//! 3. **Stable history** — only the newest element's flag is consumed;
//!    earlier observations are never re-flagged by later resizes or
//!    parameter changes.
//!
//! ## Quick start
//!
//! ```rust
//! use vigil_core::{DetectorSettings, Method, SignalMonitor};
//!
//! let settings = DetectorSettings {
//!     method: Method::Mad,
//!     ..DetectorSettings::default()
//! };
//! let mut monitor = SignalMonitor::new(5, settings).unwrap();
//! for value in [10.0, 10.0, 10.0, 10.0] {
//!     assert!(!monitor.observe(value).detection_ran);
//! }
//! let tick = monitor.observe(100.0);
//! assert!(tick.is_anomaly);
//! ```

pub mod algo;
pub mod error;
pub mod monitor;
pub mod window;

pub use algo::{list_methods, DetectorSettings, Method};
pub use error::ConfigError;
pub use monitor::{SignalMonitor, Tick};
pub use window::SignalWindow;
