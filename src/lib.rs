//! Live three-channel telemetry scope: bounded capture buffer, zoom/pan
//! viewport, chart rendering into an RGB framebuffer and CSV export.
pub mod config;
pub mod scope;
pub use config::ScopeConfig;
