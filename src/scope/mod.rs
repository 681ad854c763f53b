// src/scope/mod.rs
pub mod buffer;
pub mod clip;
pub mod error;
pub mod export;
pub mod plot;
pub mod range;
pub mod scene;
pub mod session;
pub mod source;
pub mod theme;
pub mod transform;
pub mod viewport;
pub use buffer::{Channel, Sample, SharedTelemetry, TelemetryBuffer, TelemetrySnapshot};
pub use error::ScopeError;
pub use export::{export_csv, is_header_only, CsvExporter};
pub use plot::{render_frame_rgb, render_png};
pub use range::{SensorKind, ValueRange};
pub use scene::{Canvas, ChartScene, DrawOp, Layer};
pub use session::CaptureSession;
pub use source::{ManualSource, SampleSource, SimulatedSource};
pub use theme::{ChannelStyle, ChartLayout, ChartStyle, Rgb, Theme};
pub use transform::{ChartGeometry, CoordinateTransform};
pub use viewport::{ViewportController, ViewportState};
