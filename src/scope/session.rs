use std::path::PathBuf;

use log::{debug, info};

use crate::config::ScopeConfig;

use super::buffer::{Sample, SharedTelemetry, TelemetrySnapshot};
use super::error::ScopeError;
use super::export::{export_csv, CsvExporter};
use super::plot::render_frame_rgb;
use super::range::{SensorKind, ValueRange};
use super::scene::{Canvas, ChartScene};
use super::source::SampleSource;
use super::theme::ChartStyle;
use super::viewport::ViewportController;

/// High level owner of one capture: buffer, viewport, sensor and styling.
///
/// Producers only ever get the [`SharedTelemetry`] handle; the viewport is
/// touched by the gesture side and read when a frame is composed.
pub struct CaptureSession {
    telemetry: SharedTelemetry,
    viewport: ViewportController,
    sensor: SensorKind,
    style: ChartStyle,
    capturing: bool,
}

impl CaptureSession {
    pub fn new(config: &ScopeConfig) -> Self {
        let style = config.chart_style();
        let chart_width = config.canvas_width as f32 - 2.0 * style.layout.padding;
        Self {
            telemetry: SharedTelemetry::with_capacity(config.capacity),
            viewport: ViewportController::new(chart_width, config.zoom_enabled),
            sensor: config.sensor_kind,
            style,
            capturing: false,
        }
    }

    pub fn telemetry(&self) -> SharedTelemetry {
        self.telemetry.clone()
    }

    pub fn sensor(&self) -> SensorKind {
        self.sensor
    }

    pub fn range(&self) -> ValueRange {
        self.sensor.range()
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn start(&mut self, sensor: SensorKind) {
        self.set_sensor_kind(sensor);
        self.telemetry.clear();
        self.capturing = true;
        info!("capture started: {sensor}");
    }

    /// Keeps the captured window so it can still be exported.
    pub fn stop(&mut self) {
        if self.capturing {
            self.capturing = false;
            info!("capture stopped with {} samples", self.telemetry.len());
        }
    }

    /// New range and a fresh viewport. The buffer is only cleared while
    /// capturing; a stopped capture stays available for export.
    pub fn set_sensor_kind(&mut self, sensor: SensorKind) {
        self.sensor = sensor;
        self.viewport.on_reset_gesture();
        if self.capturing {
            self.telemetry.clear();
        }
        debug!("sensor kind set to {sensor}, range {:?}", sensor.range());
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.telemetry.set_capacity(capacity);
        debug!("capacity set to {}", self.telemetry.capacity());
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.style.dark_mode = dark_mode;
    }

    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.viewport.set_enabled(enabled);
    }

    pub fn clear(&mut self) {
        self.telemetry.clear();
    }

    /// Drains up to `max` samples from `source`; returns how many were stored.
    pub fn pump<S: SampleSource>(&mut self, source: &mut S, max: usize) -> usize {
        let mut stored = 0;
        while stored < max {
            let Some(sample) = source.next_sample() else {
                break;
            };
            self.telemetry.push(sample);
            stored += 1;
        }
        stored
    }

    pub fn latest_sample(&self) -> Option<Sample> {
        self.telemetry.latest()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// Composes a frame from a fresh snapshot. Keeps the viewport's pan
    /// clamp in step with the canvas width.
    pub fn compose_frame(&mut self, canvas: Canvas) -> ChartScene {
        let chart_width = canvas.width as f32 - 2.0 * self.style.layout.padding;
        self.viewport.set_chart_width(chart_width);
        let snapshot = self.telemetry.snapshot();
        ChartScene::compose(
            &snapshot,
            self.viewport.state(),
            self.sensor,
            &self.style,
            canvas,
        )
    }

    pub fn render_rgb(&mut self, canvas: Canvas) -> Result<Vec<u8>, ScopeError> {
        let scene = self.compose_frame(canvas);
        render_frame_rgb(&scene)
    }

    pub fn export_csv(&self) -> String {
        export_csv(&self.telemetry.snapshot())
    }

    pub fn export_to(&self, exporter: &CsvExporter) -> Result<PathBuf, ScopeError> {
        exporter.write(self.sensor, &self.telemetry.snapshot())
    }
}
