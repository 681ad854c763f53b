use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scope::buffer::{DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::scope::{ChannelStyle, ChartLayout, ChartStyle, ScopeError, SensorKind};

/// Recognized options. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Selects the value range; unknown labels fall back to Accelerometer.
    pub sensor_kind: SensorKind,
    /// Samples kept per channel, at least 50.
    pub capacity: usize,
    pub dark_mode: bool,
    pub zoom_enabled: bool,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Spacing of the simulated sample source.
    pub sample_interval_ms: u64,
    pub export_dir: PathBuf,
    pub layout: ChartLayout,
    pub channels: [ChannelStyle; 3],
}

impl Default for ScopeConfig {
    fn default() -> Self {
        let style = ChartStyle::default();
        Self {
            sensor_kind: SensorKind::Accelerometer,
            capacity: DEFAULT_CAPACITY,
            dark_mode: false,
            zoom_enabled: true,
            canvas_width: 1200,
            canvas_height: 700,
            sample_interval_ms: 20,
            export_dir: PathBuf::from("exports").join("MoTrak"),
            layout: style.layout,
            channels: style.channels,
        }
    }
}

impl ScopeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScopeError> {
        let config: ScopeConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Clamps out-of-domain values instead of rejecting them.
    pub fn normalized(mut self) -> Self {
        self.capacity = self.capacity.max(MIN_CAPACITY);
        self.sample_interval_ms = self.sample_interval_ms.max(1);
        self
    }

    pub fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            dark_mode: self.dark_mode,
            channels: self.channels,
            layout: self.layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ScopeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ScopeConfig::default());
        assert!(config.zoom_enabled);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.layout.padding, 80.0);
    }

    #[test]
    fn recognized_options_are_applied() {
        let json = r##"{
            "sensor_kind": "Rotation Vector",
            "capacity": 300,
            "dark_mode": true,
            "zoom_enabled": false,
            "layout": { "text_size": 18 },
            "channels": [
                { "color": "#FF0000", "stroke_width": 2, "fill_alpha": 40 },
                { "color": "#00FF00", "stroke_width": 2, "fill_alpha": 40 },
                { "color": "#0000FF", "stroke_width": 2, "fill_alpha": 40 }
            ]
        }"##;
        let config = ScopeConfig::from_json_str(json).unwrap();
        assert_eq!(config.sensor_kind, SensorKind::RotationVector);
        assert_eq!(config.capacity, 300);
        assert!(config.dark_mode);
        assert!(!config.zoom_enabled);
        assert_eq!(config.layout.text_size, 18);
        assert_eq!(config.layout.horizontal_divisions, 10);
        assert_eq!(config.chart_style().channels[2].stroke_width, 2);
    }

    #[test]
    fn small_capacity_and_unknown_sensor_are_corrected() {
        let config =
            ScopeConfig::from_json_str(r#"{"capacity": 5, "sensor_kind": "Sonar"}"#).unwrap();
        assert_eq!(config.capacity, MIN_CAPACITY);
        assert_eq!(config.sensor_kind, SensorKind::Accelerometer);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ScopeConfig::from_json_str("{ capacity: }").unwrap_err();
        assert!(matches!(err, ScopeError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion-scope.json");
        std::fs::write(&path, r#"{"dark_mode": true}"#).unwrap();
        assert!(ScopeConfig::load(&path).unwrap().dark_mode);
        let missing = ScopeConfig::load(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ScopeError::Io(_))));
    }
}
