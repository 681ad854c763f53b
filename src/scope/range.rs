use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Kind of motion sensor feeding the scope. Selects the vertical value range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorKind {
    #[default]
    Accelerometer,
    Gyroscope,
    Gravity,
    RotationVector,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Gravity,
        SensorKind::RotationVector,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "Accelerometer",
            SensorKind::Gyroscope => "Gyroscope",
            SensorKind::Gravity => "Gravity",
            SensorKind::RotationVector => "Rotation Vector",
        }
    }

    /// Unknown labels fall back to [`SensorKind::Accelerometer`].
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(wanted)
                    || format!("{kind:?}").eq_ignore_ascii_case(wanted)
            })
            .unwrap_or_else(|| {
                warn!("unknown sensor kind {label:?}, falling back to Accelerometer");
                SensorKind::Accelerometer
            })
    }

    pub fn range(self) -> ValueRange {
        match self {
            SensorKind::Accelerometer | SensorKind::Gravity => ValueRange::new(-15.0, 15.0),
            SensorKind::Gyroscope => ValueRange::new(-10.0, 10.0),
            SensorKind::RotationVector => ValueRange::new(-1.0, 1.0),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for SensorKind {
    fn from(value: String) -> Self {
        SensorKind::from_label(&value)
    }
}

impl From<SensorKind> for String {
    fn from(value: SensorKind) -> Self {
        value.label().to_owned()
    }
}

/// Fixed `[min, max]` value domain of the chart's vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Maps `value` onto `[0, 1]`; values outside the range land outside it.
    pub fn normalize(&self, value: f32) -> f32 {
        (value - self.min) / self.span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table_matches_sensor_kinds() {
        assert_eq!(SensorKind::Accelerometer.range(), ValueRange::new(-15.0, 15.0));
        assert_eq!(SensorKind::Gravity.range(), ValueRange::new(-15.0, 15.0));
        assert_eq!(SensorKind::Gyroscope.range(), ValueRange::new(-10.0, 10.0));
        assert_eq!(SensorKind::RotationVector.range(), ValueRange::new(-1.0, 1.0));
    }

    #[test]
    fn labels_round_trip_and_unknown_falls_back() {
        for kind in SensorKind::ALL {
            assert_eq!(SensorKind::from_label(kind.label()), kind);
        }
        assert_eq!(SensorKind::from_label("rotationvector"), SensorKind::RotationVector);
        assert_eq!(SensorKind::from_label("Magnetometer"), SensorKind::Accelerometer);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&SensorKind::RotationVector).unwrap();
        assert_eq!(json, "\"Rotation Vector\"");
        let parsed: SensorKind = serde_json::from_str("\"Barometer\"").unwrap();
        assert_eq!(parsed, SensorKind::Accelerometer);
    }

    #[test]
    fn normalize_is_unclamped() {
        let range = ValueRange::new(-10.0, 10.0);
        assert_eq!(range.normalize(0.0), 0.5);
        assert_eq!(range.normalize(10.0), 1.0);
        assert_eq!(range.normalize(20.0), 1.5);
    }
}
