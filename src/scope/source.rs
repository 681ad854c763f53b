use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::buffer::Sample;
use super::range::SensorKind;

/// Anything that can hand the scope its next `(x, y, z, t)` reading.
pub trait SampleSource {
    fn next_sample(&mut self) -> Option<Sample>;
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Sample>,
}

impl ManualSource {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
        }
    }
}

impl SampleSource for ManualSource {
    fn next_sample(&mut self) -> Option<Sample> {
        self.queue.pop_front()
    }
}

struct AxisGen {
    freq_hz: f32,
    phase: f32,
}

/// Synthetic motion: one sine per axis plus noise, scaled to the sensor's range.
pub struct SimulatedSource {
    sensor: SensorKind,
    interval_ms: u64,
    elapsed_ms: u64,
    axes: [AxisGen; 3],
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(sensor: SensorKind, interval_ms: u64) -> Self {
        Self::with_rng(sensor, interval_ms, StdRng::from_entropy())
    }

    pub fn seeded(sensor: SensorKind, interval_ms: u64, seed: u64) -> Self {
        Self::with_rng(sensor, interval_ms, StdRng::seed_from_u64(seed))
    }

    fn with_rng(sensor: SensorKind, interval_ms: u64, rng: StdRng) -> Self {
        Self {
            sensor,
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
            axes: [
                AxisGen {
                    freq_hz: 0.5,
                    phase: 0.0,
                },
                AxisGen {
                    freq_hz: 0.8,
                    phase: 1.1,
                },
                AxisGen {
                    freq_hz: 1.3,
                    phase: 2.3,
                },
            ],
            rng,
        }
    }

    pub fn sensor(&self) -> SensorKind {
        self.sensor
    }

    /// Switching sensors restarts the synthetic clock.
    pub fn set_sensor(&mut self, sensor: SensorKind) {
        self.sensor = sensor;
        self.elapsed_ms = 0;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(1);
    }

    fn axis_value(&mut self, axis: usize, t_secs: f32) -> f32 {
        let range = self.sensor.range();
        let amplitude = range.max * 0.6;
        let noise = range.max * 0.05;
        let axis_gen = &self.axes[axis];
        let base = (TAU * axis_gen.freq_hz * t_secs + axis_gen.phase).sin() * amplitude;
        base + self.rng.gen_range(-noise..noise)
    }
}

impl SampleSource for SimulatedSource {
    fn next_sample(&mut self) -> Option<Sample> {
        let timestamp_ms = self.elapsed_ms;
        let t = timestamp_ms as f32 / 1000.0;
        let sample = Sample {
            timestamp_ms,
            x: self.axis_value(0, t),
            y: self.axis_value(1, t),
            z: self.axis_value(2, t),
        };
        self.elapsed_ms += self.interval_ms;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_source_replays_in_order() {
        let samples = (0..3u64).map(|i| Sample {
            timestamp_ms: i,
            x: i as f32,
            y: 0.0,
            z: 0.0,
        });
        let mut source = ManualSource::new(samples);
        assert_eq!(source.next_sample().map(|s| s.x), Some(0.0));
        assert_eq!(source.next_sample().map(|s| s.x), Some(1.0));
        assert_eq!(source.next_sample().map(|s| s.x), Some(2.0));
        assert!(source.next_sample().is_none());
    }

    #[test]
    fn simulated_source_stays_near_sensor_range() {
        let mut source = SimulatedSource::seeded(SensorKind::RotationVector, 20, 7);
        let mut last_ts = None;
        for _ in 0..500 {
            let s = source.next_sample().unwrap();
            for v in [s.x, s.y, s.z] {
                assert!(v.abs() <= 0.7, "{v}");
            }
            if let Some(prev) = last_ts {
                assert_eq!(s.timestamp_ms, prev + 20);
            }
            last_ts = Some(s.timestamp_ms);
        }
    }

    #[test]
    fn changing_sensor_restarts_clock() {
        let mut source = SimulatedSource::seeded(SensorKind::Gyroscope, 10, 1);
        source.next_sample();
        source.next_sample();
        source.set_sensor(SensorKind::Gravity);
        assert_eq!(source.next_sample().map(|s| s.timestamp_ms), Some(0));
        assert_eq!(source.sensor(), SensorKind::Gravity);
    }
}
