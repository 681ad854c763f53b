use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Smallest capacity accepted by [`TelemetryBuffer::set_capacity`].
pub const MIN_CAPACITY: usize = 50;
pub const DEFAULT_CAPACITY: usize = 100;

/// One of the three parallel signal dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    X,
    Y,
    Z,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::X, Channel::Y, Channel::Z];

    pub fn index(self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Z => 2,
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            Channel::X => "X-axis",
            Channel::Y => "Y-axis",
            Channel::Z => "Z-axis",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Milliseconds since the first sample of the current capture.
    pub timestamp_ms: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Owned copy of the buffer contents, safe to read while capture continues.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub timestamps: Vec<u64>,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub capacity: usize,
}

impl TelemetrySnapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn channel(&self, channel: Channel) -> &[f32] {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Z => &self.z,
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.timestamps
            .iter()
            .zip(&self.x)
            .zip(&self.y)
            .zip(&self.z)
            .map(|(((&timestamp_ms, &x), &y), &z)| Sample {
                timestamp_ms,
                x,
                y,
                z,
            })
    }
}

/// Bounded FIFO of X/Y/Z samples plus their relative timestamps.
#[derive(Debug)]
pub struct TelemetryBuffer {
    timestamps: VecDeque<u64>,
    x: VecDeque<f32>,
    y: VecDeque<f32>,
    z: VecDeque<f32>,
    capacity: usize,
    origin_ms: Option<u64>,
    clock: Instant,
}

impl Default for TelemetryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TelemetryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            timestamps: VecDeque::with_capacity(capacity + 1),
            x: VecDeque::with_capacity(capacity + 1),
            y: VecDeque::with_capacity(capacity + 1),
            z: VecDeque::with_capacity(capacity + 1),
            capacity,
            origin_ms: None,
            clock: Instant::now(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Stores one sample. The first sample after construction or [`clear`](Self::clear)
    /// defines the time origin, so its stored timestamp is always 0.
    pub fn append(&mut self, x: f32, y: f32, z: f32, timestamp_ms: u64) {
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        self.timestamps.push_back(timestamp_ms.saturating_sub(origin));
        self.x.push_back(x);
        self.y.push_back(y);
        self.z.push_back(z);
        self.evict_to(self.capacity);
    }

    /// Stamps the sample with the buffer's monotonic clock.
    pub fn append_now(&mut self, x: f32, y: f32, z: f32) {
        let now_ms = self.clock.elapsed().as_millis() as u64;
        self.append(x, y, z, now_ms);
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(MIN_CAPACITY);
        self.evict_to(self.capacity);
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.origin_ms = None;
    }

    pub fn latest(&self) -> Option<Sample> {
        Some(Sample {
            timestamp_ms: *self.timestamps.back()?,
            x: *self.x.back()?,
            y: *self.y.back()?,
            z: *self.z.back()?,
        })
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            timestamps: self.timestamps.iter().copied().collect(),
            x: self.x.iter().copied().collect(),
            y: self.y.iter().copied().collect(),
            z: self.z.iter().copied().collect(),
            capacity: self.capacity,
        }
    }

    fn evict_to(&mut self, limit: usize) {
        while self.timestamps.len() > limit {
            self.timestamps.pop_front();
            self.x.pop_front();
            self.y.pop_front();
            self.z.pop_front();
        }
    }
}

/// Handle shared by the sample producer and the render cycle.
///
/// Every operation runs inside a single critical section, so a snapshot
/// never sees a sample that is only partly appended or evicted.
#[derive(Clone, Debug, Default)]
pub struct SharedTelemetry {
    inner: Arc<Mutex<TelemetryBuffer>>,
}

impl SharedTelemetry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TelemetryBuffer::with_capacity(capacity))),
        }
    }

    pub fn append(&self, x: f32, y: f32, z: f32, timestamp_ms: u64) {
        self.lock().append(x, y, z, timestamp_ms);
    }

    pub fn append_now(&self, x: f32, y: f32, z: f32) {
        self.lock().append_now(x, y, z);
    }

    pub fn push(&self, sample: Sample) {
        self.append(sample.x, sample.y, sample.z, sample.timestamp_ms);
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.lock().set_capacity(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn latest(&self) -> Option<Sample> {
        self.lock().latest()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.lock().snapshot()
    }

    // A panic elsewhere cannot leave the buffer half-updated between calls,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, TelemetryBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
