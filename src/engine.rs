// src/engine.rs
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};
use motion_scope::scope::{SampleSource, SensorKind, SharedTelemetry, SimulatedSource};

use crate::types::{EngineCommand, EngineMessage};

const IDLE_SLEEP: Duration = Duration::from_millis(50);

/// Producer thread: feeds simulated motion samples into the shared buffer
/// while capturing. Exits once the command channel is dropped.
pub fn spawn_thread(
    telemetry: SharedTelemetry,
    interval_ms: u64,
    tx: Sender<EngineMessage>,
    rx_cmd: Receiver<EngineCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tx.send(EngineMessage::Log("Sample engine ready.".to_owned())).ok();
        let mut source = SimulatedSource::new(SensorKind::default(), interval_ms);
        let mut capturing = false;

        loop {
            // 1. 命令处理
            loop {
                match rx_cmd.try_recv() {
                    Ok(EngineCommand::Start(kind)) => {
                        source.set_sensor(kind);
                        telemetry.clear();
                        capturing = true;
                        tx.send(EngineMessage::Capturing(true)).ok();
                        tx.send(EngineMessage::Log(format!("Capturing {kind}"))).ok();
                    }
                    Ok(EngineCommand::Stop) => {
                        capturing = false;
                        tx.send(EngineMessage::Capturing(false)).ok();
                        tx.send(EngineMessage::Log("Capture stopped".to_owned())).ok();
                    }
                    Ok(EngineCommand::SetSensor(kind)) => {
                        // Clear after switching so no sample of the old sensor survives.
                        source.set_sensor(kind);
                        telemetry.clear();
                        debug!("engine switched to {kind}");
                    }
                    Ok(EngineCommand::SetIntervalMs(ms)) => source.set_interval_ms(ms),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        info!("command channel closed, sample engine exiting");
                        return;
                    }
                }
            }

            // 2. 数据流
            if capturing {
                if let Some(sample) = source.next_sample() {
                    telemetry.push(sample);
                }
                thread::sleep(Duration::from_millis(source.interval_ms()));
            } else {
                thread::sleep(IDLE_SLEEP);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Instant;

    #[test]
    fn engine_fills_buffer_while_capturing_and_exits_on_drop() {
        let telemetry = SharedTelemetry::with_capacity(50);
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        let handle = spawn_thread(telemetry.clone(), 1, tx, rx_cmd);
        tx_cmd.send(EngineCommand::Start(SensorKind::Gyroscope)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while telemetry.len() < 10 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(telemetry.len() >= 10);

        tx_cmd.send(EngineCommand::Stop).unwrap();
        drop(tx_cmd);
        handle.join().unwrap();
        let messages: Vec<EngineMessage> = rx.try_iter().collect();
        assert!(messages
            .iter()
            .any(|m| matches!(m, EngineMessage::Capturing(true))));
        assert!(messages
            .iter()
            .any(|m| matches!(m, EngineMessage::Capturing(false))));
        let snapshot = telemetry.snapshot();
        assert!(snapshot.timestamps.windows(2).all(|w| w[0] < w[1]));
    }
}
