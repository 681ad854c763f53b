// src/types.rs
use motion_scope::scope::SensorKind;

// GUI 发给采集线程的命令
#[derive(Clone, Debug)]
pub enum EngineCommand {
    Start(SensorKind),
    Stop,
    SetSensor(SensorKind),
    SetIntervalMs(u64),
}

// 采集线程发给 GUI 的消息
#[derive(Clone, Debug)]
pub enum EngineMessage {
    Log(String),
    Capturing(bool),
}
