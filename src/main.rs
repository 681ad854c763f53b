// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod engine;
mod gui;
mod types;
use std::path::Path;

use anyhow::{anyhow, Context};
use eframe::egui;
use log::info;
use motion_scope::ScopeConfig;

const CONFIG_FILE: &str = "motion-scope.json";

// 配置加载：文件不存在时使用默认值
fn load_config() -> anyhow::Result<ScopeConfig> {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        info!("no {CONFIG_FILE}, using defaults");
        return Ok(ScopeConfig::default());
    }
    ScopeConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}

// 入口函数
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = load_config()?;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([
            config.canvas_width as f32 + 280.0,
            config.canvas_height as f32 + 40.0,
        ])
        .with_min_inner_size([800.0, 520.0])
        .with_title("MoTrak Scope");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "motion-scope",
        options,
        Box::new(|_cc| Box::new(gui::ScopeApp::new(config))),
    )
    .map_err(|e| anyhow!("{e}"))
}
