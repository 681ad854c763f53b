// src/gui.rs
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, TextureHandle, TextureOptions};
use log::{error, warn};
use motion_scope::scope::{Canvas, CaptureSession, CsvExporter, Sample, ScopeError, SensorKind};
use motion_scope::ScopeConfig;

use crate::engine;
use crate::types::{EngineCommand, EngineMessage};

const MIN_CANVAS: f32 = 240.0;

// 最新读数
fn readout(sample: &Sample) -> String {
    format!("X: {:.2}  Y: {:.2}  Z: {:.2}", sample.x, sample.y, sample.z)
}

pub struct ScopeApp {
    // 采集状态
    session: CaptureSession,
    exporter: CsvExporter,
    selected_sensor: SensorKind,
    capacity: usize,
    interval_ms: u64,
    dark_mode: bool,
    zoom_enabled: bool,
    capture_started: Option<Instant>,
    elapsed_secs: u64,

    // 图表纹理
    chart_texture: Option<TextureHandle>,

    // 界面日志
    log_messages: Vec<String>,

    // 通讯管道
    rx: Receiver<EngineMessage>,
    tx_cmd: Sender<EngineCommand>,
}

impl ScopeApp {
    pub fn new(config: ScopeConfig) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        let session = CaptureSession::new(&config);

        // 启动后台采集线程
        engine::spawn_thread(session.telemetry(), config.sample_interval_ms, tx, rx_cmd);

        Self {
            exporter: CsvExporter::new(config.export_dir.clone()),
            selected_sensor: config.sensor_kind,
            capacity: config.capacity,
            interval_ms: config.sample_interval_ms,
            dark_mode: config.dark_mode,
            zoom_enabled: config.zoom_enabled,
            capture_started: None,
            elapsed_secs: 0,
            chart_texture: None,
            log_messages: vec!["MoTrak scope ready.".to_owned()],
            session,
            rx,
            tx_cmd,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    fn send(&mut self, cmd: EngineCommand) {
        if self.tx_cmd.send(cmd).is_err() {
            warn!("sample engine is gone");
            self.log("Sample engine stopped unexpectedly");
        }
    }

    fn start_capture(&mut self) {
        self.session.start(self.selected_sensor);
        self.capture_started = Some(Instant::now());
        self.elapsed_secs = 0;
        self.send(EngineCommand::Start(self.selected_sensor));
    }

    fn stop_capture(&mut self) {
        self.session.stop();
        self.capture_started = None;
        self.send(EngineCommand::Stop);
    }

    fn change_sensor(&mut self) {
        if self.selected_sensor == self.session.sensor() {
            return;
        }
        self.session.set_sensor_kind(self.selected_sensor);
        if self.session.is_capturing() {
            self.send(EngineCommand::SetSensor(self.selected_sensor));
        }
    }

    fn export(&mut self) {
        match self.session.export_to(&self.exporter) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.log(&format!("Data exported to {name}"));
            }
            Err(ScopeError::NoData) => self.log("No data to export"),
            Err(e) => {
                error!("export failed: {e}");
                self.log(&format!("Error exporting data: {e}"));
            }
        }
    }

    fn timer_text(&self) -> String {
        let secs = self.elapsed_secs;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.heading("MoTrak Scope");
        ui.label("Motion sensor monitor");
        ui.separator();

        egui::ComboBox::from_label("Sensor")
            .selected_text(self.selected_sensor.label())
            .show_ui(ui, |ui| {
                for kind in SensorKind::ALL {
                    ui.selectable_value(&mut self.selected_sensor, kind, kind.label());
                }
            });
        self.change_sensor();

        ui.horizontal(|ui| {
            let capturing = self.session.is_capturing();
            if ui.add_enabled(!capturing, egui::Button::new("▶ START")).clicked() {
                self.start_capture();
            }
            if ui.add_enabled(capturing, egui::Button::new("⏹ STOP")).clicked() {
                self.stop_capture();
            }
        });
        ui.monospace(self.timer_text());
        if let Some(sample) = self.session.latest_sample() {
            ui.monospace(readout(&sample));
        }

        ui.add_space(10.0);
        if ui
            .add(egui::Slider::new(&mut self.capacity, 50..=500).text("Max points"))
            .changed()
        {
            self.session.set_capacity(self.capacity);
        }
        if ui
            .add(egui::Slider::new(&mut self.interval_ms, 5..=200).text("Interval (ms)"))
            .changed()
        {
            self.send(EngineCommand::SetIntervalMs(self.interval_ms));
        }
        if ui.checkbox(&mut self.dark_mode, "Dark mode").changed() {
            self.session.set_dark_mode(self.dark_mode);
        }
        if ui.checkbox(&mut self.zoom_enabled, "Pinch zoom / pan").changed() {
            self.session.set_zoom_enabled(self.zoom_enabled);
        }

        ui.add_space(10.0);
        let can_export = !self.session.is_capturing();
        if ui.add_enabled(can_export, egui::Button::new("💾 EXPORT CSV")).clicked() {
            self.export();
        }

        ui.add_space(10.0);
        egui::ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
            for m in &self.log_messages {
                ui.monospace(m);
            }
        });
    }

    fn chart(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size().max(egui::vec2(MIN_CANVAS, MIN_CANVAS));
        let canvas = Canvas::new(size.x as u32, size.y as u32);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());

        // 手势 -> 视口
        if response.double_clicked() {
            self.session.viewport_mut().on_reset_gesture();
        } else {
            if response.hovered() {
                let zoom = ui.input(|i| i.zoom_delta());
                if zoom != 1.0 {
                    self.session.viewport_mut().on_pinch(zoom);
                }
            }
            let drag = response.drag_delta().x;
            if drag != 0.0 {
                // Dragging left reveals later samples.
                self.session.viewport_mut().on_drag(-drag);
            }
        }

        let frame = match self.session.render_rgb(canvas) {
            Ok(frame) => frame,
            Err(e) => {
                error!("chart render failed: {e}");
                return;
            }
        };
        let image = egui::ColorImage::from_rgb(
            [canvas.width as usize, canvas.height as usize],
            &frame,
        );
        if let Some(texture) = self.chart_texture.as_mut() {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.chart_texture =
                Some(ui.ctx().load_texture("scope-chart", image, TextureOptions::LINEAR));
        }
        let Some(texture) = &self.chart_texture else {
            return;
        };
        let uv = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0));
        painter.image(texture.id(), response.rect, uv, Color32::WHITE);
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 消息处理
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                EngineMessage::Log(s) => self.log(&s),
                EngineMessage::Capturing(false) if self.session.is_capturing() => {
                    self.session.stop();
                    self.capture_started = None;
                }
                EngineMessage::Capturing(_) => {}
            }
        }
        if let Some(started) = self.capture_started {
            self.elapsed_secs = started.elapsed().as_secs();
        }

        // 2. UI 绘制
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::SidePanel::left("controls")
            .min_width(260.0)
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.chart(ui));

        if self.session.is_capturing() {
            ctx.request_repaint();
        }
    }
}
