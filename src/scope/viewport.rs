use log::debug;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 5.0;

/// Read-only copy of the zoom/pan state handed to the transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    pub pan_offset_px: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            pan_offset_px: 0.0,
        }
    }
}

/// Interprets pinch, drag and reset gestures into a bounded zoom/pan state.
///
/// Handlers return `true` when the state changed and the chart needs a redraw.
#[derive(Clone, Debug)]
pub struct ViewportController {
    state: ViewportState,
    chart_width_px: f32,
    enabled: bool,
}

impl ViewportController {
    pub fn new(chart_width_px: f32, enabled: bool) -> Self {
        Self {
            state: ViewportState::default(),
            chart_width_px: chart_width_px.max(0.0),
            enabled,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn pan_offset_px(&self) -> f32 {
        self.state.pan_offset_px
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn chart_width_px(&self) -> f32 {
        self.chart_width_px
    }

    pub fn set_chart_width(&mut self, chart_width_px: f32) {
        if chart_width_px.is_finite() {
            self.chart_width_px = chart_width_px.max(0.0);
            self.clamp_pan();
        }
    }

    /// Largest pan offset that still keeps the zoomed content under the chart.
    pub fn pan_clamp_max(&self) -> f32 {
        (self.chart_width_px * self.state.scale - self.chart_width_px).max(0.0)
    }

    pub fn on_pinch(&mut self, scale_delta: f32) -> bool {
        if !self.enabled || !scale_delta.is_finite() || scale_delta <= 0.0 {
            return false;
        }
        let before = self.state;
        self.state.scale = (self.state.scale * scale_delta).clamp(MIN_SCALE, MAX_SCALE);
        self.clamp_pan();
        before != self.state
    }

    pub fn on_drag(&mut self, delta_px: f32) -> bool {
        if !self.enabled || !delta_px.is_finite() || self.state.scale <= MIN_SCALE {
            return false;
        }
        let before = self.state.pan_offset_px;
        self.state.pan_offset_px += delta_px;
        self.clamp_pan();
        before != self.state.pan_offset_px
    }

    /// Double-tap equivalent. Also used when the sensor kind changes.
    pub fn on_reset_gesture(&mut self) -> bool {
        let changed = self.state != ViewportState::default();
        self.state = ViewportState::default();
        if changed {
            debug!("viewport reset");
        }
        changed
    }

    fn clamp_pan(&mut self) {
        self.state.pan_offset_px = self.state.pan_offset_px.clamp(0.0, self.pan_clamp_max());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_saturates_at_bounds() {
        let mut viewport = ViewportController::new(1000.0, true);
        for _ in 0..10 {
            viewport.on_pinch(10.0);
            assert!(viewport.scale() <= MAX_SCALE);
        }
        assert_eq!(viewport.scale(), MAX_SCALE);
        for _ in 0..10 {
            viewport.on_pinch(0.01);
            assert!(viewport.scale() >= MIN_SCALE);
        }
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn drag_is_ignored_at_unit_scale() {
        let mut viewport = ViewportController::new(1000.0, true);
        assert!(!viewport.on_drag(100.0));
        assert_eq!(viewport.pan_offset_px(), 0.0);
    }

    #[test]
    fn drag_is_clamped_to_zoomed_content() {
        let mut viewport = ViewportController::new(1000.0, true);
        viewport.on_pinch(2.0);
        assert_eq!(viewport.pan_clamp_max(), 1000.0);
        viewport.on_drag(400.0);
        assert_eq!(viewport.pan_offset_px(), 400.0);
        viewport.on_drag(5_000.0);
        assert_eq!(viewport.pan_offset_px(), 1000.0);
        viewport.on_drag(-9_000.0);
        assert_eq!(viewport.pan_offset_px(), 0.0);
    }

    #[test]
    fn zooming_out_pulls_pan_back_into_range() {
        let mut viewport = ViewportController::new(500.0, true);
        viewport.on_pinch(4.0);
        viewport.on_drag(1_500.0);
        assert_eq!(viewport.pan_offset_px(), 1_500.0);
        viewport.on_pinch(0.5);
        assert_eq!(viewport.pan_offset_px(), 500.0);
    }

    #[test]
    fn reset_restores_defaults_after_any_history() {
        let mut viewport = ViewportController::new(800.0, true);
        viewport.on_pinch(3.3);
        viewport.on_drag(120.0);
        viewport.on_pinch(0.9);
        viewport.on_drag(-30.0);
        assert!(viewport.on_reset_gesture());
        assert_eq!(viewport.state(), ViewportState::default());
        assert!(!viewport.on_reset_gesture());
    }

    #[test]
    fn disabled_controller_swallows_gestures() {
        let mut viewport = ViewportController::new(800.0, false);
        assert!(!viewport.on_pinch(3.0));
        assert!(!viewport.on_drag(50.0));
        assert_eq!(viewport.state(), ViewportState::default());
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut viewport = ViewportController::new(800.0, true);
        viewport.on_pinch(2.0);
        viewport.on_pinch(f32::NAN);
        viewport.on_pinch(-1.0);
        viewport.on_drag(f32::INFINITY);
        assert_eq!(viewport.scale(), 2.0);
        assert_eq!(viewport.pan_offset_px(), 0.0);
    }
}
