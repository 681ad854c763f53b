use super::range::ValueRange;
use super::viewport::ViewportState;

/// Pixel rectangle of the chart interior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ChartGeometry {
    /// Chart interior for a canvas with equal padding on every side.
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, padding: f32) -> Self {
        Self {
            left: padding,
            top: padding,
            width: (canvas_width as f32 - 2.0 * padding).max(0.0),
            height: (canvas_height as f32 - 2.0 * padding).max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, (x, y): (f32, f32)) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Maps (buffer index, value) pairs to screen points.
///
/// The horizontal step is derived from the buffer *capacity*, not its current
/// length: the full chart width always stands for `capacity` samples, so a
/// partially filled buffer only covers the left part of the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    geometry: ChartGeometry,
    range: ValueRange,
    viewport: ViewportState,
    x_interval: f32,
}

impl CoordinateTransform {
    pub fn new(
        capacity: usize,
        range: ValueRange,
        geometry: ChartGeometry,
        viewport: ViewportState,
    ) -> Self {
        let steps = capacity.saturating_sub(1).max(1) as f32;
        Self {
            geometry,
            range,
            viewport,
            x_interval: geometry.width / steps,
        }
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    pub fn x_interval(&self) -> f32 {
        self.x_interval
    }

    pub fn x_for_index(&self, index: usize) -> f32 {
        self.geometry.left + index as f32 * self.x_interval * self.viewport.scale
            - self.viewport.pan_offset_px
    }

    /// Screen y grows downward while values grow upward, hence the inversion.
    pub fn y_for_value(&self, value: f32) -> f32 {
        let normalized = self.range.normalize(value);
        self.geometry.top + self.geometry.height - normalized * self.geometry.height
    }

    /// Baseline of the filled area and position of the emphasized axis.
    pub fn zero_line_y(&self) -> f32 {
        self.y_for_value(0.0)
    }

    pub fn point(&self, index: usize, value: f32) -> (f32, f32) {
        (self.x_for_index(index), self.y_for_value(value))
    }

    pub fn polyline(&self, values: &[f32]) -> Vec<(f32, f32)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.point(i, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> ChartGeometry {
        ChartGeometry::from_canvas(1160, 660, 80.0)
    }

    #[test]
    fn geometry_from_canvas_subtracts_padding() {
        let g = geometry();
        assert_eq!(g.width, 1000.0);
        assert_eq!(g.height, 500.0);
        assert_eq!(g.right(), 1080.0);
        assert_eq!(g.bottom(), 580.0);
    }

    #[test]
    fn horizontal_step_uses_capacity() {
        let t = CoordinateTransform::new(101, ValueRange::new(-15.0, 15.0), geometry(), ViewportState::default());
        assert_eq!(t.x_for_index(0), 80.0);
        assert_eq!(t.x_for_index(50), 580.0);
        assert_eq!(t.x_for_index(100), 1080.0);
    }

    #[test]
    fn vertical_mapping_is_inverted_and_unclamped() {
        let t = CoordinateTransform::new(100, ValueRange::new(-10.0, 10.0), geometry(), ViewportState::default());
        assert_eq!(t.y_for_value(10.0), 80.0);
        assert_eq!(t.y_for_value(-10.0), 580.0);
        assert_eq!(t.zero_line_y(), 330.0);
        assert!(t.y_for_value(20.0) < geometry().top);
    }

    #[test]
    fn zoom_and_pan_shift_horizontal_positions() {
        let viewport = ViewportState {
            scale: 2.0,
            pan_offset_px: 250.0,
        };
        let t = CoordinateTransform::new(101, ValueRange::new(-1.0, 1.0), geometry(), viewport);
        assert_eq!(t.x_for_index(0), 80.0 - 250.0);
        assert_eq!(t.x_for_index(50), 80.0 + 1000.0 - 250.0);
        assert_eq!(t.y_for_value(0.0), 330.0);
    }

    #[test]
    fn same_inputs_map_to_same_point() {
        let t = CoordinateTransform::new(100, ValueRange::new(-15.0, 15.0), geometry(), ViewportState::default());
        assert_eq!(t.point(17, 3.25), t.point(17, 3.25));
        assert_eq!(t.polyline(&[1.0, 2.0]).len(), 2);
    }
}
