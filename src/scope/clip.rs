//! Geometric clipping against an axis-aligned rectangle.
//!
//! The bitmap backend paints whatever it is given, so everything drawn inside
//! the chart interior is cut to the interior here first.

use super::transform::ChartGeometry;

pub type Point = (f32, f32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ClipRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

impl From<ChartGeometry> for ClipRect {
    fn from(g: ChartGeometry) -> Self {
        ClipRect::new(g.left, g.top, g.right(), g.bottom())
    }
}

pub fn is_finite((x, y): Point) -> bool {
    x.is_finite() && y.is_finite()
}

/// Liang-Barsky. Returns the visible part of `a -> b`, if any. Segments with
/// a non-finite endpoint are never visible.
pub fn clip_segment(a: Point, b: Point, rect: &ClipRect) -> Option<(Point, Point)> {
    if !is_finite(a) || !is_finite(b) {
        return None;
    }
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let checks = [
        (-dx, a.0 - rect.left),
        (dx, rect.right - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom - a.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    // Untouched endpoints are returned as-is so consecutive segments still join.
    let start = if t0 == 0.0 {
        a
    } else {
        (a.0 + t0 * dx, a.1 + t0 * dy)
    };
    let end = if t1 == 1.0 {
        b
    } else {
        (a.0 + t1 * dx, a.1 + t1 * dy)
    };
    Some((start, end))
}

/// Splits a polyline into the runs that stay inside `rect`.
pub fn clip_polyline(points: &[Point], rect: &ClipRect) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    if let [only] = points {
        if rect.contains(*only) {
            runs.push(vec![*only]);
        }
        return runs;
    }
    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], rect) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(start);
                }
                current.push(end);
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

#[derive(Clone, Copy)]
enum Edge {
    Left(f32),
    Right(f32),
    Top(f32),
    Bottom(f32),
}

impl Edge {
    fn inside(self, (x, y): Point) -> bool {
        match self {
            Edge::Left(v) => x >= v,
            Edge::Right(v) => x <= v,
            Edge::Top(v) => y >= v,
            Edge::Bottom(v) => y <= v,
        }
    }

    fn intersect(self, a: Point, b: Point) -> Point {
        match self {
            Edge::Left(v) | Edge::Right(v) => {
                let t = (v - a.0) / (b.0 - a.0);
                (v, a.1 + t * (b.1 - a.1))
            }
            Edge::Top(v) | Edge::Bottom(v) => {
                let t = (v - a.1) / (b.1 - a.1);
                (a.0 + t * (b.0 - a.0), v)
            }
        }
    }
}

/// Sutherland-Hodgman. The polygon is treated as implicitly closed and
/// non-finite vertices are dropped.
pub fn clip_polygon(points: &[Point], rect: &ClipRect) -> Vec<Point> {
    let edges = [
        Edge::Left(rect.left),
        Edge::Right(rect.right),
        Edge::Top(rect.top),
        Edge::Bottom(rect.bottom),
    ];
    let mut output: Vec<Point> = points.iter().copied().filter(|p| is_finite(*p)).collect();
    for edge in edges {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for &current in &input {
            match (edge.inside(prev), edge.inside(current)) {
                (true, true) => output.push(current),
                (true, false) => output.push(edge.intersect(prev, current)),
                (false, true) => {
                    output.push(edge.intersect(prev, current));
                    output.push(current);
                }
                (false, false) => {}
            }
            prev = current;
        }
    }
    if output.len() < 3 {
        output.clear();
    }
    output
}

/// Cuts `a -> b` into dashes of `on` px separated by `off` px gaps.
pub fn dash_segment(a: Point, b: Point, on: f32, off: f32) -> Vec<(Point, Point)> {
    let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    if length == 0.0 || on <= 0.0 {
        return Vec::new();
    }
    if off <= 0.0 {
        return vec![(a, b)];
    }
    let (ux, uy) = ((b.0 - a.0) / length, (b.1 - a.1) / length);
    let at = |d: f32| (a.0 + ux * d, a.1 + uy * d);
    let mut dashes = Vec::new();
    let mut start = 0.0f32;
    while start < length {
        let end = (start + on).min(length);
        dashes.push((at(start), at(end)));
        start += on + off;
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ClipRect {
        ClipRect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn segment_inside_is_untouched() {
        let seg = clip_segment((10.0, 10.0), (90.0, 50.0), &rect());
        assert_eq!(seg, Some(((10.0, 10.0), (90.0, 50.0))));
    }

    #[test]
    fn segment_crossing_is_cut_at_edge() {
        let ((x0, y0), (x1, y1)) = clip_segment((-50.0, 50.0), (50.0, 50.0), &rect()).unwrap();
        assert_eq!((x0, y0), (0.0, 50.0));
        assert_eq!((x1, y1), (50.0, 50.0));
        assert!(clip_segment((-10.0, -10.0), (-5.0, 200.0), &rect()).is_none());
    }

    #[test]
    fn polyline_leaving_and_returning_splits_into_runs() {
        let points = [(10.0, 50.0), (50.0, 150.0), (90.0, 50.0)];
        let runs = clip_polyline(&points, &rect());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0][0], (10.0, 50.0));
        assert_eq!(runs[1].last().copied(), Some((90.0, 50.0)));
    }

    #[test]
    fn polyline_fully_inside_is_one_run() {
        let points = [(10.0, 10.0), (20.0, 30.0), (30.0, 20.0), (40.0, 60.0)];
        let runs = clip_polyline(&points, &rect());
        assert_eq!(runs, vec![points.to_vec()]);
    }

    #[test]
    fn polygon_is_cut_to_rect() {
        let square = [(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0)];
        let clipped = clip_polygon(&square, &rect());
        assert!(!clipped.is_empty());
        assert!(clipped.iter().all(|p| rect().contains(*p)));
        assert!(clipped.contains(&(50.0, 50.0)));
        assert!(clip_polygon(&[(200.0, 200.0), (300.0, 200.0), (250.0, 300.0)], &rect()).is_empty());
    }

    #[test]
    fn non_finite_points_break_runs() {
        assert!(clip_segment((10.0, 10.0), (20.0, f32::NAN), &rect()).is_none());
        let points = [(10.0, 10.0), (20.0, 20.0), (30.0, f32::NAN), (40.0, 40.0), (50.0, 50.0)];
        let runs = clip_polyline(&points, &rect());
        assert_eq!(runs, vec![vec![(10.0, 10.0), (20.0, 20.0)], vec![(40.0, 40.0), (50.0, 50.0)]]);
        let polygon = clip_polygon(
            &[(10.0, 10.0), (90.0, f32::INFINITY), (90.0, 90.0), (10.0, 90.0)],
            &rect(),
        );
        assert_eq!(polygon.len(), 3);
        assert!(polygon.iter().all(|p| rect().contains(*p)));
    }

    #[test]
    fn dashes_follow_pattern() {
        let dashes = dash_segment((0.0, 0.0), (22.0, 0.0), 5.0, 5.0);
        assert_eq!(dashes.len(), 3);
        assert_eq!(dashes[1], ((10.0, 0.0), (15.0, 0.0)));
        assert_eq!(dashes[2], ((20.0, 0.0), (22.0, 0.0)));
    }
}
