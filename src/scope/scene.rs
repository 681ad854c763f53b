use super::buffer::{Channel, TelemetrySnapshot};
use super::clip::{clip_polygon, clip_polyline, dash_segment, ClipRect, Point};
use super::range::SensorKind;
use super::theme::{ChartStyle, Rgb};
use super::transform::{ChartGeometry, CoordinateTransform};
use super::viewport::ViewportState;

/// Which part of the chart an operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    Title,
    Legend,
    Grid,
    ZeroLine,
    Data(Channel),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Backend-independent drawing primitive in canvas pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill {
        color: Rgb,
    },
    Rect {
        top_left: Point,
        bottom_right: Point,
        color: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: u32,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgb,
        width: u32,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgb,
        alpha: u8,
    },
    /// `at` is the text baseline anchor.
    Text {
        text: String,
        at: Point,
        size: u32,
        color: Rgb,
        align: TextAlign,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneItem {
    pub layer: Layer,
    pub op: DrawOp,
}

/// Size of the target framebuffer in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One fully composed frame, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScene {
    pub canvas: Canvas,
    pub geometry: ChartGeometry,
    pub zero_line_y: f32,
    pub items: Vec<SceneItem>,
}

impl ChartScene {
    pub fn compose(
        snapshot: &TelemetrySnapshot,
        viewport: ViewportState,
        sensor: SensorKind,
        style: &ChartStyle,
        canvas: Canvas,
    ) -> Self {
        let layout = &style.layout;
        let geometry = ChartGeometry::from_canvas(canvas.width, canvas.height, layout.padding);
        let transform =
            CoordinateTransform::new(snapshot.capacity, sensor.range(), geometry, viewport);
        let mut builder = SceneBuilder {
            items: Vec::new(),
            style,
            canvas,
            geometry,
        };
        builder.background();
        builder.title(sensor.label());
        builder.legend();
        builder.value_grid(sensor);
        builder.time_grid(&snapshot.timestamps, viewport);
        builder.zero_line(transform.zero_line_y());
        for channel in Channel::ALL {
            builder.channel(&transform, channel, snapshot.channel(channel));
        }
        ChartScene {
            canvas,
            geometry,
            zero_line_y: transform.zero_line_y(),
            items: builder.items,
        }
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> + '_ {
        self.items
            .iter()
            .filter(move |item| item.layer == layer)
            .map(|item| &item.op)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().filter_map(|item| match &item.op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct SceneBuilder<'a> {
    items: Vec<SceneItem>,
    style: &'a ChartStyle,
    canvas: Canvas,
    geometry: ChartGeometry,
}

impl SceneBuilder<'_> {
    fn push(&mut self, layer: Layer, op: DrawOp) {
        self.items.push(SceneItem { layer, op });
    }

    fn text(&mut self, layer: Layer, text: String, at: Point, color: Rgb, align: TextAlign) {
        let size = self.style.layout.text_size;
        self.push(
            layer,
            DrawOp::Text {
                text,
                at,
                size,
                color,
                align,
            },
        );
    }

    fn background(&mut self) {
        let color = self.style.theme().background;
        self.push(Layer::Background, DrawOp::Fill { color });
    }

    fn title(&mut self, label: &str) {
        let theme = self.style.theme();
        let padding = self.style.layout.padding;
        let at = (padding, padding - 30.0);
        self.text(
            Layer::Title,
            label.to_owned(),
            (at.0 + 1.0, at.1 + 1.0),
            theme.title_shadow,
            TextAlign::Left,
        );
        self.text(Layer::Title, label.to_owned(), at, theme.text, TextAlign::Left);
    }

    fn legend(&mut self) {
        let layout = self.style.layout;
        let text_color = self.style.theme().text;
        let x = self.canvas.width as f32 - layout.legend_inset;
        let mut y = layout.padding - 30.0;
        for channel in Channel::ALL {
            let color = self.style.channel(channel).color;
            self.push(
                Layer::Legend,
                DrawOp::Rect {
                    top_left: (x, y - layout.legend_swatch + 5.0),
                    bottom_right: (x + layout.legend_swatch, y + 5.0),
                    color,
                },
            );
            self.text(
                Layer::Legend,
                channel.legend_label().to_owned(),
                (x + layout.legend_swatch + 10.0, y + 5.0),
                text_color,
                TextAlign::Left,
            );
            y += layout.legend_spacing;
        }
    }

    fn dashed(&mut self, from: Point, to: Point) {
        let layout = self.style.layout;
        let color = self.style.theme().grid;
        for (a, b) in dash_segment(from, to, layout.dash_on, layout.dash_off) {
            self.push(
                Layer::Grid,
                DrawOp::Line {
                    from: a,
                    to: b,
                    color,
                    width: layout.grid_width,
                },
            );
        }
    }

    fn value_grid(&mut self, sensor: SensorKind) {
        let g = self.geometry;
        let range = sensor.range();
        let divisions = self.style.layout.horizontal_divisions.max(1);
        let text_color = self.style.theme().text;
        for i in 0..=divisions {
            let y = g.top + i as f32 * g.height / divisions as f32;
            self.dashed((g.left, y), (g.right(), y));
            let value = range.max - i as f32 * range.span() / divisions as f32;
            self.text(
                Layer::Grid,
                format!("{value:.1}"),
                (g.left - 10.0, y + 10.0),
                text_color,
                TextAlign::Right,
            );
        }
    }

    fn time_grid(&mut self, timestamps: &[u64], viewport: ViewportState) {
        let g = self.geometry;
        let divisions = self.style.layout.vertical_divisions.max(1);
        let text_color = self.style.theme().text;
        for i in 0..=divisions {
            let x = g.left + i as f32 * g.width / divisions as f32;
            self.dashed((x, g.top), (x, g.bottom()));
            let fraction = content_fraction(i as f32 / divisions as f32, g.width, viewport);
            if let Some(ms) = time_label_sample(timestamps, fraction) {
                self.text(
                    Layer::Grid,
                    format!("{:.1}s", ms as f32 / 1000.0),
                    (x, g.bottom() + 30.0),
                    text_color,
                    TextAlign::Center,
                );
            }
        }
    }

    fn zero_line(&mut self, y: f32) {
        let g = self.geometry;
        let layout = self.style.layout;
        self.push(
            Layer::ZeroLine,
            DrawOp::Line {
                from: (g.left, y),
                to: (g.right(), y),
                color: self.style.theme().zero_line,
                width: layout.zero_line_width,
            },
        );
    }

    fn channel(&mut self, transform: &CoordinateTransform, channel: Channel, values: &[f32]) {
        if values.is_empty() {
            return;
        }
        let style = *self.style.channel(channel);
        let layer = Layer::Data(channel);
        let interior = ClipRect::from(self.geometry);
        let points = transform.polyline(values);
        let baseline = transform.zero_line_y();

        let mut area = Vec::with_capacity(points.len() + 2);
        area.push((transform.x_for_index(0), baseline));
        area.extend_from_slice(&points);
        area.push((transform.x_for_index(values.len() - 1), baseline));
        for (band, alpha) in gradient_bands(
            interior,
            baseline,
            style.fill_alpha,
            self.style.layout.gradient_bands,
        ) {
            let clipped = clip_polygon(&area, &band);
            if !clipped.is_empty() {
                self.push(
                    layer,
                    DrawOp::Polygon {
                        points: clipped,
                        color: style.color,
                        alpha,
                    },
                );
            }
        }

        for run in clip_polyline(&points, &interior) {
            if run.len() < 2 {
                continue;
            }
            self.push(
                layer,
                DrawOp::Polyline {
                    points: run,
                    color: style.color,
                    width: style.stroke_width,
                },
            );
        }
    }
}

/// Maps a position across the visible chart (0 = left edge, 1 = right edge)
/// back to a position across the whole zoomed content.
fn content_fraction(screen_fraction: f32, chart_width: f32, viewport: ViewportState) -> f32 {
    let pan = if chart_width > 0.0 {
        viewport.pan_offset_px / chart_width
    } else {
        0.0
    };
    ((screen_fraction + pan) / viewport.scale.max(1.0)).clamp(0.0, 1.0)
}

/// Timestamp shown at `fraction` of the captured window.
fn time_label_sample(timestamps: &[u64], fraction: f32) -> Option<u64> {
    let last = timestamps.len().checked_sub(1)?;
    let index = ((fraction * last as f32).round() as usize).min(last);
    timestamps.get(index).copied()
}

/// Splits the interior into horizontal bands approximating a vertical
/// gradient: full `alpha` down to `baseline`, fading to zero at the bottom.
fn gradient_bands(interior: ClipRect, baseline: f32, alpha: u8, bands: usize) -> Vec<(ClipRect, u8)> {
    let mut out = Vec::new();
    if alpha == 0 {
        return out;
    }
    let fade_top = baseline.clamp(interior.top, interior.bottom);
    if fade_top > interior.top {
        out.push((
            ClipRect::new(interior.left, interior.top, interior.right, fade_top),
            alpha,
        ));
    }
    let fade_height = interior.bottom - fade_top;
    if fade_height <= 0.0 {
        return out;
    }
    let bands = bands.max(1);
    let step = fade_height / bands as f32;
    let gradient_height = interior.bottom - baseline;
    for i in 0..bands {
        let y0 = fade_top + i as f32 * step;
        let y1 = if i + 1 == bands { interior.bottom } else { y0 + step };
        let mid = (y0 + y1) / 2.0;
        let t = ((mid - baseline) / gradient_height).clamp(0.0, 1.0);
        let band_alpha = (alpha as f32 * (1.0 - t)).round() as u8;
        if band_alpha > 0 {
            out.push((
                ClipRect::new(interior.left, y0, interior.right, y1),
                band_alpha,
            ));
        }
    }
    out
}
