use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat};
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::clip::Point;
use super::error::ScopeError;
use super::scene::{ChartScene, DrawOp, TextAlign};
use super::theme::Rgb;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn px((x, y): Point) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn anchor(align: TextAlign) -> Pos {
    let h = match align {
        TextAlign::Left => HPos::Left,
        TextAlign::Center => HPos::Center,
        TextAlign::Right => HPos::Right,
    };
    Pos::new(h, VPos::Bottom)
}

/// Bytes in a packed RGB8 frame.
pub fn frame_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Paints a composed scene into a packed RGB8 framebuffer.
pub fn render_frame_rgb(scene: &ChartScene) -> Result<Vec<u8>, ScopeError> {
    let (width, height) = (scene.canvas.width, scene.canvas.height);
    if width == 0 || height == 0 {
        return Err(ScopeError::Plot(format!("canvas {width}x{height} has no pixels")));
    }
    let mut buffer = vec![0u8; frame_len(width, height)];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        for item in &scene.items {
            match &item.op {
                DrawOp::Fill { color } => root.fill(&rgb(*color))?,
                DrawOp::Rect {
                    top_left,
                    bottom_right,
                    color,
                } => root.draw(&Rectangle::new(
                    [px(*top_left), px(*bottom_right)],
                    rgb(*color).filled(),
                ))?,
                DrawOp::Line {
                    from,
                    to,
                    color,
                    width,
                } => root.draw(&PathElement::new(
                    vec![px(*from), px(*to)],
                    rgb(*color).stroke_width(*width),
                ))?,
                DrawOp::Polyline {
                    points,
                    color,
                    width,
                } => root.draw(&PathElement::new(
                    points.iter().copied().map(px).collect::<Vec<_>>(),
                    rgb(*color).stroke_width(*width),
                ))?,
                DrawOp::Polygon {
                    points,
                    color,
                    alpha,
                } => root.draw(&Polygon::new(
                    points.iter().copied().map(px).collect::<Vec<_>>(),
                    rgb(*color).mix(*alpha as f64 / 255.0).filled(),
                ))?,
                DrawOp::Text {
                    text,
                    at,
                    size,
                    color,
                    align,
                } => {
                    let style = ("sans-serif", *size as f64)
                        .into_font()
                        .color(&rgb(*color))
                        .pos(anchor(*align));
                    // Missing system fonts only cost the labels, not the frame.
                    if let Err(e) = root.draw(&Text::new(text.as_str(), px(*at), style)) {
                        debug!("skipped label {text:?}: {e:?}");
                    }
                }
            }
        }
        root.present()?;
    }
    Ok(buffer)
}

pub fn render_png(scene: &ChartScene) -> Result<Vec<u8>, ScopeError> {
    let buffer = render_frame_rgb(scene)?;
    encode_png(buffer, scene.canvas.width, scene.canvas.height)
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<image::Rgb<u8>, _>::from_raw(width, height, buffer)
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::buffer::TelemetryBuffer;
    use crate::scope::range::SensorKind;
    use crate::scope::scene::Canvas;
    use crate::scope::theme::ChartStyle;
    use crate::scope::viewport::ViewportState;

    // Text needs system fonts, which headless CI images may lack.
    fn scene_without_text(style: &ChartStyle) -> ChartScene {
        let mut buffer = TelemetryBuffer::with_capacity(100);
        for i in 0..100u64 {
            buffer.append(5.0, -5.0, 0.0, i * 10);
        }
        let mut scene = ChartScene::compose(
            &buffer.snapshot(),
            ViewportState::default(),
            SensorKind::Gyroscope,
            style,
            Canvas::new(1160, 660),
        );
        scene
            .items
            .retain(|item| !matches!(item.op, DrawOp::Text { .. }));
        scene
    }

    fn pixel(frame: &[u8], width: u32, (x, y): (u32, u32)) -> [u8; 3] {
        let i = ((y * width + x) * 3) as usize;
        [frame[i], frame[i + 1], frame[i + 2]]
    }

    #[test]
    fn frame_paints_background_line_and_fill() {
        let scene = scene_without_text(&ChartStyle::default());
        let frame = render_frame_rgb(&scene).unwrap();
        assert_eq!(frame.len(), 1160 * 660 * 3);
        assert_eq!(pixel(&frame, 1160, (5, 5)), [255, 255, 255]);
        // X is pinned at 5.0 of [-10, 10]: y = 80 + 500 - 0.75 * 500.
        let line = pixel(&frame, 1160, (500, 205));
        assert!(line[0] > 200 && line[1] < 150 && line[2] < 150, "{line:?}");
        let fill = pixel(&frame, 1160, (500, 300));
        assert!(fill[1] < 255 && fill[0] > fill[1], "{fill:?}");
    }

    #[test]
    fn dark_theme_changes_background() {
        let style = ChartStyle {
            dark_mode: true,
            ..ChartStyle::default()
        };
        let frame = render_frame_rgb(&scene_without_text(&style)).unwrap();
        assert_eq!(pixel(&frame, 1160, (5, 5)), [0x12, 0x12, 0x12]);
    }

    #[test]
    fn png_output_is_encoded() {
        let png = render_png(&scene_without_text(&ChartStyle::default())).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn frame_len_does_not_wrap_for_large_canvases() {
        assert_eq!(frame_len(40_000, 40_000), 4_800_000_000);
        assert_eq!(frame_len(1160, 660), 1160 * 660 * 3);
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let mut scene = scene_without_text(&ChartStyle::default());
        scene.canvas = Canvas::new(0, 0);
        assert!(matches!(render_frame_rgb(&scene), Err(ScopeError::Plot(_))));
    }
}
