use serde::{Deserialize, Serialize};

use super::buffer::Channel;

/// 24-bit color, written as `#RRGGBB` in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb(byte(0)?, byte(2)?, byte(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("expected #RRGGBB color, got {value:?}"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
pub const LIGHT_GRAY: Rgb = Rgb(0xCC, 0xCC, 0xCC);
pub const DARK_GRAY: Rgb = Rgb(0x44, 0x44, 0x44);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelStyle {
    pub color: Rgb,
    pub stroke_width: u32,
    /// Opacity of the area fill at the zero line, 0-255.
    pub fill_alpha: u8,
}

impl ChannelStyle {
    pub const fn new(color: Rgb) -> Self {
        Self {
            color,
            stroke_width: 4,
            fill_alpha: 70,
        }
    }
}

/// Non-data colors; the only thing dark mode changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub background: Rgb,
    pub text: Rgb,
    pub grid: Rgb,
    pub zero_line: Rgb,
    pub title_shadow: Rgb,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: WHITE,
            text: DARK_GRAY,
            grid: LIGHT_GRAY,
            zero_line: DARK_GRAY,
            title_shadow: LIGHT_GRAY,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Rgb(0x12, 0x12, 0x12),
            text: LIGHT_GRAY,
            grid: Rgb(0x33, 0x33, 0x33),
            zero_line: Rgb(0x77, 0x77, 0x77),
            title_shadow: BLACK,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Fixed chart geometry. Defaults reproduce the reference layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub padding: f32,
    pub text_size: u32,
    pub horizontal_divisions: usize,
    pub vertical_divisions: usize,
    pub dash_on: f32,
    pub dash_off: f32,
    pub grid_width: u32,
    pub zero_line_width: u32,
    pub legend_inset: f32,
    pub legend_spacing: f32,
    pub legend_swatch: f32,
    pub gradient_bands: usize,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            padding: 80.0,
            text_size: 36,
            horizontal_divisions: 10,
            vertical_divisions: 5,
            dash_on: 5.0,
            dash_off: 5.0,
            grid_width: 1,
            zero_line_width: 2,
            legend_inset: 250.0,
            legend_spacing: 40.0,
            legend_swatch: 20.0,
            gradient_bands: 24,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    pub dark_mode: bool,
    pub channels: [ChannelStyle; 3],
    pub layout: ChartLayout,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dark_mode: false,
            channels: [
                ChannelStyle::new(Rgb(0xFF, 0x52, 0x52)),
                ChannelStyle::new(Rgb(0x4C, 0xAF, 0x50)),
                ChannelStyle::new(Rgb(0x21, 0x96, 0xF3)),
            ],
            layout: ChartLayout::default(),
        }
    }
}

impl ChartStyle {
    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode)
    }

    pub fn channel(&self, channel: Channel) -> &ChannelStyle {
        &self.channels[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_and_print() {
        assert_eq!(Rgb::from_hex("#FF5252"), Some(Rgb(0xFF, 0x52, 0x52)));
        assert_eq!(Rgb::from_hex("#2196f3"), Some(Rgb(0x21, 0x96, 0xF3)));
        assert_eq!(Rgb::from_hex("FF5252"), None);
        assert_eq!(Rgb::from_hex("#FF52"), None);
        assert_eq!(Rgb(0x12, 0x12, 0x12).to_hex(), "#121212");
    }

    #[test]
    fn dark_mode_keeps_channel_colors() {
        let light = ChartStyle::default();
        let dark = ChartStyle {
            dark_mode: true,
            ..ChartStyle::default()
        };
        assert_ne!(light.theme().background, dark.theme().background);
        assert_ne!(light.theme().grid, dark.theme().grid);
        assert_eq!(light.channels, dark.channels);
    }
}
