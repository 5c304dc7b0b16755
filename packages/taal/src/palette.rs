//! Colors.

use vek::*;


/// Convert a `0xRRGGBBAA` literal to a color.
pub fn hex_color(hex: u32) -> Rgba<f32> {
    Rgba {
        r: ((hex & 0xFF000000) >> 24) as f32 / 255.0,
        g: ((hex & 0x00FF0000) >> 16) as f32 / 255.0,
        b: ((hex & 0x0000FF00) >> 8) as f32 / 255.0,
        a: (hex & 0x000000FF) as f32 / 255.0,
    }
}

pub fn clear_color() -> Rgba<f32> {
    hex_color(0x1E1E1EFF)
}

pub fn grid_axis_color() -> Rgba<f32> {
    hex_color(0x00A000FF)
}

pub fn grid_line_color() -> Rgba<f32> {
    hex_color(0x323232FF)
}

pub fn greeting_color() -> Rgba<f32> {
    Rgba::white()
}

pub fn overlay_background_color() -> Rgba<f32> {
    hex_color(0x000000B4)
}

pub fn overlay_text_color() -> Rgba<f32> {
    hex_color(0xE6E6E6FF)
}

/// Colors a bol cell is drawn in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BolColors {
    pub background: Rgba<f32>,
    pub border: Rgba<f32>,
    pub text: Rgba<f32>,
}

impl BolColors {
    pub fn normal() -> Self {
        BolColors {
            // pakistan green
            background: hex_color(0x283618FF),
            // dark moss green
            border: hex_color(0x606C38FF),
            // cornsilk
            text: hex_color(0xFEFAE0FF),
        }
    }

    pub fn hovered() -> Self {
        BolColors {
            // earth yellow
            background: hex_color(0xBC6C25FF),
            // tiger's eye
            border: hex_color(0xDDA15EFF),
            // gold
            text: hex_color(0xFFD700FF),
        }
    }

    pub fn get(hovered: bool) -> Self {
        if hovered { BolColors::hovered() } else { BolColors::normal() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_splits_channels() {
        assert_eq!(hex_color(0xFF000080), Rgba::new(1.0, 0.0, 0.0, 128.0 / 255.0));
        assert_eq!(hex_color(0xFFFFFFFF), Rgba::white());
    }

    #[test]
    fn bol_colors_match_rgb_values() {
        let normal = BolColors::normal();
        assert_eq!(normal.background.map(|c| (c * 255.0).round() as u8), Rgba::new(40, 54, 24, 255));
        assert_eq!(BolColors::hovered().text.map(|c| (c * 255.0).round() as u8), Rgba::new(255, 215, 0, 255));
        assert_ne!(BolColors::get(true), BolColors::get(false));
    }
}
