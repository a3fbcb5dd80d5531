use ratatui::style::Color;

use crate::model::config::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub column_border: Color,
    pub drop_target: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub count: Color,
    pub badge: Color,
    pub offline: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x60, 0x60, 0x78),
            highlight: Color::Rgb(0x41, 0xA6, 0xFB),
            column_border: Color::Rgb(0x3A, 0x3A, 0x52),
            drop_target: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x22, 0x2A, 0x40),
            selection_border: Color::Rgb(0x41, 0xA6, 0xFB),
            count: Color::Rgb(0x9A, 0x9A, 0xB4),
            badge: Color::Rgb(0xFF, 0xD7, 0x00),
            offline: Color::Rgb(0xFF, 0xA5, 0x00),
            error: Color::Rgb(0xFF, 0x44, 0x44),
            info: Color::Rgb(0x44, 0xDD, 0xFF),
        }
    }
}

impl Theme {
    /// Build the theme, applying `[ui] colors` overrides by slot name.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, hex) in &ui.colors {
            let Some(color) = parse_hex(hex) else {
                log::warn!("ignoring invalid color {hex:?} for {name:?}");
                continue;
            };
            match name.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "dim" => theme.dim = color,
                "highlight" => theme.highlight = color,
                "column_border" => theme.column_border = color,
                "drop_target" => theme.drop_target = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "count" => theme.count = color,
                "badge" => theme.badge = color,
                "offline" => theme.offline = color,
                "error" => theme.error = color,
                "info" => theme.info = color,
                _ => log::warn!("unknown theme slot {name:?}"),
            }
        }
        theme
    }
}

/// Parse `#RRGGBB` (leading `#` optional).
fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
