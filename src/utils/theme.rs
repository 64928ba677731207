use crate::internal::chart::ChartColor;
use ratatui::style::Color;

/// Colors used by the terminal view. Two fixed variants, picked by the
/// persisted dark-mode flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub border: Color,
    pub accent: Color,
    pub score: Color,
    pub author: Color,
    pub success: Color,
    pub error: Color,
}

impl TuiTheme {
    pub fn light() -> Self {
        Self {
            background: parse_color("#fff1e5"),
            foreground: parse_color("#33302e"),
            muted: parse_color("#807973"),
            selection_bg: parse_color("#0d7680"),
            selection_fg: parse_color("#ffffff"),
            border: parse_color("#ccc1b7"),
            accent: parse_color("#0f5499"),
            score: parse_color("#990f3d"),
            author: parse_color("#0f5499"),
            success: parse_color("#09a25a"),
            error: parse_color("#cc0000"),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: parse_color("#262a33"),
            foreground: parse_color("#f2dfce"),
            muted: parse_color("#a7a59b"),
            selection_bg: parse_color("#3a7aa0"),
            selection_fg: parse_color("#ffffff"),
            border: parse_color("#4e5360"),
            accent: parse_color("#8bb8e8"),
            score: parse_color("#ff8833"),
            author: parse_color("#8bb8e8"),
            success: parse_color("#5ed39a"),
            error: parse_color("#ff7477"),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        match dark_mode {
            true => Self::dark(),
            false => Self::light(),
        }
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Parse a named color or `#rrggbb[aa]` hex string; alpha is ignored.
pub fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
            Color::Rgb(r, g, b)
        }
        _ => Color::Reset,
    }
}

pub fn chart_color(color: ChartColor) -> Color {
    let (r, g, b) = color.to_rgb();
    Color::Rgb(r, g, b)
}
