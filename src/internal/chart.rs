//! Category share chart data.
//!
//! The stats modal shows how stories are spread over categories. This module
//! reduces the raw `(name, count)` list to a bounded set of slices and hands
//! the result to a [`ChartRenderer`], so the reduction never depends on how
//! the chart is eventually drawn.

use crate::internal::models::Category;
use std::fmt;

/// Label of the slice that collects the long tail of small categories.
pub const OTHER_LABEL: &str = "Other";

const OTHER_COLOR: ChartColor = ChartColor::Hex("#b8b4b0");

/// Minimum share (in percent) for a category outside the palette to get its own slice.
const MIN_SHARE_PERCENT: i64 = 2;

/// Fixed slice colors for well-known categories.
pub const CATEGORY_PALETTE: [(&str, &str); 16] = [
    ("Programming", "#9e2f50"),
    ("AI & ML", "#0d7680"),
    ("Web Development", "#7ebfcc"),
    ("Startups", "#f2dfce"),
    ("Security", "#b8b4b0"),
    ("DevOps", "#69404b"),
    ("Data", "#cceeee"),
    ("Ask HN", "#ffb81c"),
    ("Show HN", "#59334c"),
    ("Science & Research", "#a6806a"),
    ("Crypto & Web3", "#777777"),
    ("Mobile Dev", "#e9decf"),
    ("Hardware", "#d4ac87"),
    ("Design & UX", "#8b9ba5"),
    ("Jobs & Careers", "#f7a481"),
    ("Tech Companies", "#3d5a5f"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartColor {
    Hex(&'static str),
    /// Hue in degrees, saturation and lightness in percent.
    Hsl { h: u16, s: u8, l: u8 },
}

impl ChartColor {
    /// RGB components, for renderers that cannot take CSS colors.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            ChartColor::Hex(hex) => {
                let hex = hex.trim_start_matches('#');
                let channel = |i: usize| {
                    hex.get(i..i + 2)
                        .and_then(|s| u8::from_str_radix(s, 16).ok())
                        .unwrap_or(0)
                };
                (channel(0), channel(2), channel(4))
            }
            ChartColor::Hsl { h, s, l } => hsl_to_rgb(h as f64, s as f64 / 100.0, l as f64 / 100.0),
        }
    }
}

impl fmt::Display for ChartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartColor::Hex(hex) => write!(f, "{}", hex),
            ChartColor::Hsl { h, s, l } => write!(f, "hsl({}, {}%, {}%)", h, s, l),
        }
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}

/// 31-multiplier rolling hash over UTF-16 code units, wrapping at 32 bits.
fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Stable color for a category: palette entry if named, otherwise a muted
/// color derived from the name.
pub fn category_color(name: &str) -> ChartColor {
    if let Some((_, hex)) = CATEGORY_PALETTE.iter().find(|(key, _)| *key == name) {
        return ChartColor::Hex(*hex);
    }

    let hash = name_hash(name);
    ChartColor::Hsl {
        h: hash.rem_euclid(360) as u16,
        s: 30 + hash.rem_euclid(20) as u8,
        l: 65 + hash.rem_euclid(15) as u8,
    }
}

fn in_palette(name: &str) -> bool {
    CATEGORY_PALETTE.iter().any(|(key, _)| *key == name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: i64,
    pub color: ChartColor,
}

/// Reduced chart input: one entry per plotted slice plus the grand total.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DonutData {
    pub slices: Vec<ChartSlice>,
    pub total: i64,
}

impl DonutData {
    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.slices.iter().map(|s| s.value).collect()
    }

    pub fn colors(&self) -> Vec<ChartColor> {
        self.slices.iter().map(|s| s.color).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Share of the total in percent.
    pub fn percentage(&self, value: i64) -> f64 {
        match self.total {
            0 => 0.0,
            total => value as f64 / total as f64 * 100.0,
        }
    }

    /// Legend text, e.g. "Programming: 50 stories (82.0%)".
    pub fn legend_label(&self, slice: &ChartSlice) -> String {
        format!(
            "{}: {} stories ({:.1}%)",
            slice.label,
            slice.value,
            self.percentage(slice.value)
        )
    }
}

/// Reduce category counts to chart slices.
///
/// Slices are ordered by descending count. Palette categories and those holding
/// at least 2% of all stories are plotted individually; everything else is
/// summed into a trailing "Other" slice, which is omitted when empty.
pub fn reduce_categories(categories: &[Category]) -> DonutData {
    let total: i64 = categories.iter().map(|c| c.count.max(0)).sum();

    let mut sorted: Vec<&Category> = categories.iter().filter(|c| c.count > 0).collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    let mut slices = Vec::new();
    let mut other = 0i64;

    for cat in sorted {
        match in_palette(&cat.name) || cat.count * 100 >= total * MIN_SHARE_PERCENT {
            true => slices.push(ChartSlice {
                label: cat.name.clone(),
                value: cat.count,
                color: category_color(&cat.name),
            }),
            false => other += cat.count,
        }
    }

    if other > 0 {
        slices.push(ChartSlice {
            label: OTHER_LABEL.to_string(),
            value: other,
            color: OTHER_COLOR,
        });
    }

    DonutData { slices, total }
}

/// Anything that can present reduced chart data.
pub trait ChartRenderer {
    type Output;

    fn render(&self, data: &DonutData) -> Self::Output;
}

/// Plain-text legend, one line per slice.
pub struct LegendText;

impl ChartRenderer for LegendText {
    type Output = Vec<String>;

    fn render(&self, data: &DonutData) -> Vec<String> {
        data.slices.iter().map(|s| data.legend_label(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_unnamed_categories_fold_into_other() {
        let cats = vec![
            Category::new("Programming", 50),
            Category::new("Ask HN", 10),
            Category::new("Obscure", 1),
        ];
        let data = reduce_categories(&cats);
        assert_eq!(data.total, 61);
        assert_eq!(data.labels(), vec!["Programming", "Ask HN", "Other"]);
        assert_eq!(data.values(), vec![50, 10, 1]);
    }

    #[test]
    fn palette_categories_always_plotted() {
        let mut cats: Vec<Category> = (0..10)
            .map(|i| Category::new(format!("Big{}", i), 100))
            .collect();
        cats.push(Category::new("Hardware", 1));
        let data = reduce_categories(&cats);
        assert!(data.labels().contains(&"Hardware"));
        assert!(!data.labels().contains(&OTHER_LABEL));
    }

    #[test]
    fn share_threshold_is_inclusive() {
        // 2 of 100 is exactly 2%
        let cats = vec![Category::new("Niche", 2), Category::new("Bulk", 98)];
        let data = reduce_categories(&cats);
        assert_eq!(data.labels(), vec!["Bulk", "Niche"]);
    }

    #[test]
    fn no_other_slice_when_nothing_folds() {
        let data = reduce_categories(&[Category::new("Security", 3)]);
        assert_eq!(data.labels(), vec!["Security"]);
    }

    #[test]
    fn empty_input_yields_empty_chart() {
        let data = reduce_categories(&[]);
        assert!(data.is_empty());
        assert_eq!(data.total, 0);
        assert_eq!(data.percentage(5), 0.0);
    }

    #[test]
    fn palette_and_hashed_colors() {
        assert_eq!(category_color("Ask HN"), ChartColor::Hex("#ffb81c"));
        assert_eq!(category_color("Ask HN").to_rgb(), (0xff, 0xb8, 0x1c));

        let first = category_color("Gardening");
        assert_eq!(first, category_color("Gardening"));
        match first {
            ChartColor::Hsl { h, s, l } => {
                assert!(h < 360);
                assert!((30..50).contains(&s));
                assert!((65..80).contains(&l));
            }
            other => panic!("expected hashed color, got {}", other),
        }
    }

    #[test]
    fn name_hash_matches_reference_values() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn hsl_conversion_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
    }

    #[test]
    fn legend_text_renderer() {
        let cats = vec![Category::new("Programming", 3), Category::new("Data", 1)];
        let lines = LegendText.render(&reduce_categories(&cats));
        assert_eq!(
            lines,
            vec![
                "Programming: 3 stories (75.0%)".to_string(),
                "Data: 1 stories (25.0%)".to_string(),
            ]
        );
    }

    #[test]
    fn css_formatting() {
        assert_eq!(ChartColor::Hex("#777777").to_string(), "#777777");
        assert_eq!(
            ChartColor::Hsl { h: 10, s: 35, l: 70 }.to_string(),
            "hsl(10, 35%, 70%)"
        );
    }
}
