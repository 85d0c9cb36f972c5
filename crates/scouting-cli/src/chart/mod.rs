//! Stacked bar charts of team scores.
//!
//! [`ScoreChart`] describes one chart: the ranked teams, the score components
//! stacked in each bar and the orientation. It is drawn by three back ends:
//!
//! - the ratatui [`Widget`](ratatui::widgets::Widget) implementation, used by
//!   the interactive viewer
//! - [`render_text`], which draws the widget off screen and returns plain text
//! - [`render_svg`], which writes a standalone SVG document
//!
//! Horizontal charts list the best team at the top, vertical charts at the left.

use std::ops::Range;

use ratatui::style::Color;
use scouting_core::scoring::{ScoreComponent, ScoringVariant, TeamScore};

pub use self::{svg::render_svg, text::render_text};

mod svg;
mod text;
mod widget;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// How one stacked series is drawn by each back end.
#[derive(Debug, Clone, Copy)]
struct SeriesStyle {
    color: Color,
    svg_color: &'static str,
    /// Fill symbol, so that series stay distinguishable without colors.
    symbol: &'static str,
}

const SERIES_STYLES: [SeriesStyle; 6] = [
    SeriesStyle {
        color: Color::Rgb(0, 0, 255),
        svg_color: "blue",
        symbol: "█",
    },
    SeriesStyle {
        color: Color::Rgb(255, 0, 0),
        svg_color: "red",
        symbol: "▓",
    },
    SeriesStyle {
        color: Color::Rgb(255, 255, 0),
        svg_color: "yellow",
        symbol: "▒",
    },
    SeriesStyle {
        color: Color::Rgb(0, 255, 0),
        svg_color: "lime",
        symbol: "░",
    },
    SeriesStyle {
        color: Color::Rgb(255, 0, 255),
        svg_color: "magenta",
        symbol: "#",
    },
    SeriesStyle {
        color: Color::Rgb(140, 86, 75),
        svg_color: "#8c564b",
        symbol: "=",
    },
];

/// Chart title for a variant: the base title, suffixed for the poc formula.
pub fn variant_title(base: &str, variant: ScoringVariant) -> String {
    match variant {
        ScoringVariant::Baseline => base.to_owned(),
        ScoringVariant::Poc => format!("{base} (POC)"),
    }
}

fn series_style(index: usize) -> SeriesStyle {
    SERIES_STYLES[index % SERIES_STYLES.len()]
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreChart<'a> {
    title: &'a str,
    scores: &'a [TeamScore],
    components: &'a [ScoreComponent],
    orientation: Orientation,
    offset: usize,
}

impl<'a> ScoreChart<'a> {
    /// Chart of `scores` (already ranked) stacking `components` in order.
    pub fn new(title: &'a str, scores: &'a [TeamScore], components: &'a [ScoreComponent]) -> Self {
        Self {
            title,
            scores,
            components,
            orientation: Orientation::default(),
            offset: 0,
        }
    }

    #[must_use]
    pub fn orientation(self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self
        }
    }

    /// Skips the first `offset` teams.
    #[must_use]
    pub fn offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    fn visible_scores(&self) -> &'a [TeamScore] {
        self.scores.get(self.offset..).unwrap_or_default()
    }

    /// Stacked values of one team, negative values drawn as empty.
    fn stacked_values(&self, score: &TeamScore) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| score.components.value(*c).max(0.0))
            .collect()
    }

    /// Largest stacked bar over all teams, including scrolled-out ones, so that
    /// scrolling keeps the scale.
    fn max_stack(&self) -> f64 {
        self.scores
            .iter()
            .map(|s| self.stacked_values(s).iter().sum::<f64>())
            .fold(0.0, f64::max)
    }

    fn label_width(&self) -> usize {
        self.scores
            .iter()
            .map(|s| s.team.to_string().len())
            .max()
            .unwrap_or(0)
    }

    /// Size at which every team fits when rendered off screen.
    #[must_use]
    pub fn preferred_size(&self) -> (u16, u16) {
        let teams = u16::try_from(self.visible_scores().len()).unwrap_or(u16::MAX);
        match self.orientation {
            // borders + legend + one row per team
            Orientation::Horizontal => (100, teams.saturating_add(3)),
            Orientation::Vertical => {
                let column = u16::try_from(self.label_width().max(3) + 1).unwrap_or(u16::MAX);
                let width = teams.saturating_mul(column).saturating_add(2).max(60);
                (width, 30)
            }
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(value: f64, max: f64, length: u16) -> u16 {
    if max <= 0.0 {
        return 0;
    }
    ((value / max).clamp(0.0, 1.0) * f64::from(length)).round() as u16
}

/// Cell ranges of each stacked value in a bar of `length` cells.
///
/// Boundaries are rounded from cumulative sums, so segments never overlap and
/// rounding errors do not accumulate.
fn segments(values: &[f64], max: f64, length: u16) -> Vec<Range<u16>> {
    let mut cumulative = 0.0;
    let mut start = 0;
    values
        .iter()
        .map(|value| {
            cumulative += value.max(0.0);
            let end = scale(cumulative, max, length);
            let range = start..end;
            start = end;
            range
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_fill_proportionally() {
        let ranges = segments(&[1.0, 2.0, 1.0], 4.0, 40);
        assert_eq!(ranges, vec![0..10, 10..30, 30..40]);
    }

    #[test]
    fn test_segments_shorter_than_max() {
        let ranges = segments(&[1.0, 0.0, 1.0], 8.0, 40);
        assert_eq!(ranges, vec![0..5, 5..5, 5..10]);
    }

    #[test]
    fn test_segments_zero_max() {
        let ranges = segments(&[0.0, 0.0], 0.0, 40);
        assert!(ranges.iter().all(Range::is_empty));
    }

    #[test]
    fn test_segments_ignore_negative_values() {
        let ranges = segments(&[2.0, -1.0, 2.0], 4.0, 8);
        assert_eq!(ranges, vec![0..4, 4..4, 4..8]);
    }

    #[test]
    fn test_variant_title() {
        assert_eq!(variant_title("Week 1", ScoringVariant::Baseline), "Week 1");
        assert_eq!(variant_title("Week 1", ScoringVariant::Poc), "Week 1 (POC)");
    }

    #[test]
    fn test_orientation_toggle() {
        assert_eq!(Orientation::Horizontal.toggled(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.toggled(), Orientation::Horizontal);
    }
}
