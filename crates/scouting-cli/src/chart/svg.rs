use std::fmt::{self, Write as _};

use super::{Orientation, ScoreChart, series_style};

const FONT: &str = "font-family=\"sans-serif\" font-size=\"12\"";

// horizontal layout
const H_WIDTH: f64 = 1000.0;
const H_ROW: f64 = 22.0;
const H_LEFT: f64 = 70.0;
const H_RIGHT: f64 = 60.0;

// vertical layout
const V_COLUMN: f64 = 36.0;
const V_MIN_WIDTH: f64 = 640.0;
const V_PLOT_HEIGHT: f64 = 480.0;
const V_LEFT: f64 = 60.0;
const V_RIGHT: f64 = 20.0;

const TOP: f64 = 70.0;
const BOTTOM: f64 = 50.0;

/// Writes the chart as a standalone SVG document.
///
/// Every team is a `<g>` holding one `<rect>` per stacked component.
pub fn render_svg(chart: &ScoreChart<'_>) -> Result<String, fmt::Error> {
    let max = chart.max_stack();
    let axis_max = if max > 0.0 {
        (max / tick_step(max)).ceil() * tick_step(max)
    } else {
        1.0
    };

    let mut svg = String::new();
    let (width, height) = match chart.orientation {
        Orientation::Horizontal => (H_WIDTH, TOP + row_count(chart) * H_ROW + BOTTOM),
        Orientation::Vertical => (
            (V_LEFT + row_count(chart) * V_COLUMN + V_RIGHT).max(V_MIN_WIDTH),
            TOP + V_PLOT_HEIGHT + BOTTOM,
        ),
    };
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="white"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{x}" y="24" text-anchor="middle" font-family="sans-serif" font-size="18">{title}</text>"#,
        x = width / 2.0,
        title = escape(chart.title),
    )?;
    write_legend(&mut svg, chart)?;

    match chart.orientation {
        Orientation::Horizontal => write_horizontal(&mut svg, chart, axis_max)?,
        Orientation::Vertical => write_vertical(&mut svg, chart, axis_max)?,
    }
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

#[expect(clippy::cast_precision_loss)]
fn row_count(chart: &ScoreChart<'_>) -> f64 {
    chart.visible_scores().len() as f64
}

fn write_legend(svg: &mut String, chart: &ScoreChart<'_>) -> fmt::Result {
    let mut x = 20.0;
    for (i, component) in chart.components.iter().enumerate() {
        let style = series_style(i);
        writeln!(
            svg,
            r#"<rect x="{x}" y="38" width="12" height="12" fill="{}"/>"#,
            style.svg_color
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="48" {FONT}>{}</text>"#,
            x + 16.0,
            component.label()
        )?;
        x += 100.0;
    }
    Ok(())
}

fn write_horizontal(svg: &mut String, chart: &ScoreChart<'_>, axis_max: f64) -> fmt::Result {
    let plot_width = H_WIDTH - H_LEFT - H_RIGHT;
    let plot_bottom = TOP + row_count(chart) * H_ROW;
    let scale = plot_width / axis_max;

    for tick in ticks(axis_max) {
        let x = H_LEFT + tick * scale;
        writeln!(
            svg,
            r##"<line x1="{x}" y1="{TOP}" x2="{x}" y2="{plot_bottom}" stroke="#dddddd"/>"##
        )?;
        writeln!(
            svg,
            r#"<text x="{x}" y="{}" text-anchor="middle" {FONT}>{tick}</text>"#,
            plot_bottom + 16.0
        )?;
    }

    let mut y = TOP;
    for score in chart.visible_scores() {
        writeln!(svg, r#"<g class="team" data-team="{}">"#, score.team)?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" {FONT}>{}</text>"#,
            H_LEFT - 6.0,
            y + H_ROW * 0.7,
            score.team
        )?;
        let mut x = H_LEFT;
        for (i, value) in chart.stacked_values(score).into_iter().enumerate() {
            let length = value * scale;
            writeln!(
                svg,
                r#"<rect x="{x}" y="{}" width="{length}" height="{}" fill="{}"/>"#,
                y + 2.0,
                H_ROW - 4.0,
                series_style(i).svg_color
            )?;
            x += length;
        }
        writeln!(
            svg,
            r#"<text x="{}" y="{}" {FONT}>{:.1}</text>"#,
            x + 4.0,
            y + H_ROW * 0.7,
            score.total
        )?;
        writeln!(svg, "</g>")?;
        y += H_ROW;
    }

    writeln!(
        svg,
        r#"<line x1="{H_LEFT}" y1="{TOP}" x2="{H_LEFT}" y2="{plot_bottom}" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<line x1="{H_LEFT}" y1="{plot_bottom}" x2="{}" y2="{plot_bottom}" stroke="black"/>"#,
        H_LEFT + plot_width
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" {FONT}>Score</text>"#,
        H_LEFT + plot_width / 2.0,
        plot_bottom + 36.0
    )
}

fn write_vertical(svg: &mut String, chart: &ScoreChart<'_>, axis_max: f64) -> fmt::Result {
    let plot_bottom = TOP + V_PLOT_HEIGHT;
    let plot_right = V_LEFT + row_count(chart) * V_COLUMN;
    let scale = V_PLOT_HEIGHT / axis_max;

    for tick in ticks(axis_max) {
        let y = plot_bottom - tick * scale;
        writeln!(
            svg,
            r##"<line x1="{V_LEFT}" y1="{y}" x2="{plot_right}" y2="{y}" stroke="#dddddd"/>"##
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" {FONT}>{tick}</text>"#,
            V_LEFT - 6.0,
            y + 4.0
        )?;
    }

    let mut x = V_LEFT;
    for score in chart.visible_scores() {
        writeln!(svg, r#"<g class="team" data-team="{}">"#, score.team)?;
        let mut y = plot_bottom;
        for (i, value) in chart.stacked_values(score).into_iter().enumerate() {
            let length = value * scale;
            y -= length;
            writeln!(
                svg,
                r#"<rect x="{}" y="{y}" width="{}" height="{length}" fill="{}"/>"#,
                x + 2.0,
                V_COLUMN - 4.0,
                series_style(i).svg_color
            )?;
        }
        let label_x = x + V_COLUMN / 2.0;
        let label_y = plot_bottom + 14.0;
        writeln!(
            svg,
            r#"<text x="{label_x}" y="{label_y}" text-anchor="end" transform="rotate(-45 {label_x} {label_y})" {FONT}>{}</text>"#,
            score.team
        )?;
        writeln!(svg, "</g>")?;
        x += V_COLUMN;
    }

    writeln!(
        svg,
        r#"<line x1="{V_LEFT}" y1="{TOP}" x2="{V_LEFT}" y2="{plot_bottom}" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<line x1="{V_LEFT}" y1="{plot_bottom}" x2="{plot_right}" y2="{plot_bottom}" stroke="black"/>"#
    )
}

/// Axis step of 1, 2 or 5 times a power of ten, giving about five ticks.
fn tick_step(max: f64) -> f64 {
    let rough = max / 5.0;
    let magnitude = 10_f64.powf(rough.log10().floor());
    let normalized = rough / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn ticks(axis_max: f64) -> impl Iterator<Item = f64> {
    let step = tick_step(axis_max);
    (0_u32..)
        .map(move |i| f64::from(i) * step)
        .take_while(move |tick| *tick <= axis_max + step * 1e-9)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_float_eq::*;
    use scouting_core::{
        aggregate::TeamAverage,
        observation::{Metric, MetricSet, TeamId},
        scoring::{self, PocScoring, ScoringStrategy as _, TeamScore},
    };

    use super::*;

    fn ranked() -> Vec<TeamScore> {
        let teams = [
            (100, MetricSet::ZERO.with(Metric::ClimbScore, 12.0)),
            (
                200,
                MetricSet::ZERO
                    .with(Metric::HabLine, 1.0)
                    .with(Metric::Fouls, 2.0),
            ),
            (300, MetricSet::ZERO.with(Metric::CargoCargoBay, 1.0)),
        ]
        .into_iter()
        .map(|(team, metrics)| {
            let average = TeamAverage {
                team: TeamId(team),
                matches: 1,
                observations: 1,
                metrics,
            };
            (TeamId(team), average)
        })
        .collect::<BTreeMap<_, _>>();
        scoring::compose(&PocScoring::default(), &teams)
    }

    #[test]
    fn test_one_group_per_team_in_rank_order() {
        let scores = ranked();
        let strategy = PocScoring::default();
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let chart = ScoreChart::new("Week <1> & 2", &scores, strategy.chart_components())
                .orientation(orientation);
            let svg = render_svg(&chart).unwrap();

            assert!(svg.starts_with("<svg "));
            assert!(svg.trim_end().ends_with("</svg>"));
            assert!(svg.contains("Week &lt;1&gt; &amp; 2"));
            assert_eq!(svg.matches(r#"<g class="team""#).count(), 3);

            let positions = scores
                .iter()
                .map(|s| svg.find(&format!(r#"data-team="{}""#, s.team)).unwrap())
                .collect::<Vec<_>>();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));

            for color in ["blue", "red", "yellow", "lime", "magenta", "#8c564b"] {
                assert!(svg.contains(&format!(r#"fill="{color}""#)), "{color}");
            }
        }
    }

    #[test]
    fn test_empty_chart_is_valid() {
        let chart = ScoreChart::new("Empty", &[], PocScoring::default().chart_components());
        let svg = render_svg(&chart).unwrap();
        assert!(svg.contains("Empty"));
        assert_eq!(svg.matches("<g ").count(), 0);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_tick_step() {
        assert_float_absolute_eq!(5.0, tick_step(24.0));
        assert_float_absolute_eq!(10.0, tick_step(48.0));
        assert_float_absolute_eq!(20.0, tick_step(100.0));
    }

    #[test]
    fn test_ticks_cover_axis() {
        let ticks = ticks(25.0).collect::<Vec<_>>();
        assert_eq!(ticks, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }
}
