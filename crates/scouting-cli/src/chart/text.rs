use ratatui::{
    prelude::{Buffer, Rect},
    widgets::Widget as _,
};

use super::ScoreChart;

/// Draws the chart into an off-screen buffer and returns it as plain text.
///
/// Colors are dropped; series remain distinguishable by their fill symbol.
/// Trailing whitespace is trimmed from every line.
pub fn render_text(chart: &ScoreChart<'_>) -> String {
    let (width, height) = chart.preferred_size();
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);

    let mut text = String::new();
    for y in area.top()..area.bottom() {
        let line = (area.left()..area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use scouting_core::{
        aggregate::TeamAverage,
        observation::{Metric, MetricSet, TeamId},
        scoring::{self, BaselineScoring, ScoringStrategy as _, TeamScore},
    };

    use super::*;
    use crate::chart::Orientation;

    fn ranked(climbs: &[(u32, f64)]) -> Vec<TeamScore> {
        let teams = climbs
            .iter()
            .map(|&(team, points)| {
                let average = TeamAverage {
                    team: TeamId(team),
                    matches: 1,
                    observations: 1,
                    metrics: MetricSet::ZERO.with(Metric::ClimbScore, points),
                };
                (TeamId(team), average)
            })
            .collect::<BTreeMap<_, _>>();
        scoring::compose(&BaselineScoring, &teams)
    }

    fn count(line: &str, symbol: char) -> usize {
        line.chars().filter(|c| *c == symbol).count()
    }

    #[test]
    fn test_horizontal_best_team_on_top() {
        let scores = ranked(&[(200, 3.0), (100, 12.0)]);
        let chart = ScoreChart::new("Week 1", &scores, BaselineScoring.chart_components());
        let text = render_text(&chart);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Week 1"));
        for label in ["HAB", "Hatch", "Cargo", "Climb"] {
            assert!(lines[1].contains(label), "{}", lines[1]);
        }
        assert!(lines[2].contains("100") && lines[2].contains("12.0"));
        assert!(lines[3].contains("200") && lines[3].contains("3.0"));

        // 100 columns - borders - label(3) - total(4) - gaps(2)
        assert_eq!(count(lines[2], '░'), 89);
        assert_eq!(count(lines[3], '░'), 22);
    }

    #[test]
    fn test_vertical_best_team_on_left() {
        let scores = ranked(&[(200, 3.0), (100, 12.0)]);
        let chart = ScoreChart::new("Week 1", &scores, BaselineScoring.chart_components())
            .orientation(Orientation::Vertical);
        let text = render_text(&chart);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 30);
        let labels = lines[28];
        let first = labels.find("100").unwrap();
        let second = labels.find("200").unwrap();
        assert!(first < second);

        // top plot row: only the best team reaches it
        let top = lines[2].chars().collect::<Vec<_>>();
        assert_eq!(&top[1..4], &['░', '░', '░']);
        assert_eq!(top[5], ' ');
    }

    #[test]
    fn test_offset_skips_teams() {
        let scores = ranked(&[(100, 12.0), (200, 6.0), (300, 3.0)]);
        let chart =
            ScoreChart::new("", &scores, BaselineScoring.chart_components()).offset(1);
        let text = render_text(&chart);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("200"));
        assert!(lines[3].contains("300"));
        // scale is kept from the full ranking
        assert!(count(lines[2], '░') < 89);
    }

    #[test]
    fn test_empty_ranking() {
        let chart = ScoreChart::new("Empty", &[], BaselineScoring.chart_components());
        let text = render_text(&chart);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Empty"));
    }
}
