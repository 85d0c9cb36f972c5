use std::ops::Range;

use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Buffer, Rect},
    style::{Style, Stylize as _},
    text::{Line, Span},
    widgets::{Block, Widget},
};
use scouting_core::scoring::TeamScore;

use super::{Orientation, ScoreChart, segments, series_style};

impl Widget for ScoreChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ScoreChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::bordered().title(Line::from(self.title).bold().centered());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        let [legend_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
        self.legend().render(legend_area, buf);
        match self.orientation {
            Orientation::Horizontal => self.render_horizontal(plot_area, buf),
            Orientation::Vertical => self.render_vertical(plot_area, buf),
        }
    }
}

impl ScoreChart<'_> {
    fn legend(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, component) in self.components.iter().enumerate() {
            let style = series_style(i);
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(style.symbol, Style::new().fg(style.color)));
            spans.push(Span::raw(format!(" {}", component.label())));
        }
        Line::from(spans)
    }

    fn bar(&self, score: &TeamScore, length: u16) -> Vec<Range<u16>> {
        segments(&self.stacked_values(score), self.max_stack(), length)
    }

    /// One row per team: `team | bar | total`.
    fn render_horizontal(&self, area: Rect, buf: &mut Buffer) {
        let label_width = u16::try_from(self.label_width()).unwrap_or(area.width);
        let value_width = self
            .scores
            .iter()
            .map(|s| format!("{:.1}", s.total).len())
            .max()
            .and_then(|w| u16::try_from(w).ok())
            .unwrap_or(0);
        let bar_x = area.x + label_width + 1;
        let bar_length = area.width.saturating_sub(label_width + value_width + 2);

        for (row, score) in self.visible_scores().iter().enumerate() {
            let Some(y) = u16::try_from(row).ok().filter(|r| *r < area.height) else {
                break;
            };
            let y = area.y + y;
            let label = format!(
                "{:>width$}",
                score.team.to_string(),
                width = usize::from(label_width)
            );
            buf.set_string(area.x, y, label, Style::new().bold());

            let mut bar_end = bar_x;
            for (i, range) in self.bar(score, bar_length).into_iter().enumerate() {
                let style = series_style(i);
                let cells = usize::from(range.end - range.start);
                buf.set_string(
                    bar_x + range.start,
                    y,
                    style.symbol.repeat(cells),
                    Style::new().fg(style.color),
                );
                bar_end = bar_x + range.end;
            }
            buf.set_string(bar_end + 1, y, format!("{:.1}", score.total), Style::new());
        }
    }

    /// One column per team, labels on the bottom row.
    fn render_vertical(&self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        let column_width = u16::try_from(self.label_width().max(3)).unwrap_or(area.width);
        let bar_height = area.height - 1;
        let label_y = area.y + bar_height;

        for (column, score) in self.visible_scores().iter().enumerate() {
            let Some(x) = u16::try_from(column)
                .ok()
                .and_then(|c| c.checked_mul(column_width + 1))
                .filter(|x| x + column_width <= area.width)
            else {
                break;
            };
            let x = area.x + x;

            for (i, range) in self.bar(score, bar_height).into_iter().enumerate() {
                let style = series_style(i);
                for level in range {
                    buf.set_string(
                        x,
                        label_y - 1 - level,
                        style.symbol.repeat(usize::from(column_width)),
                        Style::new().fg(style.color),
                    );
                }
            }
            let label = format!(
                "{:^width$}",
                score.team.to_string(),
                width = usize::from(column_width)
            );
            buf.set_string(x, label_y, label, Style::new().bold());
        }
    }
}
