use std::{collections::BTreeMap, path::PathBuf};

use clap::Args;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Style, Stylize as _},
    text::Line,
};
use scouting_core::{
    aggregate::TeamAverage,
    observation::TeamId,
    scoring::{self, ScoringStrategy, ScoringVariant, TeamScore},
};

use crate::{
    chart::{self, Orientation, ScoreChart},
    command::{self, ScoringArg},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ViewArg {
    /// Path to the scouting form CSV export
    pub scouting_file: PathBuf,

    #[clap(flatten)]
    pub scoring: ScoringArg,

    /// Chart title (defaults to the file stem)
    #[arg(long)]
    pub title: Option<String>,
}

pub(crate) fn run(arg: &ViewArg) -> anyhow::Result<()> {
    let ViewArg {
        scouting_file,
        scoring,
        title,
    } = arg;

    let teams = util::load_team_averages(scouting_file)?;
    let title = title
        .clone()
        .unwrap_or_else(|| util::file_stem(scouting_file));
    let mut app = ViewApp::new(title, teams, scoring);

    ratatui::run(|terminal| app.run(terminal))?;
    Ok(())
}

#[derive(Debug)]
struct ViewApp {
    title: String,
    teams: BTreeMap<TeamId, TeamAverage>,
    difficulty_weight: f64,
    strategy: Box<dyn ScoringStrategy>,
    scores: Vec<TeamScore>,
    orientation: Orientation,
    offset: usize,
    exiting: bool,
}

impl ViewApp {
    fn new(title: String, teams: BTreeMap<TeamId, TeamAverage>, scoring: &ScoringArg) -> Self {
        let strategy = scoring.strategy();
        let scores = scoring::compose(strategy.as_ref(), &teams);
        Self {
            title,
            teams,
            difficulty_weight: scoring.difficulty_weight,
            strategy,
            scores,
            orientation: Orientation::default(),
            offset: 0,
            exiting: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.exiting {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let title = chart::variant_title(&self.title, self.strategy.variant());
        let chart = ScoreChart::new(&title, &self.scores, self.strategy.chart_components())
            .orientation(self.orientation)
            .offset(self.offset);
        frame.render_widget(chart, chart_area);

        let help = Line::from(" o: orientation | v: variant | Up/Down: scroll | q: quit")
            .style(Style::new().dim());
        frame.render_widget(help, help_area);
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
            KeyCode::Char('o') => self.orientation = self.orientation.toggled(),
            KeyCode::Char('v') => self.toggle_variant(),
            KeyCode::Up => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down => {
                if self.offset + 1 < self.scores.len() {
                    self.offset += 1;
                }
            }
            _ => {}
        }
    }

    fn toggle_variant(&mut self) {
        let next = match self.strategy.variant() {
            ScoringVariant::Baseline => ScoringVariant::Poc,
            ScoringVariant::Poc => ScoringVariant::Baseline,
        };
        self.strategy = command::strategy(next, self.difficulty_weight);
        self.scores = scoring::compose(self.strategy.as_ref(), &self.teams);
    }
}
