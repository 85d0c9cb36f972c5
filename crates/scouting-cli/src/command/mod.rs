use clap::{Args, Parser, Subcommand};
use scouting_core::scoring::{PocScoring, ScoringStrategy, ScoringVariant};

use self::{
    export::ExportArg, plot::PlotArg, report::ReportArg, summary::SummaryArg, view::ViewArg,
};

mod export;
mod plot;
mod report;
mod summary;
mod view;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print the ranked team scores
    Summary(#[clap(flatten)] SummaryArg),
    /// Write the ranked team scores as JSON or CSV
    Export(#[clap(flatten)] ExportArg),
    /// Render a stacked bar chart as SVG or text
    Plot(#[clap(flatten)] PlotArg),
    /// Browse the chart in the terminal
    View(#[clap(flatten)] ViewArg),
    /// Render every chart of one or more events
    Report(#[clap(flatten)] ReportArg),
}

/// Scoring formula selection shared by the subcommands.
#[derive(Debug, Clone, Args)]
pub(crate) struct ScoringArg {
    /// Scoring formula (baseline or poc)
    #[arg(long, default_value = "baseline")]
    variant: ScoringVariant,
    /// Weight of the middle and top rocket levels in the poc formula
    #[arg(long, default_value_t = PocScoring::DEFAULT_DIFFICULTY_WEIGHT)]
    difficulty_weight: f64,
}

impl ScoringArg {
    pub(crate) fn variant(&self) -> ScoringVariant {
        self.variant
    }

    pub(crate) fn strategy(&self) -> Box<dyn ScoringStrategy> {
        strategy(self.variant, self.difficulty_weight)
    }

    /// Difficulty weight, when the selected formula uses one.
    pub(crate) fn difficulty_weight(&self) -> Option<f64> {
        (self.variant == ScoringVariant::Poc).then_some(self.difficulty_weight)
    }
}

pub(crate) fn strategy(variant: ScoringVariant, difficulty_weight: f64) -> Box<dyn ScoringStrategy> {
    match variant {
        ScoringVariant::Baseline => variant.strategy(),
        ScoringVariant::Poc => Box::new(PocScoring::new(difficulty_weight)),
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Export(arg) => export::run(&arg)?,
        Mode::Plot(arg) => plot::run(&arg)?,
        Mode::View(arg) => view::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
    }
    Ok(())
}
