use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, ValueEnum};
use scouting_core::scoring::{self, TeamScore};
use tracing::info;

use crate::{
    command::ScoringArg,
    schema::score_report::{self, ScoreReport},
    util::{self, Output},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportArg {
    /// Path to the scouting form CSV export
    pub scouting_file: PathBuf,

    #[clap(flatten)]
    pub scoring: ScoringArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Output file path (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportArg) -> anyhow::Result<()> {
    let ExportArg {
        scouting_file,
        scoring,
        format,
        output,
    } = arg;

    let teams = util::load_team_averages(scouting_file)?;
    let strategy = scoring.strategy();
    let scores = scoring::compose(strategy.as_ref(), &teams);

    let mut output = Output::from_output_path(output.as_deref())?;
    write_scores(&mut output, *format, arg, scores)?;
    info!("Scores written to {}", output.display_path());
    Ok(())
}

fn write_scores(
    output: &mut Output,
    format: ExportFormat,
    arg: &ExportArg,
    scores: Vec<TeamScore>,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Json => {
            let report = ScoreReport {
                generated_at: Utc::now(),
                source: arg.scouting_file.display().to_string(),
                variant: arg.scoring.variant().to_string(),
                difficulty_weight: arg.scoring.difficulty_weight(),
                teams: scores,
            };
            output.write_json(&report)
        }
        ExportFormat::Csv => score_report::write_scores_csv(output, &scores),
    }
}
