//! Batch chart report command
//!
//! Renders every combination of scoring formula and orientation for each
//! scouting export, four SVG files per input.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Args;
use scouting_core::scoring::{self, PocScoring, ScoringVariant};
use tracing::info;

use crate::{
    chart::{self, Orientation, ScoreChart},
    command::{self, plot},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    /// Paths to the scouting form CSV exports
    #[arg(required = true)]
    pub scouting_files: Vec<PathBuf>,

    /// Directory the charts are written to
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Chart title of each input, in order (defaults to the file stem)
    #[arg(long = "title")]
    pub titles: Vec<String>,

    /// Weight of the middle and top rocket levels in the poc charts
    #[arg(long, default_value_t = PocScoring::DEFAULT_DIFFICULTY_WEIGHT)]
    pub difficulty_weight: f64,
}

/// One chart of a report: file name suffix, formula and orientation.
const CHARTS: [(&str, ScoringVariant, Orientation); 4] = [
    ("", ScoringVariant::Baseline, Orientation::Horizontal),
    ("_vert", ScoringVariant::Baseline, Orientation::Vertical),
    ("_poc", ScoringVariant::Poc, Orientation::Horizontal),
    ("_vert_poc", ScoringVariant::Poc, Orientation::Vertical),
];

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let ReportArg {
        scouting_files,
        output_dir,
        titles,
        difficulty_weight,
    } = arg;

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    for (i, scouting_file) in scouting_files.iter().enumerate() {
        let title = titles
            .get(i)
            .cloned()
            .unwrap_or_else(|| util::file_stem(scouting_file));
        let written = write_report(scouting_file, output_dir, &title, *difficulty_weight)?;
        info!(
            "Wrote {} charts for {}",
            written.len(),
            scouting_file.display()
        );
    }
    Ok(())
}

/// Renders the four charts of one export and returns their paths.
fn write_report(
    scouting_file: &Path,
    output_dir: &Path,
    title: &str,
    difficulty_weight: f64,
) -> anyhow::Result<Vec<PathBuf>> {
    let teams = util::load_team_averages(scouting_file)?;
    let stem = util::file_stem(scouting_file);

    let mut written = Vec::with_capacity(CHARTS.len());
    for (suffix, variant, orientation) in CHARTS {
        let strategy = command::strategy(variant, difficulty_weight);
        let scores = scoring::compose(strategy.as_ref(), &teams);
        let title = chart::variant_title(title, variant);
        let chart = ScoreChart::new(&title, &scores, strategy.chart_components())
            .orientation(orientation);

        let path = output_dir.join(format!("{stem}{suffix}.svg"));
        let mut output = Output::open(&path)?;
        plot::write_chart(&mut output, &chart)?;
        written.push(path);
    }
    Ok(written)
}
