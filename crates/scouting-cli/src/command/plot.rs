use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use scouting_core::scoring;
use tracing::info;

use crate::{
    chart::{self, Orientation, ScoreChart},
    command::ScoringArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct PlotArg {
    /// Path to the scouting form CSV export
    pub scouting_file: PathBuf,

    #[clap(flatten)]
    pub scoring: ScoringArg,

    /// Draw one column per team instead of one row
    #[arg(long)]
    pub vertical: bool,

    /// Chart title (defaults to the file stem)
    #[arg(long)]
    pub title: Option<String>,

    /// Output file path; `.svg` writes SVG, anything else text (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlotArg) -> anyhow::Result<()> {
    let PlotArg {
        scouting_file,
        scoring,
        vertical,
        title,
        output,
    } = arg;

    let teams = util::load_team_averages(scouting_file)?;
    let strategy = scoring.strategy();
    let scores = scoring::compose(strategy.as_ref(), &teams);

    let title = title.clone().unwrap_or_else(|| {
        chart::variant_title(&util::file_stem(scouting_file), strategy.variant())
    });
    let orientation = if *vertical {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    };
    let chart =
        ScoreChart::new(&title, &scores, strategy.chart_components()).orientation(orientation);

    let mut output = Output::from_output_path(output.as_deref())?;
    write_chart(&mut output, &chart)?;
    info!("Chart written to {}", output.display_path());
    Ok(())
}

/// Writes the chart as SVG when the output is a `.svg` file, as text otherwise.
pub(crate) fn write_chart(output: &mut Output, chart: &ScoreChart<'_>) -> anyhow::Result<()> {
    let rendered = match &*output {
        Output::File { path, .. } if is_svg(path) => {
            chart::render_svg(chart).context("Failed to render SVG chart")?
        }
        _ => chart::render_text(chart),
    };
    output.write_text(&rendered)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
