//! Ranked score table command
//!
//! Prints the composed team scores, optionally next to the naive
//! single-pass averages, followed by statistics of the totals.

use std::{collections::BTreeMap, path::PathBuf};

use clap::Args;
use scouting_core::{
    aggregate,
    observation::TeamId,
    scoring::{self, ScoreComponent, TeamScore},
};
use scouting_stats::descriptive::DescriptiveStats;
use tracing::info;

use crate::{command::ScoringArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    /// Path to the scouting form CSV export
    pub scouting_file: PathBuf,

    #[clap(flatten)]
    pub scoring: ScoringArg,

    /// Also score the naive single-pass averages and compare the totals
    #[arg(long)]
    pub naive: bool,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let SummaryArg {
        scouting_file,
        scoring,
        naive,
    } = arg;

    let observations = util::read_scouting_file(scouting_file)?;
    info!("Loaded {} observations", observations.len());
    let strategy = scoring.strategy();
    let scores = scoring::compose(strategy.as_ref(), &aggregate::aggregate(&observations));

    println!(
        "Team Scores ({}, {} teams, {} observations)",
        strategy.variant(),
        scores.len(),
        observations.len()
    );
    println!("==========================================\n");
    print_score_table(&scores, strategy.chart_components());
    println!();

    if *naive {
        let naive_scores =
            scoring::compose(strategy.as_ref(), &aggregate::naive_average(&observations));
        println!("Naive vs Per-Match Averaging");
        println!("============================\n");
        print_comparison_table(&scores, &naive_scores);
        println!();
    }

    print_total_statistics(&scores);
    Ok(())
}

fn print_score_table(scores: &[TeamScore], components: &[ScoreComponent]) {
    let mut header = format!("  {:>4} {:>6} {:>7} {:>5}", "Rank", "Team", "Matches", "Obs");
    for component in components {
        header.push_str(&format!(" {:>10}", component.label()));
    }
    header.push_str(&format!(" {:>8}", "Total"));
    println!("{header}");
    println!("  {}", "-".repeat(header.len() - 2));

    for (rank, score) in scores.iter().enumerate() {
        let mut row = format!(
            "  {:>4} {:>6} {:>7} {:>5}",
            rank + 1,
            score.team.to_string(),
            score.matches,
            score.observations
        );
        for component in components {
            row.push_str(&format!(" {:>10.2}", score.components.value(*component)));
        }
        row.push_str(&format!(" {:>8.2}", score.total));
        println!("{row}");
    }
}

/// Per-team totals of both averaging methods, in per-match rank order.
fn print_comparison_table(scores: &[TeamScore], naive_scores: &[TeamScore]) {
    let naive = naive_scores
        .iter()
        .enumerate()
        .map(|(rank, score)| (score.team, (rank + 1, score.total)))
        .collect::<BTreeMap<TeamId, _>>();

    println!(
        "  {:>6} {:>10} {:>10} {:>8} {:>6} {:>6}",
        "Team", "PerMatch", "Naive", "Diff", "Rank", "Naive"
    );
    println!("  {}", "-".repeat(51));
    for (rank, score) in scores.iter().enumerate() {
        let Some(&(naive_rank, naive_total)) = naive.get(&score.team) else {
            continue;
        };
        println!(
            "  {:>6} {:>10.2} {:>10.2} {:>+8.2} {:>6} {:>6}",
            score.team.to_string(),
            score.total,
            naive_total,
            naive_total - score.total,
            rank + 1,
            naive_rank
        );
    }
}

fn print_total_statistics(scores: &[TeamScore]) {
    let Some(stats) = DescriptiveStats::new(scores.iter().map(|s| s.total)) else {
        println!("No teams to summarize");
        return;
    };
    println!("Total Score Statistics");
    println!("======================\n");
    println!("  Teams:   {}", stats.count);
    println!("  Min:     {:.2}", stats.min);
    println!("  Max:     {:.2}", stats.max);
    println!("  Mean:    {:.2}", stats.mean);
    println!("  Median:  {:.2}", stats.median);
    println!("  Std Dev: {:.2}", stats.std_dev);
}
