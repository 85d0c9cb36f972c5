use std::io;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use scouting_core::{
    observation::Metric,
    scoring::{ScoreComponent, TeamScore},
};
use serde::Serialize;

/// Ranked scores of one scouting export, as written by `export`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Timestamp when the report was generated (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Scouting form export the scores were computed from
    pub source: String,
    /// Scoring formula identifier
    pub variant: String,
    /// Difficulty weight of the upper rocket levels, for formulas that use one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_weight: Option<f64>,
    /// Teams ranked by total score, highest first
    pub teams: Vec<TeamScore>,
}

/// Writes team scores as a flat CSV table.
///
/// Columns: rank, team, match and observation counts, every averaged metric,
/// every score component (empty when not computed) and the total.
pub fn write_scores_csv<W>(writer: W, scores: &[TeamScore]) -> anyhow::Result<()>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);

    let header = ["rank", "team", "matches", "observations"]
        .into_iter()
        .chain(Metric::ALL.iter().map(|m| m.id()))
        .chain(ScoreComponent::ALL.iter().map(|c| c.id()))
        .chain(["total"]);
    writer
        .write_record(header)
        .context("Failed to write CSV header")?;

    for (rank, score) in scores.iter().enumerate() {
        let record = [
            (rank + 1).to_string(),
            score.team.to_string(),
            score.matches.to_string(),
            score.observations.to_string(),
        ]
        .into_iter()
        .chain(score.metrics.iter().map(|(_, v)| v.to_string()))
        .chain(
            ScoreComponent::ALL
                .iter()
                .map(|c| score.components.get(*c).map_or_else(String::new, |v| v.to_string())),
        )
        .chain([score.total.to_string()]);
        writer
            .write_record(record)
            .with_context(|| format!("Failed to write CSV row for team {}", score.team))?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}
