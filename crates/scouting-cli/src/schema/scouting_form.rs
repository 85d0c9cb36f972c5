//! Scouting form CSV exports.
//!
//! Scouts fill in an online form; its responses are exported as CSV with the
//! form questions as column headers. This module maps those questions to
//! [`Metric`]s and converts the answers:
//!
//! - empty cells count as zero (or "no")
//! - yes/no answers become `1.0`/`0.0`
//! - the climbing tier becomes game points (see [`climb_points`])
//! - the defense percentage keeps its `0..=100` scale, without the `%`
//!
//! Columns not listed here (timestamps, starting position, cards, ...) are
//! ignored.

use std::{collections::HashMap, io};

use anyhow::Context as _;
use scouting_core::observation::{MatchId, Metric, MetricKind, MetricSet, Observation, TeamId};
use tracing::warn;

const SCOUT_COLUMN: &str = "Your name (FirstName LastName)";
const MATCH_COLUMN: &str = "Match #";
const TEAM_COLUMN: &str = "Team #";

/// Form question for each metric.
const METRIC_COLUMNS: [(&str, Metric); Metric::COUNT] = [
    ("Starts on Level 2?", Metric::StartLevel2),
    ("Crossed HAB line?", Metric::HabLine),
    (
        "# of hatch panels placed during sandstorm",
        Metric::HatchSandstorm,
    ),
    ("# of cargo placed during sandstorm", Metric::CargoSandstorm),
    ("# of hatch panels on the cargo bay", Metric::HatchCargoBay),
    (
        "# of hatch panels on the bottom of the rocket",
        Metric::HatchBottomRocket,
    ),
    (
        "# of hatch panels on the middle of the rocket",
        Metric::HatchMidRocket,
    ),
    (
        "# of hatch panels on the top of the rocket",
        Metric::HatchTopRocket,
    ),
    ("# of cargo in the cargo bay", Metric::CargoCargoBay),
    (
        "# of cargo in the bottom of the rocket",
        Metric::CargoBottomRocket,
    ),
    (
        "# of cargo in the middle of the rocket",
        Metric::CargoMidRocket,
    ),
    ("# of cargo in the top of the rocket", Metric::CargoTopRocket),
    ("Played defense successfully", Metric::DefenseSuccess),
    ("# of fouls", Metric::Fouls),
    ("# of tech fouls", Metric::TechFouls),
    ("Robot disabled", Metric::RobotDisabled),
    ("Robot failure", Metric::RobotFail),
    ("Tipped over", Metric::TippedOver),
    ("Reckless driving", Metric::Reckless),
    ("Climbing", Metric::ClimbScore),
    ("% of time playing defense", Metric::PercentDefense),
];

/// Points for each climbing tier answer.
const CLIMB_TIERS: [(&str, f64); 4] = [
    ("Level 3", 12.0),
    ("Level 2", 6.0),
    ("Level 1", 3.0),
    ("Not on HAB", 0.0),
];

/// Column positions of a form export, resolved from its header row.
#[derive(Debug)]
struct FormLayout {
    scout: Option<usize>,
    match_id: usize,
    team: usize,
    metrics: Vec<(Metric, usize)>,
}

impl FormLayout {
    fn from_headers(headers: &csv::StringRecord) -> anyhow::Result<Self> {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim(), i))
            .collect::<HashMap<_, _>>();
        let required = |column: &str| {
            positions
                .get(column)
                .copied()
                .with_context(|| format!("Missing required column '{column}'"))
        };

        let match_id = required(MATCH_COLUMN)?;
        let team = required(TEAM_COLUMN)?;
        let mut metrics = Vec::with_capacity(Metric::COUNT);
        for (column, metric) in METRIC_COLUMNS {
            match positions.get(column) {
                Some(&i) => metrics.push((metric, i)),
                None => warn!(column, "column missing from form export, {metric} counts as zero"),
            }
        }

        Ok(Self {
            scout: positions.get(SCOUT_COLUMN).copied(),
            match_id,
            team,
            metrics,
        })
    }

    /// Converts one response. `line` is the 1-based line number used in errors.
    fn observation(&self, record: &csv::StringRecord, line: u64) -> anyhow::Result<Observation> {
        let cell = |i: usize| record.get(i).map(str::trim).filter(|s| !s.is_empty());

        let scout = self.scout.and_then(cell).unwrap_or_default().to_owned();
        let match_id = cell(self.match_id)
            .map(|s| s.parse::<MatchId>())
            .transpose()
            .with_context(|| format!("line {line}: invalid match number"))?;
        let team = cell(self.team)
            .map(|s| s.parse::<TeamId>())
            .transpose()
            .with_context(|| format!("line {line}: invalid team number"))?;

        let mut metrics = MetricSet::ZERO;
        for &(metric, i) in &self.metrics {
            let value = parse_metric(metric, cell(i))
                .with_context(|| format!("line {line}: invalid answer for {metric}"))?;
            metrics.set(metric, value);
        }

        Observation::try_new(scout, match_id, team, metrics)
            .with_context(|| format!("line {line}: malformed observation"))
    }
}

/// Reads every response of a form export.
///
/// Fails on the first response without a match or team number, naming its
/// line.
pub fn read_observations<R>(reader: R) -> anyhow::Result<Vec<Observation>>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let layout = FormLayout::from_headers(reader.headers().context("Failed to read header row")?)?;

    let mut observations = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        let line = record.position().map_or(0, csv::Position::line);
        observations.push(layout.observation(&record, line)?);
    }
    Ok(observations)
}

fn parse_metric(metric: Metric, answer: Option<&str>) -> anyhow::Result<f64> {
    let Some(answer) = answer else {
        return Ok(0.0);
    };
    match metric.kind() {
        MetricKind::Flag => parse_flag(answer).map(|b| if b { 1.0 } else { 0.0 }),
        MetricKind::Count => parse_count(answer),
        MetricKind::Points => climb_points(answer),
        MetricKind::Percent => parse_percent(answer),
    }
}

fn parse_flag(answer: &str) -> anyhow::Result<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => anyhow::bail!("'{answer}' is not a yes/no answer"),
    }
}

/// Converts a climbing tier answer to game points.
pub fn climb_points(answer: &str) -> anyhow::Result<f64> {
    CLIMB_TIERS
        .iter()
        .find(|(tier, _)| tier.eq_ignore_ascii_case(answer))
        .map(|(_, points)| *points)
        .with_context(|| format!("'{answer}' is not a climbing tier"))
}

/// Counts are whole, non-negative numbers.
fn parse_count(answer: &str) -> anyhow::Result<f64> {
    answer
        .parse::<u32>()
        .map(f64::from)
        .with_context(|| format!("'{answer}' is not a count"))
}

/// Percentages must lie in `0..=100`.
fn parse_percent(answer: &str) -> anyhow::Result<f64> {
    let number = answer.strip_suffix('%').unwrap_or(answer).trim();
    let value = number
        .parse::<f64>()
        .with_context(|| format!("'{answer}' is not a percentage"))?;
    if !(0.0..=100.0).contains(&value) {
        anyhow::bail!("'{answer}' is not between 0% and 100%");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Timestamp,Your name (FirstName LastName),Match #,Team #,\
        Starts on Level 2?,Crossed HAB line?,\
        # of hatch panels on the top of the rocket,# of cargo in the cargo bay,\
        Played defense successfully,% of time playing defense,# of fouls,Climbing";

    fn parse(rows: &[&str]) -> anyhow::Result<Vec<Observation>> {
        let csv = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        read_observations(csv.as_bytes())
    }

    #[test]
    fn test_parses_answers() {
        let observations = parse(&[
            "3/2/2019 10:00,Han Solo,1,1000,TRUE,TRUE,2,3,FALSE,25%,1,Level 3",
            "3/2/2019 10:01,Luke Skywalker,1,2000,FALSE,Yes,,,,0%,,Not on HAB",
        ])
        .unwrap();
        assert_eq!(observations.len(), 2);

        let han = &observations[0];
        assert_eq!(han.scout, "Han Solo");
        assert_eq!(han.match_id, MatchId(1));
        assert_eq!(han.team, TeamId(1000));
        assert_eq!(han.metrics[Metric::StartLevel2], 1.0);
        assert_eq!(han.metrics[Metric::HabLine], 1.0);
        assert_eq!(han.metrics[Metric::HatchTopRocket], 2.0);
        assert_eq!(han.metrics[Metric::CargoCargoBay], 3.0);
        assert_eq!(han.metrics[Metric::DefenseSuccess], 0.0);
        assert_eq!(han.metrics[Metric::PercentDefense], 25.0);
        assert_eq!(han.metrics[Metric::Fouls], 1.0);
        assert_eq!(han.metrics[Metric::ClimbScore], 12.0);

        let luke = &observations[1];
        assert_eq!(luke.metrics[Metric::StartLevel2], 0.0);
        assert_eq!(luke.metrics[Metric::HabLine], 1.0);
        assert_eq!(luke.metrics[Metric::HatchTopRocket], 0.0);
        assert_eq!(luke.metrics[Metric::ClimbScore], 0.0);
        // columns absent from the export count as zero
        assert_eq!(luke.metrics[Metric::TechFouls], 0.0);
    }

    #[test]
    fn test_empty_export() {
        assert!(parse(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_team_names_line() {
        let err = parse(&[
            "t,Han,1,1000,,,,,,,,",
            "t,Luke,2,,,,,,,,,",
        ])
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("no team number"), "{message}");
    }

    #[test]
    fn test_invalid_match_number() {
        let err = parse(&["t,Han,first,1000,,,,,,,,"]).unwrap_err();
        assert!(format!("{err:#}").contains("invalid match number"));
    }

    #[test]
    fn test_unknown_climb_tier() {
        let err = parse(&["t,Han,1,1000,,,,,,,,Level 4"]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("climb_score"), "{message}");
        assert!(message.contains("Level 4"), "{message}");
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_observations("Match #,Climbing\n1,Level 1".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Team #"));
    }

    #[test]
    fn test_climb_points() {
        assert_eq!(climb_points("Level 3").unwrap(), 12.0);
        assert_eq!(climb_points("level 2").unwrap(), 6.0);
        assert_eq!(climb_points("Level 1").unwrap(), 3.0);
        assert_eq!(climb_points("Not on HAB").unwrap(), 0.0);
        assert!(climb_points("Hovering").is_err());
    }

    #[test]
    fn test_parse_flag_and_percent() {
        assert!(parse_flag("True").unwrap());
        assert!(!parse_flag("no").unwrap());
        assert!(parse_flag("maybe").is_err());
        assert_eq!(parse_percent("37.5%").unwrap(), 37.5);
        assert_eq!(parse_percent("80").unwrap(), 80.0);
        assert!(parse_percent("most").is_err());
        assert!(parse_percent("150%").is_err());
        assert!(parse_percent("-5%").is_err());
        assert!(parse_percent("NaN").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3").unwrap(), 3.0);
        for answer in ["NaN", "inf", "-1", "1e308", "2.5"] {
            assert!(parse_count(answer).is_err(), "{answer}");
        }
    }

    #[test]
    fn test_invalid_numbers_name_line_and_metric() {
        let err = parse(&["t,Han,1,1000,,,,,,,NaN,"]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("invalid answer for fouls"), "{message}");

        let err = parse(&["t,Han,1,1000,,,,-1,,,,"]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invalid answer for cargo_cargo_bay"), "{message}");

        let err = parse(&["t,Han,1,1000,,,,,,150%,,"]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invalid answer for percent_defense"), "{message}");
    }
}
