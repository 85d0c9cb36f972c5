//! Unbiased per-team averaging of scouting observations.
//!
//! Scouts do not cover matches evenly: one match of a team may be watched by
//! three scouts and the next by one. Averaging all of a team's observations at
//! once lets the heavily watched matches dominate. Aggregation therefore runs
//! in two passes over explicit keys:
//!
//! 1. [`average_by_match`] - mean of every metric per `(match, team)`
//! 2. [`average_by_team`] - mean of those per-match rows per team
//!
//! Each match contributes exactly one row to the second pass, so every match
//! weighs the same in the team result. Flags are stored as `0.0`/`1.0`, which
//! makes their averages observation frequencies.
//!
//! [`naive_average`] computes the single-pass mean. It is biased and exists
//! only to compare against.

use std::collections::{BTreeMap, BTreeSet};

use scouting_stats::mean::MeanAccumulator;
use serde::Serialize;
use tracing::debug;

use crate::observation::{MatchId, Metric, MetricSet, Observation, TeamId};

type MetricMean = MeanAccumulator<{ Metric::COUNT }>;

/// Mean metrics of one team in one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTeamAverage {
    pub match_id: MatchId,
    pub team: TeamId,
    /// Number of observations averaged.
    pub observations: usize,
    pub metrics: MetricSet,
}

/// Mean metrics of one team, every match weighted equally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverage {
    pub team: TeamId,
    /// Number of distinct matches the team was observed in.
    pub matches: usize,
    /// Total number of observations behind the averages.
    pub observations: usize,
    pub metrics: MetricSet,
}

/// First pass: averages observations sharing a `(match, team)` pair.
///
/// Rows are ordered by match, then team.
pub fn average_by_match<'a, I>(observations: I) -> Vec<MatchTeamAverage>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut groups = BTreeMap::<(MatchId, TeamId), MetricMean>::new();
    for obs in observations {
        groups
            .entry((obs.match_id, obs.team))
            .or_default()
            .push(obs.metrics.as_array());
    }

    groups
        .into_iter()
        .filter_map(|((match_id, team), acc)| {
            Some(MatchTeamAverage {
                match_id,
                team,
                observations: acc.count(),
                metrics: MetricSet::from_array(acc.mean()?),
            })
        })
        .collect()
}

/// Second pass: averages the per-match rows of each team.
///
/// Averages are taken over match rows, not over the observations behind them.
pub fn average_by_team<'a, I>(match_averages: I) -> BTreeMap<TeamId, TeamAverage>
where
    I: IntoIterator<Item = &'a MatchTeamAverage>,
{
    let mut groups = BTreeMap::<TeamId, (MetricMean, usize)>::new();
    for row in match_averages {
        let (acc, observations) = groups.entry(row.team).or_default();
        acc.push(row.metrics.as_array());
        *observations += row.observations;
    }

    groups
        .into_iter()
        .filter_map(|(team, (acc, observations))| {
            let average = TeamAverage {
                team,
                matches: acc.count(),
                observations,
                metrics: MetricSet::from_array(acc.mean()?),
            };
            Some((team, average))
        })
        .collect()
}

/// Averages observations per team, giving every match equal weight.
///
/// Teams without observations do not appear in the result. An empty input
/// yields an empty map.
pub fn aggregate<'a, I>(observations: I) -> BTreeMap<TeamId, TeamAverage>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut count = 0_usize;
    let by_match = average_by_match(observations.into_iter().inspect(|_| count += 1));
    let by_team = average_by_team(&by_match);
    debug!(
        observations = count,
        match_team_groups = by_match.len(),
        teams = by_team.len(),
        "aggregated observations"
    );
    by_team
}

/// Single-pass mean over all observations of each team.
///
/// Biased toward matches with more scouts.
pub fn naive_average<'a, I>(observations: I) -> BTreeMap<TeamId, TeamAverage>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut groups = BTreeMap::<TeamId, (MetricMean, BTreeSet<MatchId>)>::new();
    for obs in observations {
        let (acc, matches) = groups.entry(obs.team).or_default();
        acc.push(obs.metrics.as_array());
        matches.insert(obs.match_id);
    }

    groups
        .into_iter()
        .filter_map(|(team, (acc, matches))| {
            let average = TeamAverage {
                team,
                matches: matches.len(),
                observations: acc.count(),
                metrics: MetricSet::from_array(acc.mean()?),
            };
            Some((team, average))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;

    fn climb(scout: &str, match_id: u32, team: u32, points: f64) -> Observation {
        Observation::new(
            scout,
            match_id,
            team,
            MetricSet::ZERO.with(Metric::ClimbScore, points),
        )
    }

    /// Three scouts watch match 1, one scout watches match 2 with the result reversed.
    fn uneven_coverage() -> Vec<Observation> {
        vec![
            climb("Han", 1, 1000, 12.0),
            climb("Han", 1, 2000, 0.0),
            climb("Chewbacca", 1, 1000, 12.0),
            climb("Chewbacca", 1, 2000, 0.0),
            climb("Luke", 1, 1000, 12.0),
            climb("Luke", 1, 2000, 0.0),
            climb("Chewbacca", 2, 1000, 0.0),
            climb("Chewbacca", 2, 2000, 12.0),
        ]
    }

    #[test]
    fn test_uneven_coverage_weights_matches_equally() {
        let observations = uneven_coverage();

        let teams = aggregate(&observations);
        assert_eq!(teams.len(), 2);
        assert_float_absolute_eq!(6.0, teams[&TeamId(1000)].metrics[Metric::ClimbScore]);
        assert_float_absolute_eq!(6.0, teams[&TeamId(2000)].metrics[Metric::ClimbScore]);

        let naive = naive_average(&observations);
        assert_float_absolute_eq!(9.0, naive[&TeamId(1000)].metrics[Metric::ClimbScore]);
        assert_float_absolute_eq!(3.0, naive[&TeamId(2000)].metrics[Metric::ClimbScore]);
    }

    #[test]
    fn test_match_team_rows() {
        let rows = average_by_match(&uneven_coverage());
        let keys = rows
            .iter()
            .map(|r| (r.match_id.0, r.team.0, r.observations))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![(1, 1000, 3), (1, 2000, 3), (2, 1000, 1), (2, 2000, 1)]
        );
        assert_eq!(rows[0].metrics[Metric::ClimbScore], 12.0);
    }

    #[test]
    fn test_team_counts() {
        let teams = aggregate(&uneven_coverage());
        let team = &teams[&TeamId(1000)];
        assert_eq!(team.matches, 2);
        assert_eq!(team.observations, 4);
    }

    #[test]
    fn test_uniform_coverage_matches_naive() {
        // Two scouts in every match
        let observations = vec![
            climb("Han", 1, 1000, 12.0),
            climb("Luke", 1, 1000, 6.0),
            climb("Han", 2, 1000, 3.0),
            climb("Luke", 2, 1000, 0.0),
            climb("Han", 3, 1000, 6.0),
            climb("Luke", 3, 1000, 6.0),
        ];
        let two_stage = aggregate(&observations);
        let naive = naive_average(&observations);
        assert_float_absolute_eq!(
            naive[&TeamId(1000)].metrics[Metric::ClimbScore],
            two_stage[&TeamId(1000)].metrics[Metric::ClimbScore]
        );
    }

    #[test]
    fn test_single_match_is_identity() {
        let observations = vec![climb("Han", 7, 3000, 12.0), climb("Luke", 7, 3000, 3.0)];
        let by_match = average_by_match(&observations);
        let teams = aggregate(&observations);
        assert_eq!(by_match.len(), 1);
        assert_eq!(teams[&TeamId(3000)].metrics, by_match[0].metrics);
    }

    #[test]
    fn test_absent_teams_excluded() {
        let observations = vec![climb("Han", 1, 1000, 3.0)];
        let teams = aggregate(&observations);
        assert_eq!(teams.keys().copied().collect::<Vec<_>>(), vec![TeamId(1000)]);
        assert!(!teams.contains_key(&TeamId(2000)));
    }

    #[test]
    fn test_empty_input() {
        let observations: Vec<Observation> = vec![];
        assert!(average_by_match(&observations).is_empty());
        assert!(aggregate(&observations).is_empty());
        assert!(naive_average(&observations).is_empty());
    }

    #[test]
    fn test_flags_average_to_frequency() {
        let crossed = |scout: &str, value: bool| {
            let mut metrics = MetricSet::ZERO;
            metrics.set_flag(Metric::HabLine, value);
            Observation::new(scout, 1, 1000, metrics)
        };
        let observations = vec![
            crossed("Han", true),
            crossed("Luke", false),
            crossed("Leia", true),
            crossed("Chewbacca", true),
        ];
        let teams = aggregate(&observations);
        let freq = teams[&TeamId(1000)].metrics[Metric::HabLine];
        assert_float_absolute_eq!(0.75, freq);
        assert!((0.0..=1.0).contains(&freq));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut observations = uneven_coverage();
        let forward = aggregate(&observations);
        observations.reverse();
        let backward = aggregate(&observations);
        assert_eq!(forward, backward);
    }
}
