//! Team scoring from crowd-sourced scouting observations.
//!
//! This crate implements the two computational stages of the scouting
//! pipeline:
//!
//! 1. **Unbiased Aggregation** ([`aggregate`]) - Averages observations per
//!    (match, team) pair, then averages those per-match rows per team, so that
//!    every match carries the same weight no matter how many scouts watched it.
//!
//! 2. **Score Composition** ([`scoring`]) - Turns per-team averaged metrics into
//!    named sub-scores and a total using one of the scoring strategies, then
//!    ranks the teams by total.
//!
//! # Architecture
//!
//! ```text
//! Observation (one per scout, match and team)
//!     ↓ average_by_match
//! MatchTeamAverage (one per match and team)
//!     ↓ average_by_team
//! TeamAverage (one per team)
//!     ↓ compose(strategy)
//! TeamScore (one per team, ranked by total)
//! ```
//!
//! The crate performs no I/O. Reading scouting forms and drawing charts is left
//! to the caller (see the `scouting` binary).
//!
//! # Why Two Stages
//!
//! A single mean over all rows of a team weights each match by the number of
//! scouts who observed it. If three scouts watched a team score 12 in one match
//! and a single scout watched it score 0 in the next, the naive mean is 9 while
//! the team's per-match average is 6:
//!
//! ```
//! use scouting_core::{
//!     aggregate::{aggregate, naive_average},
//!     observation::{Metric, MetricSet, Observation, TeamId},
//! };
//!
//! let scored = |scout: &str, match_id: u32, points: f64| {
//!     Observation::new(scout, match_id, 1000, MetricSet::ZERO.with(Metric::ClimbScore, points))
//! };
//! let observations = vec![
//!     scored("Han", 1, 12.0),
//!     scored("Chewbacca", 1, 12.0),
//!     scored("Luke", 1, 12.0),
//!     scored("Chewbacca", 2, 0.0),
//! ];
//!
//! let teams = aggregate(&observations);
//! assert_eq!(teams[&TeamId(1000)].metrics[Metric::ClimbScore], 6.0);
//!
//! let naive = naive_average(&observations);
//! assert_eq!(naive[&TeamId(1000)].metrics[Metric::ClimbScore], 9.0);
//! ```
//!
//! # Example: Ranking Teams
//!
//! ```
//! use scouting_core::{
//!     aggregate::aggregate,
//!     observation::{Metric, MetricSet, Observation, TeamId},
//!     scoring::{compose, ScoreComponent, ScoringVariant},
//! };
//!
//! let observations = vec![
//!     Observation::new("Han", 1, 1000, MetricSet::ZERO.with(Metric::HatchCargoBay, 2.0)),
//!     Observation::new("Han", 1, 2000, MetricSet::ZERO.with(Metric::CargoCargoBay, 2.0)),
//! ];
//!
//! let strategy = ScoringVariant::Baseline.strategy();
//! let ranked = compose(strategy.as_ref(), &aggregate(&observations));
//! assert_eq!(ranked[0].team, TeamId(2000));
//! assert_eq!(ranked[0].components.get(ScoreComponent::Cargo), Some(6.0));
//! assert_eq!(ranked[1].total, 4.0);
//! ```

pub mod aggregate;
pub mod observation;
pub mod scoring;
