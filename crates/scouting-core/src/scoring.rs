//! Score composition: from averaged metrics to ranked team scores.
//!
//! A [`ScoringStrategy`] turns the [`TeamAverage`] table into one [`TeamScore`]
//! per team. Scores are split into named [`ScoreComponent`]s so that charts can
//! stack them; the total is the sum of the components the strategy counts.
//!
//! Two strategies are provided and selected with [`ScoringVariant`]:
//!
//! - [`BaselineScoring`] - the points a robot earns directly: HAB start bonus,
//!   hatch panels, cargo and climb
//! - [`PocScoring`] - the baseline plus defense, an inverted foul/failure
//!   penalty and a difficulty weight on the upper rocket levels
//!
//! Some components are relative to the whole field (the opponent penalty is
//! measured against the worst team), so strategies score the table at once
//! rather than team by team.
//!
//! [`compose`] applies a strategy and ranks the result. Ties keep the input
//! order, which is ascending team number.

use std::{collections::BTreeMap, fmt, iter};

use serde::{Serialize, ser::SerializeMap as _};
use tracing::debug;

pub use self::{baseline::BaselineScoring, poc::PocScoring};
use crate::{
    aggregate::TeamAverage,
    observation::{Metric, MetricSet, TeamId},
};

mod baseline;
mod poc;

/// Named part of a team score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreComponent {
    /// Leaving the HAB, doubled when starting from level 2.
    Hab,
    /// Hatch panel placement.
    Hatch,
    /// Cargo placement.
    Cargo,
    /// End-of-match climb.
    Climb,
    /// Time spent defending successfully.
    Defense,
    /// Fouls and tech fouls. Lower is better.
    Foul,
    /// Disabled, failed, tipped or reckless robot. Lower is better.
    Fail,
    /// How much better the foul and fail record is than the field's worst.
    OppPenalty,
}

impl ScoreComponent {
    pub const COUNT: usize = 8;

    pub const ALL: [ScoreComponent; Self::COUNT] = [
        ScoreComponent::Hab,
        ScoreComponent::Hatch,
        ScoreComponent::Cargo,
        ScoreComponent::Climb,
        ScoreComponent::Defense,
        ScoreComponent::Foul,
        ScoreComponent::Fail,
        ScoreComponent::OppPenalty,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            ScoreComponent::Hab => "hab_score",
            ScoreComponent::Hatch => "hatch_score",
            ScoreComponent::Cargo => "cargo_score",
            ScoreComponent::Climb => "climb_score",
            ScoreComponent::Defense => "defense_score",
            ScoreComponent::Foul => "foul_score",
            ScoreComponent::Fail => "fail_score",
            ScoreComponent::OppPenalty => "opp_penalty_score",
        }
    }

    /// Short label for table headers and chart legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ScoreComponent::Hab => "HAB",
            ScoreComponent::Hatch => "Hatch",
            ScoreComponent::Cargo => "Cargo",
            ScoreComponent::Climb => "Climb",
            ScoreComponent::Defense => "Defense",
            ScoreComponent::Foul => "Foul",
            ScoreComponent::Fail => "Fail",
            ScoreComponent::OppPenalty => "OppPenalty",
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

/// Sub-scores computed by a strategy. Components a strategy does not compute
/// are absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentScores([Option<f64>; ScoreComponent::COUNT]);

impl ComponentScores {
    #[must_use]
    pub const fn get(&self, component: ScoreComponent) -> Option<f64> {
        self.0[component.index()]
    }

    /// Value of a component, zero when absent.
    #[must_use]
    pub fn value(&self, component: ScoreComponent) -> f64 {
        self.get(component).unwrap_or(0.0)
    }

    pub fn set(&mut self, component: ScoreComponent, value: f64) {
        self.0[component.index()] = Some(value);
    }

    /// Sum of the given components, absent ones counting as zero.
    #[must_use]
    pub fn sum_of(&self, components: &[ScoreComponent]) -> f64 {
        components.iter().map(|c| self.value(*c)).sum()
    }

    /// Computed components in [`ScoreComponent::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ScoreComponent, f64)> + '_ {
        ScoreComponent::ALL
            .iter()
            .filter_map(|c| Some((*c, self.get(*c)?)))
    }
}

impl Serialize for ComponentScores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (component, value) in self.iter() {
            map.serialize_entry(component.id(), &value)?;
        }
        map.end()
    }
}

/// Ranked score of one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    pub team: TeamId,
    pub matches: usize,
    pub observations: usize,
    /// Averaged metrics the score was computed from.
    pub metrics: MetricSet,
    pub components: ComponentScores,
    pub total: f64,
}

/// Converts averaged metrics into team scores.
pub trait ScoringStrategy: fmt::Debug + Send + Sync {
    fn variant(&self) -> ScoringVariant;

    /// Components charts stack for this strategy, in drawing order.
    ///
    /// These are exactly the components that add up to the total.
    fn chart_components(&self) -> &'static [ScoreComponent];

    /// Computes the sub-scores of every team.
    ///
    /// The returned scores are in the order of `teams`.
    fn score_components(&self, teams: &[&TeamAverage]) -> Vec<ComponentScores>;
}

/// Available scoring formulas.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum ScoringVariant {
    #[default]
    Baseline,
    Poc,
}

impl ScoringVariant {
    pub const ALL: [ScoringVariant; 2] = [ScoringVariant::Baseline, ScoringVariant::Poc];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            ScoringVariant::Baseline => "baseline",
            ScoringVariant::Poc => "poc",
        }
    }

    /// The strategy with its default parameters.
    #[must_use]
    pub fn strategy(self) -> Box<dyn ScoringStrategy> {
        match self {
            ScoringVariant::Baseline => Box::new(BaselineScoring),
            ScoringVariant::Poc => Box::new(PocScoring::default()),
        }
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

/// Scores every team with `strategy` and ranks them by total, highest first.
///
/// The sort is stable, so teams with equal totals stay in ascending team
/// order. An empty table yields an empty ranking.
pub fn compose(
    strategy: &dyn ScoringStrategy,
    teams: &BTreeMap<TeamId, TeamAverage>,
) -> Vec<TeamScore> {
    let teams = teams.values().collect::<Vec<_>>();
    let components = strategy.score_components(&teams);
    debug_assert_eq!(components.len(), teams.len());
    let counted = strategy.chart_components();

    let mut scores = iter::zip(teams, components)
        .map(|(team, components)| TeamScore {
            team: team.team,
            matches: team.matches,
            observations: team.observations,
            metrics: team.metrics,
            components,
            total: components.sum_of(counted),
        })
        .collect::<Vec<_>>();
    scores.sort_by(|a, b| b.total.total_cmp(&a.total));
    debug!(variant = %strategy.variant(), teams = scores.len(), "composed scores");
    scores
}

const HATCH_POINTS: f64 = 2.0;
const CARGO_POINTS: f64 = 3.0;

/// `3 * crossed * (level2 + 1)`: level 2 start only pays when the line was crossed.
fn hab_score(metrics: &MetricSet) -> f64 {
    3.0 * metrics[Metric::HabLine] * (metrics[Metric::StartLevel2] + 1.0)
}

/// `per_unit * Σ zones`, high difficulty zones multiplied by `difficulty_weight`.
fn placement_score(
    metrics: &MetricSet,
    zones: &[Metric],
    per_unit: f64,
    difficulty_weight: f64,
) -> f64 {
    let sum = zones
        .iter()
        .map(|zone| {
            let weight = if zone.is_high_difficulty() {
                difficulty_weight
            } else {
                1.0
            };
            weight * metrics[*zone]
        })
        .sum::<f64>();
    per_unit * sum
}
