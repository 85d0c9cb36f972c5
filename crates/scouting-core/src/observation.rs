//! Scouting observations and the fixed metric set they carry.
//!
//! An [`Observation`] is what a single scout records about a single team in a
//! single match. The metrics it carries are a fixed, compile-time known set
//! ([`Metric::ALL`]) stored in a [`MetricSet`]. Flags are stored as `0.0`/`1.0`
//! so that averaging them yields the fraction of observations that reported the
//! flag.

use std::{fmt, ops::Index};

use serde::{Serialize, ser::SerializeMap as _};

/// Match number as printed on the match schedule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct MatchId(pub u32);

/// Team number.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct TeamId(pub u32);

/// How a metric is recorded on the scouting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Yes/no question, stored as `0.0` or `1.0`.
    Flag,
    /// Number of game pieces, fouls, etc.
    Count,
    /// Tiered answer already converted to game points.
    Points,
    /// Percentage in the `0..=100` range.
    Percent,
}

/// A single scouted metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    StartLevel2,
    HabLine,
    HatchSandstorm,
    CargoSandstorm,
    HatchCargoBay,
    HatchBottomRocket,
    HatchMidRocket,
    HatchTopRocket,
    CargoCargoBay,
    CargoBottomRocket,
    CargoMidRocket,
    CargoTopRocket,
    DefenseSuccess,
    Fouls,
    TechFouls,
    RobotDisabled,
    RobotFail,
    TippedOver,
    Reckless,
    ClimbScore,
    PercentDefense,
}

impl Metric {
    pub const COUNT: usize = 21;

    pub const ALL: [Metric; Self::COUNT] = [
        Metric::StartLevel2,
        Metric::HabLine,
        Metric::HatchSandstorm,
        Metric::CargoSandstorm,
        Metric::HatchCargoBay,
        Metric::HatchBottomRocket,
        Metric::HatchMidRocket,
        Metric::HatchTopRocket,
        Metric::CargoCargoBay,
        Metric::CargoBottomRocket,
        Metric::CargoMidRocket,
        Metric::CargoTopRocket,
        Metric::DefenseSuccess,
        Metric::Fouls,
        Metric::TechFouls,
        Metric::RobotDisabled,
        Metric::RobotFail,
        Metric::TippedOver,
        Metric::Reckless,
        Metric::ClimbScore,
        Metric::PercentDefense,
    ];

    /// Hatch panel placement zones, in form order.
    pub const HATCH_ZONES: [Metric; 5] = [
        Metric::HatchSandstorm,
        Metric::HatchCargoBay,
        Metric::HatchBottomRocket,
        Metric::HatchMidRocket,
        Metric::HatchTopRocket,
    ];

    /// Cargo placement zones, in form order.
    pub const CARGO_ZONES: [Metric; 5] = [
        Metric::CargoSandstorm,
        Metric::CargoCargoBay,
        Metric::CargoBottomRocket,
        Metric::CargoMidRocket,
        Metric::CargoTopRocket,
    ];

    /// Robot failure conditions.
    pub const FAILURES: [Metric; 4] = [
        Metric::RobotDisabled,
        Metric::RobotFail,
        Metric::TippedOver,
        Metric::Reckless,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier used in exports.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Metric::StartLevel2 => "start_level2",
            Metric::HabLine => "hab_line",
            Metric::HatchSandstorm => "hatch_sandstorm",
            Metric::CargoSandstorm => "cargo_sandstorm",
            Metric::HatchCargoBay => "hatch_cargo_bay",
            Metric::HatchBottomRocket => "hatch_bottom_rocket",
            Metric::HatchMidRocket => "hatch_mid_rocket",
            Metric::HatchTopRocket => "hatch_top_rocket",
            Metric::CargoCargoBay => "cargo_cargo_bay",
            Metric::CargoBottomRocket => "cargo_bottom_rocket",
            Metric::CargoMidRocket => "cargo_mid_rocket",
            Metric::CargoTopRocket => "cargo_top_rocket",
            Metric::DefenseSuccess => "defense_success",
            Metric::Fouls => "fouls",
            Metric::TechFouls => "tech_fouls",
            Metric::RobotDisabled => "robot_disabled",
            Metric::RobotFail => "robot_fail",
            Metric::TippedOver => "tipped_over",
            Metric::Reckless => "reckless",
            Metric::ClimbScore => "climb_score",
            Metric::PercentDefense => "percent_defense",
        }
    }

    #[must_use]
    pub const fn kind(self) -> MetricKind {
        match self {
            Metric::StartLevel2
            | Metric::HabLine
            | Metric::DefenseSuccess
            | Metric::RobotDisabled
            | Metric::RobotFail
            | Metric::TippedOver
            | Metric::Reckless => MetricKind::Flag,
            Metric::ClimbScore => MetricKind::Points,
            Metric::PercentDefense => MetricKind::Percent,
            Metric::HatchSandstorm
            | Metric::CargoSandstorm
            | Metric::HatchCargoBay
            | Metric::HatchBottomRocket
            | Metric::HatchMidRocket
            | Metric::HatchTopRocket
            | Metric::CargoCargoBay
            | Metric::CargoBottomRocket
            | Metric::CargoMidRocket
            | Metric::CargoTopRocket
            | Metric::Fouls
            | Metric::TechFouls => MetricKind::Count,
        }
    }

    /// Rocket levels above the bottom are harder to reach.
    #[must_use]
    pub const fn is_high_difficulty(self) -> bool {
        matches!(
            self,
            Metric::HatchMidRocket
                | Metric::HatchTopRocket
                | Metric::CargoMidRocket
                | Metric::CargoTopRocket
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

/// Values for every [`Metric`], indexed by metric.
///
/// Metrics that were never set are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSet([f64; Metric::COUNT]);

impl MetricSet {
    pub const ZERO: Self = Self([0.0; Metric::COUNT]);

    #[must_use]
    pub const fn from_array(values: [f64; Metric::COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; Metric::COUNT] {
        &self.0
    }

    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.0[metric.index()] = value;
    }

    /// Stores a yes/no answer as `1.0`/`0.0`.
    pub fn set_flag(&mut self, metric: Metric, value: bool) {
        debug_assert_eq!(metric.kind(), MetricKind::Flag, "{metric} is not a flag");
        self.set(metric, if value { 1.0 } else { 0.0 });
    }

    #[must_use]
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    /// Sum of the given metrics.
    #[must_use]
    pub fn sum_of(&self, metrics: &[Metric]) -> f64 {
        metrics.iter().map(|m| self.get(*m)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.iter().map(|m| (*m, self.get(*m)))
    }
}

impl Index<Metric> for MetricSet {
    type Output = f64;

    fn index(&self, metric: Metric) -> &Self::Output {
        &self.0[metric.index()]
    }
}

impl Serialize for MetricSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(Metric::COUNT))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.id(), &value)?;
        }
        map.end()
    }
}

/// An observation is missing one of the keys aggregation groups by.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ObservationError {
    #[display("observation by '{scout}' has no match number")]
    MissingMatch { scout: String },
    #[display("observation by '{scout}' in match {match_id} has no team number")]
    MissingTeam { scout: String, match_id: MatchId },
}

/// What one scout recorded about one team in one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Who recorded the observation. Kept for auditing only.
    pub scout: String,
    pub match_id: MatchId,
    pub team: TeamId,
    pub metrics: MetricSet,
}

impl Observation {
    #[must_use]
    pub fn new(scout: impl Into<String>, match_id: u32, team: u32, metrics: MetricSet) -> Self {
        Self {
            scout: scout.into(),
            match_id: MatchId(match_id),
            team: TeamId(team),
            metrics,
        }
    }

    /// Builds an observation from keys that may be absent in the source.
    ///
    /// Fails when either key is missing, since the observation could not be
    /// grouped.
    pub fn try_new(
        scout: impl Into<String>,
        match_id: Option<MatchId>,
        team: Option<TeamId>,
        metrics: MetricSet,
    ) -> Result<Self, ObservationError> {
        let scout = scout.into();
        let Some(match_id) = match_id else {
            return Err(ObservationError::MissingMatch { scout });
        };
        let Some(team) = team else {
            return Err(ObservationError::MissingTeam { scout, match_id });
        };
        Ok(Self {
            scout,
            match_id,
            team,
            metrics,
        })
    }
}
