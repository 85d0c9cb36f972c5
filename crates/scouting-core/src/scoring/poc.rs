use super::{
    CARGO_POINTS, ComponentScores, HATCH_POINTS, ScoreComponent, ScoringStrategy, ScoringVariant,
    hab_score, placement_score,
};
use crate::{aggregate::TeamAverage, observation::Metric};

/// Baseline points plus defense and an inverted penalty record.
///
/// ```text
/// hab          = 3 · hab_line · (start_level2 + 1)
/// hatch        = 2 · (sandstorm + cargo_bay + bottom + w · mid + w · top)
/// cargo        = 3 · (sandstorm + cargo_bay + bottom + w · mid + w · top)
/// climb        = climb_score
/// defense      = 10 · defense_success · percent_defense / 100
/// foul         = 3 · fouls + 10 · tech_fouls
/// fail         = 5 · (disabled + fail + tipped_over + reckless)
/// opp_penalty  = max over teams (foul + fail) - (foul + fail)
/// total        = hab + hatch + cargo + climb + defense + opp_penalty
/// ```
///
/// `w` is the difficulty weight of the upper rocket levels. The foul and fail
/// scores are reported but only enter the total through `opp_penalty`, which is
/// zero for the team with the worst record and positive for everyone else.
#[derive(Debug, Clone, Copy)]
pub struct PocScoring {
    difficulty_weight: f64,
}

impl Default for PocScoring {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIFFICULTY_WEIGHT)
    }
}

const COMPONENTS: &[ScoreComponent] = &[
    ScoreComponent::Hab,
    ScoreComponent::Hatch,
    ScoreComponent::Cargo,
    ScoreComponent::Climb,
    ScoreComponent::Defense,
    ScoreComponent::OppPenalty,
];

const DEFENSE_POINTS: f64 = 10.0;
const FOUL_POINTS: f64 = 3.0;
const TECH_FOUL_POINTS: f64 = 10.0;
const FAILURE_POINTS: f64 = 5.0;

impl PocScoring {
    pub const DEFAULT_DIFFICULTY_WEIGHT: f64 = 1.1;

    #[must_use]
    pub const fn new(difficulty_weight: f64) -> Self {
        Self { difficulty_weight }
    }

    #[must_use]
    pub const fn difficulty_weight(&self) -> f64 {
        self.difficulty_weight
    }
}

impl ScoringStrategy for PocScoring {
    fn variant(&self) -> ScoringVariant {
        ScoringVariant::Poc
    }

    fn chart_components(&self) -> &'static [ScoreComponent] {
        COMPONENTS
    }

    fn score_components(&self, teams: &[&TeamAverage]) -> Vec<ComponentScores> {
        let w = self.difficulty_weight;
        let mut rows = teams
            .iter()
            .map(|team| {
                let metrics = &team.metrics;
                let mut scores = ComponentScores::default();
                scores.set(ScoreComponent::Hab, hab_score(metrics));
                scores.set(
                    ScoreComponent::Hatch,
                    placement_score(metrics, &Metric::HATCH_ZONES, HATCH_POINTS, w),
                );
                scores.set(
                    ScoreComponent::Cargo,
                    placement_score(metrics, &Metric::CARGO_ZONES, CARGO_POINTS, w),
                );
                scores.set(ScoreComponent::Climb, metrics[Metric::ClimbScore]);
                let defense = DEFENSE_POINTS
                    * metrics[Metric::DefenseSuccess]
                    * metrics[Metric::PercentDefense]
                    / 100.0;
                scores.set(ScoreComponent::Defense, defense);
                let fouls = FOUL_POINTS * metrics[Metric::Fouls]
                    + TECH_FOUL_POINTS * metrics[Metric::TechFouls];
                scores.set(ScoreComponent::Foul, fouls);
                scores.set(
                    ScoreComponent::Fail,
                    FAILURE_POINTS * metrics.sum_of(&Metric::FAILURES),
                );
                scores
            })
            .collect::<Vec<_>>();

        let penalty = |scores: &ComponentScores| {
            scores.sum_of(&[ScoreComponent::Foul, ScoreComponent::Fail])
        };
        let worst = rows.iter().map(penalty).fold(f64::NEG_INFINITY, f64::max);
        for scores in &mut rows {
            let opp_penalty = worst - penalty(&*scores);
            scores.set(ScoreComponent::OppPenalty, opp_penalty);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_float_eq::*;

    use super::*;
    use crate::{
        observation::{MetricSet, TeamId},
        scoring::{BaselineScoring, TeamScore, compose},
    };

    fn average(team: u32, metrics: MetricSet) -> (TeamId, TeamAverage) {
        (
            TeamId(team),
            TeamAverage {
                team: TeamId(team),
                matches: 1,
                observations: 1,
                metrics,
            },
        )
    }

    fn component(ranked: &[TeamScore], team: u32, c: ScoreComponent) -> f64 {
        ranked
            .iter()
            .find(|s| s.team == TeamId(team))
            .and_then(|s| s.components.get(c))
            .unwrap()
    }

    #[test]
    fn test_difficulty_weight_applies_to_upper_levels() {
        let metrics = MetricSet::ZERO
            .with(Metric::HatchBottomRocket, 1.0)
            .with(Metric::HatchMidRocket, 1.0)
            .with(Metric::HatchTopRocket, 1.0)
            .with(Metric::CargoCargoBay, 1.0)
            .with(Metric::CargoTopRocket, 2.0);
        let teams = BTreeMap::from([average(1000, metrics)]);

        let poc = compose(&PocScoring::default(), &teams);
        assert_float_absolute_eq!(
            2.0 * (1.0 + 1.1 + 1.1),
            component(&poc, 1000, ScoreComponent::Hatch)
        );
        assert_float_absolute_eq!(
            3.0 * (1.0 + 2.2),
            component(&poc, 1000, ScoreComponent::Cargo)
        );

        let baseline = compose(&BaselineScoring, &teams);
        assert_float_absolute_eq!(6.0, component(&baseline, 1000, ScoreComponent::Hatch));
        assert_float_absolute_eq!(9.0, component(&baseline, 1000, ScoreComponent::Cargo));

        let unweighted = compose(&PocScoring::new(1.0), &teams);
        assert_float_absolute_eq!(6.0, component(&unweighted, 1000, ScoreComponent::Hatch));
    }

    #[test]
    fn test_defense_score() {
        let metrics = MetricSet::ZERO
            .with(Metric::DefenseSuccess, 0.5)
            .with(Metric::PercentDefense, 40.0);
        let teams = BTreeMap::from([average(1000, metrics)]);
        let ranked = compose(&PocScoring::default(), &teams);
        assert_float_absolute_eq!(2.0, component(&ranked, 1000, ScoreComponent::Defense));
    }

    #[test]
    fn test_penalties_and_opp_penalty() {
        let teams = BTreeMap::from([
            // foul 3 + 10 = 13, fail 5 -> 18
            average(
                100,
                MetricSet::ZERO
                    .with(Metric::Fouls, 1.0)
                    .with(Metric::TechFouls, 1.0)
                    .with(Metric::RobotFail, 1.0),
            ),
            // foul 1.5, fail 5 * 0.5 = 2.5 -> 4
            average(
                200,
                MetricSet::ZERO
                    .with(Metric::Fouls, 0.5)
                    .with(Metric::TippedOver, 0.25)
                    .with(Metric::Reckless, 0.25),
            ),
            // clean record
            average(300, MetricSet::ZERO),
        ]);
        let ranked = compose(&PocScoring::default(), &teams);

        assert_float_absolute_eq!(13.0, component(&ranked, 100, ScoreComponent::Foul));
        assert_float_absolute_eq!(5.0, component(&ranked, 100, ScoreComponent::Fail));
        assert_float_absolute_eq!(2.5, component(&ranked, 200, ScoreComponent::Fail));

        assert_eq!(component(&ranked, 100, ScoreComponent::OppPenalty), 0.0);
        assert_float_absolute_eq!(14.0, component(&ranked, 200, ScoreComponent::OppPenalty));
        assert_float_absolute_eq!(18.0, component(&ranked, 300, ScoreComponent::OppPenalty));

        // raw penalties are not part of the total
        assert_float_absolute_eq!(18.0, ranked[0].total);
        assert_eq!(ranked[0].team, TeamId(300));
    }

    #[test]
    fn test_opp_penalty_non_negative_and_zero_for_worst() {
        // (team, fouls, disabled frequency); 400 and 600 share the worst record
        let records = [
            (100, 0.7, 1.0 / 3.0),
            (200, 1.4, 2.0 / 3.0),
            (300, 2.1, 0.0),
            (400, 2.8, 1.0 / 3.0),
            (500, 0.0, 2.0 / 3.0),
            (600, 2.8, 1.0 / 3.0),
            (700, 0.7, 0.0),
        ];
        let teams = records
            .iter()
            .map(|&(team, fouls, disabled)| {
                average(
                    team,
                    MetricSet::ZERO
                        .with(Metric::Fouls, fouls)
                        .with(Metric::RobotDisabled, disabled),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let ranked = compose(&PocScoring::default(), &teams);

        for score in &ranked {
            let opp = score.components.value(ScoreComponent::OppPenalty);
            assert!(opp >= 0.0, "team {} has negative opp penalty {opp}", score.team);
        }
        assert_eq!(component(&ranked, 400, ScoreComponent::OppPenalty), 0.0);
        assert_eq!(component(&ranked, 600, ScoreComponent::OppPenalty), 0.0);
        assert!(component(&ranked, 300, ScoreComponent::OppPenalty) > 0.0);
    }

    #[test]
    fn test_single_team_gets_no_opp_bonus() {
        let teams = BTreeMap::from([average(1000, MetricSet::ZERO.with(Metric::Fouls, 2.0))]);
        let ranked = compose(&PocScoring::default(), &teams);
        assert_eq!(component(&ranked, 1000, ScoreComponent::OppPenalty), 0.0);
    }
}
