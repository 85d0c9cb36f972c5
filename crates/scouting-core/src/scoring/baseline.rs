use super::{
    CARGO_POINTS, ComponentScores, HATCH_POINTS, ScoreComponent, ScoringStrategy, ScoringVariant,
    hab_score, placement_score,
};
use crate::{aggregate::TeamAverage, observation::Metric};

/// Points a robot scores by itself: HAB start, hatch panels, cargo and climb.
///
/// ```text
/// hab   = 3 · hab_line · (start_level2 + 1)
/// hatch = 2 · Σ hatch zones
/// cargo = 3 · Σ cargo zones
/// climb = climb_score
/// total = hab + hatch + cargo + climb
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineScoring;

const COMPONENTS: &[ScoreComponent] = &[
    ScoreComponent::Hab,
    ScoreComponent::Hatch,
    ScoreComponent::Cargo,
    ScoreComponent::Climb,
];

impl ScoringStrategy for BaselineScoring {
    fn variant(&self) -> ScoringVariant {
        ScoringVariant::Baseline
    }

    fn chart_components(&self) -> &'static [ScoreComponent] {
        COMPONENTS
    }

    fn score_components(&self, teams: &[&TeamAverage]) -> Vec<ComponentScores> {
        teams
            .iter()
            .map(|team| {
                let metrics = &team.metrics;
                let mut scores = ComponentScores::default();
                scores.set(ScoreComponent::Hab, hab_score(metrics));
                scores.set(
                    ScoreComponent::Hatch,
                    placement_score(metrics, &Metric::HATCH_ZONES, HATCH_POINTS, 1.0),
                );
                scores.set(
                    ScoreComponent::Cargo,
                    placement_score(metrics, &Metric::CARGO_ZONES, CARGO_POINTS, 1.0),
                );
                scores.set(ScoreComponent::Climb, metrics[Metric::ClimbScore]);
                scores
            })
            .collect()
    }
}
