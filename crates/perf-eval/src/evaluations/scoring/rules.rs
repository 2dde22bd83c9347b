use super::super::domain::{Criterion, RubricScores};
use super::policy::{ScoringPolicy, RUBRIC_MAX_SCORE, RUBRIC_MIN_SCORE, UNSCORED};
use super::{KpiMeasurement, ScoringError};

/// Achieved over target as a percentage. Undefined for a zero target.
pub(crate) fn efficiency(target_value: f64, achieved_value: f64) -> Option<f64> {
    if target_value == 0.0 || !target_value.is_finite() || !achieved_value.is_finite() {
        return None;
    }
    Some(achieved_value / target_value * 100.0)
}

pub(crate) fn capped(efficiency: f64, policy: &ScoringPolicy) -> f64 {
    efficiency.min(policy.efficiency_cap)
}

/// Mean of capped efficiencies. Plans without a defined efficiency are skipped.
pub(crate) fn aggregate<M: KpiMeasurement>(items: &[M], policy: &ScoringPolicy) -> f64 {
    let (sum, count) = items
        .iter()
        .filter_map(|item| efficiency(item.target_value(), item.achieved_value()))
        .map(|value| capped(value, policy))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Share of the maximum weighted rubric score, as a percentage.
pub(crate) fn weighted_percentage<I>(items: I) -> f64
where
    I: IntoIterator<Item = (u8, u32, u8)>,
{
    let (earned, possible) = items.into_iter().fold(
        (0.0_f64, 0.0_f64),
        |(earned, possible), (score, weight, max_score)| {
            (
                earned + f64::from(score) * f64::from(weight),
                possible + f64::from(max_score) * f64::from(weight),
            )
        },
    );

    if possible == 0.0 {
        0.0
    } else {
        earned / possible * 100.0
    }
}

/// Bands an aggregate plan score onto every criterion.
pub(crate) fn band_criteria(
    aggregate: f64,
    criteria: &[Criterion],
    policy: &ScoringPolicy,
    default_score: u8,
) -> RubricScores {
    let band = policy.band_for(aggregate);
    criteria
        .iter()
        .map(|criterion| {
            let score = if ScoringPolicy::is_plan_driven(&criterion.name) {
                band
            } else {
                default_score
            };
            (criterion.id, score)
        })
        .collect()
}

/// Checks manager-entered scores against the rubric before they are totalled.
/// An `UNSCORED` entry is treated like a missing one.
pub(crate) fn validate_manual_scores(
    criteria: &[Criterion],
    scores: &RubricScores,
) -> Result<(), ScoringError> {
    for (criterion_id, score) in scores {
        let criterion = criteria
            .iter()
            .find(|criterion| criterion.id == *criterion_id)
            .ok_or(ScoringError::UnknownCriterion(*criterion_id))?;

        if *score == UNSCORED {
            continue;
        }

        let ceiling = criterion.max_score.min(RUBRIC_MAX_SCORE);
        if *score < RUBRIC_MIN_SCORE || *score > ceiling {
            return Err(ScoringError::ScoreOutOfRange {
                criterion: criterion.name.clone(),
                score: *score,
                max: ceiling,
            });
        }
    }
    Ok(())
}
