//! Four-dimension score records with a derived composite.
//!
//! Evaluations score finished work; difficulty ratings are optionally
//! attached at approval. Both store the raw dimensions and their arithmetic
//! mean so the composite never drifts from its inputs.

use super::RatingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn mean_of_four(a: f64, b: f64, c: f64, d: f64) -> f64 {
    (a + b + c + d) / 4.0
}

fn dimension(
    object: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<f64, RatingError> {
    let value = object.get(name).ok_or(RatingError::MissingDimension(name))?;
    value
        .as_f64()
        .filter(|score| score.is_finite())
        .ok_or(RatingError::NotNumeric(name))
}

fn ensure_finite(pairs: [(&'static str, f64); 4]) -> Result<(), RatingError> {
    match pairs.into_iter().find(|(_, score)| !score.is_finite()) {
        Some((name, _)) => Err(RatingError::NotNumeric(name)),
        None => Ok(()),
    }
}

/// Raw evaluation scores supplied by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScores {
    /// Delivered on time.
    pub timeliness: f64,
    /// Quality of the result.
    pub quality: f64,
    /// Cooperation with others.
    pub collaboration: f64,
    /// Difficulty handled.
    pub complexity: f64,
}

impl TryFrom<&Value> for EvaluationScores {
    type Error = RatingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RatingError::NotAnObject)?;
        Ok(Self {
            timeliness: dimension(object, "timeliness")?,
            quality: dimension(object, "quality")?,
            collaboration: dimension(object, "collaboration")?,
            complexity: dimension(object, "complexity")?,
        })
    }
}

/// Evaluation stored on a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(flatten)]
    scores: EvaluationScores,
    composite_score: f64,
}

impl Evaluation {
    /// Validates the scores and derives the composite.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::NotNumeric`] when a score is NaN or infinite.
    pub fn new(scores: EvaluationScores) -> Result<Self, RatingError> {
        ensure_finite([
            ("timeliness", scores.timeliness),
            ("quality", scores.quality),
            ("collaboration", scores.collaboration),
            ("complexity", scores.complexity),
        ])?;
        Ok(Self {
            scores,
            composite_score: mean_of_four(
                scores.timeliness,
                scores.quality,
                scores.collaboration,
                scores.complexity,
            ),
        })
    }

    /// Returns the raw scores.
    #[must_use]
    pub const fn scores(&self) -> &EvaluationScores {
        &self.scores
    }

    /// Returns the arithmetic mean of the four scores.
    #[must_use]
    pub const fn composite_score(&self) -> f64 {
        self.composite_score
    }
}

/// Raw difficulty scores supplied at approval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScores {
    /// How unfamiliar the work is.
    pub novelty: f64,
    /// Intricacy of the logic involved.
    pub logic_complexity: f64,
    /// Breadth of the affected area.
    pub impact_scope: f64,
    /// Coordination overhead.
    pub collaboration_cost: f64,
}

impl TryFrom<&Value> for DifficultyScores {
    type Error = RatingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RatingError::NotAnObject)?;
        Ok(Self {
            novelty: dimension(object, "novelty")?,
            logic_complexity: dimension(object, "logic_complexity")?,
            impact_scope: dimension(object, "impact_scope")?,
            collaboration_cost: dimension(object, "collaboration_cost")?,
        })
    }
}

/// Difficulty rating stored on an approved task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRating {
    #[serde(flatten)]
    scores: DifficultyScores,
    composite_difficulty_score: f64,
}

impl DifficultyRating {
    /// Validates the scores and derives the composite.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::NotNumeric`] when a score is NaN or infinite.
    pub fn new(scores: DifficultyScores) -> Result<Self, RatingError> {
        ensure_finite([
            ("novelty", scores.novelty),
            ("logic_complexity", scores.logic_complexity),
            ("impact_scope", scores.impact_scope),
            ("collaboration_cost", scores.collaboration_cost),
        ])?;
        Ok(Self {
            scores,
            composite_difficulty_score: mean_of_four(
                scores.novelty,
                scores.logic_complexity,
                scores.impact_scope,
                scores.collaboration_cost,
            ),
        })
    }

    /// Returns the raw scores.
    #[must_use]
    pub const fn scores(&self) -> &DifficultyScores {
        &self.scores
    }

    /// Returns the arithmetic mean of the four scores.
    #[must_use]
    pub const fn composite_difficulty_score(&self) -> f64 {
        self.composite_difficulty_score
    }
}
