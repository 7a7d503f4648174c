//! Read models returned by the personnel service.

use crate::access::{Role, UserId};
use crate::personnel::domain::StatusLight;
use crate::task::domain::{Evaluation, TaskId};
use serde::Serialize;

/// An in-progress task contributing to a member's load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTask {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
}

/// Average evaluation scores over a member's completed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Mean composite score.
    pub composite_score: f64,
    /// Mean timeliness.
    pub avg_timeliness: f64,
    /// Mean quality.
    pub avg_quality: f64,
    /// Mean collaboration.
    pub avg_collaboration: f64,
    /// Mean complexity.
    pub avg_complexity: f64,
}

impl PerformanceMetrics {
    /// Averages the given evaluations; `None` when there are none.
    #[must_use]
    pub fn from_evaluations<'a>(
        evaluations: impl IntoIterator<Item = &'a Evaluation>,
    ) -> Option<Self> {
        let mut count = 0_u32;
        let mut sums = [0.0_f64; 5];
        for evaluation in evaluations {
            let scores = evaluation.scores();
            count = count.saturating_add(1);
            for (sum, value) in sums.iter_mut().zip([
                evaluation.composite_score(),
                scores.timeliness,
                scores.quality,
                scores.collaboration,
                scores.complexity,
            ]) {
                *sum += value;
            }
        }
        if count == 0 {
            return None;
        }
        let n = f64::from(count);
        let [composite, timeliness, quality, collaboration, complexity] = sums;
        Some(Self {
            composite_score: composite / n,
            avg_timeliness: timeliness / n,
            avg_quality: quality / n,
            avg_collaboration: collaboration / n,
            avg_complexity: complexity / n,
        })
    }
}

/// Projected load of one team member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    /// Member identifier.
    pub user_id: UserId,
    /// Display name.
    pub real_name: String,
    /// Member role.
    pub role: Role,
    /// Sum of today's shares of in-progress effort, in hours.
    pub current_load_hours: f64,
    /// Capacity the load is measured against.
    pub daily_capacity_hours: f64,
    /// Load as a percentage of capacity.
    pub load_percentage: f64,
    /// Classification of `current_load_hours`.
    pub status_light: StatusLight,
    /// Tasks counted in the load.
    pub active_tasks: Vec<ActiveTask>,
    /// Whether any counted task is past its deadline.
    pub has_overdue_task: bool,
    /// Evaluation averages, for executors with evaluated work.
    pub performance: Option<PerformanceMetrics>,
}

/// Task counts for the management overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Tasks awaiting review.
    pub pending_review: u64,
    /// Approved, unclaimed tasks.
    pub in_pool: u64,
    /// Tasks being worked on.
    pub in_progress: u64,
}
