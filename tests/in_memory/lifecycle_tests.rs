//! Review, pool, subtask and evaluation workflow across services.

use super::helpers::{Platform, platform};
use crate::test_helpers::date;
use rstest::rstest;
use taskflow::error::ErrorKind;
use taskflow::task::domain::{EvaluationScores, NewTask, SubtaskDraft, TaskStatus};

const SCORES: EvaluationScores = EvaluationScores {
    timeliness: 4.0,
    quality: 5.0,
    collaboration: 4.0,
    complexity: 3.0,
};

fn subtask(title: &str, effort: u32) -> SubtaskDraft {
    SubtaskDraft {
        title: title.to_owned(),
        description: String::new(),
        effort,
        due_date: None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn split_work_closes_only_after_every_subtask(platform: Platform) -> eyre::Result<()> {
    let lead = platform.executor("Lead").await;
    let helper = platform.executor("Helper").await;
    let parent = platform
        .claimed_task(&lead, "Launch portal", 10, Some(date(2026, 10, 30)))
        .await;

    let child = platform
        .lifecycle
        .create_subtask(&lead, parent.id(), subtask("Write docs", 4))
        .await?;
    eyre::ensure!(child.status() == TaskStatus::InPool, "subtask starts pooled");
    eyre::ensure!(child.due_date() == parent.due_date(), "subtask inherits deadline");

    platform.lifecycle.claim(&helper, child.id()).await?;
    platform.lifecycle.complete(&helper, child.id()).await?;

    let blocked = platform.lifecycle.complete(&lead, parent.id()).await;
    eyre::ensure!(
        blocked.as_ref().is_err_and(|err| err.kind() == ErrorKind::StateConflict),
        "parent completes before subtask evaluation: {blocked:?}"
    );

    let manager_on_subtask = platform
        .lifecycle
        .evaluate(&platform.manager, child.id(), SCORES)
        .await;
    eyre::ensure!(
        manager_on_subtask
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::PermissionDenied),
        "subtasks are scored by the parent's assignee"
    );

    platform.lifecycle.evaluate(&lead, child.id(), SCORES).await?;
    platform.lifecycle.complete(&lead, parent.id()).await?;
    let closed = platform
        .lifecycle
        .evaluate(&platform.manager, parent.id(), SCORES)
        .await?;

    eyre::ensure!(closed.status() == TaskStatus::Completed, "parent closed");
    let composite = closed
        .evaluation()
        .map(|evaluation| evaluation.composite_score());
    eyre::ensure!(
        composite.is_some_and(|score| (score - 4.0).abs() < 1e-9),
        "composite is the mean of four scores: {composite:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subtasks_may_not_exceed_the_parent_budget(platform: Platform) -> eyre::Result<()> {
    let lead = platform.executor("Lead").await;
    let parent = platform.claimed_task(&lead, "Refit office", 10, None).await;

    platform
        .lifecycle
        .create_subtask(&lead, parent.id(), subtask("Order desks", 7))
        .await?;
    let overrun = platform
        .lifecycle
        .create_subtask(&lead, parent.id(), subtask("Order chairs", 4))
        .await;

    eyre::ensure!(
        overrun.is_err_and(|err| err.kind() == ErrorKind::StateConflict),
        "7 + 4 hours exceeds a 10 hour parent"
    );
    let children = platform.queries.subtasks(parent.id()).await?;
    eyre::ensure!(children.len() == 1, "rejected subtask is not stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_requests_return_to_review_on_resubmit(platform: Platform) -> eyre::Result<()> {
    let task = platform
        .lifecycle
        .create(&platform.creator, NewTask::new("Buy a boat"))
        .await?;

    let rejected = platform
        .lifecycle
        .reject(&platform.manager, task.id(), "Out of budget")
        .await?;
    eyre::ensure!(rejected.status() == TaskStatus::Rejected, "task rejected");
    eyre::ensure!(
        rejected.rejection_reason() == Some("Out of budget"),
        "reason is kept on the task"
    );

    let resubmitted = platform
        .lifecycle
        .resubmit(&platform.creator, task.id())
        .await?;
    eyre::ensure!(
        resubmitted.status() == TaskStatus::PendingReview,
        "resubmission goes back to review"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_claims_leave_a_single_owner(platform: Platform) -> eyre::Result<()> {
    let first = platform.executor("First").await;
    let second = platform.executor("Second").await;
    let task = platform.pooled_task("Fix the printer", 2, None).await;

    let (left, right) = tokio::join!(
        platform.lifecycle.claim(&first, task.id()),
        platform.lifecycle.claim(&second, task.id()),
    );

    let winners = [left.is_ok(), right.is_ok()]
        .into_iter()
        .filter(|won| *won)
        .count();
    eyre::ensure!(winners == 1, "exactly one claim wins");
    let loser_kind = left.err().or(right.err()).map(|err| err.kind());
    eyre::ensure!(
        loser_kind == Some(ErrorKind::StateConflict),
        "losing claim is a state conflict: {loser_kind:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn visibility_follows_the_caller_role(platform: Platform) -> eyre::Result<()> {
    let worker = platform.executor("Worker").await;
    let claimed = platform.claimed_task(&worker, "Mine", 3, None).await;
    let pooled = platform.pooled_task("Up for grabs", 3, None).await;
    platform
        .lifecycle
        .create(&platform.creator, NewTask::new("Awaiting review"))
        .await?;

    let for_worker = platform.queries.list_visible(&worker).await?;
    let for_manager = platform.queries.list_visible(&platform.manager).await?;
    let for_creator = platform.queries.list_visible(&platform.creator).await?;

    let mut seen: Vec<_> = for_worker.iter().map(|task| task.id()).collect();
    seen.sort_by_key(ToString::to_string);
    let mut expected = vec![claimed.id(), pooled.id()];
    expected.sort_by_key(ToString::to_string);
    eyre::ensure!(seen == expected, "executor sees own and pooled work");
    eyre::ensure!(for_manager.len() == 3, "management sees everything");
    eyre::ensure!(for_creator.len() == 3, "creator sees what they submitted");
    Ok(())
}
