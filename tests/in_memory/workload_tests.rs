//! Leave requests checked against deadlines, and the load they leave behind.

use super::helpers::{Platform, platform};
use crate::test_helpers::date;
use rstest::rstest;
use taskflow::access::UserId;
use taskflow::error::ErrorKind;
use taskflow::leave::services::LeaveServiceError;
use taskflow::personnel::domain::{LoadReport, StatusLight};

async fn report_for(platform: &Platform, user_id: UserId) -> eyre::Result<LoadReport> {
    platform
        .personnel
        .load_reports(&platform.manager)
        .await?
        .into_iter()
        .find(|report| report.user_id == user_id)
        .ok_or_else(|| eyre::eyre!("no report for {user_id}"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_leave_raises_the_daily_load(platform: Platform) -> eyre::Result<()> {
    let dana = platform.executor("Dana").await;
    platform
        .claimed_task(&dana, "Quarterly report", 10, Some(date(2026, 10, 23)))
        .await;

    let before = report_for(&platform, dana.user_id()).await?;
    eyre::ensure!(
        (before.current_load_hours - 2.0).abs() < 1e-9,
        "10 hours over five working days: {}",
        before.current_load_hours
    );
    eyre::ensure!(before.status_light == StatusLight::Normal, "normal load");

    platform
        .leaves
        .create(&dana, date(2026, 10, 22), date(2026, 10, 23), "Conference")
        .await?;

    let after = report_for(&platform, dana.user_id()).await?;
    eyre::ensure!(
        (after.current_load_hours - 10.0 / 3.0).abs() < 1e-9,
        "two days of leave leave three working days: {}",
        after.current_load_hours
    );
    eyre::ensure!(
        (after.load_percentage - 1000.0 / 24.0).abs() < 1e-9,
        "percentage of the eight hour default: {}",
        after.load_percentage
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_swallowing_a_deadline_is_refused(platform: Platform) -> eyre::Result<()> {
    let sam = platform.executor("Sam").await;
    let urgent = platform
        .claimed_task(&sam, "Patch the gateway", 6, Some(date(2026, 10, 20)))
        .await;

    let refused = platform
        .leaves
        .create(&sam, date(2026, 10, 19), date(2026, 10, 21), "Moving house")
        .await;

    let Err(err) = refused else {
        return Err(eyre::eyre!("leave over the only remaining days was approved"));
    };
    eyre::ensure!(err.kind() == ErrorKind::StateConflict, "conflict category");
    let LeaveServiceError::ConflictingTasks(conflicts) = err else {
        return Err(eyre::eyre!("unexpected error: {err}"));
    };
    let [conflict] = conflicts.as_slice() else {
        return Err(eyre::eyre!("expected one conflict, got {conflicts:?}"));
    };
    eyre::ensure!(conflict.task_id == urgent.id(), "conflict names the task");
    eyre::ensure!(conflict.due_date == date(2026, 10, 20), "conflict names the deadline");
    eyre::ensure!(
        platform.leaves.list(&sam).await?.is_empty(),
        "refused leave is not stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_counts_follow_the_workflow(platform: Platform) -> eyre::Result<()> {
    let ray = platform.executor("Ray").await;
    platform.claimed_task(&ray, "Renew certificates", 2, None).await;
    platform.pooled_task("Tidy the wiki", 1, None).await;
    platform.pooled_task("Rotate keys", 1, None).await;

    let summary = platform.personnel.dashboard_summary(&platform.manager).await?;

    eyre::ensure!(summary.pending_review == 0, "nothing awaiting review");
    eyre::ensure!(summary.in_pool == 2, "two pooled tasks");
    eyre::ensure!(summary.in_progress == 1, "one task in progress");

    let denied = platform.personnel.dashboard_summary(&ray).await;
    eyre::ensure!(
        denied.is_err_and(|err| err.kind() == ErrorKind::PermissionDenied),
        "executors do not see the dashboard"
    );
    Ok(())
}
