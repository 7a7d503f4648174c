//! Recurring templates producing pooled work.

use super::helpers::{Platform, platform};
use crate::test_helpers::date;
use chrono::NaiveDate;
use rstest::rstest;
use taskflow::access::UserId;
use taskflow::error::ErrorKind;
use taskflow::periodic::{
    domain::{PeriodicTask, TemplateDraft},
    ports::{MaterializeOutcome, PeriodicTaskRepository, TemplateMaterializer},
};
use taskflow::task::domain::{Priority, TaskStatus};

fn backup_check(assignee: Option<UserId>, end_date: Option<NaiveDate>) -> TemplateDraft {
    TemplateDraft {
        title: "Backup check".to_owned(),
        description: "Restore one archive".to_owned(),
        cron_expression: "0 9 * * 1".to_owned(),
        default_assignee: assignee,
        default_effort: 2,
        default_priority: Priority::Medium,
        default_task_type: None,
        start_date: Some(date(2026, 10, 1)),
        end_date,
    }
}

async fn stored(platform: &Platform, draft: TemplateDraft) -> eyre::Result<PeriodicTask> {
    let template = PeriodicTask::new(draft, true, platform.manager.user_id(), &*platform.clock)?;
    platform.templates.store(&template).await?;
    Ok(template)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn firing_reserves_the_task_for_the_default_assignee(platform: Platform) -> eyre::Result<()> {
    let keeper = platform.executor("Keeper").await;
    let bystander = platform.executor("Bystander").await;
    let template = stored(&platform, backup_check(Some(keeper.user_id()), None)).await?;

    let MaterializeOutcome::Created(task) = platform.materializer.materialize(template.id()).await?
    else {
        return Err(eyre::eyre!("template inside its window did not fire"));
    };

    eyre::ensure!(task.title() == "Backup check - 2026-10-19", "dated title");
    eyre::ensure!(task.status() == TaskStatus::InPool, "task is pooled");
    eyre::ensure!(task.effort() == 2, "template effort");
    eyre::ensure!(task.original_effort() == Some(2), "original effort recorded");
    eyre::ensure!(
        task.creator_id() == platform.manager.user_id(),
        "template author is the creator"
    );

    let poached = platform.lifecycle.claim(&bystander, task.id()).await;
    eyre::ensure!(
        poached.is_err_and(|err| err.kind() == ErrorKind::StateConflict),
        "a reserved task cannot be claimed by someone else"
    );
    let claimed = platform.lifecycle.claim(&keeper, task.id()).await?;
    eyre::ensure!(claimed.status() == TaskStatus::InProgress, "reservation honoured");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_template_retires_instead_of_firing(platform: Platform) -> eyre::Result<()> {
    let template = stored(&platform, backup_check(None, Some(date(2026, 10, 18)))).await?;

    let outcome = platform.materializer.materialize(template.id()).await?;

    eyre::ensure!(
        matches!(outcome, MaterializeOutcome::Retired),
        "window closed yesterday: {outcome:?}"
    );
    let reloaded = platform
        .templates
        .find_by_id(template.id())
        .await?
        .ok_or_else(|| eyre::eyre!("template vanished"))?;
    eyre::ensure!(!reloaded.is_active(), "retired template is switched off");
    let summary = platform.personnel.dashboard_summary(&platform.manager).await?;
    eyre::ensure!(summary.in_pool == 0, "no task produced");
    Ok(())
}
