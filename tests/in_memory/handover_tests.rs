//! Ownership handover across the lifecycle, query and transfer services.

use super::helpers::{Platform, platform};
use crate::test_helpers::date;
use rstest::rstest;
use taskflow::error::ErrorKind;
use taskflow::task::domain::{SubtaskDraft, TaskStatus};
use taskflow::transfer::{
    domain::{TransferDecision, TransferStatus},
    services::SecondaryEffect,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_handover_moves_task_and_owned_subtasks(platform: Platform) -> eyre::Result<()> {
    let lead = platform.executor("Lead").await;
    let successor = platform.executor("Successor").await;
    let parent = platform
        .claimed_task(&lead, "Migrate billing", 10, Some(date(2026, 10, 30)))
        .await;
    let child = platform
        .lifecycle
        .create_subtask(
            &lead,
            parent.id(),
            SubtaskDraft {
                title: "Export ledgers".to_owned(),
                description: String::new(),
                effort: 3,
                due_date: None,
            },
        )
        .await?;
    platform.lifecycle.claim(&lead, child.id()).await?;

    let transfer = platform
        .transfers
        .initiate(&lead, parent.id(), successor.user_id(), 4)
        .await?;
    let parked = platform.queries.get(parent.id()).await?;
    eyre::ensure!(
        parked.status() == TaskStatus::PendingTransfer,
        "task is parked while the handover is open"
    );
    let inbox = platform.transfers.pending_for(&successor).await?;
    eyre::ensure!(inbox.len() == 1, "recipient sees the pending handover");

    let resolution = platform
        .transfers
        .respond(&successor, transfer.id(), TransferDecision::Accept)
        .await?;

    eyre::ensure!(
        resolution.transfer.status() == TransferStatus::Accepted,
        "transfer accepted"
    );
    eyre::ensure!(resolution.task.effort() == 6, "10 hours less 4 spent");
    eyre::ensure!(
        resolution.task.assignee_id() == Some(successor.user_id()),
        "recipient owns the task"
    );
    eyre::ensure!(
        matches!(resolution.cascade, SecondaryEffect::Applied { count: 1 }),
        "one subtask follows the task: {:?}",
        resolution.cascade
    );
    let moved = platform.queries.get(child.id()).await?;
    eyre::ensure!(
        moved.assignee_id() == Some(successor.user_id()),
        "subtask reassigned to the recipient"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn declined_and_withdrawn_handovers_leave_the_owner_in_place(
    platform: Platform,
) -> eyre::Result<()> {
    let owner = platform.executor("Owner").await;
    let colleague = platform.executor("Colleague").await;
    let task = platform.claimed_task(&owner, "Audit licences", 5, None).await;

    let declined = platform
        .transfers
        .initiate(&owner, task.id(), colleague.user_id(), 1)
        .await?;
    platform
        .transfers
        .respond(&colleague, declined.id(), TransferDecision::Reject)
        .await?;

    let withdrawn = platform
        .transfers
        .initiate(&owner, task.id(), colleague.user_id(), 2)
        .await?;
    platform.transfers.cancel(&owner, withdrawn.id()).await?;

    let late_answer = platform
        .transfers
        .respond(&colleague, withdrawn.id(), TransferDecision::Accept)
        .await;
    eyre::ensure!(
        late_answer.is_err_and(|err| err.kind() == ErrorKind::StateConflict),
        "a withdrawn handover cannot be accepted"
    );

    let current = platform.queries.get(task.id()).await?;
    eyre::ensure!(current.status() == TaskStatus::InProgress, "task back in progress");
    eyre::ensure!(current.assignee_id() == Some(owner.user_id()), "owner unchanged");
    eyre::ensure!(current.effort() == 5, "effort untouched");

    let history = platform.transfers.history(task.id()).await?;
    let statuses: Vec<_> = history.iter().map(|transfer| transfer.status()).collect();
    eyre::ensure!(statuses.len() == 2, "both handovers are kept");
    eyre::ensure!(
        statuses.contains(&TransferStatus::Rejected)
            && statuses.contains(&TransferStatus::Cancelled),
        "history records both outcomes: {statuses:?}"
    );
    Ok(())
}
