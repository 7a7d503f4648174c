//! Handover workflow over in-memory adapters.

use crate::access::{Actor, Role, UserId};
use crate::error::ErrorKind;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{SubtaskDraft, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use crate::test_support::{FixedClock, date, in_progress_task};
use crate::transfer::{
    adapters::memory::InMemoryTransferRepository,
    domain::{TaskTransfer, TransferDecision, TransferId, TransferStatus},
    ports::{TransferRepository, TransferRepositoryResult},
    services::{SecondaryEffect, TransferService},
};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestService = TransferService<InMemoryTaskRepository, InMemoryTransferRepository, FixedClock>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    transfers: Arc<InMemoryTransferRepository>,
    service: TestService,
    clock: Arc<FixedClock>,
    owner: Actor,
    colleague: Actor,
}

impl Harness {
    async fn owned_task(&self, effort: u32) -> Task {
        let task = in_progress_task(
            "Migrate billing",
            self.owner.user_id(),
            effort,
            Some(date(2026, 10, 30)),
            &self.clock,
        );
        self.tasks.store(&task).await.expect("task stored");
        task
    }

    async fn reload(&self, task: &Task) -> Task {
        self.tasks
            .find_by_id(task.id())
            .await
            .expect("lookup succeeds")
            .expect("task exists")
    }
}

/// Returns one handover as it looked when first read; writes go through.
struct StaleReads {
    inner: Arc<InMemoryTransferRepository>,
    snapshot: TaskTransfer,
}

#[async_trait]
impl TransferRepository for StaleReads {
    async fn store(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()> {
        self.inner.store(transfer).await
    }

    async fn update_if_pending(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()> {
        self.inner.update_if_pending(transfer).await
    }

    async fn reopen(&self, pending: &TaskTransfer) -> TransferRepositoryResult<()> {
        self.inner.reopen(pending).await
    }

    async fn find_by_id(&self, id: TransferId) -> TransferRepositoryResult<Option<TaskTransfer>> {
        if id == self.snapshot.id() {
            return Ok(Some(self.snapshot.clone()));
        }
        self.inner.find_by_id(id).await
    }

    async fn list_by_task(&self, task_id: TaskId) -> TransferRepositoryResult<Vec<TaskTransfer>> {
        self.inner.list_by_task(task_id).await
    }

    async fn list_pending_for_recipient(
        &self,
        recipient: UserId,
    ) -> TransferRepositoryResult<Vec<TaskTransfer>> {
        self.inner.list_pending_for_recipient(recipient).await
    }
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(FixedClock::on(date(2026, 10, 19)));
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let transfers = Arc::new(InMemoryTransferRepository::new());
    let service = TransferService::new(
        Arc::clone(&tasks),
        Arc::clone(&transfers),
        Arc::clone(&clock),
    );
    Harness {
        tasks,
        transfers,
        service,
        clock,
        owner: Actor::new(UserId::new(), Role::Executor),
        colleague: Actor::new(UserId::new(), Role::Executor),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_transfer_deducts_spent_effort(harness: Harness) {
    let task = harness.owned_task(10).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 3)
        .await
        .expect("transfer initiated");
    assert_eq!(harness.reload(&task).await.status(), TaskStatus::PendingTransfer);

    let resolution = harness
        .service
        .respond(&harness.colleague, transfer.id(), TransferDecision::Accept)
        .await
        .expect("transfer accepted");

    assert_eq!(resolution.transfer.status(), TransferStatus::Accepted);
    let stored = harness.reload(&task).await;
    assert_eq!(stored.status(), TaskStatus::InProgress);
    assert_eq!(stored.assignee_id(), Some(harness.colleague.user_id()));
    assert_eq!(stored.effort(), 7);
    assert!(matches!(resolution.cascade, SecondaryEffect::Applied { count: 0 }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overspent_effort_floors_at_zero(harness: Harness) {
    let task = harness.owned_task(4).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 9)
        .await
        .expect("transfer initiated");

    let resolution = harness
        .service
        .respond(&harness.colleague, transfer.id(), TransferDecision::Accept)
        .await
        .expect("transfer accepted");

    assert_eq!(resolution.task.effort(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_moves_the_previous_assignees_subtasks(harness: Harness) {
    let parent = harness.owned_task(10).await;
    let mut subtask = Task::new_subtask(
        &parent,
        SubtaskDraft {
            title: "Write adapter".to_owned(),
            description: String::new(),
            effort: 4,
            due_date: None,
        },
        harness.owner.user_id(),
        &*harness.clock,
    )
    .expect("subtask fits the budget");
    subtask
        .claim(harness.owner.user_id(), &*harness.clock)
        .expect("owner claims subtask");
    harness.tasks.store(&subtask).await.expect("subtask stored");

    let transfer = harness
        .service
        .initiate(&harness.owner, parent.id(), harness.colleague.user_id(), 1)
        .await
        .expect("transfer initiated");
    let resolution = harness
        .service
        .respond(&harness.colleague, transfer.id(), TransferDecision::Accept)
        .await
        .expect("transfer accepted");

    assert!(matches!(resolution.cascade, SecondaryEffect::Applied { count: 1 }));
    assert_eq!(
        harness.reload(&subtask).await.assignee_id(),
        Some(harness.colleague.user_id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_rejection_conflicts_and_leaves_task_alone(harness: Harness) {
    let task = harness.owned_task(6).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 0)
        .await
        .expect("transfer initiated");
    harness
        .service
        .respond(&harness.colleague, transfer.id(), TransferDecision::Reject)
        .await
        .expect("first rejection succeeds");

    let err = harness
        .service
        .respond(&harness.colleague, transfer.id(), TransferDecision::Reject)
        .await
        .expect_err("second rejection fails");

    assert_eq!(err.kind(), ErrorKind::StateConflict);
    let stored = harness.reload(&task).await;
    assert_eq!(stored.status(), TaskStatus::InProgress);
    assert_eq!(stored.assignee_id(), Some(harness.owner.user_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_cancellation_conflicts(harness: Harness) {
    let task = harness.owned_task(6).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 0)
        .await
        .expect("transfer initiated");
    harness
        .service
        .cancel(&harness.owner, transfer.id())
        .await
        .expect("cancellation succeeds");

    let err = harness
        .service
        .cancel(&harness.owner, transfer.id())
        .await
        .expect_err("second cancellation fails");

    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_eq!(harness.reload(&task).await.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_named_parties_may_answer_or_withdraw(harness: Harness) {
    let task = harness.owned_task(6).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 0)
        .await
        .expect("transfer initiated");
    let outsider = Actor::new(UserId::new(), Role::Manager);

    let respond = harness
        .service
        .respond(&outsider, transfer.id(), TransferDecision::Accept)
        .await
        .expect_err("outsider cannot answer");
    let cancel = harness
        .service
        .cancel(&harness.colleague, transfer.id())
        .await
        .expect_err("recipient cannot withdraw");

    assert_eq!(respond.kind(), ErrorKind::PermissionDenied);
    assert_eq!(cancel.kind(), ErrorKind::PermissionDenied);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_parked_task_cannot_be_offered_twice(harness: Harness) {
    let task = harness.owned_task(6).await;
    harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 0)
        .await
        .expect("first offer succeeds");

    let err = harness
        .service
        .initiate(&harness.owner, task.id(), UserId::new(), 0)
        .await
        .expect_err("second offer fails");

    assert_eq!(err.kind(), ErrorKind::StateConflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_assignee_cannot_initiate(harness: Harness) {
    let task = harness.owned_task(6).await;

    let err = harness
        .service
        .initiate(&harness.colleague, task.id(), UserId::new(), 0)
        .await
        .expect_err("only the assignee may offer");

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_offers_are_listed_for_the_recipient(harness: Harness) {
    let task = harness.owned_task(6).await;
    let transfer = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 0)
        .await
        .expect("transfer initiated");

    let pending = harness
        .service
        .pending_for(&harness.colleague)
        .await
        .expect("listing succeeds");
    let history = harness
        .service
        .history(task.id())
        .await
        .expect("history succeeds");

    assert_eq!(pending.len(), 1);
    assert_eq!(pending.first().map(|t| t.id()), Some(transfer.id()));
    assert_eq!(history.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_answer_to_a_withdrawn_offer_leaves_the_next_offer_intact(harness: Harness) {
    let task = harness.owned_task(10).await;
    let withdrawn = harness
        .service
        .initiate(&harness.owner, task.id(), harness.colleague.user_id(), 1)
        .await
        .expect("first offer initiated");
    harness
        .service
        .cancel(&harness.owner, withdrawn.id())
        .await
        .expect("first offer withdrawn");
    let successor = Actor::new(UserId::new(), Role::Executor);
    let current = harness
        .service
        .initiate(&harness.owner, task.id(), successor.user_id(), 2)
        .await
        .expect("second offer initiated");

    let lagging = TransferService::new(
        Arc::clone(&harness.tasks),
        Arc::new(StaleReads {
            inner: Arc::clone(&harness.transfers),
            snapshot: withdrawn.clone(),
        }),
        Arc::clone(&harness.clock),
    );
    let err = lagging
        .respond(&harness.colleague, withdrawn.id(), TransferDecision::Accept)
        .await
        .expect_err("withdrawn offer cannot be accepted");

    assert_eq!(err.kind(), ErrorKind::StateConflict);
    let parked = harness.reload(&task).await;
    assert_eq!(parked.status(), TaskStatus::PendingTransfer);
    assert_eq!(parked.assignee_id(), Some(harness.owner.user_id()));
    assert_eq!(parked.effort(), 10);

    let resolution = harness
        .service
        .respond(&successor, current.id(), TransferDecision::Accept)
        .await
        .expect("second offer still answerable");
    assert_eq!(resolution.task.assignee_id(), Some(successor.user_id()));
    assert_eq!(resolution.task.effort(), 8);
}
