//! Leave service behaviour over in-memory adapters.

use crate::access::{Actor, Role, UserId};
use crate::calendar::adapters::memory::InMemoryHolidayRepository;
use crate::error::ErrorKind;
use crate::leave::{
    adapters::memory::InMemoryLeaveRepository,
    domain::LeaveStatus,
    services::{LeaveService, LeaveServiceError},
};
use crate::task::{adapters::memory::InMemoryTaskRepository, ports::TaskRepository};
use crate::test_support::{FixedClock, date, in_progress_task};
use chrono::NaiveDate;
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestService = LeaveService<
    InMemoryLeaveRepository,
    InMemoryTaskRepository,
    InMemoryHolidayRepository,
    FixedClock,
>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    service: TestService,
    clock: Arc<FixedClock>,
    executor: Actor,
}

impl Harness {
    async fn working_on(&self, title: &str, due: Option<NaiveDate>) {
        let task = in_progress_task(title, self.executor.user_id(), 5, due, &self.clock);
        self.tasks.store(&task).await.expect("task stored");
    }
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(FixedClock::on(date(2026, 10, 19)));
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let service = LeaveService::new(
        Arc::new(InMemoryLeaveRepository::new()),
        Arc::clone(&tasks),
        Arc::new(InMemoryHolidayRepository::new()),
        Arc::clone(&clock),
    );
    Harness {
        tasks,
        service,
        clock,
        executor: Actor::new(UserId::new(), Role::Executor),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_without_tasks_is_approved(harness: Harness) {
    let leave = harness
        .service
        .create(&harness.executor, date(2026, 10, 21), date(2026, 10, 23), "Family visit")
        .await
        .expect("leave recorded");

    assert_eq!(leave.status(), LeaveStatus::Approved);
    assert_eq!(leave.user_id(), harness.executor.user_id());
    assert_eq!(leave.reason(), "Family visit");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_covering_every_remaining_day_conflicts(harness: Harness) {
    harness.working_on("Ship release", Some(date(2026, 10, 20))).await;

    let err = harness
        .service
        .create(&harness.executor, date(2026, 10, 19), date(2026, 10, 23), "Trip")
        .await
        .expect_err("leave must conflict");

    assert_eq!(err.kind(), ErrorKind::StateConflict);
    let LeaveServiceError::ConflictingTasks(conflicts) = err else {
        panic!("expected conflict list, got {err:?}");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts.first().map(|c| c.title.as_str()), Some("Ship release"));
    assert!(
        harness
            .service
            .list(&harness.executor)
            .await
            .expect("list succeeds")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_leaving_working_days_before_deadline_is_allowed(harness: Harness) {
    harness.working_on("Quarterly report", Some(date(2026, 10, 30))).await;

    let result = harness
        .service
        .create(&harness.executor, date(2026, 10, 21), date(2026, 10, 22), "Rest")
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[case::no_deadline(None)]
#[case::overdue(Some(date(2026, 10, 16)))]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_without_remaining_days_are_ignored(
    harness: Harness,
    #[case] due: Option<NaiveDate>,
) {
    harness.working_on("Open ended", due).await;

    let result = harness
        .service
        .create(&harness.executor, date(2026, 10, 19), date(2026, 10, 30), "Sabbatical")
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inverted_range_is_a_validation_error(harness: Harness) {
    let err = harness
        .service
        .create(&harness.executor, date(2026, 10, 23), date(2026, 10, 21), "Oops")
        .await
        .expect_err("range must be rejected");

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_is_listed_latest_first_and_deleted_only_by_owner(harness: Harness) {
    let early = harness
        .service
        .create(&harness.executor, date(2026, 11, 2), date(2026, 11, 3), "Early")
        .await
        .expect("leave recorded");
    let late = harness
        .service
        .create(&harness.executor, date(2026, 12, 21), date(2026, 12, 24), "Late")
        .await
        .expect("leave recorded");

    let listed = harness
        .service
        .list(&harness.executor)
        .await
        .expect("list succeeds");
    assert_eq!(
        listed.iter().map(|leave| leave.id()).collect::<Vec<_>>(),
        vec![late.id(), early.id()]
    );

    let stranger = Actor::new(UserId::new(), Role::Executor);
    let err = harness
        .service
        .delete(&stranger, early.id())
        .await
        .expect_err("stranger cannot delete");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    harness
        .service
        .delete(&harness.executor, early.id())
        .await
        .expect("owner deletes");
    assert_eq!(
        harness
            .service
            .list(&harness.executor)
            .await
            .expect("list succeeds")
            .len(),
        1
    );
}
