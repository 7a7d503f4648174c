//! Every service wired over one set of in-memory adapters.

use crate::test_helpers::{FixedClock, actor, date};
use chrono::NaiveDate;
use rstest::fixture;
use std::sync::Arc;
use taskflow::access::{Actor, Role};
use taskflow::calendar::{
    adapters::memory::InMemoryHolidayRepository, services::WorkingDayCalculator,
};
use taskflow::leave::{adapters::memory::InMemoryLeaveRepository, services::LeaveService};
use taskflow::periodic::{
    adapters::memory::InMemoryPeriodicTaskRepository, services::PeriodicTaskMaterializer,
};
use taskflow::personnel::{
    adapters::memory::InMemoryMemberDirectory, domain::Member, ports::MemberDirectory,
    services::PersonnelService,
};
use taskflow::settings::{
    adapters::memory::InMemorySystemConfigRepository, services::SystemSettingsService,
};
use taskflow::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTask, Priority, Task, TaskTypeId},
    services::{ApproveTaskRequest, TaskLifecycleService, TaskQueryService},
};
use taskflow::transfer::{adapters::memory::InMemoryTransferRepository, services::TransferService};

/// Lifecycle service under test.
pub type Lifecycle = TaskLifecycleService<InMemoryTaskRepository, FixedClock>;
/// Handover service under test.
pub type Transfers =
    TransferService<InMemoryTaskRepository, InMemoryTransferRepository, FixedClock>;
/// Leave service under test.
pub type Leaves = LeaveService<
    InMemoryLeaveRepository,
    InMemoryTaskRepository,
    InMemoryHolidayRepository,
    FixedClock,
>;
/// Personnel service under test.
pub type Personnel = PersonnelService<
    InMemoryMemberDirectory,
    InMemoryTaskRepository,
    InMemoryHolidayRepository,
    InMemoryLeaveRepository,
    InMemorySystemConfigRepository,
    FixedClock,
>;
/// Template materializer under test.
pub type Materializer =
    PeriodicTaskMaterializer<InMemoryPeriodicTaskRepository, InMemoryTaskRepository, FixedClock>;

/// Services sharing one task store, pinned to a single day.
pub struct Platform {
    pub clock: Arc<FixedClock>,
    pub templates: Arc<InMemoryPeriodicTaskRepository>,
    pub members: Arc<InMemoryMemberDirectory>,
    pub lifecycle: Lifecycle,
    pub queries: TaskQueryService<InMemoryTaskRepository>,
    pub transfers: Transfers,
    pub leaves: Leaves,
    pub personnel: Personnel,
    pub materializer: Materializer,
    pub manager: Actor,
    pub creator: Actor,
}

impl Platform {
    /// Wires every service with "today" set to `today`.
    pub fn on(today: NaiveDate) -> Self {
        let clock = Arc::new(FixedClock::on(today));
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let holidays = Arc::new(InMemoryHolidayRepository::new());
        let leave_store = Arc::new(InMemoryLeaveRepository::new());
        let members = Arc::new(InMemoryMemberDirectory::new());
        let templates = Arc::new(InMemoryPeriodicTaskRepository::new());

        let personnel = PersonnelService::new(
            Arc::clone(&members),
            Arc::clone(&tasks),
            WorkingDayCalculator::new(Arc::clone(&holidays), Arc::clone(&leave_store)),
            SystemSettingsService::new(Arc::new(InMemorySystemConfigRepository::new())),
            Arc::clone(&clock),
        );
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            queries: TaskQueryService::new(Arc::clone(&tasks)),
            transfers: TransferService::new(
                Arc::clone(&tasks),
                Arc::new(InMemoryTransferRepository::new()),
                Arc::clone(&clock),
            ),
            leaves: LeaveService::new(
                leave_store,
                Arc::clone(&tasks),
                holidays,
                Arc::clone(&clock),
            ),
            materializer: PeriodicTaskMaterializer::new(
                Arc::clone(&templates),
                tasks,
                Arc::clone(&clock),
            ),
            personnel,
            clock,
            templates,
            members,
            manager: actor(Role::Manager),
            creator: actor(Role::Creator),
        }
    }

    /// Registers an executor in the member directory.
    pub async fn executor(&self, name: &str) -> Actor {
        let executor = actor(Role::Executor);
        self.members
            .save(&Member::new(executor.user_id(), name, Role::Executor))
            .await
            .expect("member saved");
        executor
    }

    /// Submits and approves a task so it sits in the pool.
    pub async fn pooled_task(&self, title: &str, effort: u32, due: Option<NaiveDate>) -> Task {
        let draft = match due {
            Some(due_date) => NewTask::new(title).with_due_date(due_date),
            None => NewTask::new(title),
        };
        let task = self
            .lifecycle
            .create(&self.creator, draft)
            .await
            .expect("task submitted");
        self.lifecycle
            .approve(
                &self.manager,
                task.id(),
                ApproveTaskRequest::new(effort, Priority::High, TaskTypeId::new()),
            )
            .await
            .expect("task approved")
    }

    /// Pools a task and lets `owner` claim it.
    pub async fn claimed_task(
        &self,
        owner: &Actor,
        title: &str,
        effort: u32,
        due: Option<NaiveDate>,
    ) -> Task {
        let task = self.pooled_task(title, effort, due).await;
        self.lifecycle
            .claim(owner, task.id())
            .await
            .expect("task claimed")
    }
}

/// Platform pinned to Monday 2026-10-19.
#[fixture]
pub fn platform() -> Platform {
    Platform::on(date(2026, 10, 19))
}
