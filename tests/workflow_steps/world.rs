//! Shared world state for workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use taskflow::access::{Actor, UserId};
use taskflow::error::ErrorKind;
use taskflow::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId},
    services::{TaskLifecycleService, TaskQueryService},
};
use taskflow::transfer::{
    adapters::memory::InMemoryTransferRepository, domain::TaskTransfer, services::TransferService,
};

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Transfer service type used by the BDD world.
pub type TestTransfers =
    TransferService<InMemoryTaskRepository, InMemoryTransferRepository, DefaultClock>;

/// Scenario world for workflow behaviour tests.
pub struct WorkflowWorld {
    pub lifecycle: TestLifecycle,
    pub transfers: TestTransfers,
    pub queries: TaskQueryService<InMemoryTaskRepository>,
    pub actors: HashMap<String, Actor>,
    pub task_id: Option<TaskId>,
    pub transfer: Option<TaskTransfer>,
    pub last_error: Option<ErrorKind>,
}

impl WorkflowWorld {
    /// Creates a world with no actors and no task.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            transfers: TransferService::new(
                Arc::clone(&tasks),
                Arc::new(InMemoryTransferRepository::new()),
                clock,
            ),
            queries: TaskQueryService::new(tasks),
            actors: HashMap::new(),
            task_id: None,
            transfer: None,
            last_error: None,
        }
    }

    /// Looks up an actor registered by name.
    pub fn actor(&self, name: &str) -> Result<Actor, eyre::Report> {
        self.actors
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no actor named {name} in scenario world"))
    }

    /// Looks up the user id of an actor registered by name.
    pub fn user_id(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.actor(name).map(|actor| actor.user_id())
    }

    /// Returns the task under test.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre!("missing task in scenario world"))
    }

    /// Reloads the task under test from the store.
    pub fn current_task(&self) -> Result<Task, eyre::Report> {
        let task_id = self.task_id()?;
        run_async(self.queries.get(task_id)).map_err(|err| eyre!("reload task: {err}"))
    }

    /// Records the outcome of a step that is allowed to fail.
    pub fn record<T>(&mut self, result: Result<T, ErrorKind>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(kind) => {
                self.last_error = Some(kind);
                None
            }
        }
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
