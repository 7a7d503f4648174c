//! One tokio task per armed template.
//!
//! Each job sleeps until the next cron instant, runs the materializer and
//! loops. Failures are logged and the job keeps firing. A job ends when its
//! template retires, disappears or is switched off, removing its own
//! registry entry unless a newer registration has replaced it.

use crate::periodic::{
    domain::{CronSchedule, PeriodicTask, PeriodicTaskId},
    ports::{JobScheduler, MaterializeOutcome, TemplateMaterializer},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

struct ArmedJob {
    generation: u64,
    handle: JoinHandle<()>,
}

type Jobs = HashMap<PeriodicTaskId, ArmedJob>;
type Registry = Arc<Mutex<Jobs>>;

/// Entries are replaced whole, so a poisoned lock is recovered.
fn lock(registry: &Mutex<Jobs>) -> MutexGuard<'_, Jobs> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Trigger registry running each job on a tokio runtime.
///
/// Construct once at process start and share it with every component that
/// adds or removes jobs.
pub struct TokioJobScheduler<M, C>
where
    M: TemplateMaterializer + 'static,
    C: Clock + Send + Sync + 'static,
{
    materializer: Arc<M>,
    clock: Arc<C>,
    runtime: Handle,
    jobs: Registry,
    generation: AtomicU64,
}

impl<M, C> TokioJobScheduler<M, C>
where
    M: TemplateMaterializer + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an empty registry whose jobs run on `runtime`.
    #[must_use]
    pub fn new(materializer: Arc<M>, clock: Arc<C>, runtime: Handle) -> Self {
        Self {
            materializer,
            clock,
            runtime,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Disarms every job.
    pub fn shutdown(&self) {
        let mut jobs = lock(&self.jobs);
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
        tracing::info!("scheduler stopped");
    }
}

impl<M, C> JobScheduler for TokioJobScheduler<M, C>
where
    M: TemplateMaterializer + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn add_job(&self, template: &PeriodicTask) {
        let id = template.id();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let job = JobLoop {
            id,
            generation,
            schedule: template.schedule().clone(),
            materializer: Arc::clone(&self.materializer),
            clock: Arc::clone(&self.clock),
            jobs: Arc::clone(&self.jobs),
        };
        let mut jobs = lock(&self.jobs);
        let handle = self.runtime.spawn(job.run());
        if let Some(previous) = jobs.insert(id, ArmedJob { generation, handle }) {
            previous.handle.abort();
        }
        tracing::info!(
            template_id = %id,
            title = template.title(),
            schedule = %template.schedule(),
            "periodic job scheduled"
        );
    }

    fn remove_job(&self, id: PeriodicTaskId) -> bool {
        let Some(job) = lock(&self.jobs).remove(&id) else {
            return false;
        };
        job.handle.abort();
        tracing::info!(template_id = %id, "periodic job unscheduled");
        true
    }

    fn is_scheduled(&self, id: PeriodicTaskId) -> bool {
        lock(&self.jobs).contains_key(&id)
    }

    fn scheduled_jobs(&self) -> Vec<PeriodicTaskId> {
        let mut ids: Vec<PeriodicTaskId> = lock(&self.jobs).keys().copied().collect();
        ids.sort();
        ids
    }
}

struct JobLoop<M, C> {
    id: PeriodicTaskId,
    generation: u64,
    schedule: CronSchedule,
    materializer: Arc<M>,
    clock: Arc<C>,
    jobs: Registry,
}

impl<M, C> JobLoop<M, C>
where
    M: TemplateMaterializer,
    C: Clock + Send + Sync,
{
    async fn run(self) {
        loop {
            let now = self.clock.utc();
            let Some(next) = self.schedule.next_after(&now) else {
                tracing::info!(template_id = %self.id, "schedule has no further firings");
                break;
            };
            let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(delay).await;
            if !self.fire().await {
                break;
            }
        }
        let mut jobs = lock(&self.jobs);
        if jobs
            .get(&self.id)
            .is_some_and(|job| job.generation == self.generation)
        {
            jobs.remove(&self.id);
        }
    }

    /// Returns `false` once the job should stop.
    async fn fire(&self) -> bool {
        match self.materializer.materialize(self.id).await {
            Ok(MaterializeOutcome::Created(task)) => {
                tracing::info!(
                    template_id = %self.id,
                    task_id = %task.id(),
                    "periodic task created"
                );
                true
            }
            Ok(MaterializeOutcome::NotYetStarted) => true,
            Ok(
                MaterializeOutcome::Retired
                | MaterializeOutcome::Inactive
                | MaterializeOutcome::Missing,
            ) => false,
            Err(err) => {
                tracing::error!(
                    template_id = %self.id,
                    error = %err,
                    "periodic materialization failed"
                );
                true
            }
        }
    }
}
