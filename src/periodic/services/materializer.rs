//! Turns a template firing into a pooled task.

use crate::periodic::{
    domain::{PeriodicTaskId, WindowPosition},
    ports::{MaterializeError, MaterializeOutcome, PeriodicTaskRepository, TemplateMaterializer},
};
use crate::task::ports::TaskRepository;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Materializer reading templates and writing tasks through their ports.
#[derive(Clone)]
pub struct PeriodicTaskMaterializer<P, T, C>
where
    P: PeriodicTaskRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    templates: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> PeriodicTaskMaterializer<P, T, C>
where
    P: PeriodicTaskRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a materializer.
    #[must_use]
    pub const fn new(templates: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            templates,
            tasks,
            clock,
        }
    }
}

#[async_trait]
impl<P, T, C> TemplateMaterializer for PeriodicTaskMaterializer<P, T, C>
where
    P: PeriodicTaskRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    async fn materialize(
        &self,
        id: PeriodicTaskId,
    ) -> Result<MaterializeOutcome, MaterializeError> {
        let Some(mut template) = self.templates.find_by_id(id).await? else {
            tracing::info!(template_id = %id, "periodic task no longer exists");
            return Ok(MaterializeOutcome::Missing);
        };
        if !template.is_active() {
            return Ok(MaterializeOutcome::Inactive);
        }
        let today = self.clock.utc().date_naive();
        match template.window_position(today) {
            WindowPosition::BeforeStart => {
                tracing::info!(template_id = %id, %today, "periodic task not yet started");
                Ok(MaterializeOutcome::NotYetStarted)
            }
            WindowPosition::AfterEnd => {
                template.set_active(false, &*self.clock);
                self.templates.update(&template).await?;
                tracing::info!(template_id = %id, %today, "periodic task retired");
                Ok(MaterializeOutcome::Retired)
            }
            WindowPosition::Open => {
                let task = template.materialize(today, &*self.clock)?;
                self.tasks.store(&task).await?;
                Ok(MaterializeOutcome::Created(Box::new(task)))
            }
        }
    }
}
