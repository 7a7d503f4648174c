//! Template management kept in step with the trigger registry.

use crate::access::{AccessDenied, Actor, Operation, policy};
use crate::error::ErrorKind;
use crate::periodic::{
    domain::{PeriodicDomainError, PeriodicTask, PeriodicTaskId, TemplateDraft},
    ports::{JobScheduler, PeriodicRepositoryError, PeriodicTaskRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for template management.
#[derive(Debug, Error)]
pub enum PeriodicServiceError {
    /// Template validation failed.
    #[error(transparent)]
    Domain(#[from] PeriodicDomainError),
    /// Caller may not manage templates.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PeriodicRepositoryError),
    /// The referenced template does not exist.
    #[error("periodic task not found: {0}")]
    NotFound(PeriodicTaskId),
}

impl PeriodicServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::NotFound(_) | Self::Repository(PeriodicRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Repository(PeriodicRepositoryError::DuplicateTemplate(_)) => {
                ErrorKind::StateConflict
            }
            Self::Repository(PeriodicRepositoryError::Persistence(_)) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for template service operations.
pub type PeriodicServiceResult<T> = Result<T, PeriodicServiceError>;

/// Template CRUD that re-arms or disarms triggers on every change.
#[derive(Clone)]
pub struct PeriodicTaskService<P, S, C>
where
    P: PeriodicTaskRepository,
    S: JobScheduler,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    scheduler: Arc<S>,
    clock: Arc<C>,
}

impl<P, S, C> PeriodicTaskService<P, S, C>
where
    P: PeriodicTaskRepository,
    S: JobScheduler,
    C: Clock + Send + Sync,
{
    /// Creates a template service.
    #[must_use]
    pub const fn new(repository: Arc<P>, scheduler: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            repository,
            scheduler,
            clock,
        }
    }

    /// Arms a trigger for every stored active template.
    ///
    /// Returns the number of triggers armed.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError::Repository`] when templates cannot be
    /// read.
    pub async fn bootstrap(&self) -> PeriodicServiceResult<usize> {
        let templates = self.repository.list_active().await?;
        for template in &templates {
            self.scheduler.add_job(template);
        }
        tracing::info!(jobs = templates.len(), "scheduler initialised");
        Ok(templates.len())
    }

    /// Stores a template, arming its trigger when `active`.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError`] when the caller is not management or
    /// the draft is invalid.
    pub async fn create(
        &self,
        actor: &Actor,
        draft: TemplateDraft,
        active: bool,
    ) -> PeriodicServiceResult<PeriodicTask> {
        policy::privileged(actor, Operation::ManagePeriodicTasks)?;
        let template = PeriodicTask::new(draft, active, actor.user_id(), &*self.clock)?;
        self.repository.store(&template).await?;
        self.sync(&template);
        Ok(template)
    }

    /// Replaces a template's fields and re-arms its trigger.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError`] when the caller is not management,
    /// the template is missing, or the draft is invalid.
    pub async fn update(
        &self,
        actor: &Actor,
        id: PeriodicTaskId,
        draft: TemplateDraft,
    ) -> PeriodicServiceResult<PeriodicTask> {
        policy::privileged(actor, Operation::ManagePeriodicTasks)?;
        let mut template = self.load(id).await?;
        template.revise(draft, &*self.clock)?;
        self.repository.update(&template).await?;
        self.sync(&template);
        Ok(template)
    }

    /// Switches a template on or off.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError`] when the caller is not management or
    /// the template is missing.
    pub async fn toggle(
        &self,
        actor: &Actor,
        id: PeriodicTaskId,
        active: bool,
    ) -> PeriodicServiceResult<PeriodicTask> {
        policy::privileged(actor, Operation::ManagePeriodicTasks)?;
        let mut template = self.load(id).await?;
        template.set_active(active, &*self.clock);
        self.repository.update(&template).await?;
        self.sync(&template);
        Ok(template)
    }

    /// Disarms and removes a template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError`] when the caller is not management or
    /// the template is missing.
    pub async fn delete(&self, actor: &Actor, id: PeriodicTaskId) -> PeriodicServiceResult<()> {
        policy::privileged(actor, Operation::ManagePeriodicTasks)?;
        self.scheduler.remove_job(id);
        self.repository.delete(id).await?;
        tracing::debug!(template_id = %id, "periodic task deleted");
        Ok(())
    }

    /// Lists every template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError::Repository`] when the query fails.
    pub async fn list(&self) -> PeriodicServiceResult<Vec<PeriodicTask>> {
        Ok(self.repository.list_all().await?)
    }

    /// Fetches one template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicServiceError::NotFound`] when it does not exist.
    pub async fn find(&self, id: PeriodicTaskId) -> PeriodicServiceResult<PeriodicTask> {
        self.load(id).await
    }

    async fn load(&self, id: PeriodicTaskId) -> PeriodicServiceResult<PeriodicTask> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PeriodicServiceError::NotFound(id))
    }

    fn sync(&self, template: &PeriodicTask) {
        self.scheduler.remove_job(template.id());
        if template.is_active() {
            self.scheduler.add_job(template);
        }
    }
}
