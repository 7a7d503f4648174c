//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::access::UserId;
use crate::task::{
    domain::{
        DifficultyRating, Evaluation, PersistedTaskData, Priority, Task, TaskId, TaskStatus,
        TaskTypeId,
    },
    ports::{TaskFilter, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sum;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Conditional updates filter on the guarded status and assignee in the
/// `UPDATE` itself, so the database arbitrates racing transitions.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_if(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        self.run_blocking(move |connection| {
            let expected_assignee = guard.assignee.map(UserId::into_inner);
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::status.eq(guard.status.as_str()))
                    .filter(tasks::assignee_id.is_not_distinct_from(expected_assignee)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }
            let exists = diesel::select(diesel::dsl::exists(
                tasks::table.filter(tasks::id.eq(task_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if exists {
                Err(TaskRepositoryError::Conflict {
                    task_id,
                    expected: guard.status,
                })
            } else {
                Err(TaskRepositoryError::NotFound(task_id))
            }
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = filtered(filter)
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_task_id.eq(parent.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn subtask_effort_total(&self, parent: TaskId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let total = tasks::table
                .filter(tasks::parent_task_id.eq(parent.into_inner()))
                .select(sum(tasks::effort))
                .first::<Option<i64>>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total.unwrap_or(0)).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn count_incomplete_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = tasks::table
                .filter(tasks::parent_task_id.eq(parent.into_inner()))
                .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn reassign_subtasks(
        &self,
        parent: TaskId,
        from: UserId,
        to: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let moved = diesel::update(
                tasks::table
                    .filter(tasks::parent_task_id.eq(parent.into_inner()))
                    .filter(tasks::assignee_id.eq(from.into_inner())),
            )
            .set((
                tasks::assignee_id.eq(to.into_inner()),
                tasks::updated_at.eq(at),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(moved).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn count_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn filtered(filter: TaskFilter) -> tasks::BoxedQuery<'static, Pg> {
    let query = tasks::table.into_boxed();
    match filter {
        TaskFilter::All => query,
        TaskFilter::CreatedBy(creator) => query.filter(tasks::creator_id.eq(creator.into_inner())),
        TaskFilter::VisibleToExecutor(user) => query.filter(
            tasks::assignee_id
                .eq(user.into_inner())
                .or(tasks::status.eq(TaskStatus::InPool.as_str())),
        ),
        TaskFilter::AssignedWithStatus { assignee, status } => query
            .filter(tasks::assignee_id.eq(assignee.into_inner()))
            .filter(tasks::status.eq(status.as_str())),
    }
}

fn effort_to_column(effort: u32) -> TaskRepositoryResult<i32> {
    i32::try_from(effort).map_err(TaskRepositoryError::persistence)
}

fn effort_from_column(effort: i32) -> TaskRepositoryResult<u32> {
    u32::try_from(effort).map_err(TaskRepositoryError::persistence)
}

fn to_json<T: serde::Serialize>(
    value: Option<&T>,
) -> TaskRepositoryResult<Option<serde_json::Value>> {
    value
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)
}

pub(super) fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().map(|p| p.as_str().to_owned()),
        effort: effort_to_column(task.effort())?,
        original_effort: task.original_effort().map(effort_to_column).transpose()?,
        task_type_id: task.task_type().map(TaskTypeId::into_inner),
        creator_id: task.creator_id().into_inner(),
        reviewer_id: task.reviewer_id().map(UserId::into_inner),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        parent_task_id: task.parent_id().map(TaskId::into_inner),
        due_date: task.due_date(),
        rejection_reason: task.rejection_reason().map(str::to_owned),
        evaluation: to_json(task.evaluation())?,
        difficulty_rating: to_json(task.difficulty())?,
        created_at: task.created_at(),
        approved_at: task.approved_at(),
        claimed_at: task.claimed_at(),
        completed_at: task.completed_at(),
        updated_at: task.updated_at(),
    })
}

pub(super) fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let row = to_new_row(task)?;
    Ok(TaskChangeset {
        title: row.title,
        description: row.description,
        status: row.status,
        priority: row.priority,
        effort: row.effort,
        original_effort: row.original_effort,
        task_type_id: row.task_type_id,
        reviewer_id: row.reviewer_id,
        assignee_id: row.assignee_id,
        due_date: row.due_date,
        rejection_reason: row.rejection_reason,
        evaluation: row.evaluation,
        difficulty_rating: row.difficulty_rating,
        approved_at: row.approved_at,
        claimed_at: row.claimed_at,
        completed_at: row.completed_at,
        updated_at: row.updated_at,
    })
}

pub(super) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = row
        .priority
        .as_deref()
        .map(Priority::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let evaluation = row
        .evaluation
        .map(serde_json::from_value::<Evaluation>)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let difficulty = row
        .difficulty_rating
        .map(serde_json::from_value::<DifficultyRating>)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status,
        priority,
        effort: effort_from_column(row.effort)?,
        original_effort: row.original_effort.map(effort_from_column).transpose()?,
        task_type: row.task_type_id.map(TaskTypeId::from_uuid),
        creator_id: UserId::from_uuid(row.creator_id),
        reviewer_id: row.reviewer_id.map(UserId::from_uuid),
        assignee_id: row.assignee_id.map(UserId::from_uuid),
        parent_id: row.parent_task_id.map(TaskId::from_uuid),
        due_date: row.due_date,
        rejection_reason: row.rejection_reason,
        evaluation,
        difficulty,
        created_at: row.created_at,
        approved_at: row.approved_at,
        claimed_at: row.claimed_at,
        completed_at: row.completed_at,
        updated_at: row.updated_at,
    }))
}
