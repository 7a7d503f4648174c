//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Option<String>,
    pub effort: i32,
    pub original_effort: Option<i32>,
    pub task_type_id: Option<uuid::Uuid>,
    pub creator_id: uuid::Uuid,
    pub reviewer_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub parent_task_id: Option<uuid::Uuid>,
    pub due_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub evaluation: Option<Value>,
    pub difficulty_rating: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Option<String>,
    pub effort: i32,
    pub original_effort: Option<i32>,
    pub task_type_id: Option<uuid::Uuid>,
    pub creator_id: uuid::Uuid,
    pub reviewer_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub parent_task_id: Option<uuid::Uuid>,
    pub due_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub evaluation: Option<Value>,
    pub difficulty_rating: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by a conditional update.
///
/// Identity, creator, parent and creation time never change after insert.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks, treat_none_as_null = true)]
pub struct TaskChangeset {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Option<String>,
    pub effort: i32,
    pub original_effort: Option<i32>,
    pub task_type_id: Option<uuid::Uuid>,
    pub reviewer_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub due_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub evaluation: Option<Value>,
    pub difficulty_rating: Option<Value>,
    pub approved_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
