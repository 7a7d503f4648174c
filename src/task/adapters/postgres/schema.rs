//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Short summary.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form details.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority set at approval.
        #[max_length = 50]
        priority -> Nullable<Varchar>,
        /// Remaining effort in hours.
        effort -> Int4,
        /// Effort fixed at approval.
        original_effort -> Nullable<Int4>,
        /// Task category.
        task_type_id -> Nullable<Uuid>,
        /// Creator.
        creator_id -> Uuid,
        /// Reviewer or assigning manager.
        reviewer_id -> Nullable<Uuid>,
        /// Current assignee.
        assignee_id -> Nullable<Uuid>,
        /// Parent task for subtasks.
        parent_task_id -> Nullable<Uuid>,
        /// Deadline.
        due_date -> Nullable<Date>,
        /// Latest rejection reason.
        rejection_reason -> Nullable<Text>,
        /// Evaluation scores and composite.
        evaluation -> Nullable<Jsonb>,
        /// Difficulty scores and composite.
        difficulty_rating -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Approval timestamp.
        approved_at -> Nullable<Timestamptz>,
        /// Claim timestamp.
        claimed_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
