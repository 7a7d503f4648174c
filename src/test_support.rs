//! Shared helpers for unit tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use crate::access::UserId;
use crate::task::domain::{Approval, NewTask, Priority, Task, TaskTypeId};
use mockable::Clock;

/// Clock pinned to a single instant so "today" is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to 09:00 UTC on the given date.
    pub fn on(day: NaiveDate) -> Self {
        let instant = day
            .and_hms_opt(9, 0, 0)
            .expect("09:00 is a valid time")
            .and_utc();
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a calendar date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Builds a task already claimed by `assignee` with the given effort and
/// optional deadline.
pub fn in_progress_task(
    title: &str,
    assignee: UserId,
    effort: u32,
    due_date: Option<NaiveDate>,
    clock: &FixedClock,
) -> Task {
    let draft = match due_date {
        Some(due) => NewTask::new(title).with_due_date(due),
        None => NewTask::new(title),
    };
    let mut task = Task::new(draft, UserId::new(), clock).expect("valid draft");
    task.approve(
        UserId::new(),
        Approval {
            effort,
            priority: Priority::Medium,
            task_type: TaskTypeId::new(),
            difficulty: None,
        },
        clock,
    )
    .expect("approval succeeds");
    task.claim(assignee, clock).expect("claim succeeds");
    task
}
