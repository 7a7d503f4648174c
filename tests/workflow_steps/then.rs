//! Then steps for workflow BDD scenarios.

use super::world::WorkflowWorld;
use rstest_bdd_macros::then;
use taskflow::task::domain::TaskStatus;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.current_task()?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the task is assigned to "{name}""#)]
fn task_assigned_to(world: &WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.user_id(&name)?;
    let task = world.current_task()?;
    if task.assignee_id() != Some(expected) {
        return Err(eyre::eyre!(
            "expected {name} to own the task, found {:?}",
            task.assignee_id()
        ));
    }
    Ok(())
}

#[then("the task has {hours:u32} hours of effort remaining")]
fn task_effort_remaining(world: &WorkflowWorld, hours: u32) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.effort() != hours {
        return Err(eyre::eyre!(
            "expected {hours} hours remaining, found {}",
            task.effort()
        ));
    }
    Ok(())
}

#[then(r#"the last operation fails with "{kind}""#)]
fn last_operation_fails_with(world: &WorkflowWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_error {
        Some(actual) if actual.as_str() == kind => Ok(()),
        Some(actual) => Err(eyre::eyre!("expected {kind} failure, got {actual}")),
        None => Err(eyre::eyre!("expected {kind} failure, but the operation succeeded")),
    }
}
