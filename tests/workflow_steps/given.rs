//! Given steps for workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::access::{Actor, Role, UserId};
use taskflow::task::{
    domain::{NewTask, Priority, TaskTypeId},
    services::ApproveTaskRequest,
};

#[given(r#""{name}" has the {role} role"#)]
fn actor_with_role(
    world: &mut WorkflowWorld,
    name: String,
    role: String,
) -> Result<(), eyre::Report> {
    let role = Role::try_from(role.as_str())
        .map_err(|err| eyre::eyre!("invalid role in scenario: {err}"))?;
    world.actors.insert(name, Actor::new(UserId::new(), role));
    Ok(())
}

#[given(r#""{name}" has submitted a task titled "{title}""#)]
fn submitted_task(
    world: &mut WorkflowWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    let creator = world.actor(&name)?;
    let task = run_async(world.lifecycle.create(&creator, NewTask::new(title)))
        .wrap_err("submit task for scenario")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given(r#""{name}" has approved the task with {effort:u32} hours of effort"#)]
fn approved_task(
    world: &mut WorkflowWorld,
    name: String,
    effort: u32,
) -> Result<(), eyre::Report> {
    let manager = world.actor(&name)?;
    let task_id = world.task_id()?;
    let request = ApproveTaskRequest::new(effort, Priority::Medium, TaskTypeId::new());
    run_async(world.lifecycle.approve(&manager, task_id, request))
        .wrap_err("approve task for scenario")?;
    Ok(())
}

#[given(r#""{name}" has claimed the task"#)]
fn claimed_task(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let executor = world.actor(&name)?;
    let task_id = world.task_id()?;
    run_async(world.lifecycle.claim(&executor, task_id)).wrap_err("claim task for scenario")?;
    Ok(())
}
