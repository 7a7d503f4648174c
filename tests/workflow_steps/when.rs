//! When steps for workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use rstest_bdd_macros::when;
use taskflow::task::{
    domain::{EvaluationScores, Priority, TaskTypeId},
    services::ApproveTaskRequest,
};
use taskflow::transfer::domain::TransferDecision;

const SCORES: EvaluationScores = EvaluationScores {
    timeliness: 4.0,
    quality: 4.0,
    collaboration: 4.0,
    complexity: 4.0,
};

#[when(r#""{name}" approves the task with {effort:u32} hours of effort"#)]
fn approve_task(world: &mut WorkflowWorld, name: String, effort: u32) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let request = ApproveTaskRequest::new(effort, Priority::Medium, TaskTypeId::new());
    let result = run_async(world.lifecycle.approve(&actor, task_id, request));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" rejects the task because "{reason}""#)]
fn reject_task(
    world: &mut WorkflowWorld,
    name: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let result = run_async(world.lifecycle.reject(&actor, task_id, &reason));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" resubmits the task"#)]
fn resubmit_task(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let result = run_async(world.lifecycle.resubmit(&actor, task_id));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" claims the task"#)]
fn claim_task(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let result = run_async(world.lifecycle.claim(&actor, task_id));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" completes the task"#)]
fn complete_task(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let result = run_async(world.lifecycle.complete(&actor, task_id));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" evaluates the task"#)]
fn evaluate_task(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let task_id = world.task_id()?;
    let result = run_async(world.lifecycle.evaluate(&actor, task_id, SCORES));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" hands the task to "{recipient}" after {spent:u32} hours of work"#)]
fn hand_over_task(
    world: &mut WorkflowWorld,
    name: String,
    recipient: String,
    spent: u32,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let to_user = world.user_id(&recipient)?;
    let task_id = world.task_id()?;
    let result = run_async(world.transfers.initiate(&actor, task_id, to_user, spent));
    if let Some(transfer) = world.record(result.map_err(|err| err.kind())) {
        world.transfer = Some(transfer);
    }
    Ok(())
}

fn answer(
    world: &mut WorkflowWorld,
    name: &str,
    decision: TransferDecision,
) -> Result<(), eyre::Report> {
    let actor = world.actor(name)?;
    let transfer_id = world
        .transfer
        .as_ref()
        .map(|transfer| transfer.id())
        .ok_or_else(|| eyre::eyre!("missing handover in scenario world"))?;
    let result = run_async(world.transfers.respond(&actor, transfer_id, decision));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}

#[when(r#""{name}" accepts the handover"#)]
fn accept_handover(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    answer(world, &name, TransferDecision::Accept)
}

#[when(r#""{name}" rejects the handover"#)]
fn reject_handover(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    answer(world, &name, TransferDecision::Reject)
}

#[when(r#""{name}" withdraws the handover"#)]
fn withdraw_handover(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let transfer_id = world
        .transfer
        .as_ref()
        .map(|transfer| transfer.id())
        .ok_or_else(|| eyre::eyre!("missing handover in scenario world"))?;
    let result = run_async(world.transfers.cancel(&actor, transfer_id));
    world.record(result.map_err(|err| err.kind()));
    Ok(())
}
