//! Live trigger registry port.

use crate::periodic::domain::{PeriodicTask, PeriodicTaskId};

/// Registry of running triggers, at most one per template.
///
/// Registration is synchronous: it arms a trigger and returns without
/// waiting for the first firing.
pub trait JobScheduler: Send + Sync {
    /// Arms a trigger for `template`, replacing any existing one.
    fn add_job(&self, template: &PeriodicTask);

    /// Disarms the template's trigger. Returns `false` if none was armed.
    fn remove_job(&self, id: PeriodicTaskId) -> bool;

    /// Returns whether a trigger is armed for the template.
    fn is_scheduled(&self, id: PeriodicTaskId) -> bool;

    /// Lists templates with an armed trigger.
    fn scheduled_jobs(&self) -> Vec<PeriodicTaskId>;
}
