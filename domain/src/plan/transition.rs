//! Checks on the plan snapshot a Proposer attaches to an Execution command.

use super::table::{Plan, PlanError, ProgressMarker};
use thiserror::Error;

/// Why a proposed plan snapshot is not an acceptable next step.
///
/// The message is fed back to the Proposer as the rejection reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanTransitionError {
    #[error("currentExecutionPlan is required: copy the plan and mark the next task in-progress")]
    MissingSnapshot,

    #[error("currentExecutionPlan could not be read: {0}")]
    Unparsable(#[from] PlanError),

    #[error("The plan has {expected} tasks but currentExecutionPlan has {actual}")]
    TaskCountChanged { expected: usize, actual: usize },

    #[error("Task {number} was rewritten; only its Status cell may change")]
    TaskRewritten { number: String },

    #[error(
        "Every task is done; recommend completion, or append one follow-up task marked in-progress"
    )]
    NoPendingTask,

    #[error("Task {number} is done and must stay unchanged while adding a follow-up task")]
    FinishedTaskChanged { number: String },

    #[error("No Status cell changed; mark task {expected} in-progress")]
    NoChange { expected: String },

    #[error("{count} Status cells changed; exactly one may change")]
    MultipleChanges { count: usize },

    #[error("Task {actual} was changed but the next pending task is {expected}")]
    WrongTask { expected: String, actual: String },

    #[error("Task {number} was set to '{marker}'; it must be set to in-progress")]
    WrongMarker {
        number: String,
        marker: ProgressMarker,
    },

    #[error("A completion recommendation must not change the plan")]
    CompletionChangedPlan,
}

/// Validate the Proposer's `currentExecutionPlan` against the committed plan.
///
/// A regular command must carry the plan with exactly one change: the first
/// empty task set to in-progress. Once every task is done, the one allowed
/// change is a single appended task marked in-progress (see
/// [`follow_up_plan`]). A completion recommendation may omit the snapshot;
/// if present it must match the current plan.
pub fn check_proposal_transition(
    current: &Plan,
    proposed: Option<&str>,
    is_completion: bool,
) -> Result<(), PlanTransitionError> {
    if is_completion {
        return match proposed {
            None => Ok(()),
            Some(text) => {
                let proposed = Plan::parse(text)?;
                if current.same_state(&proposed) {
                    Ok(())
                } else {
                    Err(PlanTransitionError::CompletionChangedPlan)
                }
            }
        };
    }

    let text = proposed.ok_or(PlanTransitionError::MissingSnapshot)?;
    let proposed = Plan::parse(text)?;

    if current.is_finished() {
        return check_follow_up(current, &proposed);
    }

    if proposed.tasks().len() != current.tasks().len() {
        return Err(PlanTransitionError::TaskCountChanged {
            expected: current.tasks().len(),
            actual: proposed.tasks().len(),
        });
    }

    let pending = current
        .next_pending()
        .ok_or(PlanTransitionError::NoPendingTask)?;

    let mut changed = Vec::new();
    for (before, after) in current.tasks().iter().zip(proposed.tasks()) {
        if !before.same_task(after) {
            return Err(PlanTransitionError::TaskRewritten {
                number: before.number.clone(),
            });
        }
        if before.status != after.status {
            changed.push(after);
        }
    }

    match changed.as_slice() {
        [] => Err(PlanTransitionError::NoChange {
            expected: pending.number.clone(),
        }),
        [task] if task.index != pending.index => Err(PlanTransitionError::WrongTask {
            expected: pending.number.clone(),
            actual: task.number.clone(),
        }),
        [task] if task.status != ProgressMarker::InProgress => {
            Err(PlanTransitionError::WrongMarker {
                number: task.number.clone(),
                marker: task.status,
            })
        }
        [_] => Ok(()),
        many => Err(PlanTransitionError::MultipleChanges { count: many.len() }),
    }
}

/// The plan to commit when an approved command appends a follow-up task to
/// a finished plan: the proposed table with its new last task reset to
/// empty, so it becomes the next pending task.
///
/// `None` when the plan is not finished or the snapshot is not a valid
/// follow-up.
pub fn follow_up_plan(current: &Plan, proposed: Option<&str>) -> Option<Plan> {
    if !current.is_finished() {
        return None;
    }
    let proposed = Plan::parse(proposed?).ok()?;
    check_follow_up(current, &proposed).ok()?;
    let last = proposed.tasks().len() - 1;
    Some(proposed.with_marker(last, ProgressMarker::Empty))
}

fn check_follow_up(current: &Plan, proposed: &Plan) -> Result<(), PlanTransitionError> {
    let expected = current.tasks().len() + 1;
    if proposed.tasks().len() == current.tasks().len() {
        return Err(PlanTransitionError::NoPendingTask);
    }
    if proposed.tasks().len() != expected {
        return Err(PlanTransitionError::TaskCountChanged {
            expected,
            actual: proposed.tasks().len(),
        });
    }

    for (before, after) in current.tasks().iter().zip(proposed.tasks()) {
        if !before.same_task(after) {
            return Err(PlanTransitionError::TaskRewritten {
                number: before.number.clone(),
            });
        }
        if before.status != after.status {
            return Err(PlanTransitionError::FinishedTaskChanged {
                number: before.number.clone(),
            });
        }
    }

    match proposed.tasks().last() {
        Some(task) if task.status != ProgressMarker::InProgress => {
            Err(PlanTransitionError::WrongMarker {
                number: task.number.clone(),
                marker: task.status,
            })
        }
        _ => Ok(()),
    }
}
