//! Waiting on SSM Run Command results.
//!
//! Not part of the interruption flow; kept for remediation steps that run a
//! command on an instance and need to block until it reports back.

use nlb_interruption_core::polling::{poll_until, PollOutcome, PollPolicy, Sleeper};
use tracing::info;

use crate::adapters::command_invocations::{CommandInvocation, CommandInvocations, CommandStatus};
use crate::error::HandlerError;

pub fn get_command_by_status(
    commands: &dyn CommandInvocations,
    command_id: &str,
    status: CommandStatus,
) -> Result<Vec<CommandInvocation>, HandlerError> {
    commands
        .list_command_invocations(command_id, status)
        .map_err(|message| HandlerError::ListCommandInvocations {
            command_id: command_id.to_string(),
            message,
        })
}

/// Blocks until at least one invocation of `command_id` reports `status`, or
/// the policy runs out of attempts.
pub fn wait_until_command_complete(
    commands: &dyn CommandInvocations,
    sleeper: &dyn Sleeper,
    command_id: &str,
    status: CommandStatus,
    policy: PollPolicy,
) -> Result<PollOutcome, HandlerError> {
    let outcome = poll_until(policy, sleeper, || {
        get_command_by_status(commands, command_id, status)
            .map(|invocations| !invocations.is_empty())
    })?;
    info!(
        command_id,
        status = status.as_str(),
        completed = outcome.is_met(),
        attempts = outcome.attempts(),
        "finished waiting for command"
    );
    Ok(outcome)
}
