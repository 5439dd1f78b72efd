use nlb_interruption_core::polling::{poll_until, PollOutcome, PollPolicy, Sleeper};
use tracing::{info, warn};

use crate::adapters::parameter_store::ParameterStore;
use crate::error::HandlerError;
use crate::handlers::interruption::HandlerDependencies;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemediationReport {
    pub replacement: PollOutcome,
}

/// Hands the NLB role over to a replacement node and terminates the
/// interrupted one.
///
/// Detach (keeping desired capacity), wait for the shared parameter to move
/// off `instance_id`, terminate. Termination happens whether or not the
/// replacement was observed; the report tells the two cases apart.
pub fn remediate_interrupted_nlb(
    deps: &HandlerDependencies<'_>,
    param_name: &str,
    readiness: PollPolicy,
    instance_id: &str,
    group_name: &str,
) -> Result<RemediationReport, HandlerError> {
    info!(instance_id, group_name, "network load balancer has been interrupted");

    info!(
        instance_id,
        group_name, "detaching interrupted NLB and adding replacement node"
    );
    deps.groups
        .detach_instance(instance_id, group_name, false)
        .map_err(|message| HandlerError::DetachInstance {
            instance_id: instance_id.to_string(),
            group_name: group_name.to_string(),
            message,
        })?;

    let replacement = wait_until_new_nlb_ready(
        deps.parameters,
        deps.sleeper,
        param_name,
        readiness,
        instance_id,
    )?;
    match replacement {
        PollOutcome::Met { attempts } => {
            info!(instance_id, attempts, "replacement NLB published")
        }
        // Proceeding here may leave a gap until the replacement registers.
        PollOutcome::TimedOut { attempts } => warn!(
            instance_id,
            attempts, "replacement NLB not observed before timeout; terminating anyway"
        ),
    }

    info!(instance_id, "terminating interrupted NLB");
    deps.instances
        .terminate_instance(instance_id)
        .map_err(|message| HandlerError::TerminateInstance {
            instance_id: instance_id.to_string(),
            message,
        })?;

    Ok(RemediationReport { replacement })
}

/// Polls `param_name` until it no longer names `current_id`.
pub fn wait_until_new_nlb_ready(
    parameters: &dyn ParameterStore,
    sleeper: &dyn Sleeper,
    param_name: &str,
    policy: PollPolicy,
    current_id: &str,
) -> Result<PollOutcome, HandlerError> {
    info!(
        param_name,
        current_id,
        max_attempts = policy.max_attempts,
        "waiting for replacement NLB"
    );
    poll_until(policy, sleeper, || {
        parameters
            .get_parameter_value(param_name)
            .map(|active_id| active_id != current_id)
            .map_err(|message| HandlerError::ReadParameter {
                name: param_name.to_string(),
                message,
            })
    })
}
