use thiserror::Error;

/// Faults that abort an invocation.
///
/// An unmanaged instance (409) and a readiness timeout are regular outcomes
/// and never surface here. Nothing is rolled back: a detach performed before
/// a later failure stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("invalid interruption event: {0}")]
    InvalidEvent(String),
    #[error("failed to describe instance {instance_id}: {message}")]
    DescribeInstance { instance_id: String, message: String },
    #[error("instance {instance_id} has no Name tag")]
    MissingNameTag { instance_id: String },
    #[error("failed to detach instance {instance_id} from group {group_name}: {message}")]
    DetachInstance {
        instance_id: String,
        group_name: String,
        message: String,
    },
    #[error("failed to read parameter {name}: {message}")]
    ReadParameter { name: String, message: String },
    #[error("failed to terminate instance {instance_id}: {message}")]
    TerminateInstance { instance_id: String, message: String },
    #[error("failed to list invocations for command {command_id}: {message}")]
    ListCommandInvocations { command_id: String, message: String },
}
