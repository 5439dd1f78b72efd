/// Status filter values accepted by the SSM command invocation listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandStatus {
    Pending,
    InProgress,
    #[default]
    Success,
    Cancelled,
    TimedOut,
    Failed,
}

impl CommandStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Success => "Success",
            Self::Cancelled => "Cancelled",
            Self::TimedOut => "TimedOut",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_id: String,
    pub instance_id: Option<String>,
    pub status: Option<String>,
}

pub trait CommandInvocations {
    fn list_command_invocations(
        &self,
        command_id: &str,
        status: CommandStatus,
    ) -> Result<Vec<CommandInvocation>, String>;
}
