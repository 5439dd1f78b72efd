pub mod command_invocations;
pub mod group_membership;
pub mod instance_directory;
pub mod parameter_store;
