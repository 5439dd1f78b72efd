pub mod commands;
pub mod interruption;
pub mod remediation;
