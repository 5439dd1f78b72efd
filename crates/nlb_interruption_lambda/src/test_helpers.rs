//! In-memory stand-ins for EC2, Auto Scaling and SSM.
//!
//! `FakeCloud` implements every adapter trait, records each call in order and
//! serves scripted parameter values so handler flows can be asserted without
//! AWS access. `RecordingSleeper` counts simulated sleeps instead of blocking.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use nlb_interruption_core::config::HandlerConfig;
use nlb_interruption_core::polling::{PollPolicy, Sleeper};
use nlb_interruption_core::tags::{Tag, AUTOSCALING_GROUP_TAG, NAME_TAG};

use crate::adapters::command_invocations::{CommandInvocation, CommandInvocations, CommandStatus};
use crate::adapters::group_membership::GroupMembership;
use crate::adapters::instance_directory::{InstanceDescription, InstanceDirectory};
use crate::adapters::parameter_store::ParameterStore;
use crate::handlers::interruption::HandlerDependencies;

pub const TEST_PROJECT: &str = "myproj";
pub const TEST_PARAM_NAME: &str = "/myproj/nlb/current-id";
pub const TEST_GROUP: &str = "myproj-nlb-asg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudCall {
    DescribeInstance {
        instance_id: String,
    },
    DetachInstance {
        instance_id: String,
        group_name: String,
        should_decrement_desired_capacity: bool,
    },
    GetParameter {
        name: String,
    },
    TerminateInstance {
        instance_id: String,
    },
    ListCommandInvocations {
        command_id: String,
        status: CommandStatus,
    },
}

/// Scripted parameter reads: values are served front to back and the last
/// one repeats forever. `fail_on_read` turns the nth read (1-based) into an
/// error.
#[derive(Debug, Default)]
struct ParameterScript {
    values: VecDeque<String>,
    reads: usize,
    fail_on_read: Option<usize>,
}

#[derive(Debug, Default)]
pub struct FakeCloud {
    instances: Mutex<HashMap<String, Vec<Tag>>>,
    parameters: Mutex<HashMap<String, ParameterScript>>,
    command_results: Mutex<VecDeque<Vec<CommandInvocation>>>,
    fail_detach: Mutex<Option<String>>,
    calls: Mutex<Vec<CloudCall>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(self, instance_id: &str, tags: Vec<Tag>) -> Self {
        self.instances
            .lock()
            .expect("poisoned mutex")
            .insert(instance_id.to_string(), tags);
        self
    }

    pub fn with_parameter_values(self, name: &str, values: &[&str]) -> Self {
        self.parameters.lock().expect("poisoned mutex").insert(
            name.to_string(),
            ParameterScript {
                values: values.iter().map(|value| value.to_string()).collect(),
                ..ParameterScript::default()
            },
        );
        self
    }

    pub fn failing_parameter_read(self, name: &str, read_number: usize) -> Self {
        self.parameters
            .lock()
            .expect("poisoned mutex")
            .entry(name.to_string())
            .or_default()
            .fail_on_read = Some(read_number);
        self
    }

    pub fn failing_detach(self, message: &str) -> Self {
        *self.fail_detach.lock().expect("poisoned mutex") = Some(message.to_string());
        self
    }

    /// Each listing call pops one batch; once drained, listings are empty.
    pub fn with_command_results(self, batches: Vec<Vec<CommandInvocation>>) -> Self {
        *self.command_results.lock().expect("poisoned mutex") = batches.into();
        self
    }

    pub fn calls(&self) -> Vec<CloudCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn detach_calls(&self) -> Vec<CloudCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, CloudCall::DetachInstance { .. }))
            .collect()
    }

    pub fn terminate_calls(&self) -> Vec<CloudCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, CloudCall::TerminateInstance { .. }))
            .collect()
    }

    pub fn parameter_reads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, CloudCall::GetParameter { .. }))
            .count()
    }

    fn record(&self, call: CloudCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }
}

impl InstanceDirectory for FakeCloud {
    fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription, String> {
        self.record(CloudCall::DescribeInstance {
            instance_id: instance_id.to_string(),
        });
        let instances = self.instances.lock().expect("poisoned mutex");
        let tags = instances.get(instance_id).ok_or_else(|| {
            format!("InvalidInstanceID.NotFound: the instance ID '{instance_id}' does not exist")
        })?;
        Ok(InstanceDescription {
            instance_id: instance_id.to_string(),
            state: Some("running".to_string()),
            tags: tags.clone(),
        })
    }

    fn terminate_instance(&self, instance_id: &str) -> Result<(), String> {
        self.record(CloudCall::TerminateInstance {
            instance_id: instance_id.to_string(),
        });
        Ok(())
    }
}

impl GroupMembership for FakeCloud {
    fn detach_instance(
        &self,
        instance_id: &str,
        group_name: &str,
        should_decrement_desired_capacity: bool,
    ) -> Result<(), String> {
        self.record(CloudCall::DetachInstance {
            instance_id: instance_id.to_string(),
            group_name: group_name.to_string(),
            should_decrement_desired_capacity,
        });
        match self.fail_detach.lock().expect("poisoned mutex").clone() {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

impl ParameterStore for FakeCloud {
    fn get_parameter_value(&self, name: &str) -> Result<String, String> {
        self.record(CloudCall::GetParameter {
            name: name.to_string(),
        });
        let mut parameters = self.parameters.lock().expect("poisoned mutex");
        let script = parameters
            .get_mut(name)
            .ok_or_else(|| format!("ParameterNotFound: {name}"))?;
        script.reads += 1;
        if script.fail_on_read == Some(script.reads) {
            return Err("ThrottlingException: rate exceeded".to_string());
        }
        let value = if script.values.len() > 1 {
            script.values.pop_front()
        } else {
            script.values.front().cloned()
        };
        value.ok_or_else(|| format!("ParameterNotFound: {name}"))
    }
}

impl CommandInvocations for FakeCloud {
    fn list_command_invocations(
        &self,
        command_id: &str,
        status: CommandStatus,
    ) -> Result<Vec<CommandInvocation>, String> {
        self.record(CloudCall::ListCommandInvocations {
            command_id: command_id.to_string(),
            status,
        });
        Ok(self
            .command_results
            .lock()
            .expect("poisoned mutex")
            .pop_front()
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("poisoned mutex").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("poisoned mutex").push(duration);
    }
}

pub fn nlb_tags(name: &str) -> Vec<Tag> {
    vec![
        Tag::new("aws:ec2spot:fleet-request-id", "sfr-0d1f"),
        Tag::new(NAME_TAG, name),
        Tag::new(AUTOSCALING_GROUP_TAG, TEST_GROUP),
    ]
}

pub fn test_config() -> HandlerConfig {
    HandlerConfig {
        region: Some("eu-west-1".to_string()),
        project: TEST_PROJECT.to_string(),
        current_nlb_id_param_name: TEST_PARAM_NAME.to_string(),
        nlb_readiness: PollPolicy::nlb_readiness(),
    }
}

pub fn fake_dependencies<'a>(
    cloud: &'a FakeCloud,
    sleeper: &'a RecordingSleeper,
) -> HandlerDependencies<'a> {
    HandlerDependencies {
        instances: cloud,
        groups: cloud,
        parameters: cloud,
        sleeper,
    }
}
