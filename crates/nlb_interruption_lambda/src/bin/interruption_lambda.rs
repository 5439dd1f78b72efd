use std::future::Future;

use aws_sdk_ssm::types::{CommandFilter, CommandFilterKey};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use nlb_interruption_core::config::HandlerConfig;
use nlb_interruption_core::contract::HandlerResponse;
use nlb_interruption_core::polling::ThreadSleeper;
use nlb_interruption_core::tags::Tag;
use nlb_interruption_lambda::adapters::command_invocations::{
    CommandInvocation, CommandInvocations, CommandStatus,
};
use nlb_interruption_lambda::adapters::group_membership::GroupMembership;
use nlb_interruption_lambda::adapters::instance_directory::{
    InstanceDescription, InstanceDirectory,
};
use nlb_interruption_lambda::adapters::parameter_store::ParameterStore;
use nlb_interruption_lambda::handlers::interruption::{HandlerDependencies, InterruptionHandler};
use nlb_interruption_lambda::logging::init_json_logging;
use serde_json::Value;
use tracing::error;

struct Ec2InstanceDirectory {
    client: aws_sdk_ec2::Client,
}

struct AutoScalingGroupMembership {
    client: aws_sdk_autoscaling::Client,
}

struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

/// Runs one SDK call to completion from synchronous handler code.
fn block_on_sdk<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

impl InstanceDirectory for Ec2InstanceDirectory {
    fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription, String> {
        let client = self.client.clone();
        let output = block_on_sdk(async move {
            client
                .describe_instances()
                .instance_ids(instance_id)
                .send()
                .await
        })
        .map_err(|error| {
            format!(
                "describe_instances failed: {}",
                aws_sdk_ec2::error::DisplayErrorContext(&error)
            )
        })?;

        let instance = output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .next()
            .ok_or_else(|| format!("instance {instance_id} not found"))?;

        let tags = instance
            .tags()
            .iter()
            .map(|tag| {
                Tag::new(
                    tag.key().unwrap_or_default(),
                    tag.value().unwrap_or_default(),
                )
            })
            .collect();

        Ok(InstanceDescription {
            instance_id: instance.instance_id().unwrap_or(instance_id).to_string(),
            state: instance
                .state()
                .and_then(|state| state.name())
                .map(|name| name.as_str().to_string()),
            tags,
        })
    }

    fn terminate_instance(&self, instance_id: &str) -> Result<(), String> {
        let client = self.client.clone();
        block_on_sdk(async move {
            client
                .terminate_instances()
                .instance_ids(instance_id)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            format!(
                "terminate_instances failed: {}",
                aws_sdk_ec2::error::DisplayErrorContext(&error)
            )
        })
    }
}

impl GroupMembership for AutoScalingGroupMembership {
    fn detach_instance(
        &self,
        instance_id: &str,
        group_name: &str,
        should_decrement_desired_capacity: bool,
    ) -> Result<(), String> {
        let client = self.client.clone();
        block_on_sdk(async move {
            client
                .detach_instances()
                .instance_ids(instance_id)
                .auto_scaling_group_name(group_name)
                .should_decrement_desired_capacity(should_decrement_desired_capacity)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            format!(
                "detach_instances failed: {}",
                aws_sdk_autoscaling::error::DisplayErrorContext(&error)
            )
        })
    }
}

impl ParameterStore for SsmParameterStore {
    fn get_parameter_value(&self, name: &str) -> Result<String, String> {
        let client = self.client.clone();
        let output = block_on_sdk(async move { client.get_parameter().name(name).send().await })
            .map_err(|error| {
                format!(
                    "get_parameter failed: {}",
                    aws_sdk_ssm::error::DisplayErrorContext(&error)
                )
            })?;

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| format!("parameter {name} has no value"))
    }
}

impl CommandInvocations for SsmParameterStore {
    fn list_command_invocations(
        &self,
        command_id: &str,
        status: CommandStatus,
    ) -> Result<Vec<CommandInvocation>, String> {
        let filter = CommandFilter::builder()
            .key(CommandFilterKey::Status)
            .value(status.as_str())
            .build()
            .map_err(|error| format!("invalid command filter: {error}"))?;
        let client = self.client.clone();
        let output = block_on_sdk(async move {
            client
                .list_command_invocations()
                .command_id(command_id)
                .filters(filter)
                .details(true)
                .send()
                .await
        })
        .map_err(|error| {
            format!(
                "list_command_invocations failed: {}",
                aws_sdk_ssm::error::DisplayErrorContext(&error)
            )
        })?;

        Ok(output
            .command_invocations()
            .iter()
            .map(|invocation| CommandInvocation {
                command_id: invocation.command_id().unwrap_or(command_id).to_string(),
                instance_id: invocation.instance_id().map(str::to_string),
                status: invocation
                    .status()
                    .map(|status| status.as_str().to_string()),
            })
            .collect())
    }
}

async fn handle_request(
    handler: &InterruptionHandler<'_>,
    event: LambdaEvent<Value>,
) -> Result<HandlerResponse, Error> {
    tokio::task::block_in_place(|| handler.handle(event.payload)).map_err(|handler_error| {
        error!(error = %handler_error, "interruption handling failed");
        Error::from(handler_error)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_json_logging();

    let config = HandlerConfig::from_env()?;
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    let aws_config = loader.load().await;

    let instances = Ec2InstanceDirectory {
        client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let groups = AutoScalingGroupMembership {
        client: aws_sdk_autoscaling::Client::new(&aws_config),
    };
    let parameters = SsmParameterStore {
        client: aws_sdk_ssm::Client::new(&aws_config),
    };
    let sleeper = ThreadSleeper;

    let handler = InterruptionHandler::new(
        config,
        HandlerDependencies {
            instances: &instances,
            groups: &groups,
            parameters: &parameters,
            sleeper: &sleeper,
        },
    );

    lambda_runtime::run(service_fn(|event| handle_request(&handler, event))).await
}
