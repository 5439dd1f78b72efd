use chrono::Utc;
use nlb_interruption_core::config::HandlerConfig;
use nlb_interruption_core::contract::{
    HandlerResponse, HandlingOutcome, HandlingSummary, InterruptionEvent,
};
use nlb_interruption_core::polling::Sleeper;
use nlb_interruption_core::tags::{autoscaling_group_name, get_tag_value, is_nlb_node, NAME_TAG};
use serde_json::Value;
use tracing::info;

use crate::adapters::group_membership::GroupMembership;
use crate::adapters::instance_directory::InstanceDirectory;
use crate::adapters::parameter_store::ParameterStore;
use crate::error::HandlerError;
use crate::handlers::remediation::remediate_interrupted_nlb;

/// External services the handler talks to, injected once per container.
#[derive(Clone, Copy)]
pub struct HandlerDependencies<'a> {
    pub instances: &'a dyn InstanceDirectory,
    pub groups: &'a dyn GroupMembership,
    pub parameters: &'a dyn ParameterStore,
    pub sleeper: &'a dyn Sleeper,
}

pub struct InterruptionHandler<'a> {
    config: HandlerConfig,
    deps: HandlerDependencies<'a>,
}

impl<'a> InterruptionHandler<'a> {
    pub fn new(config: HandlerConfig, deps: HandlerDependencies<'a>) -> Self {
        Self { config, deps }
    }

    pub fn handle(&self, event: Value) -> Result<HandlerResponse, HandlerError> {
        let event = InterruptionEvent::from_value(event)
            .map_err(|error| HandlerError::InvalidEvent(error.to_string()))?;
        self.handle_event(&event)
    }

    pub fn handle_event(&self, event: &InterruptionEvent) -> Result<HandlerResponse, HandlerError> {
        let instance_id = event.instance_id();
        let notice_age_seconds = event
            .time
            .map(|time| (Utc::now() - time).num_seconds());
        info!(
            instance_id,
            event_id = event.id.as_deref(),
            instance_action = event.detail.instance_action.as_deref(),
            notice_age_seconds,
            "spot interruption notice received"
        );

        let description = self
            .deps
            .instances
            .describe_instance(instance_id)
            .map_err(|message| HandlerError::DescribeInstance {
                instance_id: instance_id.to_string(),
                message,
            })?;
        let tags = &description.tags;

        let Some(group_name) = autoscaling_group_name(tags) else {
            info!(
                instance_id,
                "interrupted instance is not part of any autoscaling group, returning"
            );
            return Ok(HandlerResponse::unmanaged_instance());
        };

        let name = get_tag_value(tags, NAME_TAG).ok_or_else(|| HandlerError::MissingNameTag {
            instance_id: instance_id.to_string(),
        })?;
        if !is_nlb_node(name, &self.config.project) {
            info!(
                instance_id,
                group_name,
                name,
                state = description.state.as_deref(),
                "interrupted instance is not an NLB node, nothing to remediate"
            );
            return Ok(HandlerResponse::handled(&HandlingSummary {
                instance_id: instance_id.to_string(),
                outcome: HandlingOutcome::NotNlbNode,
                replacement: None,
            }));
        }

        let report = remediate_interrupted_nlb(
            &self.deps,
            &self.config.current_nlb_id_param_name,
            self.config.nlb_readiness,
            instance_id,
            group_name,
        )?;

        Ok(HandlerResponse::handled(&HandlingSummary {
            instance_id: instance_id.to_string(),
            outcome: HandlingOutcome::Remediated,
            replacement: Some(report.replacement.into()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use nlb_interruption_core::contract::ReplacementStatus;
    use nlb_interruption_core::tags::{Tag, AUTOSCALING_GROUP_TAG};
    use serde_json::json;

    use super::*;
    use crate::test_helpers::{
        fake_dependencies, nlb_tags, test_config, CloudCall, FakeCloud, RecordingSleeper,
        TEST_PARAM_NAME,
    };

    fn event_for(instance_id: &str) -> Value {
        json!({
            "detail-type": "EC2 Spot Instance Interruption Warning",
            "source": "aws.ec2",
            "time": "2026-10-19T08:15:30Z",
            "detail": {"instance-id": instance_id, "instance-action": "terminate"}
        })
    }

    #[test]
    fn unmanaged_instance_returns_conflict_without_side_effects() {
        let cloud = FakeCloud::new().with_instance("i-1", vec![Tag::new("Name", "myproj-nlb-01")]);
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let response = handler.handle(event_for("i-1")).expect("handler should succeed");

        assert_eq!(response, HandlerResponse::unmanaged_instance());
        assert_eq!(
            cloud.calls(),
            vec![CloudCall::DescribeInstance {
                instance_id: "i-1".to_string()
            }]
        );
    }

    #[test]
    fn non_nlb_member_returns_ok_without_remediation() {
        let cloud = FakeCloud::new().with_instance("i-2", nlb_tags("myproj-web-01"));
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let response = handler.handle(event_for("i-2")).expect("handler should succeed");

        assert_eq!(response.status_code, 200);
        let summary = response.summary().expect("summary body");
        assert_eq!(summary.outcome, HandlingOutcome::NotNlbNode);
        assert!(cloud.detach_calls().is_empty());
        assert!(cloud.terminate_calls().is_empty());
    }

    #[test]
    fn group_member_without_name_tag_fails_without_remediation() {
        let cloud = FakeCloud::new()
            .with_instance("i-3", vec![Tag::new(AUTOSCALING_GROUP_TAG, "workers")]);
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let error = handler
            .handle(event_for("i-3"))
            .expect_err("missing Name tag should fail the invocation");

        assert_eq!(
            error,
            HandlerError::MissingNameTag {
                instance_id: "i-3".to_string()
            }
        );
        assert!(cloud.detach_calls().is_empty());
        assert!(cloud.terminate_calls().is_empty());
    }

    #[test]
    fn nlb_node_is_remediated() {
        let cloud = FakeCloud::new()
            .with_instance("i-4", nlb_tags("myproj-nlb-02"))
            .with_parameter_values(TEST_PARAM_NAME, &["i-4", "i-5"]);
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let response = handler.handle(event_for("i-4")).expect("handler should succeed");

        let summary = response.summary().expect("summary body");
        assert_eq!(summary.outcome, HandlingOutcome::Remediated);
        assert_eq!(summary.replacement, Some(ReplacementStatus::Ready));
        assert_eq!(cloud.detach_calls().len(), 1);
        assert_eq!(cloud.terminate_calls().len(), 1);
    }

    #[test]
    fn malformed_event_is_rejected_before_any_call() {
        let cloud = FakeCloud::new();
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let error = handler
            .handle(json!({"detail": {"instance": "i-6"}}))
            .expect_err("event without instance-id should fail");

        assert!(matches!(error, HandlerError::InvalidEvent(_)));
        assert!(cloud.calls().is_empty());
    }

    #[test]
    fn unknown_instance_propagates_describe_failure() {
        let cloud = FakeCloud::new();
        let sleeper = RecordingSleeper::new();
        let handler = InterruptionHandler::new(test_config(), fake_dependencies(&cloud, &sleeper));

        let error = handler
            .handle(event_for("i-missing"))
            .expect_err("describe failure should propagate");

        assert!(error
            .to_string()
            .starts_with("failed to describe instance i-missing"));
    }
}
