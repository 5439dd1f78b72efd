#![allow(dead_code)]

use nlb_interruption_lambda::handlers::interruption::InterruptionHandler;
use nlb_interruption_lambda::test_helpers::{
    fake_dependencies, test_config, FakeCloud, RecordingSleeper,
};
use serde_json::{json, Value};

/// EventBridge spot interruption warning for `instance_id`.
pub fn spot_interruption_event(instance_id: &str) -> Value {
    json!({
        "version": "0",
        "id": "7bf73129-1428-4cd3-a780-95db273d1602",
        "detail-type": "EC2 Spot Instance Interruption Warning",
        "source": "aws.ec2",
        "account": "123456789012",
        "time": "2026-10-19T08:15:30Z",
        "region": "eu-west-1",
        "resources": [format!("arn:aws:ec2:eu-west-1b:instance/{instance_id}")],
        "detail": {
            "instance-id": instance_id,
            "instance-action": "terminate"
        }
    })
}

pub fn handler_for<'a>(cloud: &'a FakeCloud, sleeper: &'a RecordingSleeper) -> InterruptionHandler<'a> {
    InterruptionHandler::new(test_config(), fake_dependencies(cloud, sleeper))
}
