use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::polling::PollOutcome;

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNMANAGED_INSTANCE: u16 = 409;

/// EventBridge "EC2 Spot Instance Interruption Warning" envelope.
///
/// Only `detail.instance-id` is required. The remaining envelope fields are
/// kept for logging and never influence remediation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterruptionEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "detail-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub detail: InterruptionDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterruptionDetail {
    #[serde(rename = "instance-id")]
    pub instance_id: String,
    #[serde(
        rename = "instance-action",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_action: Option<String>,
}

impl InterruptionEvent {
    pub fn from_value(event: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(event)
    }

    pub fn instance_id(&self) -> &str {
        &self.detail.instance_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl HandlerResponse {
    /// The instance carries no autoscaling group tag; nothing to remediate.
    pub fn unmanaged_instance() -> Self {
        Self {
            status_code: STATUS_UNMANAGED_INSTANCE,
            body: None,
        }
    }

    pub fn handled(summary: &HandlingSummary) -> Self {
        Self {
            status_code: STATUS_OK,
            body: Some(
                serde_json::to_string(summary).expect("handling summary should serialize"),
            ),
        }
    }

    pub fn summary(&self) -> Option<HandlingSummary> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandlingOutcome {
    Remediated,
    NotNlbNode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStatus {
    Ready,
    TimedOut,
}

impl From<PollOutcome> for ReplacementStatus {
    fn from(outcome: PollOutcome) -> Self {
        match outcome {
            PollOutcome::Met { .. } => Self::Ready,
            PollOutcome::TimedOut { .. } => Self::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlingSummary {
    pub instance_id: String,
    pub outcome: HandlingOutcome,
    pub replacement: Option<ReplacementStatus>,
}
