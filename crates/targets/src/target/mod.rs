// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::arn::Arn;
use crate::error::TargetError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3notify_config::notify::{
    EVENTBRIDGE_CONFIGURATION, LAMBDA_FUNCTION_ARN, LAMBDA_FUNCTION_CONFIGURATIONS, QUEUE_ARN, QUEUE_CONFIGURATIONS,
    SERVICE_EVENTS, SERVICE_LAMBDA, SERVICE_SNS, SERVICE_SQS, TOPIC_ARN, TOPIC_CONFIGURATIONS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod memory;
pub mod webhook;

/// The `DestinationKind` enum represents the families of destinations a bucket
/// notification can be delivered to.
///
/// It includes:
/// - `Queue`: a message queue (`sqs`), configured under `QueueConfigurations`.
/// - `Topic`: a pub/sub topic (`sns`), configured under `TopicConfigurations`.
/// - `Function`: a function invocation (`lambda`), configured under `LambdaFunctionConfigurations`.
/// - `EventBus`: the default event bus (`events`), enabled by `EventBridgeConfiguration`.
///
/// example usage:
/// ```rust
/// use s3notify_targets::target::DestinationKind;
///
/// let kind = DestinationKind::from_configuration_key("QueueConfigurations").unwrap();
/// assert_eq!(kind, DestinationKind::Queue);
/// assert_eq!(kind.service_name(), "sqs");
/// assert_eq!(kind.arn_argument_name(), Some("QueueArn"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Queue,
    Topic,
    Function,
    EventBus,
}

impl DestinationKind {
    /// All kinds, in configuration walking order.
    pub const ALL: [DestinationKind; 4] = [
        DestinationKind::Queue,
        DestinationKind::Topic,
        DestinationKind::Function,
        DestinationKind::EventBus,
    ];

    /// Name of the backing service, also the service segment of a destination ARN.
    pub fn service_name(&self) -> &'static str {
        match self {
            DestinationKind::Queue => SERVICE_SQS,
            DestinationKind::Topic => SERVICE_SNS,
            DestinationKind::Function => SERVICE_LAMBDA,
            DestinationKind::EventBus => SERVICE_EVENTS,
        }
    }

    /// Key of this kind in a bucket notification configuration.
    pub fn configuration_key(&self) -> &'static str {
        match self {
            DestinationKind::Queue => QUEUE_CONFIGURATIONS,
            DestinationKind::Topic => TOPIC_CONFIGURATIONS,
            DestinationKind::Function => LAMBDA_FUNCTION_CONFIGURATIONS,
            DestinationKind::EventBus => EVENTBRIDGE_CONFIGURATION,
        }
    }

    /// Name of the destination ARN member. The event bus has no destination ARN.
    pub fn arn_argument_name(&self) -> Option<&'static str> {
        match self {
            DestinationKind::Queue => Some(QUEUE_ARN),
            DestinationKind::Topic => Some(TOPIC_ARN),
            DestinationKind::Function => Some(LAMBDA_FUNCTION_ARN),
            DestinationKind::EventBus => None,
        }
    }

    pub fn from_configuration_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.configuration_key() == key)
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_name())
    }
}

/// Who is sending: attached to every call so the destination can check its
/// resource policy against the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub source_arn: String,
    pub service_principal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationType {
    Event,
    /// Only checks that the caller is allowed to invoke the function
    DryRun,
}

/// One event-bus entry, the shape of a `PutEvents` request entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutEventsEntry {
    pub source: String,
    pub resources: Vec<String>,
    pub detail_type: String,
    /// JSON document, already serialized
    pub detail: String,
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_header: Option<String>,
}

/// A wire-ready message for one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutboundMessage {
    Queue {
        queue_arn: String,
        message_body: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        message_system_attributes: BTreeMap<String, String>,
    },
    Topic {
        topic_arn: String,
        message: String,
        subject: String,
    },
    Function {
        function_arn: String,
        invocation_type: InvocationType,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<String>,
    },
    EventBus {
        account_id: String,
        region: String,
        entries: Vec<PutEventsEntry>,
    },
}

impl OutboundMessage {
    pub fn kind(&self) -> DestinationKind {
        match self {
            OutboundMessage::Queue { .. } => DestinationKind::Queue,
            OutboundMessage::Topic { .. } => DestinationKind::Topic,
            OutboundMessage::Function { .. } => DestinationKind::Function,
            OutboundMessage::EventBus { .. } => DestinationKind::EventBus,
        }
    }

    /// Identifies where the message goes: the destination ARN, or
    /// `{account_id}:{region}` for the event bus.
    pub fn destination(&self) -> String {
        match self {
            OutboundMessage::Queue { queue_arn, .. } => queue_arn.clone(),
            OutboundMessage::Topic { topic_arn, .. } => topic_arn.clone(),
            OutboundMessage::Function { function_arn, .. } => function_arn.clone(),
            OutboundMessage::EventBus { account_id, region, .. } => format!("{account_id}:{region}"),
        }
    }
}

/// A message together with the sender metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RequestMetadata>,
    pub message: OutboundMessage,
}

impl DeliveryRequest {
    pub fn new(message: OutboundMessage) -> Self {
        Self { metadata: None, message }
    }

    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Trait for the clients that actually move a message to a destination
#[async_trait]
pub trait DestinationTransport: Send + Sync + 'static {
    /// Returns the name of the transport, used in logs
    fn name(&self) -> &str;

    /// Checks that the destination exists. No permission is required for this call.
    async fn lookup(&self, kind: DestinationKind, arn: &Arn) -> Result<(), TargetError>;

    /// Hands a message to the destination.
    async fn send(&self, request: DeliveryRequest) -> Result<(), TargetError>;
}
