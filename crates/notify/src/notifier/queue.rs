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

use super::{Delivery, Notifier, NotifierBackend};
use crate::error::{NotificationError, ValidationError};
use crate::event::EventContext;
use crate::payload::build_event_record;
use crate::rules::TargetConfiguration;
use crate::verify::{BucketVerificationContext, lookup_destination, request_metadata, send_probe};
use async_trait::async_trait;
use s3notify_config::notify::AWS_TRACE_HEADER_ATTRIBUTE;
use s3notify_targets::{DeliveryRequest, DestinationKind, OutboundMessage};
use std::collections::BTreeMap;
use tracing::{error, warn};

/// Delivers event records to message queues.
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    backend: NotifierBackend,
}

impl QueueNotifier {
    pub fn new(backend: NotifierBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Notifier for QueueNotifier {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Queue
    }

    async fn verify_target(&self, target_arn: &str, ctx: &BucketVerificationContext<'_>) -> Result<(), ValidationError> {
        let service = self.kind().service_name();
        if !self.backend.services.is_service_enabled(service) {
            warn!(
                "Service '{}' is not enabled: skipping validation of the following destination: '{}'",
                service, target_arn
            );
            return Ok(());
        }

        let transport = self.backend.transport.as_ref();
        lookup_destination(transport, self.kind(), target_arn, "The destination queue does not exist").await?;

        let probe = send_probe(transport, ctx, |message_body| OutboundMessage::Queue {
            queue_arn: target_arn.to_string(),
            message_body,
            message_system_attributes: BTreeMap::new(),
        });
        probe.await.map_err(|e| {
            error!(
                "Unable to send test notification for S3 bucket \"{}\" to SQS queue \"{}\": {}",
                ctx.bucket_name, target_arn, e
            );
            ValidationError::PermissionDenied {
                argument_name: target_arn.to_string(),
                argument_value: "Permissions on the destination queue do not allow S3 to publish notifications from this bucket"
                    .to_string(),
            }
        })
    }

    fn build_delivery(&self, ctx: &EventContext, entry: &TargetConfiguration) -> Result<Delivery, NotificationError> {
        let notification = build_event_record(ctx, entry.id.as_deref(), &self.backend.options);
        let mut message_system_attributes = BTreeMap::new();
        if let Some(trace_id) = &ctx.trace_id {
            message_system_attributes.insert(AWS_TRACE_HEADER_ATTRIBUTE.to_string(), trace_id.clone());
        }
        let message = OutboundMessage::Queue {
            queue_arn: entry.arn.clone(),
            message_body: serde_json::to_string(&notification)?,
            message_system_attributes,
        };
        let request = DeliveryRequest::new(message).with_metadata(request_metadata(&ctx.bucket_name, &ctx.region));
        Ok(Delivery::new(self.backend.transport.clone(), request, &ctx.bucket_name))
    }
}
