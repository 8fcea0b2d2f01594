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
use s3notify_targets::{DeliveryRequest, DestinationKind, InvocationType, OutboundMessage};
use tracing::{error, warn};

/// Invokes functions asynchronously with the event record as payload.
#[derive(Debug, Clone)]
pub struct FunctionNotifier {
    backend: NotifierBackend,
}

impl FunctionNotifier {
    pub fn new(backend: NotifierBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Notifier for FunctionNotifier {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Function
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
        lookup_destination(transport, self.kind(), target_arn, "The destination Lambda does not exist").await?;

        // A dry run only checks the invoke permission, the test event is not delivered
        let probe = send_probe(transport, ctx, |_| OutboundMessage::Function {
            function_arn: target_arn.to_string(),
            invocation_type: InvocationType::DryRun,
            payload: None,
        });
        probe.await.map_err(|e| {
            error!(
                "Unable to invoke Lambda function \"{}\" for S3 bucket \"{}\": {}",
                target_arn, ctx.bucket_name, e
            );
            ValidationError::PermissionDenied {
                argument_name: format!("{target_arn}, null"),
                argument_value: format!("Not authorized to invoke function [{target_arn}]"),
            }
        })
    }

    fn build_delivery(&self, ctx: &EventContext, entry: &TargetConfiguration) -> Result<Delivery, NotificationError> {
        let notification = build_event_record(ctx, entry.id.as_deref(), &self.backend.options);
        let message = OutboundMessage::Function {
            function_arn: entry.arn.clone(),
            invocation_type: InvocationType::Event,
            payload: Some(serde_json::to_string(&notification)?),
        };
        let request = DeliveryRequest::new(message).with_metadata(request_metadata(&ctx.bucket_name, &ctx.region));
        Ok(Delivery::new(self.backend.transport.clone(), request, &ctx.bucket_name))
    }
}
