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
use crate::event::{EventContext, RequestInfo};
use crate::payload::build_eventbridge_entry;
use crate::rules::TargetConfiguration;
use crate::verify::BucketVerificationContext;
use async_trait::async_trait;
use s3notify_targets::{DeliveryRequest, DestinationKind, OutboundMessage};

/// Puts every event on the bucket owner's default event bus.
///
/// The event bus has no per-entry settings and needs no permission, so
/// validation is a no-op and routing is left to the bus rules.
#[derive(Debug, Clone)]
pub struct EventBusNotifier {
    backend: NotifierBackend,
}

impl EventBusNotifier {
    pub fn new(backend: NotifierBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Notifier for EventBusNotifier {
    fn kind(&self) -> DestinationKind {
        DestinationKind::EventBus
    }

    fn should_notify(&self, _ctx: &EventContext, _entry: &TargetConfiguration) -> bool {
        true
    }

    async fn validate(
        &self,
        _entries: &mut [TargetConfiguration],
        _skip_destination_validation: bool,
        _request: &RequestInfo,
        _bucket_name: &str,
    ) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn verify_target(&self, _target_arn: &str, _ctx: &BucketVerificationContext<'_>) -> Result<(), ValidationError> {
        Ok(())
    }

    fn build_delivery(&self, ctx: &EventContext, _entry: &TargetConfiguration) -> Result<Delivery, NotificationError> {
        let entry = build_eventbridge_entry(ctx, &self.backend.options)?;
        let message = OutboundMessage::EventBus {
            account_id: ctx.bucket_account_id.clone(),
            region: ctx.bucket_location.clone(),
            entries: vec![entry],
        };
        Ok(Delivery::new(self.backend.transport.clone(), DeliveryRequest::new(message), &ctx.bucket_name))
    }
}
