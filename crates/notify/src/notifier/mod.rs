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

mod eventbus;
mod function;
mod queue;
mod topic;

pub use eventbus::EventBusNotifier;
pub use function::FunctionNotifier;
pub use queue::QueueNotifier;
pub use topic::TopicNotifier;

use crate::error::{NotificationError, ValidationError};
use crate::event::{EventContext, RequestInfo};
use crate::payload::PayloadOptions;
use crate::rules::{TargetConfiguration, matches_event, matches_filter};
use crate::services::ServiceAvailability;
use crate::verify::{BucketVerificationContext, validate_entry};
use async_trait::async_trait;
use s3notify_targets::{DeliveryRequest, DestinationKind, DestinationTransport};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// What every notifier needs: a transport, the service switchboard and the
/// payload settings.
#[derive(Clone)]
pub struct NotifierBackend {
    pub transport: Arc<dyn DestinationTransport>,
    pub services: Arc<dyn ServiceAvailability>,
    pub options: PayloadOptions,
}

impl NotifierBackend {
    pub fn new(
        transport: Arc<dyn DestinationTransport>,
        services: Arc<dyn ServiceAvailability>,
        options: PayloadOptions,
    ) -> Self {
        Self {
            transport,
            services,
            options,
        }
    }
}

impl fmt::Debug for NotifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierBackend")
            .field("transport", &self.transport.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A built message bound to its transport, ready to be handed to a worker.
pub struct Delivery {
    transport: Arc<dyn DestinationTransport>,
    request: DeliveryRequest,
    bucket_name: String,
}

impl Delivery {
    pub fn new(transport: Arc<dyn DestinationTransport>, request: DeliveryRequest, bucket_name: &str) -> Self {
        Self {
            transport,
            request,
            bucket_name: bucket_name.to_string(),
        }
    }

    pub fn request(&self) -> &DeliveryRequest {
        &self.request
    }

    /// Sends the message. Failures are logged and dropped.
    pub async fn run(self) {
        let kind = self.request.message.kind();
        let destination = self.request.message.destination();
        match self.transport.send(self.request).await {
            Ok(()) => debug!("Delivered notification for bucket {} to {} {}", self.bucket_name, kind, destination),
            Err(e) => error!(
                "Unable to send notification for S3 bucket \"{}\" to {} \"{}\": {}",
                self.bucket_name, kind, destination, e
            ),
        }
    }
}

/// Matching, validation and delivery for one destination kind.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn kind(&self) -> DestinationKind;

    /// Whether `entry` selects the event and its key passes the entry's filter.
    fn should_notify(&self, ctx: &EventContext, entry: &TargetConfiguration) -> bool {
        matches_event(&entry.events, ctx.event_type.as_str()) && matches_filter(entry.filter.as_ref(), &ctx.key_name)
    }

    /// Validates and normalizes every entry, stopping at the first failure.
    async fn validate(
        &self,
        entries: &mut [TargetConfiguration],
        skip_destination_validation: bool,
        request: &RequestInfo,
        bucket_name: &str,
    ) -> Result<(), ValidationError> {
        for entry in entries.iter_mut() {
            validate_entry(self, entry, skip_destination_validation, request, bucket_name).await?;
        }
        Ok(())
    }

    /// Proves that `target_arn` exists and accepts messages from the bucket.
    async fn verify_target(&self, target_arn: &str, ctx: &BucketVerificationContext<'_>) -> Result<(), ValidationError>;

    /// Builds the destination message for `ctx` without sending it.
    fn build_delivery(&self, ctx: &EventContext, entry: &TargetConfiguration) -> Result<Delivery, NotificationError>;

    /// Builds and sends the notification. Nothing is reported back.
    async fn notify(&self, ctx: &EventContext, entry: &TargetConfiguration) {
        match self.build_delivery(ctx, entry) {
            Ok(delivery) => delivery.run().await,
            Err(e) => error!(
                "Unable to build {} notification for S3 bucket \"{}\": {}",
                self.kind(),
                ctx.bucket_name,
                e
            ),
        }
    }
}
