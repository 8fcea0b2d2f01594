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

use crate::error::ValidationError;
use crate::event::RequestInfo;
use crate::notifier::Notifier;
use crate::payload::TestEvent;
use crate::rules::{TargetConfiguration, normalize_filter_rules};
use crate::utils::short_uid;
use s3notify_config::notify::S3_SERVICE_PRINCIPAL;
use s3notify_targets::{
    Arn, DeliveryRequest, DestinationKind, DestinationTransport, OutboundMessage, RequestMetadata, TargetError,
    is_service_arn, s3_bucket_arn,
};
use tracing::{debug, error};

/// Data needed to check one configuration entry against its destination.
/// Lives only for the duration of the check.
#[derive(Debug, Clone, Copy)]
pub struct BucketVerificationContext<'a> {
    pub request_id: &'a str,
    pub bucket_name: &'a str,
    pub region: &'a str,
    pub configuration: &'a TargetConfiguration,
    pub skip_destination_validation: bool,
}

impl BucketVerificationContext<'_> {
    pub fn request_metadata(&self) -> RequestMetadata {
        request_metadata(self.bucket_name, self.region)
    }

    pub fn test_event(&self) -> TestEvent {
        TestEvent::new(self.bucket_name, self.request_id)
    }
}

/// Sender metadata for messages from `bucket_name`, checked by destination
/// resource policies.
pub fn request_metadata(bucket_name: &str, region: &str) -> RequestMetadata {
    RequestMetadata {
        source_arn: s3_bucket_arn(bucket_name, region),
        service_principal: S3_SERVICE_PRINCIPAL.to_string(),
    }
}

/// Validates and normalizes one queue, topic or function entry.
///
/// Assigns an id when missing, checks that the ARN belongs to the notifier's
/// service, proves the destination unless the live check is skipped and
/// capitalizes filter rule names.
pub async fn validate_entry<N>(
    notifier: &N,
    entry: &mut TargetConfiguration,
    skip_destination_validation: bool,
    request: &RequestInfo,
    bucket_name: &str,
) -> Result<(), ValidationError>
where
    N: Notifier + ?Sized,
{
    if entry.id.as_deref().is_none_or(str::is_empty) {
        entry.id = Some(short_uid());
    }

    let kind = notifier.kind();
    if !is_service_arn(&entry.arn, kind.service_name()) {
        return Err(ValidationError::InvalidArn {
            argument_name: kind.arn_argument_name().unwrap_or_default().to_string(),
            argument_value: entry.arn.clone(),
        });
    }

    if skip_destination_validation {
        debug!("Skipping destination validation for {}", entry.arn);
    } else {
        let ctx = BucketVerificationContext {
            request_id: &request.request_id,
            bucket_name,
            region: &request.region,
            configuration: &*entry,
            skip_destination_validation,
        };
        notifier.verify_target(&entry.arn, &ctx).await?;
    }

    if let Some(filter) = entry.filter.as_mut() {
        normalize_filter_rules(filter)?;
    }
    Ok(())
}

/// First half of a live check: the destination must exist.
pub(crate) async fn lookup_destination(
    transport: &dyn DestinationTransport,
    kind: DestinationKind,
    target_arn: &str,
    missing_message: &str,
) -> Result<Arn, ValidationError> {
    let not_found = || ValidationError::DestinationNotFound {
        argument_name: target_arn.to_string(),
        argument_value: missing_message.to_string(),
    };
    let arn = Arn::parse(target_arn).map_err(|e| {
        error!("Could not validate the notification destination {}: {}", target_arn, e);
        not_found()
    })?;
    transport.lookup(kind, &arn).await.map_err(|e| {
        error!("Could not validate the notification destination {}: {}", target_arn, e);
        not_found()
    })?;
    Ok(arn)
}

/// Second half of a live check: the destination must accept a test message
/// sent on behalf of the bucket.
pub(crate) async fn send_probe<F>(
    transport: &dyn DestinationTransport,
    ctx: &BucketVerificationContext<'_>,
    build: F,
) -> Result<(), TargetError>
where
    F: FnOnce(String) -> OutboundMessage + Send,
{
    let test_event = serde_json::to_string(&ctx.test_event())?;
    let request = DeliveryRequest::new(build(test_event)).with_metadata(ctx.request_metadata());
    transport.send(request).await
}
