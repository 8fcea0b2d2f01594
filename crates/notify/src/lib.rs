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

//! S3 bucket event notifications.
//!
//! An [`EventContext`] describes one object-level event. The
//! [`NotificationDispatcher`] matches it against a bucket's
//! [`NotificationConfiguration`], builds the payload of each matching
//! destination and hands the deliveries to a bounded worker pool. The same
//! dispatcher validates configurations before they are accepted, proving
//! each destination with a live test message.

mod dispatcher;
mod error;
mod event;
mod notifier;
mod payload;
mod pool;
mod rules;
mod services;
mod utils;
mod verify;

pub use dispatcher::NotificationDispatcher;
pub use error::{INVALID_ARGUMENT, NotificationError, ValidationError};
pub use event::{
    BucketInfo, EventContext, EventName, ObjectState, ParseEventNameError, RequestInfo, encode_key, event_category,
    split_event_type,
};
pub use notifier::{
    Delivery, EventBusNotifier, FunctionNotifier, Notifier, NotifierBackend, QueueNotifier, TopicNotifier,
};
pub use payload::*;
pub use pool::{DeliveryTask, InlineExecutor, TaskExecutor, WorkerPool};
pub use rules::*;
pub use services::{AllServices, ServiceAvailability};
pub use utils::{short_uid, timestamp_millis};
pub use verify::{BucketVerificationContext, request_metadata, validate_entry};

pub use s3notify_config::NotifyConfig;
pub use s3notify_targets::{
    Arn, DeliveryRequest, DestinationKind, DestinationTransport, InvocationType, MemoryTransport, OutboundMessage,
    PutEventsEntry, RequestMetadata, TargetError, WebhookArgs, WebhookTransport,
};
