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

pub mod arn;
pub mod error;
pub mod target;

pub use arn::{Arn, is_service_arn, partition_for_region, s3_bucket_arn};
pub use error::TargetError;
pub use target::memory::MemoryTransport;
pub use target::webhook::{WebhookArgs, WebhookTransport};
pub use target::{
    DeliveryRequest, DestinationKind, DestinationTransport, InvocationType, OutboundMessage, PutEventsEntry, RequestMetadata,
};
