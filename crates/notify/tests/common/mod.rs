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

#![allow(dead_code)]

use async_trait::async_trait;
use s3notify::{
    Arn, BucketInfo, DeliveryRequest, DestinationKind, DestinationTransport, EventContext, MemoryTransport, ObjectState,
    RequestInfo, TargetError,
};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const ACCOUNT_ID: &str = "000000000000";
pub const REGION: &str = "us-east-1";
pub const BUCKET: &str = "test-bucket";
pub const QUEUE_ARN: &str = "arn:aws:sqs:us-east-1:000000000000:queue-a";
pub const OTHER_QUEUE_ARN: &str = "arn:aws:sqs:us-east-1:000000000000:queue-b";
pub const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:000000000000:topic";
pub const FUNCTION_ARN: &str = "arn:aws:lambda:us-east-1:000000000000:function:handler";
pub const EVENT_BUS: &str = "000000000000:us-east-1";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

pub fn request(operation: &str) -> RequestInfo {
    RequestInfo {
        request_id: "req-0001".to_string(),
        operation: operation.to_string(),
        account_id: ACCOUNT_ID.to_string(),
        region: REGION.to_string(),
        trace_id: None,
    }
}

pub fn bucket() -> BucketInfo {
    BucketInfo {
        name: BUCKET.to_string(),
        region: REGION.to_string(),
        owner_account_id: ACCOUNT_ID.to_string(),
        versioning_enabled: false,
    }
}

pub fn object(key: &str) -> ObjectState {
    ObjectState::Object {
        key: key.to_string(),
        etag: "\"d41d8cd98f00b204e9800998ecf8427e\"".to_string(),
        size: 42,
        version_id: None,
        expires: None,
        storage_class: None,
    }
}

pub fn put_event(key: &str) -> EventContext {
    EventContext::from_request(request("PutObject"), bucket(), object(key)).expect("PutObject raises an event")
}

/// Records every call and answers from an inner [`MemoryTransport`].
#[derive(Default)]
pub struct RecordingTransport {
    pub inner: MemoryTransport,
    pub lookups: Mutex<Vec<String>>,
    pub sends: Mutex<Vec<DeliveryRequest>>,
}

impl RecordingTransport {
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<DeliveryRequest> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl DestinationTransport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn lookup(&self, kind: DestinationKind, arn: &Arn) -> Result<(), TargetError> {
        self.lookups.lock().unwrap().push(arn.to_arn_string());
        self.inner.lookup(kind, arn).await
    }

    async fn send(&self, request: DeliveryRequest) -> Result<(), TargetError> {
        self.sends.lock().unwrap().push(request.clone());
        self.inner.send(request).await
    }
}

/// Holds every message for one destination until a permit is released.
pub struct GatedTransport {
    pub inner: MemoryTransport,
    pub gated_destination: String,
    pub gate: Semaphore,
}

impl GatedTransport {
    pub fn new(gated_destination: &str) -> Self {
        Self {
            inner: MemoryTransport::new(),
            gated_destination: gated_destination.to_string(),
            gate: Semaphore::new(0),
        }
    }
}

#[async_trait]
impl DestinationTransport for GatedTransport {
    fn name(&self) -> &str {
        "gated"
    }

    async fn lookup(&self, kind: DestinationKind, arn: &Arn) -> Result<(), TargetError> {
        self.inner.lookup(kind, arn).await
    }

    async fn send(&self, request: DeliveryRequest) -> Result<(), TargetError> {
        if request.message.destination() == self.gated_destination {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| TargetError::Unknown(e.to_string()))?;
        }
        self.inner.send(request).await
    }
}

/// Polls until `destination` received `count` messages or the deadline passes.
pub async fn wait_for_deliveries(transport: &MemoryTransport, destination: &str, count: usize) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if transport.delivered_to(destination).len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
