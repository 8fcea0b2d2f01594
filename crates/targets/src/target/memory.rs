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
use crate::target::{DeliveryRequest, DestinationKind, DestinationTransport, OutboundMessage};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, RwLock};
use tracing::debug;

/// An in-process transport.
///
/// Destinations have to be declared with [`MemoryTransport::add_destination`]
/// before they accept messages. A destination can be marked as refusing
/// messages from S3 with [`MemoryTransport::deny`], which is how a missing
/// resource policy looks to the sender. The default event bus always exists.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    destinations: RwLock<HashSet<String>>,
    denied: RwLock<HashSet<String>>,
    delivered: Mutex<Vec<DeliveryRequest>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an existing destination ARN.
    pub fn add_destination(&self, arn: impl Into<String>) -> &Self {
        self.destinations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(arn.into());
        self
    }

    pub fn remove_destination(&self, arn: &str) -> bool {
        self.destinations.write().unwrap_or_else(|e| e.into_inner()).remove(arn)
    }

    /// Makes a destination reject every message, while still existing.
    /// For the event bus use `{account_id}:{region}`.
    pub fn deny(&self, destination: impl Into<String>) -> &Self {
        self.denied.write().unwrap_or_else(|e| e.into_inner()).insert(destination.into());
        self
    }

    /// Every request accepted so far, in acceptance order.
    pub fn delivered(&self) -> Vec<DeliveryRequest> {
        self.delivered.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages accepted for one destination.
    pub fn delivered_to(&self, destination: &str) -> Vec<OutboundMessage> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.message.destination() == destination)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.delivered.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn exists(&self, kind: DestinationKind, destination: &str) -> bool {
        kind == DestinationKind::EventBus
            || self
                .destinations
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .contains(destination)
    }

    fn is_denied(&self, destination: &str) -> bool {
        self.denied.read().unwrap_or_else(|e| e.into_inner()).contains(destination)
    }
}

#[async_trait]
impl DestinationTransport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    async fn lookup(&self, kind: DestinationKind, arn: &Arn) -> Result<(), TargetError> {
        let destination = arn.to_arn_string();
        if self.exists(kind, &destination) {
            Ok(())
        } else {
            Err(TargetError::NotFound(destination))
        }
    }

    async fn send(&self, request: DeliveryRequest) -> Result<(), TargetError> {
        let kind = request.message.kind();
        let destination = request.message.destination();
        if !self.exists(kind, &destination) {
            return Err(TargetError::NotFound(destination));
        }
        if self.is_denied(&destination) {
            return Err(TargetError::AccessDenied(destination));
        }
        debug!("memory transport accepted {} message for {}", kind, destination);
        self.delivered.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        Ok(())
    }
}
