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

use crate::error::{NotificationError, ValidationError};
use crate::event::{EventContext, RequestInfo};
use crate::notifier::{EventBusNotifier, FunctionNotifier, Notifier, NotifierBackend, QueueNotifier, TopicNotifier};
use crate::payload::PayloadOptions;
use crate::pool::{TaskExecutor, WorkerPool};
use crate::rules::NotificationConfiguration;
use crate::services::ServiceAvailability;
use s3notify_config::NotifyConfig;
use s3notify_targets::{DestinationKind, DestinationTransport};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Fans events out to the notifiers of a bucket's configuration.
///
/// Matching and payload construction happen on the caller's thread; only
/// the transport calls are handed to the executor.
pub struct NotificationDispatcher {
    notifiers: HashMap<&'static str, Arc<dyn Notifier>>,
    executor: Arc<dyn TaskExecutor>,
    services: Arc<dyn ServiceAvailability>,
    skip_destination_validation: bool,
}

impl NotificationDispatcher {
    /// Creates a dispatcher without notifiers.
    pub fn new(executor: Arc<dyn TaskExecutor>, services: Arc<dyn ServiceAvailability>) -> Self {
        Self {
            notifiers: HashMap::new(),
            executor,
            services,
            skip_destination_validation: false,
        }
    }

    /// Creates a dispatcher with the queue, topic, function and event-bus
    /// notifiers sharing one transport.
    pub fn with_defaults(
        executor: Arc<dyn TaskExecutor>,
        services: Arc<dyn ServiceAvailability>,
        transport: Arc<dyn DestinationTransport>,
        options: PayloadOptions,
    ) -> Self {
        let backend = NotifierBackend::new(transport, services.clone(), options);
        let mut dispatcher = Self::new(executor, services);
        dispatcher.register(Arc::new(QueueNotifier::new(backend.clone())));
        dispatcher.register(Arc::new(TopicNotifier::new(backend.clone())));
        dispatcher.register(Arc::new(FunctionNotifier::new(backend.clone())));
        dispatcher.register(Arc::new(EventBusNotifier::new(backend)));
        dispatcher
    }

    /// Wires the default notifiers over a [`WorkerPool`] on the current tokio runtime.
    ///
    /// `config` is normalized first, so out-of-range values get the same
    /// floors as values read from the environment.
    pub fn from_config(config: &NotifyConfig, transport: Arc<dyn DestinationTransport>) -> Result<Self, NotificationError> {
        let config = &config.clone().normalized();
        let executor = Arc::new(WorkerPool::new(config.worker_count)?);
        let services = Arc::new(config.clone());
        let dispatcher = Self::with_defaults(executor, services, transport, PayloadOptions::from(config))
            .with_skip_destination_validation(config.skip_destination_validation);
        info!("Notification dispatcher ready with {} workers", config.worker_count);
        Ok(dispatcher)
    }

    /// Skips live destination checks for every verification, whatever the caller asks.
    pub fn with_skip_destination_validation(mut self, skip: bool) -> Self {
        self.skip_destination_validation = skip;
        self
    }

    /// Registers `notifier` under its configuration key, returning the one it replaces.
    pub fn register(&mut self, notifier: Arc<dyn Notifier>) -> Option<Arc<dyn Notifier>> {
        let key = notifier.kind().configuration_key();
        debug!("Registering notifier for {}", key);
        self.notifiers.insert(key, notifier)
    }

    /// Notifier registered under a configuration key such as `QueueConfigurations`.
    pub fn notifier(&self, configuration_key: &str) -> Result<&Arc<dyn Notifier>, NotificationError> {
        self.notifiers
            .get(configuration_key)
            .ok_or_else(|| NotificationError::UnknownConfigurationKey(configuration_key.to_string()))
    }

    fn enabled_notifier(&self, kind: DestinationKind) -> Option<&Arc<dyn Notifier>> {
        let notifier = match self.notifier(kind.configuration_key()) {
            Ok(notifier) => notifier,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };
        let service = kind.service_name();
        if !self.services.is_service_enabled(service) {
            warn!(
                "Service '{}' is not enabled: skip sending notification. Please check the enabled services configuration.",
                service
            );
            return None;
        }
        Some(notifier)
    }

    /// Submits a delivery for every matching entry of every enabled kind.
    ///
    /// Returns once all deliveries are submitted; their outcome is never
    /// observed. Returns the number of submitted deliveries.
    #[instrument(skip_all, fields(bucket = %ctx.bucket_name, event = %ctx.event_type))]
    pub fn send_notifications(&self, ctx: &EventContext, configuration: &NotificationConfiguration) -> usize {
        let mut submitted = 0;
        for kind in configuration.configured_kinds() {
            let Some(notifier) = self.enabled_notifier(kind) else {
                continue;
            };
            for entry in configuration.entries(kind) {
                if !notifier.should_notify(ctx, entry) {
                    continue;
                }
                let delivery = match notifier.build_delivery(ctx, entry) {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        error!("Unable to build {} notification for S3 bucket \"{}\": {}", kind, ctx.bucket_name, e);
                        continue;
                    }
                };
                debug!("Submitting task to the executor for notifier {}", kind);
                match self.executor.submit(Box::pin(delivery.run())) {
                    Ok(()) => submitted += 1,
                    Err(e) => warn!("Dropping {} notification for S3 bucket \"{}\": {}", kind, ctx.bucket_name, e),
                }
            }
        }
        submitted
    }

    /// Validates every entry of `configuration`, kind by kind, and normalizes it in place.
    ///
    /// Live destination checks run unless skipped by the caller or by the
    /// dispatcher settings. The first failure aborts the whole verification.
    #[instrument(skip(self, configuration, request), fields(request_id = %request.request_id))]
    pub async fn verify_configuration(
        &self,
        configuration: &mut NotificationConfiguration,
        skip_destination_validation: bool,
        request: &RequestInfo,
        bucket_name: &str,
    ) -> Result<(), ValidationError> {
        let skip = skip_destination_validation || self.skip_destination_validation;
        for kind in DestinationKind::ALL {
            let Some(entries) = configuration.entries_mut(kind) else {
                continue;
            };
            if entries.is_empty() {
                continue;
            }
            let notifier = match self.notifier(kind.configuration_key()) {
                Ok(notifier) => notifier,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            notifier.validate(entries, skip, request, bucket_name).await?;
        }
        Ok(())
    }

    /// Stops accepting notifications without waiting for running deliveries.
    pub fn shutdown(&self) {
        info!("Shutting down notification dispatcher");
        self.executor.shutdown();
    }
}
