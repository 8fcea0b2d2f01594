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

use crate::constants::env::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Runtime settings of the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Size of the delivery worker pool
    pub worker_count: usize,
    /// Enabled destination services, `None` means every service is enabled
    pub enabled_services: Option<Vec<String>>,
    /// Default for skipping live destination checks on configuration updates
    pub skip_destination_validation: bool,
    /// Offset applied to restore-completed event records
    pub record_restore_offset: Duration,
    /// Offset applied to restore-completed event-bus entries
    pub eventbridge_restore_offset: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKERS,
            enabled_services: None,
            skip_destination_validation: DEFAULT_SKIP_DESTINATION_VALIDATION,
            record_restore_offset: Duration::from_millis(DEFAULT_RECORD_RESTORE_OFFSET_MS),
            eventbridge_restore_offset: Duration::from_secs(DEFAULT_EVENTBRIDGE_RESTORE_OFFSET_SECS),
        }
    }
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the configuration from `S3NOTIFY_*` environment variables.
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let worker_count = std::env::var(ENV_WORKERS)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_WORKERS);

        let enabled_services = std::env::var(ENV_SERVICES).ok().map(|s| parse_service_list(&s));

        let skip_destination_validation = std::env::var(ENV_SKIP_DESTINATION_VALIDATION)
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(DEFAULT_SKIP_DESTINATION_VALIDATION);

        let record_restore_offset_ms = std::env::var(ENV_RECORD_RESTORE_OFFSET_MS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RECORD_RESTORE_OFFSET_MS);

        let eventbridge_restore_offset_secs = std::env::var(ENV_EVENTBRIDGE_RESTORE_OFFSET_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_EVENTBRIDGE_RESTORE_OFFSET_SECS);

        Self {
            worker_count,
            enabled_services,
            skip_destination_validation,
            record_restore_offset: Duration::from_millis(record_restore_offset_ms),
            eventbridge_restore_offset: Duration::from_secs(eventbridge_restore_offset_secs),
        }
        .normalized()
    }

    /// Clamps values that would break dispatch or payload ordering.
    ///
    /// A restore-completed payload must always be stamped strictly after the
    /// restore initiation, so both offsets have a floor.
    pub fn normalized(mut self) -> Self {
        if self.worker_count == 0 {
            warn!("worker count of 0 is not usable, using 1");
            self.worker_count = 1;
        }
        let min_record = Duration::from_millis(MIN_RECORD_RESTORE_OFFSET_MS);
        if self.record_restore_offset < min_record {
            warn!(
                "record restore offset {:?} is below the minimum, using {:?}",
                self.record_restore_offset, min_record
            );
            self.record_restore_offset = min_record;
        }
        let min_eventbridge = Duration::from_secs(MIN_EVENTBRIDGE_RESTORE_OFFSET_SECS);
        if self.eventbridge_restore_offset < min_eventbridge {
            warn!(
                "eventbridge restore offset {:?} is below the minimum, using {:?}",
                self.eventbridge_restore_offset, min_eventbridge
            );
            self.eventbridge_restore_offset = min_eventbridge;
        }
        self
    }

    /// Returns whether `service` may be used as a destination.
    pub fn is_service_enabled(&self, service: &str) -> bool {
        match &self.enabled_services {
            None => true,
            Some(services) => services.iter().any(|s| s.eq_ignore_ascii_case(service)),
        }
    }
}

/// Parses a comma separated service list, dropping blanks.
pub fn parse_service_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses the boolean spellings accepted in environment variables.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
