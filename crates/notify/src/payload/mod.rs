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

//! Destination payloads.
//!
//! Queue, topic and function destinations receive the generic S3 event
//! record, the event bus receives its own entry shape, and validation
//! sends a minimal test event.

mod eventbridge;
mod record;
mod test_event;

pub use eventbridge::{DetailBucket, DetailObject, EventBridgeDetail, build_eventbridge_entry};
pub use record::{
    BucketEntity, EventRecord, GlacierEventData, Identity, Notification, ObjectEntity, RequestParameters, ResponseElements,
    RestoreEventData, S3Entity, build_event_record,
};
pub use test_event::TestEvent;

use chrono::TimeDelta;
use s3notify_config::NotifyConfig;
use s3notify_config::{
    DEFAULT_EVENTBRIDGE_RESTORE_OFFSET_SECS, DEFAULT_RECORD_RESTORE_OFFSET_MS, MIN_EVENTBRIDGE_RESTORE_OFFSET_SECS,
    MIN_RECORD_RESTORE_OFFSET_MS,
};

/// Timestamp offsets for restore-completed payloads, which must sort after
/// the matching restore initiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadOptions {
    pub record_restore_offset: TimeDelta,
    pub eventbridge_restore_offset: TimeDelta,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            record_restore_offset: TimeDelta::milliseconds(DEFAULT_RECORD_RESTORE_OFFSET_MS as i64),
            eventbridge_restore_offset: TimeDelta::seconds(DEFAULT_EVENTBRIDGE_RESTORE_OFFSET_SECS as i64),
        }
    }
}

/// Offsets below their minimum are raised to it, whatever way the config was built.
impl From<&NotifyConfig> for PayloadOptions {
    fn from(config: &NotifyConfig) -> Self {
        let defaults = Self::default();
        let record_restore_offset = TimeDelta::from_std(config.record_restore_offset)
            .unwrap_or(defaults.record_restore_offset)
            .max(TimeDelta::milliseconds(MIN_RECORD_RESTORE_OFFSET_MS as i64));
        let eventbridge_restore_offset = TimeDelta::from_std(config.eventbridge_restore_offset)
            .unwrap_or(defaults.eventbridge_restore_offset)
            .max(TimeDelta::seconds(MIN_EVENTBRIDGE_RESTORE_OFFSET_SECS as i64));
        Self {
            record_restore_offset,
            eventbridge_restore_offset,
        }
    }
}
