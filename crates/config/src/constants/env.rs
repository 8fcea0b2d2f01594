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

use const_str::concat;

pub const ENV_PREFIX: &str = "S3NOTIFY_";

/// Number of workers delivering notifications concurrently.
/// Default value: 3
/// Environment variable: S3NOTIFY_WORKERS
pub const ENV_WORKERS: &str = concat!(ENV_PREFIX, "WORKERS");
pub const DEFAULT_WORKERS: usize = 3;

/// Comma separated list of enabled destination services (`sqs`, `sns`, `lambda`, `events`).
/// When unset every service is considered enabled.
/// Environment variable: S3NOTIFY_SERVICES
/// Example: S3NOTIFY_SERVICES=sqs,events
pub const ENV_SERVICES: &str = concat!(ENV_PREFIX, "SERVICES");

/// Skip the live destination check when a notification configuration is registered.
/// Default value: false
/// Environment variable: S3NOTIFY_SKIP_DESTINATION_VALIDATION
pub const ENV_SKIP_DESTINATION_VALIDATION: &str = concat!(ENV_PREFIX, "SKIP_DESTINATION_VALIDATION");
pub const DEFAULT_SKIP_DESTINATION_VALIDATION: bool = false;

/// Offset added to the `eventTime` of a restore-completed event record, in milliseconds.
/// Default value: 500
/// Environment variable: S3NOTIFY_RECORD_RESTORE_OFFSET_MS
pub const ENV_RECORD_RESTORE_OFFSET_MS: &str = concat!(ENV_PREFIX, "RECORD_RESTORE_OFFSET_MS");
pub const DEFAULT_RECORD_RESTORE_OFFSET_MS: u64 = 500;
pub const MIN_RECORD_RESTORE_OFFSET_MS: u64 = 1;

/// Offset added to the `Time` of a restore-completed event-bus entry, in seconds.
/// The event-bus schema only resolves whole seconds.
/// Default value: 1
/// Environment variable: S3NOTIFY_EVENTBRIDGE_RESTORE_OFFSET_SECS
pub const ENV_EVENTBRIDGE_RESTORE_OFFSET_SECS: &str = concat!(ENV_PREFIX, "EVENTBRIDGE_RESTORE_OFFSET_SECS");
pub const DEFAULT_EVENTBRIDGE_RESTORE_OFFSET_SECS: u64 = 1;
pub const MIN_EVENTBRIDGE_RESTORE_OFFSET_SECS: u64 = 1;

/// Log filter used by the demo binary and tests when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
