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

use crate::utils::serialize_timestamp_millis;
use chrono::{DateTime, Utc};
use s3notify_config::notify::{DEFAULT_HOST_ID, TEST_EVENT_NAME, TEST_EVENT_SERVICE};
use serde::Serialize;

/// Minimal message sent to a destination to prove that it accepts
/// notifications from a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    pub service: String,
    pub event: String,
    #[serde(serialize_with = "serialize_timestamp_millis")]
    pub time: DateTime<Utc>,
    pub bucket: String,
    pub request_id: String,
    pub host_id: String,
}

impl TestEvent {
    pub fn new(bucket: &str, request_id: &str) -> Self {
        Self {
            service: TEST_EVENT_SERVICE.to_string(),
            event: TEST_EVENT_NAME.to_string(),
            time: Utc::now(),
            bucket: bucket.to_string(),
            request_id: request_id.to_string(),
            host_id: DEFAULT_HOST_ID.to_string(),
        }
    }
}
