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

// --- Generic event record (queue, topic and function destinations) ---
pub const EVENT_VERSION: &str = "2.1";
/// Tagging and ACL records use a newer schema revision.
pub const EVENT_VERSION_TAGGING_ACL: &str = "2.3";
pub const EVENT_SOURCE: &str = "aws:s3";
pub const S3_SCHEMA_VERSION: &str = "1.0";
pub const DEFAULT_PRINCIPAL_ID: &str = "AIDAJDPLRKLG7UEXAMPLE";
pub const BUCKET_OWNER_PRINCIPAL_ID: &str = "A3NL1KOZZKExample";
/// Restore completion is attributed to the service acting for the bucket owner.
pub const RESTORE_PRINCIPAL_ID: &str = concat!("AmazonCustomer:", BUCKET_OWNER_PRINCIPAL_ID);
pub const DEFAULT_SOURCE_IP: &str = "127.0.0.1";
pub const DEFAULT_HOST_ID: &str = "eftixk72aD6Ap51TnqcoF8eFidJG9Z/2";
pub const DEFAULT_SEQUENCER: &str = "0055AED6DCD90281E5";

// --- Event-bus entry ---
pub const EVENTBRIDGE_SOURCE: &str = "aws.s3";
pub const EVENTBRIDGE_DETAIL_VERSION: &str = "0";
pub const EVENTBRIDGE_SEQUENCER: &str = "0062E99A88DC407460";
pub const EVENTBRIDGE_REQUESTER: &str = "074255357339";

// --- Test event ---
pub const TEST_EVENT_SERVICE: &str = "Amazon S3";
pub const TEST_EVENT_NAME: &str = "s3:TestEvent";

/// Subject used when publishing to a topic.
pub const TOPIC_SUBJECT: &str = "Amazon S3 Notification";

/// Queue message system attribute carrying the trace header.
pub const AWS_TRACE_HEADER_ATTRIBUTE: &str = "AWSTraceHeader";

/// ETag of an empty object, reported for delete markers.
pub const EMPTY_OBJECT_ETAG: &str = "d41d8cd98f00b204e9800998ecf8427e";
/// Version id reported by unversioned buckets.
pub const NULL_VERSION_ID: &str = "null";
