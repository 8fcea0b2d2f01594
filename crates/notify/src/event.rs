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

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use s3notify_config::notify::EMPTY_OBJECT_ETAG;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Characters of an object key that stay unescaped in notifications:
/// unreserved URL characters and the path separator.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'/').remove(b'_').remove(b'.').remove(b'-').remove(b'~');

/// Error returned when parsing event name string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventNameError(String);

impl fmt::Display for ParseEventNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid event name:{}", self.0)
    }
}

impl std::error::Error for ParseEventNameError {}

/// Splits an event type at its last colon into the category path and the action.
///
/// `"s3:ObjectCreated:Put"` gives `("s3:ObjectCreated", "Put")`. A value
/// without a colon is all action.
pub fn split_event_type(event_type: &str) -> (&str, &str) {
    event_type.rsplit_once(':').unwrap_or(("", event_type))
}

/// The category of an event type, e.g. `ObjectCreated` for `s3:ObjectCreated:Put`.
pub fn event_category(event_type: &str) -> &str {
    let (path, _) = split_event_type(event_type);
    path.rsplit_once(':').map_or(path, |(_, category)| category)
}

/// The object-level events a bucket can notify about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    ObjectCreatedPut,
    ObjectCreatedCopy,
    ObjectCreatedCompleteMultipartUpload,
    ObjectCreatedPost,
    ObjectRemovedDelete,
    ObjectRemovedDeleteMarkerCreated,
    ObjectTaggingPut,
    ObjectTaggingDelete,
    ObjectAclPut,
    ObjectRestorePost,
    ObjectRestoreCompleted,
}

impl EventName {
    pub const ALL: [EventName; 11] = [
        EventName::ObjectCreatedPut,
        EventName::ObjectCreatedCopy,
        EventName::ObjectCreatedCompleteMultipartUpload,
        EventName::ObjectCreatedPost,
        EventName::ObjectRemovedDelete,
        EventName::ObjectRemovedDeleteMarkerCreated,
        EventName::ObjectTaggingPut,
        EventName::ObjectTaggingDelete,
        EventName::ObjectAclPut,
        EventName::ObjectRestorePost,
        EventName::ObjectRestoreCompleted,
    ];

    /// The parsed string is EventName.
    pub fn parse(s: &str) -> Result<Self, ParseEventNameError> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParseEventNameError(s.to_string()))
    }

    /// Returns a string representation of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ObjectCreatedPut => "s3:ObjectCreated:Put",
            EventName::ObjectCreatedCopy => "s3:ObjectCreated:Copy",
            EventName::ObjectCreatedCompleteMultipartUpload => "s3:ObjectCreated:CompleteMultipartUpload",
            EventName::ObjectCreatedPost => "s3:ObjectCreated:Post",
            EventName::ObjectRemovedDelete => "s3:ObjectRemoved:Delete",
            EventName::ObjectRemovedDeleteMarkerCreated => "s3:ObjectRemoved:DeleteMarkerCreated",
            EventName::ObjectTaggingPut => "s3:ObjectTagging:Put",
            EventName::ObjectTaggingDelete => "s3:ObjectTagging:Delete",
            EventName::ObjectAclPut => "s3:ObjectAcl:Put",
            EventName::ObjectRestorePost => "s3:ObjectRestore:Post",
            EventName::ObjectRestoreCompleted => "s3:ObjectRestore:Completed",
        }
    }

    /// Maps an S3 operation to the event it raises, if any.
    pub fn from_operation(operation: &str) -> Option<Self> {
        match operation {
            "PutObject" => Some(EventName::ObjectCreatedPut),
            "CopyObject" => Some(EventName::ObjectCreatedCopy),
            "CompleteMultipartUpload" => Some(EventName::ObjectCreatedCompleteMultipartUpload),
            "PostObject" => Some(EventName::ObjectCreatedPost),
            "PutObjectTagging" => Some(EventName::ObjectTaggingPut),
            "DeleteObjectTagging" => Some(EventName::ObjectTaggingDelete),
            "DeleteObject" | "DeleteObjects" => Some(EventName::ObjectRemovedDelete),
            "PutObjectAcl" => Some(EventName::ObjectAclPut),
            "RestoreObject" => Some(EventName::ObjectRestorePost),
            _ => None,
        }
    }

    pub fn category(&self) -> &'static str {
        event_category(self.as_str())
    }

    pub fn action(&self) -> &'static str {
        split_event_type(self.as_str()).1
    }

    /// The `s3:Category:*` selector that covers this event.
    pub fn wildcard(&self) -> String {
        format!("{}:*", split_event_type(self.as_str()).0)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventName {
    type Err = ParseEventNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::parse(s)
    }
}

impl Serialize for EventName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventName::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The request that triggered an event.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub request_id: String,
    /// S3 operation name, e.g. `PutObject`
    pub operation: String,
    pub account_id: String,
    pub region: String,
    /// Value of the `X-Amzn-Trace-Id` header
    pub trace_id: Option<String>,
}

/// The bucket an event happened in.
#[derive(Debug, Clone, Default)]
pub struct BucketInfo {
    pub name: String,
    pub region: String,
    pub owner_account_id: String,
    pub versioning_enabled: bool,
}

/// Object state at the moment of the event.
#[derive(Debug, Clone)]
pub enum ObjectState {
    Object {
        key: String,
        etag: String,
        size: u64,
        version_id: Option<String>,
        expires: Option<DateTime<Utc>>,
        storage_class: Option<String>,
    },
    DeleteMarker {
        key: String,
        version_id: Option<String>,
    },
}

/// Everything needed to describe one event to its destinations.
///
/// Built once per triggering operation and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub request_id: String,
    pub trace_id: Option<String>,
    pub event_type: EventName,
    pub event_time: DateTime<Utc>,
    pub account_id: String,
    pub region: String,
    pub bucket_name: String,
    pub bucket_location: String,
    pub bucket_account_id: String,
    pub caller_account_id: String,
    /// URL-component-encoded object key
    pub key_name: String,
    pub key_etag: String,
    pub key_size: u64,
    pub key_version_id: Option<String>,
    pub key_expiry: Option<DateTime<Utc>>,
    pub key_storage_class: Option<String>,
}

impl EventContext {
    /// Builds the context for `request` on `object` in `bucket`.
    ///
    /// Returns `None` when the operation raises no bucket notification.
    pub fn from_request(request: RequestInfo, bucket: BucketInfo, object: ObjectState) -> Option<Self> {
        let event_type = EventName::from_operation(&request.operation)?;

        let (key, key_etag, key_size, version_id, key_expiry, key_storage_class) = match object {
            ObjectState::Object {
                key,
                etag,
                size,
                version_id,
                expires,
                storage_class,
            } => (key, etag.trim_matches('"').to_string(), size, version_id, expires, storage_class),
            // A delete marker carries the ETag of an empty object
            ObjectState::DeleteMarker { key, version_id } => (key, EMPTY_OBJECT_ETAG.to_string(), 0, version_id, None, None),
        };

        Some(Self {
            event_type,
            event_time: Utc::now(),
            caller_account_id: request.account_id.clone(),
            request_id: request.request_id,
            trace_id: request.trace_id,
            account_id: request.account_id,
            region: request.region,
            bucket_name: bucket.name,
            bucket_location: bucket.region,
            bucket_account_id: bucket.owner_account_id,
            key_name: encode_key(&key),
            key_etag,
            key_size,
            key_version_id: version_id.filter(|_| bucket.versioning_enabled),
            key_expiry,
            key_storage_class,
        })
    }

    /// Same context for an internally raised event, such as a completed restore.
    pub fn with_event_type(mut self, event_type: EventName) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_event_time(mut self, event_time: DateTime<Utc>) -> Self {
        self.event_time = event_time;
        self
    }
}

/// Percent-encodes an object key the way S3 reports it in notifications.
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}
