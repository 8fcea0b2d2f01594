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

use super::PayloadOptions;
use crate::event::{EventContext, EventName};
use crate::utils::{serialize_timestamp_millis, short_uid, timestamp_millis};
use chrono::{DateTime, Utc};
use s3notify_config::notify::{
    BUCKET_OWNER_PRINCIPAL_ID, DEFAULT_HOST_ID, DEFAULT_PRINCIPAL_ID, DEFAULT_SEQUENCER, DEFAULT_SOURCE_IP, EVENT_SOURCE,
    EVENT_VERSION, EVENT_VERSION_TAGGING_ACL, NULL_VERSION_ID, RESTORE_PRINCIPAL_ID, S3_SCHEMA_VERSION,
};
use s3notify_targets::s3_bucket_arn;
use serde::Serialize;

/// Body sent to queue, topic and function destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    pub records: Vec<EventRecord>,
}

/// Represents the identity of the user who triggered the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub principal_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestParameters {
    #[serde(rename = "sourceIPAddress")]
    pub source_ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseElements {
    #[serde(rename = "x-amz-request-id")]
    pub request_id: String,
    /// Host that processed the request
    #[serde(rename = "x-amz-id-2")]
    pub host_id: String,
}

/// Represents the bucket that the object is in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketEntity {
    pub name: String,
    pub owner_identity: Identity,
    pub arn: String,
}

/// Represents the object that the event occurred on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntity {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequencer: Option<String>,
    #[serde(rename = "versionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(rename = "eTag", skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Entity {
    #[serde(rename = "s3SchemaVersion")]
    pub schema_version: String,
    /// Id of the configuration entry that matched
    pub configuration_id: Option<String>,
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreEventData {
    pub lifecycle_restoration_expiry_time: String,
    pub lifecycle_restore_storage_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlacierEventData {
    pub restore_event_data: RestoreEventData,
}

/// Represents a storage event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_version: String,
    pub event_source: String,
    pub aws_region: String,
    #[serde(serialize_with = "serialize_timestamp_millis")]
    pub event_time: DateTime<Utc>,
    /// Event type without the `s3:` prefix
    pub event_name: String,
    pub user_identity: Identity,
    pub request_parameters: RequestParameters,
    pub response_elements: ResponseElements,
    pub s3: S3Entity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glacier_event_data: Option<GlacierEventData>,
}

/// Builds the generic S3 event record of `ctx` for the entry `configuration_id`.
pub fn build_event_record(ctx: &EventContext, configuration_id: Option<&str>, options: &PayloadOptions) -> Notification {
    let event_type = ctx.event_type;
    let category = event_type.category();

    let mut record = EventRecord {
        event_version: EVENT_VERSION.to_string(),
        event_source: EVENT_SOURCE.to_string(),
        aws_region: ctx.bucket_location.clone(),
        event_time: ctx.event_time,
        event_name: event_type.as_str().trim_start_matches("s3:").to_string(),
        user_identity: Identity {
            principal_id: DEFAULT_PRINCIPAL_ID.to_string(),
        },
        request_parameters: RequestParameters {
            source_ip_address: DEFAULT_SOURCE_IP.to_string(),
        },
        response_elements: ResponseElements {
            request_id: short_uid(),
            host_id: DEFAULT_HOST_ID.to_string(),
        },
        s3: S3Entity {
            schema_version: S3_SCHEMA_VERSION.to_string(),
            configuration_id: configuration_id.map(str::to_string),
            bucket: BucketEntity {
                name: ctx.bucket_name.clone(),
                owner_identity: Identity {
                    principal_id: BUCKET_OWNER_PRINCIPAL_ID.to_string(),
                },
                arn: s3_bucket_arn(&ctx.bucket_name, &ctx.region),
            },
            object: ObjectEntity {
                key: ctx.key_name.clone(),
                sequencer: Some(DEFAULT_SEQUENCER.to_string()),
                version_id: ctx
                    .key_version_id
                    .as_ref()
                    .filter(|v| !v.is_empty() && v.as_str() != NULL_VERSION_ID)
                    .cloned(),
                etag: None,
                size: None,
            },
        },
        glacier_event_data: None,
    };

    let object = &mut record.s3.object;
    let is_delete_marker = event_type == EventName::ObjectRemovedDeleteMarkerCreated;
    if category == "ObjectCreated" || category == "ObjectRestore" || is_delete_marker {
        object.etag = Some(ctx.key_etag.clone());
        // No size on a delete marker
        if !is_delete_marker {
            object.size = Some(ctx.key_size);
        }
    }

    if category == "ObjectTagging" || category == "ObjectAcl" {
        record.event_version = EVENT_VERSION_TAGGING_ACL.to_string();
        object.etag = Some(ctx.key_etag.clone());
        object.sequencer = None;
    }

    if event_type == EventName::ObjectRestoreCompleted {
        let expiry = ctx.key_expiry.unwrap_or(ctx.event_time);
        record.glacier_event_data = Some(GlacierEventData {
            restore_event_data: RestoreEventData {
                lifecycle_restoration_expiry_time: timestamp_millis(&expiry),
                lifecycle_restore_storage_class: ctx.key_storage_class.clone(),
            },
        });
        record.user_identity.principal_id = RESTORE_PRINCIPAL_ID.to_string();
        record.event_time = ctx.event_time + options.record_restore_offset;
    }

    Notification { records: vec![record] }
}
