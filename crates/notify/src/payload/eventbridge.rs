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
use crate::utils::timestamp_millis;
use s3notify_config::notify::{
    DEFAULT_SOURCE_IP, EVENTBRIDGE_DETAIL_VERSION, EVENTBRIDGE_REQUESTER, EVENTBRIDGE_SEQUENCER, EVENTBRIDGE_SOURCE,
    NULL_VERSION_ID,
};
use s3notify_targets::{PutEventsEntry, s3_bucket_arn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailBucket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DetailObject {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequencer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// `Detail` of an S3 event-bus entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventBridgeDetail {
    pub version: String,
    pub bucket: DetailBucket,
    pub object: DetailObject,
    pub request_id: String,
    pub requester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_type: Option<String>,
    /// Present for restore events, `null` when the object has no storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_storage_class: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_expiry_time: Option<String>,
}

/// Builds the event-bus entry for `ctx`.
///
/// The detail type and the detail members depend on the event:
/// removals drop the size (and the ETag unless a delete marker was created),
/// ACL changes drop size and sequencer, restores drop the sequencer and a
/// completed restore is stamped after its initiation.
pub fn build_eventbridge_entry(ctx: &EventContext, options: &PayloadOptions) -> Result<PutEventsEntry, serde_json::Error> {
    let mut time = ctx.event_time;
    let mut detail = EventBridgeDetail {
        version: EVENTBRIDGE_DETAIL_VERSION.to_string(),
        bucket: DetailBucket {
            name: ctx.bucket_name.clone(),
        },
        object: DetailObject {
            key: ctx.key_name.clone(),
            size: Some(ctx.key_size),
            etag: Some(ctx.key_etag.clone()),
            sequencer: Some(EVENTBRIDGE_SEQUENCER.to_string()),
            version_id: ctx
                .key_version_id
                .as_ref()
                .filter(|v| !v.is_empty() && v.as_str() != NULL_VERSION_ID)
                .cloned(),
        },
        request_id: ctx.request_id.clone(),
        requester: EVENTBRIDGE_REQUESTER.to_string(),
        source_ip_address: Some(DEFAULT_SOURCE_IP.to_string()),
        reason: None,
        deletion_type: None,
        source_storage_class: None,
        restore_expiry_time: None,
    };

    let detail_type = match ctx.event_type {
        EventName::ObjectCreatedPut | EventName::ObjectCreatedPost | EventName::ObjectCreatedCopy => {
            detail.reason = Some(format!("{}Object", ctx.event_type.action()));
            "Object Created"
        }
        EventName::ObjectCreatedCompleteMultipartUpload => {
            detail.reason = Some(ctx.event_type.as_str().to_string());
            "Object Created"
        }
        EventName::ObjectRemovedDelete => {
            detail.reason = Some("DeleteObject".to_string());
            detail.deletion_type = Some("Permanently Deleted".to_string());
            detail.object.etag = None;
            detail.object.size = None;
            "Object Deleted"
        }
        EventName::ObjectRemovedDeleteMarkerCreated => {
            detail.reason = Some("DeleteObject".to_string());
            detail.deletion_type = Some("Delete Marker Created".to_string());
            detail.object.size = None;
            "Object Deleted"
        }
        EventName::ObjectTaggingPut => "Object Tags Added",
        EventName::ObjectTaggingDelete => "Object Tags Deleted",
        EventName::ObjectAclPut => {
            detail.object.size = None;
            detail.object.sequencer = None;
            "Object ACL Updated"
        }
        EventName::ObjectRestorePost => {
            detail.source_storage_class = Some(ctx.key_storage_class.clone());
            detail.object.sequencer = None;
            "Object Restore Initiated"
        }
        EventName::ObjectRestoreCompleted => {
            detail.source_storage_class = Some(ctx.key_storage_class.clone());
            detail.object.sequencer = None;
            let expiry = ctx.key_expiry.unwrap_or(ctx.event_time);
            detail.restore_expiry_time = Some(timestamp_millis(&expiry));
            detail.source_ip_address = None;
            time += options.eventbridge_restore_offset;
            "Object Restore Completed"
        }
    };

    Ok(PutEventsEntry {
        source: EVENTBRIDGE_SOURCE.to_string(),
        resources: vec![s3_bucket_arn(&ctx.bucket_name, &ctx.region)],
        detail_type: detail_type.to_string(),
        detail: serde_json::to_string(&detail)?,
        time,
        trace_header: ctx.trace_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::{Value, json};

    fn context(event_type: EventName) -> EventContext {
        EventContext {
            request_id: "req-1".to_string(),
            trace_id: None,
            event_type,
            event_time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            account_id: "000000000000".to_string(),
            region: "cn-north-1".to_string(),
            bucket_name: "bucket".to_string(),
            bucket_location: "cn-north-1".to_string(),
            bucket_account_id: "000000000000".to_string(),
            caller_account_id: "000000000000".to_string(),
            key_name: "key".to_string(),
            key_etag: "etag".to_string(),
            key_size: 7,
            key_version_id: None,
            key_expiry: None,
            key_storage_class: Some("GLACIER".to_string()),
        }
    }

    fn build(ctx: &EventContext) -> (PutEventsEntry, Value) {
        let entry = build_eventbridge_entry(ctx, &PayloadOptions::default()).unwrap();
        let detail = serde_json::from_str(&entry.detail).unwrap();
        (entry, detail)
    }

    #[test]
    fn test_created_entry() {
        let (entry, detail) = build(&context(EventName::ObjectCreatedPut));
        assert_eq!(entry.source, "aws.s3");
        assert_eq!(entry.resources, vec!["arn:aws-cn:s3:::bucket".to_string()]);
        assert_eq!(entry.detail_type, "Object Created");
        assert_eq!(entry.trace_header, None);
        assert_eq!(
            detail,
            json!({
                "version": "0",
                "bucket": {"name": "bucket"},
                "object": {"key": "key", "size": 7, "etag": "etag", "sequencer": "0062E99A88DC407460"},
                "request-id": "req-1",
                "requester": "074255357339",
                "source-ip-address": "127.0.0.1",
                "reason": "PutObject"
            })
        );
    }

    #[test]
    fn test_created_reason() {
        assert_eq!(build(&context(EventName::ObjectCreatedCopy)).1["reason"], "CopyObject");
        assert_eq!(build(&context(EventName::ObjectCreatedPost)).1["reason"], "PostObject");
        assert_eq!(
            build(&context(EventName::ObjectCreatedCompleteMultipartUpload)).1["reason"],
            "s3:ObjectCreated:CompleteMultipartUpload"
        );
    }

    #[test]
    fn test_removed_entries() {
        let (entry, detail) = build(&context(EventName::ObjectRemovedDelete));
        assert_eq!(entry.detail_type, "Object Deleted");
        assert_eq!(detail["reason"], "DeleteObject");
        assert_eq!(detail["deletion-type"], "Permanently Deleted");
        assert_eq!(detail["object"], json!({"key": "key", "sequencer": "0062E99A88DC407460"}));

        let (_, detail) = build(&context(EventName::ObjectRemovedDeleteMarkerCreated));
        assert_eq!(detail["deletion-type"], "Delete Marker Created");
        assert_eq!(detail["object"]["etag"], "etag");
        assert!(detail["object"].get("size").is_none());
    }

    #[test]
    fn test_tagging_and_acl_entries() {
        assert_eq!(build(&context(EventName::ObjectTaggingPut)).0.detail_type, "Object Tags Added");
        assert_eq!(build(&context(EventName::ObjectTaggingDelete)).0.detail_type, "Object Tags Deleted");

        let (entry, detail) = build(&context(EventName::ObjectAclPut));
        assert_eq!(entry.detail_type, "Object ACL Updated");
        assert_eq!(detail["object"], json!({"key": "key", "etag": "etag"}));
        assert!(detail.get("reason").is_none());
    }

    #[test]
    fn test_restore_initiated_entry() {
        let ctx = context(EventName::ObjectRestorePost);
        let (entry, detail) = build(&ctx);
        assert_eq!(entry.detail_type, "Object Restore Initiated");
        assert_eq!(entry.time, ctx.event_time);
        assert_eq!(detail["source-storage-class"], "GLACIER");
        assert_eq!(detail["source-ip-address"], "127.0.0.1");
        assert!(detail["object"].get("sequencer").is_none());
    }

    #[test]
    fn test_restore_completed_entry() {
        let mut ctx = context(EventName::ObjectRestoreCompleted);
        ctx.key_expiry = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        ctx.key_storage_class = None;
        let (entry, detail) = build(&ctx);
        assert_eq!(entry.detail_type, "Object Restore Completed");
        assert_eq!(entry.time, ctx.event_time + TimeDelta::seconds(1));
        assert!(detail.get("source-ip-address").is_none());
        assert_eq!(detail["source-storage-class"], Value::Null);
        assert_eq!(detail["restore-expiry-time"], "2024-02-01T00:00:00.000Z");
    }

    #[test]
    fn test_version_and_trace_header() {
        let mut ctx = context(EventName::ObjectCreatedPut);
        ctx.key_version_id = Some("v2".to_string());
        ctx.trace_id = Some("Root=1-5759e988-bd862e3fe1be46a994272793".to_string());
        let (entry, detail) = build(&ctx);
        assert_eq!(detail["object"]["version-id"], "v2");
        assert_eq!(entry.trace_header.as_deref(), Some("Root=1-5759e988-bd862e3fe1be46a994272793"));
    }

    #[test]
    fn test_detail_field_order() {
        let entry = build_eventbridge_entry(&context(EventName::ObjectRemovedDelete), &PayloadOptions::default()).unwrap();
        assert!(entry.detail.starts_with(r#"{"version":"0","bucket":{"name":"bucket"},"object":{"key":"key""#));
        assert!(entry.detail.ends_with(r#""reason":"DeleteObject","deletion-type":"Permanently Deleted"}"#));
    }
}
