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

mod common;

use common::*;
use s3notify::{
    AllServices, DestinationKind, EventBridgeConfiguration, EventContext, EventName, FilterRule, InlineExecutor,
    MemoryTransport, NotificationConfiguration, NotificationDispatcher, NotifyConfig, OutboundMessage, PayloadOptions,
    TargetConfiguration, WorkerPool,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

fn inline_dispatcher(transport: Arc<MemoryTransport>) -> NotificationDispatcher {
    NotificationDispatcher::with_defaults(
        Arc::new(InlineExecutor::new()),
        Arc::new(AllServices),
        transport,
        PayloadOptions::default(),
    )
}

fn queue_body(message: &OutboundMessage) -> Value {
    match message {
        OutboundMessage::Queue { message_body, .. } => serde_json::from_str(message_body).unwrap(),
        other => panic!("expected a queue message, got {other:?}"),
    }
}

#[test]
fn test_matching_entries_receive_event_records() {
    init_tracing();
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN).add_destination(OTHER_QUEUE_ARN);
    let dispatcher = inline_dispatcher(transport.clone());

    let configuration = NotificationConfiguration {
        queue_configurations: vec![
            TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"]).with_id("created"),
            TargetConfiguration::new(OTHER_QUEUE_ARN, &["s3:ObjectRemoved:*"]).with_id("removed"),
        ],
        ..Default::default()
    };

    let ctx = put_event("photos/a b.jpg");
    assert_eq!(dispatcher.send_notifications(&ctx, &configuration), 1);

    assert!(transport.delivered_to(OTHER_QUEUE_ARN).is_empty());
    let received = transport.delivered_to(QUEUE_ARN);
    assert_eq!(received.len(), 1);

    let body = queue_body(&received[0]);
    let record = &body["Records"][0];
    assert_eq!(record["eventName"], "ObjectCreated:Put");
    assert_eq!(record["s3"]["configurationId"], "created");
    assert_eq!(record["s3"]["bucket"]["name"], BUCKET);
    assert_eq!(record["s3"]["object"]["key"], "photos/a%20b.jpg");
    assert_eq!(record["s3"]["object"]["eTag"], "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(record["s3"]["object"]["size"], 42);
}

#[test]
fn test_filter_rules_limit_deliveries() {
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN);
    let dispatcher = inline_dispatcher(transport.clone());

    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:Put"]).with_filter_rules(
            vec![FilterRule::new("Prefix", "images/"), FilterRule::new("Suffix", ".png")],
        )],
        ..Default::default()
    };

    assert_eq!(dispatcher.send_notifications(&put_event("docs/cat.png"), &configuration), 0);
    assert_eq!(dispatcher.send_notifications(&put_event("images/cat.jpg"), &configuration), 0);
    assert_eq!(dispatcher.send_notifications(&put_event("images/cat.png"), &configuration), 1);
    assert_eq!(transport.delivered_to(QUEUE_ARN).len(), 1);
}

#[test]
fn test_every_kind_gets_its_own_message() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .add_destination(QUEUE_ARN)
        .add_destination(TOPIC_ARN)
        .add_destination(FUNCTION_ARN);
    let dispatcher = inline_dispatcher(transport.clone());

    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"])],
        topic_configurations: vec![TargetConfiguration::new(TOPIC_ARN, &["s3:ObjectCreated:Put"])],
        lambda_function_configurations: vec![TargetConfiguration::new(FUNCTION_ARN, &["s3:ObjectCreated:*"])],
        event_bridge_configuration: Some(EventBridgeConfiguration::default()),
    };

    let mut ctx = put_event("key.txt");
    ctx.trace_id = Some("Root=1-abc".to_string());
    assert_eq!(dispatcher.send_notifications(&ctx, &configuration), 4);

    let delivered = transport.delivered();
    assert_eq!(delivered.len(), 4);
    let kinds: Vec<DestinationKind> = delivered.iter().map(|r| r.message.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            DestinationKind::Queue,
            DestinationKind::Topic,
            DestinationKind::Function,
            DestinationKind::EventBus
        ]
    );

    for request in &delivered[..3] {
        let metadata = request.metadata.as_ref().expect("queue, topic and function carry metadata");
        assert_eq!(metadata.source_arn, format!("arn:aws:s3:::{BUCKET}"));
        assert_eq!(metadata.service_principal, "s3.amazonaws.com");
    }
    assert!(delivered[3].metadata.is_none());

    match &delivered[0].message {
        OutboundMessage::Queue {
            message_system_attributes,
            ..
        } => assert_eq!(message_system_attributes.get("AWSTraceHeader").map(String::as_str), Some("Root=1-abc")),
        other => panic!("unexpected message {other:?}"),
    }
    match &delivered[1].message {
        OutboundMessage::Topic { subject, message, .. } => {
            assert_eq!(subject, "Amazon S3 Notification");
            let body: Value = serde_json::from_str(message).unwrap();
            assert_eq!(body["Records"][0]["eventSource"], "aws:s3");
        }
        other => panic!("unexpected message {other:?}"),
    }
    match &delivered[2].message {
        OutboundMessage::Function {
            invocation_type, payload, ..
        } => {
            assert_eq!(*invocation_type, s3notify::InvocationType::Event);
            assert!(payload.as_deref().is_some_and(|p| p.contains("\"Records\"")));
        }
        other => panic!("unexpected message {other:?}"),
    }
    match &delivered[3].message {
        OutboundMessage::EventBus {
            account_id,
            region,
            entries,
        } => {
            assert_eq!(account_id, ACCOUNT_ID);
            assert_eq!(region, REGION);
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].source, "aws.s3");
            assert_eq!(entries[0].detail_type, "Object Created");
            let detail: Value = serde_json::from_str(&entries[0].detail).unwrap();
            assert_eq!(detail["bucket"]["name"], BUCKET);
            assert_eq!(detail["object"]["key"], "key.txt");
        }
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn test_event_bus_receives_every_event() {
    let transport = Arc::new(MemoryTransport::new());
    let dispatcher = inline_dispatcher(transport.clone());
    let configuration = NotificationConfiguration {
        event_bridge_configuration: Some(EventBridgeConfiguration::default()),
        ..Default::default()
    };

    let ctx = put_event("a");
    dispatcher.send_notifications(&ctx, &configuration);
    dispatcher.send_notifications(&ctx.clone().with_event_type(EventName::ObjectTaggingPut), &configuration);
    dispatcher.send_notifications(&ctx.with_event_type(EventName::ObjectRemovedDelete), &configuration);

    let entries: Vec<String> = transport
        .delivered_to(EVENT_BUS)
        .into_iter()
        .map(|message| match message {
            OutboundMessage::EventBus { entries, .. } => entries[0].detail_type.clone(),
            other => panic!("unexpected message {other:?}"),
        })
        .collect();
    assert_eq!(entries, vec!["Object Created", "Object Tags Added", "Object Deleted"]);
}

#[test]
fn test_failed_delivery_does_not_stop_the_others() {
    init_tracing();
    let transport = Arc::new(MemoryTransport::new());
    transport
        .add_destination(QUEUE_ARN)
        .deny(QUEUE_ARN)
        .add_destination(OTHER_QUEUE_ARN);
    let dispatcher = inline_dispatcher(transport.clone());

    let configuration = NotificationConfiguration {
        queue_configurations: vec![
            TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"]),
            TargetConfiguration::new(OTHER_QUEUE_ARN, &["s3:ObjectCreated:*"]),
        ],
        ..Default::default()
    };

    assert_eq!(dispatcher.send_notifications(&put_event("key"), &configuration), 2);
    assert!(transport.delivered_to(QUEUE_ARN).is_empty());
    assert_eq!(transport.delivered_to(OTHER_QUEUE_ARN).len(), 1);
}

#[test]
fn test_disabled_services_are_skipped() {
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN).add_destination(TOPIC_ARN);
    let config = NotifyConfig {
        enabled_services: Some(vec!["sns".to_string()]),
        ..Default::default()
    };
    let dispatcher = NotificationDispatcher::with_defaults(
        Arc::new(InlineExecutor::new()),
        Arc::new(config.clone()),
        transport.clone(),
        PayloadOptions::from(&config),
    );

    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"])],
        topic_configurations: vec![TargetConfiguration::new(TOPIC_ARN, &["s3:ObjectCreated:*"])],
        event_bridge_configuration: Some(EventBridgeConfiguration::default()),
        ..Default::default()
    };

    assert_eq!(dispatcher.send_notifications(&put_event("key"), &configuration), 1);
    assert!(transport.delivered_to(QUEUE_ARN).is_empty());
    assert!(transport.delivered_to(EVENT_BUS).is_empty());
    assert_eq!(transport.delivered_to(TOPIC_ARN).len(), 1);
}

#[test]
fn test_unmapped_operation_raises_no_event() {
    assert!(EventContext::from_request(request("GetObject"), bucket(), object("key")).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_pool_delivers_in_background() {
    init_tracing();
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN).add_destination(TOPIC_ARN);
    let config = NotifyConfig {
        worker_count: 2,
        ..Default::default()
    };
    let dispatcher = NotificationDispatcher::from_config(&config, transport.clone()).unwrap();

    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"])],
        topic_configurations: vec![TargetConfiguration::new(TOPIC_ARN, &["s3:ObjectCreated:*"])],
        ..Default::default()
    };

    for i in 0..5 {
        assert_eq!(dispatcher.send_notifications(&put_event(&format!("key-{i}")), &configuration), 2);
    }

    assert!(wait_for_deliveries(&transport, QUEUE_ARN, 5).await);
    assert!(wait_for_deliveries(&transport, TOPIC_ARN, 5).await);
    dispatcher.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_destination_does_not_block_the_others() {
    let transport = Arc::new(GatedTransport::new(QUEUE_ARN));
    transport
        .inner
        .add_destination(QUEUE_ARN)
        .add_destination(OTHER_QUEUE_ARN);
    let dispatcher = NotificationDispatcher::with_defaults(
        Arc::new(WorkerPool::new(2).unwrap()),
        Arc::new(AllServices),
        transport.clone(),
        PayloadOptions::default(),
    );

    let configuration = NotificationConfiguration {
        queue_configurations: vec![
            TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"]),
            TargetConfiguration::new(OTHER_QUEUE_ARN, &["s3:ObjectCreated:*"]),
        ],
        ..Default::default()
    };

    // Returns while the first delivery is still held back
    assert_eq!(dispatcher.send_notifications(&put_event("key"), &configuration), 2);
    assert!(wait_for_deliveries(&transport.inner, OTHER_QUEUE_ARN, 1).await);
    assert!(transport.inner.delivered_to(QUEUE_ARN).is_empty());

    transport.gate.add_permits(1);
    assert!(wait_for_deliveries(&transport.inner, QUEUE_ARN, 1).await);
    dispatcher.shutdown();
}

#[tokio::test]
async fn test_shutdown_drops_new_notifications() {
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN);
    let dispatcher = NotificationDispatcher::with_defaults(
        Arc::new(WorkerPool::new(1).unwrap()),
        Arc::new(AllServices),
        transport.clone(),
        PayloadOptions::default(),
    );
    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"])],
        ..Default::default()
    };

    dispatcher.shutdown();
    assert_eq!(dispatcher.send_notifications(&put_event("key"), &configuration), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_restore_completion_is_stamped_after_the_event() {
    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN);
    let config = NotifyConfig {
        worker_count: 0,
        record_restore_offset: Duration::ZERO,
        eventbridge_restore_offset: Duration::ZERO,
        ..Default::default()
    };
    let dispatcher = NotificationDispatcher::from_config(&config, transport.clone()).unwrap();

    let configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectRestore:*"])],
        event_bridge_configuration: Some(EventBridgeConfiguration::default()),
        ..Default::default()
    };
    let event_time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let ctx = put_event("archive.tar")
        .with_event_type(EventName::ObjectRestoreCompleted)
        .with_event_time(event_time);

    assert_eq!(dispatcher.send_notifications(&ctx, &configuration), 2);
    assert!(wait_for_deliveries(&transport, QUEUE_ARN, 1).await);
    assert!(wait_for_deliveries(&transport, EVENT_BUS, 1).await);

    let body = queue_body(&transport.delivered_to(QUEUE_ARN)[0]);
    let record_time = DateTime::parse_from_rfc3339(body["Records"][0]["eventTime"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(record_time > event_time);
    assert_eq!(record_time, event_time + TimeDelta::milliseconds(1));

    match &transport.delivered_to(EVENT_BUS)[0] {
        OutboundMessage::EventBus { entries, .. } => {
            assert!(entries[0].time > event_time);
            assert_eq!(entries[0].time, event_time + TimeDelta::seconds(1));
        }
        other => panic!("unexpected message {other:?}"),
    }
    dispatcher.shutdown();
}
