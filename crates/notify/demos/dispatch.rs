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

use s3notify::{
    BucketInfo, EventBridgeConfiguration, EventContext, FilterRule, MemoryTransport, NotificationConfiguration,
    NotificationDispatcher, NotificationError, NotifyConfig, ObjectState, RequestInfo, TargetConfiguration,
};
use s3notify_config::DEFAULT_LOG_LEVEL;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

const ACCOUNT_ID: &str = "000000000000";
const REGION: &str = "us-east-1";
const QUEUE_ARN: &str = "arn:aws:sqs:us-east-1:000000000000:uploads";
const FUNCTION_ARN: &str = "arn:aws:lambda:us-east-1:000000000000:function:thumbnails";

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_thread_names(true)
                .with_line_number(true),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), NotificationError> {
    init_logger();

    let transport = Arc::new(MemoryTransport::new());
    transport.add_destination(QUEUE_ARN).add_destination(FUNCTION_ARN);

    let config = NotifyConfig::from_env();
    let dispatcher = NotificationDispatcher::from_config(&config, transport.clone())?;

    let request = RequestInfo {
        request_id: s3notify::short_uid(),
        operation: "PutObject".to_string(),
        account_id: ACCOUNT_ID.to_string(),
        region: REGION.to_string(),
        trace_id: Some("Root=1-5759e988-bd862e3fe1be46a994272793".to_string()),
    };

    let mut configuration = NotificationConfiguration {
        queue_configurations: vec![TargetConfiguration::new(QUEUE_ARN, &["s3:ObjectCreated:*"])],
        lambda_function_configurations: vec![
            TargetConfiguration::new(FUNCTION_ARN, &["s3:ObjectCreated:Put"])
                .with_filter_rules(vec![FilterRule::new("suffix", ".jpg")]),
        ],
        event_bridge_configuration: Some(EventBridgeConfiguration::default()),
        ..Default::default()
    };

    if let Err(e) = dispatcher
        .verify_configuration(&mut configuration, false, &request, "photos")
        .await
    {
        warn!("Rejected notification configuration: {} ({})", e.message(), e.argument_name());
        dispatcher.shutdown();
        return Ok(());
    }
    // Probes sent during verification are not interesting here
    transport.clear();

    let bucket = BucketInfo {
        name: "photos".to_string(),
        region: REGION.to_string(),
        owner_account_id: ACCOUNT_ID.to_string(),
        versioning_enabled: false,
    };
    let object = ObjectState::Object {
        key: "2024/holiday beach.jpg".to_string(),
        etag: "\"d41d8cd98f00b204e9800998ecf8427e\"".to_string(),
        size: 2048,
        version_id: None,
        expires: None,
        storage_class: None,
    };
    let Some(ctx) = EventContext::from_request(request, bucket, object) else {
        warn!("PutObject raised no event");
        return Ok(());
    };

    let submitted = dispatcher.send_notifications(&ctx, &configuration);
    info!("Submitted {} deliveries for {}", submitted, ctx.event_type);

    tokio::time::sleep(Duration::from_millis(200)).await;
    for request in transport.delivered() {
        info!("Delivered {} message to {}", request.message.kind(), request.message.destination());
    }

    dispatcher.shutdown();
    Ok(())
}
