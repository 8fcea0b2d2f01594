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

mod arn;
mod payload;

pub use arn::*;
pub use payload::*;

// --- Notification configuration keys ---
pub const QUEUE_CONFIGURATIONS: &str = "QueueConfigurations";
pub const TOPIC_CONFIGURATIONS: &str = "TopicConfigurations";
pub const LAMBDA_FUNCTION_CONFIGURATIONS: &str = "LambdaFunctionConfigurations";
pub const EVENTBRIDGE_CONFIGURATION: &str = "EventBridgeConfiguration";

// --- Destination ARN argument names, echoed back in validation errors ---
pub const QUEUE_ARN: &str = "QueueArn";
pub const TOPIC_ARN: &str = "TopicArn";
pub const LAMBDA_FUNCTION_ARN: &str = "LambdaFunctionArn";

// --- Destination services ---
pub const SERVICE_SQS: &str = "sqs";
pub const SERVICE_SNS: &str = "sns";
pub const SERVICE_LAMBDA: &str = "lambda";
pub const SERVICE_EVENTS: &str = "events";

pub const FILTER_RULE_PREFIX: &str = "Prefix";
pub const FILTER_RULE_SUFFIX: &str = "Suffix";
