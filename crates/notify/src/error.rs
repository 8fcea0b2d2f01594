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

use s3notify_targets::TargetError;
use thiserror::Error;

/// S3 error code carried by every configuration validation failure
pub const INVALID_ARGUMENT: &str = "InvalidArgument";

/// Rejection of a bucket notification configuration.
///
/// Every variant names the offending argument and its value, the way S3
/// reports `InvalidArgument` errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The ARN could not be parsed")]
    InvalidArn { argument_name: String, argument_value: String },

    #[error("Unable to validate the following destination configurations")]
    DestinationNotFound { argument_name: String, argument_value: String },

    #[error("Unable to validate the following destination configurations")]
    PermissionDenied { argument_name: String, argument_value: String },

    #[error("filter rule name must be either prefix or suffix")]
    InvalidFilterRuleName { argument_name: String, argument_value: String },

    #[error("filter value cannot be empty")]
    EmptyFilterRuleValue { argument_name: String, argument_value: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        INVALID_ARGUMENT
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn argument_name(&self) -> &str {
        match self {
            ValidationError::InvalidArn { argument_name, .. }
            | ValidationError::DestinationNotFound { argument_name, .. }
            | ValidationError::PermissionDenied { argument_name, .. }
            | ValidationError::InvalidFilterRuleName { argument_name, .. }
            | ValidationError::EmptyFilterRuleValue { argument_name, .. } => argument_name,
        }
    }

    pub fn argument_value(&self) -> &str {
        match self {
            ValidationError::InvalidArn { argument_value, .. }
            | ValidationError::DestinationNotFound { argument_value, .. }
            | ValidationError::PermissionDenied { argument_value, .. }
            | ValidationError::InvalidFilterRuleName { argument_value, .. }
            | ValidationError::EmptyFilterRuleValue { argument_value, .. } => argument_value,
        }
    }
}

/// Error types for the notification runtime
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    #[error("Worker pool has been shut down")]
    PoolShutdown,

    #[error("No tokio runtime available: {0}")]
    RuntimeUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown notification configuration key: {0}")]
    UnknownConfigurationKey(String),
}
