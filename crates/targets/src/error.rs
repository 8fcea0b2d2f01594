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

use thiserror::Error;

/// Error types for destination transports
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Destination not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid ARN: {0}")]
    InvalidARN(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<url::ParseError> for TargetError {
    fn from(err: url::ParseError) -> Self {
        TargetError::Configuration(format!("URL parse error: {err}"))
    }
}

impl From<serde_json::Error> for TargetError {
    fn from(err: serde_json::Error) -> Self {
        TargetError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for TargetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TargetError::Timeout(err.to_string())
        } else if err.is_connect() {
            TargetError::Network(err.to_string())
        } else {
            TargetError::Request(err.to_string())
        }
    }
}
