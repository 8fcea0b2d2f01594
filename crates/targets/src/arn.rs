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

use crate::TargetError;
use once_cell::sync::Lazy;
use regex::Regex;
use s3notify_config::notify::{ARN_PARTITION_REGEX, DEFAULT_ARN_PARTITION, S3_SERVICE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Captures the service of an ARN whose partition is one of the known ones.
static SERVICE_ARN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{ARN_PARTITION_REGEX}:([^:]*):")).expect("valid ARN partition regex"));

/// ARN - AWS resource name representation
/// `arn:{partition}:{service}:{region}:{account}:{resource}`
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Arn {
    // Partitions such as "aws", "aws-cn" or "aws-us-gov"
    pub partition: String,
    // Service types, such as "sqs", "sns", "lambda", etc.
    pub service: String,
    pub region: String,
    pub account: String,
    /// The resource part, may itself contain colons (`function:name:alias`)
    pub resource: String,
}

impl Arn {
    /// Parsing ARN from string
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        s.parse()
    }

    /// Last segment of the resource, the queue, topic or function name.
    pub fn resource_name(&self) -> &str {
        self.resource.rsplit([':', '/']).next().unwrap_or(&self.resource)
    }

    /// Returns the ARN string in the format "arn:{partition}:{service}:{region}:{account}:{resource}"
    pub fn to_arn_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

impl FromStr for Arn {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 6 || parts[0] != "arn" {
            return Err(TargetError::InvalidARN(s.to_string()));
        }

        let resource = parts[5..].join(":");
        if parts[1].is_empty() || parts[2].is_empty() || resource.is_empty() {
            return Err(TargetError::InvalidARN(s.to_string()));
        }

        Ok(Arn {
            partition: parts[1].to_string(),
            service: parts[2].to_string(),
            region: parts[3].to_string(),
            account: parts[4].to_string(),
            resource,
        })
    }
}

impl Serialize for Arn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_arn_string())
    }
}

impl<'de> Deserialize<'de> for Arn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Arn::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Checks that `arn` starts with `arn:{known partition}:{service}:`.
///
/// Only the prefix is inspected, region, account and resource may be anything.
pub fn is_service_arn(arn: &str, service: &str) -> bool {
    SERVICE_ARN
        .captures(arn)
        .and_then(|caps| caps.get(2))
        .is_some_and(|m| m.as_str() == service)
}

/// Partition a region belongs to.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-isof-") {
        "aws-iso-f"
    } else if region.starts_with("eu-isoe-") {
        "aws-iso-e"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        DEFAULT_ARN_PARTITION
    }
}

/// ARN of a bucket: "arn:{partition}:s3:::{bucket}"
pub fn s3_bucket_arn(bucket_name: &str, region: &str) -> String {
    format!("arn:{}:{S3_SERVICE}:::{bucket_name}", partition_for_region(region))
}
