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

pub const DEFAULT_ARN_PARTITION: &str = "aws";

/// Partitions accepted in a destination ARN, a destination ARN must start with it.
pub const ARN_PARTITION_REGEX: &str = r"^arn:(aws|aws-cn|aws-us-gov|aws-iso|aws-iso-b|aws-iso-e|aws-iso-f)";

pub const S3_SERVICE: &str = "s3";

/// Principal the destination sees as the sender of S3 notifications.
pub const S3_SERVICE_PRINCIPAL: &str = concat!(S3_SERVICE, ".amazonaws.com");
