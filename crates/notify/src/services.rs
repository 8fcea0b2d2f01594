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

use s3notify_config::NotifyConfig;

/// Answers whether a destination service may be used.
///
/// Disabled services are skipped with a warning, never reported as errors.
pub trait ServiceAvailability: Send + Sync {
    fn is_service_enabled(&self, service: &str) -> bool;
}

/// Every service is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllServices;

impl ServiceAvailability for AllServices {
    fn is_service_enabled(&self, _service: &str) -> bool {
        true
    }
}

impl ServiceAvailability for NotifyConfig {
    fn is_service_enabled(&self, service: &str) -> bool {
        NotifyConfig::is_service_enabled(self, service)
    }
}
