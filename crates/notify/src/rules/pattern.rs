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

use crate::event::split_event_type;

/// Returns whether `event_type` is selected by `selectors`.
///
/// A selector matches when it is the event type itself, or the event's
/// category followed by `:*` (`s3:ObjectCreated:*` selects
/// `s3:ObjectCreated:Put`). Only one wildcard level exists.
pub fn matches_event<S: AsRef<str>>(selectors: &[S], event_type: &str) -> bool {
    if selectors.iter().any(|s| s.as_ref() == event_type) {
        return true;
    }
    let (category, _) = split_event_type(event_type);
    if category.is_empty() {
        return false;
    }
    selectors.iter().any(|s| {
        s.as_ref()
            .strip_suffix(":*")
            .is_some_and(|selected| selected == category)
    })
}
