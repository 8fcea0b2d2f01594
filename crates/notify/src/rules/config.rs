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

use s3notify_config::notify::{
    EVENTBRIDGE_CONFIGURATION, LAMBDA_FUNCTION_ARN, LAMBDA_FUNCTION_CONFIGURATIONS, QUEUE_ARN, QUEUE_CONFIGURATIONS,
    TOPIC_ARN, TOPIC_CONFIGURATIONS,
};
use s3notify_targets::DestinationKind;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// A single key-name filter rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterRule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl FilterRule {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilter {
    #[serde(rename = "FilterRules", default)]
    pub filter_rules: Vec<FilterRule>,
}

/// `Filter` member of a configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFilter {
    #[serde(rename = "Key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyFilter>,
}

impl NotificationFilter {
    pub fn with_rules(rules: Vec<FilterRule>) -> Self {
        Self {
            key: Some(KeyFilter { filter_rules: rules }),
        }
    }

    pub fn rules(&self) -> &[FilterRule] {
        self.key.as_ref().map(|key| key.filter_rules.as_slice()).unwrap_or_default()
    }

    pub fn rules_mut(&mut self) -> Option<&mut Vec<FilterRule>> {
        self.key.as_mut().map(|key| &mut key.filter_rules)
    }
}

/// One queue, topic or function destination of a bucket.
///
/// On the wire the ARN member is named after the destination kind
/// (`QueueArn`, `TopicArn`, `LambdaFunctionArn`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TargetConfiguration {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Arn", alias = "QueueArn", alias = "TopicArn", alias = "LambdaFunctionArn", default)]
    pub arn: String,
    #[serde(rename = "Events", alias = "Event", default)]
    pub events: Vec<String>,
    #[serde(rename = "Filter", default)]
    pub filter: Option<NotificationFilter>,
}

impl TargetConfiguration {
    /// The event-bus entry: no id, no destination and no selectors.
    pub const EMPTY: Self = Self {
        id: None,
        arn: String::new(),
        events: Vec::new(),
        filter: None,
    };

    pub fn new(arn: impl Into<String>, events: &[&str]) -> Self {
        Self {
            arn: arn.into(),
            events: events.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filter_rules(mut self, rules: Vec<FilterRule>) -> Self {
        self.filter = Some(NotificationFilter::with_rules(rules));
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

static EVENT_BUS_ENTRIES: [TargetConfiguration; 1] = [TargetConfiguration::EMPTY];

/// Marker that enables event-bus delivery. It has no members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBridgeConfiguration {}

/// The notification configuration of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotificationConfiguration {
    #[serde(rename = "QueueConfigurations", default)]
    pub queue_configurations: Vec<TargetConfiguration>,
    #[serde(rename = "TopicConfigurations", default)]
    pub topic_configurations: Vec<TargetConfiguration>,
    #[serde(rename = "LambdaFunctionConfigurations", default)]
    pub lambda_function_configurations: Vec<TargetConfiguration>,
    #[serde(rename = "EventBridgeConfiguration", default)]
    pub event_bridge_configuration: Option<EventBridgeConfiguration>,
}

impl NotificationConfiguration {
    pub fn is_empty(&self) -> bool {
        self.queue_configurations.is_empty()
            && self.topic_configurations.is_empty()
            && self.lambda_function_configurations.is_empty()
            && self.event_bridge_configuration.is_none()
    }

    /// Entries of one destination kind. An enabled event bus counts as one
    /// empty entry.
    pub fn entries(&self, kind: DestinationKind) -> &[TargetConfiguration] {
        match kind {
            DestinationKind::Queue => &self.queue_configurations,
            DestinationKind::Topic => &self.topic_configurations,
            DestinationKind::Function => &self.lambda_function_configurations,
            DestinationKind::EventBus => match self.event_bridge_configuration {
                Some(_) => &EVENT_BUS_ENTRIES,
                None => &[],
            },
        }
    }

    /// Mutable entries of a kind that carries per-entry settings.
    pub fn entries_mut(&mut self, kind: DestinationKind) -> Option<&mut Vec<TargetConfiguration>> {
        match kind {
            DestinationKind::Queue => Some(&mut self.queue_configurations),
            DestinationKind::Topic => Some(&mut self.topic_configurations),
            DestinationKind::Function => Some(&mut self.lambda_function_configurations),
            DestinationKind::EventBus => None,
        }
    }

    /// Kinds that have at least one entry, in configuration walking order.
    pub fn configured_kinds(&self) -> impl Iterator<Item = DestinationKind> + '_ {
        DestinationKind::ALL
            .into_iter()
            .filter(|kind| !self.entries(*kind).is_empty())
    }
}

struct KindEntry<'a> {
    arn_key: &'static str,
    entry: &'a TargetConfiguration,
}

impl Serialize for KindEntry<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.entry.id {
            map.serialize_entry("Id", id)?;
        }
        map.serialize_entry(self.arn_key, &self.entry.arn)?;
        map.serialize_entry("Events", &self.entry.events)?;
        if let Some(filter) = &self.entry.filter {
            map.serialize_entry("Filter", filter)?;
        }
        map.end()
    }
}

struct KindEntries<'a> {
    arn_key: &'static str,
    entries: &'a [TargetConfiguration],
}

impl Serialize for KindEntries<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in self.entries {
            seq.serialize_element(&KindEntry {
                arn_key: self.arn_key,
                entry,
            })?;
        }
        seq.end()
    }
}

impl Serialize for NotificationConfiguration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let lists = [
            (QUEUE_CONFIGURATIONS, QUEUE_ARN, &self.queue_configurations),
            (TOPIC_CONFIGURATIONS, TOPIC_ARN, &self.topic_configurations),
            (LAMBDA_FUNCTION_CONFIGURATIONS, LAMBDA_FUNCTION_ARN, &self.lambda_function_configurations),
        ];
        let mut map = serializer.serialize_map(None)?;
        for (key, arn_key, entries) in lists {
            if !entries.is_empty() {
                map.serialize_entry(key, &KindEntries { arn_key, entries })?;
            }
        }
        if let Some(event_bridge) = &self.event_bridge_configuration {
            map.serialize_entry(EVENTBRIDGE_CONFIGURATION, event_bridge)?;
        }
        map.end()
    }
}
