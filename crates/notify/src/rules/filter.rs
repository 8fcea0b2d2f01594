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

use super::config::NotificationFilter;
use crate::error::ValidationError;
use s3notify_config::notify::{FILTER_RULE_PREFIX, FILTER_RULE_SUFFIX};

/// Returns whether `key_name` passes every rule of `filter`.
///
/// A missing filter or one without rules lets every key through. Rule names
/// are compared case-insensitively; unknown names are ignored.
pub fn matches_filter(filter: Option<&NotificationFilter>, key_name: &str) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    filter.rules().iter().all(|rule| {
        if rule.name.eq_ignore_ascii_case(FILTER_RULE_PREFIX) {
            key_name.starts_with(&rule.value)
        } else if rule.name.eq_ignore_ascii_case(FILTER_RULE_SUFFIX) {
            key_name.ends_with(&rule.value)
        } else {
            true
        }
    })
}

/// Capitalizes rule names in place and rejects anything that is not a
/// non-empty `Prefix` or `Suffix` rule.
pub fn normalize_filter_rules(filter: &mut NotificationFilter) -> Result<(), ValidationError> {
    let Some(rules) = filter.rules_mut() else {
        return Ok(());
    };
    for rule in rules.iter_mut() {
        rule.name = capitalize(&rule.name);
        if rule.name != FILTER_RULE_PREFIX && rule.name != FILTER_RULE_SUFFIX {
            return Err(ValidationError::InvalidFilterRuleName {
                argument_name: rule.name.clone(),
                argument_value: rule.value.clone(),
            });
        }
        if rule.value.is_empty() {
            return Err(ValidationError::EmptyFilterRuleValue {
                argument_name: rule.name.clone(),
                argument_value: rule.value.clone(),
            });
        }
    }
    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FilterRule;

    fn filter(rules: &[(&str, &str)]) -> NotificationFilter {
        NotificationFilter::with_rules(rules.iter().map(|(n, v)| FilterRule::new(*n, *v)).collect())
    }

    #[test]
    fn test_no_filter_matches() {
        assert!(matches_filter(None, "anything"));
        assert!(matches_filter(Some(&NotificationFilter::default()), "anything"));
        assert!(matches_filter(Some(&filter(&[])), "anything"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        let prefix = filter(&[("Prefix", "images/")]);
        assert!(matches_filter(Some(&prefix), "images/cat.png"));
        assert!(!matches_filter(Some(&prefix), "docs/file.png"));

        let suffix = filter(&[("suffix", ".png")]);
        assert!(matches_filter(Some(&suffix), "a.png"));
        assert!(!matches_filter(Some(&suffix), "a.txt"));

        let both = filter(&[("Prefix", "images/"), ("Suffix", ".png")]);
        assert!(matches_filter(Some(&both), "images/cat.png"));
        assert!(!matches_filter(Some(&both), "images/cat.jpg"));
        assert!(!matches_filter(Some(&both), "docs/cat.png"));
    }

    #[test]
    fn test_normalize_capitalizes() {
        let mut f = filter(&[("PREFIX", "images/"), ("suffix", ".png")]);
        normalize_filter_rules(&mut f).unwrap();
        assert_eq!(f.rules()[0].name, "Prefix");
        assert_eq!(f.rules()[1].name, "Suffix");
    }

    #[test]
    fn test_normalize_rejects_unknown_name() {
        let mut f = filter(&[("Middle", "x")]);
        let err = normalize_filter_rules(&mut f).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFilterRuleName {
                argument_name: "Middle".to_string(),
                argument_value: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_rejects_empty_value() {
        let mut f = filter(&[("prefix", "")]);
        let err = normalize_filter_rules(&mut f).unwrap_err();
        assert_eq!(err.message(), "filter value cannot be empty");
        assert_eq!(err.argument_name(), "Prefix");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("sUFFIX"), "Suffix");
        assert_eq!(capitalize(""), "");
    }
}
