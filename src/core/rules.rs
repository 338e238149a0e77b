// ─── Rule Evaluator ───
// Decides whether a conditional clause applies to a launch context.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::core::launch::context::LaunchContext;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
}

/// One conditional clause of a library or argument.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, bool>>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn on_os(mut self, name: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).name = Some(name.to_string());
        self
    }

    pub fn on_arch(mut self, arch: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).arch = Some(arch.to_string());
        self
    }

    pub fn with_feature(mut self, name: &str, enabled: bool) -> Self {
        self.features
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), enabled);
        self
    }

    /// Placeholder for a clause whose shape could not be understood.
    /// It never matches.
    fn malformed() -> Self {
        Self {
            action: RuleAction::Unknown,
            os: None,
            features: None,
        }
    }

    /// Only `allow` clauses can match; every present predicate must hold.
    pub fn matches(&self, ctx: &LaunchContext) -> bool {
        if self.action != RuleAction::Allow {
            return false;
        }

        if let Some(os) = &self.os {
            if let Some(name) = &os.name {
                if name != ctx.platform().as_str() {
                    return false;
                }
            }
            if let Some(arch) = &os.arch {
                let wanted = arch.to_ascii_lowercase();
                if !ctx.cpu_arch().to_ascii_lowercase().contains(&wanted) {
                    return false;
                }
            }
        }

        if let Some(features) = &self.features {
            let all_present = features
                .iter()
                .all(|(name, expected)| ctx.feature(name) == Some(*expected));
            if !all_present {
                return false;
            }
        }

        true
    }
}

/// `true` when there are no rules, otherwise `true` iff any rule matches.
pub fn evaluate(rules: &[Rule], ctx: &LaunchContext) -> bool {
    rules.is_empty() || rules.iter().any(|rule| rule.matches(ctx))
}

/// Deserializes a rule list without ever failing the enclosing document.
/// Entries of an unrecognized shape become clauses that never match, and a
/// non-list value becomes a single such clause.
pub fn lenient_rules<'de, D>(deserializer: D) -> Result<Vec<Rule>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let rules = match raw {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items.into_iter().map(parse_rule).collect(),
        other => vec![parse_rule(other)],
    };
    Ok(rules)
}

fn parse_rule(value: serde_json::Value) -> Rule {
    serde_json::from_value::<Rule>(value.clone()).unwrap_or_else(|e| {
        debug!("Malformed rule {} treated as non-matching: {}", value, e);
        Rule::malformed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::launch::context::LaunchContext;

    fn linux() -> LaunchContext {
        LaunchContext::builder()
            .platform("linux")
            .cpu_arch("x86_64")
            .build()
    }

    #[test]
    fn no_rules_means_allowed() {
        assert!(evaluate(&[], &linux()));
        assert!(evaluate(
            &[],
            &LaunchContext::builder().platform("windows").build()
        ));
    }

    #[test]
    fn os_mismatch_is_rejected() {
        let rules = vec![Rule::allow().on_os("windows")];
        assert!(!evaluate(&rules, &linux()));
    }

    #[test]
    fn os_name_compares_against_canonical_platform() {
        let rules = vec![Rule::allow().on_os("osx")];
        let ctx = LaunchContext::builder().platform("Darwin").build();
        assert!(evaluate(&rules, &ctx));
    }

    #[test]
    fn arch_is_a_case_insensitive_substring() {
        let ctx = LaunchContext::builder()
            .platform("windows")
            .cpu_arch("X86_64")
            .build();
        assert!(evaluate(&[Rule::allow().on_arch("x86")], &ctx));
        assert!(!evaluate(&[Rule::allow().on_arch("arm64")], &ctx));
    }

    #[test]
    fn feature_mismatch_and_missing_key_are_rejected() {
        let rules = vec![Rule::allow().with_feature("is_demo", true)];
        assert!(!evaluate(&rules, &linux()));

        let off = LaunchContext::builder().feature("is_demo", false).build();
        assert!(!evaluate(&rules, &off));

        let on = LaunchContext::builder().feature("is_demo", true).build();
        assert!(evaluate(&rules, &on));
    }

    #[test]
    fn any_matching_allow_rule_suffices() {
        let rules = vec![Rule::allow().on_os("windows"), Rule::allow().on_os("linux")];
        assert!(evaluate(&rules, &linux()));
    }

    #[test]
    fn disallow_and_unknown_actions_never_match() {
        let rules: Vec<Rule> = serde_json::from_value(serde_json::json!([
            {"action": "disallow"},
            {"action": "maybe"}
        ]))
        .unwrap();
        assert_eq!(rules[0].action, RuleAction::Disallow);
        assert_eq!(rules[1].action, RuleAction::Unknown);
        assert!(!evaluate(&rules, &linux()));
    }

    #[test]
    fn malformed_rules_fail_closed() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "lenient_rules")]
            rules: Vec<Rule>,
        }

        let holder: Holder = serde_json::from_value(serde_json::json!({
            "rules": [{"action": "allow", "os": 42}]
        }))
        .unwrap();
        assert_eq!(holder.rules.len(), 1);
        assert!(!evaluate(&holder.rules, &linux()));

        let holder: Holder = serde_json::from_value(serde_json::json!({
            "rules": "allow"
        }))
        .unwrap();
        assert!(!evaluate(&holder.rules, &linux()));

        let holder: Holder = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(evaluate(&holder.rules, &linux()));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let rules = vec![Rule::allow().on_os("linux").with_feature("has_custom_resolution", true)];
        let ctx = LaunchContext::builder()
            .platform("linux")
            .feature("has_custom_resolution", true)
            .build();
        let first = evaluate(&rules, &ctx);
        assert!((0..16).all(|_| evaluate(&rules, &ctx) == first));
        assert!(first);
    }
}
