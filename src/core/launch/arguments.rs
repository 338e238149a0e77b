// ─── Argument Rule Engine ───
// Turns a declarative, rule-gated argument list into concrete tokens.

use serde::Deserialize;

use crate::core::rules::{self, lenient_rules, Rule};

use super::context::LaunchContext;
use super::expand::expand;

/// One element of `arguments.jvm` / `arguments.game`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ArgumentSpec {
    Literal(String),
    Conditional {
        #[serde(default, deserialize_with = "lenient_rules")]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ArgumentValue {
    One(String),
    Many(Vec<String>),
}

impl ArgumentSpec {
    pub fn literal(value: impl Into<String>) -> Self {
        ArgumentSpec::Literal(value.into())
    }

    pub fn when(rules: Vec<Rule>, values: &[&str]) -> Self {
        let value = match values {
            [single] => ArgumentValue::One(single.to_string()),
            many => ArgumentValue::Many(many.iter().map(|v| v.to_string()).collect()),
        };
        ArgumentSpec::Conditional { rules, value }
    }

    /// The legacy `minecraftArguments` string, split on whitespace into
    /// unconditional literals.
    pub fn from_legacy(arguments: &str) -> Vec<Self> {
        arguments.split_whitespace().map(ArgumentSpec::literal).collect()
    }

    fn append_tokens(&self, ctx: &LaunchContext, out: &mut Vec<String>) {
        match self {
            ArgumentSpec::Literal(template) => out.push(expand(template, ctx)),
            ArgumentSpec::Conditional { rules, value } => {
                if !rules::evaluate(rules, ctx) {
                    return;
                }
                match value {
                    ArgumentValue::One(template) => out.push(expand(template, ctx)),
                    ArgumentValue::Many(templates) => {
                        out.extend(templates.iter().map(|t| expand(t, ctx)))
                    }
                }
            }
        }
    }
}

/// Resolve `spec` against `ctx`. Output order mirrors input order exactly;
/// nothing is reordered, merged or deduplicated.
pub fn build_tokens(spec: &[ArgumentSpec], ctx: &LaunchContext) -> Vec<String> {
    let mut tokens = Vec::with_capacity(spec.len());
    for element in spec {
        element.append_tokens(ctx, &mut tokens);
    }
    tokens
}

/// JVM arguments for descriptors that predate `arguments.jvm`.
pub fn legacy_jvm_spec() -> Vec<ArgumentSpec> {
    vec![
        ArgumentSpec::when(vec![Rule::allow().on_os("osx")], &["-XstartOnFirstThread"]),
        ArgumentSpec::literal("-Djava.library.path=${natives_directory}"),
        ArgumentSpec::literal("-cp"),
        ArgumentSpec::literal("${classpath}"),
    ]
}
