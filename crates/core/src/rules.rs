use serde::{Deserialize, Serialize};

use crate::text::contains_any;

/// Routes a question to `target` when every needle in `all_of` occurs in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRoute {
    pub all_of: Vec<String>,
    pub target: String,
}

impl KeywordRoute {
    pub fn new(all_of: &[&str], target: &str) -> Self {
        Self {
            all_of: all_of.iter().map(|needle| needle.to_string()).collect(),
            target: target.to_string(),
        }
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.all_of
            .iter()
            .all(|needle| normalized.contains(needle.as_str()))
    }
}

/// Keyword table driving the router's intent branches.
///
/// Every lookup expects an already normalized question. Routes are tried in
/// order and the first match wins; the default applies when a trigger fired but
/// no route matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentRules {
    pub policy_triggers: Vec<String>,
    pub policy_topics: Vec<KeywordRoute>,
    pub default_policy_topic: String,
    pub faq_threshold: f64,
    pub workflow_triggers: Vec<String>,
    pub workflow_keys: Vec<KeywordRoute>,
    pub default_workflow_key: String,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self {
            policy_triggers: to_strings(&[
                "policy",
                "rule",
                "attendance",
                "plagiarism",
                "leave",
                "discipline",
            ]),
            policy_topics: vec![
                KeywordRoute::new(&["attend"], "attendance"),
                KeywordRoute::new(&["plag"], "plagiarism"),
            ],
            default_policy_topic: "attendance".to_string(),
            faq_threshold: 0.72,
            workflow_triggers: to_strings(&[
                "how to",
                "how do i",
                "steps",
                "apply",
                "process",
                "re-eval",
                "reeval",
                "re-evaluation",
                "transcript",
            ]),
            workflow_keys: vec![KeywordRoute::new(&["re", "val"], "reval")],
            default_workflow_key: "transcript".to_string(),
        }
    }
}

impl IntentRules {
    /// Policy topic for the question, or `None` when no policy trigger fires.
    pub fn policy_topic(&self, normalized: &str) -> Option<&str> {
        if !contains_any(normalized, &self.policy_triggers) {
            return None;
        }
        Some(resolve(
            &self.policy_topics,
            &self.default_policy_topic,
            normalized,
        ))
    }

    /// Workflow key for the question, or `None` when no workflow trigger fires.
    pub fn workflow_key(&self, normalized: &str) -> Option<&str> {
        if !contains_any(normalized, &self.workflow_triggers) {
            return None;
        }
        Some(resolve(
            &self.workflow_keys,
            &self.default_workflow_key,
            normalized,
        ))
    }

    pub fn faq_accepts(&self, score: f64) -> bool {
        score >= self.faq_threshold
    }
}

fn resolve<'a>(routes: &'a [KeywordRoute], default: &'a str, normalized: &str) -> &'a str {
    routes
        .iter()
        .find(|route| route.matches(normalized))
        .map(|route| route.target.as_str())
        .unwrap_or(default)
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
