use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OFFLINE_NOTICE: &str = "No-LLM mode (offline).";
pub const FALLBACK_ANSWER: &str = "I don't have this in my static knowledge.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "q", alias = "question")]
    pub question: String,
    #[serde(rename = "a", alias = "answer")]
    pub answer: String,
}

/// Canonical term mapped to its synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glossary(BTreeMap<String, Vec<String>>);

impl Glossary {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(entries)
    }

    pub fn synonym_groups(&self) -> impl Iterator<Item = &[String]> {
        self.0.values().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Glossary
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(term, synonyms)| {
                    (
                        term.into(),
                        synonyms.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub required_docs: Vec<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPolicy {
    pub title: String,
    pub sections: Vec<PolicySection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqMatch {
    pub score: f64,
    pub matched_question: String,
    pub answer: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "FaqResultWire")]
pub enum FaqResult {
    Found(FaqMatch),
    NotFound,
}

impl FaqResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn score(&self) -> f64 {
        match self {
            Self::Found(hit) => hit.score,
            Self::NotFound => 0.0,
        }
    }
}

#[derive(Serialize)]
struct FaqResultWire {
    found: bool,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl From<FaqResult> for FaqResultWire {
    fn from(result: FaqResult) -> Self {
        match result {
            FaqResult::Found(hit) => Self {
                found: true,
                score: hit.score,
                matched_question: Some(hit.matched_question),
                answer: Some(hit.answer),
                id: Some(hit.id),
            },
            FaqResult::NotFound => Self {
                found: false,
                score: 0.0,
                matched_question: None,
                answer: None,
                id: None,
            },
        }
    }
}

/// Outcome of a policy fetch. A requested section that does not exist falls
/// back to `Document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "PolicyResultWire")]
pub enum PolicyResult {
    NotFound {
        topic: String,
    },
    Section {
        topic: String,
        title: String,
        section: String,
        body: String,
    },
    Document {
        topic: String,
        title: String,
        sections: Vec<PolicySection>,
    },
}

impl PolicyResult {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }

    pub fn topic(&self) -> &str {
        match self {
            Self::NotFound { topic } | Self::Section { topic, .. } | Self::Document { topic, .. } => {
                topic
            }
        }
    }
}

#[derive(Serialize)]
struct PolicyResultWire {
    found: bool,
    topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sections: Option<Vec<PolicySection>>,
}

impl From<PolicyResult> for PolicyResultWire {
    fn from(result: PolicyResult) -> Self {
        match result {
            PolicyResult::NotFound { topic } => Self {
                found: false,
                topic,
                title: None,
                section: None,
                body: None,
                sections: None,
            },
            PolicyResult::Section {
                topic,
                title,
                section,
                body,
            } => Self {
                found: true,
                topic,
                title: Some(title),
                section: Some(section),
                body: Some(body),
                sections: None,
            },
            PolicyResult::Document {
                topic,
                title,
                sections,
            } => Self {
                found: true,
                topic,
                title: Some(title),
                section: None,
                body: None,
                sections: Some(sections),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMatch {
    pub id: String,
    pub name: String,
    pub steps: Vec<String>,
    pub required_docs: Vec<String>,
    pub template_id: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "WorkflowResultWire")]
pub enum WorkflowResult {
    Found(WorkflowMatch),
    NotFound,
}

impl WorkflowResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[derive(Serialize)]
struct WorkflowResultWire {
    found: bool,
    #[serde(flatten)]
    hit: Option<WorkflowMatch>,
}

impl From<WorkflowResult> for WorkflowResultWire {
    fn from(result: WorkflowResult) -> Self {
        match result {
            WorkflowResult::Found(hit) => Self {
                found: true,
                hit: Some(hit),
            },
            WorkflowResult::NotFound => Self {
                found: false,
                hit: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub info: String,
}

impl Notice {
    pub fn offline() -> Self {
        Self {
            info: OFFLINE_NOTICE.to_string(),
        }
    }
}

/// One tool invocation recorded while answering a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tool", content = "result")]
pub enum EvidenceStep {
    PolicyFetch(PolicyResult),
    #[serde(rename = "FAQLookup")]
    FaqLookup(FaqResult),
    WorkflowGuide(WorkflowResult),
    Notice(Notice),
}

impl EvidenceStep {
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::PolicyFetch(_) => "PolicyFetch",
            Self::FaqLookup(_) => "FAQLookup",
            Self::WorkflowGuide(_) => "WorkflowGuide",
            Self::Notice(_) => "Notice",
        }
    }

    /// The tool's result as a generic JSON document.
    pub fn result_value(&self) -> Value {
        let value = match self {
            Self::PolicyFetch(result) => serde_json::to_value(result),
            Self::FaqLookup(result) => serde_json::to_value(result),
            Self::WorkflowGuide(result) => serde_json::to_value(result),
            Self::Notice(notice) => serde_json::to_value(notice),
        };
        value.unwrap_or(Value::Null)
    }

    /// `{"tool": ..., "result": ...}` form used for display.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "tool": self.tool_name(),
            "result": self.result_value(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentBranch {
    Policy,
    Faq,
    Workflow,
    Fallback,
}

impl IntentBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::Faq => "faq",
            Self::Workflow => "workflow",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterResult {
    pub answer: String,
    pub evidence: Vec<EvidenceStep>,
    pub branch: IntentBranch,
}
