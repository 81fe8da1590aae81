mod faq;
mod glossary;
mod policy;
mod similarity;
mod workflow;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helpdesk_core::{
    FaqEntry, FaqResult, Glossary, HelpdeskResult, PolicyResult, WorkflowEntry, WorkflowResult,
};
use serde::Serialize;
use walkdir::WalkDir;

pub use faq::faq_lookup;
pub use glossary::expand_query;
pub use policy::{find_section, policy_fetch, PolicyRequest, PolicySource};
pub use similarity::{round_score, similarity};
pub use workflow::workflow_guide;

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub faqs_loaded: usize,
    pub glossary_terms: usize,
    pub workflows_loaded: usize,
}

/// The read-only corpora every lookup runs against.
///
/// Built once at startup and shared behind `Arc`; nothing here mutates after
/// construction.
#[derive(Clone)]
pub struct KnowledgeBase {
    faqs: Vec<FaqEntry>,
    glossary: Glossary,
    workflows: Vec<WorkflowEntry>,
    policies: Arc<dyn PolicySource>,
    templates_dir: Option<PathBuf>,
}

impl KnowledgeBase {
    pub fn new(
        faqs: Vec<FaqEntry>,
        glossary: Glossary,
        workflows: Vec<WorkflowEntry>,
        policies: Arc<dyn PolicySource>,
    ) -> Self {
        Self {
            faqs,
            glossary,
            workflows,
            policies,
            templates_dir: None,
        }
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    pub fn faq_lookup(&self, query: &str) -> FaqResult {
        faq_lookup(&self.faqs, &self.glossary, query)
    }

    pub fn policy_fetch(&self, topic_or_section: &str) -> HelpdeskResult<PolicyResult> {
        policy_fetch(self.policies.as_ref(), topic_or_section)
    }

    pub fn workflow_guide(&self, name_or_id: &str) -> WorkflowResult {
        workflow_guide(&self.workflows, name_or_id)
    }

    pub fn policy_topics(&self) -> HelpdeskResult<Vec<String>> {
        self.policies.topics()
    }

    /// File in the templates directory whose stem equals `template_id`.
    pub fn template_path(&self, template_id: &str) -> Option<PathBuf> {
        let dir = self.templates_dir.as_deref()?;
        find_template(dir, template_id)
    }

    pub fn stats(&self) -> KnowledgeStats {
        KnowledgeStats {
            faqs_loaded: self.faqs.len(),
            glossary_terms: self.glossary.len(),
            workflows_loaded: self.workflows.len(),
        }
    }

    pub fn faqs(&self) -> &[FaqEntry] {
        &self.faqs
    }

    pub fn workflows(&self) -> &[WorkflowEntry] {
        &self.workflows
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }
}

impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("stats", &self.stats())
            .field("templates_dir", &self.templates_dir)
            .finish_non_exhaustive()
    }
}

fn find_template(dir: &Path, template_id: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem == template_id)
        })
        .map(|entry| entry.into_path())
}
