mod router;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use helpdesk_core::{
    EvidenceStep, FaqResult, HelpdeskResult, IntentRules, Notice, PolicyResult, RouterResult,
    WorkflowResult,
};
use helpdesk_observability::AppMetrics;
use helpdesk_retrieval::KnowledgeBase;
use tracing::{info, instrument};

pub use router::{policy_companion, render_policy, render_workflow, route};

/// Answers helpdesk questions from a loaded knowledge base.
#[derive(Clone)]
pub struct HelpdeskAgent {
    kb: Arc<KnowledgeBase>,
    rules: Arc<IntentRules>,
    metrics: Arc<AppMetrics>,
}

impl HelpdeskAgent {
    pub fn new(kb: Arc<KnowledgeBase>, rules: IntentRules, metrics: Arc<AppMetrics>) -> Self {
        Self {
            kb,
            rules: Arc::new(rules),
            metrics,
        }
    }

    /// Loads the corpus directory and its optional routing table.
    pub fn load(kb_root: &Path, metrics: Arc<AppMetrics>) -> HelpdeskResult<Self> {
        let kb = helpdesk_storage::load_knowledge_base(kb_root)?;
        let rules = helpdesk_storage::load_rules(kb_root)?;
        Ok(Self::new(Arc::new(kb), rules, metrics))
    }

    /// Routes the question and appends the offline notice to the evidence.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub fn ask(&self, question: &str) -> HelpdeskResult<RouterResult> {
        let started = Instant::now();
        self.metrics.inc_ask();

        let mut result = route(&self.kb, &self.rules, question)?;
        self.metrics.add_tool_calls(result.evidence.len());
        result
            .evidence
            .push(EvidenceStep::Notice(Notice::offline()));

        self.metrics.record_answer(result.branch);
        self.metrics.observe_latency(started.elapsed());
        info!(
            branch = result.branch.as_str(),
            evidence = result.evidence.len(),
            "question answered"
        );

        Ok(result)
    }

    pub fn policy_fetch(&self, topic_or_section: &str) -> HelpdeskResult<PolicyResult> {
        self.kb.policy_fetch(topic_or_section)
    }

    pub fn faq_lookup(&self, query: &str) -> FaqResult {
        self.kb.faq_lookup(query)
    }

    pub fn workflow_guide(&self, name_or_id: &str) -> WorkflowResult {
        self.kb.workflow_guide(name_or_id)
    }

    pub fn policy_companion(&self, question: &str) -> HelpdeskResult<Option<PolicyResult>> {
        policy_companion(&self.kb, &self.rules, question)
    }

    pub fn policy_topics(&self) -> HelpdeskResult<Vec<String>> {
        self.kb.policy_topics()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn rules(&self) -> &IntentRules {
        &self.rules
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }
}
