use helpdesk_core::{
    normalize, EvidenceStep, FaqResult, HelpdeskResult, IntentBranch, IntentRules,
    PolicyResult, RouterResult, WorkflowMatch, WorkflowResult, FALLBACK_ANSWER,
};
use helpdesk_retrieval::KnowledgeBase;
use tracing::debug;

/// Runs the intent branches in order (policy, FAQ, workflow, fallback) and
/// records one evidence step per tool call.
pub fn route(
    kb: &KnowledgeBase,
    rules: &IntentRules,
    question: &str,
) -> HelpdeskResult<RouterResult> {
    let normalized = normalize(question);
    let mut evidence = Vec::new();

    if let Some(topic) = rules.policy_topic(&normalized) {
        debug!(topic, "policy trigger matched");
        let policy = kb.policy_fetch(topic)?;
        let rendered = render_policy(&policy);
        evidence.push(EvidenceStep::PolicyFetch(policy));
        if let Some(answer) = rendered {
            return Ok(answered(answer, evidence, IntentBranch::Policy));
        }
    }

    let faq = kb.faq_lookup(question);
    let accepted = match &faq {
        FaqResult::Found(hit) if rules.faq_accepts(hit.score) => {
            Some(hit.answer.clone())
        }
        _ => None,
    };
    debug!(score = faq.score(), accepted = accepted.is_some(), "faq lookup");
    evidence.push(EvidenceStep::FaqLookup(faq));
    if let Some(answer) = accepted {
        return Ok(answered(answer, evidence, IntentBranch::Faq));
    }

    if let Some(key) = rules.workflow_key(&normalized) {
        debug!(key, "workflow trigger matched");
        let workflow = kb.workflow_guide(key);
        let rendered = match &workflow {
            WorkflowResult::Found(hit) => Some(render_workflow(hit)),
            WorkflowResult::NotFound => None,
        };
        evidence.push(EvidenceStep::WorkflowGuide(workflow));
        if let Some(answer) = rendered {
            return Ok(answered(answer, evidence, IntentBranch::Workflow));
        }
    }

    Ok(answered(
        FALLBACK_ANSWER.to_string(),
        evidence,
        IntentBranch::Fallback,
    ))
}

/// Full policy for a question that mentions a policy keyword, for display next
/// to the routed answer.
pub fn policy_companion(
    kb: &KnowledgeBase,
    rules: &IntentRules,
    question: &str,
) -> HelpdeskResult<Option<PolicyResult>> {
    let normalized = normalize(question);
    let Some(topic) = rules.policy_topic(&normalized) else {
        return Ok(None);
    };
    let policy = kb.policy_fetch(topic)?;
    Ok(policy.is_found().then_some(policy))
}

/// Markdown for a found policy; `None` when the topic was missing.
pub fn render_policy(policy: &PolicyResult) -> Option<String> {
    match policy {
        PolicyResult::NotFound { .. } => None,
        PolicyResult::Section {
            title,
            section,
            body,
            ..
        } => Some(format!("# {title}\n\n## {section}\n\n{body}")),
        PolicyResult::Document {
            title, sections, ..
        } => {
            let mut chunks = vec![format!("# {title}")];
            chunks.extend(
                sections
                    .iter()
                    .map(|section| format!("## {}\n\n{}", section.heading, section.body)),
            );
            Some(chunks.join("\n\n"))
        }
    }
}

pub fn render_workflow(workflow: &WorkflowMatch) -> String {
    let mut lines = vec![format!("**{}**", workflow.name)];
    lines.extend(
        workflow
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| format!("{}. {}", idx + 1, step)),
    );
    if !workflow.required_docs.is_empty() {
        lines.push(format!(
            "Required docs: {}",
            workflow.required_docs.join(", ")
        ));
    }
    lines.join("\n")
}

fn answered(answer: String, evidence: Vec<EvidenceStep>, branch: IntentBranch) -> RouterResult {
    RouterResult {
        answer,
        evidence,
        branch,
    }
}
