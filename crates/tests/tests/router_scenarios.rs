use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use helpdesk_agents::HelpdeskAgent;
use helpdesk_core::{
    EvidenceStep, FaqResult, IntentBranch, PolicyResult, WorkflowResult, FALLBACK_ANSWER,
};
use helpdesk_observability::AppMetrics;

fn kb_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../kb")
}

fn agent() -> Result<HelpdeskAgent> {
    Ok(HelpdeskAgent::load(&kb_root(), Arc::new(AppMetrics::default()))?)
}

fn tools(steps: &[EvidenceStep]) -> Vec<&'static str> {
    steps.iter().map(EvidenceStep::tool_name).collect()
}

#[test]
fn attendance_question_answers_from_policy() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("What is the attendance policy?")?;

    assert_eq!(result.branch, IntentBranch::Policy);
    assert!(result.answer.starts_with("# Attendance Policy\n\n## Minimum attendance"));
    assert!(result.answer.contains("## Shortage"));
    assert_eq!(tools(&result.evidence), vec!["PolicyFetch", "Notice"]);
    Ok(())
}

#[test]
fn plagiarism_rule_question_picks_plagiarism_policy() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("plagiarism rules")?;

    assert_eq!(result.branch, IntentBranch::Policy);
    match &result.evidence[0] {
        EvidenceStep::PolicyFetch(PolicyResult::Document { topic, sections, .. }) => {
            assert_eq!(topic, "plagiarism");
            assert_eq!(sections.len(), 3);
        }
        other => panic!("expected plagiarism document, got {other:?}"),
    }
    Ok(())
}

#[test]
fn transcript_question_falls_through_to_workflow() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("How to get transcript?")?;

    assert_eq!(result.branch, IntentBranch::Workflow);
    assert_eq!(
        tools(&result.evidence),
        vec!["FAQLookup", "WorkflowGuide", "Notice"]
    );
    match &result.evidence[0] {
        EvidenceStep::FaqLookup(faq) => assert!(faq.score() < 0.72),
        other => panic!("expected FAQ lookup, got {other:?}"),
    }
    assert!(result.answer.starts_with("**Official Transcript Request**\n1. "));
    assert!(result
        .answer
        .ends_with("Required docs: Student ID card, Fee receipt"));
    Ok(())
}

#[test]
fn re_evaluation_question_routes_to_reval_workflow() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("Can I get re-evaluation of my answer sheet?")?;

    assert_eq!(result.branch, IntentBranch::Workflow);
    match &result.evidence[1] {
        EvidenceStep::WorkflowGuide(WorkflowResult::Found(hit)) => {
            assert_eq!(hit.id, "reval");
            assert_eq!(hit.score, 1.0);
        }
        other => panic!("expected reval workflow, got {other:?}"),
    }
    Ok(())
}

#[test]
fn exact_faq_question_is_answered_directly() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("When are tuition fees due?")?;

    assert_eq!(result.branch, IntentBranch::Faq);
    assert!(result.answer.starts_with("Tuition fees are due"));
    assert_eq!(tools(&result.evidence), vec!["FAQLookup", "Notice"]);
    Ok(())
}

#[test]
fn unknown_question_uses_fallback_and_ends_with_notice() -> Result<()> {
    let agent = agent()?;
    let result = agent.ask("Where is the cafeteria?")?;

    assert_eq!(result.branch, IntentBranch::Fallback);
    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert_eq!(tools(&result.evidence), vec!["FAQLookup", "Notice"]);
    match &result.evidence[0] {
        EvidenceStep::FaqLookup(FaqResult::Found(hit)) => assert!(hit.score < 0.72),
        other => panic!("expected a scored FAQ lookup, got {other:?}"),
    }
    Ok(())
}

#[test]
fn companion_policy_only_for_policy_questions() -> Result<()> {
    let agent = agent()?;

    let companion = agent.policy_companion("Is there a leave policy?")?;
    assert!(matches!(
        companion,
        Some(PolicyResult::Document { ref topic, .. }) if topic == "attendance"
    ));
    assert!(agent.policy_companion("How to get transcript?")?.is_none());
    Ok(())
}

#[test]
fn asks_are_counted_in_metrics() -> Result<()> {
    let agent = agent()?;
    agent.ask("Where is the cafeteria?")?;
    agent.ask("When are tuition fees due?")?;

    let snapshot = agent.metrics().snapshot();
    assert_eq!(snapshot.asks_total, 2);
    assert_eq!(snapshot.faq_answers_total, 1);
    assert_eq!(snapshot.fallback_total, 1);
    Ok(())
}
