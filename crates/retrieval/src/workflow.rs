use helpdesk_core::{normalize, WorkflowEntry, WorkflowMatch, WorkflowResult};

use crate::similarity::{round_score, similarity};

/// Best workflow for `name_or_id`, scoring name and id separately per entry.
pub fn workflow_guide(entries: &[WorkflowEntry], name_or_id: &str) -> WorkflowResult {
    let query = normalize(name_or_id);
    let mut best: Option<(f64, &WorkflowEntry)> = None;

    for entry in entries {
        let by_name = similarity(&query, &normalize(&entry.name));
        let by_id = similarity(&query, &normalize(&entry.id));
        let score = by_name.max(by_id);

        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, entry));
        }
    }

    match best {
        Some((score, entry)) => WorkflowResult::Found(WorkflowMatch {
            id: entry.id.clone(),
            name: entry.name.clone(),
            steps: entry.steps.clone(),
            required_docs: entry.required_docs.clone(),
            template_id: entry.template_id.clone(),
            score: round_score(score),
        }),
        None => WorkflowResult::NotFound,
    }
}
