use helpdesk_core::{parse_policy, slugify, HelpdeskResult, PolicyResult, PolicySection};

/// Raw policy text keyed by topic slug.
pub trait PolicySource: Send + Sync {
    fn policy_text(&self, slug: &str) -> HelpdeskResult<Option<String>>;

    /// Slugs of every available policy, sorted.
    fn topics(&self) -> HelpdeskResult<Vec<String>>;
}

/// A parsed `topic` or `topic#section` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRequest {
    pub topic: String,
    pub section: Option<String>,
}

impl PolicyRequest {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (topic, section) = match input.split_once('#') {
            Some((topic, section)) => (topic, Some(section)),
            None => (input, None),
        };

        let section = section
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        Self {
            topic: slugify(topic),
            section,
        }
    }
}

pub fn policy_fetch(
    source: &dyn PolicySource,
    topic_or_section: &str,
) -> HelpdeskResult<PolicyResult> {
    let request = PolicyRequest::parse(topic_or_section);

    let content = source
        .policy_text(&request.topic)?
        .filter(|text| !text.is_empty());
    let Some(content) = content else {
        return Ok(PolicyResult::NotFound {
            topic: request.topic,
        });
    };

    let parsed = parse_policy(&content);

    if let Some(target) = request.section.as_deref() {
        if let Some(found) = find_section(&parsed.sections, target) {
            return Ok(PolicyResult::Section {
                topic: request.topic,
                title: parsed.title,
                section: found.heading.clone(),
                body: found.body.clone(),
            });
        }
        tracing::debug!(
            topic = %request.topic,
            section = %target,
            "section not found, returning whole policy"
        );
    }

    Ok(PolicyResult::Document {
        topic: request.topic,
        title: parsed.title,
        sections: parsed.sections,
    })
}

/// First section, in document order, whose heading contains `target` or is
/// contained in it. `target` must already be trimmed and lowercased.
pub fn find_section<'a>(sections: &'a [PolicySection], target: &str) -> Option<&'a PolicySection> {
    sections.iter().find(|section| {
        let heading = section.heading.trim().to_lowercase();
        heading.contains(target) || target.contains(heading.as_str())
    })
}
