use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helpdesk_core::{
    slugify, FaqEntry, Glossary, HelpdeskError, HelpdeskResult, IntentRules, WorkflowEntry,
};
use helpdesk_retrieval::{KnowledgeBase, PolicySource};
use serde::de::DeserializeOwned;
use tracing::info;
use walkdir::WalkDir;

pub const FAQ_FILE: &str = "faq.json";
pub const GLOSSARY_FILE: &str = "glossary.json";
pub const WORKFLOWS_FILE: &str = "workflows.json";
pub const ROUTING_FILE: &str = "routing.json";
pub const POLICIES_DIR: &str = "policies";
pub const TEMPLATES_DIR: &str = "templates";

const POLICY_EXTENSION: &str = "md";

/// Policy documents held in memory, keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyStore {
    documents: BTreeMap<String, String>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document under the slug of `topic`.
    pub fn with_policy(mut self, topic: &str, text: impl Into<String>) -> Self {
        self.documents.insert(slugify(topic), text.into());
        self
    }
}

impl PolicySource for MemoryPolicyStore {
    fn policy_text(&self, slug: &str) -> HelpdeskResult<Option<String>> {
        Ok(self.documents.get(slug).cloned())
    }

    fn topics(&self) -> HelpdeskResult<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }
}

/// Reads `<slug>.md` from a directory on every request.
#[derive(Debug, Clone)]
pub struct DirectoryPolicyStore {
    root: PathBuf,
}

impl DirectoryPolicyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PolicySource for DirectoryPolicyStore {
    fn policy_text(&self, slug: &str) -> HelpdeskResult<Option<String>> {
        if slug.is_empty() || slugify(slug) != slug {
            return Ok(None);
        }

        let path = self.root.join(format!("{slug}.{POLICY_EXTENSION}"));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HelpdeskError::PolicyStore {
                topic: slug.to_string(),
                source,
            }),
        }
    }

    fn topics(&self) -> HelpdeskResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut topics = Vec::new();
        for entry in WalkDir::new(&self.root).max_depth(1) {
            let entry = entry.map_err(|err| HelpdeskError::Io {
                path: self.root.clone(),
                source: err.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(POLICY_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                topics.push(stem.to_string());
            }
        }
        topics.sort();

        Ok(topics)
    }
}

#[derive(Debug, Clone)]
pub enum PolicyStore {
    Memory(MemoryPolicyStore),
    Directory(DirectoryPolicyStore),
}

impl PolicyStore {
    pub fn memory(store: MemoryPolicyStore) -> Self {
        Self::Memory(store)
    }

    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory(DirectoryPolicyStore::new(root))
    }
}

impl PolicySource for PolicyStore {
    fn policy_text(&self, slug: &str) -> HelpdeskResult<Option<String>> {
        match self {
            PolicyStore::Memory(store) => store.policy_text(slug),
            PolicyStore::Directory(store) => store.policy_text(slug),
        }
    }

    fn topics(&self) -> HelpdeskResult<Vec<String>> {
        match self {
            PolicyStore::Memory(store) => store.topics(),
            PolicyStore::Directory(store) => store.topics(),
        }
    }
}

pub fn load_faqs(path: &Path) -> HelpdeskResult<Vec<FaqEntry>> {
    let entries: Vec<FaqEntry> = read_json(path)?;
    for (idx, entry) in entries.iter().enumerate() {
        if entry.question.trim().is_empty() {
            return Err(HelpdeskError::MalformedCorpus {
                corpus: "faq",
                message: format!("entry {idx} has an empty question"),
            });
        }
    }
    Ok(entries)
}

pub fn load_glossary(path: &Path) -> HelpdeskResult<Glossary> {
    read_json(path)
}

pub fn load_workflows(path: &Path) -> HelpdeskResult<Vec<WorkflowEntry>> {
    let entries: Vec<WorkflowEntry> = read_json(path)?;
    for (idx, entry) in entries.iter().enumerate() {
        if entry.id.trim().is_empty() || entry.name.trim().is_empty() {
            return Err(HelpdeskError::MalformedCorpus {
                corpus: "workflow",
                message: format!("entry {idx} needs both an id and a name"),
            });
        }
    }
    Ok(entries)
}

/// Routing rules from `routing.json` under `root`, or the built-in table.
pub fn load_rules(root: &Path) -> HelpdeskResult<IntentRules> {
    let path = root.join(ROUTING_FILE);
    if !path.is_file() {
        return Ok(IntentRules::default());
    }
    read_json(&path)
}

/// Loads the corpus directory layout:
///
/// ```text
/// <root>/faq.json
/// <root>/glossary.json
/// <root>/workflows.json
/// <root>/policies/<slug>.md
/// <root>/templates/
/// ```
pub fn load_knowledge_base(root: &Path) -> HelpdeskResult<KnowledgeBase> {
    let faqs = load_faqs(&root.join(FAQ_FILE))?;
    let glossary = load_glossary(&root.join(GLOSSARY_FILE))?;
    let workflows = load_workflows(&root.join(WORKFLOWS_FILE))?;
    let policies = PolicyStore::directory(root.join(POLICIES_DIR));

    info!(
        root = %root.display(),
        faqs = faqs.len(),
        glossary_terms = glossary.len(),
        workflows = workflows.len(),
        "knowledge base loaded"
    );

    Ok(
        KnowledgeBase::new(faqs, glossary, workflows, Arc::new(policies))
            .with_templates_dir(root.join(TEMPLATES_DIR)),
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> HelpdeskResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| HelpdeskError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| HelpdeskError::Json {
        path: path.to_path_buf(),
        source,
    })
}
