pub mod error;
pub mod models;
pub mod policy;
pub mod rules;
pub mod text;

pub use error::{HelpdeskError, HelpdeskResult};
pub use models::*;
pub use policy::{parse_policy, DEFAULT_POLICY_TITLE};
pub use rules::{IntentRules, KeywordRoute};
pub use text::{normalize, slugify, word_tokens};
