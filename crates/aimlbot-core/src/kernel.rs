//! Engine seam: the AIML kernel trait and the in-tree mock kernel.
//!
//! Pattern matching, knowledge-base compilation, and response generation are
//! owned by an external AIML engine. [`AimlKernel`] is the boundary the
//! [`BrainAdapter`](crate::BrainAdapter) talks to; [`MockKernel`] is the
//! deterministic stand-in used for development and tests (same role the
//! mock LLM mode plays for the model router).

use crate::error::BrainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Boundary to an AIML pattern-matching engine.
///
/// The brain (compiled patterns plus learned runtime state) is opaque to the
/// caller; `save_brain`/`load_brain` move it to and from a single file.
pub trait AimlKernel: Send {
    /// Compiles one markup source file into the in-memory brain.
    fn learn(&mut self, path: &Path) -> Result<(), BrainError>;

    /// Matches an utterance against the brain. An empty string is the valid
    /// "no answer" signal, never an error.
    fn respond(&mut self, utterance: &str) -> Result<String, BrainError>;

    /// Sets a bot identity predicate (e.g. "name") used by patterns to
    /// answer identity questions.
    fn set_bot_predicate(&mut self, key: &str, value: &str);

    /// Returns the current value of a bot predicate, if set.
    fn bot_predicate(&self, key: &str) -> Option<String>;

    /// Serializes the full brain state to `path`, overwriting it.
    fn save_brain(&self, path: &Path) -> Result<(), BrainError>;

    /// Replaces the in-memory brain with the state serialized at `path`.
    fn load_brain(&mut self, path: &Path) -> Result<(), BrainError>;

    /// Clears all in-memory state (patterns and predicates).
    fn reset(&mut self);
}

/// One stimulus-response category of the mock kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Category {
    /// Normalized pattern. A trailing `*` matches any continuation.
    pattern: String,
    /// Response template; may contain `<bot name="..."/>` predicate tags.
    template: String,
}

/// Serialized state of the mock kernel (its "brain").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BrainState {
    categories: Vec<Category>,
    predicates: BTreeMap<String, String>,
}

/// Deterministic mock engine behind the [`AimlKernel`] seam.
///
/// Source files are line-oriented: `PATTERN :: template`, `#` comments and
/// blank lines skipped. Matching is exact on the normalized utterance, with
/// a trailing-`*` prefix form; templates may reference bot predicates via
/// `<bot name="key"/>` tags. Not an AIML implementation — just enough
/// behavior to exercise the adapter end to end.
#[derive(Debug, Default)]
pub struct MockKernel {
    state: BrainState,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercases, strips punctuation, and collapses whitespace.
    fn normalize(text: &str) -> String {
        text.chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Expands `<bot name="key"/>` tags from the predicate table. Unset
    /// predicates expand to nothing, matching how unset AIML bot predicates
    /// render empty.
    fn expand_template(&self, template: &str) -> String {
        const OPEN: &str = "<bot name=\"";
        const CLOSE: &str = "\"/>";
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            match after.find(CLOSE) {
                Some(end) => {
                    if let Some(value) = self.state.predicates.get(&after[..end]) {
                        out.push_str(value);
                    }
                    rest = &after[end + CLOSE.len()..];
                }
                None => {
                    // Unterminated tag: emit verbatim.
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl AimlKernel for MockKernel {
    fn learn(&mut self, path: &Path) -> Result<(), BrainError> {
        let source = fs::read_to_string(path)?;
        let mut learned = 0usize;
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((pattern, template)) = line.split_once("::") else {
                return Err(BrainError::Kernel(format!(
                    "malformed category in {}: {:?}",
                    path.display(),
                    line
                )));
            };
            let raw = pattern.trim();
            let wildcard = raw.ends_with('*');
            let mut normalized = Self::normalize(raw);
            if wildcard {
                normalized.push_str(" *");
            }
            self.state.categories.push(Category {
                pattern: normalized,
                template: template.trim().to_string(),
            });
            learned += 1;
        }
        tracing::debug!(
            target: "aimlbot::kernel",
            "learned {} categories from {}",
            learned,
            path.display()
        );
        Ok(())
    }

    fn respond(&mut self, utterance: &str) -> Result<String, BrainError> {
        let input = Self::normalize(utterance);
        if input.is_empty() {
            return Ok(String::new());
        }
        // Exact match wins; otherwise the longest wildcard prefix.
        let mut best: Option<(usize, &Category)> = None;
        for category in &self.state.categories {
            if let Some(prefix) = category.pattern.strip_suffix(" *") {
                let matches = input == prefix
                    || input
                        .strip_prefix(prefix)
                        .is_some_and(|tail| tail.starts_with(' '));
                if matches && best.map_or(true, |(len, _)| prefix.len() > len) {
                    best = Some((prefix.len(), category));
                }
            } else if category.pattern == input {
                return Ok(self.expand_template(&category.template));
            }
        }
        Ok(best
            .map(|(_, category)| self.expand_template(&category.template))
            .unwrap_or_default())
    }

    fn set_bot_predicate(&mut self, key: &str, value: &str) {
        self.state
            .predicates
            .insert(key.to_string(), value.to_string());
    }

    fn bot_predicate(&self, key: &str) -> Option<String> {
        self.state.predicates.get(key).cloned()
    }

    fn save_brain(&self, path: &Path) -> Result<(), BrainError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(&self.state)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn load_brain(&mut self, path: &Path) -> Result<(), BrainError> {
        let bytes = fs::read(path)?;
        self.state = serde_json::from_slice(&bytes)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = BrainState::default();
    }
}
