//! Description-to-draft drafting
//!
//! A [`DraftingBackend`] turns free text into a draft document (YAML or JSON,
//! possibly wrapped in a Markdown fence). [`Drafter`] normalises the reply,
//! merges it over the existing draft and writes the result atomically.

use draftsmith_draft::{Draft, DraftError, DraftParser};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Drafting failures
#[derive(Debug, thiserror::Error)]
pub enum DraftingError {
    /// Description is blank
    #[error("description is empty")]
    EmptyDescription,

    /// Backend could not produce a draft
    #[error("drafting backend failed: {0}")]
    Backend(String),

    /// Backend reply is not a usable draft
    #[error("drafting backend returned an unusable draft: {message}")]
    InvalidResponse {
        /// Parse or validation message
        message: String,
    },

    /// Existing draft could not be read or parsed
    #[error("existing draft is unusable: {0}")]
    Existing(#[source] DraftError),

    /// Writing the merged draft failed
    #[error("failed to write draft {path}: {source}")]
    Io {
        /// Draft path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Produces draft text from a description
#[cfg_attr(test, mockall::automock)]
pub trait DraftingBackend: Send + Sync {
    /// Draft document for `description`, given the current draft text if any
    ///
    /// # Errors
    /// Returns [`DraftingError`] if no draft can be produced
    fn draft_from_description<'a>(
        &self,
        description: &str,
        existing: Option<&'a str>,
    ) -> Result<String, DraftingError>;
}

/// Deterministic local backend
///
/// Every capitalised word becomes a model with a single `name: string` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateBackend;

const STOP_WORDS: &[&str] = &[
    "A", "An", "And", "Each", "Every", "For", "I", "It", "My", "Our", "The", "They", "This", "We",
    "With",
];

impl TemplateBackend {
    fn nouns(description: &str) -> Vec<String> {
        let mut nouns: Vec<String> = Vec::new();
        for word in description.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_ascii_alphanumeric());
            let starts_upper = word.chars().next().is_some_and(|c| c.is_ascii_uppercase());
            if !starts_upper || STOP_WORDS.contains(&word) {
                continue;
            }
            if !nouns.iter().any(|n| n == word) {
                nouns.push(word.to_string());
            }
        }
        nouns
    }
}

impl DraftingBackend for TemplateBackend {
    fn draft_from_description(
        &self,
        description: &str,
        _existing: Option<&str>,
    ) -> Result<String, DraftingError> {
        let nouns = Self::nouns(description);
        if nouns.is_empty() {
            return Err(DraftingError::Backend(
                "no capitalised nouns found in description".to_string(),
            ));
        }
        let mut yaml = String::from("models:\n");
        for noun in nouns {
            yaml.push_str(&format!("  {noun}:\n    name: string\n"));
        }
        Ok(yaml)
    }
}

/// Strip a surrounding Markdown code fence, if any
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (```yaml)
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Drafts, merges and writes draft files
#[derive(Debug)]
pub struct Drafter<B> {
    backend: B,
    parser: DraftParser,
}

impl<B: DraftingBackend> Drafter<B> {
    /// Create drafter over `backend`
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            parser: DraftParser::new(),
        }
    }

    /// Draft from `description` and merge it into `draft_path`
    ///
    /// New entries win over same-named existing ones.
    ///
    /// # Errors
    /// Returns [`DraftingError`] if the backend fails, its reply is not a
    /// draft, the existing draft is invalid or the write fails
    pub fn draft(&self, description: &str, draft_path: &Path) -> Result<Draft, DraftingError> {
        if description.trim().is_empty() {
            return Err(DraftingError::EmptyDescription);
        }

        let existing_text = match std::fs::read_to_string(draft_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(DraftingError::Existing(DraftError::io_error(draft_path, e)));
            }
        };
        // a freshly scaffolded draft with every section empty counts as absent
        let existing = existing_text
            .as_deref()
            .map(|text| self.parser.parse_partial(text, draft_path))
            .transpose()
            .map_err(DraftingError::Existing)?
            .filter(|draft| !draft.is_empty());
        let existing_text = existing_text.filter(|_| existing.is_some());

        let reply = self
            .backend
            .draft_from_description(description, existing_text.as_deref())?;
        let drafted = self.parse_reply(&reply, draft_path)?;

        let merged = match existing {
            Some(current) => current.merged_with(&drafted),
            None => drafted,
        };
        if merged.is_empty() {
            return Err(DraftingError::InvalidResponse {
                message: draftsmith_draft::EMPTY_DRAFT_MESSAGE.to_string(),
            });
        }

        let yaml = merged
            .to_yaml_string()
            .map_err(|e| DraftingError::InvalidResponse {
                message: e.to_string(),
            })?;
        write_atomic(draft_path, yaml.as_bytes()).map_err(|source| DraftingError::Io {
            path: draft_path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %draft_path.display(),
            models = merged.models.len(),
            "draft written"
        );
        Ok(merged)
    }

    fn parse_reply(&self, reply: &str, origin: &Path) -> Result<Draft, DraftingError> {
        let body = strip_code_fence(reply);
        let yaml = if body.starts_with('{') {
            let value: serde_json::Value =
                serde_json::from_str(body).map_err(|e| DraftingError::InvalidResponse {
                    message: format!("JSON parse error: {e}"),
                })?;
            serde_yaml::to_string(&value).map_err(|e| DraftingError::InvalidResponse {
                message: e.to_string(),
            })?
        } else {
            body.to_string()
        };
        self.parser
            .parse_str(&yaml, origin)
            .map_err(|e| DraftingError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_backend_one_model_per_noun() {
        let yaml = TemplateBackend
            .draft_from_description("A blog with Post and Comment. Each Post has Tags.", None)
            .unwrap();
        let draft = DraftParser::new()
            .parse_str(&yaml, Path::new("draft.yaml"))
            .unwrap();
        let names: Vec<&str> = draft.models.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Post", "Comment", "Tags"]);
        assert_eq!(draft.models["Post"].columns["name"], "string");
    }

    #[test]
    fn template_backend_needs_a_noun() {
        assert!(matches!(
            TemplateBackend.draft_from_description("just some words", None),
            Err(DraftingError::Backend(_))
        ));
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fence("```yaml\nmodels: {}\n```\n"), "models: {}");
        assert_eq!(strip_code_fence("```\na: 1\n```"), "a: 1");
        assert_eq!(strip_code_fence("  plain: text  "), "plain: text");
    }

    #[test]
    fn drafts_into_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        let drafter = Drafter::new(TemplateBackend);

        let draft = drafter.draft("Track every Invoice", &path).unwrap();
        assert!(draft.model("Invoice").is_some());

        let reparsed = DraftParser::new().parse(&path).unwrap();
        assert_eq!(reparsed, draft);
    }

    #[test]
    fn merges_over_existing_and_passes_it_to_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        let existing = "models:\n  User:\n    email: string unique\n  Post:\n    title: string\n";
        std::fs::write(&path, existing).unwrap();

        let mut backend = MockDraftingBackend::new();
        backend
            .expect_draft_from_description()
            .withf(move |description, current| {
                description == "add comments" && *current == Some(existing)
            })
            .times(1)
            .returning(|_, _| {
                Ok("```json\n{\"models\": {\"Post\": {\"body\": \"text\"}, \"Comment\": {\"body\": \"text\"}}}\n```".to_string())
            });

        let draft = Drafter::new(backend).draft("add comments", &path).unwrap();
        let names: Vec<&str> = draft.models.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["User", "Post", "Comment"]);
        // drafted entries replace same-named ones
        assert!(draft.models["Post"].columns.get("title").is_none());
        assert_eq!(draft.models["Post"].columns["body"], "text");
    }

    #[test]
    fn empty_existing_draft_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        std::fs::write(&path, "models: {}\nactions: {}\npages: {}\n").unwrap();

        let mut backend = MockDraftingBackend::new();
        backend
            .expect_draft_from_description()
            .withf(|_, current| current.is_none())
            .times(1)
            .returning(|_, _| Ok("models:\n  Invoice:\n    total: integer\n".to_string()));

        let draft = Drafter::new(backend).draft("track invoices", &path).unwrap();
        assert_eq!(draft.models.keys().collect::<Vec<_>>(), vec!["Invoice"]);
        assert_eq!(DraftParser::new().parse(&path).unwrap(), draft);
    }

    #[test]
    fn backend_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        std::fs::write(&path, "pages:\n  Home:\n").unwrap();

        let mut backend = MockDraftingBackend::new();
        backend
            .expect_draft_from_description()
            .returning(|_, _| Err(DraftingError::Backend("offline".to_string())));

        let err = Drafter::new(backend).draft("anything", &path).unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pages:\n  Home:\n");
    }

    #[test]
    fn empty_reply_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        let mut backend = MockDraftingBackend::new();
        backend
            .expect_draft_from_description()
            .returning(|_, _| Ok("models: {}\n".to_string()));

        let err = Drafter::new(backend).draft("nothing", &path).unwrap_err();
        assert!(matches!(err, DraftingError::InvalidResponse { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn blank_description_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Drafter::new(TemplateBackend)
            .draft("   ", &dir.path().join("draft.yaml"))
            .unwrap_err();
        assert!(matches!(err, DraftingError::EmptyDescription));
    }
}
