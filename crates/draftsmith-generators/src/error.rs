//! Generator errors

use draftsmith_draft::ColumnSpecError;

/// A generator could not render a candidate
///
/// Always fatal for the run. Every variant names the generator and the
/// offending draft entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Generic rendering failure
    #[error("{generator} generator failed for '{entity}': {message}")]
    Render {
        /// Generator name
        generator: String,
        /// Draft entity (model, action or page name)
        entity: String,
        /// What went wrong
        message: String,
    },

    /// A column specification did not parse
    #[error("{generator} generator failed for '{entity}': {source}")]
    InvalidColumn {
        /// Generator name
        generator: String,
        /// Model name
        entity: String,
        /// Grammar error naming the column
        #[source]
        source: ColumnSpecError,
    },

    /// The stub the generator renders is not registered
    #[error("{generator} generator failed for '{entity}': stub '{stub}' is not registered")]
    MissingStub {
        /// Generator name
        generator: String,
        /// Draft entity
        entity: String,
        /// Stub name
        stub: String,
    },
}

impl GenerationError {
    /// Create render error
    pub fn render(
        generator: impl Into<String>,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Render {
            generator: generator.into(),
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Generator that failed
    #[must_use]
    pub fn generator(&self) -> &str {
        match self {
            Self::Render { generator, .. }
            | Self::InvalidColumn { generator, .. }
            | Self::MissingStub { generator, .. } => generator,
        }
    }

    /// Offending draft entity
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::Render { entity, .. }
            | Self::InvalidColumn { entity, .. }
            | Self::MissingStub { entity, .. } => entity,
        }
    }
}

/// `only` named a generator that is not registered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown generator '{name}' (known: {})", known.join(", "))]
pub struct UnknownGenerator {
    /// Requested name
    pub name: String,
    /// Registered names
    pub known: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_entity() {
        let err = GenerationError::render("model", "Post", "boom");
        assert_eq!(err.to_string(), "model generator failed for 'Post': boom");
        assert_eq!(err.entity(), "Post");
        assert_eq!(err.generator(), "model");
    }

    #[test]
    fn invalid_column_names_column() {
        let err = GenerationError::InvalidColumn {
            generator: "migration".to_string(),
            entity: "Post".to_string(),
            source: ColumnSpecError::Empty {
                column: "title".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("Post"));
        assert!(msg.contains("title"));
    }

    #[test]
    fn unknown_generator_lists_known() {
        let err = UnknownGenerator {
            name: "modle".to_string(),
            known: vec!["model".to_string(), "migration".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown generator 'modle' (known: model, migration)"
        );
    }
}
