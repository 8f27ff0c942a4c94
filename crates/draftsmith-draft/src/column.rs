//! Column type specification grammar
//!
//! A column spec is `type[:arg,arg] [modifier ...]`, for example
//! `"string:255"`, `"timestamp nullable"` or `"id:User foreign"`.

use crate::error::ColumnSpecError;
use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("type-name pattern compiles"));

/// Column modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// Column accepts NULL
    Nullable,
    /// Unique index
    Unique,
    /// Plain index
    Index,
    /// Unsigned numeric
    Unsigned,
    /// Foreign key, optionally naming the referenced table
    Foreign(Option<String>),
    /// Default value
    Default(String),
    /// Column comment
    Comment(String),
}

/// Parsed column specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Base type (`string`, `id`, `decimal`, ...)
    pub data_type: String,
    /// Type arguments (`255`, `8,2`, `User`)
    pub args: Vec<String>,
    /// Modifiers in declaration order
    pub modifiers: Vec<Modifier>,
}

impl ColumnSpec {
    /// Parse `spec` for column `name`
    ///
    /// # Errors
    /// Returns [`ColumnSpecError`] for empty specs, malformed type tokens,
    /// empty arguments and unknown modifiers
    pub fn parse(name: &str, spec: &str) -> Result<Self, ColumnSpecError> {
        let mut tokens = spec.split_whitespace();
        let head = tokens.next().ok_or_else(|| ColumnSpecError::Empty {
            column: name.to_string(),
        })?;

        let (data_type, raw_args) = match head.split_once(':') {
            Some((ty, args)) => (ty, Some(args)),
            None => (head, None),
        };
        if !TYPE_NAME.is_match(data_type) {
            return Err(ColumnSpecError::MalformedType {
                column: name.to_string(),
                token: head.to_string(),
            });
        }

        let args = match raw_args {
            None => Vec::new(),
            Some(raw) => {
                let args: Vec<String> = raw.split(',').map(|a| a.trim().to_string()).collect();
                if args.iter().any(String::is_empty) {
                    return Err(ColumnSpecError::EmptyArgument {
                        column: name.to_string(),
                        token: head.to_string(),
                    });
                }
                args
            }
        };

        let modifiers = tokens
            .map(|token| parse_modifier(name, token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            args,
            modifiers,
        })
    }

    /// True when the column carries `modifier`
    #[must_use]
    pub fn has(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// True for `nullable` columns
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.has(&Modifier::Nullable)
    }

    /// Foreign key marker, if any
    #[must_use]
    pub fn foreign(&self) -> Option<&Modifier> {
        self.modifiers
            .iter()
            .find(|m| matches!(m, Modifier::Foreign(_)))
    }

    /// Model referenced by an `id:Model` column
    #[must_use]
    pub fn referenced_model(&self) -> Option<&str> {
        if self.data_type == "id" {
            self.args.first().map(String::as_str)
        } else {
            None
        }
    }
}

fn parse_modifier(column: &str, token: &str) -> Result<Modifier, ColumnSpecError> {
    let (word, value) = match token.split_once(':') {
        Some((word, value)) => (word, Some(value)),
        None => (token, None),
    };
    let modifier = match (word.to_ascii_lowercase().as_str(), value) {
        ("nullable", None) => Modifier::Nullable,
        ("unique", None) => Modifier::Unique,
        ("index", None) => Modifier::Index,
        ("unsigned", None) => Modifier::Unsigned,
        ("foreign", None) => Modifier::Foreign(None),
        ("foreign", Some(table)) if !table.is_empty() => Modifier::Foreign(Some(table.to_string())),
        ("default", Some(value)) => Modifier::Default(value.to_string()),
        ("comment", Some(text)) => Modifier::Comment(text.to_string()),
        _ => {
            return Err(ColumnSpecError::UnknownModifier {
                column: column.to_string(),
                modifier: token.to_string(),
            })
        }
    };
    Ok(modifier)
}
