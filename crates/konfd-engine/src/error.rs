//! Engine error types with source-mapped diagnostics

use konfd_core::ResourceKind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::functions::LookupError;
use crate::suggestions::{extract_function_name, suggest_syntax_fix, suggest_unknown_function};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// The template text does not parse
    #[error("error parsing template: {0}")]
    Parse(TemplateError),

    /// The template parsed but failed while executing
    #[error("error executing template: {error}")]
    Exec {
        error: TemplateError,
        /// Failure of a `configmap`/`secret` call that interrupted execution
        lookup: Option<LookupError>,
    },
}

impl EngineError {
    /// The source-mapped template error
    pub fn template_error(&self) -> &TemplateError {
        match self {
            Self::Parse(error) | Self::Exec { error, .. } => error,
        }
    }

    /// The lookup failure that interrupted execution, if any
    pub fn lookup(&self) -> Option<&LookupError> {
        match self {
            Self::Exec { lookup, .. } => lookup.as_ref(),
            Self::Parse(_) => None,
        }
    }

    /// The object a render needs fetched before it can complete
    pub fn unresolved(&self) -> Option<(ResourceKind, &str)> {
        match self.lookup() {
            Some(LookupError::Unresolved { kind, name }) => Some((*kind, name.as_str())),
            _ => None,
        }
    }

    /// Whether this is a parse failure
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    SyntaxError,
    UnknownFunction,
    UndefinedVariable,
    Lookup,
    Other,
}

/// Template-specific error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(konfd::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// Template source code
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in source
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    pub fn from_minijinja(
        err: &minijinja::Error,
        template_name: &str,
        template_source: &str,
        lookup: Option<&LookupError>,
    ) -> Self {
        let kind = match (err.kind(), lookup) {
            (_, Some(_)) => TemplateErrorKind::Lookup,
            (minijinja::ErrorKind::SyntaxError, _) => TemplateErrorKind::SyntaxError,
            (minijinja::ErrorKind::UnknownFunction, _) => TemplateErrorKind::UnknownFunction,
            (minijinja::ErrorKind::UndefinedError, _) => TemplateErrorKind::UndefinedVariable,
            _ => TemplateErrorKind::Other,
        };

        let message = match lookup {
            Some(lookup) => lookup.to_string(),
            None => err
                .to_string()
                .replace("invalid operation: ", "")
                .replace("syntax error: ", ""),
        };

        let span = err
            .line()
            .and_then(|line_num| calculate_span(template_source, line_num));

        let suggestion = match kind {
            TemplateErrorKind::SyntaxError => Some(suggest_syntax_fix(template_source)),
            TemplateErrorKind::UnknownFunction => {
                extract_function_name(&err.to_string()).map(|name| suggest_unknown_function(&name))
            }
            TemplateErrorKind::UndefinedVariable => Some(
                "Templates have no variables; use `configmap(name, key)` or `secret(name, key)`"
                    .to_string(),
            ),
            _ => None,
        };

        Self {
            message,
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

/// Calculate the source span for a given line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        if index + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
