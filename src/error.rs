//! Unified error types for docdiff-tools.
//!
//! One outer error type for the whole library, with per-domain kinds rendered
//! into the message and chainable context strings for tracing a failure back
//! to its origin.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docdiff-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocDiffError {
    /// Errors during document parsing
    #[error("Failed to parse document: {context}: {kind}")]
    Parse { context: String, kind: ParseErrorKind },

    /// Errors resolving a context path to a single element
    #[error("Failed to resolve input: {context}: {kind}")]
    Resolve {
        context: String,
        kind: ResolveErrorKind,
    },

    /// Errors during tree alignment
    #[error("Comparison failed: {context}: {kind}")]
    Align { context: String, kind: AlignErrorKind },

    /// Errors locating or loading schema modules
    #[error("Schema resolution failed: {context}: {kind}")]
    Schema { context: String, kind: SchemaErrorKind },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Unexpected end of document, still inside <{open}>")]
    UnexpectedEof { open: String },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Trailing content after the root element")]
    TrailingContent,

    #[error("Document too large: {size} bytes (limit {limit})")]
    DocumentTooLarge { size: u64, limit: u64 },
}

/// Specific input resolution error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolveErrorKind {
    #[error("No element matches path '{path}'")]
    NotFound { path: String },

    #[error("Path '{path}' matches {count} elements, expected exactly one")]
    NotSingular { path: String, count: usize },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Specific alignment error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AlignErrorKind {
    #[error("Ambiguous match at {path}: {detail}")]
    StructuralCardinality { path: String, detail: String },

    #[error("Root tag mismatch: old is <{old}>, new is <{new}>")]
    TagMismatch { old: String, new: String },
}

/// Specific schema error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaErrorKind {
    #[error("Schema module '{module}' not found in catalog")]
    ModuleNotFound { module: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unsupported catalog format: '{extension}' (expected yaml, yml or json)")]
    UnsupportedFormat { extension: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for docdiff-tools operations
pub type Result<T> = std::result::Result<T, DocDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DocDiffError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            kind,
        }
    }

    /// Create a resolution error with context
    pub fn resolve(context: impl Into<String>, kind: ResolveErrorKind) -> Self {
        Self::Resolve {
            context: context.into(),
            kind,
        }
    }

    /// Create an alignment error with context
    pub fn align(context: impl Into<String>, kind: AlignErrorKind) -> Self {
        Self::Align {
            context: context.into(),
            kind,
        }
    }

    /// Create a schema error with context
    pub fn schema(context: impl Into<String>, kind: SchemaErrorKind) -> Self {
        Self::Schema {
            context: context.into(),
            kind,
        }
    }

    /// Create a cardinality error naming the offending path
    pub fn structural_cardinality(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::align(
            "structural cardinality",
            AlignErrorKind::StructuralCardinality {
                path: path.into(),
                detail: detail.into(),
            },
        )
    }

    /// Create a module-not-found error
    pub fn module_not_found(module: impl Into<String>) -> Self {
        Self::schema(
            "resolving schema module",
            SchemaErrorKind::ModuleNotFound {
                module: module.into(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DocDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<quick_xml::Error> for DocDiffError {
    fn from(err: quick_xml::Error) -> Self {
        Self::parse(
            "XML deserialization",
            ParseErrorKind::InvalidXml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain front-to-back, so the outermost caller's note
/// appears first: "loading state: parsing document: Invalid XML ...".
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    ///
    /// The closure is only called if the result is an error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DocDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DocDiffError, new_ctx: &str) -> DocDiffError {
    match err {
        DocDiffError::Parse {
            context: existing,
            kind,
        } => DocDiffError::Parse {
            context: chain_context(new_ctx, &existing),
            kind,
        },
        DocDiffError::Resolve {
            context: existing,
            kind,
        } => DocDiffError::Resolve {
            context: chain_context(new_ctx, &existing),
            kind,
        },
        DocDiffError::Align {
            context: existing,
            kind,
        } => DocDiffError::Align {
            context: chain_context(new_ctx, &existing),
            kind,
        },
        DocDiffError::Schema {
            context: existing,
            kind,
        } => DocDiffError::Schema {
            context: chain_context(new_ctx, &existing),
            kind,
        },
        DocDiffError::Io {
            path,
            message,
            source,
        } => DocDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DocDiffError::Config(msg) => DocDiffError::Config(chain_context(new_ctx, &msg)),
        DocDiffError::Validation(msg) => DocDiffError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| DocDiffError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| DocDiffError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocDiffError::structural_cardinality("/order/item[2]", "duplicate identity 'a'");
        let display = err.to_string();
        assert!(
            display.contains("Comparison failed"),
            "Outer message should name the comparison: {}",
            display
        );

        let err = DocDiffError::module_not_found("orders");
        let display = err.to_string();
        assert!(
            display.contains("Schema"),
            "Error message should mention schema resolution: {}",
            display
        );
    }

    #[test]
    fn test_display_carries_the_kind_detail() {
        let err = DocDiffError::structural_cardinality("/order/item[2]", "duplicate identity 'a'");
        let display = err.to_string();
        assert!(display.contains("/order/item[2]"), "got: {display}");
        assert!(display.contains("duplicate identity 'a'"), "got: {display}");

        let err = DocDiffError::module_not_found("orders");
        assert!(err.to_string().contains("'orders'"), "got: {err}");

        let err = DocDiffError::resolve(
            "selecting element",
            ResolveErrorKind::NotFound {
                path: "/order/invoice".to_string(),
            },
        );
        assert!(err.to_string().contains("/order/invoice"), "got: {err}");
    }

    #[test]
    fn test_cardinality_kind_names_path() {
        let err = DocDiffError::structural_cardinality("/order/item[2]", "mixed identity");
        match err {
            DocDiffError::Align {
                kind: AlignErrorKind::StructuralCardinality { path, .. },
                ..
            } => assert_eq!(path, "/order/item[2]"),
            other => panic!("Expected StructuralCardinality, got {:?}", other),
        }
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DocDiffError::io("/path/to/state.xml", io_err);

        assert!(err.to_string().contains("/path/to/state.xml"));
    }

    #[test]
    fn test_context_chaining() {
        let initial_err: Result<()> = Err(DocDiffError::parse(
            "initial context",
            ParseErrorKind::MissingRoot,
        ));

        let err_with_context = initial_err.context("outer context");

        match err_with_context {
            Err(DocDiffError::Parse { context, .. }) => {
                assert!(
                    context.contains("outer context"),
                    "Should contain outer context: {}",
                    context
                );
                assert!(
                    context.contains("initial context"),
                    "Should contain initial context: {}",
                    context
                );
            }
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(DocDiffError::parse("base", ParseErrorKind::MissingRoot))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        let result = outer();
        match result {
            Err(DocDiffError::Parse { context, .. }) => {
                assert!(context.contains("outer layer"), "Missing outer: {}", context);
                assert!(
                    context.contains("middle layer"),
                    "Missing middle: {}",
                    context
                );
                assert!(context.contains("base"), "Missing base: {}", context);
            }
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(DocDiffError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let some_value: Option<i32> = Some(42);
        let result = some_value.context_none("missing value");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);

        let none_value: Option<i32> = None;
        let result = none_value.context_none("missing value");
        match result {
            Err(DocDiffError::Validation(msg)) => {
                assert_eq!(msg, "missing value");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
        assert_eq!(
            chain_context("outer", "middle: inner"),
            "outer: middle: inner"
        );
    }
}
