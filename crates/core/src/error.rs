use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors that can occur while turning a document into a page component.
#[derive(Debug, Error)]
pub enum CerealError {
    /// IO error while reading or writing documents.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Rendering error while emitting markup.
    #[error("Render error at {location}: {message}")]
    RenderError {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CerealError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MarkdownAdapter {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Create a render error with location
    pub fn render_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::RenderError {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// Non-fatal conditions the pipeline recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Front matter fence opened but never closed.
    UnterminatedFrontmatter {
        /// Location of the opening fence
        location: SourceLocation,
    },
    /// An option carried a value outside its recognized set.
    UnrecognizedOption {
        /// Option name as it appears in configuration
        name: String,
        /// The rejected value
        value: String,
        /// The value used instead
        fallback: String,
    },
}

impl ParseWarning {
    /// Get the location of this warning, if it points into a document
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ParseWarning::UnterminatedFrontmatter { location } => Some(location),
            ParseWarning::UnrecognizedOption { .. } => None,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnterminatedFrontmatter { location } => {
                write!(
                    f,
                    "Unterminated front matter fence at {}: treating the whole document as content",
                    location
                )
            }
            ParseWarning::UnrecognizedOption {
                name,
                value,
                fallback,
            } => {
                write!(
                    f,
                    "Unrecognized {} '{}': falling back to '{}'",
                    name, value, fallback
                )
            }
        }
    }
}

/// Outcome of an operation that degrades instead of failing.
///
/// `Recovered` still carries a usable value; the warning records what was
/// given up to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery<T> {
    /// The input was well-formed.
    Clean(T),
    /// The input was malformed and a default was substituted.
    Recovered {
        /// The recovered value
        value: T,
        /// What went wrong
        warning: ParseWarning,
    },
}

impl<T> Recovery<T> {
    /// Borrow the carried value.
    pub fn value(&self) -> &T {
        match self {
            Recovery::Clean(value) | Recovery::Recovered { value, .. } => value,
        }
    }

    /// Take the carried value, discarding any warning.
    pub fn into_value(self) -> T {
        match self {
            Recovery::Clean(value) | Recovery::Recovered { value, .. } => value,
        }
    }

    /// Returns the warning when the value was recovered.
    pub fn warning(&self) -> Option<&ParseWarning> {
        match self {
            Recovery::Clean(_) => None,
            Recovery::Recovered { warning, .. } => Some(warning),
        }
    }

    /// Check whether a default was substituted
    pub fn is_recovered(&self) -> bool {
        matches!(self, Recovery::Recovered { .. })
    }

    /// Map the carried value, keeping the warning.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Recovery<U> {
        match self {
            Recovery::Clean(value) => Recovery::Clean(f(value)),
            Recovery::Recovered { value, warning } => Recovery::Recovered {
                value: f(value),
                warning,
            },
        }
    }
}
