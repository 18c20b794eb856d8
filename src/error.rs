//! Errors raised while loading a document or binding it to typed configuration.
//!
//! Every failure that can be attributed to a place in the document carries a [`Located`]
//! record: the message, the [`LogicalPath`] of the node, its [`Mark`] in the source text
//! and the [`SourceLocation`] of the statement that raised it.

use std::{
    fmt::{self, Display, Formatter},
    panic::Location,
    path::PathBuf,
};

use miette::Diagnostic;
use thiserror::Error;

use crate::{document::Mark, path::LogicalPath};

pub type Result<T, E = Error> = std::result::Result<T, E>;



/// Code location (file, line and column) of the statement that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation(&'static Location<'static>);

impl SourceLocation {
    #[track_caller]
    pub fn caller() -> Self {
        Self(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }

    pub fn column(&self) -> u32 {
        self.0.column()
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@line {}:{}", self.file(), self.line(), self.column())
    }
}


/// Context shared by every error that points into the document.
#[derive(Debug, Clone)]
pub struct Located {
    pub message: String,
    pub path: LogicalPath,
    pub mark: Mark,
    pub location: SourceLocation,
}

impl Display for Located {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message, self.mark)
    }
}


/// Discriminant of [`Error`], for callers that only care about the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingNode,
    InvalidNodeType,
    InvalidNode,
    InvalidDefaultValue,
    ValidatorFailed,
    BadConversion,
    InvalidDuration,
    InvalidPattern,
    Parse,
    ReadFile,
}


/// Problems with a duration literal, independent of where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("Unknown duration unit: {0}")]
    UnknownUnit(String),

    #[error("duration quantity \"{0}\" is out of range")]
    QuantityOutOfRange(String),

    #[error("duration does not fit into the target representation")]
    Overflow,

    #[error("duration is negative, but the target representation is unsigned")]
    Negative,
}


#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The node is absent and no default value was supplied.
    #[error("{0}")]
    #[diagnostic(
        code(yaml_bound::missing_node),
        help("add the key to the document or declare a default value")
    )]
    MissingNode(Located),

    /// The node exists, but is not a scalar, sequence or map as the target type requires.
    #[error("{0}")]
    #[diagnostic(code(yaml_bound::invalid_node_type))]
    InvalidNodeType(Located),

    /// The node has the right shape, but violates a structural constraint
    /// (sequence length, enum name, duplicate key).
    #[error("{0}")]
    #[diagnostic(code(yaml_bound::invalid_node))]
    InvalidNode(Located),

    /// A default value can not be handed out as the type a rule asked for.
    #[error("{0}")]
    #[diagnostic(code(yaml_bound::invalid_default_value))]
    InvalidDefaultValue(Located),

    /// A validation rule rejected the value.
    #[error("{0}")]
    #[diagnostic(code(yaml_bound::validator_failed))]
    ValidatorFailed(Located),

    /// The scalar text is not representable as the requested primitive.
    #[error("{context}")]
    #[diagnostic(code(yaml_bound::bad_conversion))]
    BadConversion {
        context: Located,
        type_name: &'static str,
    },

    #[error("{context}")]
    #[diagnostic(code(yaml_bound::invalid_duration))]
    InvalidDuration {
        context: Located,
        #[source]
        source: DurationError,
    },

    /// A regular expression passed to a validation rule did not compile.
    #[error("{context}")]
    #[diagnostic(code(yaml_bound::invalid_pattern))]
    InvalidPattern {
        context: Located,
        #[source]
        source: regex::Error,
    },

    /// The text is not a well-formed document.
    #[error("{0}")]
    #[diagnostic(code(yaml_bound::parse))]
    Parse(Located),

    #[error("failed to read document '{}': {source}", .path.display())]
    #[diagnostic(code(yaml_bound::read_file))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[track_caller]
    fn located(message: String, path: &LogicalPath, mark: Mark) -> Located {
        Located {
            message,
            path: path.clone(),
            mark,
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn missing_node(message: impl Into<String>, path: &LogicalPath, mark: Mark) -> Self {
        Self::MissingNode(Self::located(message.into(), path, mark))
    }

    #[track_caller]
    pub fn invalid_node_type(message: impl Into<String>, path: &LogicalPath, mark: Mark) -> Self {
        Self::InvalidNodeType(Self::located(message.into(), path, mark))
    }

    #[track_caller]
    pub fn invalid_node(message: impl Into<String>, path: &LogicalPath, mark: Mark) -> Self {
        Self::InvalidNode(Self::located(message.into(), path, mark))
    }

    #[track_caller]
    pub fn invalid_default_value(
        message: impl Into<String>,
        path: &LogicalPath,
        mark: Mark,
    ) -> Self {
        Self::InvalidDefaultValue(Self::located(message.into(), path, mark))
    }

    #[track_caller]
    pub fn validator_failed(message: impl Into<String>, path: &LogicalPath, mark: Mark) -> Self {
        Self::ValidatorFailed(Self::located(message.into(), path, mark))
    }

    #[track_caller]
    pub fn bad_conversion<T>(text: &str, path: &LogicalPath, mark: Mark) -> Self {
        let type_name = std::any::type_name::<T>();

        Self::BadConversion {
            context: Self::located(
                format!("bad conversion of \"{text}\" to {type_name} at {path}"),
                path,
                mark,
            ),
            type_name,
        }
    }

    #[track_caller]
    pub fn invalid_duration(
        text: &str,
        source: DurationError,
        path: &LogicalPath,
        mark: Mark,
    ) -> Self {
        Self::InvalidDuration {
            context: Self::located(
                format!("Invalid duration \"{text}\" at {path}: {source}"),
                path,
                mark,
            ),
            source,
        }
    }

    #[track_caller]
    pub fn invalid_pattern(
        pattern: &str,
        source: regex::Error,
        path: &LogicalPath,
        mark: Mark,
    ) -> Self {
        Self::InvalidPattern {
            context: Self::located(
                format!("Invalid validation pattern \"{pattern}\" for {path}"),
                path,
                mark,
            ),
            source,
        }
    }

    #[track_caller]
    pub fn parse(message: impl Into<String>, mark: Mark) -> Self {
        Self::Parse(Self::located(message.into(), &LogicalPath::root(), mark))
    }

    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }


    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingNode(_) => ErrorKind::MissingNode,
            Self::InvalidNodeType(_) => ErrorKind::InvalidNodeType,
            Self::InvalidNode(_) => ErrorKind::InvalidNode,
            Self::InvalidDefaultValue(_) => ErrorKind::InvalidDefaultValue,
            Self::ValidatorFailed(_) => ErrorKind::ValidatorFailed,
            Self::BadConversion { .. } => ErrorKind::BadConversion,
            Self::InvalidDuration { .. } => ErrorKind::InvalidDuration,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::Parse(_) => ErrorKind::Parse,
            Self::ReadFile { .. } => ErrorKind::ReadFile,
        }
    }

    /// The located context, if this error points into a document.
    pub fn context(&self) -> Option<&Located> {
        match self {
            Self::MissingNode(context)
            | Self::InvalidNodeType(context)
            | Self::InvalidNode(context)
            | Self::InvalidDefaultValue(context)
            | Self::ValidatorFailed(context)
            | Self::Parse(context)
            | Self::BadConversion { context, .. }
            | Self::InvalidDuration { context, .. }
            | Self::InvalidPattern { context, .. } => Some(context),
            Self::ReadFile { .. } => None,
        }
    }

    /// Human-readable message, without the document location suffix.
    pub fn message(&self) -> String {
        match self.context() {
            Some(context) => context.message.clone(),
            None => self.to_string(),
        }
    }

    pub fn path(&self) -> Option<&LogicalPath> {
        self.context().map(|context| &context.path)
    }

    pub fn mark(&self) -> Option<Mark> {
        self.context().map(|context| context.mark)
    }

    /// Where in this crate (or in a rule) the error was raised, as `file@line L:C`.
    pub fn location(&self) -> Option<String> {
        self.context().map(|context| context.location.to_string())
    }

    /// Where in the document the error points to, as `@line:column`.
    ///
    /// For YAML the line is 1-based and the column 0-based, so the first line of a
    /// document reports `@1:0`. Positions in yaml-cpp style tools start at line 0.
    pub fn yaml_location(&self) -> Option<String> {
        self.context().map(|context| context.mark.to_string())
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_document_location() {
        let path = LogicalPath::root().key("port");
        let error = Error::missing_node("Missing node /port", &path, Mark::new(3, 4));

        assert_eq!(error.to_string(), "Missing node /port @3:4");
        assert_eq!(error.yaml_location().as_deref(), Some("@3:4"));
        assert_eq!(error.kind(), ErrorKind::MissingNode);
        assert_eq!(error.path().map(LogicalPath::as_str), Some("/port"));
    }

    #[test]
    fn location_points_at_the_raising_statement() {
        let error = Error::invalid_node("boom", &LogicalPath::root(), Mark::default());
        let location = error.location().unwrap();

        assert!(location.starts_with(file!()), "unexpected location {location}");
    }

    #[test]
    fn bad_conversion_names_the_target_type() {
        let error = Error::bad_conversion::<i32>(
            "3.14",
            &LogicalPath::root().key("float"),
            Mark::default(),
        );

        match &error {
            Error::BadConversion { type_name, .. } => assert_eq!(*type_name, "i32"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(error.message().contains("\"3.14\""));
        assert!(error.message().contains("/float"));
    }

    #[test]
    fn read_file_has_no_document_context() {
        let error = Error::read_file(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );

        assert_eq!(error.kind(), ErrorKind::ReadFile);
        assert!(error.mark().is_none());
        assert!(error.to_string().contains("missing.yaml"));
    }
}
