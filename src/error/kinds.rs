use std::{fmt, io};

/// Crate-wide `Result` type using [`SymposiumError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SymposiumError>;

/// Top-level error type for symposium operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum SymposiumError {
    /// Navigation schema construction or validation errors.
    Schema(SchemaError),

    /// Resource store loading errors.
    Store(StoreError),

    /// Configuration errors.
    Config(ConfigError),

    /// Input submission errors.
    Submit(SubmitError),

    /// I/O errors.
    Io(io::Error),

    /// JSON encoding or decoding errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Schema-specific errors.
///
/// These are configuration defects: they are raised once while the schema is
/// built, never while completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A namespace key other than `@/` or `#/`.
    UnknownPrefix(String),

    /// A required namespace is absent from a schema document.
    MissingNamespace(String),

    /// A node sets more than one of `children`, `dynamic` and `final`.
    ConflictingModes { path: String },

    /// A dynamic segment references a tag with no resource binding.
    UnboundDynamicTag { tag: String, path: String },

    /// A schema document could not be parsed.
    InvalidDocument(String),
}

/// Resource store errors.
#[derive(Debug)]
pub enum StoreError {
    /// The fixture directory does not exist.
    DirectoryNotFound(String),

    /// A collection file could not be read.
    ReadFailed { collection: String, message: String },

    /// A collection file is not a JSON array of records.
    InvalidCollection { collection: String, message: String },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors raised when a line is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Manage mode accepts only input carrying a `#/` operation.
    MissingOperation,

    /// Unknown meta command.
    UnknownCommand(String),

    /// Meta command with a bad argument.
    InvalidArgument { command: String, argument: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for SymposiumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymposiumError::Schema(e) => write!(f, "Schema error: {e}"),
            SymposiumError::Store(e) => write!(f, "Store error: {e}"),
            SymposiumError::Config(e) => write!(f, "Configuration error: {e}"),
            SymposiumError::Submit(e) => write!(f, "{e}"),
            SymposiumError::Io(e) => write!(f, "I/O error: {e}"),
            SymposiumError::Json(e) => write!(f, "JSON error: {e}"),
            SymposiumError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownPrefix(prefix) => write!(f, "Unknown namespace prefix: {prefix}"),
            SchemaError::MissingNamespace(prefix) => write!(f, "Missing namespace: {prefix}"),
            SchemaError::ConflictingModes { path } => {
                write!(f, "Segment '{path}' sets more than one of children, dynamic and final")
            }
            SchemaError::UnboundDynamicTag { tag, path } => {
                write!(f, "Segment '{path}' references unbound resource type '{tag}'")
            }
            SchemaError::InvalidDocument(msg) => write!(f, "Invalid schema document: {msg}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DirectoryNotFound(path) => {
                write!(f, "Fixture directory not found: {path}")
            }
            StoreError::ReadFailed {
                collection,
                message,
            } => write!(f, "Failed to read collection '{collection}': {message}"),
            StoreError::InvalidCollection {
                collection,
                message,
            } => write!(f, "Invalid collection '{collection}': {message}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::MissingOperation => write!(f, "Manage mode requires a #/ operation"),
            SubmitError::UnknownCommand(cmd) => write!(f, "Unknown command: :{cmd}"),
            SubmitError::InvalidArgument { command, argument } => {
                write!(f, "Invalid argument '{argument}' for :{command}")
            }
        }
    }
}

impl std::error::Error for SymposiumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SymposiumError::Io(e) => Some(e),
            SymposiumError::Json(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for SchemaError {}
impl std::error::Error for StoreError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for SubmitError {}

/* ========================= Conversions to SymposiumError ========================= */

impl From<io::Error> for SymposiumError {
    fn from(err: io::Error) -> Self {
        SymposiumError::Io(err)
    }
}

impl From<serde_json::Error> for SymposiumError {
    fn from(err: serde_json::Error) -> Self {
        SymposiumError::Json(err)
    }
}

impl From<SchemaError> for SymposiumError {
    fn from(err: SchemaError) -> Self {
        SymposiumError::Schema(err)
    }
}

impl From<StoreError> for SymposiumError {
    fn from(err: StoreError) -> Self {
        SymposiumError::Store(err)
    }
}

impl From<ConfigError> for SymposiumError {
    fn from(err: ConfigError) -> Self {
        SymposiumError::Config(err)
    }
}

impl From<SubmitError> for SymposiumError {
    fn from(err: SubmitError) -> Self {
        SymposiumError::Submit(err)
    }
}

impl From<String> for SymposiumError {
    fn from(msg: String) -> Self {
        SymposiumError::Generic(msg)
    }
}

impl From<&str> for SymposiumError {
    fn from(msg: &str) -> Self {
        SymposiumError::Generic(msg.to_owned())
    }
}
