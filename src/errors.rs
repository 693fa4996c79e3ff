//! Error types for export operations.

use handled::Handle;

/// Errors that abort a catalog build or an export run.
///
/// Every variant is fatal: there is no partial catalog and no partial output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// A hierarchical id did not have the expected number of `:` segments.
    MalformedId {
        /// Name of the record that carried the id.
        record: String,
        /// Field the id was read from.
        field: &'static str,
        /// The offending id.
        value: String,
        /// Human readable description of the expected shape.
        expected: &'static str,
    },
    /// A device referenced a container that is not in the snapshot.
    UnknownContainer {
        /// Name of the device record.
        record: String,
        /// The container id that could not be resolved.
        container: String,
    },
    /// A value declared as a number is not numeric.
    InvalidNumber {
        /// Property name.
        name: String,
        /// Raw text that failed to parse.
        raw: String,
        /// Declared type, for the message.
        value_type: &'static str,
    },
    /// A value declared as a boolean is neither `true` nor `false`.
    InvalidBoolean {
        /// Property name.
        name: String,
        /// Raw text that failed to parse.
        raw: String,
    },
    /// A `<type> <key>=<value>` definition string could not be split.
    InvalidDefinition(String),
    /// The name filter is not a valid regular expression.
    InvalidFilter(String),
    /// A database file is not valid JSON or does not have the expected shape.
    Json {
        /// File or record the error refers to.
        path: String,
        /// Parser message.
        message: String,
    },
    /// Reading or writing a file failed.
    Io {
        /// File the error refers to.
        path: String,
        /// Underlying I/O message.
        message: String,
    },
    /// A configuration file could not be loaded.
    Config(String),
    /// An error raised while materializing a specific record.
    InRecord {
        /// Name of the record being materialized.
        record: String,
        /// The underlying error.
        source: Box<ExportError>,
    },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedId {
                record,
                field,
                value,
                expected,
            } => write!(
                f,
                "Record '{}': field '{}' has malformed id '{}' (expected {})",
                record, field, value, expected
            ),
            Self::UnknownContainer { record, container } => write!(
                f,
                "Record '{}': container '{}' does not exist",
                record, container
            ),
            Self::InvalidNumber {
                name,
                raw,
                value_type,
            } => write!(
                f,
                "Property '{}': '{}' is not a valid {} value",
                name, raw, value_type
            ),
            Self::InvalidBoolean { name, raw } => {
                write!(f, "Property '{}': '{}' is not a valid boolean", name, raw)
            }
            Self::InvalidDefinition(def) => write!(f, "Invalid property definition: {}", def),
            Self::InvalidFilter(msg) => write!(f, "Invalid name filter: {}", msg),
            Self::Json { path, message } => write!(f, "JSON error in {}: {}", path, message),
            Self::Io { path, message } => write!(f, "IO error on {}: {}", path, message),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::InRecord { record, source } => write!(f, "Record '{}': {}", record, source),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<regex::Error> for ExportError {
    fn from(e: regex::Error) -> Self {
        ExportError::InvalidFilter(e.to_string())
    }
}

impl From<serde_yml::Error> for ExportError {
    fn from(e: serde_yml::Error) -> Self {
        ExportError::Config(e.to_string())
    }
}

impl ExportError {
    /// Builds an [`ExportError::Io`] for `path`.
    pub fn io(path: impl AsRef<std::path::Path>, e: std::io::Error) -> Self {
        ExportError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        }
    }

    /// Attaches the name of the record being materialized.
    pub fn in_record(self, record: &str) -> Self {
        ExportError::InRecord {
            record: record.to_string(),
            source: Box::new(self),
        }
    }

    /// Builds an [`ExportError::Json`] for `path`.
    pub fn json(path: impl Into<String>, e: serde_json::Error) -> Self {
        ExportError::Json {
            path: path.into(),
            message: e.to_string(),
        }
    }
}

/////////////////////////////////////////// User Errors ///////////////////////////////////////////

/// User-friendly error information extracted from an [`ExportError`].
#[derive(Debug, Clone)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Handle<UserError> for ExportError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self {
            Self::InRecord { source, .. } => {
                Handle::<UserError>::handle(source.as_ref()).and_then(|inner| inner.usage_hint)
            }
            Self::MalformedId { .. } => Some(
                "Device ids are 'namespace:type:device', or 'namespace:type:container:device' \
                 for devices hosted by a container."
                    .to_string(),
            ),
            Self::UnknownContainer { .. } => Some(
                "The snapshot is inconsistent: restore the container or remove its children."
                    .to_string(),
            ),
            Self::InvalidFilter(_) => {
                Some("The --filter value must be a valid regular expression.".to_string())
            }
            Self::Io { .. } => {
                Some("Check that the input folder exists and the output folder is writable.".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}
