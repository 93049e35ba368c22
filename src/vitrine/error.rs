use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitrineError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    #[error("Api Error: {0}")]
    Api(String),
}

/// Rejected transitions of the detail/edit panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("no record is open in the detail panel")]
    Closed,

    #[error("the panel is not in edit mode")]
    NotEditing,

    #[error("a save is already in flight")]
    SaveInFlight,

    #[error("field '{0}' cannot be edited")]
    ReadOnly(String),

    #[error("save rejected: {0}")]
    Host(String),
}

/// One problem found in authored configuration (columns, filters, detail tabs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    pub location: String,
    pub problem: String,
}

impl ConfigViolation {
    pub fn new(location: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.problem)
    }
}

impl From<Vec<ConfigViolation>> for VitrineError {
    fn from(violations: Vec<ConfigViolation>) -> Self {
        let joined = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        VitrineError::Config(joined)
    }
}

pub type Result<T> = std::result::Result<T, VitrineError>;
