use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlapSegError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Error reading {image} ({source})")]
    ImageRead {
        image: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine under test returned an error or panicked.
    #[error("Exception while {operation} {image}{}", parenthesized(.detail))]
    Engine {
        operation: &'static str,
        image: String,
        detail: Option<String>,
    },

    /// The engine under test broke the mandatory API contract.
    #[error("Contract violation by engine under test: {reason} for image {image}")]
    ContractViolation { image: String, reason: String },

    #[error("{pid}: Error writing to log ({source})")]
    Log {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Orchestration Error: {0}")]
    Orchestration(String),

    #[error("{failed} of {total} worker processes exited unsuccessfully")]
    WorkerFailed { failed: usize, total: usize },
}

impl SlapSegError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, SlapSegError::ContractViolation { .. })
    }
}

fn parenthesized(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

pub type SlapResult<T> = Result<T, SlapSegError>;

/// Error surfaced by an engine implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
