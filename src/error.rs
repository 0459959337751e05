use thiserror::Error;

/// Failures of graph mutations. Every variant leaves the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("unknown node `{0}`")]
    UnknownNode(String),

    #[error("unknown edge `{0}`")]
    UnknownEdge(String),

    #[error("node `{0}` already exists")]
    DuplicateNode(String),

    #[error("edge `{0}` already exists")]
    DuplicateEdge(String),

    #[error("self-loop on node `{0}` is not allowed")]
    SelfLoop(String),

    #[error("{0} id must not be empty")]
    EmptyId(&'static str),

    #[error("no element is open for editing")]
    NoActiveEdit,

    #[error("edit form does not match the element being edited")]
    EditMismatch,
}

/// Failures at the ingestion boundary that cannot be coerced away.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed graph payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph payload rejected: {0}")]
    Invalid(#[from] EditorError),
}
