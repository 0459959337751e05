#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod history;
pub mod ingest;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod session;
pub mod shortcuts;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config, parse_config};
pub use error::{EditorError, IngestError};
pub use ingest::{IngestReport, SemanticGraph};
pub use layout_dump::LayoutDump;
pub use model::{GraphModel, Snapshot};
pub use session::{EditForm, EditorSession, GraphSink};

/// Ingests a caller payload, lays it out and returns the canvas dump.
pub fn layout_json(json: &str, config: Config) -> Result<(LayoutDump, IngestReport), IngestError> {
    let (session, report) = EditorSession::from_json(json, config)?;
    Ok((LayoutDump::from_session(&session), report))
}
