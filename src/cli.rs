use crate::config::{Config, load_config};
use crate::ir::Vocabulary;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::session::EditorSession;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "procnet",
    version,
    about = "Lay out a clinical process network on its 3x3 region grid"
)]
pub struct Args {
    /// Input graph JSON ({nodes, edges}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "layout")]
    pub format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Overrides the export vocabulary from the config file
    #[arg(long = "vocabulary", value_enum)]
    pub vocabulary: Option<VocabularyArg>,

    /// Fail instead of warning when the payload needed coercions
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Canvas positions, region frames and edge handles
    Layout,
    /// Normalised caller-shaped graph
    Semantic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyArg {
    Pt,
    En,
}

impl From<VocabularyArg> for Vocabulary {
    fn from(arg: VocabularyArg) -> Self {
        match arg {
            VocabularyArg::Pt => Vocabulary::Portuguese,
            VocabularyArg::En => Vocabulary::English,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(vocabulary) = args.vocabulary {
        config.ingest.vocabulary = vocabulary.into();
    }

    let input = read_input(args.input.as_deref())?;
    let session = load_session(&input, config, args.strict)?;
    match (args.format, args.output.as_deref()) {
        (OutputFormat::Layout, Some(path)) => write_layout_dump(path, &session)
            .with_context(|| format!("failed to write {}", path.display())),
        (format, path) => write_output(&render_output(&session, format)?, path),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_session(input: &str, config: Config, strict: bool) -> Result<EditorSession> {
    let (session, report) =
        EditorSession::from_json(input, config).context("failed to load process network")?;
    if strict && !report.is_clean() {
        let issues: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        anyhow::bail!("payload needed {} fix(es):\n{}", issues.len(), issues.join("\n"));
    }
    info!(
        nodes = session.model().nodes().len(),
        edges = session.model().edges().len(),
        issues = report.issues.len(),
        "laid out process network"
    );
    Ok(session)
}

fn render_output(session: &EditorSession, format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Layout => serde_json::to_string_pretty(&LayoutDump::from_session(session))?,
        OutputFormat::Semantic => session.semantic().to_json()?,
    };
    Ok(json)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
