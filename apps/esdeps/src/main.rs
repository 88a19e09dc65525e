use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use esdeps_core::{DependencyWalker, GraphOptions, OutputMode, SourceKind};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Imports, exports, loaded files and parse failures
    Full,
    /// Imports and loaded files only
    Dependencies,
}

impl From<Format> for OutputMode {
    fn from(format: Format) -> Self {
        match format {
            Format::Full => OutputMode::Full,
            Format::Dependencies => OutputMode::Dependencies,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "esdeps")]
#[command(about = "Build the import/export graph of ES modules", long_about = None)]
struct Cli {
    /// Entry files or directories to expand into entry files
    files: Vec<PathBuf>,

    /// Only analyze the entry files, without following local imports
    #[arg(long)]
    no_recurse: bool,

    /// Path or glob (containing `*`) of files never to read
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// JSON options file; flags given here override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Parse files as scripts instead of modules
    #[arg(long)]
    script: bool,

    /// Disable JSX outside .jsx/.tsx files
    #[arg(long)]
    no_jsx: bool,

    /// Additional extension tried when resolving extensionless specifiers
    #[arg(long, value_name = "EXT")]
    extension: Vec<String>,

    /// Extension whose parse failures abort the run (replaces the default `js`)
    #[arg(long, value_name = "EXT")]
    strict_extension: Vec<String>,

    /// Directory searched for tsconfig.json `paths` aliases
    #[arg(long, value_name = "DIR")]
    tsconfig_root: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn into_options(self) -> Result<GraphOptions> {
        let mut options = match &self.config {
            Some(path) => GraphOptions::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GraphOptions::default(),
        };

        if !self.files.is_empty() {
            options.files = self.files;
        }
        if self.no_recurse {
            options.recurse = false;
        }
        options.exclude.extend(self.exclude);
        if self.script {
            options.parser_options.source_type = SourceKind::Script;
        }
        if self.no_jsx {
            options.parser_options.jsx = false;
        }
        options.resolve_options.extensions.extend(
            self.extension.iter().map(|ext| format!(".{}", ext.trim_start_matches('.'))),
        );
        if !self.strict_extension.is_empty() {
            options.strict_extensions =
                self.strict_extension.iter().map(|ext| ext.trim_start_matches('.').to_string()).collect();
        }
        if let Some(root) = &self.tsconfig_root {
            options.resolve_options.alias.extend(esdeps_core::read_tsconfig_paths(root));
        }
        if let Some(format) = self.format {
            options.output = format.into();
        }

        options.files = esdeps_core::collect_entries(&options.files)?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli);
    let compact = cli.compact;
    let options = cli.into_options()?;
    if options.files.is_empty() {
        anyhow::bail!("No entry files given");
    }

    let start = Instant::now();
    let mode = options.output;
    info!("Analyzing {} entry files", options.files.len());

    let graph = DependencyWalker::new(options)?.walk().await?;
    let elapsed_ms = start.elapsed().as_millis();

    let mut stderr = std::io::stderr().lock();
    for failure in &graph.stats {
        writeln!(stderr, "{} {}", "⚠".yellow(), failure)?;
    }
    writeln!(
        stderr,
        "{} Loaded {} files with {} dependencies in {}ms ({} parse failures).",
        "●".bright_blue(),
        graph.loaded_files.len().to_string().cyan(),
        graph.imports.len().to_string().cyan(),
        elapsed_ms.to_string().cyan(),
        graph.stats.len().to_string().cyan()
    )?;

    let output = graph.into_output(mode);
    if compact {
        serde_json::to_writer(&mut stdout, &output)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, &output)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
