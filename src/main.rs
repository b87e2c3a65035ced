// Command-line entry point for droidarch.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use droidarch::infrastructure::FsSourceReader;
use droidarch::ports::json_exporter::JsonExporter;
use droidarch::ports::xadl_exporter::XadlExporter;
use droidarch::ports::ArchitectureExporter;
use droidarch::{logging, ExtractUsecase, ExtractorConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Xadl,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract the architecture from an Android application", long_about = None)]
struct Cli {
    /// Path to the AndroidManifest.xml to analyze
    manifest: PathBuf,

    /// Name of the base structure for the extracted architecture
    structure: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Source root matching the manifest (enables intent scanning)
    #[arg(long = "src")]
    src_dir: Option<PathBuf>,

    /// Output file path (default: <STRUCTURE>.xml or .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xadl")]
    format: Format,

    /// Keep fully qualified component names
    #[arg(long)]
    fully_qualified: bool,

    /// TOML file with extractor settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(PathBuf, usize)> {
    let reader = FsSourceReader;

    let mut config = match &cli.config {
        Some(path) => ExtractorConfig::load(&reader, path)?,
        None => ExtractorConfig::default(),
    };
    if cli.fully_qualified {
        config.fully_qualified_names = true;
    }

    let usecase = ExtractUsecase {
        reader: &reader,
        config: &config,
    };
    let report = usecase.run(&cli.manifest, &cli.structure, cli.src_dir.as_deref())?;

    let exporter: &dyn ArchitectureExporter = match cli.format {
        Format::Xadl => &XadlExporter,
        Format::Json => &JsonExporter,
    };
    let rendered = exporter.render(&report.document)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", cli.structure, exporter.extension())));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    fs::write(&output, rendered)
        .with_context(|| format!("Failed to write output file {}", output.display()))?;

    Ok((output, report.diagnostics.len()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.debug);
    tracing::debug!("CLI args: {:?}", cli);

    match run(&cli) {
        Ok((output, diagnostics)) => {
            println!(
                "[SUCCESS] Output written to {} ({} diagnostics)",
                output.display(),
                diagnostics
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("extraction failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
