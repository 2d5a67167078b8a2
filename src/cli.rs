use crate::error::Error;
use crate::extractor::{ControllerExtractor, SpringExtractor};
use crate::locator::{ModelLocator, WorkspaceModelLocator};
use crate::report::ReportBuilder;
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::source::{SourceFile, SourceReader};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn, LevelFilter};
use std::path::{Path, PathBuf};

/// Spring API doc extractor - Document REST controllers and DTOs straight from Java source
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// A controller `.java` file or a directory to search for controllers
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Directory searched for DTO sources (defaults to the directory of PATH)
    #[arg(short = 'm', long = "models-root", value_name = "DIR")]
    pub models_root: Option<PathBuf>,

    /// Only document the endpoint(s) bound to this Java method name
    #[arg(short = 'e', long = "endpoint", value_name = "NAME")]
    pub endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl CliArgs {
    /// Directory DTO sources are looked up under.
    pub fn models_root(&self) -> PathBuf {
        if let Some(root) = &self.models_root {
            return root.clone();
        }
        if self.path.is_dir() {
            return self.path.clone();
        }
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Installs the global logger at `Debug` when `verbose`, else `Info`.
///
/// Later calls leave the first logger in place.
pub fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init()
        .is_err()
    {
        debug!("Logger already initialized");
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.path.exists() {
        return Err(Error::InvalidArgument(format!("Path does not exist: {}", args.path.display())).into());
    }

    if let Some(root) = &args.models_root {
        if !root.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "Models root is not a directory: {}",
                root.display()
            ))
            .into());
        }
    }

    if matches!(args.endpoint.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(Error::InvalidArgument("Endpoint name must not be empty".to_string()).into());
    }

    info!("Source path: {}", args.path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    info!("Models root: {}", args.models_root().display());
    if let Some(ref endpoint) = args.endpoint {
        info!("Endpoint: {}", endpoint);
    }

    Ok(args)
}

/// Collects the Java files named by `path`.
fn source_paths(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let scan_result = FileScanner::new(path.to_path_buf()).scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    Ok(scan_result.java_files)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting API documentation extraction...");

    // Step 1: Find Java sources
    info!("Collecting Java sources...");
    let paths = source_paths(&args.path)?;
    info!("Found {} Java files", paths.len());

    // Step 2: Read sources, skipping unreadable files
    let sources: Vec<SourceFile> = SourceReader::read_files(&paths)
        .into_iter()
        .filter_map(|r| r.ok())
        .collect();
    debug!("Read {} of {} files", sources.len(), paths.len());

    // Step 3: Extract controllers
    info!("Extracting controllers...");
    let extractor = SpringExtractor;
    let mut builder = ReportBuilder::new();
    for source in &sources {
        match extractor.parse_controller(&source.content) {
            Some(controller) => {
                info!(
                    "Found {} ({} endpoints) in {}",
                    controller.name,
                    controller.endpoints.len(),
                    source.path.display()
                );
                builder.add_controller(controller);
            }
            None => debug!("Not a controller: {}", source.path.display()),
        }
    }

    if builder.controller_count() == 0 {
        return Err(Error::NotAController { file: args.path.clone() }.into());
    }

    // Step 4: Narrow to a single endpoint when asked
    if let Some(endpoint) = &args.endpoint {
        info!("Selecting endpoint {}...", endpoint);
        builder.retain_endpoint(endpoint)?;
    }

    // Step 5: Resolve referenced models
    let models_root = args.models_root();
    info!("Indexing models under {}...", models_root.display());
    let locator = WorkspaceModelLocator::new(&models_root)?;
    debug!("Indexed {} candidate model files", locator.len());
    let report = builder.build(Some(&locator as &dyn ModelLocator));

    // Step 6: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&report)?,
        OutputFormat::Json => serialize_json(&report)?,
    };

    // Step 7: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote API report to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 8: Display summary
    info!("Extraction complete!");
    info!("Summary:");
    info!("  - Files read: {}", sources.len());
    info!("  - Controllers: {}", report.controllers.len());
    info!("  - Endpoints: {}", report.endpoint_count());
    info!("  - Models resolved: {}", report.models.len());
    if !report.missing_models.is_empty() {
        warn!("  - Models not found: {:?}", report.missing_models);
    }

    Ok(())
}
