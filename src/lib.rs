//! Spring API doc extractor - API documentation straight from Spring controller source.
//!
//! This library reads Java source text and extracts structured descriptors for
//! Spring Web REST controllers: base path, endpoints, parameters, request bodies,
//! documented responses and security requirements, plus the fields of the DTOs
//! those endpoints exchange. Extraction is pattern matching over raw text; no
//! Java grammar is involved and malformed input yields defaults, never errors.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Java files
//! 2. [`source`] - Reads source files into memory
//! 3. [`extractor`] - Extracts controller and endpoint descriptors
//! 4. [`dto`] - Extracts DTO fields and `@Schema` documentation
//! 5. [`locator`] - Finds DTO sources by type name
//! 6. [`report`] - Assembles controllers and resolved models into one report
//! 7. [`enhancer`] - Optional rewriting of summaries and descriptions
//! 8. [`serializer`] - Serializes the report to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     extractor::{ControllerExtractor, SpringExtractor},
//!     locator::WorkspaceModelLocator,
//!     report::ReportBuilder,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//!     source::SourceReader,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-service")).scan().unwrap();
//! let sources: Vec<_> = SourceReader::read_files(&scan_result.java_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let mut builder = ReportBuilder::new();
//! for source in &sources {
//!     if let Some(controller) = SpringExtractor.parse_controller(&source.content) {
//!         builder.add_controller(controller);
//!     }
//! }
//!
//! let locator = WorkspaceModelLocator::new(Path::new("./my-service")).unwrap();
//! let report = builder.build(Some(&locator));
//! println!("{}", serialize_yaml(&report).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod dto;
pub mod enhancer;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod report;
pub mod scanner;
pub mod serializer;
pub mod source;
