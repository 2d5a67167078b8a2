//! Serialization module for converting API reports to YAML or JSON format.
//!
//! This module provides functions to serialize an [`ApiReport`] into standard formats
//! and write them to files or return them as strings.

use crate::report::ApiReport;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an API report to YAML format.
///
/// # Arguments
///
/// * `report` - The report to serialize
///
/// # Returns
///
/// Returns the YAML string representation of the report.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use apidoc_from_source::report::ReportBuilder;
/// use apidoc_from_source::serializer::serialize_yaml;
///
/// let report = ReportBuilder::new().build(None);
/// let yaml = serialize_yaml(&report).unwrap();
/// assert!(yaml.contains("controllers:"));
/// ```
pub fn serialize_yaml(report: &ApiReport) -> Result<String> {
    debug!("Serializing API report to YAML");
    serde_yaml::to_string(report).context("Failed to serialize API report to YAML")
}

/// Serializes an API report to JSON format with pretty printing.
///
/// The output is indented for readability, making it suitable for human
/// review and version control.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(report: &ApiReport) -> Result<String> {
    debug!("Serializing API report to JSON");
    serde_json::to_string_pretty(report).context("Failed to serialize API report to JSON")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Missing parent directories are created.
///
/// # Arguments
///
/// * `content` - The string content to write
/// * `path` - The file path to write to
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
