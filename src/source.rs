use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads Java source files into memory for extraction.
///
/// Extraction works on plain text, so reading is the only step that can fail
/// for an individual file.
pub struct SourceReader;

/// The text of one compilation unit together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Full file content
    pub content: String,
}

impl SourceReader {
    /// Reads a single source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn read_file(path: &Path) -> Result<SourceFile> {
        debug!("Reading file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(SourceFile {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Reads several files, continuing past failures.
    ///
    /// Returns one result per input path, in input order. Failures are logged
    /// as warnings so a partial report can still be produced.
    pub fn read_files(paths: &[PathBuf]) -> Vec<Result<SourceFile>> {
        debug!("Reading {} files", paths.len());

        let results: Vec<Result<SourceFile>> = paths
            .iter()
            .map(|path| {
                Self::read_file(path).inspect_err(|e| warn!("Skipping {}: {:#}", path.display(), e))
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Reading complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}
