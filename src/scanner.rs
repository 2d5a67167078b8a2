use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all Java source files.
/// It skips build output (`target`, `build`, `out`), `node_modules` and hidden directories
/// (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-service"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Java files", result.java_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered Java files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths to all discovered `.java` files, sorted
    pub java_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.java` files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues past them.
    /// The returned list is sorted so lookups by file name are deterministic.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut java_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_skipped = e.file_type().is_dir() && SKIPPED_DIRS.contains(&file_name.as_ref());

                !is_hidden && !is_skipped
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("java") {
                        java_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        java_files.sort();
        Ok(ScanResult {
            java_files,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .java_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/main/java/com/example/web")).unwrap();
        fs::create_dir_all(root.join("src/main/java/com/example/dto")).unwrap();
        fs::write(root.join("src/main/java/com/example/web/ItemController.java"), "class A {}").unwrap();
        fs::write(root.join("src/main/java/com/example/dto/ItemDto.java"), "class B {}").unwrap();
        fs::write(root.join("pom.xml"), "<project/>").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.java_files.len(), 2);
        assert!(result.warnings.is_empty());
        assert_eq!(file_names(&result), vec!["ItemDto.java", "ItemController.java"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.java_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_build_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for dir in ["target", "build", "node_modules", ".git"] {
            fs::create_dir(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("Generated.java"), "class G {}").unwrap();
        }
        fs::write(root.join("Main.java"), "class M {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["Main.java"]);
    }

    #[test]
    fn test_scan_filters_non_java_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("Main.java"), "class M {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();
        fs::write(root.join("Build.kt"), "class K").unwrap();
        fs::write(root.join("application.yml"), "server:").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["Main.java"]);
    }
}
