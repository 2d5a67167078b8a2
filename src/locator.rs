//! Lookup of DTO source text by simple type name.

use crate::scanner::FileScanner;
use crate::source::SourceReader;
use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplies the source text of a referenced type.
pub trait ModelLocator {
    /// Returns the source of `type_name`, or `Ok(None)` when no such type is known.
    ///
    /// # Errors
    ///
    /// Returns an error when the type is known but its source cannot be read.
    fn locate(&self, type_name: &str) -> Result<Option<String>>;
}

/// Finds `<TypeName>.java` files below a project root.
///
/// The directory is indexed once at construction; sources are read on demand.
pub struct WorkspaceModelLocator {
    index: HashMap<String, PathBuf>,
}

impl WorkspaceModelLocator {
    /// Indexes every Java file below `root` by file stem.
    ///
    /// When two files share a stem the first in path order wins.
    pub fn new(root: &Path) -> Result<Self> {
        let scan_result = FileScanner::new(root.to_path_buf()).scan()?;
        let mut index: HashMap<String, PathBuf> = HashMap::new();

        for path in scan_result.java_files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            if let Some(existing) = index.get(stem) {
                debug!(
                    "Ignoring {} for type {}, already indexed {}",
                    path.display(),
                    stem,
                    existing.display()
                );
                continue;
            }
            index.insert(stem.to_string(), path);
        }

        debug!("Indexed {} Java types under {}", index.len(), root.display());
        Ok(Self { index })
    }

    /// Number of indexed types.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl ModelLocator for WorkspaceModelLocator {
    fn locate(&self, type_name: &str) -> Result<Option<String>> {
        match self.index.get(type_name) {
            Some(path) => Ok(Some(SourceReader::read_file(path)?.content)),
            None => Ok(None),
        }
    }
}

/// In-memory locator over sources supplied by the caller.
#[derive(Debug, Default, Clone)]
pub struct MapModelLocator {
    sources: HashMap<String, String>,
}

impl MapModelLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(type_name.into(), source.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapModelLocator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            sources: iter
                .into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        }
    }
}

impl ModelLocator for MapModelLocator {
    fn locate(&self, type_name: &str) -> Result<Option<String>> {
        Ok(self.sources.get(type_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_locator_finds_nested_types() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/main/java/com/example/dto")).unwrap();
        fs::write(
            root.join("src/main/java/com/example/dto/ItemDto.java"),
            "public class ItemDto {}",
        )
        .unwrap();

        let locator = WorkspaceModelLocator::new(root).unwrap();

        assert_eq!(locator.len(), 1);
        assert_eq!(
            locator.locate("ItemDto").unwrap().as_deref(),
            Some("public class ItemDto {}")
        );
        assert_eq!(locator.locate("Missing").unwrap(), None);
    }

    #[test]
    fn test_workspace_locator_first_path_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/Dup.java"), "first").unwrap();
        fs::write(root.join("b/Dup.java"), "second").unwrap();

        let locator = WorkspaceModelLocator::new(root).unwrap();

        assert_eq!(locator.locate("Dup").unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_workspace_locator_read_failure_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let path = root.join("Gone.java");
        fs::write(&path, "class Gone {}").unwrap();

        let locator = WorkspaceModelLocator::new(root).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(locator.locate("Gone").is_err());
    }

    #[test]
    fn test_map_locator() {
        let locator: MapModelLocator = [("ItemDto", "class ItemDto {}")].into_iter().collect();

        assert_eq!(locator.locate("ItemDto").unwrap().as_deref(), Some("class ItemDto {}"));
        assert!(locator.locate("Other").unwrap().is_none());
    }

    #[test]
    fn test_map_locator_insert_replaces() {
        let mut locator = MapModelLocator::new();
        assert!(locator.locate("ItemDto").unwrap().is_none());

        locator.insert("ItemDto", "class ItemDto {}");
        locator.insert(String::from("ItemDto"), String::from("class ItemDto { int v; }"));

        assert_eq!(
            locator.locate("ItemDto").unwrap().as_deref(),
            Some("class ItemDto { int v; }")
        );
    }
}
