//! Output collaborators of the build step.
//!
//! The build step hands each rendered component to a [`ComponentLoader`] as a
//! `(qualified_name, bytes)` pair and registers names that must survive dead-code
//! elimination with an [`UnremovableRegistry`].

use crate::error::{BinderError, BinderResult};
use convert_case::{Case, Casing};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Receives rendered component artifacts.
pub trait ComponentLoader {
    /// Make the artifact available under its qualified name.
    fn write(&mut self, qualified_name: &str, bytes: Vec<u8>) -> BinderResult<()>;
}

/// Receives names the container must not prune.
pub trait UnremovableRegistry {
    fn retain(&mut self, name: &str);
}

/// A rendered artifact kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub qualified_name: String,
    pub bytes: Vec<u8>,
}

impl GeneratedArtifact {
    /// The artifact as UTF-8 source text.
    pub fn source(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Loader that keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryComponentLoader {
    pub artifacts: Vec<GeneratedArtifact>,
}

impl MemoryComponentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an artifact by qualified name.
    pub fn get(&self, qualified_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.qualified_name == qualified_name)
    }
}

impl ComponentLoader for MemoryComponentLoader {
    fn write(&mut self, qualified_name: &str, bytes: Vec<u8>) -> BinderResult<()> {
        self.artifacts.retain(|a| a.qualified_name != qualified_name);
        self.artifacts.push(GeneratedArtifact {
            qualified_name: qualified_name.to_string(),
            bytes,
        });
        Ok(())
    }
}

/// Loader that writes each artifact as a `.rs` file into a directory.
#[derive(Debug, Clone)]
pub struct FsComponentLoader {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FsComponentLoader {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File path for a qualified name: the snake-cased last path segment.
    pub fn path_for(&self, qualified_name: &str) -> PathBuf {
        let type_name = qualified_name.rsplit("::").next().unwrap_or(qualified_name);
        self.out_dir
            .join(format!("{}.rs", type_name.to_case(Case::Snake)))
    }
}

impl ComponentLoader for FsComponentLoader {
    fn write(&mut self, qualified_name: &str, bytes: Vec<u8>) -> BinderResult<()> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| {
            BinderError::loader(
                qualified_name,
                format!("Cannot create {}: {}", self.out_dir.display(), e),
            )
        })?;
        let path = self.path_for(qualified_name);
        std::fs::write(&path, bytes).map_err(|e| {
            BinderError::loader(
                qualified_name,
                format!("Cannot write {}: {}", path.display(), e),
            )
        })?;
        info!(component = %qualified_name, path = %path.display(), "Wrote generated component");
        self.written.push(path);
        Ok(())
    }
}

/// Set of retained names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnremovableSet {
    names: BTreeSet<String>,
}

impl UnremovableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }
}

impl UnremovableRegistry for UnremovableSet {
    fn retain(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_loader_replaces_same_name() {
        let mut loader = MemoryComponentLoader::new();
        loader.write("generated::A", b"one".to_vec()).unwrap();
        loader.write("generated::A", b"two".to_vec()).unwrap();
        assert_eq!(loader.artifacts.len(), 1);
        assert_eq!(loader.get("generated::A").unwrap().source(), Some("two"));
    }

    #[test]
    fn test_fs_loader_file_name() {
        let loader = FsComponentLoader::new("/out");
        assert_eq!(
            loader.path_for("generated::ContextProducer"),
            PathBuf::from("/out/context_producer.rs")
        );
        assert_eq!(loader.path_for("Bindings"), PathBuf::from("/out/bindings.rs"));
    }

    #[test]
    fn test_fs_loader_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");
        let mut loader = FsComponentLoader::new(&out);
        loader
            .write("generated::ContextProducer", b"pub struct X;".to_vec())
            .unwrap();
        let written = std::fs::read_to_string(out.join("context_producer.rs")).unwrap();
        assert_eq!(written, "pub struct X;");
        assert_eq!(loader.written().len(), 1);
    }

    #[test]
    fn test_unremovable_set() {
        let mut set = UnremovableSet::new();
        set.retain("generated::ContextProducer");
        set.retain("generated::ContextProducer");
        assert!(set.contains("generated::ContextProducer"));
        assert_eq!(set.names().len(), 1);
    }
}
