//! Output of one resolver run over one manifest.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{LibType, Library, LibraryId, Organ};
use crate::tree::{self, DependencyGraph, DependencyNode};

/// Flat dependency records for one manifest.
///
/// `children` may be cyclic or re-entrant and may mention ids that have no
/// entry in `libraries`; [`OperationResult::tree`] copes with all three.
/// Tables keep insertion order so that rendering is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationResult {
    /// Manifest the libraries were discovered from (pom.xml, go.mod, ...)
    pub manifest_file: String,
    /// Direct dependencies, in declaration order
    pub direct: Vec<LibraryId>,
    /// Direct children of each library
    pub children: IndexMap<LibraryId, Vec<LibraryId>>,
    pub libraries: IndexMap<LibraryId, Library>,
    pub lib_type: LibType,
    pub organ: Organ,
    /// How long the resolver took
    pub elapsed: Duration,
    /// Set when the resolver failed; such results are not enhanced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn new(manifest_file: impl Into<String>, lib_type: LibType, organ: Organ) -> Self {
        Self {
            manifest_file: manifest_file.into(),
            lib_type,
            organ,
            ..Self::default()
        }
    }

    /// A result for a resolver run that failed.
    pub fn failed(
        manifest_file: impl Into<String>,
        lib_type: LibType,
        organ: Organ,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(manifest_file, lib_type, organ)
        }
    }

    /// Add a library without linking it anywhere.
    #[must_use]
    pub fn with_library(mut self, id: impl Into<LibraryId>, library: Library) -> Self {
        self.libraries.insert(id.into(), library);
        self
    }

    /// Add a library and list it as a direct dependency.
    #[must_use]
    pub fn with_direct(mut self, id: impl Into<LibraryId>, library: Library) -> Self {
        let id = id.into();
        self.direct.push(id.clone());
        self.libraries.insert(id, library);
        self
    }

    /// Record that `parent` depends on `child`.
    #[must_use]
    pub fn with_edge(mut self, parent: impl Into<LibraryId>, child: impl Into<LibraryId>) -> Self {
        self.children
            .entry(parent.into())
            .or_default()
            .push(child.into());
        self
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Store the time elapsed since `start`.
    pub fn track_time(&mut self, start: Instant) {
        self.elapsed = start.elapsed();
    }

    /// The deduplicated dependency forest.
    #[must_use]
    pub fn tree(&self) -> Vec<DependencyNode> {
        tree::assemble(self)
    }

    /// Render the full forest under a `manifest (TYPE)` header.
    pub fn write_tree<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{} ({})", self.manifest_file, self.lib_type)?;
        tree::write_tree(w, &self.tree(), |node| self.node_label(node))
    }

    pub(crate) fn node_label(&self, node: &DependencyNode) -> String {
        self.libraries
            .get(&node.id)
            .map(|lib| lib.label(node.deduplicated))
            .unwrap_or_default()
    }
}

impl DependencyGraph for OperationResult {
    fn roots(&self) -> &[LibraryId] {
        &self.direct
    }

    fn contains(&self, id: &LibraryId) -> bool {
        self.libraries.contains_key(id)
    }

    fn children_of(&self, id: &LibraryId) -> &[LibraryId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar(artifact: &str) -> Library {
        Library::java("com.acme", artifact, "1.0")
    }

    #[test]
    fn test_write_tree() {
        let op = OperationResult::new("pom.xml", LibType::Java, Organ::Maven)
            .with_direct("a", jar("a"))
            .with_direct("d", jar("d"))
            .with_library("b", jar("b"))
            .with_edge("a", "b")
            .with_edge("d", "b");

        let mut out = Vec::new();
        op.write_tree(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "pom.xml (JAVA)\n\
             |-- com.acme:a:1.0\n\
             |  |-- com.acme:b:1.0\n\
             |\n\
             |-- com.acme:d:1.0\n\
             |  |-- com.acme:b:1.0 (d)\n"
        );
    }

    #[test]
    fn test_failed_result() {
        let op = OperationResult::failed("go.mod", LibType::Golang, Organ::FileSystem, "boom");
        assert!(op.is_failed());
        assert!(op.tree().is_empty());
    }

    #[test]
    fn test_serde_keeps_order() {
        let op = OperationResult::new("Gemfile", LibType::Ruby, Organ::Ruby)
            .with_direct("z", Library::new(LibType::Ruby, "z", "1"))
            .with_direct("a", Library::new(LibType::Ruby, "a", "1"));
        let json = serde_json::to_string(&op).unwrap();
        let back: OperationResult = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = back.libraries.keys().map(LibraryId::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(back.organ, Organ::Ruby);
    }
}
