//! Operation results after fingerprinting and matching.

use std::collections::BTreeMap;
use std::io::{self, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Library, LibraryId, OperationResult};
use crate::hash::{ADDITIONAL_SHA1_KEY, IdentityScheme, SHA1_KEY, SuperHash};
use crate::tree::{self, DependencyNode};

/// One library with every hash computed for it.
///
/// This is the record shape consumers of the dependency tree expect, so
/// field names and omission rules are part of the output format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInfo {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "type", default)]
    pub packaging: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    /// Plain digest of the library file, or the ecosystem's primary
    /// identity hash when there is no file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha1: String,
    /// The ecosystem's metadata identity hash
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_sha1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_file: String,
    #[serde(default)]
    pub deduped: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checksums: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_hash: Option<SuperHash>,
    /// Digest after switching CRLF and LF line endings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_platform_sha1: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identity_hashes: BTreeMap<IdentityScheme, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DependencyInfo>,
}

impl DependencyInfo {
    /// Copy the library's metadata; hashes are left empty.
    #[must_use]
    pub fn from_library(library: &Library, manifest_file: &str) -> Self {
        Self {
            group_id: library.group_id.clone(),
            artifact_id: library.artifact.clone(),
            version: library.version.clone(),
            scope: library.scope.as_str().to_string(),
            system_path: library
                .system_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            filename: library
                .system_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            dependency_type: library.lib_type.as_str().to_string(),
            dependency_file: manifest_file.to_string(),
            commit: library.commit.clone(),
            ..Self::default()
        }
    }

    /// Fill `checksums` from `sha1` and `additional_sha1`.
    pub fn record_checksums(&mut self) {
        self.checksums
            .insert(SHA1_KEY.to_string(), self.sha1.clone());
        if !self.additional_sha1.is_empty() {
            self.checksums
                .insert(ADDITIONAL_SHA1_KEY.to_string(), self.additional_sha1.clone());
        }
    }

    /// Digests derived from file content: plain, super hash, other platform.
    pub fn content_digests(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.sha1.as_str())
            .chain(self.super_hash.as_ref().map(|h| h.full_hash.as_str()))
            .chain(self.other_platform_sha1.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Digests derived from metadata.
    pub fn identity_digests(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.additional_sha1.as_str())
            .chain(self.identity_hashes.values().map(String::as_str))
            .filter(|d| !d.is_empty())
    }
}

/// A known-vulnerable library record from the vulnerability lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerableLib {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub artifact: String,
    /// Free-form: tables store a string, a list or an object here
    #[serde(default)]
    pub package_version: serde_json::Value,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(rename = "CVE", default)]
    pub cve: String,
}

/// An [`OperationResult`] with per-library hashes and matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResult {
    pub operation: OperationResult,
    pub deps: IndexMap<LibraryId, DependencyInfo>,
    /// Libraries matched against the vulnerability lookup
    pub vulnerable: IndexMap<LibraryId, VulnerableLib>,
}

impl EnhancedResult {
    #[must_use]
    pub fn new(operation: OperationResult) -> Self {
        Self {
            operation,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerable.is_empty()
    }

    /// The dependency forest with vulnerability taint applied.
    #[must_use]
    pub fn forest(&self) -> Vec<DependencyNode> {
        let mut forest = self.operation.tree();
        if self.is_vulnerable() {
            tree::propagate_vulnerability(&mut forest, |id| self.vulnerable.contains_key(id));
        }
        forest
    }

    /// Nest the dependency records along the forest.
    ///
    /// Libraries the enhancer skipped appear with metadata only.
    #[must_use]
    pub fn dependency_tree(&self) -> Vec<DependencyInfo> {
        tree::fold_forest(&self.operation.tree(), |node, children| {
            let mut info = self.dependency_info(node);
            info.children = children;
            info
        })
    }

    /// Render only the paths that lead to a vulnerable library.
    pub fn write_vulnerable_paths<W: Write>(&self, w: &mut W) -> io::Result<()> {
        tree::write_vulnerable_paths(w, &self.forest(), |node| {
            self.operation.node_label(node)
        })
    }

    fn dependency_info(&self, node: &DependencyNode) -> DependencyInfo {
        let mut info = self
            .deps
            .get(&node.id)
            .cloned()
            .or_else(|| {
                self.operation
                    .libraries
                    .get(&node.id)
                    .map(|lib| DependencyInfo::from_library(lib, &self.operation.manifest_file))
            })
            .unwrap_or_default();
        info.deduped = node.deduplicated;
        info
    }
}
