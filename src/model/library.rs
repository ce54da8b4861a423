//! Libraries as reported by dependency resolvers.

use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque key of a library within one [`OperationResult`](super::OperationResult).
///
/// Resolvers pick the format; the engine only compares ids for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryId(String);

impl LibraryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LibraryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LibraryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for LibraryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ecosystem of a library. The tag is part of every identity hash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum LibType {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "GO")]
    Golang,
    #[serde(rename = "JAVA")]
    Java,
    #[serde(rename = "FS")]
    Fs,
    #[serde(rename = "RUBY")]
    Ruby,
}

impl LibType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Golang => "GO",
            Self::Java => "JAVA",
            Self::Fs => "FS",
            Self::Ruby => "RUBY",
        }
    }
}

impl fmt::Display for LibType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency scope as written by the package manager.
///
/// Text round-trips losslessly; unknown text maps to [`LibScope::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum LibScope {
    #[default]
    Default,
    Empty,
    Compile,
    Provided,
    Runtime,
    System,
    Dev,
    Optional,
    OptionalDev,
    Test,
    Import,
}

impl LibScope {
    const ALL: [Self; 11] = [
        Self::Default,
        Self::Empty,
        Self::Compile,
        Self::Provided,
        Self::Runtime,
        Self::System,
        Self::Dev,
        Self::Optional,
        Self::OptionalDev,
        Self::Test,
        Self::Import,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Empty => "",
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::System => "system",
            Self::Dev => "dev",
            Self::Optional => "optional",
            Self::OptionalDev => "opt-dev",
            Self::Test => "test",
            Self::Import => "import",
        }
    }

    /// Parse scope text, falling back to [`LibScope::Empty`].
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == text)
            .unwrap_or(Self::Empty)
    }
}

impl From<&str> for LibScope {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for LibScope {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl From<LibScope> for &'static str {
    fn from(scope: LibScope) -> Self {
        scope.as_str()
    }
}

impl fmt::Display for LibScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolver that produced an operation result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Organ {
    #[default]
    Maven,
    Gradle,
    FileSystem,
    Ruby,
}

impl Organ {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::FileSystem => "file_system",
            Self::Ruby => "ruby",
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single resolved library. Empty strings mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Library {
    pub artifact: String,
    pub version: String,
    /// Mainly used by Java libraries
    pub group_id: String,
    /// VCS revision, used by Go modules without a tagged version
    pub commit: String,
    pub scope: LibScope,
    pub lib_type: LibType,
    /// Where the library's files live on disk
    pub system_path: Option<PathBuf>,
    /// Whether this entry is a multi-module project wrapper
    pub is_project: bool,
}

impl Library {
    pub fn new(lib_type: LibType, artifact: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            version: version.into(),
            lib_type,
            ..Self::default()
        }
    }

    /// A Maven coordinate.
    pub fn java(
        group_id: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::new(LibType::Java, artifact, version)
        }
    }

    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = commit.into();
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: LibScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_system_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_path = Some(path.into());
        self
    }

    /// Commit if known, else version.
    #[must_use]
    pub fn version_or_commit(&self) -> &str {
        if self.commit.is_empty() {
            &self.version
        } else {
            &self.commit
        }
    }

    /// Display label used in rendered trees: `group:artifact:versionOrCommit`,
    /// with the group omitted when empty and ` (d)` appended for
    /// deduplicated occurrences.
    #[must_use]
    pub fn label(&self, deduplicated: bool) -> String {
        let mut label = String::new();
        if !self.group_id.is_empty() {
            label.push_str(&self.group_id);
            label.push(':');
        }
        label.push_str(&self.artifact);
        label.push(':');
        label.push_str(self.version_or_commit());
        if deduplicated {
            label.push_str(" (d)");
        }
        label
    }
}
