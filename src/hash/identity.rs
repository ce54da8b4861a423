//! Metadata fingerprints.
//!
//! When a library has no file content (or in addition to it), vulnerability
//! tables may index it by a digest over its coordinates. Each
//! [`IdentityScheme`] picks an ordered set of fields, joins them with `_`
//! and digests the result. The schemes are legacy formats and must stay
//! byte-for-byte stable.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::HashAlgorithm;
use crate::error::{FingerprintError, Result};
use crate::model::Library;

/// Borrowed view of the metadata an identity scheme can use.
///
/// Empty strings mean "absent".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryIdentity<'a> {
    pub group: &'a str,
    pub artifact: &'a str,
    pub version: &'a str,
    pub commit: &'a str,
    pub type_tag: &'a str,
}

impl<'a> From<&'a Library> for LibraryIdentity<'a> {
    fn from(lib: &'a Library) -> Self {
        Self {
            group: &lib.group_id,
            artifact: &lib.artifact,
            version: &lib.version,
            commit: &lib.commit,
            type_tag: lib.lib_type.as_str(),
        }
    }
}

/// The named field selections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdentityScheme {
    /// group, artifact, version, type
    Gavt,
    /// lower-cased group, artifact and version, type
    Gavtlc,
    /// artifact, version, type
    Avt,
    /// lower-cased artifact and version, type
    Avtlc,
    /// lower-cased artifact and numeric version core, pre-release suffix as
    /// written, type
    Avtlca,
    /// artifact, commit, type
    Act,
}

impl IdentityScheme {
    pub const ALL: [Self; 6] = [
        Self::Gavt,
        Self::Gavtlc,
        Self::Avt,
        Self::Avtlc,
        Self::Avtlca,
        Self::Act,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gavt => "GAVT",
            Self::Gavtlc => "GAVTLC",
            Self::Avt => "AVT",
            Self::Avtlc => "AVTLC",
            Self::Avtlca => "AVTLCA",
            Self::Act => "ACT",
        }
    }

    /// Fields that must be non-empty, in the order they are checked.
    #[must_use]
    pub const fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Gavt | Self::Gavtlc => &["group", "artifact", "version"],
            Self::Avt | Self::Avtlc | Self::Avtlca => &["artifact", "version"],
            Self::Act => &["artifact", "commit"],
        }
    }

    /// Check that every required field is present.
    pub fn validate(&self, identity: &LibraryIdentity<'_>) -> Result<()> {
        for &field in self.required_fields() {
            let value = match field {
                "group" => identity.group,
                "artifact" => identity.artifact,
                "version" => identity.version,
                _ => identity.commit,
            };
            if value.is_empty() {
                return Err(FingerprintError::missing_field(self.name(), field));
            }
        }
        Ok(())
    }

    /// The ordered parts that get joined and digested.
    #[must_use]
    pub fn parts<'a>(&self, identity: &LibraryIdentity<'a>) -> Vec<Cow<'a, str>> {
        let id = identity;
        match self {
            Self::Gavt => vec![
                id.group.into(),
                id.artifact.into(),
                id.version.into(),
                id.type_tag.into(),
            ],
            Self::Gavtlc => vec![
                id.group.to_lowercase().into(),
                id.artifact.to_lowercase().into(),
                id.version.to_lowercase().into(),
                id.type_tag.into(),
            ],
            Self::Avt => vec![id.artifact.into(), id.version.into(), id.type_tag.into()],
            Self::Avtlc => vec![
                id.artifact.to_lowercase().into(),
                id.version.to_lowercase().into(),
                id.type_tag.into(),
            ],
            Self::Avtlca => {
                let (core, suffix) = split_version(id.version);
                vec![
                    id.artifact.to_lowercase().into(),
                    format!("{}{suffix}", core.to_lowercase()).into(),
                    id.type_tag.into(),
                ]
            }
            Self::Act => vec![id.artifact.into(), id.commit.into(), id.type_tag.into()],
        }
    }

    /// Validate and digest.
    pub fn compute(&self, identity: &LibraryIdentity<'_>, algorithm: HashAlgorithm) -> Result<String> {
        self.validate(identity)?;
        Ok(underscore_digest(&self.parts(identity), algorithm))
    }
}

impl std::fmt::Display for IdentityScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Digest of `parts` joined with `_`.
#[must_use]
pub fn underscore_digest<S: AsRef<str>>(parts: &[S], algorithm: HashAlgorithm) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_");
    algorithm.digest_str(&joined)
}

/// Split a version into its leading numeric core (digits and dots) and the
/// rest, e.g. `1.1.1-RC` into `1.1.1` and `-RC`.
fn split_version(version: &str) -> (&str, &str) {
    let end = version
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(version.len());
    version.split_at(end)
}
