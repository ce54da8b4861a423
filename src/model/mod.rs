//! Records exchanged between resolvers, the fingerprinting engine and
//! reporting.
//!
//! Resolvers produce an [`OperationResult`] per manifest: a flat table of
//! [`Library`] entries plus adjacency lists. Enhancement turns it into an
//! [`EnhancedResult`] holding a [`DependencyInfo`] per library and the
//! [`VulnerableLib`] matches.

mod enhanced;
mod library;
mod operation;

pub use enhanced::*;
pub use library::*;
pub use operation::*;
