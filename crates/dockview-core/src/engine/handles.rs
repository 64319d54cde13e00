//! Typed references to session objects.
//!
//! Engines hand out handles only for objects that exist and have the expected
//! kind, so code holding a [`MoleculeHandle`] never refers to a distance set or
//! to a name that was never created.

use crate::core::selection::Selection;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Molecule,
    DistanceSet,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Molecule => f.write_str("molecule"),
            ObjectKind::DistanceSet => f.write_str("distance set"),
        }
    }
}

/// Where a molecule object's atoms came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectOrigin {
    /// Read from a structure file.
    Loaded { path: PathBuf },
    /// Built from a selection over the named objects.
    Derived { sources: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeHandle {
    name: String,
    origin: ObjectOrigin,
}

impl MoleculeHandle {
    pub fn new(name: impl Into<String>, origin: ObjectOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &ObjectOrigin {
        &self.origin
    }

    pub fn source_path(&self) -> Option<&Path> {
        match &self.origin {
            ObjectOrigin::Loaded { path } => Some(path),
            ObjectOrigin::Derived { .. } => None,
        }
    }

    /// A selection covering every atom of this object.
    pub fn selection(&self) -> Selection {
        Selection::object(self.name.clone())
    }
}

impl fmt::Display for MoleculeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceSetHandle {
    name: String,
    pair_count: usize,
}

impl DistanceSetHandle {
    pub fn new(name: impl Into<String>, pair_count: usize) -> Self {
        Self {
            name: name.into(),
            pair_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of pairs recorded when the set was computed.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }
}
