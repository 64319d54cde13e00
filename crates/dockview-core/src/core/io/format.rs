use super::pdb::{PdbError, PdbFile, PdbMetadata, PdbqtFile};
use super::traits::MolecularFile;
use crate::core::models::system::MolecularSystem;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Structure file formats understood by the reader and writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFormat {
    Pdb,
    Pdbqt,
}

impl StructureFormat {
    /// Detects the format from a path's extension (`pdb`, `ent`, `pdbqt`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            StructureFormat::Pdb => "pdb",
            StructureFormat::Pdbqt => "pdbqt",
        }
    }

    pub fn read_path(&self, path: &Path) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        match self {
            StructureFormat::Pdb => PdbFile::read_from_path(path),
            StructureFormat::Pdbqt => PdbqtFile::read_from_path(path),
        }
    }

    pub fn write_path(&self, system: &MolecularSystem, path: &Path) -> Result<(), PdbError> {
        match self {
            StructureFormat::Pdb => PdbFile::write_system_to_path(system, path),
            StructureFormat::Pdbqt => PdbqtFile::write_system_to_path(system, path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported structure format: '{0}'")]
pub struct ParseFormatError(pub String);

impl FromStr for StructureFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Ok(StructureFormat::Pdb),
            "pdbqt" => Ok(StructureFormat::Pdbqt),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
