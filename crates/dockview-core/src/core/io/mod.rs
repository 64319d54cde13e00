//! Provides input/output functionality for molecular file formats.
//!
//! PDB and PDBQT share one fixed-column record layout; [`pdb`] implements
//! both on top of the [`traits::MolecularFile`] interface, and
//! [`format::StructureFormat`] picks between them from a file extension.

pub mod format;
pub mod pdb;
pub mod traits;
