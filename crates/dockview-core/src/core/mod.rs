//! # Core Module
//!
//! The stateless foundation of DockView: data models for molecular
//! structures, PDB/PDBQT input and output, and the atom selection language.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, bonds and systems
//! - **File I/O** ([`io`]) - Fixed-column PDB and PDBQT readers and writers
//! - **Selections** ([`selection`]) - Predicates over atoms, parsed or built in code

pub mod io;
pub mod models;
pub mod selection;
