//! # Core Models Module
//!
//! Data structures describing a molecular structure as read from a file:
//! atoms, residues, chains, bonds and the [`system::MolecularSystem`] that
//! owns them.
//!
//! - [`atom`] - Atom records with coordinates and optional PDBQT fields
//! - [`element`] - Chemical elements and symbol/AutoDock-type lookup
//! - [`residue`] - Residues grouping atoms
//! - [`chain`] - Chains grouping residues
//! - [`system`] - The complete system with subset and removal operations
//! - [`topology`] - Bond connectivity
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use dockview::core::models::{atom::Atom, element::Element, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, None, "UNL").unwrap();
//! let atom = Atom::new("O1", Element::Oxygen, residue_id, Point3::origin());
//! system.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod element;
pub mod ids;
pub mod residue;
pub mod system;
pub mod topology;
