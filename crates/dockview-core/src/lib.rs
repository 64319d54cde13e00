//! # DockView Core Library
//!
//! Splits protein–ligand complexes into receptor and ligand objects, styles
//! them, and annotates polar contacts and candidate hydrogen bonds between the
//! two.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`),
//!   structure file I/O and the selection language.
//!
//! - **[`engine`]: The Command Surface.** The [`engine::Engine`] trait and its
//!   in-process implementation [`engine::session::Session`], which owns every
//!   named object together with display and scene state. Distance measurement,
//!   configuration and progress reporting live here too.
//!
//! - **[`workflows`]: The Public API.** The splitter, the contact finder and
//!   the end-to-end `analyze` procedure, written against the `Engine` trait.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_utils;
