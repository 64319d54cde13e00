//! # Engine Module
//!
//! The command surface the workflows drive. Every operation goes through the
//! [`Engine`] trait, which names objects, builds new ones from selections,
//! changes how atoms are displayed and measures distances between selections.
//!
//! [`session::Session`] is the in-process implementation. It keeps an ordered
//! table of named objects (molecules and distance sets) and the scene state.
//!
//! ## Submodules
//!
//! - **Handles** ([`handles`]) - Typed references to molecule and distance-set objects
//! - **Style** ([`style`]) and **View** ([`view`]) - Representations, colors and camera framing
//! - **Measurement** ([`measure`]) - Kd-tree distance search and distance sets
//! - **Configuration** ([`config`]) - Object names and display settings of the workflows
//! - **Progress Monitoring** ([`progress`]) - Callbacks for user-facing progress messages
//! - **Error Handling** ([`error`]) - The engine error taxonomy

pub mod config;
pub mod error;
pub mod handles;
pub mod measure;
pub mod progress;
pub mod session;
pub mod style;
pub mod view;

use crate::core::selection::Selection;
use error::EngineError;
use handles::{DistanceSetHandle, MoleculeHandle};
use measure::{DistanceMode, DistanceSet};
use std::path::Path;
use style::{Color, Representation};
use view::ViewFrame;

/// Operations on a session of named molecular objects.
///
/// Creating an object under a name that is already taken replaces the old
/// object. Selections may match no atoms; that is never an error. Selections
/// naming an object that does not exist, or that is not a molecule, fail with
/// [`EngineError::ObjectNotFound`] or [`EngineError::WrongObjectKind`].
pub trait Engine {
    /// Reads a structure file into a new molecule object.
    fn load(&mut self, path: &Path, name: &str) -> Result<MoleculeHandle, EngineError>;

    /// Copies the selected atoms into a new molecule object.
    fn create(&mut self, name: &str, selection: &Selection)
    -> Result<MoleculeHandle, EngineError>;

    /// Moves the selected atoms into a new molecule object, removing them from
    /// the objects they came from.
    fn extract(
        &mut self,
        name: &str,
        selection: &Selection,
    ) -> Result<MoleculeHandle, EngineError>;

    /// Turns a representation on for the selected atoms. Returns how many atoms were affected.
    fn show(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError>;

    /// Turns a representation off for the selected atoms.
    fn hide(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError>;

    /// Frames the view on the selected atoms. An empty selection leaves the
    /// view unchanged and returns `None`.
    fn zoom(
        &mut self,
        selection: &Selection,
        buffer: f64,
    ) -> Result<Option<ViewFrame>, EngineError>;

    fn bg_color(&mut self, color: Color) -> Result<(), EngineError>;

    fn color(&mut self, color: Color, selection: &Selection) -> Result<usize, EngineError>;

    /// Measures distances between two selections and stores them as a named
    /// distance set.
    fn distance(
        &mut self,
        name: &str,
        selection1: &Selection,
        selection2: &Selection,
        cutoff: f64,
        mode: DistanceMode,
    ) -> Result<DistanceSetHandle, EngineError>;

    /// Writes the selected atoms to a structure file. Returns the number of atoms written.
    fn save(&self, path: &Path, selection: &Selection) -> Result<usize, EngineError>;

    /// Resolves a name to a molecule object.
    fn molecule(&self, name: &str) -> Result<MoleculeHandle, EngineError>;

    fn count_atoms(&self, selection: &Selection) -> Result<usize, EngineError>;

    fn distance_set(&self, handle: &DistanceSetHandle) -> Result<&DistanceSet, EngineError>;
}
