use super::Engine;
use super::error::EngineError;
use super::handles::{DistanceSetHandle, MoleculeHandle, ObjectKind, ObjectOrigin};
use super::measure::{self, AtomRef, DistanceMode, DistanceSet, Probe};
use super::style::{AtomStyle, Color, Representation};
use super::view::{Scene, ViewFrame};
use crate::core::io::format::StructureFormat;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::selection::{AtomContext, Selection};
use slotmap::SecondaryMap;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A named molecule together with the display state of its atoms.
#[derive(Debug, Clone)]
pub struct MoleculeObject {
    handle: MoleculeHandle,
    system: MolecularSystem,
    styles: SecondaryMap<AtomId, AtomStyle>,
}

impl MoleculeObject {
    fn new(
        handle: MoleculeHandle,
        system: MolecularSystem,
        styles: SecondaryMap<AtomId, AtomStyle>,
    ) -> Self {
        Self {
            handle,
            system,
            styles,
        }
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn handle(&self) -> &MoleculeHandle {
        &self.handle
    }

    pub fn system(&self) -> &MolecularSystem {
        &self.system
    }

    pub fn style(&self, atom_id: AtomId) -> AtomStyle {
        self.styles.get(atom_id).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub enum SessionObject {
    Molecule(MoleculeObject),
    Distances(DistanceSet),
}

impl SessionObject {
    pub fn name(&self) -> &str {
        match self {
            SessionObject::Molecule(molecule) => molecule.name(),
            SessionObject::Distances(set) => &set.name,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            SessionObject::Molecule(_) => ObjectKind::Molecule,
            SessionObject::Distances(_) => ObjectKind::DistanceSet,
        }
    }
}

/// Atoms of one molecule object matched by a selection, in file order.
struct ObjectMatch {
    index: usize,
    atom_ids: Vec<AtomId>,
}

/// The in-process engine: an ordered table of named objects plus scene state.
#[derive(Debug, Default)]
pub struct Session {
    objects: Vec<SessionObject>,
    scene: Scene,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Objects in creation order. A replaced object keeps its original slot.
    pub fn objects(&self) -> &[SessionObject] {
        &self.objects
    }

    pub fn object_names(&self) -> Vec<&str> {
        self.objects.iter().map(SessionObject::name).collect()
    }

    pub fn molecule_object(&self, name: &str) -> Result<&MoleculeObject, EngineError> {
        match self.find(name)? {
            SessionObject::Molecule(molecule) => Ok(molecule),
            other => Err(wrong_kind(name, ObjectKind::Molecule, other.kind())),
        }
    }

    /// Loads a structure file whose format is given explicitly rather than
    /// taken from its extension.
    #[instrument(skip_all, name = "load")]
    pub fn load_with_format(
        &mut self,
        path: &Path,
        name: &str,
        format: StructureFormat,
    ) -> Result<MoleculeHandle, EngineError> {
        check_object_name(name)?;
        let (system, metadata) = format
            .read_path(path)
            .map_err(|e| EngineError::from_structure_io(path, e))?;

        if metadata.skipped_models > 0 {
            warn!(
                "'{}' holds {} additional model(s); only the first was loaded.",
                path.display(),
                metadata.skipped_models
            );
        }
        info!(
            "Loaded {} atoms ({} residues) from '{}' as '{}'.",
            system.atom_count(),
            system.residue_count(),
            path.display(),
            name
        );

        let mut styles = SecondaryMap::with_capacity(system.atom_count());
        for (atom_id, _) in system.atoms_iter() {
            styles.insert(atom_id, AtomStyle::loaded());
        }
        let handle = MoleculeHandle::new(
            name,
            ObjectOrigin::Loaded {
                path: path.to_path_buf(),
            },
        );
        self.insert(SessionObject::Molecule(MoleculeObject::new(
            handle.clone(),
            system,
            styles,
        )));
        Ok(handle)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|object| object.name() == name)
    }

    fn find(&self, name: &str) -> Result<&SessionObject, EngineError> {
        self.position(name)
            .map(|index| &self.objects[index])
            .ok_or_else(|| EngineError::ObjectNotFound {
                name: name.to_string(),
            })
    }

    fn molecule_at(&self, index: usize) -> Option<&MoleculeObject> {
        match self.objects.get(index) {
            Some(SessionObject::Molecule(molecule)) => Some(molecule),
            _ => None,
        }
    }

    fn molecule_at_mut(&mut self, index: usize) -> Option<&mut MoleculeObject> {
        match self.objects.get_mut(index) {
            Some(SessionObject::Molecule(molecule)) => Some(molecule),
            _ => None,
        }
    }

    fn insert(&mut self, object: SessionObject) {
        match self.position(object.name()) {
            Some(index) => {
                debug!(
                    "Replacing existing {} '{}'.",
                    self.objects[index].kind(),
                    object.name()
                );
                self.objects[index] = object;
            }
            None => self.objects.push(object),
        }
    }

    /// Every object a selection names must exist and be a molecule.
    fn check_references(&self, selection: &Selection) -> Result<(), EngineError> {
        for name in selection.object_names() {
            let object = self.find(name)?;
            if object.kind() != ObjectKind::Molecule {
                return Err(wrong_kind(name, ObjectKind::Molecule, object.kind()));
            }
        }
        Ok(())
    }

    fn evaluate(&self, selection: &Selection) -> Result<Vec<ObjectMatch>, EngineError> {
        self.check_references(selection)?;

        let mut matches = Vec::new();
        for (index, object) in self.objects.iter().enumerate() {
            let SessionObject::Molecule(molecule) = object else {
                continue;
            };
            let atom_ids: Vec<AtomId> = molecule
                .system
                .ordered_atom_ids()
                .into_iter()
                .filter(|&atom_id| {
                    molecule
                        .system
                        .atom_context(atom_id)
                        .is_some_and(|(atom, residue, chain)| {
                            selection.matches(&AtomContext {
                                object: molecule.name(),
                                atom,
                                residue,
                                chain,
                            })
                        })
                })
                .collect();
            if !atom_ids.is_empty() {
                matches.push(ObjectMatch { index, atom_ids });
            }
        }
        Ok(matches)
    }

    /// Copies matched atoms, with their styles, into a fresh system.
    fn gather(
        &self,
        matches: &[ObjectMatch],
    ) -> (MolecularSystem, SecondaryMap<AtomId, AtomStyle>, Vec<String>) {
        let mut system = MolecularSystem::new();
        let mut styles = SecondaryMap::new();
        let mut sources = Vec::with_capacity(matches.len());

        for object_match in matches {
            let Some(source) = self.molecule_at(object_match.index) else {
                continue;
            };
            let id_map = source
                .system
                .copy_atoms_into(&object_match.atom_ids, &mut system);
            for (old_id, new_id) in id_map {
                styles.insert(new_id, source.style(old_id));
            }
            sources.push(source.name().to_string());
        }
        (system, styles, sources)
    }

    fn restyle(
        &mut self,
        selection: &Selection,
        update: impl Fn(&mut AtomStyle),
    ) -> Result<usize, EngineError> {
        let matches = self.evaluate(selection)?;
        let mut affected = 0;
        for object_match in matches {
            let Some(molecule) = self.molecule_at_mut(object_match.index) else {
                continue;
            };
            for atom_id in object_match.atom_ids {
                if let Some(entry) = molecule.styles.entry(atom_id) {
                    update(entry.or_default());
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    fn probes(&self, selection: &Selection) -> Result<Vec<Probe>, EngineError> {
        let matches = self.evaluate(selection)?;
        let mut probes = Vec::new();
        for object_match in matches {
            let Some(molecule) = self.molecule_at(object_match.index) else {
                continue;
            };
            for atom_id in object_match.atom_ids {
                let Some((atom, residue, chain)) = molecule.system.atom_context(atom_id) else {
                    continue;
                };
                probes.push(Probe {
                    key: (object_match.index, atom_id),
                    position: atom.position,
                    atom: AtomRef {
                        object: molecule.name().to_string(),
                        serial: atom.serial,
                        atom_name: atom.name.clone(),
                        element: atom.element,
                        residue_name: residue.name.clone(),
                        residue_number: residue.number,
                        chain: chain.id,
                    },
                });
            }
        }
        Ok(probes)
    }

    fn derive(
        &mut self,
        name: &str,
        selection: &Selection,
        remove_from_sources: bool,
    ) -> Result<MoleculeHandle, EngineError> {
        check_object_name(name)?;
        let matches = self.evaluate(selection)?;
        let (system, styles, sources) = self.gather(&matches);

        if remove_from_sources {
            for object_match in &matches {
                let Some(source) = self.molecule_at_mut(object_match.index) else {
                    continue;
                };
                let atom_ids: HashSet<AtomId> = object_match.atom_ids.iter().copied().collect();
                source.system.remove_atoms(&atom_ids);
                for atom_id in atom_ids {
                    source.styles.remove(atom_id);
                }
            }
        }

        if system.is_empty() {
            warn!(
                "Selection '{}' matched no atoms; '{}' will be empty.",
                selection, name
            );
        } else {
            info!(
                "{} {} atoms into '{}'.",
                if remove_from_sources { "Extracted" } else { "Copied" },
                system.atom_count(),
                name
            );
        }

        let handle = MoleculeHandle::new(name, ObjectOrigin::Derived { sources });
        self.insert(SessionObject::Molecule(MoleculeObject::new(
            handle.clone(),
            system,
            styles,
        )));
        Ok(handle)
    }
}

fn wrong_kind(name: &str, expected: ObjectKind, actual: ObjectKind) -> EngineError {
    EngineError::WrongObjectKind {
        name: name.to_string(),
        expected,
        actual,
    }
}

// Names must survive a round trip through the selection language.
fn check_object_name(name: &str) -> Result<(), EngineError> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || "()&|!".contains(c)) {
        return Err(EngineError::InvalidParameter {
            name: "name",
            reason: format!("'{}' is not a usable object name", name),
        });
    }
    Ok(())
}

fn check_distance(param: &'static str, value: f64, allow_zero: bool) -> Result<(), EngineError> {
    let in_range = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !in_range {
        return Err(EngineError::InvalidParameter {
            name: param,
            reason: format!("expected a finite distance in Å, got {}", value),
        });
    }
    Ok(())
}

impl Engine for Session {
    fn load(&mut self, path: &Path, name: &str) -> Result<MoleculeHandle, EngineError> {
        let format =
            StructureFormat::from_path(path).ok_or_else(|| EngineError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;
        self.load_with_format(path, name, format)
    }

    #[instrument(skip_all, name = "create")]
    fn create(
        &mut self,
        name: &str,
        selection: &Selection,
    ) -> Result<MoleculeHandle, EngineError> {
        self.derive(name, selection, false)
    }

    #[instrument(skip_all, name = "extract")]
    fn extract(
        &mut self,
        name: &str,
        selection: &Selection,
    ) -> Result<MoleculeHandle, EngineError> {
        self.derive(name, selection, true)
    }

    fn show(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError> {
        let affected = self.restyle(selection, |style| {
            style.representations.insert(representation)
        })?;
        debug!("Showing {} for {} atoms.", representation, affected);
        Ok(affected)
    }

    fn hide(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError> {
        let affected = self.restyle(selection, |style| {
            style.representations.remove(representation)
        })?;
        debug!("Hiding {} for {} atoms.", representation, affected);
        Ok(affected)
    }

    fn zoom(
        &mut self,
        selection: &Selection,
        buffer: f64,
    ) -> Result<Option<ViewFrame>, EngineError> {
        check_distance("buffer", buffer, true)?;
        let positions: Vec<_> = self
            .probes(selection)?
            .into_iter()
            .map(|probe| probe.position)
            .collect();
        let frame = ViewFrame::enclosing(&positions, buffer);
        match frame {
            Some(frame) => self.scene.view = Some(frame),
            None => debug!("Zoom selection '{}' is empty; view unchanged.", selection),
        }
        Ok(frame)
    }

    fn bg_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.scene.background = color;
        Ok(())
    }

    fn color(&mut self, color: Color, selection: &Selection) -> Result<usize, EngineError> {
        let affected = self.restyle(selection, |style| style.color = Some(color))?;
        debug!("Colored {} atoms {}.", affected, color);
        Ok(affected)
    }

    #[instrument(skip_all, name = "distance")]
    fn distance(
        &mut self,
        name: &str,
        selection1: &Selection,
        selection2: &Selection,
        cutoff: f64,
        mode: DistanceMode,
    ) -> Result<DistanceSetHandle, EngineError> {
        check_object_name(name)?;
        check_distance("cutoff", cutoff, false)?;

        let first = self.probes(selection1)?;
        let second = self.probes(selection2)?;
        let pairs = measure::find_pairs(&first, &second, cutoff, mode);
        info!(
            "Found {} {} pair(s) within {:.2} Å for '{}'.",
            pairs.len(),
            mode,
            cutoff,
            name
        );

        let handle = DistanceSetHandle::new(name, pairs.len());
        self.insert(SessionObject::Distances(DistanceSet {
            name: name.to_string(),
            cutoff,
            mode,
            pairs,
        }));
        Ok(handle)
    }

    fn save(&self, path: &Path, selection: &Selection) -> Result<usize, EngineError> {
        let format =
            StructureFormat::from_path(path).ok_or_else(|| EngineError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;
        let matches = self.evaluate(selection)?;
        let (system, _, _) = self.gather(&matches);
        format
            .write_path(&system, path)
            .map_err(|e| EngineError::from_structure_io(path, e))?;
        info!(
            "Saved {} atoms to '{}'.",
            system.atom_count(),
            path.display()
        );
        Ok(system.atom_count())
    }

    fn molecule(&self, name: &str) -> Result<MoleculeHandle, EngineError> {
        self.molecule_object(name).map(|molecule| molecule.handle.clone())
    }

    fn count_atoms(&self, selection: &Selection) -> Result<usize, EngineError> {
        Ok(self
            .evaluate(selection)?
            .iter()
            .map(|object_match| object_match.atom_ids.len())
            .sum())
    }

    fn distance_set(&self, handle: &DistanceSetHandle) -> Result<&DistanceSet, EngineError> {
        match self.find(handle.name())? {
            SessionObject::Distances(set) => Ok(set),
            other => Err(wrong_kind(
                handle.name(),
                ObjectKind::DistanceSet,
                other.kind(),
            )),
        }
    }
}
