//! An engine that records the commands it receives.

use crate::core::selection::Selection;
use crate::engine::Engine;
use crate::engine::error::EngineError;
use crate::engine::handles::{DistanceSetHandle, MoleculeHandle, ObjectOrigin};
use crate::engine::measure::{DistanceMode, DistanceSet};
use crate::engine::style::{Color, Representation};
use crate::engine::view::ViewFrame;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(PathBuf, String),
    Create(String, Selection),
    Extract(String, Selection),
    Show(Representation, Selection),
    Hide(Representation, Selection),
    Zoom(Selection, f64),
    BgColor(Color),
    Color(Color, Selection),
    Distance {
        name: String,
        first: Selection,
        second: Selection,
        cutoff: f64,
        mode: DistanceMode,
    },
    Save(PathBuf, Selection),
    Molecule(String),
    Count(Selection),
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Load(path, name) => write!(f, "load {}, {}", path.display(), name),
            Call::Create(name, sel) => write!(f, "create {}, {}", name, sel),
            Call::Extract(name, sel) => write!(f, "extract {}, {}", name, sel),
            Call::Show(rep, sel) => write!(f, "show {}, {}", rep, sel),
            Call::Hide(rep, sel) => write!(f, "hide {}, {}", rep, sel),
            Call::Zoom(sel, buffer) => write!(f, "zoom {}, buffer={}", sel, buffer),
            Call::BgColor(color) => write!(f, "bg_color {}", color),
            Call::Color(color, sel) => write!(f, "color {}, {}", color, sel),
            Call::Distance {
                name,
                first,
                second,
                cutoff,
                mode,
            } => write!(
                f,
                "distance {}, {}, {}, cutoff={}, mode={}",
                name, first, second, cutoff, mode
            ),
            Call::Save(path, sel) => write!(f, "save {}, {}", path.display(), sel),
            Call::Molecule(name) => write!(f, "molecule {}", name),
            Call::Count(sel) => write!(f, "count_atoms {}", sel),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingEngine {
    calls: RefCell<Vec<Call>>,
    molecules: Vec<MoleculeHandle>,
    distance_sets: Vec<DistanceSet>,
}

impl RecordingEngine {
    pub(crate) fn with_molecule(name: &str) -> Self {
        let mut engine = Self::default();
        engine.molecules.push(MoleculeHandle::new(
            name,
            ObjectOrigin::Loaded {
                path: PathBuf::from(format!("{}.pdb", name)),
            },
        ));
        engine
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded commands other than lookups and counts, as text.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, Call::Count(_) | Call::Molecule(_)))
            .map(Call::to_string)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn register(&mut self, handle: &MoleculeHandle) {
        self.molecules.retain(|m| m.name() != handle.name());
        self.molecules.push(handle.clone());
    }

    fn derived(&mut self, name: &str, selection: &Selection) -> MoleculeHandle {
        let handle = MoleculeHandle::new(
            name,
            ObjectOrigin::Derived {
                sources: selection
                    .object_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
        );
        self.register(&handle);
        handle
    }
}

impl Engine for RecordingEngine {
    fn load(&mut self, path: &Path, name: &str) -> Result<MoleculeHandle, EngineError> {
        self.record(Call::Load(path.to_path_buf(), name.to_string()));
        let handle = MoleculeHandle::new(
            name,
            ObjectOrigin::Loaded {
                path: path.to_path_buf(),
            },
        );
        self.register(&handle);
        Ok(handle)
    }

    fn create(
        &mut self,
        name: &str,
        selection: &Selection,
    ) -> Result<MoleculeHandle, EngineError> {
        self.record(Call::Create(name.to_string(), selection.clone()));
        Ok(self.derived(name, selection))
    }

    fn extract(
        &mut self,
        name: &str,
        selection: &Selection,
    ) -> Result<MoleculeHandle, EngineError> {
        self.record(Call::Extract(name.to_string(), selection.clone()));
        Ok(self.derived(name, selection))
    }

    fn show(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError> {
        self.record(Call::Show(representation, selection.clone()));
        Ok(0)
    }

    fn hide(
        &mut self,
        representation: Representation,
        selection: &Selection,
    ) -> Result<usize, EngineError> {
        self.record(Call::Hide(representation, selection.clone()));
        Ok(0)
    }

    fn zoom(
        &mut self,
        selection: &Selection,
        buffer: f64,
    ) -> Result<Option<ViewFrame>, EngineError> {
        self.record(Call::Zoom(selection.clone(), buffer));
        Ok(None)
    }

    fn bg_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.record(Call::BgColor(color));
        Ok(())
    }

    fn color(&mut self, color: Color, selection: &Selection) -> Result<usize, EngineError> {
        self.record(Call::Color(color, selection.clone()));
        Ok(0)
    }

    fn distance(
        &mut self,
        name: &str,
        selection1: &Selection,
        selection2: &Selection,
        cutoff: f64,
        mode: DistanceMode,
    ) -> Result<DistanceSetHandle, EngineError> {
        self.record(Call::Distance {
            name: name.to_string(),
            first: selection1.clone(),
            second: selection2.clone(),
            cutoff,
            mode,
        });
        self.distance_sets.retain(|set| set.name != name);
        self.distance_sets.push(DistanceSet {
            name: name.to_string(),
            cutoff,
            mode,
            pairs: Vec::new(),
        });
        Ok(DistanceSetHandle::new(name, 0))
    }

    fn save(&self, path: &Path, selection: &Selection) -> Result<usize, EngineError> {
        self.record(Call::Save(path.to_path_buf(), selection.clone()));
        Ok(0)
    }

    fn molecule(&self, name: &str) -> Result<MoleculeHandle, EngineError> {
        self.record(Call::Molecule(name.to_string()));
        self.molecules
            .iter()
            .find(|m| m.name() == name)
            .cloned()
            .ok_or_else(|| EngineError::ObjectNotFound {
                name: name.to_string(),
            })
    }

    fn count_atoms(&self, selection: &Selection) -> Result<usize, EngineError> {
        self.record(Call::Count(selection.clone()));
        Ok(0)
    }

    fn distance_set(&self, handle: &DistanceSetHandle) -> Result<&DistanceSet, EngineError> {
        self.distance_sets
            .iter()
            .find(|set| set.name == handle.name())
            .ok_or_else(|| EngineError::ObjectNotFound {
                name: handle.name().to_string(),
            })
    }
}
