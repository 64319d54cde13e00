use super::element::Element;
use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom record of a structure file.
///
/// Besides the identity and coordinates shared by every format, an atom may
/// carry the AutoDock-specific fields of PDBQT records (partial charge and
/// atom type). Display state is not stored here; it belongs to the engine
/// object that owns the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O1").
    pub name: String,
    /// The chemical element.
    pub element: Element,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Alternate location indicator, if any.
    pub alt_loc: Option<char>,
    pub occupancy: f64,
    pub b_factor: f64,
    /// Whether the atom came from a `HETATM` record.
    pub is_hetero: bool,
    /// The partial atomic charge (PDBQT only).
    pub partial_charge: Option<f64>,
    /// The AutoDock atom type, e.g. "OA" or "HD" (PDBQT only).
    pub autodock_type: Option<String>,
}

impl Atom {
    /// Creates a new `Atom` with default values for the optional record fields.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The chemical element of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: Element, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            element,
            residue_id,
            position,
            alt_loc: None,
            occupancy: 1.0,
            b_factor: 0.0,
            is_hetero: false,
            partial_charge: None,
            autodock_type: None,
        }
    }

    pub fn with_serial(mut self, serial: usize) -> Self {
        self.serial = serial;
        self
    }

    pub fn hetero(mut self, is_hetero: bool) -> Self {
        self.is_hetero = is_hetero;
        self
    }
}
