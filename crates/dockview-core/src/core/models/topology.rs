use super::ids::AtomId;

/// A covalent connection between two atoms, as declared by `CONECT` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId) -> Self {
        Self { atom1_id, atom2_id }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        (self.atom1_id == a && self.atom2_id == b) || (self.atom1_id == b && self.atom2_id == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_contains_both_endpoints() {
        let bond = Bond::new(dummy_atom_id(1), dummy_atom_id(2));
        assert!(bond.contains(dummy_atom_id(1)));
        assert!(bond.contains(dummy_atom_id(2)));
        assert!(!bond.contains(dummy_atom_id(3)));
    }

    #[test]
    fn connects_ignores_endpoint_order() {
        let bond = Bond::new(dummy_atom_id(1), dummy_atom_id(2));
        assert!(bond.connects(dummy_atom_id(2), dummy_atom_id(1)));
        assert!(!bond.connects(dummy_atom_id(1), dummy_atom_id(3)));
    }
}
