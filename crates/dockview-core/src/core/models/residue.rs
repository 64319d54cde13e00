use super::ids::{AtomId, ChainId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                // Residue sequence number from source file
    pub insertion_code: Option<char>, // PDB insertion code, if any
    pub name: String,                 // Name of the residue (e.g., "ALA", "UNL")
    pub chain_id: ChainId,            // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,    // Atoms in file order
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub(crate) fn remove_atom(&mut self, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, Some('A'), "GLY", chain_id);
        assert_eq!(residue.number, 10);
        assert_eq!(residue.insertion_code, Some('A'));
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.is_empty());
    }

    #[test]
    fn add_atom_preserves_insertion_order() {
        let mut residue = Residue::new(1, None, "UNL", dummy_chain_id(2));
        residue.add_atom(dummy_atom_id(3));
        residue.add_atom(dummy_atom_id(1));
        assert_eq!(residue.atoms(), &[dummy_atom_id(3), dummy_atom_id(1)]);
    }

    #[test]
    fn remove_atom_does_nothing_if_atom_not_present() {
        let mut residue = Residue::new(9, None, "VAL", dummy_chain_id(5));
        residue.add_atom(dummy_atom_id(200));
        residue.remove_atom(dummy_atom_id(201));
        assert_eq!(residue.atoms(), &[dummy_atom_id(200)]);
        residue.remove_atom(dummy_atom_id(200));
        assert!(residue.is_empty());
    }
}
