use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use super::topology::Bond;
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

type ResidueKey = (ChainId, isize, Option<char>, String);

/// Represents a complete molecular system with atoms, residues, chains, and bonds.
///
/// Atoms, residues and chains live in slot maps so their IDs stay valid while
/// other components are removed. File order is kept separately through the
/// ordered chain list and each chain's and residue's member lists.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were first encountered.
    chain_order: Vec<ChainId>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Lookup map for finding residues by chain, number, insertion code and name.
    residue_key_map: HashMap<ResidueKey, ResidueId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in storage order.
    ///
    /// Storage order matches file order only for systems that never had atoms
    /// removed; use [`MolecularSystem::ordered_atom_ids`] when order matters.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns the chains in the order they were first added.
    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Returns the residue and chain an atom belongs to.
    pub fn atom_context(&self, atom_id: AtomId) -> Option<(&Atom, &Residue, &Chain)> {
        let atom = self.atoms.get(atom_id)?;
        let residue = self.residues.get(atom.residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some((atom, residue, chain))
    }

    /// Returns every atom ID in file order (chain, then residue, then atom).
    pub fn ordered_atom_ids(&self) -> Vec<AtomId> {
        self.chains()
            .flat_map(|(_, chain)| chain.residues.iter())
            .filter_map(|&residue_id| self.residues.get(residue_id))
            .flat_map(|residue| residue.atoms.iter().copied())
            .collect()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&chain_id) = self.chain_id_map.get(&id) {
            return chain_id;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// Residues are identified by chain, number, insertion code and name, so a
    /// ligand that reuses the number of a protein residue in the same chain
    /// still gets its own residue.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `number` - The residue sequence number.
    /// * `insertion_code` - The PDB insertion code, if any.
    /// * `name` - The name of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code, name.to_string());

        if let Some(&residue_id) = self.residue_key_map.get(&key) {
            return Some(residue_id);
        }

        let residue_id = self
            .residues
            .insert(Residue::new(number, insertion_code, name, chain_id));
        self.residue_key_map.insert(key, residue_id);
        chain.residues.push(residue_id);
        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten with `residue_id`.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(atom_id);
        Some(atom_id)
    }

    /// Adds a bond between two distinct atoms.
    ///
    /// Adding an existing bond succeeds without creating a duplicate.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (missing atoms or a self-bond).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }
        if !self.bonds.iter().any(|b| b.connects(atom1_id, atom2_id)) {
            self.bonds.push(Bond::new(atom1_id, atom2_id));
        }
        Some(())
    }

    /// Copies a set of atoms into another system.
    ///
    /// Enclosing chains and residues are recreated in `target` as needed and
    /// bonds whose both endpoints are copied come along. Atoms are copied in
    /// the order of `atom_ids`; unknown IDs are skipped.
    ///
    /// # Return
    ///
    /// A map from the IDs in `self` to the new IDs in `target`.
    pub fn copy_atoms_into(
        &self,
        atom_ids: &[AtomId],
        target: &mut MolecularSystem,
    ) -> HashMap<AtomId, AtomId> {
        let mut id_map = HashMap::with_capacity(atom_ids.len());

        for &atom_id in atom_ids {
            let Some((atom, residue, chain)) = self.atom_context(atom_id) else {
                continue;
            };
            let new_chain = target.add_chain(chain.id);
            let Some(new_residue) =
                target.add_residue(new_chain, residue.number, residue.insertion_code, &residue.name)
            else {
                continue;
            };
            if let Some(new_atom) = target.add_atom_to_residue(new_residue, atom.clone()) {
                id_map.insert(atom_id, new_atom);
            }
        }

        for bond in &self.bonds {
            if let (Some(&a1), Some(&a2)) = (id_map.get(&bond.atom1_id), id_map.get(&bond.atom2_id)) {
                target.add_bond(a1, a2);
            }
        }

        id_map
    }

    /// Builds a new system holding only the given atoms.
    pub fn subset(&self, atom_ids: &[AtomId]) -> (MolecularSystem, HashMap<AtomId, AtomId>) {
        let mut target = MolecularSystem::new();
        let id_map = self.copy_atoms_into(atom_ids, &mut target);
        (target, id_map)
    }

    /// Removes a set of atoms from the system.
    ///
    /// Bonds touching a removed atom are dropped, and residues or chains left
    /// without atoms are removed as well.
    ///
    /// # Return
    ///
    /// The number of atoms actually removed.
    pub fn remove_atoms(&mut self, atom_ids: &HashSet<AtomId>) -> usize {
        let mut removed = 0;
        let mut touched_residues = HashSet::new();

        for &atom_id in atom_ids {
            if let Some(atom) = self.atoms.remove(atom_id) {
                if let Some(residue) = self.residues.get_mut(atom.residue_id) {
                    residue.remove_atom(atom_id);
                }
                touched_residues.insert(atom.residue_id);
                removed += 1;
            }
        }

        self.bonds
            .retain(|bond| !atom_ids.contains(&bond.atom1_id) && !atom_ids.contains(&bond.atom2_id));

        for residue_id in touched_residues {
            let is_empty = self.residues.get(residue_id).is_some_and(Residue::is_empty);
            if is_empty {
                self.remove_empty_residue(residue_id);
            }
        }

        removed
    }

    fn remove_empty_residue(&mut self, residue_id: ResidueId) {
        let Some(residue) = self.residues.remove(residue_id) else {
            return;
        };
        self.residue_key_map.remove(&(
            residue.chain_id,
            residue.number,
            residue.insertion_code,
            residue.name.clone(),
        ));

        let chain_is_empty = match self.chains.get_mut(residue.chain_id) {
            Some(chain) => {
                chain.residues.retain(|&id| id != residue_id);
                chain.residues.is_empty()
            }
            None => false,
        };
        if chain_is_empty {
            if let Some(chain) = self.chains.remove(residue.chain_id) {
                self.chain_id_map.remove(&chain.id);
            }
            self.chain_order.retain(|&id| id != residue.chain_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use nalgebra::Point3;

    fn atom(name: &str, element: Element, serial: usize) -> Atom {
        Atom::new(name, element, ResidueId::default(), Point3::new(serial as f64, 0.0, 0.0))
            .with_serial(serial)
    }

    fn two_residue_system() -> (MolecularSystem, Vec<AtomId>) {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A');
        let gly = system.add_residue(chain, 1, None, "GLY").unwrap();
        let lig = system.add_residue(chain, 1, None, "UNL").unwrap();
        let ids = vec![
            system.add_atom_to_residue(gly, atom("N", Element::Nitrogen, 1)).unwrap(),
            system.add_atom_to_residue(gly, atom("CA", Element::Carbon, 2)).unwrap(),
            system.add_atom_to_residue(lig, atom("O1", Element::Oxygen, 3)).unwrap(),
            system.add_atom_to_residue(lig, atom("C1", Element::Carbon, 4)).unwrap(),
        ];
        system.add_bond(ids[0], ids[1]).unwrap();
        system.add_bond(ids[2], ids[3]).unwrap();
        (system, ids)
    }

    #[test]
    fn add_chain_is_idempotent() {
        let mut system = MolecularSystem::new();
        let a1 = system.add_chain('A');
        let a2 = system.add_chain('A');
        let b = system.add_chain('B');
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(system.chains().count(), 2);
        assert_eq!(system.find_chain_by_id('B'), Some(b));
    }

    #[test]
    fn residues_with_same_number_but_different_names_are_distinct() {
        let (system, _) = two_residue_system();
        assert_eq!(system.residue_count(), 2);
    }

    #[test]
    fn add_residue_fails_for_unknown_chain() {
        let mut system = MolecularSystem::new();
        assert!(system
            .add_residue(ChainId::default(), 1, None, "ALA")
            .is_none());
    }

    #[test]
    fn add_atom_sets_residue_id_and_preserves_order() {
        let (system, ids) = two_residue_system();
        assert_eq!(system.ordered_atom_ids(), ids);
        let (atom, residue, chain) = system.atom_context(ids[2]).unwrap();
        assert_eq!(atom.name, "O1");
        assert_eq!(residue.name, "UNL");
        assert_eq!(chain.id, 'A');
    }

    #[test]
    fn add_bond_rejects_self_bonds_and_deduplicates() {
        let (mut system, ids) = two_residue_system();
        assert!(system.add_bond(ids[0], ids[0]).is_none());
        assert!(system.add_bond(ids[1], ids[0]).is_some());
        assert_eq!(system.bonds().len(), 2);
    }

    #[test]
    fn subset_copies_atoms_residues_and_internal_bonds() {
        let (system, ids) = two_residue_system();
        let (subset, id_map) = system.subset(&[ids[1], ids[2], ids[3]]);

        assert_eq!(subset.atom_count(), 3);
        assert_eq!(subset.residue_count(), 2);
        assert_eq!(subset.bonds().len(), 1);
        let copied = subset.atom(id_map[&ids[2]]).unwrap();
        assert_eq!(copied.serial, 3);
        assert_eq!(system.atom_count(), 4);
    }

    #[test]
    fn remove_atoms_drops_bonds_and_empty_residues() {
        let (mut system, ids) = two_residue_system();
        let removed = system.remove_atoms(&HashSet::from([ids[2], ids[3]]));

        assert_eq!(removed, 2);
        assert_eq!(system.atom_count(), 2);
        assert_eq!(system.residue_count(), 1);
        assert_eq!(system.bonds().len(), 1);
        assert_eq!(system.ordered_atom_ids(), vec![ids[0], ids[1]]);
    }

    #[test]
    fn removing_every_atom_leaves_an_empty_system() {
        let (mut system, ids) = two_residue_system();
        system.remove_atoms(&ids.iter().copied().collect());
        assert!(system.is_empty());
        assert_eq!(system.chains().count(), 0);
        assert!(system.bonds().is_empty());
    }
}
