use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead, Write};
use thiserror::Error;

// Coordinates end at column 54; anything shorter cannot be an atom record.
const MIN_ATOM_RECORD_LEN: usize = 54;
const CONECT_PARTNERS_PER_LINE: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Records preceding the first atom (HEADER, TITLE, REMARK, ...), verbatim.
    pub header_lines: Vec<String>,
    /// Number of `MODEL` blocks after the first one that were not read.
    pub skipped_models: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Pdb,
    Pdbqt,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| *c != ' ')
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn resolve_element(
    element_column: &str,
    autodock_type: Option<&str>,
    name_field: &str,
) -> Element {
    if let Some(element) = Element::from_symbol(element_column) {
        return element;
    }
    if let Some(element) = autodock_type.and_then(Element::from_autodock_type) {
        return element;
    }
    let trimmed = name_field.trim();
    let left_aligned = !name_field.starts_with(' ') && trimmed.len() < 4;
    Element::from_atom_name(trimmed, left_aligned)
}

struct RecordReader {
    flavor: Flavor,
    builder: MolecularSystem,
    metadata: PdbMetadata,
    serial_map: HashMap<usize, AtomId>,
    conect: Vec<(usize, usize)>,
    seen_atoms: bool,
    first_model_done: bool,
}

impl RecordReader {
    fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            builder: MolecularSystem::new(),
            metadata: PdbMetadata::default(),
            serial_map: HashMap::new(),
            conect: Vec::new(),
            seen_atoms: false,
            first_model_done: false,
        }
    }

    fn read(mut self, reader: &mut impl BufRead) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if !self.first_model_done {
                        self.read_atom(&line, line_num)?;
                    }
                }
                "MODEL" => {
                    if self.first_model_done || self.seen_atoms {
                        self.metadata.skipped_models += 1;
                    }
                }
                "ENDMDL" => self.first_model_done = true,
                "CONECT" => self.read_conect(&line),
                "END" => break,
                "TER" | "ROOT" | "ENDROOT" | "BRANCH" | "ENDBRANCH" | "TORSDOF" | "MASTER" => {}
                "" if line.trim().is_empty() => {}
                _ => {
                    if !self.seen_atoms {
                        self.metadata.header_lines.push(line.clone());
                    }
                }
            }
        }

        if self.serial_map.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        self.conect.sort_unstable();
        self.conect.dedup();
        for (a1, a2) in std::mem::take(&mut self.conect) {
            // CONECT records may point at atoms from skipped models.
            if let (Some(&id1), Some(&id2)) = (self.serial_map.get(&a1), self.serial_map.get(&a2)) {
                self.builder.add_bond(id1, id2);
            }
        }

        Ok((self.builder, self.metadata))
    }

    fn read_atom(&mut self, line: &str, line_num: usize) -> Result<(), PdbError> {
        if line.len() < MIN_ATOM_RECORD_LEN {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let record_type = slice_and_trim(line, 0, 6);
        let serial: usize = parse_int(line, line_num, 6, 11)?;
        if self.serial_map.contains_key(&serial) {
            return Err(PdbError::Inconsistency(format!(
                "Duplicate atom serial: {}",
                serial
            )));
        }

        let name_field = line.get(12..16).unwrap_or("");
        let name = name_field.trim();
        let alt_loc = column_char(line, 16);
        let res_name = slice_and_trim(line, 17, 21);
        let chain_id = column_char(line, 21).unwrap_or(' ');
        let res_number: isize = parse_int(line, line_num, 22, 26)?;
        let insertion_code = column_char(line, 26);
        let x = parse_float(line, line_num, 30, 38)?;
        let y = parse_float(line, line_num, 38, 46)?;
        let z = parse_float(line, line_num, 46, 54)?;
        let occupancy = slice_and_trim(line, 54, 60).parse().unwrap_or(1.0);
        let b_factor = slice_and_trim(line, 60, 66).parse().unwrap_or(0.0);

        let (partial_charge, autodock_type, element_column) = match self.flavor {
            Flavor::Pdb => (None, None, slice_and_trim(line, 76, 78)),
            Flavor::Pdbqt => {
                let charge = slice_and_trim(line, 70, 76).parse::<f64>().ok();
                let ad_type = Some(slice_and_trim(line, 77, 79))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                (charge, ad_type, "")
            }
        };
        let element = resolve_element(element_column, autodock_type.as_deref(), name_field);

        let chain = self.builder.add_chain(chain_id);
        let residue_id = self
            .builder
            .add_residue(chain, res_number, insertion_code, res_name)
            .ok_or_else(|| PdbError::Inconsistency(format!("Chain '{}' vanished", chain_id)))?;

        let mut atom = Atom::new(name, element, ResidueId::default(), Point3::new(x, y, z))
            .with_serial(serial)
            .hetero(record_type == "HETATM");
        atom.alt_loc = alt_loc;
        atom.occupancy = occupancy;
        atom.b_factor = b_factor;
        atom.partial_charge = partial_charge;
        atom.autodock_type = autodock_type;

        let atom_id = self
            .builder
            .add_atom_to_residue(residue_id, atom)
            .ok_or_else(|| PdbError::Inconsistency(format!("Residue for atom {} vanished", serial)))?;
        self.serial_map.insert(serial, atom_id);
        self.seen_atoms = true;
        Ok(())
    }

    fn read_conect(&mut self, line: &str) {
        let serials: Vec<usize> = line
            .get(6..)
            .unwrap_or("")
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if let Some((&origin, partners)) = serials.split_first() {
            for &partner in partners {
                if partner != origin {
                    self.conect.push((origin.min(partner), origin.max(partner)));
                }
            }
        }
    }
}

fn format_atom_name(name: &str, element: Element) -> String {
    if name.len() >= 4 || element.symbol().len() == 2 {
        format!("{:<4}", name)
    } else {
        format!(" {:<3}", name)
    }
}

fn format_residue_name(name: &str) -> String {
    if name.len() <= 3 {
        format!("{:>3} ", name)
    } else {
        format!("{:<4}", name)
    }
}

fn default_autodock_type(element: Element) -> &'static str {
    match element {
        Element::Unknown => "X",
        other => other.symbol(),
    }
}

fn write_records(
    system: &MolecularSystem,
    metadata: &PdbMetadata,
    writer: &mut impl Write,
    flavor: Flavor,
) -> Result<(), PdbError> {
    for line in &metadata.header_lines {
        writeln!(writer, "{}", line)?;
    }

    let ordered = system.ordered_atom_ids();
    for &atom_id in &ordered {
        let (atom, residue, chain) = system.atom_context(atom_id).ok_or_else(|| {
            PdbError::Inconsistency(format!("Atom {:?} has no residue or chain", atom_id))
        })?;

        let record_type = if atom.is_hetero { "HETATM" } else { "ATOM" };
        let line = format!(
            "{:<6}{:>5} {}{}{}{}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}",
            record_type,
            atom.serial % 100_000,
            format_atom_name(&atom.name, atom.element),
            atom.alt_loc.unwrap_or(' '),
            format_residue_name(&residue.name),
            chain.id,
            residue.number,
            residue.insertion_code.unwrap_or(' '),
            atom.position.x,
            atom.position.y,
            atom.position.z,
            atom.occupancy,
            atom.b_factor,
        );

        match flavor {
            Flavor::Pdb => {
                let element = match atom.element {
                    Element::Unknown => String::new(),
                    e => e.symbol().to_ascii_uppercase(),
                };
                writeln!(writer, "{}          {:>2}  ", line, element)?;
            }
            Flavor::Pdbqt => {
                let ad_type = atom
                    .autodock_type
                    .as_deref()
                    .unwrap_or_else(|| default_autodock_type(atom.element));
                writeln!(
                    writer,
                    "{}    {:>+6.3} {:<2}",
                    line,
                    atom.partial_charge.unwrap_or(0.0),
                    ad_type
                )?;
            }
        }
    }

    let mut partners: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for bond in system.bonds() {
        let (Some(a1), Some(a2)) = (system.atom(bond.atom1_id), system.atom(bond.atom2_id)) else {
            return Err(PdbError::Inconsistency("Bond references a missing atom".into()));
        };
        partners.entry(a1.serial).or_default().push(a2.serial);
        partners.entry(a2.serial).or_default().push(a1.serial);
    }
    for (serial, bonded) in &mut partners {
        bonded.sort_unstable();
        for chunk in bonded.chunks(CONECT_PARTNERS_PER_LINE) {
            write!(writer, "CONECT{:>5}", serial)?;
            for partner in chunk {
                write!(writer, "{:>5}", partner)?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer, "END")?;
    Ok(())
}

fn generated_metadata() -> PdbMetadata {
    PdbMetadata {
        header_lines: vec!["REMARK   Generated by dockview".to_string()],
        ..Default::default()
    }
}

/// Protein Data Bank format.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        RecordReader::new(Flavor::Pdb).read(reader)
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        write_records(system, metadata, writer, Flavor::Pdb)
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_to(system, &generated_metadata(), writer)
    }
}

/// AutoDock PDBQT format: PDB columns plus partial charge and AutoDock atom type.
pub struct PdbqtFile;

impl MolecularFile for PdbqtFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        RecordReader::new(Flavor::Pdbqt).read(reader)
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        write_records(system, metadata, writer, Flavor::Pdbqt)
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_to(system, &generated_metadata(), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{COMPLEX_PDB, COMPLEX_PDBQT};
    use std::io::Cursor;

    fn read_pdb(content: &str) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        PdbFile::read_from(&mut Cursor::new(content))
    }

    fn atoms_by_name(system: &MolecularSystem) -> HashMap<String, Atom> {
        system
            .atoms_iter()
            .map(|(_, atom)| (atom.name.clone(), atom.clone()))
            .collect()
    }

    #[test]
    fn reads_atoms_residues_and_header() {
        let (system, metadata) = read_pdb(COMPLEX_PDB).unwrap();

        assert_eq!(system.atom_count(), 12);
        assert_eq!(system.residue_count(), 3);
        assert_eq!(system.chains().count(), 1);
        assert_eq!(metadata.header_lines, vec!["REMARK   docked complex fixture"]);
        assert_eq!(metadata.skipped_models, 0);
    }

    #[test]
    fn parses_fixed_columns_of_atom_records() {
        let (system, _) = read_pdb(COMPLEX_PDB).unwrap();
        let first = system.ordered_atom_ids()[0];
        let (atom, residue, chain) = system.atom_context(first).unwrap();

        assert_eq!(atom.serial, 1);
        assert_eq!(atom.name, "N");
        assert_eq!(atom.element, Element::Nitrogen);
        assert!(!atom.is_hetero);
        assert_eq!(residue.name, "ALA");
        assert_eq!(residue.number, 1);
        assert_eq!(chain.id, 'A');

        let atoms = atoms_by_name(&system);
        let n1 = &atoms["N1"];
        assert!(n1.is_hetero);
        assert_eq!(n1.position, Point3::new(6.0, -1.2, 3.2));
        assert!(n1.partial_charge.is_none());
    }

    #[test]
    fn reads_pdbqt_charges_and_autodock_types() {
        let (system, _) = PdbqtFile::read_from(&mut Cursor::new(COMPLEX_PDBQT)).unwrap();
        let atoms = atoms_by_name(&system);

        let o1 = &atoms["O1"];
        assert_eq!(o1.autodock_type.as_deref(), Some("OA"));
        assert_eq!(o1.element, Element::Oxygen);
        assert_eq!(o1.partial_charge, Some(-0.25));
        assert_eq!(atoms["N1"].element, Element::Nitrogen);
        assert_eq!(atoms["C1"].element, Element::Carbon);
    }

    #[test]
    fn infers_element_from_atom_name_when_column_is_blank() {
        let content = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000
HETATM    2 CA    CA A 201       5.000   0.000   0.000
";
        let (system, _) = read_pdb(content).unwrap();
        let atoms = atoms_by_name(&system);
        assert_eq!(atoms["N"].element, Element::Nitrogen);
        assert_eq!(atoms["CA"].element, Element::Calcium);
    }

    #[test]
    fn only_first_model_is_read() {
        let content = "\
MODEL        1
HETATM    1  O1  UNL A   1       0.000   0.000   0.000  1.00  0.00           O
ENDMDL
MODEL        2
HETATM    2  O1  UNL A   1       9.000   0.000   0.000  1.00  0.00           O
ENDMDL
";
        let (system, metadata) = read_pdb(content).unwrap();
        assert_eq!(system.atom_count(), 1);
        assert_eq!(metadata.skipped_models, 1);
    }

    #[test]
    fn conect_records_become_bonds() {
        let (system, _) = read_pdb(COMPLEX_PDB).unwrap();
        assert_eq!(system.bonds().len(), 2);
    }

    #[test]
    fn short_atom_line_is_a_parse_error() {
        let content = "ATOM      1  N   ALA A   1       0.000   0.000\n";
        let result = read_pdb(content);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            })
        ));
    }

    #[test]
    fn invalid_coordinate_reports_columns() {
        let content = "ATOM      1  N   ALA A   1       0.000   abc     0.000\n";
        match read_pdb(content) {
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::InvalidFloat { columns, value },
                ..
            }) => {
                assert_eq!(columns, "39-46");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn duplicate_serial_is_inconsistent() {
        let content = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000
ATOM      1  CA  ALA A   1       1.500   0.000   0.000
";
        assert!(matches!(read_pdb(content), Err(PdbError::Inconsistency(_))));
    }

    #[test]
    fn file_without_atoms_is_rejected() {
        let result = read_pdb("REMARK nothing here\nEND\n");
        assert!(matches!(result, Err(PdbError::MissingRecord(_))));
    }

    #[test]
    fn written_pdb_reads_back_with_same_atoms_and_bonds() {
        let (system, metadata) = read_pdb(COMPLEX_PDB).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_to(&system, &metadata, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("HETATM    9  O1  UNL A 100       3.600   0.400   3.000  1.00  0.00           O  "));
        assert!(text.ends_with("END\n"));

        let (reread, _) = read_pdb(&text).unwrap();
        assert_eq!(reread.atom_count(), system.atom_count());
        assert_eq!(reread.bonds().len(), system.bonds().len());
    }

    #[test]
    fn written_pdbqt_keeps_charge_and_type_columns() {
        let (system, _) = PdbqtFile::read_from(&mut Cursor::new(COMPLEX_PDBQT)).unwrap();
        let mut buffer = Vec::new();
        PdbqtFile::write_system_to(&system, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("REMARK   Generated by dockview\n"));
        assert!(text.contains("HETATM    9  O1  UNL A 100       3.600   0.400   3.000  1.00  0.00    -0.250 OA"));
    }
}
