//! Shared structure fixtures for unit tests.
//!
//! A two-residue peptide (ALA 1, GLY 2) and a four-atom `UNL` ligand placed so
//! that exactly two polar contacts fall within 3.5 A: O1 to GLY N (3.0 A) and
//! N1 to GLY O (3.2 A). Only the first is an oxygen-to-nitrogen pair.

use std::fs;
use std::path::{Path, PathBuf};

pub const COMPLEX_PDB: &str = "\
REMARK   docked complex fixture
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N  
ATOM      2  CA  ALA A   1       1.500   0.000   0.000  1.00  0.00           C  
ATOM      3  C   ALA A   1       2.500   1.000   0.000  1.00  0.00           C  
ATOM      4  O   ALA A   1       2.500   2.200   0.000  1.00  0.00           O  
ATOM      5  N   GLY A   2       3.600   0.400   0.000  1.00  0.00           N  
ATOM      6  CA  GLY A   2       4.900   1.000   0.000  1.00  0.00           C  
ATOM      7  C   GLY A   2       6.000   0.000   0.000  1.00  0.00           C  
ATOM      8  O   GLY A   2       6.000  -1.200   0.000  1.00  0.00           O  
HETATM    9  O1  UNL A 100       3.600   0.400   3.000  1.00  0.00           O  
HETATM   10  N1  UNL A 100       6.000  -1.200   3.200  1.00  0.00           N  
HETATM   11  C1  UNL A 100       4.800  -0.400   3.100  1.00  0.00           C  
HETATM   12  O2  UNL A 100       0.000   0.000   8.000  1.00  0.00           O  
CONECT    9   11
CONECT   10   11
END
";

pub const COMPLEX_PDBQT: &str = "\
REMARK  Name = G007992
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00    -0.250 NA
ATOM      2  CA  ALA A   1       1.500   0.000   0.000  1.00  0.00    +0.100 C 
ATOM      3  C   ALA A   1       2.500   1.000   0.000  1.00  0.00    +0.100 C 
ATOM      4  O   ALA A   1       2.500   2.200   0.000  1.00  0.00    -0.250 OA
ATOM      5  N   GLY A   2       3.600   0.400   0.000  1.00  0.00    -0.250 NA
ATOM      6  CA  GLY A   2       4.900   1.000   0.000  1.00  0.00    +0.100 C 
ATOM      7  C   GLY A   2       6.000   0.000   0.000  1.00  0.00    +0.100 C 
ATOM      8  O   GLY A   2       6.000  -1.200   0.000  1.00  0.00    -0.250 OA
HETATM    9  O1  UNL A 100       3.600   0.400   3.000  1.00  0.00    -0.250 OA
HETATM   10  N1  UNL A 100       6.000  -1.200   3.200  1.00  0.00    -0.250 NA
HETATM   11  C1  UNL A 100       4.800  -0.400   3.100  1.00  0.00    +0.100 C 
HETATM   12  O2  UNL A 100       0.000   0.000   8.000  1.00  0.00    -0.250 OA
END
";

pub const RECEPTOR_ATOM_COUNT: usize = 8;
pub const LIGAND_ATOM_COUNT: usize = 4;

pub fn write_fixture(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}
