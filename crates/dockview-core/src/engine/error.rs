use super::handles::ObjectKind;
use crate::core::io::pdb::PdbError;
use crate::core::selection::SelectionError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to access '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse structure file '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Unsupported structure format for '{path}' (expected .pdb, .ent or .pdbqt)", path = path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Object not found in session: '{name}'")]
    ObjectNotFound { name: String },

    #[error("Object '{name}' is a {actual}, expected a {expected}")]
    WrongObjectKind {
        name: String,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn from_structure_io(path: &Path, error: PdbError) -> Self {
        match error {
            PdbError::Io(source) => EngineError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => EngineError::Parse {
                path: path.to_path_buf(),
                source: other,
            },
        }
    }
}
