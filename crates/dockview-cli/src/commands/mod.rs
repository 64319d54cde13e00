pub mod analyze;
pub mod split;

use crate::error::Result;
use dockview::engine::Engine;
use dockview::workflows::split::SplitOutcome;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the receptor and ligand objects to `<name>.pdb` files in `dir`.
pub(crate) fn write_parts<E: Engine + ?Sized>(
    engine: &E,
    outcome: &SplitOutcome,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(2);
    for handle in [&outcome.receptor, &outcome.ligand] {
        let path = dir.join(format!("{}.pdb", handle.name()));
        let atoms = engine.save(&path, &handle.selection())?;
        info!("Wrote '{}' ({} atoms) to {:?}", handle.name(), atoms, &path);
        written.push(path);
    }
    Ok(written)
}
