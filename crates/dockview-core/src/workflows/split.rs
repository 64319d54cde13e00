use crate::engine::Engine;
use crate::engine::config::SplitConfig;
use crate::engine::error::EngineError;
use crate::engine::handles::MoleculeHandle;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

pub const SPLIT_DONE_MESSAGE: &str = "Receptor and ligand have been split and displayed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub complex: MoleculeHandle,
    pub copy: MoleculeHandle,
    pub receptor: MoleculeHandle,
    pub ligand: MoleculeHandle,
    /// Atoms in the copy before it was divided.
    pub copy_atoms: usize,
    pub receptor_atoms: usize,
    pub ligand_atoms: usize,
}

/// Divides a loaded complex into receptor and ligand objects and displays them.
///
/// The complex itself is left untouched: a copy is made and both parts are
/// extracted from it, so the copy ends up empty. Ligand atoms are those with
/// the configured residue name, or those matching `ligand_selection` when it
/// is set. A predicate that matches nothing yields an empty ligand object
/// rather than an error.
#[instrument(skip_all, name = "split_workflow")]
pub fn split_and_display<E: Engine + ?Sized>(
    engine: &mut E,
    config: &SplitConfig,
    reporter: &ProgressReporter,
) -> Result<SplitOutcome, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Splitting Complex",
    });

    let complex = engine.molecule(&config.complex_name)?;
    let copy = engine.create(&config.copy_name, &complex.selection())?;
    let copy_atoms = engine.count_atoms(&copy.selection())?;

    let ligand_predicate = config.ligand_predicate();
    let receptor = engine.extract(
        &config.receptor_name,
        &copy.selection().and(!ligand_predicate.clone()),
    )?;
    let ligand = engine.extract(&config.ligand_name, &copy.selection().and(ligand_predicate))?;

    engine.show(config.receptor_representation, &receptor.selection())?;
    engine.show(config.ligand_representation, &ligand.selection())?;
    info!("{}", SPLIT_DONE_MESSAGE);
    reporter.message(SPLIT_DONE_MESSAGE);

    engine.zoom(&receptor.selection(), config.zoom_buffer)?;
    engine.bg_color(config.background)?;
    engine.color(config.receptor_color, &receptor.selection())?;
    engine.color(config.ligand_color, &ligand.selection())?;

    let receptor_atoms = engine.count_atoms(&receptor.selection())?;
    let ligand_atoms = engine.count_atoms(&ligand.selection())?;
    if ligand_atoms == 0 {
        warn!(
            "No atoms matching '{}' in '{}'; the ligand object is empty.",
            config.ligand_predicate(),
            config.complex_name
        );
    }
    info!(
        "Split '{}' into '{}' ({} atoms) and '{}' ({} atoms).",
        complex, receptor, receptor_atoms, ligand, ligand_atoms
    );

    reporter.report(Progress::PhaseFinish);
    Ok(SplitOutcome {
        complex,
        copy,
        receptor,
        ligand,
        copy_atoms,
        receptor_atoms,
        ligand_atoms,
    })
}
