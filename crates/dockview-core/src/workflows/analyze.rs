use super::contacts::{ContactOutcome, find_polar_contacts_and_hbonds};
use super::split::{SplitOutcome, split_and_display};
use crate::engine::Engine;
use crate::engine::config::WorkflowConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub split: SplitOutcome,
    pub contacts: ContactOutcome,
}

/// Loads a complex, splits it into receptor and ligand, and measures their contacts.
#[instrument(skip_all, name = "analyze_workflow")]
pub fn run<E: Engine + ?Sized>(
    engine: &mut E,
    input: &Path,
    config: &WorkflowConfig,
    reporter: &ProgressReporter,
) -> Result<AnalysisReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Structure",
    });
    info!("Loading complex from '{}'.", input.display());
    engine.load(input, &config.split.complex_name)?;
    reporter.report(Progress::PhaseFinish);

    let split = split_and_display(engine, &config.split, reporter)?;
    let contacts = find_polar_contacts_and_hbonds(engine, &config.contacts, reporter)?;

    info!(
        "Analysis complete: {} polar contact(s), {} hydrogen bond(s).",
        contacts.polar_contacts.pair_count(),
        contacts.hydrogen_bonds.pair_count()
    );
    Ok(AnalysisReport { split, contacts })
}
