use crate::core::models::element::Element;
use crate::core::selection::Selection;
use crate::engine::Engine;
use crate::engine::config::ContactConfig;
use crate::engine::error::EngineError;
use crate::engine::handles::DistanceSetHandle;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

pub const CONTACTS_START_MESSAGE: &str = "Starting to find polar contacts and hydrogen bonds...";
pub const POLAR_CONTACTS_DONE_MESSAGE: &str = "Polar contacts have been found.";
pub const HBONDS_DONE_MESSAGE: &str = "Hydrogen bonds have been found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactOutcome {
    pub polar_contacts: DistanceSetHandle,
    pub hydrogen_bonds: DistanceSetHandle,
}

/// Measures ligand–receptor contacts into two distance sets.
///
/// Polar contacts pair ligand N/O atoms with receptor N/O atoms. Candidate
/// hydrogen bonds are the ligand O to receptor N subset. Both use the same
/// cutoff and mode and look at distance only.
#[instrument(skip_all, name = "contacts_workflow")]
pub fn find_polar_contacts_and_hbonds<E: Engine + ?Sized>(
    engine: &mut E,
    config: &ContactConfig,
    reporter: &ProgressReporter,
) -> Result<ContactOutcome, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Finding Contacts",
    });
    info!("{}", CONTACTS_START_MESSAGE);
    reporter.message(CONTACTS_START_MESSAGE);

    let ligand = Selection::object(config.ligand_name.clone());
    let receptor = Selection::object(config.receptor_name.clone());
    let polar = || Selection::elem([Element::Nitrogen, Element::Oxygen]);

    let polar_contacts = engine.distance(
        &config.polar_contacts_name,
        &ligand.clone().and(polar()),
        &receptor.clone().and(polar()),
        config.cutoff,
        config.mode,
    )?;
    info!("{}", POLAR_CONTACTS_DONE_MESSAGE);
    reporter.message(POLAR_CONTACTS_DONE_MESSAGE);

    let hydrogen_bonds = engine.distance(
        &config.hbonds_name,
        &ligand.and(Selection::elem([Element::Oxygen])),
        &receptor.and(Selection::elem([Element::Nitrogen])),
        config.cutoff,
        config.mode,
    )?;
    info!("{}", HBONDS_DONE_MESSAGE);
    reporter.message(HBONDS_DONE_MESSAGE);

    reporter.report(Progress::PhaseFinish);
    Ok(ContactOutcome {
        polar_contacts,
        hydrogen_bonds,
    })
}
