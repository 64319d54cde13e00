use super::write_parts;
use crate::cli::SplitArgs;
use crate::config::PartialWorkflowConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dockview::engine::Engine;
use dockview::engine::progress::{Progress, ProgressReporter};
use dockview::engine::session::Session;
use dockview::workflows::split::split_and_display;
use tracing::{info, warn};

pub fn run(args: SplitArgs) -> Result<()> {
    let partial_config = PartialWorkflowConfig::load(args.workflow.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.workflow, None)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = Session::new();

    reporter.report(Progress::PhaseStart {
        name: "Loading Structure",
    });
    info!("Loading input structure from {:?}", &args.input);
    session.load(&args.input, &config.split.complex_name)?;
    reporter.report(Progress::PhaseFinish);

    let outcome = split_and_display(&mut session, &config.split, &reporter)?;
    if outcome.ligand_atoms == 0 {
        let predicate = config.split.ligand_predicate();
        warn!("No ligand atoms matched '{}'.", predicate);
        println!(
            "Warning: no atoms matched '{}'; the ligand file will be empty.",
            predicate
        );
    }

    let written = write_parts(&session, &outcome, &args.output)?;
    println!(
        "✓ Receptor '{}' ({} atoms) written to: {}",
        outcome.receptor.name(),
        outcome.receptor_atoms,
        written[0].display()
    );
    println!(
        "✓ Ligand '{}' ({} atoms) written to: {}",
        outcome.ligand.name(),
        outcome.ligand_atoms,
        written[1].display()
    );
    Ok(())
}
