use super::write_parts;
use crate::cli::AnalyzeArgs;
use crate::config::PartialWorkflowConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dockview::engine::Engine;
use dockview::engine::handles::DistanceSetHandle;
use dockview::engine::measure::DistanceSet;
use dockview::engine::progress::ProgressReporter;
use dockview::engine::session::Session;
use dockview::workflows::analyze::{self, AnalysisReport};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let partial_config = PartialWorkflowConfig::load(args.workflow.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.workflow, args.cutoff)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = Session::new();

    println!("Analyzing {}...", args.input.display());
    info!("Invoking the core analysis workflow...");
    let report = analyze::run(&mut session, &args.input, &config, &reporter)?;

    for line in summary_lines(&session, &report)? {
        println!("{}", line);
    }

    if let Some(dir) = &args.output {
        for path in write_parts(&session, &report.split, dir)? {
            println!("✓ Structure written to: {}", path.display());
        }
        for handle in [&report.contacts.polar_contacts, &report.contacts.hydrogen_bonds] {
            let path = export_csv(&session, handle, dir)?;
            println!("✓ Distances written to: {}", path.display());
        }
    }
    Ok(())
}

fn export_csv(session: &Session, handle: &DistanceSetHandle, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", handle.name()));
    let set = session.distance_set(handle)?;
    let file = File::create(&path)?;
    set.write_csv(BufWriter::new(file))
        .map_err(|e| CliError::Export {
            path: path.clone(),
            source: e.into(),
        })?;
    info!("Exported {} pair(s) of '{}' to {:?}", set.len(), set.name, &path);
    Ok(path)
}

fn distance_lines(title: &str, set: &DistanceSet) -> Vec<String> {
    let header = match set.shortest() {
        Some(nearest) => format!(
            "{} '{}': {} (shortest {:.2} Å)",
            title,
            set.name,
            set.len(),
            nearest.distance
        ),
        None => format!("{} '{}': none", title, set.name),
    };
    let mut lines = vec![header];
    lines.extend(set.pairs.iter().map(|pair| {
        format!(
            "  {} -- {}  {:.2} Å",
            pair.first, pair.second, pair.distance
        )
    }));
    lines
}

fn summary_lines(session: &Session, report: &AnalysisReport) -> Result<Vec<String>> {
    let split = &report.split;
    let mut lines = vec![
        format!(
            "Receptor '{}': {} atoms",
            split.receptor.name(),
            split.receptor_atoms
        ),
        format!("Ligand '{}': {} atoms", split.ligand.name(), split.ligand_atoms),
    ];
    lines.extend(distance_lines(
        "Polar contacts",
        session.distance_set(&report.contacts.polar_contacts)?,
    ));
    lines.extend(distance_lines(
        "Hydrogen bonds",
        session.distance_set(&report.contacts.hydrogen_bonds)?,
    ));
    Ok(lines)
}
