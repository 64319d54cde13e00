use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "DockView CLI - Split docked protein-ligand complexes into receptor and ligand and annotate their polar contacts and hydrogen bonds.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a complex, split it into receptor and ligand, and find polar contacts and hydrogen bonds.
    Analyze(AnalyzeArgs),
    /// Load a complex and write its receptor and ligand to separate files.
    Split(SplitArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the docked complex (.pdb, .ent or .pdbqt).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory for the receptor and ligand structures and one CSV per distance set.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Override the contact distance cutoff in Å.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    #[command(flatten)]
    pub workflow: WorkflowArgs,
}

/// Arguments for the `split` subcommand.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Path to the docked complex (.pdb, .ent or .pdbqt).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory for the receptor and ligand structures.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub workflow: WorkflowArgs,
}

/// Options shared by every workflow subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkflowArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Residue name identifying the ligand (e.g., UNL, LIG).
    #[arg(short = 'r', long, value_name = "RESN")]
    pub ligand_resn: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S contacts.cutoff=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
