use crate::cli::WorkflowArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use dockview::core::selection::Selection;
use dockview::engine::config::{WorkflowConfig, WorkflowConfigBuilder};
use dockview::engine::measure::DistanceMode;
use dockview::engine::style::{Color, Representation};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialObjectNames {
    complex: Option<String>,
    copy: Option<String>,
    receptor: Option<String>,
    ligand: Option<String>,
    #[serde(rename = "polar-contacts")]
    polar_contacts: Option<String>,
    #[serde(rename = "hydrogen-bonds")]
    hydrogen_bonds: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSplitConfig {
    #[serde(rename = "ligand-resn")]
    ligand_resn: Option<String>,
    #[serde(rename = "ligand-selection")]
    ligand_selection: Option<String>,
    #[serde(rename = "receptor-representation")]
    receptor_representation: Option<String>,
    #[serde(rename = "ligand-representation")]
    ligand_representation: Option<String>,
    #[serde(rename = "receptor-color")]
    receptor_color: Option<String>,
    #[serde(rename = "ligand-color")]
    ligand_color: Option<String>,
    background: Option<String>,
    #[serde(rename = "zoom-buffer")]
    zoom_buffer: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialContactConfig {
    cutoff: Option<f64>,
    mode: Option<String>,
}

/// Workflow settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialWorkflowConfig {
    objects: Option<PartialObjectNames>,
    split: Option<PartialSplitConfig>,
    contacts: Option<PartialContactConfig>,
}

fn parse_named<T: std::str::FromStr>(key: &str, value: &str, expected: &'static str) -> Result<T> {
    parser::parse_setting(key, value, expected).map_err(|e| CliError::Config(e.to_string()))
}

impl PartialWorkflowConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file named by `--config`, or starts empty.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layers `-S` overrides and dedicated flags over the file values and
    /// fills the rest with built-in defaults.
    pub fn merge_with_cli(
        mut self,
        args: &WorkflowArgs,
        cutoff: Option<f64>,
    ) -> Result<WorkflowConfig> {
        self.apply_set_values(&args.set_values)?;

        let objects = self.objects.take().unwrap_or_default();
        let split = self.split.take().unwrap_or_default();
        let contacts = self.contacts.take().unwrap_or_default();

        let mut builder = WorkflowConfigBuilder::new();

        if let Some(name) = objects.complex {
            builder = builder.complex_name(name);
        }
        if let Some(name) = objects.copy {
            builder = builder.copy_name(name);
        }
        if let Some(name) = objects.receptor {
            builder = builder.receptor_name(name);
        }
        if let Some(name) = objects.ligand {
            builder = builder.ligand_name(name);
        }
        if let Some(name) = objects.polar_contacts {
            builder = builder.polar_contacts_name(name);
        }
        if let Some(name) = objects.hydrogen_bonds {
            builder = builder.hbonds_name(name);
        }

        if let Some(resn) = args.ligand_resn.clone().or(split.ligand_resn) {
            builder = builder.ligand_residue_name(resn);
        }
        if let Some(text) = split.ligand_selection {
            let selection: Selection = text.parse().map_err(|e| {
                CliError::Config(format!("Invalid selection for split.ligand-selection: {}", e))
            })?;
            builder = builder.ligand_selection(selection);
        }
        if let Some(rep) = split.receptor_representation {
            builder = builder.receptor_representation(parse_named::<Representation>(
                "split.receptor-representation",
                &rep,
                "representation",
            )?);
        }
        if let Some(rep) = split.ligand_representation {
            builder = builder.ligand_representation(parse_named::<Representation>(
                "split.ligand-representation",
                &rep,
                "representation",
            )?);
        }
        if let Some(color) = split.receptor_color {
            builder = builder.receptor_color(parse_named::<Color>(
                "split.receptor-color",
                &color,
                "color",
            )?);
        }
        if let Some(color) = split.ligand_color {
            builder =
                builder.ligand_color(parse_named::<Color>("split.ligand-color", &color, "color")?);
        }
        if let Some(color) = split.background {
            builder =
                builder.background(parse_named::<Color>("split.background", &color, "color")?);
        }
        if let Some(buffer) = split.zoom_buffer {
            builder = builder.zoom_buffer(buffer);
        }

        if let Some(cutoff) = cutoff.or(contacts.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if let Some(mode) = contacts.mode {
            builder = builder.mode(parse_named::<DistanceMode>("contacts.mode", &mode, "mode")?);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) =
                parser::split_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
            let text = || Some(value.to_string());
            let float = || -> Result<Option<f64>> {
                parser::parse_setting(key, value, "float")
                    .map(Some)
                    .map_err(|e: ParseError| CliError::Config(e.to_string()))
            };

            match key {
                "objects.complex" => self.objects.get_or_insert_with(Default::default).complex = text(),
                "objects.copy" => self.objects.get_or_insert_with(Default::default).copy = text(),
                "objects.receptor" => self.objects.get_or_insert_with(Default::default).receptor = text(),
                "objects.ligand" => self.objects.get_or_insert_with(Default::default).ligand = text(),
                "objects.polar-contacts" => {
                    self.objects.get_or_insert_with(Default::default).polar_contacts = text()
                }
                "objects.hydrogen-bonds" => {
                    self.objects.get_or_insert_with(Default::default).hydrogen_bonds = text()
                }
                "split.ligand-resn" => self.split.get_or_insert_with(Default::default).ligand_resn = text(),
                "split.ligand-selection" => {
                    self.split.get_or_insert_with(Default::default).ligand_selection = text()
                }
                "split.receptor-representation" => {
                    self.split.get_or_insert_with(Default::default).receptor_representation = text()
                }
                "split.ligand-representation" => {
                    self.split.get_or_insert_with(Default::default).ligand_representation = text()
                }
                "split.receptor-color" => {
                    self.split.get_or_insert_with(Default::default).receptor_color = text()
                }
                "split.ligand-color" => self.split.get_or_insert_with(Default::default).ligand_color = text(),
                "split.background" => self.split.get_or_insert_with(Default::default).background = text(),
                "split.zoom-buffer" => {
                    self.split.get_or_insert_with(Default::default).zoom_buffer = float()?
                }
                "contacts.cutoff" => {
                    self.contacts.get_or_insert_with(Default::default).cutoff = float()?
                }
                "contacts.mode" => {
                    self.contacts.get_or_insert_with(Default::default).mode = text()
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
