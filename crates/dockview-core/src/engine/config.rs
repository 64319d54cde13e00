use super::measure::DistanceMode;
use crate::core::selection::Selection;
use super::style::{Color, Representation};
use thiserror::Error;

pub const DEFAULT_COMPLEX_NAME: &str = "my_complex";
pub const DEFAULT_COPY_NAME: &str = "complex_copy";
pub const DEFAULT_RECEPTOR_NAME: &str = "Protein";
pub const DEFAULT_LIGAND_NAME: &str = "ligand";
pub const DEFAULT_LIGAND_RESIDUE_NAME: &str = "UNL";
pub const DEFAULT_CONTACT_CUTOFF: f64 = 3.5;
pub const DEFAULT_POLAR_CONTACTS_NAME: &str = "ligand_polar_contacts";
pub const DEFAULT_HBONDS_NAME: &str = "hydrogen_bonds";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{0}' must not be empty")]
    EmptyName(&'static str),
    #[error("Cutoff must be a positive, finite distance in Å (got {0})")]
    InvalidCutoff(f64),
    #[error("Zoom buffer must be finite and not negative (got {0})")]
    InvalidZoomBuffer(f64),
    #[error("Parameters '{first}' and '{second}' both name the object '{name}'")]
    NameClash {
        first: &'static str,
        second: &'static str,
        name: String,
    },
    #[error("Ligand selection '{0}' must not refer to objects by name")]
    LigandSelectionNamesObject(String),
}

/// How a loaded complex is divided and displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    pub complex_name: String,
    pub copy_name: String,
    pub receptor_name: String,
    pub ligand_name: String,
    /// Residue name identifying ligand atoms.
    pub ligand_residue_name: String,
    /// Replaces the residue-name predicate when set, e.g. `resn UNL+LIG or hetatm`.
    pub ligand_selection: Option<Selection>,
    pub receptor_representation: Representation,
    pub ligand_representation: Representation,
    pub receptor_color: Color,
    pub ligand_color: Color,
    pub background: Color,
    pub zoom_buffer: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            complex_name: DEFAULT_COMPLEX_NAME.to_string(),
            copy_name: DEFAULT_COPY_NAME.to_string(),
            receptor_name: DEFAULT_RECEPTOR_NAME.to_string(),
            ligand_name: DEFAULT_LIGAND_NAME.to_string(),
            ligand_residue_name: DEFAULT_LIGAND_RESIDUE_NAME.to_string(),
            ligand_selection: None,
            receptor_representation: Representation::Cartoon,
            ligand_representation: Representation::Sticks,
            receptor_color: Color::CYAN,
            ligand_color: Color::ORANGE,
            background: Color::WHITE,
            zoom_buffer: 0.0,
        }
    }
}

impl SplitConfig {
    /// Atom predicate that picks the ligand out of the complex.
    pub fn ligand_predicate(&self) -> Selection {
        match &self.ligand_selection {
            Some(selection) => selection.clone(),
            None => Selection::resn(self.ligand_residue_name.clone()),
        }
    }
}

/// Which objects are searched for contacts and where the results go.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    pub ligand_name: String,
    pub receptor_name: String,
    pub cutoff: f64,
    pub polar_contacts_name: String,
    pub hbonds_name: String,
    pub mode: DistanceMode,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            ligand_name: DEFAULT_LIGAND_NAME.to_string(),
            receptor_name: DEFAULT_RECEPTOR_NAME.to_string(),
            cutoff: DEFAULT_CONTACT_CUTOFF,
            polar_contacts_name: DEFAULT_POLAR_CONTACTS_NAME.to_string(),
            hbonds_name: DEFAULT_HBONDS_NAME.to_string(),
            mode: DistanceMode::Polar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowConfig {
    pub split: SplitConfig,
    pub contacts: ContactConfig,
}

#[derive(Default)]
pub struct WorkflowConfigBuilder {
    complex_name: Option<String>,
    copy_name: Option<String>,
    receptor_name: Option<String>,
    ligand_name: Option<String>,
    ligand_residue_name: Option<String>,
    ligand_selection: Option<Selection>,
    receptor_representation: Option<Representation>,
    ligand_representation: Option<Representation>,
    receptor_color: Option<Color>,
    ligand_color: Option<Color>,
    background: Option<Color>,
    zoom_buffer: Option<f64>,
    cutoff: Option<f64>,
    polar_contacts_name: Option<String>,
    hbonds_name: Option<String>,
    mode: Option<DistanceMode>,
}

impl WorkflowConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complex_name(mut self, name: impl Into<String>) -> Self {
        self.complex_name = Some(name.into());
        self
    }
    pub fn copy_name(mut self, name: impl Into<String>) -> Self {
        self.copy_name = Some(name.into());
        self
    }
    pub fn receptor_name(mut self, name: impl Into<String>) -> Self {
        self.receptor_name = Some(name.into());
        self
    }
    pub fn ligand_name(mut self, name: impl Into<String>) -> Self {
        self.ligand_name = Some(name.into());
        self
    }
    pub fn ligand_residue_name(mut self, name: impl Into<String>) -> Self {
        self.ligand_residue_name = Some(name.into());
        self
    }
    pub fn ligand_selection(mut self, selection: Selection) -> Self {
        self.ligand_selection = Some(selection);
        self
    }
    pub fn receptor_representation(mut self, rep: Representation) -> Self {
        self.receptor_representation = Some(rep);
        self
    }
    pub fn ligand_representation(mut self, rep: Representation) -> Self {
        self.ligand_representation = Some(rep);
        self
    }
    pub fn receptor_color(mut self, color: Color) -> Self {
        self.receptor_color = Some(color);
        self
    }
    pub fn ligand_color(mut self, color: Color) -> Self {
        self.ligand_color = Some(color);
        self
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    pub fn zoom_buffer(mut self, buffer: f64) -> Self {
        self.zoom_buffer = Some(buffer);
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn polar_contacts_name(mut self, name: impl Into<String>) -> Self {
        self.polar_contacts_name = Some(name.into());
        self
    }
    pub fn hbonds_name(mut self, name: impl Into<String>) -> Self {
        self.hbonds_name = Some(name.into());
        self
    }
    pub fn mode(mut self, mode: DistanceMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Fills unset parameters with defaults and validates the result.
    ///
    /// The receptor and ligand names are shared by the split and contact
    /// stages, so the contact search always looks at the objects the split
    /// produced.
    pub fn build(self) -> Result<WorkflowConfig, ConfigError> {
        let defaults = SplitConfig::default();
        let receptor_name = self.receptor_name.unwrap_or(defaults.receptor_name);
        let ligand_name = self.ligand_name.unwrap_or(defaults.ligand_name);

        let split = SplitConfig {
            complex_name: self.complex_name.unwrap_or(defaults.complex_name),
            copy_name: self.copy_name.unwrap_or(defaults.copy_name),
            receptor_name: receptor_name.clone(),
            ligand_name: ligand_name.clone(),
            ligand_residue_name: self
                .ligand_residue_name
                .unwrap_or(defaults.ligand_residue_name),
            ligand_selection: self.ligand_selection,
            receptor_representation: self
                .receptor_representation
                .unwrap_or(defaults.receptor_representation),
            ligand_representation: self
                .ligand_representation
                .unwrap_or(defaults.ligand_representation),
            receptor_color: self.receptor_color.unwrap_or(defaults.receptor_color),
            ligand_color: self.ligand_color.unwrap_or(defaults.ligand_color),
            background: self.background.unwrap_or(defaults.background),
            zoom_buffer: self.zoom_buffer.unwrap_or(defaults.zoom_buffer),
        };

        let contact_defaults = ContactConfig::default();
        let contacts = ContactConfig {
            ligand_name,
            receptor_name,
            cutoff: self.cutoff.unwrap_or(contact_defaults.cutoff),
            polar_contacts_name: self
                .polar_contacts_name
                .unwrap_or(contact_defaults.polar_contacts_name),
            hbonds_name: self.hbonds_name.unwrap_or(contact_defaults.hbonds_name),
            mode: self.mode.unwrap_or(contact_defaults.mode),
        };

        let config = WorkflowConfig { split, contacts };
        config.validate()?;
        Ok(config)
    }
}

impl WorkflowConfig {
    /// Session objects the workflow creates or reads, by parameter name.
    fn object_names(&self) -> [(&'static str, &str); 6] {
        [
            ("complex_name", self.split.complex_name.as_str()),
            ("copy_name", self.split.copy_name.as_str()),
            ("receptor_name", self.split.receptor_name.as_str()),
            ("ligand_name", self.split.ligand_name.as_str()),
            ("polar_contacts_name", self.contacts.polar_contacts_name.as_str()),
            ("hbonds_name", self.contacts.hbonds_name.as_str()),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let objects = self.object_names();
        let residue = ("ligand_residue_name", self.split.ligand_residue_name.as_str());
        if let Some((param, _)) = objects
            .iter()
            .chain(std::iter::once(&residue))
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(ConfigError::EmptyName(*param));
        }

        // Object names are pairwise distinct.
        for (i, (first, name)) in objects.iter().enumerate() {
            if let Some((second, _)) = objects[i + 1..].iter().find(|(_, other)| other == name) {
                return Err(ConfigError::NameClash {
                    first: *first,
                    second: *second,
                    name: name.to_string(),
                });
            }
        }

        if let Some(selection) = self
            .split
            .ligand_selection
            .as_ref()
            .filter(|selection| !selection.object_names().is_empty())
        {
            return Err(ConfigError::LigandSelectionNamesObject(selection.to_string()));
        }

        let cutoff = self.contacts.cutoff;
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        let buffer = self.split.zoom_buffer;
        if !buffer.is_finite() || buffer < 0.0 {
            return Err(ConfigError::InvalidZoomBuffer(buffer));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_setters_yields_defaults() {
        let config = WorkflowConfigBuilder::new().build().unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(config.split.complex_name, "my_complex");
        assert_eq!(config.split.copy_name, "complex_copy");
        assert_eq!(config.split.receptor_name, "Protein");
        assert_eq!(config.split.ligand_name, "ligand");
        assert_eq!(config.split.ligand_residue_name, "UNL");
        assert_eq!(config.split.receptor_representation, Representation::Cartoon);
        assert_eq!(config.split.ligand_representation, Representation::Sticks);
        assert_eq!(config.split.background, Color::WHITE);
        assert_eq!(config.contacts.cutoff, 3.5);
        assert_eq!(config.contacts.polar_contacts_name, "ligand_polar_contacts");
        assert_eq!(config.contacts.hbonds_name, "hydrogen_bonds");
        assert_eq!(config.contacts.mode, DistanceMode::Polar);
    }

    #[test]
    fn object_names_are_shared_between_stages() {
        let config = WorkflowConfigBuilder::new()
            .receptor_name("receptor")
            .ligand_name("lig")
            .build()
            .unwrap();
        assert_eq!(config.contacts.receptor_name, "receptor");
        assert_eq!(config.contacts.ligand_name, "lig");
    }

    #[test]
    fn invalid_cutoffs_are_rejected() {
        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = WorkflowConfigBuilder::new().cutoff(cutoff).build();
            assert!(matches!(result, Err(ConfigError::InvalidCutoff(_))));
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let result = WorkflowConfigBuilder::new().ligand_residue_name("  ").build();
        assert_eq!(result, Err(ConfigError::EmptyName("ligand_residue_name")));
    }

    #[test]
    fn receptor_and_ligand_must_differ() {
        let result = WorkflowConfigBuilder::new()
            .receptor_name("same")
            .ligand_name("same")
            .build();
        assert_eq!(
            result,
            Err(ConfigError::NameClash {
                first: "receptor_name",
                second: "ligand_name",
                name: "same".into(),
            })
        );
    }

    #[test]
    fn copy_must_not_reuse_the_complex_name() {
        let result = WorkflowConfigBuilder::new().copy_name("my_complex").build();
        assert_eq!(
            result,
            Err(ConfigError::NameClash {
                first: "complex_name",
                second: "copy_name",
                name: "my_complex".into(),
            })
        );
    }

    #[test]
    fn distance_sets_must_not_reuse_molecule_or_each_other_names() {
        let cases = [
            (
                WorkflowConfigBuilder::new().polar_contacts_name("ligand"),
                ("ligand_name", "polar_contacts_name", "ligand"),
            ),
            (
                WorkflowConfigBuilder::new().hbonds_name("Protein"),
                ("receptor_name", "hbonds_name", "Protein"),
            ),
            (
                WorkflowConfigBuilder::new().hbonds_name("ligand_polar_contacts"),
                ("polar_contacts_name", "hbonds_name", "ligand_polar_contacts"),
            ),
            (
                WorkflowConfigBuilder::new().polar_contacts_name("complex_copy"),
                ("copy_name", "polar_contacts_name", "complex_copy"),
            ),
            (
                WorkflowConfigBuilder::new().hbonds_name("my_complex"),
                ("complex_name", "hbonds_name", "my_complex"),
            ),
        ];
        for (builder, (first, second, name)) in cases {
            assert_eq!(
                builder.build(),
                Err(ConfigError::NameClash {
                    first,
                    second,
                    name: name.into(),
                })
            );
        }
    }

    #[test]
    fn ligand_residue_name_may_match_an_object_name() {
        let config = WorkflowConfigBuilder::new()
            .ligand_name("LIG")
            .ligand_residue_name("LIG")
            .build()
            .unwrap();
        assert_eq!(config.split.ligand_residue_name, "LIG");
    }

    #[test]
    fn ligand_selection_is_kept_and_must_not_name_objects() {
        let selection: Selection = "resn UNL or hetatm".parse().unwrap();
        let config = WorkflowConfigBuilder::new()
            .ligand_selection(selection.clone())
            .build()
            .unwrap();
        assert_eq!(config.split.ligand_selection, Some(selection));

        let naming: Selection = "my_complex and resn UNL".parse().unwrap();
        let result = WorkflowConfigBuilder::new().ligand_selection(naming).build();
        assert_eq!(
            result,
            Err(ConfigError::LigandSelectionNamesObject("my_complex and resn UNL".into()))
        );
    }

    #[test]
    fn negative_zoom_buffer_is_rejected() {
        let result = WorkflowConfigBuilder::new().zoom_buffer(-2.0).build();
        assert_eq!(result, Err(ConfigError::InvalidZoomBuffer(-2.0)));
    }
}
