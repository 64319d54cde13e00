use phf::phf_map;
use std::fmt;
use std::str::FromStr;

/// Chemical elements encountered in protein–ligand complexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Sodium,
    Magnesium,
    Phosphorus,
    Sulfur,
    Chlorine,
    Potassium,
    Calcium,
    Manganese,
    Iron,
    Zinc,
    Selenium,
    Bromine,
    Iodine,
    #[default]
    Unknown,
}

static ELEMENTS_BY_SYMBOL: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element::Hydrogen,
    "D" => Element::Hydrogen,
    "C" => Element::Carbon,
    "N" => Element::Nitrogen,
    "O" => Element::Oxygen,
    "F" => Element::Fluorine,
    "NA" => Element::Sodium,
    "MG" => Element::Magnesium,
    "P" => Element::Phosphorus,
    "S" => Element::Sulfur,
    "CL" => Element::Chlorine,
    "K" => Element::Potassium,
    "CA" => Element::Calcium,
    "MN" => Element::Manganese,
    "FE" => Element::Iron,
    "ZN" => Element::Zinc,
    "SE" => Element::Selenium,
    "BR" => Element::Bromine,
    "I" => Element::Iodine,
};

// AutoDock 4 atom types whose element differs from a plain symbol lookup.
static ELEMENTS_BY_AUTODOCK_TYPE: phf::Map<&'static str, Element> = phf_map! {
    "A" => Element::Carbon,
    "OA" => Element::Oxygen,
    "OS" => Element::Oxygen,
    "NA" => Element::Nitrogen,
    "NS" => Element::Nitrogen,
    "HD" => Element::Hydrogen,
    "HS" => Element::Hydrogen,
    "SA" => Element::Sulfur,
    "G0" => Element::Carbon,
    "G1" => Element::Carbon,
    "G2" => Element::Carbon,
    "G3" => Element::Carbon,
    "CG0" => Element::Carbon,
    "CG1" => Element::Carbon,
    "W" => Element::Oxygen,
};

impl Element {
    /// Looks up an element by its symbol, ignoring case and surrounding whitespace.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let key = symbol.trim().to_ascii_uppercase();
        ELEMENTS_BY_SYMBOL.get(key.as_str()).copied()
    }

    /// Resolves the element of an AutoDock atom type (e.g. `OA`, `HD`, `A`).
    pub fn from_autodock_type(ad_type: &str) -> Option<Self> {
        let key = ad_type.trim().to_ascii_uppercase();
        ELEMENTS_BY_AUTODOCK_TYPE
            .get(key.as_str())
            .copied()
            .or_else(|| Self::from_symbol(&key))
    }

    /// Guesses the element from a PDB atom name.
    ///
    /// A name occupying the first name column (`name_is_left_aligned`) denotes a
    /// two-letter element such as `FE` or `CL`; otherwise the first alphabetic
    /// character is used.
    pub fn from_atom_name(name: &str, name_is_left_aligned: bool) -> Self {
        let letters: String = name
            .trim()
            .chars()
            .skip_while(|c| c.is_ascii_digit())
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if letters.is_empty() {
            return Element::Unknown;
        }
        if name_is_left_aligned && letters.len() >= 2 {
            if let Some(element) = Self::from_symbol(&letters[..2]) {
                return element;
            }
        }
        Self::from_symbol(&letters[..1]).unwrap_or(Element::Unknown)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Sodium => "Na",
            Element::Magnesium => "Mg",
            Element::Phosphorus => "P",
            Element::Sulfur => "S",
            Element::Chlorine => "Cl",
            Element::Potassium => "K",
            Element::Calcium => "Ca",
            Element::Manganese => "Mn",
            Element::Iron => "Fe",
            Element::Zinc => "Zn",
            Element::Selenium => "Se",
            Element::Bromine => "Br",
            Element::Iodine => "I",
            Element::Unknown => "X",
        }
    }

    /// Nitrogen and oxygen, the atoms considered by polar-contact searches.
    pub fn is_polar(&self) -> bool {
        matches!(self, Element::Nitrogen | Element::Oxygen)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_is_case_insensitive() {
        assert_eq!(Element::from_symbol("n"), Some(Element::Nitrogen));
        assert_eq!(Element::from_symbol(" Cl "), Some(Element::Chlorine));
        assert_eq!(Element::from_symbol("ZN"), Some(Element::Zinc));
        assert_eq!(Element::from_symbol("Xx"), None);
    }

    #[test]
    fn autodock_types_resolve_to_elements() {
        assert_eq!(Element::from_autodock_type("A"), Some(Element::Carbon));
        assert_eq!(Element::from_autodock_type("OA"), Some(Element::Oxygen));
        assert_eq!(Element::from_autodock_type("NA"), Some(Element::Nitrogen));
        assert_eq!(Element::from_autodock_type("HD"), Some(Element::Hydrogen));
        assert_eq!(Element::from_autodock_type("SA"), Some(Element::Sulfur));
        assert_eq!(Element::from_autodock_type("Cl"), Some(Element::Chlorine));
        assert_eq!(Element::from_autodock_type("C"), Some(Element::Carbon));
    }

    #[test]
    fn from_atom_name_uses_alignment_for_two_letter_elements() {
        assert_eq!(Element::from_atom_name("CA", false), Element::Carbon);
        assert_eq!(Element::from_atom_name("CA", true), Element::Calcium);
        assert_eq!(Element::from_atom_name("FE", true), Element::Iron);
        assert_eq!(Element::from_atom_name("1HB", false), Element::Hydrogen);
        assert_eq!(Element::from_atom_name("OXT", false), Element::Oxygen);
        assert_eq!(Element::from_atom_name("123", false), Element::Unknown);
    }

    #[test]
    fn only_nitrogen_and_oxygen_are_polar() {
        assert!(Element::Nitrogen.is_polar());
        assert!(Element::Oxygen.is_polar());
        assert!(!Element::Carbon.is_polar());
        assert!(!Element::Sulfur.is_polar());
    }

    #[test]
    fn from_str_reports_unknown_symbol() {
        assert_eq!("O".parse::<Element>(), Ok(Element::Oxygen));
        assert_eq!(
            "Qq".parse::<Element>(),
            Err(ParseElementError("Qq".to_string()))
        );
    }
}
