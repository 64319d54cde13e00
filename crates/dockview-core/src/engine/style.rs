//! Representations, named colors and the per-atom display state built from them.

use phf::phf_map;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Lines,
    Sticks,
    Cartoon,
    Ribbon,
    Spheres,
    Surface,
    Mesh,
    Dots,
    Nonbonded,
    Labels,
}

impl Representation {
    pub const ALL: [Representation; 10] = [
        Representation::Lines,
        Representation::Sticks,
        Representation::Cartoon,
        Representation::Ribbon,
        Representation::Spheres,
        Representation::Surface,
        Representation::Mesh,
        Representation::Dots,
        Representation::Nonbonded,
        Representation::Labels,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Representation::Lines => "lines",
            Representation::Sticks => "sticks",
            Representation::Cartoon => "cartoon",
            Representation::Ribbon => "ribbon",
            Representation::Spheres => "spheres",
            Representation::Surface => "surface",
            Representation::Mesh => "mesh",
            Representation::Dots => "dots",
            Representation::Nonbonded => "nonbonded",
            Representation::Labels => "labels",
        }
    }

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown representation: '{0}'")]
pub struct ParseRepresentationError(pub String);

impl FromStr for Representation {
    type Err = ParseRepresentationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Representation::ALL
            .into_iter()
            .find(|rep| rep.name() == lowered)
            .ok_or_else(|| ParseRepresentationError(s.to_string()))
    }
}

/// The set of representations shown for one atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RepMask(u16);

impl RepMask {
    pub const NONE: RepMask = RepMask(0);

    pub fn only(rep: Representation) -> Self {
        RepMask(rep.bit())
    }

    pub fn contains(&self, rep: Representation) -> bool {
        self.0 & rep.bit() != 0
    }

    pub fn insert(&mut self, rep: Representation) {
        self.0 |= rep.bit();
    }

    pub fn remove(&mut self, rep: Representation) {
        self.0 &= !rep.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Representation> + '_ {
        Representation::ALL
            .into_iter()
            .filter(move |rep| self.contains(*rep))
    }
}

static NAMED_COLORS: phf::Map<&'static str, [f32; 3]> = phf_map! {
    "white" => [1.0, 1.0, 1.0],
    "black" => [0.0, 0.0, 0.0],
    "red" => [1.0, 0.0, 0.0],
    "green" => [0.0, 1.0, 0.0],
    "blue" => [0.0, 0.0, 1.0],
    "yellow" => [1.0, 1.0, 0.0],
    "cyan" => [0.0, 1.0, 1.0],
    "magenta" => [1.0, 0.0, 1.0],
    "orange" => [1.0, 0.5, 0.0],
    "grey" => [0.5, 0.5, 0.5],
    "gray" => [0.5, 0.5, 0.5],
    "salmon" => [1.0, 0.6, 0.6],
    "slate" => [0.5, 0.5, 1.0],
    "wheat" => [0.99, 0.82, 0.65],
    "lightblue" => [0.75, 0.75, 1.0],
    "palegreen" => [0.65, 0.9, 0.65],
    "pink" => [1.0, 0.65, 0.85],
    "purple" => [0.75, 0.0, 0.75],
    "teal" => [0.0, 0.75, 0.75],
    "marine" => [0.0, 0.5, 1.0],
    "violet" => [1.0, 0.5, 1.0],
    "hotpink" => [1.0, 0.0, 0.5],
    "forest" => [0.2, 0.6, 0.2],
    "firebrick" => [0.698, 0.13, 0.13],
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    name: &'static str,
    rgb: [f32; 3],
}

impl Color {
    pub const WHITE: Color = Color {
        name: "white",
        rgb: [1.0, 1.0, 1.0],
    };
    pub const BLACK: Color = Color {
        name: "black",
        rgb: [0.0, 0.0, 0.0],
    };
    pub const CYAN: Color = Color {
        name: "cyan",
        rgb: [0.0, 1.0, 1.0],
    };
    pub const ORANGE: Color = Color {
        name: "orange",
        rgb: [1.0, 0.5, 0.0],
    };

    /// Looks up a named color, ignoring case.
    pub fn named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .get_entry(name.trim().to_ascii_lowercase().as_str())
            .map(|(name, rgb)| Color { name: *name, rgb: *rgb })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rgb(&self) -> [f32; 3] {
        self.rgb
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown color name: '{0}'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::named(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Display state of a single atom. A `color` of `None` means coloring by element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtomStyle {
    pub representations: RepMask,
    pub color: Option<Color>,
}

impl AtomStyle {
    pub(crate) fn loaded() -> Self {
        Self {
            representations: RepMask::only(Representation::Lines),
            color: None,
        }
    }
}
