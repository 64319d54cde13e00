//! Interatomic distance search between two atom selections.

use crate::core::models::element::Element;
use crate::core::models::ids::AtomId;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

/// Which atom pairs a distance search reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceMode {
    /// Every pair within the cutoff.
    All,
    /// Only pairs whose atoms are both nitrogen or oxygen.
    #[default]
    Polar,
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMode::All => f.write_str("all"),
            DistanceMode::Polar => f.write_str("polar"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown distance mode: '{0}' (expected 'all' or 'polar')")]
pub struct ParseDistanceModeError(pub String);

impl FromStr for DistanceMode {
    type Err = ParseDistanceModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "0" => Ok(DistanceMode::All),
            "polar" | "2" => Ok(DistanceMode::Polar),
            _ => Err(ParseDistanceModeError(s.to_string())),
        }
    }
}

/// Identifies one atom of a measured pair in terms a reader can follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRef {
    pub object: String,
    pub serial: usize,
    pub atom_name: String,
    pub element: Element,
    pub residue_name: String,
    pub residue_number: isize,
    pub chain: char,
}

impl fmt::Display for AtomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}//{}/{}`{}/{}",
            self.object, self.chain, self.residue_name, self.residue_number, self.atom_name
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistancePair {
    pub first: AtomRef,
    pub second: AtomRef,
    pub distance: f64,
}

/// A named set of measured pairs, as produced by one distance command.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSet {
    pub name: String,
    pub cutoff: f64,
    pub mode: DistanceMode,
    pub pairs: Vec<DistancePair>,
}

#[derive(Serialize)]
struct DistanceRecord<'a> {
    first_object: &'a str,
    first_chain: char,
    first_residue_name: &'a str,
    first_residue_number: isize,
    first_atom_name: &'a str,
    first_serial: usize,
    first_element: &'static str,
    second_object: &'a str,
    second_chain: char,
    second_residue_name: &'a str,
    second_residue_number: isize,
    second_atom_name: &'a str,
    second_serial: usize,
    second_element: &'static str,
    distance: f64,
}

impl<'a> From<&'a DistancePair> for DistanceRecord<'a> {
    fn from(pair: &'a DistancePair) -> Self {
        Self {
            first_object: &pair.first.object,
            first_chain: pair.first.chain,
            first_residue_name: &pair.first.residue_name,
            first_residue_number: pair.first.residue_number,
            first_atom_name: &pair.first.atom_name,
            first_serial: pair.first.serial,
            first_element: pair.first.element.symbol(),
            second_object: &pair.second.object,
            second_chain: pair.second.chain,
            second_residue_name: &pair.second.residue_name,
            second_residue_number: pair.second.residue_number,
            second_atom_name: &pair.second.atom_name,
            second_serial: pair.second.serial,
            second_element: pair.second.element.symbol(),
            distance: (pair.distance * 1000.0).round() / 1000.0,
        }
    }
}

impl DistanceSet {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn shortest(&self) -> Option<&DistancePair> {
        self.pairs
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Writes one CSV row per pair, with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for pair in &self.pairs {
            csv_writer.serialize(DistanceRecord::from(pair))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// One atom taking part in a distance search.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    /// Object index and atom id; unique within a session.
    pub key: (usize, AtomId),
    pub position: Point3<f64>,
    pub atom: AtomRef,
}

fn passes(mode: DistanceMode, probe: &Probe) -> bool {
    match mode {
        DistanceMode::All => true,
        DistanceMode::Polar => probe.atom.element.is_polar(),
    }
}

/// Finds every pair `(a, b)` with `a` from `first`, `b` from `second` and
/// `|a - b| <= cutoff`.
///
/// An atom is never paired with itself and a pair found in both directions is
/// kept once. Pairs come out grouped by `first` order, nearest first.
pub(crate) fn find_pairs(
    first: &[Probe],
    second: &[Probe],
    cutoff: f64,
    mode: DistanceMode,
) -> Vec<DistancePair> {
    let targets: Vec<&Probe> = second.iter().filter(|p| passes(mode, p)).collect();
    if targets.is_empty() {
        return Vec::new();
    }

    let positions: Vec<[f64; 3]> = targets
        .iter()
        .map(|p| [p.position.x, p.position.y, p.position.z])
        .collect();
    let kdtree: KdTree<f64, 3> = (&positions).into();
    let radius_sq = cutoff * cutoff;
    // kiddo's radius bound is exclusive; widen it and filter inclusively below.
    let query_radius_sq = radius_sq * (1.0 + 1e-9);

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for probe in first.iter().filter(|p| passes(mode, p)) {
        let query = [probe.position.x, probe.position.y, probe.position.z];
        let mut neighbours = kdtree.within_unsorted::<SquaredEuclidean>(&query, query_radius_sq);
        neighbours.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for neighbour in neighbours {
            if neighbour.distance > radius_sq {
                continue;
            }
            let target = targets[neighbour.item as usize];
            if target.key == probe.key {
                continue;
            }
            let unordered = if probe.key < target.key {
                (probe.key, target.key)
            } else {
                (target.key, probe.key)
            };
            if !seen.insert(unordered) {
                continue;
            }
            pairs.push(DistancePair {
                first: probe.atom.clone(),
                second: target.atom.clone(),
                distance: neighbour.distance.sqrt(),
            });
        }
    }
    pairs
}
