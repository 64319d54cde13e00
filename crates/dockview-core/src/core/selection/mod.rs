//! Atom selection expressions.
//!
//! A [`Selection`] is a predicate over atoms in the named objects of a
//! session. It can be built in code with the constructor helpers and the
//! `and`/`or`/`!` combinators, or parsed from the familiar text form
//! (`complex_copy and not resn UNL`, `ligand and elem N+O`).

pub mod parser;

use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::element::Element;
use crate::core::models::residue::Residue;
use std::fmt;
use std::ops::Not;
use std::str::FromStr;

pub use parser::SelectionError;

/// An inclusive range of residue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueRange {
    pub start: isize,
    pub end: isize,
}

impl ResidueRange {
    pub fn contains(&self, number: isize) -> bool {
        (self.start..=self.end).contains(&number)
    }
}

/// Everything a predicate may look at for a single atom.
#[derive(Debug, Clone, Copy)]
pub struct AtomContext<'a> {
    pub object: &'a str,
    pub atom: &'a Atom,
    pub residue: &'a Residue,
    pub chain: &'a Chain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    None,
    Hetatm,
    Object(String),
    ResidueName(Vec<String>),
    ResidueNumber(Vec<ResidueRange>),
    AtomName(Vec<String>),
    Chain(Vec<char>),
    Element(Vec<Element>),
    Not(Box<Selection>),
    And(Box<Selection>, Box<Selection>),
    Or(Box<Selection>, Box<Selection>),
}

impl Selection {
    /// All atoms of the named object.
    pub fn object(name: impl Into<String>) -> Self {
        Selection::Object(name.into())
    }

    pub fn resn(name: impl Into<String>) -> Self {
        Selection::ResidueName(vec![name.into()])
    }

    pub fn elem(elements: impl IntoIterator<Item = Element>) -> Self {
        Selection::Element(elements.into_iter().collect())
    }

    pub fn and(self, other: Selection) -> Self {
        Selection::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Selection) -> Self {
        Selection::Or(Box::new(self), Box::new(other))
    }

    pub fn matches(&self, ctx: &AtomContext<'_>) -> bool {
        match self {
            Selection::All => true,
            Selection::None => false,
            Selection::Hetatm => ctx.atom.is_hetero,
            Selection::Object(name) => ctx.object == name,
            Selection::ResidueName(names) => names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(&ctx.residue.name)),
            Selection::ResidueNumber(ranges) => {
                ranges.iter().any(|r| r.contains(ctx.residue.number))
            }
            Selection::AtomName(names) => names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(&ctx.atom.name)),
            Selection::Chain(chains) => chains.contains(&ctx.chain.id),
            Selection::Element(elements) => elements.contains(&ctx.atom.element),
            Selection::Not(inner) => !inner.matches(ctx),
            Selection::And(a, b) => a.matches(ctx) && b.matches(ctx),
            Selection::Or(a, b) => a.matches(ctx) || b.matches(ctx),
        }
    }

    /// Names of every object the expression refers to, in order of appearance.
    pub fn object_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_object_names(&mut names);
        names
    }

    fn collect_object_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Selection::Object(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Selection::Not(inner) => inner.collect_object_names(names),
            Selection::And(a, b) | Selection::Or(a, b) => {
                a.collect_object_names(names);
                b.collect_object_names(names);
            }
            _ => {}
        }
    }
}

impl Not for Selection {
    type Output = Selection;

    fn not(self) -> Self::Output {
        Selection::Not(Box::new(self))
    }
}

impl FromStr for Selection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    values: &[T],
) -> fmt::Result {
    write!(f, "{} ", keyword)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str("+")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::None => f.write_str("none"),
            Selection::Hetatm => f.write_str("hetatm"),
            Selection::Object(name) => f.write_str(name),
            Selection::ResidueName(names) => write_joined(f, "resn", names),
            Selection::ResidueNumber(ranges) => write_joined(f, "resi", ranges),
            Selection::AtomName(names) => write_joined(f, "name", names),
            Selection::Chain(chains) => write_joined(f, "chain", chains),
            Selection::Element(elements) => write_joined(f, "elem", elements),
            Selection::Not(inner) => match &**inner {
                Selection::And(..) | Selection::Or(..) => write!(f, "not ({})", inner),
                _ => write!(f, "not {}", inner),
            },
            Selection::And(a, b) => {
                for (i, side) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    match &**side {
                        Selection::Or(..) => write!(f, "({})", side)?,
                        _ => write!(f, "{}", side)?,
                    }
                }
                Ok(())
            }
            Selection::Or(a, b) => write!(f, "{} or {}", a, b),
        }
    }
}
