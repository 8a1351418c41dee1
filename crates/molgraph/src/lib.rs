//! Molecular connection-table graphs and the toolkit operations needed to
//! align atom numbering between two descriptions of the same compound

pub mod element;
mod hydrogens;
mod identity;
mod isomorphism;
mod layout;
mod molfile;

// External Crate Imports
use derive_more::Display;

pub use element::Element;
pub use identity::IdentityKey;
pub use isomorphism::find_full_match;
pub use layout::BOND_LENGTH;
pub use molfile::MolfileError;

// NOTE: Atom order is the "native index space" of a structure: it's fixed by the order of the atom block in the
// source connection table and must never be perturbed by any operation in this crate. All indices here are 0-based;
// the 1-based convention of external shift records is applied exactly once, by the `aligner` crate.
#[derive(Clone, PartialEq, Debug)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    // Assigned by `assign_layout()`, never read from input
    layout: Option<Vec<Point>>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Copy, Clone, PartialEq, Debug, Display)]
#[display("({x:.4}, {y:.4})")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Molecule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Layout coordinates, if `assign_layout()` has been called
    #[must_use]
    pub fn layout(&self) -> Option<&[Point]> {
        self.layout.as_deref()
    }

    pub(crate) fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.bonds.iter().filter_map(move |&Bond { a, b, order }| {
            if a == index {
                Some((b, order))
            } else if b == index {
                Some((a, order))
            } else {
                None
            }
        })
    }

    pub(crate) fn degree(&self, index: usize) -> usize {
        self.neighbors(index).count()
    }
}
