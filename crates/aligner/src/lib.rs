//! Aligns atom numbering between two descriptions of the same compound and remaps per-atom NMR shift assignments
//! into the reference numbering
//!
//! A curator tool and the database it feeds each parse their own connection table of the same compound, and each
//! ends up with its own atom numbering. Shift assignments are keyed by the curation-side numbering; storage wants
//! the database-side numbering. An [`AlignmentSession`] establishes the correspondence between the two index spaces
//! once, then remaps any number of shift lists across it.

mod remap;
mod shift;

// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use ahash::HashMap;
use log::{debug, info};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

// Local Crate Imports
use molgraph::{IdentityKey, Molecule, MolfileError, find_full_match};

pub use remap::DroppedShifts;
pub use shift::{AtomIndices, CarbonShift, ProtonShift};

pub type Result<T, E = AlignError> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AlignError {
    #[error("failed to parse the {side} structure")]
    Parse {
        side: StructureSide,
        #[source]
        #[diagnostic_source]
        source: MolfileError,
    },

    #[error("the curation ({curation}) and reference ({reference}) structures are not the same compound")]
    #[diagnostic(help(
        "only the atom *numbering* may differ between the two structures; remapping measurements across \
        genuinely different compounds would be scientifically invalid"
    ))]
    StructureMismatch {
        curation: IdentityKey,
        reference: IdentityKey,
    },

    #[error("failed to establish a full one-to-one correspondence over {expected} atoms")]
    #[diagnostic(help(
        "the identity keys agree, so this usually means one connection table is malformed in a way the key \
        doesn't capture; partial mappings are never used"
    ))]
    Correspondence { expected: usize },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StructureSide {
    Curation,
    Reference,
}

impl Display for StructureSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curation => write!(f, "curation"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// A 1-based mapping from every atom index of the hydrogen-expanded curation structure onto an atom index of the
/// hydrogen-expanded reference structure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IndexCorrespondence(HashMap<u32, u32>);

impl IndexCorrespondence {
    // The +1 here is the *only* place the external 1-based convention enters; everything upstream is 0-based
    pub(crate) fn from_full_match(mapping: &[usize]) -> Self {
        Self(
            mapping
                .iter()
                .enumerate()
                .map(|(i, &j)| (i as u32 + 1, j as u32 + 1))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<u32> {
        self.0.get(&index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&from, &to)| (from, to))
    }
}

/// One alignment of one (curation, reference) structure pair. The correspondence is computed at construction and
/// reused for every remapping call; sessions share nothing, so independent pairs can run on independent threads.
#[derive(Clone, Debug)]
pub struct AlignmentSession {
    curation: Molecule,
    reference: Molecule,
    correspondence: IndexCorrespondence,
}

/// Shift lists rewritten into the reference index space, plus what fell out along the way.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct AlignedShifts {
    pub carbon: Vec<CarbonShift>,
    pub proton: Vec<ProtonShift>,
    pub dropped: DroppedShifts,
}

impl AlignmentSession {
    /// Parses both structures, verifies they are the same compound, and computes the atom correspondence.
    pub fn new(curation_molfile: &str, reference_molfile: &str) -> Result<Self> {
        let parse = |side, input| {
            Molecule::from_molfile(input).map_err(|source| AlignError::Parse { side, source })
        };
        let mut curation = parse(StructureSide::Curation, curation_molfile)?;
        let mut reference = parse(StructureSide::Reference, reference_molfile)?;

        let (curation_key, reference_key) = (curation.identity_key(), reference.identity_key());
        if curation_key != reference_key {
            return Err(AlignError::StructureMismatch {
                curation: curation_key,
                reference: reference_key,
            });
        }
        debug!("identity keys agree: {curation_key}");

        // Deterministic depiction coordinates for both sides: downstream viewers rely on these being reproducible,
        // though the correspondence search itself never reads them
        curation.assign_layout();
        reference.assign_layout();

        let correspondence = correspondence_of(&curation, &reference)?;
        info!(
            "aligned {:?} onto {:?}: {} atom indices",
            curation.name(),
            reference.name(),
            correspondence.len()
        );

        Ok(Self {
            curation,
            reference,
            correspondence,
        })
    }

    #[must_use]
    pub fn correspondence(&self) -> &IndexCorrespondence {
        &self.correspondence
    }

    #[must_use]
    pub fn curation(&self) -> &Molecule {
        &self.curation
    }

    #[must_use]
    pub fn reference(&self) -> &Molecule {
        &self.reference
    }

    /// Remaps both shift lists across the session correspondence. Unmappable entries are dropped from the output
    /// and reported in [`AlignedShifts::dropped`]; absent inputs yield empty outputs.
    #[must_use]
    pub fn align(
        &self,
        c_shifts: Option<&[CarbonShift]>,
        h_shifts: Option<&[ProtonShift]>,
    ) -> AlignedShifts {
        let mut dropped = DroppedShifts::default();
        let carbon = c_shifts
            .map(|shifts| remap::carbon_shifts(&self.correspondence, shifts, &mut dropped))
            .unwrap_or_default();
        let proton = h_shifts
            .map(|shifts| remap::proton_shifts(&self.correspondence, shifts, &mut dropped))
            .unwrap_or_default();

        if !dropped.is_empty() {
            info!("{} shift entries had no mappable index", dropped.count());
        }
        AlignedShifts {
            carbon,
            proton,
            dropped,
        }
    }
}

fn correspondence_of(curation: &Molecule, reference: &Molecule) -> Result<IndexCorrespondence> {
    let mut expanded_curation = curation.with_explicit_hydrogens();
    let mut expanded_reference = reference.with_explicit_hydrogens();

    // 2D layout over 3D embedding, deliberately: the goal is a topological correspondence, and layout from bond
    // topology alone is reproducible where force-field embedding is not
    expanded_curation.assign_layout();
    expanded_reference.assign_layout();

    let expected = expanded_curation.atom_count();
    if expanded_reference.atom_count() != expected {
        return Err(AlignError::Correspondence { expected });
    }

    find_full_match(&expanded_curation, &expanded_reference)
        .map(|mapping| IndexCorrespondence::from_full_match(&mapping))
        .ok_or(AlignError::Correspondence { expected })
}
