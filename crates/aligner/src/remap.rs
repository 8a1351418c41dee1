//! Translates shift annotations from curation index space into reference index space
//!
//! An annotation whose index has no entry in the correspondence cannot be represented in the target numbering. One
//! bad data point shouldn't sink an otherwise-valid batch, so such entries are dropped from the output, but every
//! drop is recorded in [`DroppedShifts`] so callers can audit what went missing.

// External Crate Imports
use log::debug;
use serde::Serialize;

// Local Crate Imports
use crate::{
    IndexCorrespondence,
    shift::{AtomIndices, CarbonShift, ProtonShift},
};

/// The indices of every annotation that could not be remapped, one entry per dropped record.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct DroppedShifts {
    pub carbon: Vec<u32>,
    pub proton: Vec<Vec<u32>>,
}

impl DroppedShifts {
    #[must_use]
    pub fn count(&self) -> usize {
        self.carbon.len() + self.proton.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

pub(crate) fn carbon_shifts(
    correspondence: &IndexCorrespondence,
    shifts: &[CarbonShift],
    dropped: &mut DroppedShifts,
) -> Vec<CarbonShift> {
    shifts
        .iter()
        .filter_map(|entry| match correspondence.get(entry.atom_index) {
            Some(atom_index) => Some(CarbonShift {
                atom_index,
                ..entry.clone()
            }),
            None => {
                debug!("dropping 13C shift at unmappable index {}", entry.atom_index);
                dropped.carbon.push(entry.atom_index);
                None
            }
        })
        .collect()
}

pub(crate) fn proton_shifts(
    correspondence: &IndexCorrespondence,
    shifts: &[ProtonShift],
    dropped: &mut DroppedShifts,
) -> Vec<ProtonShift> {
    shifts
        .iter()
        .filter_map(|entry| {
            let mapped: Vec<_> = entry
                .atom_index
                .iter()
                .filter_map(|index| correspondence.get(index))
                .collect();
            match AtomIndices::from_indices(mapped) {
                Some(atom_index) => Some(ProtonShift {
                    atom_index,
                    ..entry.clone()
                }),
                None => {
                    debug!(
                        "dropping 1H shift: none of {:?} are mappable",
                        entry.atom_index
                    );
                    dropped.proton.push(entry.atom_index.iter().collect());
                    None
                }
            }
        })
        .collect()
}
