//! Per-atom NMR shift annotation records
//!
//! These are exchange-format records: `atom_index` is 1-based (the numbering of the source connection table), shift
//! values are decimal ppm, and any fields this crate doesn't model pass through remapping byte-identical.

// External Crate Imports
use itertools::Either;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A 13C assignment, always keyed by a single atom.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CarbonShift {
    pub atom_index: u32,
    pub shift: Decimal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A 1H assignment, keyed by a single atom or a chemically-equivalent group of them.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ProtonShift {
    pub atom_index: AtomIndices,
    pub shift: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling: Option<Vec<Decimal>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// NOTE: The scalar/list duality is part of the exchange format, not an accident: a group that collapses to one
// mappable atom must serialize back as a scalar, so the shape itself is modeled rather than normalized away
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtomIndices {
    One(u32),
    Group(Vec<u32>),
}

impl AtomIndices {
    /// Collapses to `One` when a single index remains; `None` when nothing does.
    #[must_use]
    pub fn from_indices(indices: Vec<u32>) -> Option<Self> {
        match indices.as_slice() {
            [] => None,
            &[index] => Some(Self::One(index)),
            _ => Some(Self::Group(indices)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        match self {
            Self::One(index) => Either::Left(std::iter::once(*index)),
            Self::Group(indices) => Either::Right(indices.iter().copied()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Group(indices) => indices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn scalar_and_list_index_shapes_deserialize() {
        let scalar: ProtonShift = serde_json::from_value(json!({
            "atom_index": 5,
            "shift": 1.25,
        }))
        .unwrap();
        assert_eq!(scalar.atom_index, AtomIndices::One(5));

        let group: ProtonShift = serde_json::from_value(json!({
            "atom_index": [3, 4],
            "shift": 1.25,
            "multiplicity": "d",
        }))
        .unwrap();
        assert_eq!(group.atom_index, AtomIndices::Group(vec![3, 4]));
        assert_eq!(group.multiplicity.as_deref(), Some("d"));
    }

    #[test]
    fn index_shapes_serialize_as_they_are() {
        let one = serde_json::to_value(AtomIndices::One(7)).unwrap();
        assert_eq!(one, json!(7));
        let group = serde_json::to_value(AtomIndices::Group(vec![7, 8])).unwrap();
        assert_eq!(group, json!([7, 8]));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let entry: CarbonShift = serde_json::from_value(json!({
            "atom_index": 1,
            "shift": 58.0,
            "assignment_uuid": "d6e3…",
            "intensity": 0.4,
        }))
        .unwrap();
        assert_eq!(entry.shift, dec!(58.0));
        assert_eq!(entry.extra["assignment_uuid"], json!("d6e3…"));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["intensity"], json!(0.4));
    }

    #[test]
    fn group_collapse_rules() {
        assert_eq!(AtomIndices::from_indices(vec![]), None);
        assert_eq!(AtomIndices::from_indices(vec![4]), Some(AtomIndices::One(4)));
        assert_eq!(
            AtomIndices::from_indices(vec![4, 9]),
            Some(AtomIndices::Group(vec![4, 9]))
        );
    }
}
