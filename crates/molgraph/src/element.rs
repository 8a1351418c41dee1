//! Chemical elements as they appear in connection-table atom blocks

// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// NOTE: Covers the elements that actually occur in natural-product NMR depositions. Anything outside this table is
// rejected at parse time rather than silently carried as an unknown: an unrecognized symbol is far more likely to be
// a mangled atom block than an exotic element.
const ELEMENTS: &[(u8, &str)] = &[
    (1, "H"),
    (5, "B"),
    (6, "C"),
    (7, "N"),
    (8, "O"),
    (9, "F"),
    (11, "Na"),
    (12, "Mg"),
    (14, "Si"),
    (15, "P"),
    (16, "S"),
    (17, "Cl"),
    (19, "K"),
    (20, "Ca"),
    (26, "Fe"),
    (29, "Cu"),
    (30, "Zn"),
    (34, "Se"),
    (35, "Br"),
    (53, "I"),
];

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Element {
    atomic_number: u8,
}

impl Element {
    pub const HYDROGEN: Self = Self { atomic_number: 1 };
    pub const CARBON: Self = Self { atomic_number: 6 };

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        ELEMENTS
            .iter()
            .find(|&&(_, s)| s == symbol)
            .map(|&(atomic_number, _)| Self { atomic_number })
    }

    #[must_use]
    pub const fn atomic_number(self) -> u8 {
        self.atomic_number
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        // SAFETY: The only way to construct an `Element` is through `from_symbol()` or the associated constants, all
        // of which come from `ELEMENTS`
        ELEMENTS
            .iter()
            .find(|&&(z, _)| z == self.atomic_number)
            .map(|&(_, s)| s)
            .unwrap()
    }

    #[must_use]
    pub const fn is_hydrogen(self) -> bool {
        self.atomic_number == 1
    }

    /// Standard bonding valences for the organic subset, lowest first. Elements outside the subset return `None` and
    /// never receive implicit hydrogens.
    #[must_use]
    pub const fn default_valences(self) -> Option<&'static [u8]> {
        match self.atomic_number {
            1 | 9 | 17 | 35 | 53 => Some(&[1]),
            5 | 7 => Some(&[3]),
            6 | 14 => Some(&[4]),
            8 => Some(&[2]),
            15 => Some(&[3, 5]),
            16 => Some(&[2, 4, 6]),
            _ => None,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
