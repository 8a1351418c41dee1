//! Implicit-hydrogen perception and explicit-hydrogen expansion
//!
//! Connection tables from curation tools usually carry heavy atoms only, leaving hydrogens implied by standard
//! valences. Alignment needs both structures fully hydrogenated so that atom counts and local environments match.

// Local Crate Imports
use crate::{Atom, Bond, BondOrder, Element, Molecule};

impl Molecule {
    /// Hydrogens implied by the standard valence model at `index`. Zero for explicit hydrogens, for elements outside
    /// the organic subset, and for hypervalent atoms already exceeding their highest standard valence.
    #[must_use]
    pub fn implicit_hydrogens(&self, index: usize) -> u8 {
        let Atom { element, charge } = self.atoms()[index];
        let Some(valences) = element.default_valences() else {
            return 0;
        };

        let bonded = self.bonded_valence(index);
        valences
            .iter()
            .map(|&v| charge_adjusted(v, element, charge))
            .find(|&v| v >= bonded)
            .map_or(0, |v| (v - bonded) as u8)
    }

    // Bond orders are tallied in half-units so that aromatic bonds can count as 1.5 without touching floats; the
    // total rounds up, matching how perception treats a lone pair of aromatic bonds (3 units, not 2)
    fn bonded_valence(&self, index: usize) -> i16 {
        let half_units: i16 = self
            .neighbors(index)
            .map(|(_, order)| match order {
                BondOrder::Single => 2,
                BondOrder::Double => 4,
                BondOrder::Triple => 6,
                BondOrder::Aromatic => 3,
            })
            .sum();
        (half_units + 1) / 2
    }

    /// A derived copy with every implicit hydrogen expanded into an explicit atom and single bond. New hydrogens are
    /// appended after the original atoms, in native atom order, so the original index space is a stable prefix.
    #[must_use]
    pub fn with_explicit_hydrogens(&self) -> Self {
        let mut atoms = self.atoms().to_vec();
        let mut bonds = self.bonds().to_vec();

        for index in 0..self.atom_count() {
            for _ in 0..self.implicit_hydrogens(index) {
                atoms.push(Atom {
                    element: Element::HYDROGEN,
                    charge: 0,
                });
                bonds.push(Bond {
                    a: index,
                    b: atoms.len() - 1,
                    order: BondOrder::Single,
                });
            }
        }

        Self {
            name: self.name().to_owned(),
            atoms,
            bonds,
            // Layout is a property of a specific atom set, so the expanded copy must be laid out afresh
            layout: None,
        }
    }
}

const fn charge_adjusted(valence: u8, element: Element, charge: i8) -> i16 {
    let valence = valence as i16;
    let charge = charge as i16;
    // Protonation adds a bonding site on the electronegative block (N+, O+) and deprotonation removes one (O-, S-);
    // carbocations and carbanions both lose one
    match element.atomic_number() {
        7..=9 | 15..=17 | 35 | 53 => valence + charge,
        _ => valence - charge.abs(),
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use once_cell::sync::Lazy;

    use super::*;

    static ETHANOL: Lazy<Molecule> = Lazy::new(|| {
        Molecule::from_molfile(indoc! {r"
            ethanol
              nmrx

              3  2  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                2.2500    1.2990    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
              2  3  1  0  0  0  0
            M  END
        "})
        .unwrap()
    });

    static BENZENE: Lazy<Molecule> = Lazy::new(|| {
        Molecule::from_molfile(indoc! {r"
            benzene
              nmrx

              6  6  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                2.2500    1.2990    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    2.5981    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                0.0000    2.5981    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
               -0.7500    1.2990    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  4  0  0  0  0
              2  3  4  0  0  0  0
              3  4  4  0  0  0  0
              4  5  4  0  0  0  0
              5  6  4  0  0  0  0
              6  1  4  0  0  0  0
            M  END
        "})
        .unwrap()
    });

    #[test]
    fn ethanol_implicit_hydrogens() {
        // CH3, CH2, OH
        assert_eq!(ETHANOL.implicit_hydrogens(0), 3);
        assert_eq!(ETHANOL.implicit_hydrogens(1), 2);
        assert_eq!(ETHANOL.implicit_hydrogens(2), 1);
    }

    #[test]
    fn aromatic_carbons_keep_one_hydrogen() {
        for index in 0..BENZENE.atom_count() {
            assert_eq!(BENZENE.implicit_hydrogens(index), 1);
        }
    }

    #[test]
    fn charged_atoms_adjust_valence() {
        let methanolate = Molecule::from_molfile(indoc! {r"
            methanolate
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
            M  CHG  1   2  -1
            M  END
        "})
        .unwrap();
        // O- carries no hydrogen; the methyl carbon is unaffected
        assert_eq!(methanolate.implicit_hydrogens(1), 0);
        assert_eq!(methanolate.implicit_hydrogens(0), 3);
    }

    #[test]
    fn expansion_appends_hydrogens_in_native_order() {
        let expanded = ETHANOL.with_explicit_hydrogens();
        assert_eq!(expanded.atom_count(), 9);
        assert_eq!(expanded.bond_count(), 8);
        // The original heavy atoms are a stable prefix
        assert_eq!(&expanded.atoms()[..3], ETHANOL.atoms());
        // H atoms 3..6 hang off the methyl carbon, 6..8 off the methylene, 8 off the oxygen
        let parent = |h: usize| {
            expanded
                .bonds()
                .iter()
                .find(|bond| bond.b == h)
                .map(|bond| bond.a)
                .unwrap()
        };
        assert_eq!([parent(3), parent(4), parent(5)], [0, 0, 0]);
        assert_eq!([parent(6), parent(7)], [1, 1]);
        assert_eq!(parent(8), 2);
    }

    #[test]
    fn expansion_is_a_fixed_point_once_explicit() {
        let expanded = ETHANOL.with_explicit_hydrogens();
        let again = expanded.with_explicit_hydrogens();
        assert_eq!(again, expanded);
    }

    #[test]
    fn benzene_expands_to_twelve_atoms() {
        assert_eq!(BENZENE.with_explicit_hydrogens().atom_count(), 12);
    }
}
