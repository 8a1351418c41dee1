//! Full-structure atom correspondence via subgraph isomorphism
//!
//! The search itself is `petgraph`'s VF2; reimplementing general graph isomorphism here would be a mistake. This
//! module only translates molecules into matcher inputs and pins down the determinism contract: VF2 enumerates
//! candidate mappings in a fixed order, so the first mapping for a given input pair is the same on every run. When a
//! molecule has internal symmetry, *which* of the equally-valid mappings comes first is arbitrary (an accepted,
//! documented limitation), but it is always the same arbitrary choice.

// External Crate Imports
use log::debug;
use petgraph::{
    algo::subgraph_isomorphisms_iter,
    graph::{NodeIndex, UnGraph},
};

// Local Crate Imports
use crate::{Atom, BondOrder, Molecule};

/// Finds a mapping of *every* atom of `a` onto an atom of `b`, matching on element, formal charge, and bond orders.
/// Returns `None` unless the whole of `a` embeds; partial matches are never surfaced.
///
/// `mapping[i] = j` means atom `i` of `a` corresponds to atom `j` of `b`, both in native 0-based index space.
#[must_use]
pub fn find_full_match(a: &Molecule, b: &Molecule) -> Option<Vec<usize>> {
    let graph_a = petgraph_of(a);
    let graph_b = petgraph_of(b);

    let mut node_match = |x: &Atom, y: &Atom| x == y;
    let mut edge_match = |x: &BondOrder, y: &BondOrder| x == y;

    let mapping =
        subgraph_isomorphisms_iter(&&graph_a, &&graph_b, &mut node_match, &mut edge_match)?
            .next()?;
    debug!(
        "matched all {} atoms of {:?} onto {:?}",
        mapping.len(),
        a.name(),
        b.name()
    );
    Some(mapping)
}

fn petgraph_of(mol: &Molecule) -> UnGraph<Atom, BondOrder> {
    let mut graph = UnGraph::with_capacity(mol.atom_count(), mol.bond_count());
    for &atom in mol.atoms() {
        graph.add_node(atom);
    }
    for bond in mol.bonds() {
        graph.add_edge(NodeIndex::new(bond.a), NodeIndex::new(bond.b), bond.order);
    }
    graph
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use once_cell::sync::Lazy;

    use super::*;

    static ETHANOL_A: Lazy<Molecule> = Lazy::new(|| {
        Molecule::from_molfile(indoc! {r"
            ethanol (curation order)
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

    static ETHANOL_B: Lazy<Molecule> = Lazy::new(|| {
        Molecule::from_molfile(indoc! {r"
            ethanol (database order)
              nmrx

              3  2  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                2.2500    1.2990    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
              2  3  1  0  0  0  0
            M  END
        "})
        .unwrap()
    });

    #[test]
    fn heavy_atom_match_follows_topology() {
        let mapping = find_full_match(&ETHANOL_A, &ETHANOL_B).unwrap();
        // A: [CH3, CH2, O] vs B: [O, CH2, CH3]
        assert_eq!(mapping, vec![2, 1, 0]);
    }

    #[test]
    fn expanded_match_is_a_bijection() {
        let a = ETHANOL_A.with_explicit_hydrogens();
        let b = ETHANOL_B.with_explicit_hydrogens();
        let mapping = find_full_match(&a, &b).unwrap();
        assert_eq!(mapping.len(), 9);
        let mut targets = mapping.clone();
        targets.sort_unstable();
        assert_eq!(targets, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn match_is_deterministic() {
        let a = ETHANOL_A.with_explicit_hydrogens();
        let b = ETHANOL_B.with_explicit_hydrogens();
        assert_eq!(find_full_match(&a, &b), find_full_match(&a, &b));
    }

    #[test]
    fn different_compounds_do_not_match() {
        let methanol = Molecule::from_molfile(indoc! {r"
            methanol
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
            M  END
        "})
        .unwrap();
        assert_eq!(find_full_match(&ETHANOL_A, &methanol), None);
    }

    #[test]
    fn bond_orders_constrain_the_match() {
        let ethene = Molecule::from_molfile(indoc! {r"
            ethene
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  2  0  0  0  0
            M  END
        "})
        .unwrap();
        let ethane = Molecule::from_molfile(indoc! {r"
            ethane
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
            M  END
        "})
        .unwrap();
        assert_eq!(find_full_match(&ethene, &ethane), None);
    }
}
