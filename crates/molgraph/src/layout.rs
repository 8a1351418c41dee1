//! Deterministic 2D layout from bond topology
//!
//! The alignment pipeline needs coordinates that are reproducible for a given input: no force fields, no random
//! seeds. Atoms are placed on concentric shells around a canonical root, shell radius growing by one bond length per
//! BFS depth. The result is a serviceable depiction, and byte-for-byte identical on every run; prettiness is
//! explicitly not the contract.

// Standard Library Imports
use std::collections::VecDeque;

// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::{Molecule, Point, identity::refined_labels};

/// Shell spacing, in the arbitrary distance units of a depiction
pub const BOND_LENGTH: f64 = 1.5;

impl Molecule {
    /// Assigns deterministic 2D coordinates to every atom, replacing any previous layout.
    pub fn assign_layout(&mut self) {
        self.layout = Some(compute(self));
    }
}

fn compute(mol: &Molecule) -> Vec<Point> {
    let labels = refined_labels(mol);
    let mut points = vec![None; mol.atom_count()];
    let mut x_offset = 0.0;

    // Disconnected fragments (salts, solvates) are laid out side by side, in order of first appearance
    while let Some(root) = canonical_root(&labels, &points) {
        let depth = place_component(mol, root, x_offset, &mut points);
        x_offset += 2.0 * depth as f64 * BOND_LENGTH + 2.0 * BOND_LENGTH;
    }

    points.into_iter().map(Option::unwrap).collect()
}

/// The unplaced atom with the smallest refined label, ties broken by native index
fn canonical_root(labels: &[u64], points: &[Option<Point>]) -> Option<usize> {
    (0..labels.len())
        .filter(|&i| points[i].is_none())
        .min_by_key(|&i| labels[i])
}

fn place_component(mol: &Molecule, root: usize, x_offset: f64, points: &mut [Option<Point>]) -> usize {
    // BFS shells: discovery order within a shell follows parent order, then bond order within a parent
    let mut shells: Vec<Vec<usize>> = vec![vec![root]];
    points[root] = Some(Point { x: x_offset, y: 0.0 });

    let mut queue = VecDeque::from([(root, 0)]);
    while let Some((atom, depth)) = queue.pop_front() {
        let unvisited: Vec<_> = mol
            .neighbors(atom)
            .map(|(neighbor, _)| neighbor)
            .filter(|&neighbor| points[neighbor].is_none())
            .sorted_unstable()
            .collect();
        for neighbor in unvisited {
            if points[neighbor].is_some() {
                continue;
            }
            // Reserve the slot now so later parents in the same shell skip it
            points[neighbor] = Some(Point { x: 0.0, y: 0.0 });
            if shells.len() == depth + 1 {
                shells.push(Vec::new());
            }
            shells[depth + 1].push(neighbor);
            queue.push_back((neighbor, depth + 1));
        }
    }

    for (depth, shell) in shells.iter().enumerate().skip(1) {
        let radius = depth as f64 * BOND_LENGTH;
        let step = std::f64::consts::TAU / shell.len() as f64;
        for (slot, &atom) in shell.iter().enumerate() {
            let angle = step * slot as f64;
            points[atom] = Some(Point {
                x: x_offset + radius * angle.cos(),
                y: radius * angle.sin(),
            });
        }
    }

    shells.len() - 1
}
