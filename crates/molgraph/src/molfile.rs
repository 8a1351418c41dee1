//! Parses MDL V2000 connection tables into [`Molecule`]s
//!
//! Only the parts of the format that matter for topology survive parsing: elements, formal charges, and bonds. Input
//! coordinates are discarded, since `assign_layout()` recomputes them deterministically when needed.

// External Crate Imports
use miette::Diagnostic;
use nom::{
    IResult,
    bytes::complete::take,
    combinator::map_res,
};
use thiserror::Error;

// Local Crate Imports
use crate::{Atom, Bond, BondOrder, Element, Molecule};

pub type Result<T, E = MolfileError> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum MolfileError {
    #[error("connection table ended before the {0} block was complete")]
    #[diagnostic(help("V2000 files carry a three-line header, a counts line, then atom and bond blocks"))]
    Truncated(&'static str),

    #[error("line {line}: failed to parse the counts line {text:?}")]
    #[diagnostic(help("the counts line packs the atom and bond totals into fixed three-column fields"))]
    CountsLine { line: usize, text: String },

    #[error("the V3000 connection table format is not supported")]
    V3000,

    #[error("line {line}: failed to parse atom {index}: {text:?}")]
    AtomLine {
        line: usize,
        index: usize,
        text: String,
    },

    #[error("line {line}: the element symbol {symbol:?} was not recognized")]
    #[diagnostic(help("double-check the atom block; symbols are case-sensitive"))]
    UnknownElement { line: usize, symbol: String },

    #[error("line {line}: failed to parse bond {index}: {text:?}")]
    BondLine {
        line: usize,
        index: usize,
        text: String,
    },

    #[error("bond {index} references atom {atom}, but the structure only has {atom_count} atoms")]
    BondOutOfRange {
        index: usize,
        atom: usize,
        atom_count: usize,
    },

    #[error("the structure contains no atoms")]
    #[diagnostic(help("an empty connection table cannot carry shift assignments"))]
    NoAtoms,
}

impl Molecule {
    pub fn from_molfile(input: &str) -> Result<Self> {
        let mut lines = input.lines().enumerate();
        // 1-based line number of the last line pulled, for error reporting
        let mut next = |block: &'static str| {
            lines
                .next()
                .map(|(number, text)| (number + 1, text))
                .ok_or(MolfileError::Truncated(block))
        };

        let (_, name) = next("header")?;
        let name = name.trim().to_owned();
        next("header")?;
        next("header")?;

        let (counts_line_number, counts_text) = next("counts")?;
        if counts_text.get(33..39).is_some_and(|v| v.trim() == "V3000") {
            return Err(MolfileError::V3000);
        }
        let (_, (atom_count, bond_count)) =
            counts(counts_text).map_err(|_| MolfileError::CountsLine {
                line: counts_line_number,
                text: counts_text.to_owned(),
            })?;
        if atom_count == 0 {
            return Err(MolfileError::NoAtoms);
        }

        let mut atoms = Vec::with_capacity(atom_count);
        for index in 1..=atom_count {
            let (line, text) = next("atom")?;
            let (_, (symbol, legacy_charge)) = atom_line(text).map_err(|_| MolfileError::AtomLine {
                line,
                index,
                text: text.to_owned(),
            })?;
            let element = Element::from_symbol(symbol).ok_or_else(|| MolfileError::UnknownElement {
                line,
                symbol: symbol.to_owned(),
            })?;
            atoms.push(Atom {
                element,
                charge: legacy_charge,
            });
        }

        let mut bonds = Vec::with_capacity(bond_count);
        for index in 1..=bond_count {
            let (line, text) = next("bond")?;
            let (_, (a, b, order)) = bond_line(text).map_err(|_| MolfileError::BondLine {
                line,
                index,
                text: text.to_owned(),
            })?;
            for atom in [a, b] {
                if atom == 0 || atom > atom_count {
                    return Err(MolfileError::BondOutOfRange {
                        index,
                        atom,
                        atom_count,
                    });
                }
            }
            bonds.push(Bond {
                a: a - 1,
                b: b - 1,
                order,
            });
        }

        // Property block: `M  CHG` supersedes *all* legacy atom-block charges, per the CTFile spec
        let mut charges: Vec<(usize, i8)> = Vec::new();
        for (_, text) in lines {
            if text.starts_with("M  END") {
                break;
            }
            if text.starts_with("M  CHG") {
                charges.extend(charge_properties(text));
            }
        }
        if !charges.is_empty() {
            for atom in &mut atoms {
                atom.charge = 0;
            }
            for (index, charge) in charges {
                if let Some(atom) = atoms.get_mut(index) {
                    atom.charge = charge;
                }
            }
        }

        Ok(Self {
            name,
            atoms,
            bonds,
            layout: None,
        })
    }
}

fn parse_trimmed_usize(s: &str) -> Result<usize, std::num::ParseIntError> {
    s.trim().parse()
}

fn fixed_usize(width: usize) -> impl FnMut(&str) -> IResult<&str, usize> {
    move |i: &str| map_res(take(width), parse_trimmed_usize)(i)
}

/// counts line = atom count (3) , bond count (3) , ... ;
fn counts(i: &str) -> IResult<&str, (usize, usize)> {
    let (i, atoms) = fixed_usize(3)(i)?;
    let (i, bonds) = fixed_usize(3)(i)?;
    Ok((i, (atoms, bonds)))
}

/// atom line = x (10) , y (10) , z (10) , " " , symbol (3) , [ mass diff (2) , [ charge code (3) ] ] , ... ;
fn atom_line(i: &str) -> IResult<&str, (&str, i8)> {
    let (i, _coordinates) = take(30usize)(i)?;
    let (i, _) = take(1usize)(i)?;
    let (i, symbol) = map_res(take(3usize), |s: &str| {
        let s = s.trim();
        if s.is_empty() { Err(()) } else { Ok(s) }
    })(i)?;
    // The legacy charge column is optional and often absent; default to neutral
    let charge = i
        .get(2..5)
        .and_then(|c| c.trim().parse().ok())
        .map_or(0, legacy_charge);
    Ok((i, (symbol, charge)))
}

// The legacy atom-block charge column is an enumeration, not a signed value
const fn legacy_charge(code: u8) -> i8 {
    match code {
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        // 4 is a doublet radical, which carries no charge
        _ => 0,
    }
}

/// bond line = first atom (3) , second atom (3) , bond type (3) , ... ;
fn bond_line(i: &str) -> IResult<&str, (usize, usize, BondOrder)> {
    let (i, a) = fixed_usize(3)(i)?;
    let (i, b) = fixed_usize(3)(i)?;
    let (i, order) = map_res(take(3usize), |s: &str| match s.trim() {
        "1" => Ok(BondOrder::Single),
        "2" => Ok(BondOrder::Double),
        "3" => Ok(BondOrder::Triple),
        "4" => Ok(BondOrder::Aromatic),
        _ => Err(()),
    })(i)?;
    Ok((i, (a, b, order)))
}

/// `M  CHG  n aaa vvv aaa vvv ...` (atom numbers are 1-based in the file)
fn charge_properties(line: &str) -> Vec<(usize, i8)> {
    let fields: Vec<_> = line.split_whitespace().skip(2).collect();
    let Some(count) = fields.first().and_then(|n| n.parse::<usize>().ok()) else {
        return Vec::new();
    };
    fields[1..]
        .chunks_exact(2)
        .take(count)
        .filter_map(|pair| {
            let atom: usize = pair[0].parse().ok()?;
            let charge: i8 = pair[1].parse().ok()?;
            Some((atom.checked_sub(1)?, charge))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const ETHANOL: &str = indoc! {r"
        ethanol
          nmrx
        heavy atoms only
          3  2  0  0  0  0  0  0  0  0999 V2000
            0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
            1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
            2.2500    1.2990    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
          1  2  1  0  0  0  0
          2  3  1  0  0  0  0
        M  END
    "};

    #[test]
    fn parses_ethanol() {
        let mol = Molecule::from_molfile(ETHANOL).unwrap();
        assert_eq!(mol.name(), "ethanol");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms()[0].element, Element::CARBON);
        assert_eq!(mol.atoms()[2].element, Element::from_symbol("O").unwrap());
        assert_eq!(
            mol.bonds()[1],
            Bond {
                a: 1,
                b: 2,
                order: BondOrder::Single
            }
        );
        // Input coordinates are discarded
        assert_eq!(mol.layout(), None);
    }

    #[test]
    fn charge_property_supersedes_legacy_column() {
        let acetate = indoc! {r"
            acetate
              nmrx

              4  3  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                2.2500    1.2990    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0
                2.2500   -1.2990    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
              2  3  1  0  0  0  0
              2  4  2  0  0  0  0
            M  CHG  1   3  -1
            M  END
        "};
        let mol = Molecule::from_molfile(acetate).unwrap();
        assert_eq!(mol.atoms()[2].charge, -1);
        // `M  CHG` resets every atom the property block doesn't mention
        assert_eq!(mol.atoms()[0].charge, 0);
    }

    #[test]
    fn legacy_charge_column_applies_without_property_block() {
        let methanolate = indoc! {r"
            methanolate
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0
              1  2  1  0  0  0  0
            M  END
        "};
        let mol = Molecule::from_molfile(methanolate).unwrap();
        assert_eq!(mol.atoms()[1].charge, -1);
    }

    #[test]
    fn rejects_empty_structures() {
        let empty = indoc! {r"
            nothing
              nmrx

              0  0  0  0  0  0  0  0  0  0999 V2000
            M  END
        "};
        assert_eq!(Molecule::from_molfile(empty), Err(MolfileError::NoAtoms));
    }

    #[test]
    fn rejects_v3000() {
        let v3000 = indoc! {r"
            modern
              nmrx

              0  0  0  0  0  0  0  0  0  0999 V3000
            M  END
        "};
        assert_eq!(Molecule::from_molfile(v3000), Err(MolfileError::V3000));
    }

    #[test]
    fn rejects_truncated_atom_block() {
        let truncated = indoc! {r"
            cut short
              nmrx

              3  2  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
        "};
        assert_eq!(
            Molecule::from_molfile(truncated),
            Err(MolfileError::Truncated("atom"))
        );
    }

    #[test]
    fn rejects_unknown_elements() {
        let bogus = indoc! {r"
            bogus
              nmrx

              1  0  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 Xx  0  0  0  0  0  0  0  0  0  0  0  0
            M  END
        "};
        assert_eq!(
            Molecule::from_molfile(bogus),
            Err(MolfileError::UnknownElement {
                line: 5,
                symbol: "Xx".to_owned()
            })
        );
    }

    #[test]
    fn rejects_out_of_range_bonds() {
        let dangling = indoc! {r"
            dangling
              nmrx

              2  1  0  0  0  0  0  0  0  0999 V2000
                0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
                1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
              1  3  1  0  0  0  0
            M  END
        "};
        assert_eq!(
            Molecule::from_molfile(dangling),
            Err(MolfileError::BondOutOfRange {
                index: 1,
                atom: 3,
                atom_count: 2
            })
        );
    }

    #[test]
    fn rejects_garbage_counts() {
        let garbage = "junk\n\n\nnot a counts line\n";
        assert!(matches!(
            Molecule::from_molfile(garbage),
            Err(MolfileError::CountsLine { line: 4, .. })
        ));
    }

    #[test]
    fn error_reports_render() {
        let report = miette::Report::new(MolfileError::UnknownElement {
            line: 5,
            symbol: "Xx".to_owned(),
        });
        insta::assert_snapshot!(format!("{report}"), @r#"line 5: the element symbol "Xx" was not recognized"#);
    }
}
