//! Vets and normalizes exchange submission records before downstream storage
//!
//! Validation is rule-table-driven: which fields must be present and non-null depends on where a record came from
//! (`submission.source`) and what kind of deposition it is (`submission.type`). A record that breaks a rule is
//! reported, never repaired, and one broken record never aborts the rest of the batch.

pub mod paths;
mod standardize;

// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

pub use standardize::{Coercion, CoercionIssue, standardize};

// Fields every deposition-system record must carry, regardless of type
const DEPOSITION_ALWAYS_NON_NULL: &[&str] = &[
    "smiles",
    "inchikey",
    "submission.type",
    "submission.uuid",
    "submission.compound_uuid",
    "submission.submission_date",
    "submission.embargo_status",
    "depositor_info.email",
    "depositor_info.show_email_in_attribution",
    "depositor_info.show_name_in_attribution",
    "depositor_info.show_organization_in_attribution",
    "depositor_info.account_id",
];

const PUBLISHED_ARTICLE_NON_NULL: &[&str] = &["citation.doi|citation.pmid|citation.pii"];

const PURIFIED_IN_HOUSE_NON_NULL: &[&str] = &["compound_name", "origin.species", "origin.genus"];

const COMMERCIAL_NON_NULL: &[&str] = &[
    "origin.private_collection.commercial.supplier",
    "origin.private_collection.commercial.cas_number",
];

const COMPOUND_LIBRARY_NON_NULL: &[&str] =
    &["origin.private_collection.compound_library.library_name"];

const OTHER_SOURCE_NON_NULL: &[&str] = &[
    "origin.private_collection.other.user_specified_compound_source",
    "compound_name",
    "origin.species",
    "origin.genus",
];

static ACCESSION_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^NP\d{7}$").unwrap());
static INCHIKEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{14}-[A-Z]{10}-[A-Z]$").unwrap());

/// The vetting outcome for one record of a batch.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct RecordReport {
    pub index: usize,
    pub inchikey: Option<String>,
    pub source: Option<String>,
    pub submission_type: Option<String>,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Display for RecordReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inchikey = self.inchikey.as_deref().unwrap_or("<no inchikey>");
        if self.valid {
            write!(f, "record {} ({inchikey}): valid", self.index)
        } else {
            write!(
                f,
                "record {} ({inchikey}): invalid: {}",
                self.index,
                self.errors.iter().join("; ")
            )
        }
    }
}

/// Validates every record of a batch against the rule set selected by its submission source and type.
#[must_use]
pub fn validate(records: &[Value]) -> Vec<RecordReport> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| check_record(index, record))
        .collect()
}

fn check_record(index: usize, record: &Value) -> RecordReport {
    let mut errors = Vec::new();

    if let Some(accession) = paths::lookup_str(record, "npmrd_id") {
        if !ACCESSION_ID.is_match(accession) {
            errors.push(format!("invalid NP-MRD ID {accession:?}"));
        }
    }
    if let Some(inchikey) = paths::lookup_str(record, "inchikey") {
        if !INCHIKEY.is_match(inchikey) {
            errors.push(format!("malformed InChIKey {inchikey:?}"));
        }
    }

    let source = paths::lookup_str(record, "submission.source");
    match source {
        Some("deposition_system") => check_deposition_system(record, &mut errors),
        // The DFT pipeline produces its records mechanically, so there is nothing beyond the universal checks
        Some("dft_team") => {}
        Some(other) => errors.push(format!("invalid submission source {other:?}")),
        None => errors.push("submission.source is not in record or is null".to_owned()),
    }

    RecordReport {
        index,
        inchikey: paths::lookup_str(record, "inchikey").map(str::to_owned),
        source: source.map(str::to_owned),
        submission_type: paths::lookup_str(record, "submission.type").map(str::to_owned),
        valid: errors.is_empty(),
        errors,
    }
}

fn check_deposition_system(record: &Value, errors: &mut Vec<String>) {
    require_non_null(record, DEPOSITION_ALWAYS_NON_NULL, errors);

    match paths::lookup_str(record, "submission.type") {
        Some("published_article") => require_non_null(record, PUBLISHED_ARTICLE_NON_NULL, errors),
        Some("presubmission_article") => {}
        Some("private_deposition") => check_private_deposition(record, errors),
        _ => {}
    }

    if paths::lookup_str(record, "submission.embargo_status") == Some("embargo_until_date") {
        require_non_null(record, &["submission.embargo_date"], errors);
    }

    if paths::lookup(record, "depositor_info.show_name_in_attribution") == Some(&Value::Bool(true))
    {
        require_non_null(record, &["depositor_info.attribution_name"], errors);
    }
    if paths::lookup(record, "depositor_info.show_organization_in_attribution")
        == Some(&Value::Bool(true))
    {
        require_non_null(record, &["depositor_info.attribution_organization"], errors);
    }
}

fn check_private_deposition(record: &Value, errors: &mut Vec<String>) {
    require_non_null(
        record,
        &["origin.private_collection.compound_source_type"],
        errors,
    );

    let rules = match paths::lookup_str(record, "origin.private_collection.compound_source_type") {
        Some("purified_in_house") => PURIFIED_IN_HOUSE_NON_NULL,
        Some("commercial") => COMMERCIAL_NON_NULL,
        Some("compound_library") => COMPOUND_LIBRARY_NON_NULL,
        Some("other") => OTHER_SOURCE_NON_NULL,
        _ => return,
    };
    require_non_null(record, rules, errors);
}

fn require_non_null(record: &Value, fields: &[&str], errors: &mut Vec<String>) {
    for field in fields {
        if !paths::any_present(record, field) {
            errors.push(format!("{field} is not in record or is null"));
        }
    }
}
