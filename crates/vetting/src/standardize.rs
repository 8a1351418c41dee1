//! Type-coercion rules applied to records before storage
//!
//! Upstream tools are sloppy about representations: dates arrive in half a dozen formats, controlled-vocabulary
//! strings in mixed case, measured values with instrument-grade precision. Coercions normalize in place; a value
//! that can't be coerced is reported and left alone rather than failing the batch.

// External Crate Imports
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::Serialize;
use serde_json::Value;

// Local Crate Imports
use crate::paths;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Coercion {
    /// Fold a controlled-vocabulary string to lowercase
    Lowercase,
    /// Normalize a date string to RFC 3339 with microseconds, UTC
    IsoDate,
    /// Round a numeric value to the given number of decimal places
    Round(u32),
}

struct Rule {
    path: &'static str,
    coercion: Coercion,
}

const DEPOSITION_SYSTEM_RULES: &[Rule] = &[
    Rule {
        path: "submission.submission_date",
        coercion: Coercion::IsoDate,
    },
    Rule {
        path: "submission.embargo_date",
        coercion: Coercion::IsoDate,
    },
    Rule {
        path: "submission.embargo_status",
        coercion: Coercion::Lowercase,
    },
];

// DFT records are machine-generated with dates already normalized upstream
const DFT_TEAM_RULES: &[Rule] = &[];

/// A value a rule wanted to coerce but couldn't.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CoercionIssue {
    pub record: usize,
    pub path: String,
    pub message: String,
}

/// Applies the coercion rules selected by each record's submission source, in place. Paths with no value are
/// skipped silently; values a rule can't digest are reported.
pub fn standardize(records: &mut [Value]) -> Vec<CoercionIssue> {
    let mut issues = Vec::new();
    for (index, record) in records.iter_mut().enumerate() {
        let rules = match paths::lookup_str(record, "submission.source") {
            Some("deposition_system") => DEPOSITION_SYSTEM_RULES,
            Some("dft_team") => DFT_TEAM_RULES,
            // Unknown sources are validation's problem, not standardization's
            _ => continue,
        };
        for rule in rules {
            apply(record, rule, index, &mut issues);
        }
    }
    issues
}

fn apply(record: &mut Value, rule: &Rule, index: usize, issues: &mut Vec<CoercionIssue>) {
    let Some(value) = paths::lookup_mut(record, rule.path) else {
        return;
    };

    let coerced = match rule.coercion {
        Coercion::Lowercase => value.as_str().map(|s| Value::String(s.to_lowercase())),
        Coercion::IsoDate => value
            .as_str()
            .and_then(iso_date)
            .map(Value::String),
        Coercion::Round(places) => value
            .as_f64()
            .and_then(Decimal::from_f64)
            .map(|d| d.round_dp(places))
            .and_then(|d| d.to_f64())
            .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number)),
    };

    match coerced {
        Some(coerced) => {
            if coerced != *value {
                debug!("coerced {} from {value} to {coerced}", rule.path);
                *value = coerced;
            }
        }
        None => issues.push(CoercionIssue {
            record: index,
            path: rule.path.to_owned(),
            message: format!("cannot apply {:?} to {value}", rule.coercion),
        }),
    }
}

/// Accepted input shapes, tried in order; all render as `%Y-%m-%dT%H:%M:%S%.6f+00:00`.
fn iso_date(raw: &str) -> Option<String> {
    const OUTPUT: &str = "%Y-%m-%dT%H:%M:%S%.6f+00:00";

    // SAFETY: The calls to `.unwrap()` are safe here since midnight is a valid time on every date
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap();
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(midnight))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y").map(midnight))
        .ok()?;

    Some(timestamp.format(OUTPUT).to_string())
}
