//! Dotted-path traversal of exchange records
//!
//! Rule tables address fields as `"origin.genus"`; a `|` separates alternatives where any one of several paths
//! satisfies a requirement (`"citation.doi|citation.pmid|citation.pii"`).

// External Crate Imports
use serde_json::Value;

/// The value at a dotted path, or `None` when any segment is missing or explicitly `null`.
#[must_use]
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

pub(crate) fn lookup_mut<'v>(root: &'v mut Value, path: &str) -> Option<&'v mut Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.get_mut(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// Whether at least one `|`-separated alternative is present and non-null.
#[must_use]
pub fn any_present(root: &Value, alternatives: &str) -> bool {
    alternatives
        .split('|')
        .any(|path| lookup(root, path).is_some())
}

/// The value at a dotted path as a string slice, when it is one.
#[must_use]
pub fn lookup_str<'v>(root: &'v Value, path: &str) -> Option<&'v str> {
    lookup(root, path)?.as_str()
}
