//! Storage-field to exposed-property naming.
//!
//! `_count` exposes property `Count`, read through `count()`, written through
//! `set_count()` and, when requested, announced through `count_changed`.

use convert_case::{Case, Casing};

// Keywords that cannot be written as raw identifiers either.
const UNUSABLE: [&str; 5] = ["_", "crate", "self", "Self", "super"];

/// Exposed (PascalCase) property name for a storage field identifier.
#[must_use]
pub fn exposed_name(field: &str) -> String {
    let field = field.strip_prefix("r#").unwrap_or(field);

    field.to_case(Case::Pascal)
}

/// Getter method name for an exposed property name.
#[must_use]
pub fn getter_name(exposed: &str) -> String {
    exposed.to_case(Case::Snake)
}

#[must_use]
pub fn setter_name(exposed: &str) -> String {
    format!("set_{}", getter_name(exposed))
}

/// Stem of the per-property event (`count_changed`).
#[must_use]
pub fn event_name(exposed: &str) -> String {
    format!("{}_changed", getter_name(exposed))
}

/// Whether an exposed name yields usable member identifiers.
#[must_use]
pub fn is_usable(exposed: &str) -> bool {
    let getter = getter_name(exposed);

    getter.chars().next().is_some_and(char::is_alphabetic)
        && getter.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !UNUSABLE.contains(&getter.as_str())
}

///
/// TESTS
///
