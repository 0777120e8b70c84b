//! Selector option lists shown to students and enforced on admin writes.

/// Placeholder a client sends for a selector the user has not picked yet.
pub const UNSET: &str = "--";

pub const BRANCHES: &[&str] = &[
    "CSE",
    "CSE AI",
    "CSE AI & ML",
    "CSE DS",
    "CSE CYB",
    "IT",
    "ECE",
    "EEE",
    "Mech",
    "Civil",
];

pub const REGULATIONS: &[&str] = &["R19", "R20", "R23"];

pub const YEARS: &[&str] = &["1st Year", "2nd Year", "3rd Year", "4th Year"];

pub const SEMESTERS: &[&str] = &["1 Semester", "2 Semester"];

pub const PAPER_TYPES: &[&str] = &["Regular", "Supplementary"];

pub const UNITS: &[&str] = &[
    "1st Unit",
    "2nd Unit",
    "3(A) Unit",
    "3(B) Unit",
    "4th Unit",
    "5th Unit",
];

/// Returns true when a selector value is absent, blank or the unset placeholder.
#[must_use]
pub fn is_unset(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v == UNSET,
    }
}

/// Paper types are stored lower-cased ("regular", "supplementary").
#[must_use]
pub fn normalize_paper_type(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Capitalizes the first letter of every alphabetic run and lower-cases the rest.
///
/// Subject names are stored in this form so "data STRUCTURES" and
/// "Data Structures" collide in the duplicate check.
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alpha = false;
    for c in value.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
