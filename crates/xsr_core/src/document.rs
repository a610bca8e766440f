//! Storage keys for externally stored part and assembly drawings.
//!
//! # Responsibility
//! - Turn uploaded drawing file names and model ids into the lookup keys the
//!   document store was written with.
//! - Map assembly ids to and from their URL-safe route form.
//!
//! # Invariants
//! - Keys are derived only from the name; no lookup happens here.
//! - Upload and lookup must go through the same function to meet.

use once_cell::sync::Lazy;
use regex::Regex;

const PDF_EXTENSION: &str = ".pdf";

static PDF_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("valid pdf suffix regex"));
static TRAILING_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*[^-]*$").expect("valid trailing segment regex"));
static DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*").expect("valid dash regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Drops the last `-`-separated segment and normalizes the extension.
///
/// `"BEAM-12 - STANDARD.pdf"` becomes `"BEAM-12.pdf"`. A name with no
/// separator only gets its extension normalized to lowercase `.pdf`.
pub fn document_file_name(name: &str) -> String {
    let stem = PDF_SUFFIX_RE.replace(name, "");
    let stem = TRAILING_SEGMENT_RE.replace(&stem, "");
    format!("{stem}{PDF_EXTENSION}")
}

/// [`document_file_name`] with whitespace, `/` and `_` removed.
///
/// `"PLATE_07.pdf"` becomes `"PLATE07.pdf"`.
pub fn compact_document_key(name: &str) -> String {
    strip_separators(&document_file_name(name), &['/', '_'])
}

/// Drawing key for a part id.
///
/// Underscores survive here; part drawings were stored without that step.
pub fn part_document_key(part_id: &str) -> String {
    let cleaned = document_file_name(&format!("{part_id}{PDF_EXTENSION}"));
    let stem = PDF_SUFFIX_RE.replace(&cleaned, "");
    format!("{}{PDF_EXTENSION}", strip_separators(&stem, &['/']))
}

/// Drawing key for an assembly id: every dash, whitespace run, `/` and `_`
/// removed, then `.pdf` appended.
///
/// `"B/12"` becomes `"B12.pdf"`.
pub fn assembly_document_key(assembly_id: &str) -> String {
    let joined = DASH_RE.replace_all(assembly_id, "");
    format!("{}{PDF_EXTENSION}", strip_separators(&joined, &['/', '_']))
}

/// URL-safe form of an assembly id (`/` becomes `-`).
pub fn route_id(assembly_id: &str) -> String {
    assembly_id.replace('/', "-")
}

/// Inverse of [`route_id`] for ids whose code part has no `-`.
pub fn assembly_id_from_route(route: &str) -> String {
    route.replace('-', "/")
}

fn strip_separators(value: &str, extra: &[char]) -> String {
    WHITESPACE_RE
        .replace_all(value, "")
        .chars()
        .filter(|ch| !extra.contains(ch))
        .collect()
}
