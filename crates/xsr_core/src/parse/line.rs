//! Line classification for XSR assembly and fastener reports.
//!
//! # Responsibility
//! - Decide what each physical report line is.
//! - Split column-aligned lines into tokens.
//! - Extract the fields of assembly header and fastener lines.
//!
//! # Invariants
//! - Classification never fails; anything unrecognised is `Noise`.
//! - Columns are separated by runs of two or more whitespace characters or
//!   by tabs, so single spaces inside a column are kept.

use crate::model::fastener::{Fastener, FastenerKind};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static COLUMN_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\t+").expect("valid column separator regex"));
static ASSEMBLY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-ZÇŞĞİÖÜ0-9]+/\d+)\s+(\d+)").expect("valid assembly header regex")
});
static TOTAL_WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total:\s*(\d+\.?\d*)").expect("valid total weight regex"));
static REPORT_NOISE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^TEKLA STRUCTURES",
        r"(?i)^TITLE:",
        r"(?i)^Page:\s*\d+",
        r"(?i)^Date:",
        r"(?i)^PHASE:",
        r"(?i)^Contract No:",
        r"^-+$",
        r"(?i)^Standard\s+Site/Shop",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid report noise regex"))
    .collect()
});
static BOLT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"BOLT\s+(\d+\.\d+)\s+X\s+(\d+\.\d+)\s+(\d+)").expect("valid bolt regex")
});
static NUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"NUT\s+(\d+\.\d+)\s+(\d+)").expect("valid nut regex"));
static WASHER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"WASHER\s+(\d+\.\d+)\s+(\d+)").expect("valid washer regex"));

/// Boilerplate fragments that disqualify a line from the fastener grammar.
const FASTENER_NOISE_FRAGMENTS: &[&str] = &[
    "Tekla Structures",
    "PROJECT NUMBER",
    "TITLE",
    "PHASE",
    "Date",
    "Standard",
    "Site/Shop",
];

/// What one physical report line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Noise,
    AssemblyHeader,
    PartDetail,
    BoltLine,
    NutLine,
    WasherLine,
}

/// Fields of an assembly header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyHeader {
    /// `CODE/NUMBER` as printed.
    pub assembly_id: String,
    /// Declared copies; `0` or unreadable values fall back to `1`.
    pub qty: u32,
    /// Last column of the line, kept verbatim.
    pub weight_kg: String,
}

/// One recognised fastener line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastenerLine {
    pub kind: FastenerKind,
    pub fastener: Fastener,
}

/// Splits a line into columns after trimming it.
pub fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_SEPARATOR_RE
        .split(line.trim())
        .filter(|column| !column.is_empty())
        .collect()
}

/// Returns whether a line is blank or report boilerplate in the assembly
/// grammar.
pub fn is_report_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || REPORT_NOISE_RES.iter().any(|re| re.is_match(trimmed))
}

/// Extracts assembly header fields, or `None` for any other line.
///
/// A header starts with `CODE/NUMBER` followed by an integer quantity and has
/// at least two columns.
pub fn parse_assembly_header(line: &str) -> Option<AssemblyHeader> {
    let trimmed = line.trim();
    let columns = split_columns(trimmed);
    if columns.len() < 2 {
        return None;
    }
    let caps = ASSEMBLY_HEADER_RE.captures(trimmed)?;
    let qty = caps[2]
        .parse::<u32>()
        .ok()
        .filter(|qty| *qty > 0)
        .unwrap_or(1);
    Some(AssemblyHeader {
        assembly_id: caps[1].to_string(),
        qty,
        weight_kg: columns.last().map(|value| value.to_string()).unwrap_or_default(),
    })
}

/// Classifies one line of the assembly grammar.
///
/// `in_assembly` tells whether an assembly header has been seen already; only
/// then can a line be a part detail. Lines whose first column starts with
/// `total` are summary rows and count as noise.
pub fn classify(line: &str, in_assembly: bool) -> LineKind {
    if is_report_noise(line) {
        return LineKind::Noise;
    }
    if parse_assembly_header(line).is_some() {
        return LineKind::AssemblyHeader;
    }
    if !in_assembly {
        return LineKind::Noise;
    }
    let is_total_row = split_columns(line)
        .first()
        .is_some_and(|first| first.to_lowercase().starts_with("total"));
    if is_total_row {
        LineKind::Noise
    } else {
        LineKind::PartDetail
    }
}

/// Extracts the project gross weight from the first `Total: <number>`.
pub fn extract_total_weight(text: &str) -> Option<f64> {
    TOTAL_WEIGHT_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Matches one line against the fastener grammar.
///
/// Bolt is tried before nut and washer. Boilerplate lines never match.
pub fn parse_fastener_line(line: &str) -> Option<FastenerLine> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("---")
        || FASTENER_NOISE_FRAGMENTS
            .iter()
            .any(|fragment| trimmed.contains(fragment))
    {
        return None;
    }

    if let Some(caps) = BOLT_RE.captures(trimmed) {
        let quantity = fastener_quantity(&caps[3], trimmed)?;
        return Some(FastenerLine {
            kind: FastenerKind::Bolt,
            fastener: Fastener::new(
                FastenerKind::Bolt,
                format!("M{}X{}", &caps[1], &caps[2]),
                quantity,
            ),
        });
    }
    if let Some(caps) = NUT_RE.captures(trimmed) {
        let quantity = fastener_quantity(&caps[2], trimmed)?;
        return Some(FastenerLine {
            kind: FastenerKind::Nut,
            fastener: Fastener::new(FastenerKind::Nut, format!("M{}", &caps[1]), quantity),
        });
    }
    if let Some(caps) = WASHER_RE.captures(trimmed) {
        let quantity = fastener_quantity(&caps[2], trimmed)?;
        return Some(FastenerLine {
            kind: FastenerKind::Washer,
            fastener: Fastener::new(FastenerKind::Washer, format!("{}mm", &caps[1]), quantity),
        });
    }
    None
}

/// Quantity column of a matched fastener line. A count past `u32::MAX`
/// drops the line.
fn fastener_quantity(raw: &str, line: &str) -> Option<u32> {
    match raw.parse() {
        Ok(quantity) => Some(quantity),
        Err(_) => {
            debug!(
                "event=line_dropped module=parse reason=quantity_out_of_range quantity={raw} line={line:?}"
            );
            None
        }
    }
}

/// Classifies one line of the fastener grammar.
pub fn classify_fastener(line: &str) -> LineKind {
    match parse_fastener_line(line).map(|matched| matched.kind) {
        Some(FastenerKind::Bolt) => LineKind::BoltLine,
        Some(FastenerKind::Nut) => LineKind::NutLine,
        Some(FastenerKind::Washer) => LineKind::WasherLine,
        None => LineKind::Noise,
    }
}
