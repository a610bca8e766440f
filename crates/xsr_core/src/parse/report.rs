//! Assembly report parser.
//!
//! # Responsibility
//! - Walk classified lines keeping the "current assembly" state.
//! - Build assembly records and per-assembly part rows, expanded into
//!   instances and fed through the part registry.
//!
//! # Invariants
//! - Parsing never fails; malformed lines are dropped and logged at debug.
//! - Every part row carries exactly `assembly.qty` instances for its assembly.
//! - Part identifiers never contain `/`.

use crate::model::part::{Assembly, AssemblyId, Part};
use crate::parse::line::{
    classify, extract_total_weight, parse_assembly_header, split_columns, LineKind,
};
use crate::registry::expander::InstanceExpander;
use crate::registry::part_registry::PartRegistry;
use crate::registry::template::TaskTemplate;
use log::{debug, info};
use std::collections::BTreeMap;

const MIN_PART_COLUMNS: usize = 4;
const HEADER_SENTINELS: &[&str] = &["Assembly", "No."];

/// Result of parsing one assembly report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReport {
    pub assemblies: BTreeMap<AssemblyId, Assembly>,
    /// Registry-merged parts, first-sighting order.
    pub parts: Vec<Part>,
    /// Gross weight from the `Total:` line, `0.0` when absent.
    pub total_kg: f64,
}

/// Line-by-line parser for the assembly grammar.
pub struct ReportParser<'t> {
    expander: InstanceExpander<'t>,
    current_assembly: Option<AssemblyId>,
    assemblies: BTreeMap<AssemblyId, Assembly>,
    registry: PartRegistry,
    dropped_lines: usize,
}

impl<'t> ReportParser<'t> {
    pub fn new(template: &'t TaskTemplate) -> Self {
        Self {
            expander: InstanceExpander::new(template),
            current_assembly: None,
            assemblies: BTreeMap::new(),
            registry: PartRegistry::new(),
            dropped_lines: 0,
        }
    }

    /// Parses a whole report.
    pub fn parse(template: &'t TaskTemplate, text: &str) -> ParsedReport {
        let mut parser = Self::new(template);
        for (line_no, line) in text.lines().enumerate() {
            parser.feed_line(line_no + 1, line);
        }
        parser.finish(extract_total_weight(text).unwrap_or(0.0))
    }

    /// Assembly id parts are currently attributed to.
    pub fn current_assembly(&self) -> Option<&str> {
        self.current_assembly.as_deref()
    }

    /// Consumes one physical line.
    pub fn feed_line(&mut self, line_no: usize, line: &str) {
        match classify(line, self.current_assembly.is_some()) {
            LineKind::AssemblyHeader => self.open_assembly(line),
            LineKind::PartDetail => self.add_part_line(line_no, line),
            _ => {}
        }
    }

    /// Finishes parsing with the report's gross weight.
    pub fn finish(self, total_kg: f64) -> ParsedReport {
        let report = ParsedReport {
            assemblies: self.assemblies,
            parts: self.registry.into_parts(),
            total_kg,
        };
        info!(
            "event=report_parsed module=parse assemblies={} parts={} dropped_lines={} total_kg={}",
            report.assemblies.len(),
            report.parts.len(),
            self.dropped_lines,
            report.total_kg
        );
        report
    }

    fn open_assembly(&mut self, line: &str) {
        let Some(header) = parse_assembly_header(line) else {
            return;
        };
        self.assemblies
            .entry(header.assembly_id.clone())
            .or_insert_with(|| Assembly::new(header.qty, header.weight_kg));
        self.current_assembly = Some(header.assembly_id);
    }

    fn add_part_line(&mut self, line_no: usize, line: &str) {
        let Some(assembly_id) = self.current_assembly.clone() else {
            return;
        };
        let Some(assembly) = self.assemblies.get_mut(&assembly_id) else {
            return;
        };

        let Some(mut part) = part_from_columns(&split_columns(line), assembly.qty) else {
            self.dropped_lines += 1;
            debug!("event=line_dropped module=parse line={line_no} assembly={assembly_id}");
            return;
        };
        part.assembly_instances
            .insert(assembly_id, self.expander.expand(assembly.qty));

        assembly.parts.push(part.clone());
        self.registry.register(part);
    }
}

/// Parses an assembly report with the given task template.
pub fn parse_report(text: &str, template: &TaskTemplate) -> ParsedReport {
    ReportParser::parse(template, text)
}

/// Builds a part row from its columns, or `None` for header and short rows.
///
/// Column layout is `part, count, profile, ...`; the count column is not used
/// because every part is tracked per assembly copy. The remaining columns
/// depend on how many were printed:
/// - 6: grade, length, weight
/// - 5: length, weight
/// - 4: weight
fn part_from_columns(columns: &[&str], assembly_qty: u32) -> Option<Part> {
    if columns.len() < MIN_PART_COLUMNS {
        return None;
    }
    if HEADER_SENTINELS.contains(&columns[0]) || columns[2] == "No." {
        return None;
    }

    let mut part = Part::new(columns[0].replace('/', "-"), assembly_qty);
    part.profile = columns[2].to_string();
    match columns.len() {
        6 => {
            part.grade = columns[3].to_string();
            part.length_mm = columns[4].to_string();
            part.weight_kg = columns[5].to_string();
        }
        5 => {
            part.length_mm = columns[3].to_string();
            part.weight_kg = columns[4].to_string();
        }
        4 => {
            part.weight_kg = columns[3].to_string();
        }
        _ => {}
    }
    Some(part)
}
