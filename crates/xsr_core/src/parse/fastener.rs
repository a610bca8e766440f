//! Fastener report parser.
//!
//! Stateless across lines: every physical line is matched on its own and
//! lands in one of three flat lists. Unmatched lines are ignored.

use crate::model::fastener::{Fastener, FastenerKind};
use crate::parse::line::parse_fastener_line;
use log::info;

/// Bolt, nut and washer bills from one fastener report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastenerReport {
    pub bolts: Vec<Fastener>,
    pub nuts: Vec<Fastener>,
    pub washers: Vec<Fastener>,
}

impl FastenerReport {
    pub fn len(&self) -> usize {
        self.bolts.len() + self.nuts.len() + self.washers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses every bolt, nut and washer line in `text`.
pub fn parse_fasteners(text: &str) -> FastenerReport {
    let mut report = FastenerReport::default();
    for matched in text.lines().filter_map(parse_fastener_line) {
        let list = match matched.kind {
            FastenerKind::Bolt => &mut report.bolts,
            FastenerKind::Nut => &mut report.nuts,
            FastenerKind::Washer => &mut report.washers,
        };
        list.push(matched.fastener);
    }
    info!(
        "event=fasteners_parsed module=parse bolts={} nuts={} washers={}",
        report.bolts.len(),
        report.nuts.len(),
        report.washers.len()
    );
    report
}
