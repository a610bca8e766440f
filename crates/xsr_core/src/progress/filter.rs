//! Substring filter for the registry parts list.

use crate::model::part::Part;

/// Column filters; blank fields match everything.
///
/// Name, profile and grade match case-insensitively. Length and weight are
/// matched against the printed column text as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartFilter {
    pub name: String,
    pub profile: String,
    pub grade: String,
    pub length: String,
    pub weight: String,
}

impl PartFilter {
    pub fn matches(&self, part: &Part) -> bool {
        contains_ignore_case(&part.part, &self.name)
            && contains_ignore_case(&part.profile, &self.profile)
            && contains_ignore_case(&part.grade, &self.grade)
            && part.length_mm.contains(self.length.as_str())
            && part.weight_kg.contains(self.weight.as_str())
    }

    /// Returns the matching parts in input order.
    pub fn apply<'a>(&self, parts: &'a [Part]) -> Vec<&'a Part> {
        parts.iter().filter(|part| self.matches(part)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
