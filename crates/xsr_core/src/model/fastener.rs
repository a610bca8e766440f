//! Bolt, nut and washer bill records.

use serde::{Deserialize, Serialize};

/// Fastener family recognised by the fastener report grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastenerKind {
    Bolt,
    Nut,
    Washer,
}

impl FastenerKind {
    /// Placeholder display name attached to every parsed record.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Bolt => "UNDEFINED_BOL",
            Self::Nut => "UNDEFINED_NUT",
            Self::Washer => "UNDEFINED_WASHER",
        }
    }
}

/// One fastener line. Flat record, never instance-expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fastener {
    /// Canonical size, e.g. `M20.0X60.0`, `M20.0` or `20.0mm`.
    pub size: String,
    #[serde(rename = "qty", with = "crate::model::wire::qty")]
    pub quantity: u32,
    pub name: String,
}

impl Fastener {
    pub fn new(kind: FastenerKind, size: impl Into<String>, quantity: u32) -> Self {
        Self {
            size: size.into(),
            quantity,
            name: kind.default_name().to_string(),
        }
    }
}
