//! Serde adapters for stored document fields.
//!
//! Stored projects carry quantities as decimal strings (`"qty": "24"`);
//! documents written by older tools used bare numbers. Both load.

/// `qty` fields: written as a decimal string, read from a string or a number.
pub(crate) mod qty {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub(crate) fn serialize<S>(value: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(number) => u32::try_from(number)
                .map_err(|_| de::Error::custom(format!("quantity out of range: {number}"))),
            Raw::Text(text) => parse_text(&text).map_err(de::Error::custom),
        }
    }

    /// Blank text reads as zero.
    fn parse_text(text: &str) -> Result<u32, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| format!("invalid quantity: {trimmed:?}"))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super::qty")]
        qty: u32,
    }

    #[test]
    fn qty_reads_strings_and_numbers() {
        let text: Row = serde_json::from_str(r#"{"qty": " 24 "}"#).unwrap();
        let number: Row = serde_json::from_str(r#"{"qty": 3}"#).unwrap();
        let blank: Row = serde_json::from_str(r#"{"qty": ""}"#).unwrap();
        assert_eq!(text.qty, 24);
        assert_eq!(number.qty, 3);
        assert_eq!(blank.qty, 0);
    }

    #[test]
    fn qty_rejects_garbage_and_overflow() {
        assert!(serde_json::from_str::<Row>(r#"{"qty": "two"}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"qty": 5000000000}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"qty": -1}"#).is_err());
    }

    #[test]
    fn qty_is_written_as_text() {
        let value = serde_json::to_value(Row { qty: 7 }).unwrap();
        assert_eq!(value["qty"], "7");
    }
}
