//! Localized Node Names
//!
//! Each node carries at most one display name per language code. Names are
//! written together with their node and never outlive it.

use crate::models::{NodeId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored display name for one `(node, language)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeName {
    pub node_id: NodeId,
    pub language: String,
    pub text: String,
}

/// Validated `language -> text` entries ready to be written alongside a new node.
///
/// Built from a caller-supplied mapping: entries with an empty text are
/// dropped, and at least one entry must remain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNodeNames {
    entries: Vec<(String, String)>,
}

impl NewNodeNames {
    /// Validate a caller-supplied mapping.
    ///
    /// # Errors
    ///
    /// - `MissingField("names")` if the mapping is empty or every text is empty
    /// - `InvalidField` if a language code is blank
    pub fn from_mapping(names: BTreeMap<String, String>) -> Result<Self, ValidationError> {
        if names.is_empty() {
            return Err(ValidationError::missing_field("names"));
        }

        let mut entries = Vec::with_capacity(names.len());
        for (language, text) in names {
            if language.trim().is_empty() {
                return Err(ValidationError::invalid_field(
                    "names",
                    "language code must not be empty",
                ));
            }
            if text.is_empty() {
                continue;
            }
            entries.push((language, text));
        }

        if entries.is_empty() {
            return Err(ValidationError::missing_field("names"));
        }

        Ok(Self { entries })
    }

    /// Raw entries, bypassing validation. Stores still enforce uniqueness.
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Collect back into a mapping
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(l, t)| (l.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_texts_are_skipped() {
        let names = NewNodeNames::from_mapping(mapping(&[("en", "Sales"), ("it", "")])).unwrap();
        assert_eq!(names.entries(), &[("en".to_string(), "Sales".to_string())]);
    }

    #[test]
    fn test_empty_mapping_is_rejected() {
        let err = NewNodeNames::from_mapping(BTreeMap::new()).unwrap_err();
        assert_eq!(err, ValidationError::missing_field("names"));
    }

    #[test]
    fn test_all_empty_texts_are_rejected() {
        let err = NewNodeNames::from_mapping(mapping(&[("en", ""), ("it", "")])).unwrap_err();
        assert_eq!(err.field(), "names");
    }

    #[test]
    fn test_blank_language_is_rejected() {
        let err = NewNodeNames::from_mapping(mapping(&[(" ", "Sales")])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { .. }));
    }
}
