//! Category vocabulary.
//!
//! Categories are coded in order of first appearance in the history, not
//! alphabetically. Priority and mood never go through a vocabulary; they
//! use the fixed codes on [`Priority`](crate::Priority) and
//! [`Mood`](crate::Mood).

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Mapping from category string to integer code.
///
/// Fit once per history snapshot and reused for every encode against that
/// snapshot. Refitting on a different corpus changes what the codes mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    /// Categories in code order
    categories: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, u32>,
}

impl Vocabulary {
    /// Assign each distinct value the next unused code, in first-seen order.
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::default();
        for value in values {
            let value = value.as_ref();
            if !vocabulary.codes.contains_key(value) {
                let code = vocabulary.categories.len() as u32;
                vocabulary.codes.insert(value.to_string(), code);
                vocabulary.categories.push(value.to_string());
            }
        }
        vocabulary
    }

    /// Code assigned to `value`.
    pub fn encode(&self, value: &str) -> Result<u32> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| Error::UnknownCategory(value.to_string()))
    }

    /// Category for a code, if assigned.
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.categories.get(code as usize).map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }

    /// Categories in code order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observed_order() {
        let vocabulary = Vocabulary::fit(["Work", "Study", "Work"]);
        assert_eq!(vocabulary.encode("Work").unwrap(), 0);
        assert_eq!(vocabulary.encode("Study").unwrap(), 1);
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_not_alphabetical() {
        let vocabulary = Vocabulary::fit(["Personal", "Health", "Admin"]);
        assert_eq!(vocabulary.categories(), &["Personal", "Health", "Admin"]);
        assert_eq!(vocabulary.encode("Admin").unwrap(), 2);
    }

    #[test]
    fn test_unknown_category() {
        let vocabulary = Vocabulary::fit(["Work", "Study", "Work"]);
        let err = vocabulary.encode("Unknown").unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(ref c) if c == "Unknown"));
    }

    #[test]
    fn test_encode_is_case_sensitive() {
        let vocabulary = Vocabulary::fit(["Work"]);
        assert!(vocabulary.encode("work").is_err());
    }

    #[test]
    fn test_decode() {
        let vocabulary = Vocabulary::fit(vec!["Work".to_string(), "Study".to_string()]);
        assert_eq!(vocabulary.decode(1), Some("Study"));
        assert_eq!(vocabulary.decode(2), None);
    }

    #[test]
    fn test_empty() {
        let vocabulary = Vocabulary::fit(Vec::<String>::new());
        assert!(vocabulary.is_empty());
        assert!(!vocabulary.contains("Work"));
    }
}
