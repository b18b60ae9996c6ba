//! Trigger words per problem category.
//!
//! The built-in table can be extended once, at construction, from a mapping
//! `category name -> [extra words]`, either in memory or as TOML text:
//!
//! ```toml
//! [keywords]
//! quadratic = ["parabola", "second order"]
//! system = ["simultaneously"]
//! ```
//!
//! The table is immutable afterwards.
use crate::text_processing::classifier::ProblemType;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum KeywordConfigError {
    /// the text is not valid TOML
    Toml(String),
    /// a category maps to something other than a list of strings
    InvalidEntry { category: String, reason: String },
}

impl fmt::Display for KeywordConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeywordConfigError::Toml(msg) => write!(f, "invalid keyword configuration: {}", msg),
            KeywordConfigError::InvalidEntry { category, reason } => {
                write!(f, "invalid keyword list for '{}': {}", category, reason)
            }
        }
    }
}

impl std::error::Error for KeywordConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    words: BTreeMap<ProblemType, Vec<String>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `needle` occurs in `text` with no letter or digit directly around it
fn contains_word(text: &str, needle: &str) -> bool {
    text.match_indices(needle).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

impl KeywordTable {
    pub fn builtin() -> Self {
        let mut words = BTreeMap::new();
        words.insert(
            ProblemType::System,
            vec!["system", "simultaneous", "both", "together"],
        );
        words.insert(
            ProblemType::Quadratic,
            vec!["quadratic", "second degree", "squared"],
        );
        words.insert(
            ProblemType::Linear,
            vec!["linear", "first degree", "simple equation"],
        );
        KeywordTable {
            words: words
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().map(String::from).collect()))
                .collect(),
        }
    }

    /// Built-in table extended with `extra`. Unknown categories are skipped with a warning.
    pub fn with_additional(extra: &HashMap<String, Vec<String>>) -> Self {
        let mut table = Self::builtin();
        for (category, words) in extra {
            table.merge_category(category, words);
        }
        table
    }

    /// Built-in table extended from TOML text, either under a `[keywords]` table or as
    /// top-level keys.
    pub fn from_toml_str(text: &str) -> Result<Self, KeywordConfigError> {
        let mut document = text
            .parse::<toml::Table>()
            .map_err(|e| KeywordConfigError::Toml(e.to_string()))?;
        let section = match document.remove("keywords") {
            Some(toml::Value::Table(inner)) => inner,
            Some(other) => {
                document.insert("keywords".to_string(), other);
                document
            }
            None => document,
        };
        let mut extra = HashMap::new();
        for (category, value) in section {
            let toml::Value::Array(items) = value else {
                return Err(KeywordConfigError::InvalidEntry {
                    category,
                    reason: "expected a list of words".to_string(),
                });
            };
            let mut words = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(word) => words.push(word.to_string()),
                    None => {
                        return Err(KeywordConfigError::InvalidEntry {
                            category,
                            reason: format!("'{}' is not a string", item),
                        });
                    }
                }
            }
            extra.insert(category, words);
        }
        Ok(Self::with_additional(&extra))
    }

    fn merge_category(&mut self, category: &str, extra: &[String]) {
        let problem_type = match ProblemType::from_str(category.trim()) {
            Ok(ProblemType::Unknown) | Err(_) => {
                warn!("keyword category '{}' is unknown, skipped", category);
                return;
            }
            Ok(problem_type) => problem_type,
        };
        let words = self.words.entry(problem_type).or_default();
        for word in extra {
            let word = word.trim().to_lowercase();
            if !word.is_empty() && !words.contains(&word) {
                debug!("keyword '{}' added to {}", word, problem_type);
                words.push(word);
            }
        }
    }

    pub fn words(&self, category: ProblemType) -> &[String] {
        self.words.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// trigger words of `category` found in `text`, in table order
    pub fn matches(&self, category: ProblemType, text: &str) -> Vec<String> {
        self.words(category)
            .iter()
            .filter(|word| contains_word(text, word))
            .cloned()
            .collect()
    }

    /// matched trigger words for every category with at least one hit
    pub fn extract(&self, text: &str) -> BTreeMap<ProblemType, Vec<String>> {
        self.words
            .keys()
            .filter_map(|category| {
                let found = self.matches(*category, text);
                (!found.is_empty()).then_some((*category, found))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_matches_whole_words() {
        let table = KeywordTable::builtin();
        assert_eq!(
            table.matches(ProblemType::Quadratic, "solve the quadratic x^2 = 4"),
            vec!["quadratic"]
        );
        assert!(table.matches(ProblemType::System, "ecosystem of x").is_empty());
        assert_eq!(
            table.matches(ProblemType::Linear, "a simple equation: x = 1"),
            vec!["simple equation"]
        );
    }

    #[test]
    fn test_extract() {
        let table = KeywordTable::builtin();
        let found = table.extract("solve both equations, the linear system");
        assert_eq!(found[&ProblemType::System], vec!["system", "both"]);
        assert_eq!(found[&ProblemType::Linear], vec!["linear"]);
        assert!(!found.contains_key(&ProblemType::Quadratic));
    }

    #[test]
    fn test_with_additional() {
        let mut extra = HashMap::new();
        extra.insert("quadratic".to_string(), vec!["Parabola".to_string()]);
        extra.insert("geometry".to_string(), vec!["triangle".to_string()]);
        let table = KeywordTable::with_additional(&extra);
        assert!(table.words(ProblemType::Quadratic).contains(&"parabola".to_string()));
        assert_eq!(table.words(ProblemType::System), KeywordTable::builtin().words(ProblemType::System));
    }

    #[test]
    fn test_from_toml_str() {
        let text = r#"
            [keywords]
            quadratic = ["parabola"]
            system = ["simultaneously", "pair of equations"]
        "#;
        let table = KeywordTable::from_toml_str(text).unwrap();
        assert!(!table.matches(ProblemType::Quadratic, "the parabola x^2 = 4").is_empty());
        assert!(!table.matches(ProblemType::System, "a pair of equations").is_empty());

        let top_level = KeywordTable::from_toml_str("linear = [\"straight line\"]").unwrap();
        assert!(!top_level.matches(ProblemType::Linear, "a straight line").is_empty());

        let empty = KeywordTable::from_toml_str("").unwrap();
        assert_eq!(empty, KeywordTable::builtin());
    }

    #[test]
    fn test_from_toml_str_errors() {
        assert!(matches!(
            KeywordTable::from_toml_str("quadratic = "),
            Err(KeywordConfigError::Toml(_))
        ));
        assert!(matches!(
            KeywordTable::from_toml_str("quadratic = \"parabola\""),
            Err(KeywordConfigError::InvalidEntry { .. })
        ));
        assert!(matches!(
            KeywordTable::from_toml_str("quadratic = [1, 2]"),
            Err(KeywordConfigError::InvalidEntry { .. })
        ));
    }
}
