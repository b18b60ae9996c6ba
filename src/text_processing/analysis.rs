use crate::text_processing::classifier::{Classification, ProblemType};
use crate::text_processing::normalizer::NormalizedText;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([a-z])\b").expect("valid regex"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\b").expect("valid regex"));

/// variable names of `canonical` in order of first appearance
pub fn extract_variables(canonical: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for caps in VARIABLE.captures_iter(canonical) {
        let name = caps[1].to_string();
        if !variables.contains(&name) {
            variables.push(name);
        }
    }
    variables
}

/// numeric literals of `canonical` in order of appearance
pub fn extract_numbers(canonical: &str) -> Vec<f64> {
    NUMBER
        .captures_iter(canonical)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

/// What the front stages learned about one input. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemAnalysis {
    original_text: String,
    normalized_text: String,
    problem_type: ProblemType,
    confidence: f64,
    variables: Vec<String>,
    numbers: Vec<f64>,
    keywords: BTreeMap<ProblemType, Vec<String>>,
    target: Option<String>,
}

impl ProblemAnalysis {
    pub fn new(normalized: &NormalizedText, classification: Classification) -> Self {
        ProblemAnalysis {
            original_text: normalized.original.clone(),
            normalized_text: normalized.canonical.clone(),
            problem_type: classification.problem_type,
            confidence: classification.confidence,
            variables: extract_variables(&normalized.canonical),
            numbers: extract_numbers(&normalized.canonical),
            keywords: classification.keywords,
            target: normalized.target.clone(),
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    pub fn keywords(&self) -> &BTreeMap<ProblemType, Vec<String>> {
        &self.keywords
    }

    /// variable named by the instruction, if any
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl fmt::Display for ProblemAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Problem: {}", self.original_text)?;
        writeln!(f, "Normalized: {}", self.normalized_text)?;
        writeln!(
            f,
            "Type: {} (confidence {:.0}%)",
            self.problem_type,
            self.confidence * 100.0
        )?;
        writeln!(f, "Variables: {}", self.variables.join(", "))?;
        let numbers: Vec<String> = self
            .numbers
            .iter()
            .map(|n| crate::symbolic::symbolic_engine::format_number(*n))
            .collect();
        write!(f, "Numbers: {}", numbers.join(", "))
    }
}
