//! # Problem classifier
//!
//! Deterministic classification by a fixed-order rule table. Rules are evaluated top to bottom
//! and the first rule that holds decides the category, so the more specific system and
//! quadratic indicators are never shadowed by the generic linear patterns.
//!
//! | order | category  | predicate                                        |
//! |-------|-----------|--------------------------------------------------|
//! | 1     | system    | trigger word                                     |
//! | 2     | system    | conjunction between clauses and an `=`           |
//! | 3     | quadratic | trigger word                                     |
//! | 4     | quadratic | squared marker `^2`                              |
//! | 5     | linear    | trigger word                                     |
//! | 6     | linear    | variable next to an arithmetic operator          |
//! | 7     | linear    | variable alone on one side of `=`                |
//! | 8     | linear    | "find x if" / "what is x if" instruction         |
//!
//! Confidence is the capped sum of independent signals on the canonical text:
//! operator (0.3), single-letter variable (0.2), number (0.2) plus the weight of the rule
//! that matched (0.3).
use crate::text_processing::keywords::KeywordTable;
use crate::text_processing::normalizer::NormalizedText;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProblemType {
    Linear,
    Quadratic,
    System,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePredicate {
    /// a trigger word of the rule's category occurs in the prose
    Keyword,
    ConjunctionWithEquals,
    SquaredMarker,
    VariableNextToOperator,
    IsolatedVariable,
    TargetPrompt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRule {
    pub category: ProblemType,
    pub predicate: RulePredicate,
    pub weight: f64,
}

const RULE_WEIGHT: f64 = 0.3;

pub static RULES: [ClassificationRule; 8] = [
    ClassificationRule {
        category: ProblemType::System,
        predicate: RulePredicate::Keyword,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::System,
        predicate: RulePredicate::ConjunctionWithEquals,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Quadratic,
        predicate: RulePredicate::Keyword,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Quadratic,
        predicate: RulePredicate::SquaredMarker,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Linear,
        predicate: RulePredicate::Keyword,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Linear,
        predicate: RulePredicate::VariableNextToOperator,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Linear,
        predicate: RulePredicate::IsolatedVariable,
        weight: RULE_WEIGHT,
    },
    ClassificationRule {
        category: ProblemType::Linear,
        predicate: RulePredicate::TargetPrompt,
        weight: RULE_WEIGHT,
    },
];

static CONJUNCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\band\b|&").expect("valid regex"));
static SQUARED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\^\s*2(?:[^0-9.]|$)").expect("valid regex"));
static VARIABLE_NEXT_TO_OPERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-z]\b\s*[+\-*/]|[+\-*/]\s*\b[a-z]\b").expect("valid regex")
});
static ISOLATED_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|=|\band\b)\s*[a-z]\s*(?:=|$|\band\b)").expect("valid regex")
});
static TARGET_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfind\s+[a-z]\s+if\b|\bwhat\s+is\s+[a-z]\s+if\b").expect("valid regex")
});
static OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\-*/=]").expect("valid regex"));
static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]\b").expect("valid regex"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));

/// (name, weight) of the independent confidence signals
pub const CONFIDENCE_SIGNALS: [(&str, f64); 3] = [("operator", 0.3), ("variable", 0.2), ("number", 0.2)];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub problem_type: ProblemType,
    /// in [0, 1]
    pub confidence: f64,
    /// trigger words found per category
    pub keywords: BTreeMap<ProblemType, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ProblemClassifier {
    keywords: KeywordTable,
}

impl ProblemClassifier {
    pub fn new() -> Self {
        Self::with_keywords(KeywordTable::builtin())
    }

    pub fn with_keywords(keywords: KeywordTable) -> Self {
        ProblemClassifier { keywords }
    }

    /// classifier whose keyword table is extended by `extra`
    pub fn with_additional_keywords(extra: &HashMap<String, Vec<String>>) -> Self {
        Self::with_keywords(KeywordTable::with_additional(extra))
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    fn holds(&self, rule: &ClassificationRule, text: &NormalizedText) -> bool {
        let canonical = text.canonical.as_str();
        match rule.predicate {
            RulePredicate::Keyword => !self.keywords.matches(rule.category, &text.prose).is_empty(),
            RulePredicate::ConjunctionWithEquals => {
                CONJUNCTION.is_match(canonical) && canonical.contains('=')
            }
            RulePredicate::SquaredMarker => SQUARED.is_match(canonical),
            RulePredicate::VariableNextToOperator => VARIABLE_NEXT_TO_OPERATOR.is_match(canonical),
            RulePredicate::IsolatedVariable => ISOLATED_VARIABLE.is_match(canonical),
            RulePredicate::TargetPrompt => TARGET_PROMPT.is_match(&text.prose),
        }
    }

    /// first rule of the table that holds
    pub fn matching_rule(&self, text: &NormalizedText) -> Option<&'static ClassificationRule> {
        RULES.iter().find(|rule| self.holds(rule, text))
    }

    fn signal_weight(name: &str, weight: f64, canonical: &str) -> f64 {
        let present = match name {
            "operator" => OPERATOR.is_match(canonical),
            "variable" => VARIABLE.is_match(canonical),
            "number" => NUMBER.is_match(canonical),
            _ => false,
        };
        if present { weight } else { 0.0 }
    }

    pub fn classify(&self, text: &NormalizedText) -> Classification {
        let rule = self.matching_rule(text);
        let problem_type = rule.map_or(ProblemType::Unknown, |r| r.category);
        let signals: f64 = CONFIDENCE_SIGNALS
            .iter()
            .map(|(name, weight)| Self::signal_weight(name, *weight, &text.canonical))
            .sum();
        let confidence = (signals + rule.map_or(0.0, |r| r.weight)).clamp(0.0, 1.0);
        info!(
            "classified '{}' as {} (confidence {:.2})",
            text.canonical, problem_type, confidence
        );
        Classification {
            problem_type,
            confidence,
            keywords: self.keywords.extract(&text.prose),
        }
    }
}
