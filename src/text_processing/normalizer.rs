//! # Text normalizer
//!
//! Canonicalizes raw problem text into ASCII math text the expression parser accepts.
//! The stages run in a fixed order, each one relying on the output of the previous:
//!
//! 1. unicode glyphs (minus variants, multiplication and division signs, superscripts) to ASCII
//! 2. lowercase, whitespace collapse
//! 3. anchored instructional prefixes ("solve for x:", "find the roots of", "what is x if" ...),
//!    most specific first; a named variable is kept as the solving target
//! 4. number words to digits, then a check for number words that could not be resolved
//! 5. operator phrases ("multiplied by", "is equal to", "squared" ...), longest first
//! 6. clause splitting on conjunctions and extraction of the math run of every clause
//! 7. implicit multiplication and canonical spacing
use crate::symbolic::parse_expr::{Token, insert_implicit_multiplication, render_tokens, tokenize};
use crate::symbolic::utils::brackets_are_balanced;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizationError {
    /// nothing mathematical is left after normalization
    Empty(String),
    /// the canonical text cannot be a well-formed equation
    Unusable { text: String, reason: String },
    /// a number word like "hundred" sits next to a number or variable
    UnresolvedNumberWord { text: String, word: String },
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NormalizationError::Empty(text) => {
                write!(f, "no mathematical content found in '{}'", text)
            }
            NormalizationError::Unusable { text, reason } => {
                write!(f, "cannot use '{}' as an equation: {}", text, reason)
            }
            NormalizationError::UnresolvedNumberWord { text, word } => write!(
                f,
                "number word '{}' in '{}' could not be resolved, please use digits",
                word, text
            ),
        }
    }
}

impl std::error::Error for NormalizationError {}

/// Result of normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub original: String,
    /// glyph-canonical, lowercased text before prefix stripping; keyword rules look here
    pub prose: String,
    /// canonical math text, clauses joined with " and "
    pub canonical: String,
    /// variable named by the instruction ("solve for x")
    pub target: Option<String>,
}

impl NormalizedText {
    pub fn clauses(&self) -> impl Iterator<Item = &str> {
        self.canonical.split(" and ")
    }
}

//___________________________________PATTERNS____________________________________

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// anchored instruction prefixes, most specific first
static PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^solve\s+the\s+(?:following\s+)?(?:system|set)(?:\s+of\s+(?:linear\s+)?equations)?\s*:?\s*",
        r"^solve\s+the\s+(?:following\s+)?(?:(?:linear|quadratic)\s+)?equations?(?:\s+for\s+(?P<target>[a-z])\b)?\s*:?\s*",
        r"^solve\s+for\s+(?P<target>[a-z])\b\s*:?\s*",
        r"^find\s+the\s+(?:real\s+)?(?:roots?|solutions?|zeros?)\s+of(?:\s+the\s+equation)?\s*:?\s*",
        r"^find\s+the\s+value\s+of\s+(?P<target>[a-z])\b\s*(?:if|when|such\s+that|given|:)?\s*",
        r"^find\s+(?P<target>[a-z])\s*(?:\bif\b|\bwhen\b|\bsuch\s+that\b|\bgiven\b|:)\s*",
        r"^what\s+is\s+(?P<target>[a-z])\s+(?:if|when)\b\s*",
        r"^what\s+is\s+",
        r"^calculate\s+",
        r"^determine\s+",
        r"^solve\s*:?\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static TRAILING_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\?+\s*$").expect("valid regex"));

static COMPOUND_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)[\s-](one|two|three|four|five|six|seven|eight|nine)\b",
    )
    .expect("valid regex")
});

static NUMBER_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)\b",
    )
    .expect("valid regex")
});

const SCALE_WORDS: &str =
    r"hundreds?|thousands?|millions?|billions?|dozens?|half|halves|quarters?|thirds?";

/// a scale word directly before or after a number or a single-letter variable
static UNRESOLVED_NUMBER_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:\b[a-z]|\d)\s+({words})\b|\b({words})\s+(?:[a-z]\b|\d)",
        words = SCALE_WORDS
    ))
    .expect("valid regex")
});

/// operator phrases, longest first so "multiplied by" wins over any shorter overlap
static PHRASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("raised to the power of", " ^ "),
        ("to the power of", " ^ "),
        ("is equal to", " = "),
        ("multiplied by", " * "),
        ("divided by", " / "),
        ("equal to", " = "),
        ("raised to", " ^ "),
        ("equals", " = "),
        ("squared", "^2"),
        ("cubed", "^3"),
        ("times", " * "),
        ("minus", " - "),
        ("plus", " + "),
        ("over", " / "),
    ]
    .iter()
    .map(|(phrase, op)| {
        let pattern = format!(r"\b{}\b", phrase.replace(' ', r"\s+"));
        (Regex::new(&pattern).expect("valid regex"), *op)
    })
    .collect()
});

static THOUSANDS_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d),(\d{3})\b").expect("valid regex"));

fn number_word_value(word: &str) -> u32 {
    match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => 0,
    }
}

//___________________________________STAGES____________________________________

/// Replaces unicode math glyphs with their ASCII spelling.
pub fn canonicalize_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2212}' | '\u{2013}' | '\u{2014}' | '\u{2010}' | '\u{2011}' | '\u{2012}'
            | '\u{2015}' | '\u{207B}' | '\u{FE63}' | '\u{FF0D}' => out.push('-'),
            '×' | '·' | '⋅' | '∗' => out.push('*'),
            '÷' | '∕' => out.push('/'),
            '²' => out.push_str("^2"),
            '³' => out.push_str("^3"),
            '＝' => out.push('='),
            '＋' => out.push('+'),
            '\u{00A0}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Strips the first matching instruction prefix and a trailing question mark.
/// Returns the remaining text and the variable the instruction names, if any.
pub fn strip_prefixes(text: &str) -> (String, Option<String>) {
    let mut rest = text.to_string();
    let mut target = None;
    for prefix in PREFIXES.iter() {
        if let Some(caps) = prefix.captures(&rest) {
            target = caps.name("target").map(|m| m.as_str().to_string());
            let matched_len = caps.get(0).map_or(0, |m| m.end());
            rest = rest[matched_len..].to_string();
            break;
        }
    }
    let rest = TRAILING_QUESTION.replace(&rest, "").trim().to_string();
    (rest, target)
}

/// Replaces number words standing alone ("five", "twenty-five", "twenty five") with digits.
pub fn replace_number_words(text: &str) -> String {
    let compounds = COMPOUND_NUMBER.replace_all(text, |caps: &Captures| {
        (number_word_value(&caps[1]) + number_word_value(&caps[2])).to_string()
    });
    NUMBER_WORD
        .replace_all(&compounds, |caps: &Captures| {
            number_word_value(&caps[1]).to_string()
        })
        .into_owned()
}

/// a scale word left next to an operand after number words were replaced
pub fn find_unresolved_number_word(text: &str) -> Option<String> {
    UNRESOLVED_NUMBER_WORD.captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

/// Applies the phrase-to-operator table.
pub fn replace_operator_phrases(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, op) in PHRASES.iter() {
        out = pattern.replace_all(&out, *op).into_owned();
    }
    out
}

fn fold_thousands_separators(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let folded = THOUSANDS_SEPARATOR.replace_all(&out, "$1$2").into_owned();
        if folded == out {
            return out;
        }
        out = folded;
    }
}

/// Maps every character the lexer does not know to a space. Decimal points survive only
/// between two digits, other brackets become round ones.
fn keep_math_characters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| match c {
            'a'..='z' | '0'..='9' | '+' | '-' | '*' | '/' | '^' | '=' | '(' | ')' | '&' | ';'
            | ',' => *c,
            '[' | '{' => '(',
            ']' | '}' => ')',
            '.' => {
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if digit_before && digit_after { '.' } else { ' ' }
            }
            _ => ' ',
        })
        .collect()
}

/// Picks the math content of one clause: the first run of tokens free of prose words that
/// contains `=`, otherwise the longest such run.
fn math_run(clause: &[Token]) -> Vec<Token> {
    let runs: Vec<&[Token]> = clause
        .split(|t| t.is_long_word())
        .filter(|run| !run.is_empty())
        .collect();
    if let Some(run) = runs.iter().find(|run| run.contains(&Token::Op('='))) {
        return run.to_vec();
    }
    let mut best: &[Token] = &[];
    for run in runs {
        if run.len() > best.len() {
            best = run;
        }
    }
    best.to_vec()
}

fn check_clause(clause: &[Token], rendered: &str, text: &str) -> Result<(), NormalizationError> {
    let unusable = |reason: &str| NormalizationError::Unusable {
        text: text.to_string(),
        reason: reason.to_string(),
    };
    match clause.first() {
        Some(Token::Op(op)) if matches!(*op, '*' | '/' | '^' | '=') => {
            return Err(unusable("expression starts with an operator"));
        }
        _ => {}
    }
    if let Some(Token::Op(_)) = clause.last() {
        return Err(unusable("expression ends with an operator"));
    }
    if clause.iter().filter(|t| **t == Token::Op('=')).count() > 1 {
        return Err(unusable("more than one '=' in one equation"));
    }
    if !brackets_are_balanced(rendered) {
        return Err(unusable("unbalanced brackets"));
    }
    Ok(())
}

//___________________________________NORMALIZER____________________________________

/// Stateless text normalizer.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        TextNormalizer
    }

    pub fn normalize(&self, text: &str) -> Result<NormalizedText, NormalizationError> {
        let glyphs = canonicalize_glyphs(text);
        let prose = WHITESPACE
            .replace_all(&glyphs.to_lowercase(), " ")
            .trim()
            .to_string();
        debug!("normalizer: prose '{}'", prose);

        let (stripped, target) = strip_prefixes(&prose);
        debug!("normalizer: without prefix '{}', target {:?}", stripped, target);

        let numbers = replace_number_words(&stripped);
        if let Some(word) = find_unresolved_number_word(&numbers) {
            return Err(NormalizationError::UnresolvedNumberWord {
                text: text.to_string(),
                word,
            });
        }
        let operators = replace_operator_phrases(&numbers);
        let math_only = keep_math_characters(&fold_thousands_separators(&operators));
        debug!("normalizer: math characters '{}'", math_only);

        let tokens = tokenize(&math_only).map_err(|reason| NormalizationError::Unusable {
            text: text.to_string(),
            reason,
        })?;
        let mut clauses: Vec<Vec<Token>> = tokens
            .split(|t| *t == Token::Conjunction)
            .map(math_run)
            .filter(|run| !run.is_empty())
            .collect();
        if clauses.iter().any(|c| c.contains(&Token::Op('='))) {
            clauses.retain(|c| c.contains(&Token::Op('=')));
        }
        if clauses.is_empty() {
            return Err(NormalizationError::Empty(text.to_string()));
        }

        // in a multi-clause input a malformed clause is dropped, the error surfaces only
        // when no clause is left
        let several = clauses.len() > 1;
        let mut rendered = Vec::with_capacity(clauses.len());
        let mut first_error = None;
        for clause in clauses {
            let clause = insert_implicit_multiplication(clause);
            let clause_text = render_tokens(&clause);
            match check_clause(&clause, &clause_text, text) {
                Ok(()) => rendered.push(clause_text),
                Err(e) if several => {
                    warn!("normalizer: dropping clause '{}': {}", clause_text, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }
        if rendered.is_empty() {
            return Err(first_error.unwrap_or_else(|| NormalizationError::Empty(text.to_string())));
        }
        let canonical = rendered.join(" and ");
        info!("normalized '{}' to '{}'", text, canonical);
        Ok(NormalizedText {
            original: text.to_string(),
            prose,
            canonical,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(text: &str) -> String {
        TextNormalizer::new().normalize(text).unwrap().canonical
    }

    #[test]
    fn test_reference_problems() {
        assert_eq!(canonical("Solve for x: 2x + 5 = 13"), "2 * x + 5 = 13");
        assert_eq!(
            canonical("Find the roots of x^2 - 5x + 6 = 0"),
            "x^2 - 5 * x + 6 = 0"
        );
        assert_eq!(
            canonical("Solve the system: x + y = 5 and 2x - y = 1"),
            "x + y = 5 and 2 * x - y = 1"
        );
    }

    #[test]
    fn test_unicode_glyphs() {
        assert_eq!(canonical("x² − 4 = 0"), "x^2 - 4 = 0");
        assert_eq!(canonical("3 × x ÷ 2 = 6"), "3 * x / 2 = 6");
        assert_eq!(canonical("x³ – 1 = 0"), "x^3 - 1 = 0");
    }

    #[test]
    fn test_target_capture() {
        let normalizer = TextNormalizer::new();
        let cases = [
            ("Solve for y: 3y = 9", Some("y")),
            ("Find x if 2x = 8", Some("x")),
            ("What is z if z + 1 = 2?", Some("z")),
            ("Find the value of t when 4t = 2", Some("t")),
            ("Calculate 2x = 4", None),
        ];
        for (text, target) in cases {
            let normalized = normalizer.normalize(text).unwrap();
            assert_eq!(normalized.target.as_deref(), target, "{}", text);
        }
    }

    #[test]
    fn test_specific_prefix_wins() {
        // "solve" alone would leave "for x:" behind
        assert_eq!(canonical("solve for x: x - 1 = 0"), "x - 1 = 0");
        assert_eq!(canonical("Solve the quadratic equation x^2 = 9"), "x^2 = 9");
    }

    #[test]
    fn test_number_words() {
        assert_eq!(canonical("two x plus five equals thirteen"), "2 * x + 5 = 13");
        assert_eq!(canonical("x minus twenty-five equals zero"), "x - 25 = 0");
        assert_eq!(canonical("x plus forty two equals 50"), "x + 42 = 50");
        // "someone" must not turn into "some1"
        assert_eq!(replace_number_words("someone"), "someone");
    }

    #[test]
    fn test_unresolved_number_word() {
        let result = TextNormalizer::new().normalize("five hundred x = 10");
        assert!(matches!(
            result,
            Err(NormalizationError::UnresolvedNumberWord { ref word, .. }) if word == "hundred"
        ));
    }

    #[test]
    fn test_operator_phrases() {
        assert_eq!(canonical("x multiplied by 3 is equal to 12"), "x * 3 = 12");
        assert_eq!(canonical("x squared minus 4 equals 0"), "x^2 - 4 = 0");
        assert_eq!(canonical("x to the power of 2 = 16"), "x^2 = 16");
        assert_eq!(canonical("10 divided by x equals 2"), "10 / x = 2");
        assert_eq!(canonical("x over 2 = 3"), "x / 2 = 3");
    }

    #[test]
    fn test_implicit_multiplication_and_brackets() {
        assert_eq!(canonical("2(x + 1) = 8"), "2 * (x + 1) = 8");
        assert_eq!(canonical("(x+1)(x-1) = 0"), "(x + 1) * (x - 1) = 0");
        assert_eq!(canonical("[x + 1]*2 = 4"), "(x + 1) * 2 = 4");
    }

    #[test]
    fn test_prose_around_equation() {
        assert_eq!(
            canonical("If you double x and add 5 you get 13, so 2x + 5 = 13."),
            "2 * x + 5 = 13"
        );
        assert_eq!(canonical("The answer to x + 1 = 3 is?"), "x + 1 = 3");
    }

    #[test]
    fn test_separators() {
        assert_eq!(canonical("x + y = 5; x - y = 1"), "x + y = 5 and x - y = 1");
        assert_eq!(canonical("x + y = 5, x - y = 1"), "x + y = 5 and x - y = 1");
        assert_eq!(canonical("x + y = 5 & x - y = 1"), "x + y = 5 and x - y = 1");
        assert_eq!(canonical("x = 1,000"), "x = 1000");
    }

    #[test]
    fn test_idempotent() {
        let normalizer = TextNormalizer::new();
        for text in [
            "Solve for x: 2x + 5 = 13",
            "Find the roots of x² − 5x + 6 = 0",
            "Solve the system: x + y = 5 and 2x - y = 1",
            "what is x if three x minus 4 = -x + 2.5?",
            "-(x + 1)^2 = -4",
        ] {
            let once = normalizer.normalize(text).unwrap().canonical;
            let twice = normalizer.normalize(&once).unwrap().canonical;
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_errors() {
        let normalizer = TextNormalizer::new();
        assert!(matches!(
            normalizer.normalize("hello there"),
            Err(NormalizationError::Empty(_))
        ));
        assert!(matches!(
            normalizer.normalize("   "),
            Err(NormalizationError::Empty(_))
        ));
        assert!(matches!(
            normalizer.normalize("2x + = "),
            Err(NormalizationError::Unusable { .. })
        ));
        assert!(matches!(
            normalizer.normalize("(x + 1 = 2"),
            Err(NormalizationError::Unusable { .. })
        ));
        assert!(matches!(
            normalizer.normalize("x = 1 = 2"),
            Err(NormalizationError::Unusable { .. })
        ));
    }

    #[test]
    fn test_malformed_clause_is_dropped() {
        let normalizer = TextNormalizer::new();
        assert_eq!(canonical("x + y = 5 and 2x + y ="), "x + y = 5");
        assert_eq!(canonical("(x + 1 = 2 and x - y = 1"), "x - y = 1");
        match normalizer.normalize("x + 1 = and y = = 2") {
            Err(NormalizationError::Unusable { reason, .. }) => {
                assert_eq!(reason, "expression ends with an operator")
            }
            other => panic!("expected the first clause error, got {:?}", other),
        }
    }
}
