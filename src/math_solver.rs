//! # Math solver
//!
//! End-to-end pipeline over the core stages:
//! raw text -> `TextNormalizer` -> `ProblemClassifier` -> `EquationAssembler` -> `StepSolver`.
//!
//! Text that cannot be understood surfaces as `SolverError`; a problem that was understood but
//! could not be solved comes back as a `Solution` carrying its error.
//!
//! ```
//! use RustedAlgebra::math_solver::MathSolver;
//! use RustedAlgebra::text_processing::classifier::ProblemType;
//! let solver = MathSolver::new();
//! let (analysis, solution) = solver.solve_text("Find the roots of x^2 - 5x + 6 = 0").unwrap();
//! assert_eq!(analysis.problem_type(), ProblemType::Quadratic);
//! let mut roots = solution.real_values();
//! roots.sort_by(|a, b| a.total_cmp(b));
//! assert_eq!(roots, vec![2.0, 3.0]);
//! assert!(solution.verified());
//! ```
use crate::Utils::logger::{LoggerError, init_logger};
use crate::equations::equation_assembler::{EquationAssembler, ParseError};
use crate::solver::solution::Solution;
use crate::solver::step_solver::{Problem, StepSolver};
use crate::text_processing::analysis::ProblemAnalysis;
use crate::text_processing::classifier::{ProblemClassifier, ProblemType};
use crate::text_processing::keywords::{KeywordConfigError, KeywordTable};
use crate::text_processing::normalizer::{NormalizationError, TextNormalizer};
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;

/// shortest input worth analysing, in characters
pub const MIN_INPUT_LENGTH: usize = 5;
/// lowest classification confidence `validate_input` accepts
pub const MIN_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    Normalization(NormalizationError),
    Parse(ParseError),
    /// no classification rule matched
    Unrecognized(String),
    InvalidInput { text: String, reason: String },
    Logging(LoggerError),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::Normalization(e) => write!(f, "{}", e),
            SolverError::Parse(e) => write!(f, "{}", e),
            SolverError::Unrecognized(text) => {
                write!(f, "could not recognize the problem type of '{}'", text)
            }
            SolverError::InvalidInput { text, reason } => write!(f, "{}: '{}'", reason, text),
            SolverError::Logging(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<NormalizationError> for SolverError {
    fn from(e: NormalizationError) -> Self {
        SolverError::Normalization(e)
    }
}

impl From<ParseError> for SolverError {
    fn from(e: ParseError) -> Self {
        SolverError::Parse(e)
    }
}

impl From<LoggerError> for SolverError {
    fn from(e: LoggerError) -> Self {
        SolverError::Logging(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MathSolver {
    normalizer: TextNormalizer,
    classifier: ProblemClassifier,
    assembler: EquationAssembler,
    solver: StepSolver,
}

impl MathSolver {
    pub fn new() -> Self {
        MathSolver {
            normalizer: TextNormalizer::new(),
            classifier: ProblemClassifier::new(),
            assembler: EquationAssembler::new(),
            solver: StepSolver::new(),
        }
    }

    /// built-in trigger words extended by `extra` (category name -> words)
    pub fn with_keyword_config(extra: &HashMap<String, Vec<String>>) -> Self {
        MathSolver {
            classifier: ProblemClassifier::with_additional_keywords(extra),
            ..MathSolver::new()
        }
    }

    /// keyword configuration from TOML text, e.g. `[keywords] quadratic = ["parabola"]`
    pub fn from_toml_keywords(text: &str) -> Result<Self, KeywordConfigError> {
        Ok(MathSolver {
            classifier: ProblemClassifier::with_keywords(KeywordTable::from_toml_str(text)?),
            ..MathSolver::new()
        })
    }

    pub fn with_solver(mut self, solver: StepSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn classifier(&self) -> &ProblemClassifier {
        &self.classifier
    }

    /// normalization and classification
    pub fn analyze(&self, text: &str) -> Result<ProblemAnalysis, SolverError> {
        let normalized = self.normalizer.normalize(text)?;
        let classification = self.classifier.classify(&normalized);
        Ok(ProblemAnalysis::new(&normalized, classification))
    }

    /// Parses the normalized text into the payload of its problem kind. A variable named by
    /// the instruction becomes the solving variable.
    pub fn build_problem(&self, analysis: &ProblemAnalysis) -> Result<Problem, SolverError> {
        let canonical = analysis.normalized_text();
        let mut problem = match analysis.problem_type() {
            ProblemType::Linear => {
                let (equation, symbols) = self.assembler.parse_equation(canonical)?;
                Problem::Linear { equation, symbols }
            }
            ProblemType::Quadratic => {
                let (equation, symbols) = self.assembler.parse_equation(canonical)?;
                Problem::Quadratic { equation, symbols }
            }
            ProblemType::System => {
                let (equations, symbols) = self.assembler.parse_system(canonical)?;
                Problem::System { equations, symbols }
            }
            ProblemType::Unknown => {
                return Err(SolverError::Unrecognized(
                    analysis.original_text().to_string(),
                ));
            }
        };
        if let Some(target) = analysis.target() {
            let symbols = match &mut problem {
                Problem::Linear { symbols, .. }
                | Problem::Quadratic { symbols, .. }
                | Problem::System { symbols, .. } => symbols,
            };
            if !symbols.prefer(target) {
                warn!("'{}' does not occur in '{}', solving for the first variable", target, canonical);
            }
        }
        Ok(problem)
    }

    pub fn solve_text(&self, text: &str) -> Result<(ProblemAnalysis, Solution), SolverError> {
        let analysis = self.analyze(text)?;
        let problem = self.build_problem(&analysis)?;
        let solution = self.solver.solve(&problem);
        info!(
            "solved '{}' as {}: verified {}",
            text,
            solution.kind(),
            solution.verified()
        );
        Ok((analysis, solution))
    }

    /// Rejects text too short, too unlike a math problem, or missing variables or numbers.
    pub fn validate_input(&self, text: &str) -> Result<ProblemAnalysis, SolverError> {
        let invalid = |reason: &str| SolverError::InvalidInput {
            text: text.to_string(),
            reason: reason.to_string(),
        };
        if text.trim().chars().count() < MIN_INPUT_LENGTH {
            return Err(invalid("Input text is too short"));
        }
        let analysis = self.analyze(text)?;
        if analysis.confidence() < MIN_CONFIDENCE {
            return Err(invalid("Text doesn't appear to contain a mathematical problem"));
        }
        if analysis.variables().is_empty() {
            return Err(invalid("No variables found in the problem"));
        }
        if analysis.numbers().is_empty() {
            return Err(invalid("No numbers found in the problem"));
        }
        Ok(analysis)
    }

    /// `solve_text` with a terminal logger at `loglevel`. A logger installed earlier is kept.
    pub fn solve_with_logging(
        &self,
        text: &str,
        loglevel: Option<&str>,
    ) -> Result<(ProblemAnalysis, Solution), SolverError> {
        match init_logger(loglevel) {
            Ok(()) | Err(LoggerError::AlreadyInitialized) => {}
            Err(e) => return Err(e.into()),
        }
        info!("solving '{}'", text);
        let result = self.solve_text(text);
        info!("done");
        result
    }
}

mod math_solver_tests;
