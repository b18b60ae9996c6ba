//! # Solution records
//!
//! `StepLog` is created by each solver entry point, threaded by `&mut` through the derivation and
//! moved into the returned `Solution`; nothing is kept on the solver between calls.
use crate::equations::equation_assembler::Equation;
use crate::symbolic::polynomial::{AlgebraError, Polynomial};
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use itertools::Itertools;
use log::debug;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumString};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SolutionStep {
    #[tabled(rename = "step")]
    pub index: usize,
    pub description: String,
    pub content: String,
}

/// Ordered steps of one derivation. Indices start at 1 and have no gaps.
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    steps: Vec<SolutionStep>,
}

impl StepLog {
    pub fn new() -> Self {
        StepLog::default()
    }

    pub fn record(&mut self, description: impl Into<String>, content: impl Into<String>) {
        let step = SolutionStep {
            index: self.steps.len() + 1,
            description: description.into(),
            content: content.into(),
        };
        debug!("step {}: {} | {}", step.index, step.description, step.content);
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[SolutionStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<SolutionStep> {
        self.steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SolutionKind {
    Linear,
    Quadratic,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Root {
    Real(f64),
    Complex(Complex64),
}

impl Root {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Root::Real(value) => Some(*value),
            Root::Complex(_) => None,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Root::Real(_))
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Root::Real(value) => write!(f, "{}", format_number(*value)),
            Root::Complex(z) => {
                let sign = if z.im < 0.0 { '-' } else { '+' };
                write!(
                    f,
                    "{} {} {}i",
                    format_number(z.re),
                    sign,
                    format_number(z.im.abs())
                )
            }
        }
    }
}

/// One solution of a system: variables and their values, in symbol table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment(Vec<(Symbol, Expr)>);

impl Assignment {
    pub fn new(pairs: Vec<(Symbol, Expr)>) -> Self {
        Assignment(pairs)
    }

    pub fn single(symbol: Symbol, value: Expr) -> Self {
        Assignment(vec![(symbol, value)])
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0
            .iter()
            .find(|(symbol, _)| symbol.name() == name)
            .map(|(_, value)| value)
    }

    /// numeric value of `name`, None when it is missing or still symbolic
    pub fn value(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Expr::Const(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Symbol, Expr)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<Symbol, Expr> {
        self.0.iter().cloned().collect()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(symbol, value)| format!("{} = {}", symbol, value))
            .join(", ");
        write!(f, "{}", parts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionValue {
    /// the isolated value of a linear equation, numeric or in terms of other symbols
    Value(Expr),
    /// identity: every real value satisfies the equation
    AllReal(Symbol),
    /// contradiction
    NoReal(Symbol),
    Roots(Vec<Root>),
    Assignments(Vec<Assignment>),
}

impl fmt::Display for SolutionValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolutionValue::Value(expr) => write!(f, "{}", expr),
            SolutionValue::AllReal(symbol) => write!(f, "all real {}", symbol),
            SolutionValue::NoReal(symbol) => write!(f, "no real {}", symbol),
            SolutionValue::Roots(roots) => write!(f, "{}", roots.iter().join(", ")),
            SolutionValue::Assignments(assignments) => {
                write!(f, "{}", assignments.iter().join("; "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum QuadraticMethod {
    Factorization,
    Formula,
}

/// what the quadratic procedure found out about `a*x^2 + b*x + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticDetails {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub discriminant: f64,
    pub method: QuadraticMethod,
    pub repeated_root: bool,
}

/// Result of one derivation before it is bundled with its equations and step log.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    pub kind: SolutionKind,
    pub value: Option<SolutionValue>,
    pub verified: bool,
    pub quadratic: Option<QuadraticDetails>,
}

impl Outcome {
    pub fn new(kind: SolutionKind, value: Option<SolutionValue>, verified: bool) -> Self {
        Outcome {
            kind,
            value,
            verified,
            quadratic: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    kind: SolutionKind,
    equations: Vec<Equation>,
    variables: Vec<Symbol>,
    value: Option<SolutionValue>,
    steps: Vec<SolutionStep>,
    verified: bool,
    error: Option<AlgebraError>,
    quadratic: Option<QuadraticDetails>,
}

impl Solution {
    /// Bundles a finished derivation. A failed one gets a trailing "Error" step.
    pub(crate) fn assemble(
        kind: SolutionKind,
        equations: Vec<Equation>,
        variables: Vec<Symbol>,
        mut log: StepLog,
        outcome: Result<Outcome, AlgebraError>,
    ) -> Solution {
        match outcome {
            Ok(outcome) => Solution {
                kind: outcome.kind,
                equations,
                variables,
                value: outcome.value,
                steps: log.into_steps(),
                verified: outcome.verified,
                error: None,
                quadratic: outcome.quadratic,
            },
            Err(error) => {
                log.record("Error", format!("Could not solve: {}", error));
                Solution {
                    kind,
                    equations,
                    variables,
                    value: None,
                    steps: log.into_steps(),
                    verified: false,
                    error: Some(error),
                    quadratic: None,
                }
            }
        }
    }

    pub fn kind(&self) -> SolutionKind {
        self.kind
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// the source equation(s) as text
    pub fn source(&self) -> String {
        self.equations.iter().join(", ")
    }

    pub fn variables(&self) -> &[Symbol] {
        &self.variables
    }

    pub fn value(&self) -> Option<&SolutionValue> {
        self.value.as_ref()
    }

    pub fn steps(&self) -> &[SolutionStep] {
        &self.steps
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn error(&self) -> Option<&AlgebraError> {
        self.error.as_ref()
    }

    pub fn quadratic(&self) -> Option<&QuadraticDetails> {
        self.quadratic.as_ref()
    }

    pub fn roots(&self) -> Option<&[Root]> {
        match &self.value {
            Some(SolutionValue::Roots(roots)) => Some(roots),
            _ => None,
        }
    }

    pub fn assignments(&self) -> Option<&[Assignment]> {
        match &self.value {
            Some(SolutionValue::Assignments(assignments)) => Some(assignments),
            _ => None,
        }
    }

    /// numeric real values: the isolated value of a linear equation or the real roots
    pub fn real_values(&self) -> Vec<f64> {
        match &self.value {
            Some(SolutionValue::Value(Expr::Const(value))) => vec![*value],
            Some(SolutionValue::Roots(roots)) => roots.iter().filter_map(Root::as_real).collect(),
            _ => Vec::new(),
        }
    }

    /// first step with the given description
    pub fn step(&self, description: &str) -> Option<&SolutionStep> {
        self.steps.iter().find(|s| s.description == description)
    }

    fn answer(&self) -> String {
        let variable = self
            .variables
            .first()
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| "x".to_string());
        match &self.value {
            None => "no solution found".to_string(),
            Some(SolutionValue::Value(expr)) => format!("{} = {}", variable, expr),
            Some(SolutionValue::Roots(roots)) => roots
                .iter()
                .map(|r| format!("{} = {}", variable, r))
                .join(", "),
            Some(other) => other.to_string(),
        }
    }

    /// Short multi-line report: kind, equation(s), answer or error, verification.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Type: {}", self.kind),
            format!("Equation: {}", self.source()),
            format!("Variables: {}", self.variables.iter().join(", ")),
        ];
        match &self.error {
            Some(error) => lines.push(format!("Error: {}", error)),
            None => lines.push(format!("Solution: {}", self.answer())),
        }
        lines.push(format!("Verified: {}", self.verified));
        lines.join("\n")
    }

    /// the steps rendered as a table
    pub fn steps_table(&self) -> String {
        let mut table = Table::new(&self.steps);
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// `value` rounded to an integer when it is that close to one; never a negative zero
pub(crate) fn snap(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    let snapped = if (value - rounded).abs() <= tolerance {
        rounded
    } else {
        value
    };
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// the expression reduces to the zero polynomial
pub(crate) fn residual_is_zero(expr: &Expr, tolerance: f64) -> bool {
    match Polynomial::from_expr(expr) {
        Ok(poly) => poly.is_negligible(tolerance),
        Err(_) => false,
    }
}

/// `expr` after substitution, shown as "expr = reduced"
pub(crate) fn show_reduction(expr: &Expr) -> String {
    let reduced = expr.simplify_lossy();
    format!("{} = {}", expr, reduced)
}
