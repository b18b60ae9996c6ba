//! # Equation assembler
//!
//! Builds `Expr`, `Equation` and `EquationSet` values from canonical text against a shared
//! `SymbolTable`:
//! - an equation is split on its single `=`, both sides are parsed against the same table
//! - a system is split into clauses on "and" / "&" / ";" / ","; a clause that fails is dropped
//!   with a warning and the rest still make up the system
//!
//! Every parse works on a copy of the table that replaces the caller's table only when the
//! parse succeeds, so a failing clause never leaves half its symbols behind.
use crate::equations::symbol_table::SymbolTable;
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::find_char_positions;
use itertools::Itertools;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Index;

static SYSTEM_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*solve\s+the\s+(?:following\s+)?system(?:\s+of\s+(?:linear\s+)?equations)?\s*:?\s*",
    )
    .expect("valid regex")
});

static CLAUSE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+|\s*&\s*|\s*;\s*|\s*,\s*").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// an equation needs exactly one `=`
    EqualsCount { text: String, count: usize },
    MalformedOperand { text: String, reason: String },
    /// nothing to parse on one side of the equation or in the whole expression
    Degenerate(String),
    NoValidEquations(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::EqualsCount { text, count } => write!(
                f,
                "'{}' must contain exactly one '=', found {}",
                text, count
            ),
            ParseError::MalformedOperand { text, reason } => {
                write!(f, "cannot parse '{}': {}", text, reason)
            }
            ParseError::Degenerate(text) => write!(f, "degenerate expression in '{}'", text),
            ParseError::NoValidEquations(text) => {
                write!(f, "no valid equations found in '{}'", text)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// `lhs = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `lhs - rhs`, zero exactly at the solutions
    pub fn difference(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// Equations sharing one symbol table, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EquationSet {
    equations: Vec<Equation>,
}

impl EquationSet {
    pub fn new(equations: Vec<Equation>) -> Self {
        EquationSet { equations }
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Equation> {
        self.equations.iter()
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }
}

impl Index<usize> for EquationSet {
    type Output = Equation;

    fn index(&self, i: usize) -> &Equation {
        &self.equations[i]
    }
}

impl<'a> IntoIterator for &'a EquationSet {
    type Item = &'a Equation;
    type IntoIter = std::slice::Iter<'a, Equation>;

    fn into_iter(self) -> Self::IntoIter {
        self.equations.iter()
    }
}

impl fmt::Display for EquationSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.equations.iter().join(", "))
    }
}

/// Stateless; symbol identity lives in the `SymbolTable` passed in or returned.
#[derive(Debug, Clone, Default)]
pub struct EquationAssembler;

impl EquationAssembler {
    pub fn new() -> Self {
        EquationAssembler
    }

    pub fn parse_expression(&self, text: &str) -> Result<(Expr, SymbolTable), ParseError> {
        let mut table = SymbolTable::new();
        let expr = self.parse_expression_into(text, &mut table)?;
        Ok((expr, table))
    }

    /// Parses `text` with its symbols resolved through `table`.
    pub fn parse_expression_into(
        &self,
        text: &str,
        table: &mut SymbolTable,
    ) -> Result<Expr, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Degenerate(text.to_string()));
        }
        let expr = parse_expression_func(text).map_err(|reason| ParseError::MalformedOperand {
            text: text.trim().to_string(),
            reason,
        })?;
        Ok(table.intern_expr(&expr))
    }

    pub fn parse_equation(&self, text: &str) -> Result<(Equation, SymbolTable), ParseError> {
        let mut table = SymbolTable::new();
        let equation = self.parse_equation_into(text, &mut table)?;
        Ok((equation, table))
    }

    pub fn parse_equation_into(
        &self,
        text: &str,
        table: &mut SymbolTable,
    ) -> Result<Equation, ParseError> {
        let positions = find_char_positions(text, '=');
        if positions.len() != 1 {
            return Err(ParseError::EqualsCount {
                text: text.trim().to_string(),
                count: positions.len(),
            });
        }
        let (lhs_text, rhs_text) = (&text[..positions[0]], &text[positions[0] + 1..]);
        if lhs_text.trim().is_empty() || rhs_text.trim().is_empty() {
            return Err(ParseError::Degenerate(text.trim().to_string()));
        }
        let mut scratch = table.clone();
        let lhs = self.parse_expression_into(lhs_text, &mut scratch)?;
        let rhs = self.parse_expression_into(rhs_text, &mut scratch)?;
        *table = scratch;
        let equation = Equation::new(lhs, rhs);
        debug!("parsed equation {}", equation);
        Ok(equation)
    }

    pub fn parse_system(&self, text: &str) -> Result<(EquationSet, SymbolTable), ParseError> {
        let mut table = SymbolTable::new();
        let system = self.parse_system_into(text, &mut table)?;
        Ok((system, table))
    }

    /// Parses every clause as an independent equation with its own symbol table, then unions
    /// the clause tables into `table` by name. Clauses that fail are dropped with a warning,
    /// `NoValidEquations` only when none survives.
    pub fn parse_system_into(
        &self,
        text: &str,
        table: &mut SymbolTable,
    ) -> Result<EquationSet, ParseError> {
        let body = SYSTEM_PREFIX.replace(text, "");
        let mut equations = Vec::new();
        for clause in CLAUSE_SEPARATOR.split(&body) {
            if clause.trim().is_empty() {
                continue;
            }
            match self.parse_equation(clause) {
                Ok((equation, local)) => {
                    table.merge(&local);
                    equations.push(Equation::new(
                        table.intern_expr(&equation.lhs),
                        table.intern_expr(&equation.rhs),
                    ));
                }
                Err(e) => warn!("dropping clause '{}' of the system: {}", clause.trim(), e),
            }
        }
        if equations.is_empty() {
            return Err(ParseError::NoValidEquations(text.trim().to_string()));
        }
        Ok(EquationSet::new(equations))
    }
}
