//! # StepSolver
//!
//! Entry points for the three procedures. Each call creates its own `StepLog` and returns it
//! inside the `Solution`, so one solver can be shared freely, also between threads.
//! Algebra failures stop at this boundary: they come back as an "Error" step plus
//! `Solution::error`, never as an `Err`.
use crate::equations::equation_assembler::{Equation, EquationSet};
use crate::equations::symbol_table::SymbolTable;
use crate::solver::solution::{
    Assignment, Outcome, Solution, SolutionKind, StepLog, residual_is_zero,
};
use crate::solver::{linear, quadratic, system};
use crate::symbolic::polynomial::AlgebraError;
use crate::symbolic::symbolic_engine::Symbol;
use log::error;

/// A classified problem with the payload its procedure needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Linear {
        equation: Equation,
        symbols: SymbolTable,
    },
    Quadratic {
        equation: Equation,
        symbols: SymbolTable,
    },
    System {
        equations: EquationSet,
        symbols: SymbolTable,
    },
}

impl Problem {
    pub fn kind(&self) -> SolutionKind {
        match self {
            Problem::Linear { .. } => SolutionKind::Linear,
            Problem::Quadratic { .. } => SolutionKind::Quadratic,
            Problem::System { .. } => SolutionKind::System,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        match self {
            Problem::Linear { symbols, .. }
            | Problem::Quadratic { symbols, .. }
            | Problem::System { symbols, .. } => symbols,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSolver {
    /// zero test for residuals, discriminants and pivots
    tolerance: f64,
}

impl Default for StepSolver {
    fn default() -> Self {
        StepSolver { tolerance: 1e-9 }
    }
}

impl StepSolver {
    pub fn new() -> Self {
        StepSolver::default()
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        StepSolver { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// the table's solving variable, else the first symbol of the equation, else `x`
    fn solving_variable(equation: &Equation, symbols: &SymbolTable) -> Symbol {
        symbols
            .solving_variable()
            .or_else(|| {
                equation
                    .lhs
                    .free_symbols()
                    .into_iter()
                    .chain(equation.rhs.free_symbols())
                    .next()
            })
            .unwrap_or_else(|| Symbol::new("x"))
    }

    fn finish(
        kind: SolutionKind,
        equations: Vec<Equation>,
        variables: Vec<Symbol>,
        log: StepLog,
        outcome: Result<Outcome, AlgebraError>,
    ) -> Solution {
        if let Err(e) = &outcome {
            error!("{} procedure failed: {}", kind, e);
        }
        Solution::assemble(kind, equations, variables, log, outcome)
    }

    pub fn solve_linear(&self, equation: &Equation, symbols: &SymbolTable) -> Solution {
        let mut log = StepLog::new();
        let variable = Self::solving_variable(equation, symbols);
        let outcome = linear::derive(equation, &variable, self.tolerance, &mut log);
        Self::finish(
            SolutionKind::Linear,
            vec![equation.clone()],
            vec![variable],
            log,
            outcome,
        )
    }

    pub fn solve_quadratic(&self, equation: &Equation, symbols: &SymbolTable) -> Solution {
        let mut log = StepLog::new();
        let variable = Self::solving_variable(equation, symbols);
        let outcome = quadratic::derive(equation, &variable, self.tolerance, &mut log);
        Self::finish(
            SolutionKind::Quadratic,
            vec![equation.clone()],
            vec![variable],
            log,
            outcome,
        )
    }

    pub fn solve_system(&self, equations: &EquationSet, symbols: &SymbolTable) -> Solution {
        let mut log = StepLog::new();
        let variables = system::system_variables(equations, symbols.symbols());
        let outcome = system::derive(equations, &variables, self.tolerance, &mut log);
        Self::finish(
            SolutionKind::System,
            equations.equations().to_vec(),
            variables,
            log,
            outcome,
        )
    }

    pub fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Linear { equation, symbols } => self.solve_linear(equation, symbols),
            Problem::Quadratic { equation, symbols } => self.solve_quadratic(equation, symbols),
            Problem::System { equations, symbols } => self.solve_system(equations, symbols),
        }
    }

    /// `equation` holds after substituting `assignment`
    pub fn verify_solution(&self, equation: &Equation, assignment: &Assignment) -> bool {
        let map = assignment.to_map();
        let residual = equation.difference().substitute_map(&map);
        residual_is_zero(&residual, self.tolerance)
    }
}
