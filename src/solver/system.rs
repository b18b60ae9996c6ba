use crate::equations::equation_assembler::EquationSet;
use crate::solver::solution::{
    Assignment, Outcome, SolutionKind, SolutionValue, StepLog, residual_is_zero, snap,
};
use crate::symbolic::polynomial::{AlgebraError, Monomial, Polynomial};
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use log::{debug, info};
use nalgebra::DMatrix;

/// Augmented matrix `[A | b]` of a linear system in `variables`.
///
/// # Errors
/// `NonLinearSystem` for an equation of degree above one
pub fn augmented_matrix(
    equations: &EquationSet,
    variables: &[Symbol],
) -> Result<DMatrix<f64>, AlgebraError> {
    let n = variables.len();
    let mut matrix = DMatrix::<f64>::zeros(equations.len(), n + 1);
    for (row, equation) in equations.iter().enumerate() {
        let poly = Polynomial::from_expr(&equation.difference())?;
        if poly.degree() > 1 {
            return Err(AlgebraError::NonLinearSystem(equation.to_string()));
        }
        for (monomial, coefficient) in poly.terms() {
            if monomial.is_constant() {
                matrix[(row, n)] -= coefficient;
                continue;
            }
            if let Some(col) = variables
                .iter()
                .position(|v| *monomial == Monomial::of(v.clone(), 1))
            {
                matrix[(row, col)] += coefficient;
            }
        }
    }
    Ok(matrix)
}

/// Reduced row echelon form with partial pivoting. Returns the pivot column of each pivot row.
pub fn row_reduce(matrix: &mut DMatrix<f64>, tolerance: f64) -> Vec<usize> {
    let (rows, cols) = matrix.shape();
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..cols.saturating_sub(1) {
        if row == rows {
            break;
        }
        let (best, magnitude) = (row..rows)
            .map(|r| (r, matrix[(r, col)].abs()))
            .fold((row, 0.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if magnitude <= tolerance {
            continue;
        }
        matrix.swap_rows(row, best);
        let pivot = matrix[(row, col)];
        for j in 0..cols {
            matrix[(row, j)] /= pivot;
        }
        for r in 0..rows {
            if r != row {
                let factor = matrix[(r, col)];
                if factor != 0.0 {
                    for j in 0..cols {
                        matrix[(r, j)] -= factor * matrix[(row, j)];
                    }
                }
            }
        }
        pivots.push(col);
        row += 1;
    }
    pivots
}

/// every symbol of the table, then any symbol of the equations the table does not know
pub(crate) fn system_variables(equations: &EquationSet, table_symbols: &[Symbol]) -> Vec<Symbol> {
    let mut variables: Vec<Symbol> = table_symbols.to_vec();
    for equation in equations {
        for symbol in equation
            .lhs
            .free_symbols()
            .into_iter()
            .chain(equation.rhs.free_symbols())
        {
            if !variables.contains(&symbol) {
                variables.push(symbol);
            }
        }
    }
    variables
}

pub(crate) fn derive(
    equations: &EquationSet,
    variables: &[Symbol],
    tolerance: f64,
    log: &mut StepLog,
) -> Result<Outcome, AlgebraError> {
    log.record("Original system", equations.to_string());
    if variables.is_empty() {
        return Err(AlgebraError::NoVariables);
    }
    let mut matrix = augmented_matrix(equations, variables)?;
    debug!("augmented matrix {}", matrix);
    let pivots = row_reduce(&mut matrix, tolerance);
    let n = variables.len();

    let inconsistent = (pivots.len()..matrix.nrows()).any(|r| matrix[(r, n)].abs() > tolerance);
    if inconsistent {
        log.record("No solution", "The system has no solution");
        info!("system {} is inconsistent", equations);
        return Ok(Outcome::new(SolutionKind::System, None, false));
    }

    // pivot variables in terms of the free ones
    let free: Vec<usize> = (0..n).filter(|c| !pivots.contains(c)).collect();
    let mut pairs = Vec::new();
    for (row, &col) in pivots.iter().enumerate() {
        let mut value = Polynomial::constant(snap(matrix[(row, n)], tolerance));
        for &f in &free {
            let coefficient = snap(matrix[(row, f)], tolerance);
            value = value.sub(&Polynomial::variable(variables[f].clone()).scale(coefficient));
        }
        let expr = match value.constant_value() {
            Some(constant) => Expr::Const(snap(constant, tolerance)),
            None => value.to_expr(),
        };
        pairs.push((variables[col].clone(), expr));
    }
    let assignment = Assignment::new(pairs);
    let description = if free.is_empty() {
        "Solution".to_string()
    } else {
        let names: Vec<&str> = free.iter().map(|&f| variables[f].name()).collect();
        format!("Solution (free: {})", names.join(", "))
    };
    log.record(description, assignment.to_string());

    let map = assignment.to_map();
    let mut verified = true;
    for (i, equation) in equations.iter().enumerate() {
        let lhs = equation.lhs.substitute_map(&map);
        let rhs = equation.rhs.substitute_map(&map);
        let holds = residual_is_zero(&(lhs.clone() - rhs.clone()), tolerance);
        log.record(
            format!("Verify equation {}", i + 1),
            format!(
                "Substituting: {} = {} gives {} = {}",
                lhs,
                rhs,
                reduced(&lhs),
                reduced(&rhs)
            ),
        );
        verified &= holds;
    }
    info!("system solution {} (verified: {})", assignment, verified);
    Ok(Outcome::new(
        SolutionKind::System,
        Some(SolutionValue::Assignments(vec![assignment])),
        verified,
    ))
}

fn reduced(expr: &Expr) -> String {
    match expr.simplify_lossy() {
        Expr::Const(value) => format_number(value),
        other => other.to_string(),
    }
}
