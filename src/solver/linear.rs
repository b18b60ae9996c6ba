use crate::equations::equation_assembler::Equation;
use crate::solver::solution::{
    Outcome, SolutionKind, SolutionValue, StepLog, residual_is_zero, show_reduction, snap,
};
use crate::symbolic::polynomial::{AlgebraError, Polynomial};
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use log::{debug, info};

/// Derives the solution of a linear equation in `variable`, recording every step in `log`.
///
/// Cases after moving everything to the left and simplifying:
/// - the difference vanishes: every real value is a solution
/// - no `variable` and a nonzero constant: contradiction
/// - no `variable` but other symbols: nothing to solve for, no value
/// - first degree: the isolated value, checked by substitution
/// - second degree: the smallest real root
///
/// Denominators holding symbols are cleared first; a value that zeroes one of them is rejected.
pub(crate) fn derive(
    equation: &Equation,
    variable: &Symbol,
    tolerance: f64,
    log: &mut StepLog,
) -> Result<Outcome, AlgebraError> {
    log.record("Original equation", equation.to_string());
    let difference = equation.difference();
    log.record("Move all terms to left side", format!("{} = 0", difference));

    let (poly, denominator) = Polynomial::fraction_from_expr(&difference.simplify_())?;
    let cleared = denominator.constant_value().is_none();
    if cleared {
        log.record(
            "Clear denominators",
            format!("Multiply both sides by {}: {} = 0", denominator, poly),
        );
    }
    let simplified = poly.to_expr();
    log.record("Simplify", format!("{} = 0", simplified));
    let excluded = |value: &Expr| {
        cleared && residual_is_zero(&denominator.to_expr().substitute(variable, value), tolerance)
    };

    if poly.is_negligible(tolerance) {
        log.record(
            "Infinite solutions",
            format!(
                "The equation is always true. All real values of {} are solutions.",
                variable
            ),
        );
        return Ok(Outcome::new(
            SolutionKind::Linear,
            Some(SolutionValue::AllReal(variable.clone())),
            true,
        ));
    }
    if !poly.contains(variable) {
        if poly.constant_value().is_some() {
            log.record(
                "No solution",
                format!("{} = 0 is a contradiction, the equation has no solution.", simplified),
            );
            return Ok(Outcome::new(
                SolutionKind::Linear,
                Some(SolutionValue::NoReal(variable.clone())),
                false,
            ));
        }
        log.record(
            "No solution",
            format!("No solution found: {} does not occur in {} = 0", variable, simplified),
        );
        return Ok(Outcome::new(SolutionKind::Linear, None, false));
    }

    let value = match poly.degree_in(variable) {
        1 => isolate(&poly, variable, tolerance)?,
        2 => match real_roots(&poly, variable, tolerance)?
            .into_iter()
            .map(Expr::Const)
            .find(|root| !excluded(root))
        {
            Some(root) => root,
            None => {
                log.record(
                    "No solution",
                    format!("No solution found: {} = 0 has no real root", simplified),
                );
                return Ok(Outcome::new(SolutionKind::Linear, None, false));
            }
        },
        degree => {
            return Err(AlgebraError::DegreeTooHigh {
                variable: variable.name().to_string(),
                degree,
            });
        }
    };
    log.record("Solve for variable", format!("{} = {}", variable, value));
    if excluded(&value) {
        log.record(
            "No solution",
            format!(
                "{} = {} makes a denominator zero, the equation has no solution.",
                variable, value
            ),
        );
        return Ok(Outcome::new(
            SolutionKind::Linear,
            Some(SolutionValue::NoReal(variable.clone())),
            false,
        ));
    }

    // a cleared equation is checked against the original fractions
    let checked = if cleared { &difference } else { &simplified };
    let substituted = checked.substitute(variable, &value);
    let verified = residual_is_zero(&substituted, tolerance);
    log.record(
        "Verify solution",
        format!(
            "Substituting {} = {}: {}",
            variable,
            value,
            show_reduction(&substituted)
        ),
    );
    info!("linear solution {} = {} (verified: {})", variable, value, verified);
    Ok(Outcome::new(
        SolutionKind::Linear,
        Some(SolutionValue::Value(value)),
        verified,
    ))
}

/// `c1*x + c0 = 0` gives `x = -c0/c1`; `c0` may hold other symbols, `c1` must be numeric
fn isolate(poly: &Polynomial, variable: &Symbol, tolerance: f64) -> Result<Expr, AlgebraError> {
    let coefficients = poly.coefficients_in(variable);
    let slope = coefficients[1]
        .constant_value()
        .ok_or_else(|| AlgebraError::NonNumericCoefficient(poly.to_expr().to_string()))?;
    let value = coefficients[0].scale(-1.0 / slope);
    Ok(match value.constant_value() {
        Some(constant) => Expr::Const(snap(constant, tolerance)),
        None => value.to_expr(),
    })
}

/// real roots of a second degree polynomial in ascending order
fn real_roots(
    poly: &Polynomial,
    variable: &Symbol,
    tolerance: f64,
) -> Result<Vec<f64>, AlgebraError> {
    let coefficients = poly.univariate_coefficients(variable)?;
    let (c, b, a) = (coefficients[0], coefficients[1], coefficients[2]);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -tolerance {
        return Ok(Vec::new());
    }
    let root = discriminant.max(0.0).sqrt();
    let (r1, r2) = ((-b - root) / (2.0 * a), (-b + root) / (2.0 * a));
    let (smallest, largest) = (r1.min(r2), r1.max(r2));
    debug!(
        "second degree in {}: real roots {} and {}",
        variable,
        format_number(smallest),
        format_number(largest)
    );
    Ok(vec![snap(smallest, tolerance), snap(largest, tolerance)])
}
