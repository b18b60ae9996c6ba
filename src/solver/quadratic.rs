//! # Quadratic procedure
//!
//! Standard form, coefficients `a, b, c` (missing powers padded with zeros), then either the
//! rational factorization, when the polynomial splits into two distinct factors, or the
//! discriminant formula. `a = 0` falls back to the linear procedure on the standard form.
use crate::equations::equation_assembler::Equation;
use crate::solver::linear;
use crate::solver::solution::{
    Outcome, QuadraticDetails, QuadraticMethod, Root, SolutionKind, SolutionValue, StepLog,
    residual_is_zero, show_reduction, snap,
};
use crate::symbolic::factorization::factor_univariate;
use crate::symbolic::polynomial::{AlgebraError, Polynomial};
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use log::info;
use num_complex::Complex64;

pub(crate) fn derive(
    equation: &Equation,
    variable: &Symbol,
    tolerance: f64,
    log: &mut StepLog,
) -> Result<Outcome, AlgebraError> {
    log.record("Original equation", equation.to_string());
    let poly = Polynomial::from_expr(&equation.difference())?;
    let standard_form = poly.to_expr();
    log.record("Standard form", format!("{} = 0", standard_form));

    let coefficients = poly.univariate_coefficients(variable)?;
    if coefficients.len() > 3 {
        return Err(AlgebraError::DegreeTooHigh {
            variable: variable.name().to_string(),
            degree: (coefficients.len() - 1) as u32,
        });
    }
    let coefficient = |power: usize| coefficients.get(power).copied().unwrap_or(0.0);
    let (a, b, c) = (coefficient(2), coefficient(1), coefficient(0));
    log.record(
        "Coefficients",
        format!(
            "a = {}, b = {}, c = {}",
            format_number(a),
            format_number(b),
            format_number(c)
        ),
    );

    if a.abs() <= tolerance {
        log.record(
            "Degenerate quadratic",
            "a = 0, treating as linear equation.",
        );
        let linear_form = Equation::new(standard_form, Expr::Const(0.0));
        return linear::derive(&linear_form, variable, tolerance, log);
    }

    let discriminant = b * b - 4.0 * a * c;
    let mut details = QuadraticDetails {
        a,
        b,
        c,
        discriminant,
        method: QuadraticMethod::Formula,
        repeated_root: false,
    };

    let roots = match factor_univariate(&[c, b, a], variable).filter(|f| f.is_nontrivial()) {
        Some(factorization) => {
            details.method = QuadraticMethod::Factorization;
            log.record(
                "Full factorization",
                format!("{} = {}", standard_form, factorization),
            );
            let mut roots = Vec::new();
            for factor in &factorization.factors {
                let root = factor.root().ok_or_else(|| AlgebraError::DegreeTooHigh {
                    variable: variable.name().to_string(),
                    degree: factor.degree() as u32,
                })?;
                for _ in 0..factor.multiplicity {
                    log.record(
                        format!("Solve factor: {} = 0", factor.to_expr(variable)),
                        format!("{} = {}", variable, format_number(root)),
                    );
                    roots.push(Root::Real(root));
                }
            }
            roots
        }
        None => formula_roots(&mut details, variable, tolerance, log),
    };

    let mut verified = true;
    for (i, root) in roots.iter().enumerate() {
        let holds = match root {
            Root::Real(value) => {
                let substituted = standard_form.substitute(variable, &Expr::Const(*value));
                log.record(
                    format!("Verify solution {}", i + 1),
                    format!(
                        "Substituting {} = {}: {}",
                        variable,
                        root,
                        show_reduction(&substituted)
                    ),
                );
                residual_is_zero(&substituted, tolerance)
            }
            Root::Complex(z) => {
                let residual = evaluate(&[c, b, a], *z);
                log.record(
                    format!("Verify solution {}", i + 1),
                    format!(
                        "Substituting {} = {}: residual {}",
                        variable,
                        root,
                        Root::Complex(Complex64::new(
                            snap(residual.re, tolerance),
                            snap(residual.im, tolerance)
                        ))
                    ),
                );
                residual.norm() <= tolerance
            }
        };
        verified &= holds;
    }
    info!(
        "quadratic roots [{}] by {} (verified: {})",
        SolutionValue::Roots(roots.clone()),
        details.method,
        verified
    );
    Ok(Outcome {
        kind: SolutionKind::Quadratic,
        value: Some(SolutionValue::Roots(roots)),
        verified,
        quadratic: Some(details),
    })
}

/// `x = (-b ± √Δ)/(2a)` with the usual three cases of the discriminant sign
fn formula_roots(
    details: &mut QuadraticDetails,
    variable: &Symbol,
    tolerance: f64,
    log: &mut StepLog,
) -> Vec<Root> {
    let QuadraticDetails { a, b, c, discriminant, .. } = *details;
    let (fa, fb, fc) = (format_number(a), format_number(b), format_number(c));
    log.record(
        "Method",
        format!(
            "Using quadratic formula: {} = (-b ± √(b² - 4ac)) / (2a)",
            variable
        ),
    );
    log.record(
        "Discriminant",
        format!(
            "Δ = b² - 4ac = ({})² - 4({})({}) = {}",
            fb,
            fa,
            fc,
            format_number(discriminant)
        ),
    );
    if discriminant > tolerance {
        let root = discriminant.sqrt();
        let x1 = snap((-b + root) / (2.0 * a), tolerance);
        let x2 = snap((-b - root) / (2.0 * a), tolerance);
        log.record(
            "Two real solutions",
            format!(
                "{v}₁ = (-({fb}) + √{d}) / (2×{fa}) = {x1}, {v}₂ = (-({fb}) - √{d}) / (2×{fa}) = {x2}",
                v = variable,
                fb = fb,
                fa = fa,
                d = format_number(discriminant),
                x1 = format_number(x1),
                x2 = format_number(x2)
            ),
        );
        vec![Root::Real(x1), Root::Real(x2)]
    } else if discriminant >= -tolerance {
        let x = snap(-b / (2.0 * a), tolerance);
        details.repeated_root = true;
        log.record(
            "One real solution (repeated root)",
            format!(
                "{} = -({}) / (2×{}) = {}",
                variable,
                fb,
                fa,
                format_number(x)
            ),
        );
        vec![Root::Real(x)]
    } else {
        let re = snap(-b / (2.0 * a), tolerance);
        let im = snap((-discriminant).sqrt() / (2.0 * a).abs(), tolerance);
        let roots = vec![
            Root::Complex(Complex64::new(re, im)),
            Root::Complex(Complex64::new(re, -im)),
        ];
        log.record(
            "Complex solutions",
            format!(
                "Discriminant is negative, solutions are complex: {} = {}, {} = {}",
                variable, roots[0], variable, roots[1]
            ),
        );
        roots
    }
}

/// Horner evaluation of ascending `coefficients` at `z`
fn evaluate(coefficients: &[f64], z: Complex64) -> Complex64 {
    coefficients
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + *c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::equation_assembler::EquationAssembler;
    use approx::assert_relative_eq;

    fn run(text: &str) -> (Outcome, StepLog) {
        let (equation, table) = EquationAssembler::new().parse_equation(text).unwrap();
        let variable = table.solving_variable().unwrap();
        let mut log = StepLog::new();
        let outcome = derive(&equation, &variable, 1e-9, &mut log).unwrap();
        (outcome, log)
    }

    fn sorted_real(outcome: &Outcome) -> Vec<f64> {
        let mut roots: Vec<f64> = match &outcome.value {
            Some(SolutionValue::Roots(roots)) => roots.iter().filter_map(Root::as_real).collect(),
            _ => Vec::new(),
        };
        roots.sort_by(|a, b| a.total_cmp(b));
        roots
    }

    #[test]
    fn test_factorization_path() {
        let (outcome, log) = run("x^2 - 5*x + 6 = 0");
        assert_eq!(sorted_real(&outcome), vec![2.0, 3.0]);
        assert!(outcome.verified);
        let details = outcome.quadratic.unwrap();
        assert_eq!(details.method, QuadraticMethod::Factorization);
        assert_relative_eq!(details.discriminant, 1.0);
        let descriptions: Vec<&str> = log.steps().iter().map(|s| s.description.as_str()).collect();
        assert!(descriptions.contains(&"Full factorization"));
        assert!(!descriptions.contains(&"Discriminant"));
        assert_eq!(
            descriptions.iter().filter(|d| d.starts_with("Verify solution")).count(),
            2
        );
        assert_eq!(log.steps()[2].content, "a = 1, b = -5, c = 6");
    }

    #[test]
    fn test_negative_leading_coefficient_factorization() {
        let (outcome, log) = run("5*x - x^2 - 6 = 0");
        assert_eq!(sorted_real(&outcome), vec![2.0, 3.0]);
        let factorization = log
            .steps()
            .iter()
            .find(|s| s.description == "Full factorization")
            .unwrap();
        assert!(factorization.content.ends_with("= -(x - 2)*(x - 3)"));
    }

    #[test]
    fn test_difference_of_squares() {
        let (outcome, _) = run("x^2 - 4 = 0");
        assert_eq!(sorted_real(&outcome), vec![-2.0, 2.0]);
        assert!(outcome.verified);
        assert_relative_eq!(outcome.quadratic.unwrap().discriminant, 16.0);
    }

    #[test]
    fn test_perfect_square_is_repeated() {
        let (outcome, log) = run("x^2 - 4*x + 4 = 0");
        assert_eq!(sorted_real(&outcome), vec![2.0]);
        assert!(outcome.verified);
        let details = outcome.quadratic.unwrap();
        assert!(details.repeated_root);
        assert_eq!(details.method, QuadraticMethod::Formula);
        assert!(
            log.steps()
                .iter()
                .any(|s| s.description == "One real solution (repeated root)")
        );
        let discriminant = log.steps().iter().find(|s| s.description == "Discriminant").unwrap();
        assert!(discriminant.content.ends_with("= 0"));
    }

    #[test]
    fn test_irrational_roots_use_formula() {
        let (outcome, _) = run("x^2 - 2 = 0");
        let roots = sorted_real(&outcome);
        assert_relative_eq!(roots[0], -std::f64::consts::SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(roots[1], std::f64::consts::SQRT_2, epsilon = 1e-12);
        assert!(outcome.verified);
        assert_eq!(outcome.quadratic.unwrap().method, QuadraticMethod::Formula);
    }

    #[test]
    fn test_complex_roots() {
        let (outcome, log) = run("x^2 + 2*x + 5 = 0");
        assert!(outcome.verified);
        let Some(SolutionValue::Roots(roots)) = &outcome.value else {
            panic!("expected roots");
        };
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|r| !r.is_real()));
        assert_eq!(roots[0].to_string(), "-1 + 2i");
        assert!(log.steps().iter().any(|s| s.description == "Complex solutions"));
    }

    #[test]
    fn test_degenerate_falls_back_to_linear() {
        let (outcome, log) = run("0*x^2 + 2*x - 4 = 0");
        assert_eq!(outcome.kind, SolutionKind::Linear);
        assert_eq!(outcome.value, Some(SolutionValue::Value(Expr::Const(2.0))));
        assert!(outcome.verified);
        let degenerate = log
            .steps()
            .iter()
            .position(|s| s.description == "Degenerate quadratic")
            .unwrap();
        assert_eq!(log.steps()[degenerate + 1].description, "Original equation");
        // one log, no restart of the numbering
        for (i, step) in log.steps().iter().enumerate() {
            assert_eq!(step.index, i + 1);
        }
    }

    #[test]
    fn test_non_unit_leading_coefficient() {
        let (outcome, _) = run("2*x^2 = 8");
        assert_eq!(sorted_real(&outcome), vec![-2.0, 2.0]);
        let (outcome, _) = run("2*x^2 + 3*x - 2 = 0");
        assert_eq!(sorted_real(&outcome), vec![-2.0, 0.5]);
        assert!(outcome.verified);
    }
}
