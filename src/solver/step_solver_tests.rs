#[cfg(test)]
mod tests {
    use crate::equations::equation_assembler::EquationAssembler;
    use crate::equations::symbol_table::SymbolTable;
    use crate::solver::solution::{Assignment, QuadraticMethod, SolutionKind, SolutionValue};
    use crate::solver::step_solver::{Problem, StepSolver};
    use crate::symbolic::polynomial::AlgebraError;
    use crate::symbolic::symbolic_engine::{Expr, Symbol};
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use std::thread;

    fn equation(text: &str) -> (crate::equations::equation_assembler::Equation, SymbolTable) {
        EquationAssembler::new().parse_equation(text).unwrap()
    }

    fn assert_indices_consecutive(solution: &crate::solver::solution::Solution) {
        for (i, step) in solution.steps().iter().enumerate() {
            assert_eq!(step.index, i + 1);
        }
    }

    #[test]
    fn test_linear_reference() {
        let (eq, symbols) = equation("2*x + 5 = 13");
        let solution = StepSolver::new().solve_linear(&eq, &symbols);
        assert_eq!(solution.kind(), SolutionKind::Linear);
        assert_eq!(solution.real_values(), vec![4.0]);
        assert!(solution.verified());
        assert!(solution.error().is_none());
        assert_eq!(solution.source(), "2*x + 5 = 13");
        assert_eq!(solution.variables()[0].name(), "x");
        assert_indices_consecutive(&solution);
        assert_eq!(solution.step("Solve for variable").unwrap().content, "x = 4");
    }

    #[test]
    fn test_linear_solutions_satisfy_the_equation() {
        let solver = StepSolver::new();
        for text in [
            "3*x - 7 = 2",
            "5 = 2*x + 1",
            "0.5*x + 0.25 = 1",
            "4*(x - 1) = 2*x + 6",
            "x/4 = 3",
            "-x + 2 = 7",
        ] {
            let (eq, symbols) = equation(text);
            let solution = solver.solve_linear(&eq, &symbols);
            let values = solution.real_values();
            assert_eq!(values.len(), 1, "{}", text);
            assert!(solution.verified(), "{}", text);
            let x = symbols.get("x").unwrap().clone();
            let assignment = Assignment::single(x, Expr::Const(values[0]));
            assert!(solver.verify_solution(&eq, &assignment), "{}", text);
        }
    }

    #[test]
    fn test_linear_tautology_and_contradiction() {
        let solver = StepSolver::new();
        let (eq, symbols) = equation("2*x + 3 = 2*x + 3");
        let solution = solver.solve_linear(&eq, &symbols);
        assert_eq!(solution.value().unwrap().to_string(), "all real x");
        assert!(solution.verified());

        let (eq, symbols) = equation("2*x + 3 = 2*x + 5");
        let solution = solver.solve_linear(&eq, &symbols);
        assert_eq!(solution.value().unwrap().to_string(), "no real x");
        assert!(!solution.verified());
        assert!(solution.error().is_none());
    }

    #[test]
    fn test_linear_error_is_in_band() {
        let (eq, symbols) = equation("x^3 = 8");
        let solution = StepSolver::new().solve_linear(&eq, &symbols);
        assert!(!solution.verified());
        assert!(matches!(
            solution.error(),
            Some(AlgebraError::DegreeTooHigh { degree: 3, .. })
        ));
        assert_eq!(solution.steps().last().unwrap().description, "Error");
        assert!(solution.value().is_none());
        assert_indices_consecutive(&solution);
    }

    #[test]
    fn test_quadratic_reference() {
        let (eq, symbols) = equation("x^2 - 5*x + 6 = 0");
        let solution = StepSolver::new().solve_quadratic(&eq, &symbols);
        assert_eq!(solution.kind(), SolutionKind::Quadratic);
        let mut roots = solution.real_values();
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(roots, vec![2.0, 3.0]);
        assert!(solution.verified());
        let details = solution.quadratic().unwrap();
        assert_eq!((details.a, details.b, details.c), (1.0, -5.0, 6.0));
        assert_eq!(details.method, QuadraticMethod::Factorization);
        assert_eq!(
            solution.step("Full factorization").unwrap().content,
            "x^2 - 5*x + 6 = (x - 2)*(x - 3)"
        );
        assert_indices_consecutive(&solution);
    }

    #[test]
    fn test_quadratic_discriminant_cases() {
        let solver = StepSolver::new();

        let (eq, symbols) = equation("x^2 - 4 = 0");
        let solution = solver.solve_quadratic(&eq, &symbols);
        let mut roots = solution.real_values();
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(roots, vec![-2.0, 2.0]);
        assert_relative_eq!(solution.quadratic().unwrap().discriminant, 16.0);
        assert!(solution.verified());

        let (eq, symbols) = equation("x^2 - 4*x + 4 = 0");
        let solution = solver.solve_quadratic(&eq, &symbols);
        assert_eq!(solution.real_values(), vec![2.0]);
        assert!(solution.quadratic().unwrap().repeated_root);
        assert!(solution.verified());

        let (eq, symbols) = equation("x^2 + 1 = 0");
        let solution = solver.solve_quadratic(&eq, &symbols);
        assert!(solution.real_values().is_empty());
        assert_eq!(solution.roots().unwrap().len(), 2);
        assert!(solution.verified());
        assert!(solution.step("Complex solutions").is_some());
    }

    #[test]
    fn test_quadratic_with_rhs_terms() {
        let (eq, symbols) = equation("x^2 = 3*x + 10");
        let solution = StepSolver::new().solve_quadratic(&eq, &symbols);
        let mut roots = solution.real_values();
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(roots, vec![-2.0, 5.0]);
        assert_eq!(
            solution.step("Standard form").unwrap().content,
            "x^2 - 3*x - 10 = 0"
        );
    }

    #[test]
    fn test_quadratic_degenerate_returns_linear() {
        let (eq, symbols) = equation("x^2 + 3*x = x^2 + 6");
        let solution = StepSolver::new().solve_quadratic(&eq, &symbols);
        assert_eq!(solution.kind(), SolutionKind::Linear);
        assert_eq!(solution.real_values(), vec![2.0]);
        assert!(solution.verified());
        assert!(solution.step("Degenerate quadratic").is_some());
        assert_indices_consecutive(&solution);
    }

    #[test]
    fn test_quadratic_cubic_is_error() {
        let (eq, symbols) = equation("x^3 + x = 0");
        let solution = StepSolver::new().solve_quadratic(&eq, &symbols);
        assert!(solution.error().is_some());
        assert_eq!(solution.steps().last().unwrap().description, "Error");
        assert!(!solution.verified());
    }

    #[test]
    fn test_system_reference() {
        let (system, symbols) = EquationAssembler::new()
            .parse_system("x + y = 5 and 2*x - y = 1")
            .unwrap();
        let solver = StepSolver::new();
        let solution = solver.solve_system(&system, &symbols);
        assert_eq!(solution.kind(), SolutionKind::System);
        let assignment = &solution.assignments().unwrap()[0];
        assert_eq!(assignment.value("x"), Some(2.0));
        assert_eq!(assignment.value("y"), Some(3.0));
        assert!(solution.verified());
        for equation in &system {
            assert!(solver.verify_solution(equation, assignment));
        }
        assert_eq!(
            solution.steps().iter().filter(|s| s.description.starts_with("Verify equation")).count(),
            2
        );
        assert_eq!(solution.source(), "x + y = 5, 2*x - y = 1");
    }

    #[test]
    fn test_system_without_solution() {
        let (system, symbols) = EquationAssembler::new()
            .parse_system("x + y = 1 and x + y = 2")
            .unwrap();
        let solution = StepSolver::new().solve_system(&system, &symbols);
        assert!(solution.value().is_none());
        assert!(!solution.verified());
        assert!(solution.step("No solution").is_some());
        assert!(solution.error().is_none());
    }

    #[test]
    fn test_system_without_variables_is_error() {
        let (system, symbols) = EquationAssembler::new().parse_system("1 = 1 and 2 = 2").unwrap();
        let solution = StepSolver::new().solve_system(&system, &symbols);
        assert_eq!(solution.error(), Some(&AlgebraError::NoVariables));
    }

    #[test]
    fn test_dispatch_by_problem() {
        let (eq, symbols) = equation("x^2 - 1 = 0");
        let problem = Problem::Quadratic {
            equation: eq,
            symbols,
        };
        assert_eq!(problem.kind(), SolutionKind::Quadratic);
        let solution = StepSolver::new().solve(&problem);
        assert_eq!(solution.kind(), SolutionKind::Quadratic);
        assert_eq!(solution.real_values().len(), 2);
    }

    #[test]
    fn test_preferred_variable() {
        let (eq, mut symbols) = equation("x + 2*y = 8");
        symbols.prefer("y");
        let solution = StepSolver::new().solve_linear(&eq, &symbols);
        assert_eq!(solution.variables()[0].name(), "y");
        assert!(matches!(solution.value(), Some(SolutionValue::Value(_))));
        assert_eq!(solution.value().unwrap().to_string(), "-0.5*x + 4");
        assert!(solution.verified());
    }

    #[test]
    fn test_fresh_log_per_call() {
        let solver = StepSolver::new();
        let (eq, symbols) = equation("2*x + 5 = 13");
        let first = solver.solve_linear(&eq, &symbols);
        let second = solver.solve_linear(&eq, &symbols);
        assert_eq!(first.steps(), second.steps());
        assert_eq!(first.steps()[0].index, 1);
    }

    #[test]
    fn test_shared_solver_across_threads() {
        let solver = Arc::new(StepSolver::new());
        let handles: Vec<_> = (1..=4)
            .map(|k| {
                let solver = Arc::clone(&solver);
                thread::spawn(move || {
                    let text = format!("x + {} = {}", k, 2 * k);
                    let (eq, symbols) = EquationAssembler::new().parse_equation(&text).unwrap();
                    (k, solver.solve_linear(&eq, &symbols))
                })
            })
            .collect();
        for handle in handles {
            let (k, solution) = handle.join().unwrap();
            assert_eq!(solution.real_values(), vec![k as f64]);
            assert_eq!(solution.steps().len(), 5);
        }
    }

    #[test]
    fn test_verify_solution_rejects_wrong_value() {
        let (eq, _) = equation("2*x + 5 = 13");
        let wrong = Assignment::single(Symbol::new("x"), Expr::Const(3.0));
        assert!(!StepSolver::new().verify_solution(&eq, &wrong));
    }

    #[test]
    fn test_summary() {
        let (eq, symbols) = equation("2*x + 5 = 13");
        let summary = StepSolver::new().solve_linear(&eq, &symbols).summary();
        assert!(summary.contains("Type: linear"));
        assert!(summary.contains("Solution: x = 4"));
        assert!(summary.contains("Verified: true"));
    }
}
