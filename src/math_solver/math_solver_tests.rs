#[cfg(test)]
mod tests {
    use crate::math_solver::{MathSolver, SolverError};
    use crate::solver::solution::SolutionKind;
    use crate::solver::step_solver::{Problem, StepSolver};
    use crate::text_processing::classifier::ProblemType;
    use crate::text_processing::normalizer::NormalizationError;
    use std::collections::HashMap;

    fn sorted(mut values: Vec<f64>) -> Vec<f64> {
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    #[test]
    fn test_linear_reference_problem() {
        let (analysis, solution) = MathSolver::new()
            .solve_text("Solve for x: 2x + 5 = 13")
            .unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Linear);
        assert!(analysis.confidence() > 0.0);
        assert_eq!(solution.kind(), SolutionKind::Linear);
        assert_eq!(solution.real_values(), vec![4.0]);
        assert!(solution.verified());
    }

    #[test]
    fn test_quadratic_reference_problem() {
        let (analysis, solution) = MathSolver::new()
            .solve_text("Find the roots of x^2 - 5x + 6 = 0")
            .unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Quadratic);
        assert_eq!(sorted(solution.real_values()), vec![2.0, 3.0]);
        assert!(solution.verified());
        assert_eq!(
            solution
                .steps()
                .iter()
                .filter(|s| s.description.starts_with("Verify solution"))
                .count(),
            2
        );
    }

    #[test]
    fn test_system_reference_problem() {
        let (analysis, solution) = MathSolver::new()
            .solve_text("Solve the system: x + y = 5 and 2x - y = 1")
            .unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::System);
        let assignment = &solution.assignments().unwrap()[0];
        assert_eq!(assignment.value("x"), Some(2.0));
        assert_eq!(assignment.value("y"), Some(3.0));
        assert!(solution.verified());
        assert_eq!(solution.equations().len(), 2);
    }

    #[test]
    fn test_word_problems() {
        let solver = MathSolver::new();
        let (_, solution) = solver
            .solve_text("What is x if three times x plus two equals eleven?")
            .unwrap();
        assert_eq!(solution.real_values(), vec![3.0]);

        let (analysis, solution) = solver.solve_text("x squared minus nine equals zero").unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Quadratic);
        assert_eq!(sorted(solution.real_values()), vec![-3.0, 3.0]);
    }

    #[test]
    fn test_variable_in_denominator() {
        let (analysis, solution) = MathSolver::new()
            .solve_text("10 divided by x equals 2")
            .unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Linear);
        assert_eq!(solution.real_values(), vec![5.0]);
        assert!(solution.verified());
        assert!(solution.step("Clear denominators").is_some());
    }

    #[test]
    fn test_target_variable_is_solved_for() {
        let (analysis, solution) = MathSolver::new()
            .solve_text("Solve for y: 2y + x = 10")
            .unwrap();
        assert_eq!(analysis.target(), Some("y"));
        assert_eq!(solution.variables()[0].name(), "y");
        assert_eq!(solution.value().unwrap().to_string(), "-0.5*x + 5");
    }

    #[test]
    fn test_build_problem_kinds() {
        let solver = MathSolver::new();
        let analysis = solver.analyze("x + y = 3 & x - y = 1").unwrap();
        match solver.build_problem(&analysis).unwrap() {
            Problem::System { equations, symbols } => {
                assert_eq!(equations.len(), 2);
                assert_eq!(symbols.names(), vec!["x", "y"]);
            }
            other => panic!("expected a system, got {:?}", other),
        }
        let analysis = solver.analyze("2 + 2 = 4").unwrap();
        assert!(matches!(
            solver.build_problem(&analysis),
            Err(SolverError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_normalization_errors_surface() {
        let solver = MathSolver::new();
        assert!(matches!(
            solver.solve_text("hello there"),
            Err(SolverError::Normalization(NormalizationError::Empty(_)))
        ));
        assert!(matches!(
            solver.solve_text("five hundred x = 10"),
            Err(SolverError::Normalization(
                NormalizationError::UnresolvedNumberWord { .. }
            ))
        ));
    }

    #[test]
    fn test_malformed_clause_is_dropped() {
        let solver = MathSolver::new();
        let (_, solution) = solver.solve_text("x + y = 5 and 2x + y =").unwrap();
        assert_eq!(solution.equations().len(), 1);
        assert!(solution.error().is_none());

        let (analysis, solution) = solver
            .solve_text("Solve the system: x + y = 5 and 2x + y =")
            .unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::System);
        assert_eq!(solution.kind(), SolutionKind::System);
        assert_eq!(solution.equations().len(), 1);
        assert!(solution.error().is_none());
    }

    #[test]
    fn test_unsolvable_problem_is_in_band() {
        let (_, solution) = MathSolver::new()
            .solve_text("Solve for x: x*x*x + 2*x = 8")
            .unwrap();
        assert!(solution.error().is_some());
        assert!(!solution.verified());
        assert_eq!(solution.steps().last().unwrap().description, "Error");
    }

    #[test]
    fn test_validate_input() {
        let solver = MathSolver::new();
        assert!(solver.validate_input("Solve for x: 2x + 5 = 13").is_ok());
        let reason = |text: &str| match solver.validate_input(text) {
            Err(SolverError::InvalidInput { reason, .. }) => reason,
            other => panic!("expected invalid input, got {:?}", other),
        };
        assert_eq!(reason("x=1"), "Input text is too short");
        assert_eq!(reason("2 + 2 = 4 and 3 = 3"), "No variables found in the problem");
        assert_eq!(reason("x + y = z"), "No numbers found in the problem");
    }

    #[test]
    fn test_keyword_configuration() {
        let mut extra = HashMap::new();
        extra.insert("quadratic".to_string(), vec!["parabola".to_string()]);
        let configured = MathSolver::with_keyword_config(&extra);
        let analysis = configured.analyze("the parabola x*x - 1 = 0").unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Quadratic);

        let from_toml = MathSolver::from_toml_keywords("[keywords]\nquadratic = [\"parabola\"]\n")
            .unwrap();
        let analysis = from_toml.analyze("the parabola x*x - 1 = 0").unwrap();
        assert_eq!(analysis.problem_type(), ProblemType::Quadratic);

        assert!(MathSolver::from_toml_keywords("keywords = [").is_err());
    }

    #[test]
    fn test_custom_tolerance() {
        let solver = MathSolver::new().with_solver(StepSolver::with_tolerance(1e-6));
        let (_, solution) = solver.solve_text("x^2 - 2 = 0").unwrap();
        assert!(solution.verified());
        assert_eq!(solution.real_values().len(), 2);
    }

    #[test]
    fn test_solve_with_logging_rejects_unknown_level() {
        let solver = MathSolver::new();
        assert!(matches!(
            solver.solve_with_logging("2x = 4", Some("loud")),
            Err(SolverError::Logging(_))
        ));
        let (_, solution) = solver.solve_with_logging("2x = 4", Some("off")).unwrap();
        assert_eq!(solution.real_values(), vec![2.0]);
    }
}
