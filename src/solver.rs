/// # Step solver
/// derivations for linear equations, quadratic equations and linear systems; every call returns a
/// `Solution` carrying its own ordered step log and a verification flag
///# Example
/// ```
/// use RustedAlgebra::equations::equation_assembler::EquationAssembler;
/// use RustedAlgebra::solver::step_solver::StepSolver;
/// let (equation, symbols) = EquationAssembler::new().parse_equation("2*x + 5 = 13").unwrap();
/// let solution = StepSolver::new().solve_linear(&equation, &symbols);
/// assert!(solution.verified());
/// assert_eq!(solution.real_values(), vec![4.0]);
/// for step in solution.steps() {
///     println!("{}. {}: {}", step.index, step.description, step.content);
/// }
/// ```
/// ___________________________________________________________________________________________
/// records: steps, call-scoped step log, solution values and the solution itself
pub mod solution;
/// linear procedure
pub mod linear;
/// quadratic procedure: factorization or discriminant
pub mod quadratic;
/// simultaneous linear equations by Gauss-Jordan elimination
pub mod system;
/// entry points and dispatch over the problem kind
pub mod step_solver;

mod step_solver_tests;
