/// # Equations
/// building symbolic equations from canonical text
///# Example
/// ```
/// use RustedAlgebra::equations::equation_assembler::EquationAssembler;
/// let assembler = EquationAssembler::new();
/// let (system, symbols) = assembler.parse_system("x + y = 5 and 2*x - y = 1").unwrap();
/// assert_eq!(system.len(), 2);
/// assert_eq!(symbols.names(), vec!["x", "y"]);
/// // the same name resolves to the same symbol in every clause
/// let x_first = system[0].lhs.free_symbols().into_iter().next().unwrap();
/// assert!(x_first.same_instance(symbols.get("x").unwrap()));
/// ```
/// ___________________________________________________________________________________________
/// interning of variable names to shared symbols
pub mod symbol_table;
/// Equation, EquationSet and the assembler turning text into them
pub mod equation_assembler;
