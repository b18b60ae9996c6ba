#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedAlgebra::symbolic::parse_expr::parse_expression_func;
/// let parsed_expression = parse_expression_func("2x^2 - 3(x + 1)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_string(), "2*x^2 - 3*(x + 1)");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the symbolic expression tree and the symbols it is built from
/// 2) substitutes symbols with values or other expressions
/// 3) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedAlgebra::symbolic::symbolic_engine::{Expr, Symbol};
/// let x = Symbol::new("x");
/// let expr = Expr::Const(2.0) * Expr::Var(x.clone()) + Expr::Const(5.0);
/// let at_four = expr.substitute(&x, &Expr::Const(4.0)).simplify_numbers();
/// assert_eq!(at_four, Expr::Const(13.0));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
///
/// polynomial canonical form of expressions: expansion, like-term collection, coefficient extraction
/// Example#
/// ```
///  use RustedAlgebra::symbolic::parse_expr::parse_expression_func;
///  use RustedAlgebra::symbolic::polynomial::Polynomial;
///  use RustedAlgebra::symbolic::symbolic_engine::Symbol;
///  let expr = parse_expression_func("(x - 2)*(x - 3)").unwrap();
///  let poly = Polynomial::from_expr(&expr).unwrap();
///  assert_eq!(poly.to_expr().to_string(), "x^2 - 5*x + 6");
///  // ascending powers: c, b, a
///  assert_eq!(poly.univariate_coefficients(&Symbol::new("x")).unwrap(), vec![6.0, -5.0, 1.0]);
/// ```
pub mod polynomial;
/// factorization of univariate polynomials over the rationals
pub mod factorization;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
