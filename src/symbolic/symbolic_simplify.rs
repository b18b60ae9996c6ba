//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification for the expressions the solver produces while it derives standard
//! forms and checks candidate solutions.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: Evaluates arithmetic operations on numerical constants
//! 2. **Algebraic Identities**: Applies mathematical rules like x + 0 = x, x * 1 = x
//! 3. **Polynomial Canonicalization**: Expands products and collects like terms, so that
//!    equal polynomials print identically
//!
//! `simplify` chains all three and is what the step solver records in its derivations.

use crate::symbolic::polynomial::{AlgebraError, Polynomial};
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Simplifies expressions by evaluating constant arithmetic operations.
    ///
    /// ## Examples
    ///
    /// - `2 + 3` → `5`
    /// - `2 * (3 + 4)` → `14`
    /// - `x + (2 * 3)` → `x + 6`
    pub fn simplify_numbers(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                (l, r) => Expr::Add(l.boxed(), r.boxed()),
            },
            Expr::Sub(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                (l, r) => Expr::Sub(l.boxed(), r.boxed()),
            },
            Expr::Mul(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                (l, r) => Expr::Mul(l.boxed(), r.boxed()),
            },
            Expr::Div(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a / b),
                (l, r) => Expr::Div(l.boxed(), r.boxed()),
            },
            Expr::Pow(base, exp) => match (base.simplify_numbers(), exp.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.powf(b)),
                (l, r) => Expr::Pow(l.boxed(), r.boxed()),
            },
        }
    }

    /// Applies the neutral/absorbing element identities bottom-up:
    /// `x + 0`, `x - 0`, `x*1`, `x*0`, `x/1`, `x^1`, `x^0`, `0 - x`, `-(-x)`.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(a), _) if *a == 0.0 => r,
                    (_, Expr::Const(b)) if *b == 0.0 => l,
                    _ => Expr::Add(l.boxed(), r.boxed()),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(b)) if *b == 0.0 => l,
                    (Expr::Const(a), _) if *a == 0.0 => (-r).simplify_(),
                    _ if l == r => Expr::Const(0.0),
                    _ => Expr::Sub(l.boxed(), r.boxed()),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(a), _) | (_, Expr::Const(a)) if *a == 0.0 => Expr::Const(0.0),
                    (Expr::Const(a), _) if *a == 1.0 => r,
                    (_, Expr::Const(b)) if *b == 1.0 => l,
                    // -1 * (-1 * x) = x
                    (Expr::Const(a), Expr::Mul(inner_l, inner_r))
                        if *a == -1.0 && **inner_l == Expr::Const(-1.0) =>
                    {
                        (**inner_r).clone()
                    }
                    (Expr::Const(a), Expr::Mul(inner_l, inner_r)) => {
                        if let Expr::Const(b) = **inner_l {
                            Expr::Mul(Expr::Const(a * b).boxed(), inner_r.clone())
                        } else {
                            Expr::Mul(l.boxed(), r.boxed())
                        }
                    }
                    _ => Expr::Mul(l.boxed(), r.boxed()),
                }
            }
            Expr::Div(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(a), _) if *a == 0.0 && !r.is_zero() => Expr::Const(0.0),
                    (_, Expr::Const(b)) if *b == 1.0 => l,
                    _ => Expr::Div(l.boxed(), r.boxed()),
                }
            }
            Expr::Pow(base, exp) => {
                let (b, e) = (base.simplify_(), exp.simplify_());
                match (&b, &e) {
                    (Expr::Const(x), Expr::Const(y)) => Expr::Const(x.powf(*y)),
                    (_, Expr::Const(y)) if *y == 0.0 => Expr::Const(1.0),
                    (_, Expr::Const(y)) if *y == 1.0 => b,
                    _ => Expr::Pow(b.boxed(), e.boxed()),
                }
            }
        }
    }

    /// Expands products and powers and collects like terms into the canonical polynomial
    /// printing order (descending degree).
    ///
    /// Fails for expressions that are not polynomials, e.g. division by an expression
    /// containing a symbol or a fractional exponent.
    pub fn expand(&self) -> Result<Expr, AlgebraError> {
        Ok(Polynomial::from_expr(self)?.to_expr())
    }

    /// Full simplification: identities, constant folding and polynomial canonical form.
    ///
    /// `2*x + 3 - x` → `x + 3`, `(x - 2)*(x + 2)` → `x^2 - 4`
    pub fn simplify(&self) -> Result<Expr, AlgebraError> {
        self.simplify_().expand()
    }

    /// Canonical form when possible, identity-level simplification otherwise.
    pub fn simplify_lossy(&self) -> Expr {
        let partial = self.simplify_();
        match partial.expand() {
            Ok(expanded) => expanded,
            Err(_) => partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Symbol;

    #[test]
    fn test_simplify_numbers_folds_constants() {
        let expr = Expr::Const(2.0) * (Expr::Const(3.0) + Expr::Const(4.0));
        assert_eq!(expr.simplify_numbers(), Expr::Const(14.0));
        let x = Expr::var("x");
        let expr = x.clone() + Expr::Const(2.0) * Expr::Const(3.0);
        assert_eq!(expr.simplify_numbers(), x + Expr::Const(6.0));
    }

    #[test]
    fn test_simplify_identities() {
        let x = Expr::var("x");
        assert_eq!((x.clone() + Expr::Const(0.0)).simplify_(), x);
        assert_eq!((Expr::Const(1.0) * x.clone()).simplify_(), x);
        assert_eq!((x.clone() * Expr::Const(0.0)).simplify_(), Expr::Const(0.0));
        assert_eq!(x.clone().pow(Expr::Const(1.0)).simplify_(), x);
        assert_eq!((-(-x.clone())).simplify_(), x);
        assert_eq!((x.clone() - x.clone()).simplify_(), Expr::Const(0.0));
    }

    #[test]
    fn test_simplify_collects_like_terms() {
        let x = Expr::var("x");
        let expr = Expr::Const(2.0) * x.clone() + Expr::Const(3.0) - x.clone();
        assert_eq!(expr.simplify().unwrap().to_string(), "x + 3");
    }

    #[test]
    fn test_expand_difference_of_squares() {
        let x = Expr::var("x");
        let expr = (x.clone() - Expr::Const(2.0)) * (x.clone() + Expr::Const(2.0));
        assert_eq!(expr.expand().unwrap().to_string(), "x^2 - 4");
    }

    #[test]
    fn test_simplify_rejects_symbolic_division() {
        let x = Expr::Var(Symbol::new("x"));
        let expr = Expr::Const(1.0) / x;
        assert!(matches!(expr.simplify(), Err(AlgebraError::NonPolynomial(_))));
        // the lossy variant falls back to the identity level
        assert_eq!(expr.simplify_lossy().to_string(), "1/x");
    }
}
