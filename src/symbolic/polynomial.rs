//! # Polynomial canonical form
//!
//! Multivariate polynomials with real coefficients, stored as a map from monomials to
//! coefficients. Converting an `Expr` into a `Polynomial` expands every product and power and
//! collects like terms, converting back prints the terms in graded order (highest degree first,
//! `x` before `y` on ties). The solver uses it for standard forms, coefficient extraction and
//! zero tests during verification.
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// coefficients below this magnitude are dropped after every arithmetic operation
const COEFF_EPS: f64 = 1e-12;
/// largest exponent accepted when expanding `base^n`
const MAX_EXPANSION_EXPONENT: u32 = 64;

/// Failure inside coefficient extraction, factorization or solving.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// expression is not a polynomial (division by a symbolic expression, fractional exponent ...)
    NonPolynomial(String),
    /// a coefficient of the solving variable still depends on other symbols
    NonNumericCoefficient(String),
    DegreeTooHigh { variable: String, degree: u32 },
    DivisionByZero(String),
    /// an equation of a system is not of first degree
    NonLinearSystem(String),
    NoVariables,
    NoSolvingVariable(String),
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlgebraError::NonPolynomial(expr) => {
                write!(f, "expression is not a polynomial: {}", expr)
            }
            AlgebraError::NonNumericCoefficient(expr) => {
                write!(f, "coefficients are not numeric in: {}", expr)
            }
            AlgebraError::DegreeTooHigh { variable, degree } => write!(
                f,
                "degree {} in {} is too high for this procedure",
                degree, variable
            ),
            AlgebraError::DivisionByZero(expr) => write!(f, "division by zero in: {}", expr),
            AlgebraError::NonLinearSystem(eq) => {
                write!(f, "system contains a non-linear equation: {}", eq)
            }
            AlgebraError::NoVariables => write!(f, "no variables to solve for"),
            AlgebraError::NoSolvingVariable(expr) => {
                write!(f, "the solving variable does not occur in: {}", expr)
            }
        }
    }
}

impl std::error::Error for AlgebraError {}

/// Product of symbols raised to positive integer powers; the empty product is the constant 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Symbol, u32>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(BTreeMap::new())
    }

    pub fn of(symbol: Symbol, power: u32) -> Self {
        let mut powers = BTreeMap::new();
        if power > 0 {
            powers.insert(symbol, power);
        }
        Monomial(powers)
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    /// total degree
    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn degree_in(&self, symbol: &Symbol) -> u32 {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.0.keys()
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (symbol, power) in &other.0 {
            *powers.entry(symbol.clone()).or_insert(0) += power;
        }
        Monomial(powers)
    }

    /// the monomial with `symbol` removed
    pub fn without(&self, symbol: &Symbol) -> Monomial {
        let mut powers = self.0.clone();
        powers.remove(symbol);
        Monomial(powers)
    }

    /// Graded lexicographic order: higher total degree first, then the larger power of the
    /// alphabetically first symbol.
    pub fn grlex_cmp(&self, other: &Monomial) -> Ordering {
        match self.degree().cmp(&other.degree()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        let names: BTreeSet<&Symbol> = self.0.keys().chain(other.0.keys()).collect();
        for symbol in names {
            match self.degree_in(symbol).cmp(&other.degree_in(symbol)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }

    /// `coefficient * x^a * y^b ...`, coefficient elided when it is one
    fn to_term(&self, coefficient: f64) -> Expr {
        let mut factors = self.0.iter().map(|(symbol, power)| {
            let var = Expr::Var(symbol.clone());
            if *power == 1 {
                var
            } else {
                var.pow(Expr::Const(*power as f64))
            }
        });
        let first = if (coefficient - 1.0).abs() < COEFF_EPS {
            match factors.next() {
                Some(factor) => factor,
                None => return Expr::Const(1.0),
            }
        } else {
            Expr::Const(coefficient)
        };
        factors.fold(first, |acc, factor| acc * factor)
    }
}

/// Polynomial in any number of symbols with `f64` coefficients.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, f64>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn constant(value: f64) -> Self {
        let mut poly = Polynomial::zero();
        poly.add_term(Monomial::one(), value);
        poly
    }

    pub fn variable(symbol: Symbol) -> Self {
        let mut poly = Polynomial::zero();
        poly.add_term(Monomial::of(symbol, 1), 1.0);
        poly
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        let entry = self.terms.entry(monomial.clone()).or_insert(0.0);
        *entry += coefficient;
        if entry.abs() < COEFF_EPS {
            self.terms.remove(&monomial);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, f64)> {
        self.terms.iter().map(|(m, c)| (m, *c))
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        for (monomial, coefficient) in &other.terms {
            result.add_term(monomial.clone(), *coefficient);
        }
        result
    }

    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.scale(-1.0))
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        let mut result = Polynomial::zero();
        for (monomial, coefficient) in &self.terms {
            result.add_term(monomial.clone(), coefficient * factor);
        }
        result
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                result.add_term(m1.mul(m2), c1 * c2);
            }
        }
        result
    }

    /// repeated squaring
    pub fn pow(&self, exponent: u32) -> Polynomial {
        let mut result = Polynomial::constant(1.0);
        let mut base = self.clone();
        let mut n = exponent;
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Expands `expr` into canonical polynomial form.
    ///
    /// # Errors
    /// - `DivisionByZero` when dividing by a constant zero or meeting a non-finite constant
    /// - `NonPolynomial` when dividing by an expression containing symbols or raising to an
    ///   exponent that is not a non-negative integer constant
    pub fn from_expr(expr: &Expr) -> Result<Polynomial, AlgebraError> {
        match expr {
            Expr::Var(symbol) => Ok(Polynomial::variable(symbol.clone())),
            Expr::Const(value) => {
                if value.is_finite() {
                    Ok(Polynomial::constant(*value))
                } else {
                    Err(AlgebraError::DivisionByZero(expr.to_string()))
                }
            }
            Expr::Add(lhs, rhs) => Ok(Self::from_expr(lhs)?.add(&Self::from_expr(rhs)?)),
            Expr::Sub(lhs, rhs) => Ok(Self::from_expr(lhs)?.sub(&Self::from_expr(rhs)?)),
            Expr::Mul(lhs, rhs) => Ok(Self::from_expr(lhs)?.mul(&Self::from_expr(rhs)?)),
            Expr::Div(lhs, rhs) => {
                let numerator = Self::from_expr(lhs)?;
                let denominator = Self::from_expr(rhs)?;
                match denominator.constant_value() {
                    Some(value) if value.abs() < COEFF_EPS => {
                        Err(AlgebraError::DivisionByZero(expr.to_string()))
                    }
                    Some(value) => Ok(numerator.scale(1.0 / value)),
                    None => Err(AlgebraError::NonPolynomial(expr.to_string())),
                }
            }
            Expr::Pow(base, exp) => {
                let base = Self::from_expr(base)?;
                let exponent = Self::from_expr(exp)?
                    .constant_value()
                    .ok_or_else(|| AlgebraError::NonPolynomial(expr.to_string()))?;
                let rounded = exponent.round();
                if (exponent - rounded).abs() > 1e-9
                    || rounded < 0.0
                    || rounded > MAX_EXPANSION_EXPONENT as f64
                {
                    return Err(AlgebraError::NonPolynomial(expr.to_string()));
                }
                Ok(base.pow(rounded as u32))
            }
        }
    }

    /// Writes `expr` as a single fraction `(numerator, denominator)` of polynomials.
    /// Constant divisors are folded into the numerator, so a polynomial input comes back with
    /// the denominator `1` and the same numerator `from_expr` gives. The denominator is the
    /// product of every symbolic divisor met; its zeros are the excluded values.
    ///
    /// # Errors
    /// - `DivisionByZero` for a constant zero divisor
    /// - `NonPolynomial` for exponents that are not integer constants
    pub fn fraction_from_expr(expr: &Expr) -> Result<(Polynomial, Polynomial), AlgebraError> {
        let one = Polynomial::constant(1.0);
        match expr {
            Expr::Var(_) | Expr::Const(_) => Ok((Self::from_expr(expr)?, one)),
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => {
                let (n1, d1) = Self::fraction_from_expr(lhs)?;
                let (mut n2, d2) = Self::fraction_from_expr(rhs)?;
                if matches!(expr, Expr::Sub(..)) {
                    n2 = n2.scale(-1.0);
                }
                if d1 == d2 {
                    Ok((n1.add(&n2), d1))
                } else {
                    Ok((n1.mul(&d2).add(&n2.mul(&d1)), d1.mul(&d2)))
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (n1, d1) = Self::fraction_from_expr(lhs)?;
                let (n2, d2) = Self::fraction_from_expr(rhs)?;
                Ok((n1.mul(&n2), d1.mul(&d2)))
            }
            Expr::Div(lhs, rhs) => {
                let (n1, d1) = Self::fraction_from_expr(lhs)?;
                let (n2, d2) = Self::fraction_from_expr(rhs)?;
                match n2.constant_value() {
                    Some(value) if value.abs() < COEFF_EPS => {
                        Err(AlgebraError::DivisionByZero(expr.to_string()))
                    }
                    Some(value) => Ok((n1.mul(&d2).scale(1.0 / value), d1)),
                    None => Ok((n1.mul(&d2), d1.mul(&n2))),
                }
            }
            Expr::Pow(base, exp) => {
                let (numerator, denominator) = Self::fraction_from_expr(base)?;
                let exponent = Self::from_expr(exp)?
                    .constant_value()
                    .ok_or_else(|| AlgebraError::NonPolynomial(expr.to_string()))?;
                let rounded = exponent.round();
                if (exponent - rounded).abs() > 1e-9
                    || rounded.abs() > MAX_EXPANSION_EXPONENT as f64
                {
                    return Err(AlgebraError::NonPolynomial(expr.to_string()));
                }
                let power = rounded.abs() as u32;
                if rounded < 0.0 {
                    if numerator.is_zero() {
                        return Err(AlgebraError::DivisionByZero(expr.to_string()));
                    }
                    Ok((denominator.pow(power), numerator.pow(power)))
                } else {
                    Ok((numerator.pow(power), denominator.pow(power)))
                }
            }
        }
    }

    /// Converts back to an expression tree, terms in graded order.
    pub fn to_expr(&self) -> Expr {
        let mut terms: Vec<(&Monomial, f64)> = self.terms().collect();
        terms.sort_by(|(m1, _), (m2, _)| m2.grlex_cmp(m1));
        let mut iter = terms.into_iter();
        let Some((monomial, coefficient)) = iter.next() else {
            return Expr::Const(0.0);
        };
        let mut expr = monomial.to_term(coefficient);
        for (monomial, coefficient) in iter {
            if coefficient < 0.0 {
                expr = expr - monomial.to_term(-coefficient);
            } else {
                expr = expr + monomial.to_term(coefficient);
            }
        }
        expr
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// every coefficient is within `tolerance` of zero
    pub fn is_negligible(&self, tolerance: f64) -> bool {
        self.terms.values().all(|c| c.abs() <= tolerance)
    }

    /// the value of a polynomial without symbols
    pub fn constant_value(&self) -> Option<f64> {
        let mut value = 0.0;
        for (monomial, coefficient) in &self.terms {
            if !monomial.is_constant() {
                return None;
            }
            value += coefficient;
        }
        Some(value)
    }

    /// total degree, 0 for constants and for the zero polynomial
    pub fn degree(&self) -> u32 {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    pub fn degree_in(&self, symbol: &Symbol) -> u32 {
        self.terms
            .keys()
            .map(|m| m.degree_in(symbol))
            .max()
            .unwrap_or(0)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.degree_in(symbol) > 0
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.terms
            .keys()
            .flat_map(|m| m.symbols().cloned())
            .collect()
    }

    /// Coefficients of `symbol` in ascending powers; each coefficient is a polynomial in the
    /// remaining symbols. Always at least one entry.
    pub fn coefficients_in(&self, symbol: &Symbol) -> Vec<Polynomial> {
        let degree = self.degree_in(symbol) as usize;
        let mut coefficients = vec![Polynomial::zero(); degree + 1];
        for (monomial, coefficient) in &self.terms {
            let power = monomial.degree_in(symbol) as usize;
            coefficients[power].add_term(monomial.without(symbol), *coefficient);
        }
        coefficients
    }

    /// Numeric coefficients of `symbol` in ascending powers.
    ///
    /// # Errors
    /// `NonNumericCoefficient` when some term contains another symbol
    pub fn univariate_coefficients(&self, symbol: &Symbol) -> Result<Vec<f64>, AlgebraError> {
        self.coefficients_in(symbol)
            .iter()
            .map(|c| {
                c.constant_value()
                    .ok_or_else(|| AlgebraError::NonNumericCoefficient(self.to_expr().to_string()))
            })
            .collect()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

/// Structural facts about an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionInfo {
    pub expression: String,
    /// total degree, `None` when the expression is not a polynomial
    pub degree: Option<u32>,
    pub variables: Vec<String>,
    pub is_polynomial: bool,
    pub is_linear: bool,
    pub is_quadratic: bool,
}

impl Expr {
    pub fn info(&self) -> ExpressionInfo {
        let variables = self
            .free_symbols()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let degree = Polynomial::from_expr(self).ok().map(|p| p.degree());
        ExpressionInfo {
            expression: self.to_string(),
            degree,
            variables,
            is_polynomial: degree.is_some(),
            is_linear: degree == Some(1),
            is_quadratic: degree == Some(2),
        }
    }
}
