//! Factorization of univariate polynomials over the rationals.
//!
//! Coefficients are scaled to integers, the integer content is divided out and rational roots
//! `p/q` are searched with the rational root theorem (`p` divides the constant term, `q` the
//! leading coefficient). Every root found splits off a linear factor `q*x - p`; whatever is left
//! without rational roots is kept as one irreducible factor. Candidate roots are tested in exact
//! integer arithmetic so no tolerance decides whether a factor exists.
use crate::symbolic::polynomial::Polynomial;
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use std::fmt;

/// largest denominator tried when turning float coefficients into integers
const MAX_DENOMINATOR: i128 = 1000;
/// divisor enumeration is skipped for integer coefficients above this magnitude
const MAX_DIVISOR_SEARCH: i128 = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    /// ascending powers
    pub coefficients: Vec<f64>,
    pub multiplicity: u32,
}

impl Factor {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// the root of a linear factor
    pub fn root(&self) -> Option<f64> {
        match self.coefficients.as_slice() {
            [c0, c1] if *c1 != 0.0 => {
                let root = -c0 / c1;
                // no negative zero in printed roots
                Some(if root == 0.0 { 0.0 } else { root })
            }
            _ => None,
        }
    }

    pub fn to_expr(&self, symbol: &Symbol) -> Expr {
        let mut poly = Polynomial::zero();
        for (power, coefficient) in self.coefficients.iter().enumerate() {
            poly = poly.add(
                &Polynomial::constant(*coefficient)
                    .mul(&Polynomial::variable(symbol.clone()).pow(power as u32)),
            );
        }
        poly.to_expr()
    }
}

/// `content * factor_1^m_1 * factor_2^m_2 ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    pub symbol: Symbol,
    pub content: f64,
    pub factors: Vec<Factor>,
}

impl Factorization {
    /// two or more distinct irreducible factors
    pub fn is_nontrivial(&self) -> bool {
        self.factors.len() >= 2
    }

    pub fn to_expr(&self) -> Expr {
        let mut parts = self.factors.iter().map(|factor| {
            let expr = factor.to_expr(&self.symbol);
            if factor.multiplicity > 1 {
                expr.pow(Expr::Const(factor.multiplicity as f64))
            } else {
                expr
            }
        });
        let first = if (self.content - 1.0).abs() < 1e-12 {
            match parts.next() {
                Some(part) => part,
                None => return Expr::Const(1.0),
            }
        } else {
            Expr::Const(self.content)
        };
        parts.fold(first, |acc, part| acc * part)
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // a content of -1 is shown as a leading sign
        let negated = (self.content + 1.0).abs() < 1e-12 && !self.factors.is_empty();
        let show_content =
            ((self.content - 1.0).abs() > 1e-12 && !negated) || self.factors.is_empty();
        let standalone = !show_content && !negated && self.factors.len() == 1;
        let mut pieces = Vec::new();
        if show_content {
            pieces.push(format_number(self.content));
        }
        for factor in &self.factors {
            let expr = factor.to_expr(&self.symbol);
            let atom = matches!(expr, Expr::Var(_) | Expr::Const(_));
            let body = if atom || (standalone && factor.multiplicity == 1) {
                expr.to_string()
            } else {
                format!("({})", expr)
            };
            if factor.multiplicity > 1 {
                pieces.push(format!("{}^{}", body, factor.multiplicity));
            } else {
                pieces.push(body);
            }
        }
        if negated {
            write!(f, "-")?;
        }
        write!(f, "{}", pieces.join("*"))
    }
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// smallest `L <= MAX_DENOMINATOR` turning every coefficient into an integer
fn integer_scale(coefficients: &[f64]) -> Option<(i128, Vec<i128>)> {
    'scales: for scale in 1..=MAX_DENOMINATOR {
        let mut ints = Vec::with_capacity(coefficients.len());
        for c in coefficients {
            let scaled = c * scale as f64;
            if !scaled.is_finite() || scaled.abs() > 1e15 {
                return None;
            }
            let rounded = scaled.round();
            if (scaled - rounded).abs() > 1e-9 * rounded.abs().max(1.0) {
                continue 'scales;
            }
            ints.push(rounded as i128);
        }
        return Some((scale, ints));
    }
    None
}

fn positive_divisors(n: i128) -> Vec<i128> {
    let n = n.abs();
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// exact `sum a_k p^k q^(n-k)`, `None` on overflow
fn scaled_value(a: &[i128], p: i128, q: i128) -> Option<i128> {
    let n = a.len() - 1;
    let mut total: i128 = 0;
    for (k, coefficient) in a.iter().enumerate() {
        let term = coefficient
            .checked_mul(p.checked_pow(k as u32)?)?
            .checked_mul(q.checked_pow((n - k) as u32)?)?;
        total = total.checked_add(term)?;
    }
    Some(total)
}

fn find_rational_root(a: &[i128]) -> Option<(i128, i128)> {
    let a0 = a[0];
    let an = a[a.len() - 1];
    if a0.abs() > MAX_DIVISOR_SEARCH || an.abs() > MAX_DIVISOR_SEARCH {
        return None;
    }
    let denominators = positive_divisors(an);
    for p in positive_divisors(a0) {
        for q in &denominators {
            if gcd(p, *q) != 1 {
                continue;
            }
            for candidate in [p, -p] {
                if scaled_value(a, candidate, *q) == Some(0) {
                    return Some((candidate, *q));
                }
            }
        }
    }
    None
}

/// divides `a` by `q*x - p`, returns the quotient when the division is exact
fn divide_linear(a: &[i128], p: i128, q: i128) -> Option<Vec<i128>> {
    let n = a.len() - 1;
    let mut b = vec![0i128; n];
    let mut upper = 0i128;
    for k in (1..=n).rev() {
        let numerator = a[k].checked_add(p.checked_mul(upper)?)?;
        if numerator % q != 0 {
            return None;
        }
        b[k - 1] = numerator / q;
        upper = b[k - 1];
    }
    if p.checked_mul(b[0])?.checked_neg()? != a[0] {
        return None;
    }
    Some(b)
}

/// Factors the polynomial with ascending `coefficients` in `symbol` into irreducible factors
/// over the rationals.
///
/// Returns `None` for constants and for coefficients that are not rational with a small
/// denominator.
pub fn factor_univariate(coefficients: &[f64], symbol: &Symbol) -> Option<Factorization> {
    let mut trimmed = coefficients.to_vec();
    while trimmed.last().is_some_and(|c| c.abs() < 1e-12) {
        trimmed.pop();
    }
    if trimmed.len() < 2 {
        return None;
    }
    let (scale, mut a) = integer_scale(&trimmed)?;
    while a.last() == Some(&0) {
        a.pop();
    }
    if a.len() < 2 {
        return None;
    }
    let mut content = a.iter().fold(0i128, |acc, c| gcd(acc, *c));
    if a[a.len() - 1] < 0 {
        content = -content;
    }
    for c in a.iter_mut() {
        *c /= content;
    }

    // (q, p, multiplicity) for each linear factor q*x - p
    let mut linear: Vec<(i128, i128, u32)> = Vec::new();
    let mut push_linear = |q: i128, p: i128| {
        if let Some(entry) = linear.iter_mut().find(|(fq, fp, _)| *fq == q && *fp == p) {
            entry.2 += 1;
        } else {
            linear.push((q, p, 1));
        }
    };
    while a.len() > 1 && a[0] == 0 {
        a.remove(0);
        push_linear(1, 0);
    }
    while a.len() > 1 {
        let Some((p, q)) = find_rational_root(&a) else {
            break;
        };
        let Some(quotient) = divide_linear(&a, p, q) else {
            break;
        };
        push_linear(q, p);
        a = quotient;
    }

    let mut factors: Vec<Factor> = linear
        .into_iter()
        .map(|(q, p, multiplicity)| Factor {
            coefficients: vec![-(p as f64), q as f64],
            multiplicity,
        })
        .collect();
    let mut leftover = a[0] as f64;
    if a.len() > 1 {
        factors.push(Factor {
            coefficients: a.iter().map(|c| *c as f64).collect(),
            multiplicity: 1,
        });
        leftover = 1.0;
    }
    Some(Factorization {
        symbol: symbol.clone(),
        content: content as f64 / scale as f64 * leftover,
        factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Symbol {
        Symbol::new("x")
    }

    #[test]
    fn test_two_distinct_roots() {
        // x^2 - 5x + 6
        let f = factor_univariate(&[6.0, -5.0, 1.0], &x()).unwrap();
        assert!(f.is_nontrivial());
        let roots: Vec<f64> = f.factors.iter().filter_map(Factor::root).collect();
        assert_eq!(roots, vec![2.0, 3.0]);
        assert_eq!(f.to_string(), "(x - 2)*(x - 3)");
    }

    #[test]
    fn test_difference_of_squares() {
        let f = factor_univariate(&[-4.0, 0.0, 1.0], &x()).unwrap();
        assert!(f.is_nontrivial());
        assert_eq!(f.to_string(), "(x - 2)*(x + 2)");
    }

    #[test]
    fn test_perfect_square_is_single_factor() {
        let f = factor_univariate(&[4.0, -4.0, 1.0], &x()).unwrap();
        assert!(!f.is_nontrivial());
        assert_eq!(f.factors.len(), 1);
        assert_eq!(f.factors[0].multiplicity, 2);
        assert_eq!(f.to_string(), "(x - 2)^2");
    }

    #[test]
    fn test_content_and_rational_root() {
        // 4x^2 - 1 = 4 (x - 1/2)(x + 1/2) = (2x - 1)(2x + 1)
        let f = factor_univariate(&[-1.0, 0.0, 4.0], &x()).unwrap();
        assert!(f.is_nontrivial());
        let mut roots: Vec<f64> = f.factors.iter().filter_map(Factor::root).collect();
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(roots[0], -0.5);
        assert_relative_eq!(roots[1], 0.5);
        assert_relative_eq!(f.content, 1.0);

        // 2x^2 - 8 = 2 (x - 2)(x + 2)
        let f = factor_univariate(&[-8.0, 0.0, 2.0], &x()).unwrap();
        assert_relative_eq!(f.content, 2.0);
        assert_eq!(f.to_string(), "2*(x - 2)*(x + 2)");
    }

    #[test]
    fn test_negative_leading_coefficient() {
        // -x^2 + 5x - 6 = -(x - 2)(x - 3)
        let f = factor_univariate(&[-6.0, 5.0, -1.0], &x()).unwrap();
        assert_relative_eq!(f.content, -1.0);
        assert_eq!(f.to_string(), "-(x - 2)*(x - 3)");

        // -2x^2 + 8 = -2 (x - 2)(x + 2)
        let f = factor_univariate(&[8.0, 0.0, -2.0], &x()).unwrap();
        assert_eq!(f.to_string(), "-2*(x - 2)*(x + 2)");
    }

    #[test]
    fn test_zero_root() {
        // x^2 - 3x = x (x - 3)
        let f = factor_univariate(&[0.0, -3.0, 1.0], &x()).unwrap();
        assert!(f.is_nontrivial());
        assert_eq!(f.to_string(), "x*(x - 3)");
    }

    #[test]
    fn test_irreducible_quadratic() {
        // x^2 + 1 and x^2 - 2 have no rational roots
        for coefficients in [[1.0, 0.0, 1.0], [-2.0, 0.0, 1.0]] {
            let f = factor_univariate(&coefficients, &x()).unwrap();
            assert!(!f.is_nontrivial());
            assert_eq!(f.factors.len(), 1);
            assert_eq!(f.factors[0].degree(), 2);
        }
    }

    #[test]
    fn test_fractional_coefficients() {
        // 0.5x^2 - 2.5x + 3 = 0.5 (x - 2)(x - 3)
        let f = factor_univariate(&[3.0, -2.5, 0.5], &x()).unwrap();
        assert!(f.is_nontrivial());
        assert_relative_eq!(f.content, 0.5);
    }

    #[test]
    fn test_irrational_coefficients_are_not_factored() {
        assert!(factor_univariate(&[std::f64::consts::PI, 0.0, 1.0], &x()).is_none());
        assert!(factor_univariate(&[5.0], &x()).is_none());
    }
}
