//! # Symbolic Engine Module
//!
//! This module provides the symbolic expression tree used by every stage of the algebra
//! solver: equations assembled from text, the standard forms derived from them and the values
//! substituted back during verification are all `Expr` trees.
//!
//! ## Main Structures and Methods
//!
//! ### `Symbol`
//! A named algebraic symbol. Symbols are interned by a `SymbolTable` so that the same name
//! used in different clauses of one problem resolves to the same shared instance.
//!
//! ### `Expr` Enum
//! The core symbolic expression type supporting:
//! - **Variables**: `Var(Symbol)` - symbolic variables like "x", "y"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//!
//! ### Key Methods
//! - `var(name)` - create a variable expression
//! - `substitute(symbol, expr)` - replace a symbol by an expression
//! - `substitute_map(map)` - replace several symbols at once
//! - `free_symbols()` - the symbols an expression depends on
//! - `map_symbols(f)` - rebuild the tree with every symbol passed through `f`
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: Uses Box<Expr> for nested expressions
//! 2. **Operator Overloading**: Implements std::ops traits (Add, Sub, Mul, Div, Neg) for
//!    natural mathematical syntax: `x + y * z`
//! 3. **Precedence-aware printing**: `Display` only emits the brackets the precedence of the
//!    surrounding operator requires, so derivation steps read like handwritten algebra

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Named algebraic symbol.
///
/// Equality, ordering and hashing go by name, `same_instance` tells whether two symbols share
/// the interned allocation handed out by a `SymbolTable`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// true when both symbols point at the same interned name
    pub fn same_instance(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// Each variant represents a different type of mathematical construct, from simple variables
/// and constants to nested operations. The enum uses Box<Expr> for recursive structures,
/// allowing arbitrarily deep expression trees.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::var("x");
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable
    Var(Symbol),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
}

/// Formats a numeric value the way it should appear in a derivation step:
/// integers without a fractional part, other values rounded to 10 decimals with trailing
/// zeros removed, and never a negative zero.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{:.0}", rounded);
    }
    let fixed = format!("{:.10}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

impl Expr {
    /// binding strength used by `Display`; atoms bind tightest
    fn precedence(&self) -> u8 {
        match self {
            Expr::Var(_) => 5,
            Expr::Const(value) if *value < 0.0 => 3,
            Expr::Const(_) => 5,
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(lhs, _) if **lhs == Expr::Const(-1.0) => 3,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Pow(_, _) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Sums are spaced (`x + 2`), products and powers are compact (`2*x^2`), brackets appear only
/// where precedence needs them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(symbol) => write!(f, "{}", symbol),
            Expr::Const(value) => write!(f, "{}", format_number(*value)),
            Expr::Add(lhs, rhs) => {
                lhs.fmt_operand(f, 1)?;
                write!(f, " + ")?;
                rhs.fmt_operand(f, 1)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.fmt_operand(f, 1)?;
                write!(f, " - ")?;
                rhs.fmt_operand(f, 2)
            }
            Expr::Mul(lhs, rhs) if **lhs == Expr::Const(-1.0) => {
                write!(f, "-")?;
                rhs.fmt_operand(f, 4)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.fmt_operand(f, 2)?;
                write!(f, "*")?;
                rhs.fmt_operand(f, 4)
            }
            Expr::Div(lhs, rhs) => {
                lhs.fmt_operand(f, 2)?;
                write!(f, "/")?;
                rhs.fmt_operand(f, 5)
            }
            Expr::Pow(base, exp) => {
                base.fmt_operand(f, 5)?;
                write!(f, "^")?;
                exp.fmt_operand(f, 5)
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates a variable expression from a name.
    pub fn var(name: &str) -> Expr {
        Expr::Var(Symbol::new(name))
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => val == &0.0,
            _ => false,
        }
    }

    /// Rebuilds the tree with every symbol replaced by `f(symbol)`.
    ///
    /// The symbol table uses it to swap freshly parsed symbols for their interned instances.
    pub fn map_symbols<F>(&self, f: &mut F) -> Expr
    where
        F: FnMut(&Symbol) -> Symbol,
    {
        match self {
            Expr::Var(symbol) => Expr::Var(f(symbol)),
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(lhs.map_symbols(f).boxed(), rhs.map_symbols(f).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(lhs.map_symbols(f).boxed(), rhs.map_symbols(f).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Mul(lhs.map_symbols(f).boxed(), rhs.map_symbols(f).boxed()),
            Expr::Div(lhs, rhs) => Expr::Div(lhs.map_symbols(f).boxed(), rhs.map_symbols(f).boxed()),
            Expr::Pow(base, exp) => Expr::Pow(base.map_symbols(f).boxed(), exp.map_symbols(f).boxed()),
        }
    }

    /// substitute a variable with an expression
    pub fn substitute(&self, var: &Symbol, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.substitute(var, expr)),
                Box::new(rhs.substitute(var, expr)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.substitute(var, expr)),
                Box::new(rhs.substitute(var, expr)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.substitute(var, expr)),
                Box::new(rhs.substitute(var, expr)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.substitute(var, expr)),
                Box::new(rhs.substitute(var, expr)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.substitute(var, expr)),
                Box::new(exp.substitute(var, expr)),
            ),
        }
    }

    /// Substitutes several symbols at once. Symbols missing from the map are left untouched.
    pub fn substitute_map(&self, var_map: &BTreeMap<Symbol, Expr>) -> Expr {
        match self {
            Expr::Var(name) => var_map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.substitute_map(var_map)),
                Box::new(rhs.substitute_map(var_map)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.substitute_map(var_map)),
                Box::new(rhs.substitute_map(var_map)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.substitute_map(var_map)),
                Box::new(rhs.substitute_map(var_map)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.substitute_map(var_map)),
                Box::new(rhs.substitute_map(var_map)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.substitute_map(var_map)),
                Box::new(exp.substitute_map(var_map)),
            ),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name.name() == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Pow(base, exp) => {
                base.contains_variable(var_name) || exp.contains_variable(var_name)
            }
        }
    }

    /// all symbols the expression depends on
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Var(symbol) => {
                symbols.insert(symbol.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_symbols(symbols);
                rhs.collect_symbols(symbols);
            }
        }
    }

    /// true when no constant anywhere in the tree is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match self {
            Expr::Var(_) => true,
            Expr::Const(value) => value.is_finite(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.is_finite() && rhs.is_finite(),
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, z) -> creates variables x, y, z
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        ($($crate::symbolic::symbolic_engine::Expr::var(stringify!($var))),+)
    };
}
