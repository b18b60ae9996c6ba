use crate::symbolic::symbolic_engine::{Expr, Symbol};
use std::collections::HashMap;

/// Maps variable names to unique symbols, in order of first appearance.
///
/// Every expression parsed through one table refers to the same `Symbol` instance for the same
/// name, see `Symbol::same_instance`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    /// position of the variable to solve for, when one was named
    preferred: Option<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// the symbol for `name`, created on first use
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&i) = self.index.get(name) {
            return self.symbols[i].clone();
        }
        let symbol = Symbol::new(name);
        self.adopt(symbol.clone());
        symbol
    }

    fn adopt(&mut self, symbol: Symbol) {
        self.index
            .insert(symbol.name().to_string(), self.symbols.len());
        self.symbols.push(symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.symbols.iter().map(Symbol::name).collect()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Adds the symbols of `other` that are missing here, keeping their instances.
    pub fn merge(&mut self, other: &SymbolTable) {
        for symbol in &other.symbols {
            if !self.contains(symbol.name()) {
                self.adopt(symbol.clone());
            }
        }
    }

    /// `expr` with every symbol replaced by this table's instance of the same name
    pub fn intern_expr(&mut self, expr: &Expr) -> Expr {
        expr.map_symbols(&mut |symbol| self.intern(symbol.name()))
    }

    /// Marks `name` as the variable to solve for. Ignored when the name is unknown.
    pub fn prefer(&mut self, name: &str) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.preferred = Some(i);
                true
            }
            None => false,
        }
    }

    /// the preferred variable, otherwise the first one that appeared
    pub fn solving_variable(&self) -> Option<Symbol> {
        self.preferred
            .or(if self.symbols.is_empty() { None } else { Some(0) })
            .map(|i| self.symbols[i].clone())
    }
}
