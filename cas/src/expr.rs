use crate::poly::Poly;
use crate::Symbol;
use std::ops;

/// Unevaluated expression over named unknowns and integer literals.
///
/// Building one never simplifies anything; `expand` flattens the whole tree
/// into a canonical [`Poly`] once the shape is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(Symbol),
    Int(i64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(symbol: Symbol) -> Expr {
        Expr::Var(symbol)
    }

    pub fn int(value: i64) -> Expr {
        Expr::Int(value)
    }

    /// Multiplies everything out and collects like terms.
    pub fn expand(&self) -> Poly {
        match self {
            Expr::Var(symbol) => Poly::var(*symbol),
            Expr::Int(value) => Poly::int(*value),
            Expr::Add(lhs, rhs) => &lhs.expand() + &rhs.expand(),
            Expr::Sub(lhs, rhs) => &lhs.expand() - &rhs.expand(),
            Expr::Mul(lhs, rhs) => &lhs.expand() * &rhs.expand(),
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}
