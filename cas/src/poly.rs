use itertools::{EitherOrBoth, Itertools};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::ops;

use crate::Symbol;

/// Product of variables raised to positive powers, `1` when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monomial {
    // zero exponents are never stored
    exponents: BTreeMap<Symbol, u32>,
}

impl Monomial {
    pub fn one() -> Monomial {
        Monomial {
            exponents: BTreeMap::new(),
        }
    }

    pub fn var(symbol: Symbol) -> Monomial {
        let mut exponents = BTreeMap::new();
        exponents.insert(symbol, 1);
        Monomial { exponents }
    }

    pub fn is_one(&self) -> bool {
        self.exponents.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.exponents.values().sum()
    }

    pub fn exponent(&self, symbol: Symbol) -> u32 {
        self.exponents.get(&symbol).copied().unwrap_or(0)
    }

    pub fn variables(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.exponents.keys().copied()
    }

    /// `Some(s)` only for the plain first power of a single variable.
    pub fn single_variable(&self) -> Option<Symbol> {
        match self.exponents.iter().next() {
            Some((&symbol, &1)) if self.exponents.len() == 1 => Some(symbol),
            _ => None,
        }
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut exponents = self.exponents.clone();
        for (&symbol, &exponent) in &other.exponents {
            *exponents.entry(symbol).or_insert(0) += exponent;
        }
        Monomial { exponents }
    }

    fn without(&self, symbol: Symbol) -> Monomial {
        let mut exponents = self.exponents.clone();
        exponents.remove(&symbol);
        Monomial { exponents }
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Monomial) -> Ordering {
        // graded order so a polynomial's term map runs from constants up to
        // its leading term; equal degrees compare lexicographically over the
        // union of symbols in ascending order, a missing symbol counting as
        // a zero exponent
        self.degree().cmp(&other.degree()).then_with(|| {
            self.exponents
                .iter()
                .merge_join_by(other.exponents.iter(), |(left, _), (right, _)| {
                    left.cmp(right)
                })
                .map(|pair| match pair {
                    EitherOrBoth::Both((_, left), (_, right)) => left.cmp(right),
                    EitherOrBoth::Left(_) => Ordering::Greater,
                    EitherOrBoth::Right(_) => Ordering::Less,
                })
                .find(|&ordering| ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Monomial) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(fmt, "1");
        }
        for (i, (symbol, exponent)) in self.exponents.iter().enumerate() {
            if i > 0 {
                write!(fmt, "*")?;
            }
            if *exponent == 1 {
                write!(fmt, "{}", symbol)?;
            } else {
                write!(fmt, "{}^{}", symbol, exponent)?;
            }
        }
        Ok(())
    }
}

/// Multivariate polynomial with exact rational coefficients.
///
/// Always kept in expanded canonical form: terms ordered by [`Monomial`],
/// never a zero coefficient among them. Equal polynomials therefore compare
/// equal structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    pub fn zero() -> Poly {
        Poly {
            terms: BTreeMap::new(),
        }
    }

    pub fn constant(value: BigRational) -> Poly {
        let mut p = Poly::zero();
        p.add_term(Monomial::one(), value);
        p
    }

    pub fn int(value: i64) -> Poly {
        Poly::constant(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn var(symbol: Symbol) -> Poly {
        let mut p = Poly::zero();
        p.add_term(Monomial::var(symbol), BigRational::one());
        p
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn degree(&self) -> u32 {
        // terms are in graded order, the last one leads
        self.terms
            .keys()
            .next_back()
            .map(Monomial::degree)
            .unwrap_or(0)
    }

    /// The value of a constant polynomial, `None` if any variable survives.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub(crate) fn add_term(&mut self, monomial: Monomial, coefficient: BigRational) {
        if coefficient.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(coefficient);
            }
            btree_map::Entry::Occupied(mut occupied) => {
                *occupied.get_mut() += coefficient;
                if occupied.get().is_zero() {
                    occupied.remove();
                }
            }
        }
    }

    pub(crate) fn scale(&self, factor: &BigRational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coefficient)| (monomial.clone(), coefficient * factor))
                .collect(),
        }
    }

    /// Replaces `symbol` with `value`, expanding powers as needed.
    pub fn substitute(&self, symbol: Symbol, value: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (monomial, coefficient) in &self.terms {
            let exponent = monomial.exponent(symbol);
            if exponent == 0 {
                out.add_term(monomial.clone(), coefficient.clone());
                continue;
            }
            let mut rest = Poly::zero();
            rest.add_term(monomial.without(symbol), coefficient.clone());
            out = &out + &(&rest * &value.pow(exponent));
        }
        out
    }

    fn pow(&self, exponent: u32) -> Poly {
        let mut out = Poly::constant(BigRational::one());
        for _ in 0..exponent {
            out = &out * self;
        }
        out
    }
}

impl ops::Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (monomial, coefficient) in &rhs.terms {
            out.add_term(monomial.clone(), coefficient.clone());
        }
        out
    }
}

impl ops::Add<&Poly> for Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        &self + rhs
    }
}

impl ops::Add for Poly {
    type Output = Poly;

    fn add(self, rhs: Poly) -> Poly {
        &self + &rhs
    }
}

impl ops::Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (monomial, coefficient) in &rhs.terms {
            out.add_term(monomial.clone(), -coefficient.clone());
        }
        out
    }
}

impl ops::Sub<&Poly> for Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        &self - rhs
    }
}

impl ops::Sub for Poly {
    type Output = Poly;

    fn sub(self, rhs: Poly) -> Poly {
        &self - &rhs
    }
}

impl ops::Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (left_monomial, left_coefficient) in &self.terms {
            for (right_monomial, right_coefficient) in &rhs.terms {
                out.add_term(
                    left_monomial.mul(right_monomial),
                    left_coefficient * right_coefficient,
                );
            }
        }
        out
    }
}

impl ops::Mul for Poly {
    type Output = Poly;

    fn mul(self, rhs: Poly) -> Poly {
        &self * &rhs
    }
}

impl ops::Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coefficient)| (monomial.clone(), -coefficient.clone()))
                .collect(),
        }
    }
}

impl ops::Neg for Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        -&self
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(fmt, "0");
        }
        // render from the leading term down
        for (i, (monomial, coefficient)) in self.terms.iter().rev().enumerate() {
            let negative = coefficient.is_negative();
            if i == 0 {
                if negative {
                    write!(fmt, "-")?;
                }
            } else if negative {
                write!(fmt, " - ")?;
            } else {
                write!(fmt, " + ")?;
            }

            let numer = coefficient.numer().abs();
            let denom = coefficient.denom();

            if monomial.is_one() {
                write!(fmt, "{}", numer)?;
            } else if numer.is_one() {
                write!(fmt, "{}", monomial)?;
            } else {
                write!(fmt, "{}*{}", numer, monomial)?;
            }

            if !denom.is_one() {
                write!(fmt, "/{}", denom)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Monomial, Poly};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn rational(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn display_forms() {
        assert_eq!(Poly::zero().to_string(), "0");
        assert_eq!(Poly::int(-3).to_string(), "-3");
        assert_eq!((&Poly::int(3) - &Poly::var('y')).to_string(), "-y + 3");

        let halves = &Poly::var('e').scale(&rational(3, 2)) + &Poly::constant(rational(-1, 2));
        assert_eq!(halves.to_string(), "3*e/2 - 1/2");
    }

    #[test]
    fn graded_term_order() {
        let x = Poly::var('x');
        let y = Poly::var('y');
        let p = &(&(&x * &x) * &y) + &(&(&x * &y) - &Poly::int(7));
        assert_eq!(p.to_string(), "x^2*y + x*y - 7");
    }

    #[test]
    fn square_of_a_sum() {
        let sum = &Poly::var('x') + &Poly::var('y');
        assert_eq!((&sum * &sum).to_string(), "x^2 + 2*x*y + y^2");
    }

    #[test]
    fn cancellation_drops_terms() {
        let x = Poly::var('x');
        let difference = &(&x + &Poly::int(1)) - &(&x + &Poly::int(1));
        assert!(difference.is_zero());
        assert_eq!(difference, Poly::zero());
    }

    #[test]
    fn constants() {
        assert_eq!(
            Poly::zero().as_constant(),
            Some(BigRational::from_integer(BigInt::from(0)))
        );
        assert_eq!(
            Poly::int(5).as_constant(),
            Some(BigRational::from_integer(BigInt::from(5)))
        );
        assert_eq!(Poly::var('x').as_constant(), None);
    }

    #[test]
    fn degrees() {
        assert_eq!(Poly::zero().degree(), 0);
        assert_eq!(Poly::int(9).degree(), 0);
        let xy = &Poly::var('x') * &Poly::var('y');
        assert_eq!((&xy + &Poly::int(1)).degree(), 2);
    }

    #[test]
    fn substitute_a_constant() {
        let p = &(&Poly::var('x') * &Poly::var('x')) + &Poly::var('y');
        assert_eq!(p.substitute('x', &Poly::int(3)).to_string(), "y + 9");
    }

    #[test]
    fn substitute_a_polynomial() {
        let p = &Poly::var('x') * &Poly::var('x');
        let expanded = p.substitute('x', &(&Poly::var('y') + &Poly::int(1)));
        assert_eq!(expanded.to_string(), "y^2 + 2*y + 1");
    }

    #[test]
    fn monomial_order_is_graded() {
        assert!(Monomial::one() < Monomial::var('x'));
        assert!(Monomial::var('x') < Monomial::var('x').mul(&Monomial::var('y')));
        assert!(Monomial::var('z') < Monomial::var('x').mul(&Monomial::var('y')));
    }

    #[test]
    fn equal_degree_ties_break_on_the_earliest_symbol() {
        let xx = Monomial::var('x').mul(&Monomial::var('x'));
        let xy = Monomial::var('x').mul(&Monomial::var('y'));
        let yy = Monomial::var('y').mul(&Monomial::var('y'));
        assert!(yy < xy);
        assert!(xy < xx);
        assert!(Monomial::var('y') < Monomial::var('x'));

        let p = &(&Poly::var('x') + &Poly::var('y')) * &(&Poly::var('x') + &Poly::var('z'));
        assert_eq!(p.to_string(), "x^2 + x*y + x*z + y*z");
    }
}
