use indexmap::IndexMap;
use num_rational::BigRational;
use num_traits::Zero;
use std::fmt;

use crate::poly::{Monomial, Poly};
use crate::Symbol;

/// One assignment of the requested unknowns, in request order.
///
/// Pivot unknowns map to constants, or to polynomials in the free unknowns
/// when the equations do not pin everything down. Unknowns left completely
/// free are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: IndexMap<Symbol, Poly>,
}

impl Solution {
    pub fn get(&self, symbol: Symbol) -> Option<&Poly> {
        self.values.get(&symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// An equation contains a term of degree two or higher in the unknowns.
    Nonlinear { equation: usize, term: Monomial },
}

impl fmt::Display for SolveError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Nonlinear { equation, term } => write!(
                fmt,
                "equation {} is not linear in the unknowns: {}",
                equation, term
            ),
        }
    }
}

impl std::error::Error for SolveError {}

#[derive(Clone)]
struct Row {
    coefficients: Vec<BigRational>,
    rhs: Poly,
}

/// Solves `equations`, each read as `= 0`, for `unknowns` by exact
/// Gauss-Jordan elimination.
///
/// Symbols outside `unknowns` are treated as opaque parameters and ride into
/// the right-hand sides, so the values in a [`Solution`] may themselves be
/// polynomials. Contradictory equations yield `Ok` with no solutions;
/// equations that are not affine in the unknowns are refused.
pub fn solve(equations: &[Poly], unknowns: &[Symbol]) -> Result<Vec<Solution>, SolveError> {
    let mut columns = IndexMap::new();
    for (index, &unknown) in unknowns.iter().enumerate() {
        let previous = columns.insert(unknown, index);
        assert!(previous.is_none(), "duplicate unknown {}", unknown);
    }

    let mut rows = Vec::with_capacity(equations.len());
    for (index, equation) in equations.iter().enumerate() {
        let mut coefficients = vec![BigRational::zero(); unknowns.len()];
        let mut rhs = Poly::zero();
        for (monomial, coefficient) in equation.terms() {
            match monomial.single_variable() {
                Some(symbol) if columns.contains_key(&symbol) => {
                    coefficients[columns[&symbol]] += coefficient.clone();
                }
                _ => {
                    if monomial.variables().any(|v| columns.contains_key(&v)) {
                        return Err(SolveError::Nonlinear {
                            equation: index,
                            term: monomial.clone(),
                        });
                    }
                    // constants and foreign parameters move to the other side
                    rhs.add_term(monomial.clone(), -coefficient.clone());
                }
            }
        }
        rows.push(Row { coefficients, rhs });
    }

    // full elimination, not just the forward half: each pivot row ends up
    // directly readable as "pivot = rhs - free terms"
    let mut pivot_rows: Vec<Option<usize>> = vec![None; unknowns.len()];
    let mut next = 0;
    for column in 0..unknowns.len() {
        let pivot = (next..rows.len()).find(|&r| !rows[r].coefficients[column].is_zero());
        let pivot = match pivot {
            Some(pivot) => pivot,
            None => continue,
        };
        rows.swap(next, pivot);

        let inverse = rows[next].coefficients[column].recip();
        for coefficient in rows[next].coefficients.iter_mut() {
            *coefficient = &*coefficient * &inverse;
        }
        rows[next].rhs = rows[next].rhs.scale(&inverse);

        let pivot_row = rows[next].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            if r == next {
                continue;
            }
            let factor = row.coefficients[column].clone();
            if factor.is_zero() {
                continue;
            }
            for (coefficient, pivot_coefficient) in
                row.coefficients.iter_mut().zip(pivot_row.coefficients.iter())
            {
                *coefficient = &*coefficient - &(&factor * pivot_coefficient);
            }
            row.rhs = &row.rhs - &pivot_row.rhs.scale(&factor);
        }

        pivot_rows[column] = Some(next);
        next += 1;
    }

    // every leftover row has all-zero coefficients; a surviving right-hand
    // side means the equations contradict each other
    for row in rows.iter().skip(next) {
        if !row.rhs.is_zero() {
            return Ok(Vec::new());
        }
    }

    let mut values = IndexMap::new();
    for (column, &unknown) in unknowns.iter().enumerate() {
        let row = match pivot_rows[column] {
            Some(row) => row,
            None => continue,
        };
        let mut value = rows[row].rhs.clone();
        for (other, &symbol) in unknowns.iter().enumerate() {
            if other == column {
                continue;
            }
            let coefficient = &rows[row].coefficients[other];
            if coefficient.is_zero() {
                continue;
            }
            value = &value - &Poly::var(symbol).scale(coefficient);
        }
        values.insert(unknown, value);
    }

    Ok(vec![Solution { values }])
}

#[cfg(test)]
mod tests {
    use super::{solve, SolveError};
    use crate::{Expr, Poly};

    #[test]
    fn unique_solution() {
        let equations = vec![
            (Expr::var('x') + Expr::var('y') - Expr::int(3)).expand(),
            (Expr::var('x') - Expr::var('y') - Expr::int(1)).expand(),
        ];
        let solutions = solve(&equations, &['x', 'y']).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get('x'), Some(&Poly::int(2)));
        assert_eq!(solutions[0].get('y'), Some(&Poly::int(1)));
    }

    #[test]
    fn rational_solution() {
        let equations = vec![(Expr::int(2) * Expr::var('x') - Expr::int(1)).expand()];
        let solutions = solve(&equations, &['x']).unwrap();
        assert_eq!(solutions[0].get('x').unwrap().to_string(), "1/2");
    }

    #[test]
    fn solution_keeps_the_requested_unknown_order() {
        let equations = vec![
            (Expr::var('x') + Expr::var('y') - Expr::int(3)).expand(),
            (Expr::var('x') - Expr::var('y') - Expr::int(1)).expand(),
        ];
        let solutions = solve(&equations, &['y', 'x']).unwrap();
        assert_eq!(solutions[0].symbols().collect::<Vec<_>>(), vec!['y', 'x']);
        assert_eq!(solutions[0].get('y'), Some(&Poly::int(1)));
        assert_eq!(solutions[0].get('x'), Some(&Poly::int(2)));
    }

    #[test]
    fn underdetermined_system_keeps_free_unknowns_out() {
        let equations = vec![(Expr::var('x') + Expr::var('y') - Expr::int(3)).expand()];
        let solutions = solve(&equations, &['x', 'y']).unwrap();
        let solution = &solutions[0];
        assert_eq!(solution.get('x').unwrap().to_string(), "-y + 3");
        assert_eq!(solution.get('y'), None);
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn inconsistent_system_has_no_solutions() {
        let equations = vec![
            (Expr::var('x') + Expr::var('y') - Expr::int(1)).expand(),
            (Expr::var('x') + Expr::var('y') - Expr::int(2)).expand(),
        ];
        assert_eq!(solve(&equations, &['x', 'y']).unwrap(), vec![]);
    }

    #[test]
    fn redundant_equations_collapse() {
        // second equation is the first times two
        let equations = vec![
            (Expr::var('x') - Expr::int(1)).expand(),
            (Expr::int(2) * Expr::var('x') - Expr::int(2)).expand(),
            (Expr::var('x') + Expr::var('y') - Expr::int(3)).expand(),
        ];
        let solutions = solve(&equations, &['x', 'y']).unwrap();
        assert_eq!(solutions[0].get('x'), Some(&Poly::int(1)));
        assert_eq!(solutions[0].get('y'), Some(&Poly::int(2)));
    }

    #[test]
    fn foreign_symbols_ride_into_the_result() {
        let equations = vec![(Expr::var('x') + Expr::var('t') - Expr::int(1)).expand()];
        let solutions = solve(&equations, &['x']).unwrap();
        assert_eq!(solutions[0].get('x').unwrap().to_string(), "-t + 1");
    }

    #[test]
    fn negating_every_equation_changes_nothing() {
        let equations = vec![
            (Expr::var('x') + Expr::var('y') - Expr::int(3)).expand(),
            (Expr::var('x') - Expr::var('y') - Expr::int(1)).expand(),
        ];
        let negated = equations.iter().map(|e| -e).collect::<Vec<_>>();
        assert_eq!(
            solve(&equations, &['x', 'y']).unwrap(),
            solve(&negated, &['x', 'y']).unwrap()
        );
    }

    #[test]
    fn nonlinear_terms_are_rejected() {
        let equations = vec![(Expr::var('x') * Expr::var('y') - Expr::int(1)).expand()];
        let err = solve(&equations, &['x', 'y']).unwrap_err();
        assert!(matches!(err, SolveError::Nonlinear { equation: 0, .. }));

        let equations = vec![(Expr::var('x') * Expr::var('x') - Expr::int(4)).expand()];
        assert!(solve(&equations, &['x']).is_err());
    }

    #[test]
    fn foreign_times_unknown_is_still_nonlinear() {
        let equations = vec![(Expr::var('t') * Expr::var('x') - Expr::int(1)).expand()];
        assert!(solve(&equations, &['x']).is_err());
    }

    #[test]
    fn no_equations_leave_everything_free() {
        let solutions = solve(&[], &['x']).unwrap();
        assert!(solutions[0].is_empty());
    }
}
