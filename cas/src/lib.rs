mod expr;
mod poly;
mod solve;

pub use expr::Expr;
pub use poly::{Monomial, Poly};
pub use solve::{solve, Solution, SolveError};

pub use num_bigint::BigInt;
pub use num_rational::BigRational;

/// Name of one scalar unknown. Single letters have been enough for every
/// system so far, like the `a..f` of day24.
pub type Symbol = char;
