use aoc2023::io::ParsedLines;
use cas::{solve, Expr, Poly, Solution, SolveError, Symbol};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Rock start coordinates by axis, then rock velocity components by axis,
/// the six names the algebra is written with below.
const ROCK_START: [Symbol; 3] = ['a', 'b', 'c'];
const ROCK_VELOCITY: [Symbol; 3] = ['d', 'e', 'f'];

/// Differencing consecutive rays cancels the products of unknowns, so five
/// rays become the four linear equations a plane's four unknowns need.
const RAYS_USED: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    let stdin = std::io::stdin();
    let rays = ParsedLines::<_, Ray>::new(stdin.lock()).collect::<Result<Vec<_>, _>>()?;

    println!("{}", rock_coordinate_sum(&rays)?);

    Ok(())
}

/// Sum of the thrown rock's start coordinates, the whole puzzle in one call.
///
/// Solves the xy-plane system for `(a, b, d, e)` and the xz-plane system for
/// `(a, c, d, f)`, then adds up `a + b + c`.
fn rock_coordinate_sum(rays: &[Ray]) -> Result<Poly, RockError> {
    let rays = rays
        .get(..RAYS_USED)
        .ok_or(RockError::TooFewRays(rays.len()))?;

    let [a, b, c] = ROCK_START;
    let [d, e, f] = ROCK_VELOCITY;

    let xy = solve_plane(rays, [0, 1], [a, b, d, e])?;
    let xz = solve_plane(rays, [0, 2], [a, c, d, f])?;

    let x = xy.get(a).ok_or(RockError::Unsolved(a))?;
    let y = xy.get(b).ok_or(RockError::Unsolved(b))?;
    let z = xz.get(c).ok_or(RockError::Unsolved(c))?;

    Ok(x + y + z)
}

fn solve_plane(
    rays: &[Ray],
    axes: [usize; 2],
    unknowns: [Symbol; 4],
) -> Result<Solution, RockError> {
    let equations = plane_equations(rays, axes);
    let solutions = solve(&equations, &unknowns)?;
    solutions.into_iter().next().ok_or(RockError::NoSolution)
}

fn plane_equations(rays: &[Ray], axes: [usize; 2]) -> Vec<Poly> {
    rays.iter()
        .tuple_windows()
        .map(|(first, second)| (collinearity(first, axes) - collinearity(second, axes)).expand())
        .collect()
}

/// 2D cross product of the ray's start and velocity relative to the rock,
/// restricted to one coordinate plane: zero exactly when the rock's line
/// crosses the ray's line there. The collision time never appears, and
/// differencing two of these drops the shared `a*e`-style products.
fn collinearity(ray: &Ray, axes: [usize; 2]) -> Expr {
    let [i, j] = axes;
    (Expr::int(ray.start[i]) - Expr::var(ROCK_START[i]))
        * (Expr::int(ray.velocity[j]) - Expr::var(ROCK_VELOCITY[j]))
        - (Expr::int(ray.start[j]) - Expr::var(ROCK_START[j]))
            * (Expr::int(ray.velocity[i]) - Expr::var(ROCK_VELOCITY[i]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ray {
    start: [i64; 3],
    velocity: [i64; 3],
}

lazy_static! {
    static ref RAY_LINE: Regex = Regex::new(
        r"^(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*@\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)$"
    )
    .unwrap();
}

impl FromStr for Ray {
    type Err = RayParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = RAY_LINE.captures(s.trim()).ok_or(RayParsingError::Form)?;

        let mut numbers = [0i64; 6];
        for (slot, group) in numbers.iter_mut().zip(1..=6) {
            *slot = captures[group].parse()?;
        }

        Ok(Ray {
            start: [numbers[0], numbers[1], numbers[2]],
            velocity: [numbers[3], numbers[4], numbers[5]],
        })
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{}, {}, {} @ {}, {}, {}",
            self.start[0],
            self.start[1],
            self.start[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
        )
    }
}

#[derive(Debug, PartialEq)]
enum RayParsingError {
    Form,
    InvalidNum(std::num::ParseIntError),
}

impl From<std::num::ParseIntError> for RayParsingError {
    fn from(e: std::num::ParseIntError) -> Self {
        RayParsingError::InvalidNum(e)
    }
}

impl fmt::Display for RayParsingError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RayParsingError::Form => write!(fmt, "expected \"px, py, pz @ vx, vy, vz\""),
            RayParsingError::InvalidNum(e) => write!(fmt, "bad coordinate: {}", e),
        }
    }
}

impl std::error::Error for RayParsingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RayParsingError::Form => None,
            RayParsingError::InvalidNum(e) => Some(e),
        }
    }
}

#[derive(Debug)]
enum RockError {
    TooFewRays(usize),
    NoSolution,
    Unsolved(Symbol),
    Solver(SolveError),
}

impl From<SolveError> for RockError {
    fn from(e: SolveError) -> Self {
        RockError::Solver(e)
    }
}

impl fmt::Display for RockError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RockError::TooFewRays(count) => write!(
                fmt,
                "need {} rays to pin the rock down, got {}",
                RAYS_USED, count
            ),
            RockError::NoSolution => write!(fmt, "no rock trajectory satisfies these rays"),
            RockError::Unsolved(symbol) => write!(fmt, "the rays leave {} unconstrained", symbol),
            RockError::Solver(e) => write!(fmt, "{}", e),
        }
    }
}

impl std::error::Error for RockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RockError::Solver(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
const EXAMPLE: &str = "19, 13, 30 @ -2,  1, -2
18, 19, 22 @ -1, -1, -2
20, 25, 34 @ -2, -2, -4
12, 31, 28 @ -1, -2, -1
20, 19, 15 @  1, -5, -3";

#[cfg(test)]
fn example_rays() -> Vec<Ray> {
    parse(EXAMPLE)
}

#[cfg(test)]
fn parse(input: &str) -> Vec<Ray> {
    ParsedLines::<_, Ray>::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn parses_the_example_shapes() {
    let rays = example_rays();
    assert_eq!(rays.len(), 5);
    assert_eq!(
        rays[0],
        Ray {
            start: [19, 13, 30],
            velocity: [-2, 1, -2]
        }
    );
    assert_eq!(
        rays[4],
        Ray {
            start: [20, 19, 15],
            velocity: [1, -5, -3]
        }
    );
}

#[test]
fn parses_dense_and_spaced_forms() {
    let dense = "24,13,10@-3,1,2".parse::<Ray>().unwrap();
    let spaced = "  24 , 13 , 10   @   -3 , 1 , 2  ".parse::<Ray>().unwrap();
    assert_eq!(dense, spaced);
    assert_eq!(
        dense,
        Ray {
            start: [24, 13, 10],
            velocity: [-3, 1, 2]
        }
    );
}

#[test]
fn rejects_malformed_lines() {
    assert_eq!("19, 13 @ -2, 1, -2".parse::<Ray>(), Err(RayParsingError::Form));
    assert_eq!(
        "19, 13, 30, 7 @ -2, 1, -2".parse::<Ray>(),
        Err(RayParsingError::Form)
    );
    assert_eq!(
        "19, 13, 30 | -2, 1, -2".parse::<Ray>(),
        Err(RayParsingError::Form)
    );
    assert!(matches!(
        "99999999999999999999, 0, 0 @ 1, 1, 1".parse::<Ray>(),
        Err(RayParsingError::InvalidNum(_))
    ));
}

#[test]
fn display_round_trips() {
    for ray in example_rays() {
        assert_eq!(ray.to_string().parse::<Ray>().unwrap(), ray);
    }
}

#[test]
fn pair_difference_is_antisymmetric() {
    let rays = example_rays();
    for &axes in &[[0, 1], [0, 2]] {
        let forward = (collinearity(&rays[0], axes) - collinearity(&rays[1], axes)).expand();
        let backward = (collinearity(&rays[1], axes) - collinearity(&rays[0], axes)).expand();
        assert_eq!(forward, -&backward);
    }
}

#[test]
fn pair_differences_are_linear() {
    // the a*e and b*d products are identical between rays, so they vanish
    let rays = example_rays();
    for &axes in &[[0, 1], [0, 2]] {
        for equation in plane_equations(&rays, axes) {
            assert!(equation.degree() <= 1, "{}", equation);
        }
    }
}

#[test]
fn example_rock_lands_on_24_13_10() {
    let rays = example_rays();

    let xy = solve_plane(&rays, [0, 1], ['a', 'b', 'd', 'e']).unwrap();
    let xz = solve_plane(&rays, [0, 2], ['a', 'c', 'd', 'f']).unwrap();

    assert_eq!(xy.get('a').unwrap().to_string(), "24");
    assert_eq!(xy.get('b').unwrap().to_string(), "13");
    assert_eq!(xy.get('e').unwrap().to_string(), "1");
    assert_eq!(xz.get('c').unwrap().to_string(), "10");
    assert_eq!(xz.get('f').unwrap().to_string(), "2");

    // both planes see the same shared unknowns
    assert_eq!(xy.get('a'), xz.get('a'));
    assert_eq!(xy.get('d'), xz.get('d'));
    assert_eq!(xy.get('d').unwrap().to_string(), "-3");
}

#[test]
fn example_sum_is_47() {
    assert_eq!(
        rock_coordinate_sum(&example_rays()).unwrap().to_string(),
        "47"
    );
}

#[test]
fn ray_order_does_not_matter() {
    let rays = example_rays();

    let mut reversed = rays.clone();
    reversed.reverse();
    assert_eq!(rock_coordinate_sum(&reversed).unwrap().to_string(), "47");

    let mut rotated = rays;
    rotated.rotate_left(1);
    assert_eq!(rock_coordinate_sum(&rotated).unwrap().to_string(), "47");
}

#[test]
fn rays_beyond_the_fifth_are_ignored() {
    let mut rays = example_rays();
    rays.push("0, 0, 0 @ 9, 9, 9".parse().unwrap());
    assert_eq!(rock_coordinate_sum(&rays).unwrap().to_string(), "47");
}

#[test]
fn too_few_rays_is_an_error() {
    let rays = parse("19, 13, 30 @ -2, 1, -2\n18, 19, 22 @ -1, -1, -2");
    assert!(matches!(
        rock_coordinate_sum(&rays),
        Err(RockError::TooFewRays(2))
    ));
}

#[test]
fn parallel_rays_leave_the_rock_unconstrained() {
    // five rays sharing one velocity admit any rock drifting along with
    // them; the plane systems pin d and e but neither start coordinate
    let rays = parse(
        "0, 0, 0 @ 1, 2, 3
1, 0, 0 @ 1, 2, 3
0, 1, 0 @ 1, 2, 3
0, 0, 1 @ 1, 2, 3
1, 1, 1 @ 1, 2, 3",
    );
    assert!(matches!(
        rock_coordinate_sum(&rays),
        Err(RockError::Unsolved('a'))
    ));
}

#[test]
fn contradictory_rays_are_a_loud_failure() {
    // the first pair demands a + e = 1, the next a + e = 3, and so on
    let rays = parse(
        "0, 0, 0 @ 0, 0, 0
1, 0, 0 @ 0, 1, 0
2, 0, 0 @ 0, 2, 0
3, 0, 0 @ 0, 3, 0
4, 0, 0 @ 0, 4, 0",
    );
    assert!(matches!(
        rock_coordinate_sum(&rays),
        Err(RockError::NoSolution)
    ));
}

#[test]
fn blank_lines_between_rays_are_tolerated() {
    let input = format!("{}\n\n", EXAMPLE.replace('\n', "\n\n"));
    let rays = parse(&input);
    assert_eq!(rock_coordinate_sum(&rays).unwrap().to_string(), "47");
}

#[test]
fn exactness_survives_puzzle_scale_coordinates() {
    // a rock at (4e14, 2.5e14, 1.5e14) built backwards from five collision
    // times; intermediate products reach ~1e29 and must not lose a digit
    let rays = parse(
        "399999999999950, 250000000000030, 150000000000020 @ 2, -1, 3
400000000000020, 249999999999940, 150000000000080 @ -4, 5, 1
399999999999730, 250000000000000, 150000000000210 @ 6, 2, -2
399999999999920, 250000000000320, 150000000000040 @ -1, -6, 4
399999999999700, 249999999999900, 150000000000500 @ 3, 4, -5",
    );
    assert_eq!(
        rock_coordinate_sum(&rays).unwrap().to_string(),
        "800000000000000"
    );
}
