use cas::{solve, BigInt, BigRational, Expr, Poly};

fn term(coefficient: i64, symbol: char) -> Expr {
    Expr::int(coefficient) * Expr::var(symbol)
}

#[test]
fn integer_systems_solve_to_exact_rationals() {
    let equations = vec![
        (term(1, 'x') + term(1, 'y') + term(1, 'z') + term(1, 'w') - Expr::int(10)).expand(),
        (term(2, 'x') + term(3, 'y') - term(1, 'z') + term(4, 'w') - Expr::int(20)).expand(),
        (term(-1, 'x') + term(1, 'y') + term(5, 'z') - term(2, 'w') - Expr::int(3)).expand(),
        (term(3, 'x') - term(1, 'y') + term(2, 'z') + term(1, 'w') - Expr::int(14)).expand(),
    ];

    let solutions = solve(&equations, &['x', 'y', 'z', 'w']).unwrap();
    let solution = &solutions[0];

    assert_eq!(solution.get('x').unwrap().to_string(), "55/7");
    assert_eq!(solution.get('y').unwrap().to_string(), "40/7");
    assert_eq!(solution.get('z').unwrap().to_string(), "-2/7");
    assert_eq!(solution.get('w').unwrap().to_string(), "-23/7");
}

#[test]
fn coefficients_beyond_machine_integers_stay_exact() {
    let sum: BigInt = "340282366920938463463374607431768211456".parse().unwrap();
    let difference: BigInt = "18446744073709551616".parse().unwrap();

    let equations = vec![
        &(&Poly::var('x') + &Poly::var('y'))
            - &Poly::constant(BigRational::from_integer(sum.clone())),
        &(&Poly::var('x') - &Poly::var('y'))
            - &Poly::constant(BigRational::from_integer(difference.clone())),
    ];

    let solutions = solve(&equations, &['x', 'y']).unwrap();
    let solution = &solutions[0];

    let two = BigRational::from_integer(BigInt::from(2));
    let expected_x = BigRational::from_integer(&sum + &difference) / two.clone();
    let expected_y = BigRational::from_integer(&sum - &difference) / two;

    assert_eq!(solution.get('x').unwrap().as_constant(), Some(expected_x));
    assert_eq!(solution.get('y').unwrap().as_constant(), Some(expected_y));
}
