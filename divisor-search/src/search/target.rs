use crate::error::PolynomialError;
use crate::math::monomial::Monomial;
use crate::math::polynomial::Polynomial;

/// The polynomial the reference search runs against:
/// `P(x,y) = (x^2 + 2xy + y^2)·(x^3 + y^3)^2`.
pub fn reference_target() -> Result<Polynomial, PolynomialError> {
    let binomial_square = Polynomial::new(vec![
        Monomial::new(1.0, vec![2, 0]),
        Monomial::new(2.0, vec![1, 1]),
        Monomial::new(1.0, vec![0, 2]),
    ])?;
    let sum_of_cubes = Polynomial::new(vec![
        Monomial::new(1.0, vec![3, 0]),
        Monomial::new(1.0, vec![0, 3]),
    ])?;

    binomial_square.multiply(&sum_of_cubes.pow(2)?)
}
