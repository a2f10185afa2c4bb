use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Add;
use std::ops::Neg;
use std::ops::Sub;

use itertools::Itertools;
use num_traits::One;
use num_traits::Zero;
use serde::Serialize;

use super::monomial::Monomial;
use super::monomial::exponent_difference;
use super::monomial::exponent_sum;
use super::monomial::padded;
use super::monomial::write_unsigned_term;
use super::monomial_order::MonomialOrder;
use crate::error::PolynomialError;

pub type Degree = i64;

/// A multivariate polynomial with real coefficients, stored as a sequence of
/// [`Monomial`]s in insertion order.
///
/// The sequence may contain several terms with the same exponent vector; all
/// algebraic operations combine such like terms by summing their coefficients.
/// Terms with coefficient zero are kept as present-with-zero-value unless an
/// operation explicitly canonicalizes, see [`normalize`](Self::normalize).
///
/// Equality compares the mapping from exponent vector to combined coefficient,
/// not the order of terms. For example,
///     x + y == y + x
/// and
///     x + 0·y == x.
#[derive(Clone, Serialize)]
pub struct Polynomial {
    variable_count: usize,
    terms: Vec<Monomial>,
}

/// Collects terms, merging like ones, while remembering the order in which each
/// exponent vector first appeared.
#[derive(Debug, Default)]
struct TermAccumulator {
    positions: HashMap<Vec<u8>, usize>,
    terms: Vec<Monomial>,
}

impl TermAccumulator {
    fn add(&mut self, exponents: Vec<u8>, coefficient: f64) {
        if let Some(&position) = self.positions.get(&exponents) {
            self.terms[position].coefficient += coefficient;
            return;
        }

        self.positions.insert(exponents.clone(), self.terms.len());
        self.terms.push(Monomial::new(coefficient, exponents));
    }

    fn into_terms(self) -> Vec<Monomial> {
        self.terms
    }
}

impl Debug for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polynomial")
            .field("variable_count", &self.variable_count)
            .field("terms", &self.terms)
            .finish()
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .combined_terms()
            .into_iter()
            .filter(|term| !term.coefficient.is_zero())
            .sorted_by(|a, b| MonomialOrder::Lex.cmp(&b.exponents, &a.exponents))
            .collect_vec();

        if terms.is_empty() {
            return write!(f, "0");
        }

        for (i, term) in terms.iter().enumerate() {
            let is_negative = term.coefficient.is_sign_negative();
            match (i, is_negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => (),
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            write_unsigned_term(f, term.coefficient, &padded(&term.exponents, self.variable_count))?;
        }

        Ok(())
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        let variable_count = self.variable_count.max(other.variable_count);
        let lhs = self.coefficient_map(variable_count);
        let rhs = other.coefficient_map(variable_count);

        let is_contained_in = |fst: &HashMap<Vec<u8>, f64>, snd: &HashMap<Vec<u8>, f64>| {
            fst.iter()
                .filter(|(_, v)| !v.is_zero())
                .all(|(k, v)| snd.get(k) == Some(v))
        };

        is_contained_in(&lhs, &rhs) && is_contained_in(&rhs, &lhs)
    }
}

impl Polynomial {
    /// Build a polynomial from a non-empty list of terms.
    ///
    /// Fails with [`PolynomialError::EmptyPolynomial`] if `terms` is empty, and with
    /// [`PolynomialError::ExponentLengthMismatch`] if the terms' exponent vectors
    /// don't all have the same length.
    pub fn new(terms: Vec<Monomial>) -> Result<Self, PolynomialError> {
        let Some(first) = terms.first() else {
            return Err(PolynomialError::EmptyPolynomial);
        };
        let variable_count = first.variable_count();
        Self::with_variable_count(variable_count, terms)
    }

    /// Build a polynomial over `variable_count` indeterminates. Every term must
    /// have exactly `variable_count` exponents.
    pub fn with_variable_count(
        variable_count: usize,
        terms: Vec<Monomial>,
    ) -> Result<Self, PolynomialError> {
        if let Some(term) = terms.iter().find(|t| t.variable_count() != variable_count) {
            return Err(PolynomialError::ExponentLengthMismatch {
                expected: variable_count,
                found: term.variable_count(),
            });
        }

        Ok(Self::from_validated_terms(variable_count, terms))
    }

    /// Skips validation; the caller guarantees that every term has
    /// `variable_count` exponents.
    pub(crate) fn from_validated_terms(variable_count: usize, terms: Vec<Monomial>) -> Self {
        debug_assert!(terms.iter().all(|t| t.variable_count() == variable_count));
        Self {
            variable_count,
            terms,
        }
    }

    pub fn zero(variable_count: usize) -> Self {
        Self::from_validated_terms(variable_count, vec![])
    }

    /// Returns a `Polynomial` over `variable_count` variables that evaluates to
    /// `element` everywhere.
    pub fn from_constant(element: f64, variable_count: usize) -> Self {
        let constant = Monomial::new(element, vec![0; variable_count]);
        Self::from_validated_terms(variable_count, vec![constant])
    }

    /// The multiplicative identity "1".
    pub fn one(variable_count: usize) -> Self {
        Self::from_constant(1.0, variable_count)
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// The terms, in insertion order, possibly including like terms.
    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The coefficients of the terms, index-aligned with [`terms`](Self::terms).
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.coefficient).collect()
    }

    /// Overwrite the coefficient of the `i`-th term with `coefficients[i]`. The
    /// exponent vectors are left untouched.
    ///
    /// This is the only place where a coefficient vector gets bound to terms by
    /// position. Fails if the number of coefficients differs from the number of
    /// terms.
    pub fn set_coefficients(&mut self, coefficients: &[f64]) -> Result<(), PolynomialError> {
        if coefficients.len() != self.terms.len() {
            return Err(PolynomialError::CoefficientCountMismatch {
                expected: self.terms.len(),
                found: coefficients.len(),
            });
        }

        for (term, &coefficient) in self.terms.iter_mut().zip(coefficients) {
            term.coefficient = coefficient;
        }

        Ok(())
    }

    /// Like terms merged, in order of first appearance. Zero coefficients stay.
    pub fn combined_terms(&self) -> Vec<Monomial> {
        let mut accumulator = TermAccumulator::default();
        for term in &self.terms {
            accumulator.add(term.exponents.clone(), term.coefficient);
        }
        accumulator.into_terms()
    }

    fn coefficient_map(&self, variable_count: usize) -> HashMap<Vec<u8>, f64> {
        let mut map = HashMap::new();
        for term in &self.terms {
            *map.entry(padded(&term.exponents, variable_count))
                .or_insert(0.0) += term.coefficient;
        }
        map
    }

    /// Merges like terms and removes terms whose coefficient is 0.
    pub fn normalize(&mut self) {
        self.terms = self
            .combined_terms()
            .into_iter()
            .filter(|term| !term.coefficient.is_zero())
            .collect();
    }

    pub fn is_zero(&self) -> bool {
        self.combined_terms()
            .iter()
            .all(|term| term.coefficient.is_zero())
    }

    pub fn is_one(&self) -> bool {
        let combined = self.combined_terms();
        let mut non_zero = combined.iter().filter(|t| !t.coefficient.is_zero());
        match (non_zero.next(), non_zero.next()) {
            (Some(term), None) => term.is_constant() && term.coefficient.is_one(),
            _ => false,
        }
    }

    /// Calculate the "total degree" of a multivariate polynomial.
    ///
    /// The total degree is defined as the highest combined degree of any
    /// term where the combined degree is the sum of all the term's variable
    /// exponents.
    ///
    /// As a convention, the polynomial f(x) = 0 has degree -1.
    pub fn degree(&self) -> Degree {
        self.combined_terms()
            .iter()
            .filter(|term| !term.coefficient.is_zero())
            .map(|term| Degree::from(term.degree()))
            .max()
            .unwrap_or(-1)
    }

    /// The highest exponent of every variable across all terms. For
    /// `P(x,y) = x^4*y + x*y^3`, `[4, 3]` would be returned.
    pub fn max_exponents(&self) -> Vec<u8> {
        let mut max_exponents = vec![0; self.variable_count];
        for term in &self.terms {
            for (max, &exponent) in max_exponents.iter_mut().zip(&term.exponents) {
                *max = (*max).max(exponent);
            }
        }
        max_exponents
    }

    /// The greatest term with respect to `order`, after merging like terms.
    /// Terms with coefficient 0 take part: the leading coefficient may be 0.
    pub fn leading_term(&self, order: MonomialOrder) -> Option<Monomial> {
        self.combined_terms()
            .into_iter()
            .max_by(|a, b| order.cmp(&a.exponents, &b.exponents))
    }

    /// The value at `point`, which needs one coordinate per variable.
    pub fn evaluate(&self, point: &[f64]) -> Result<f64, PolynomialError> {
        if point.len() != self.variable_count {
            return Err(PolynomialError::PointLengthMismatch {
                expected: self.variable_count,
                found: point.len(),
            });
        }

        let value = self
            .terms
            .iter()
            .map(|term| {
                let powers = point
                    .iter()
                    .zip(&term.exponents)
                    .map(|(&x, &e)| x.powi(i32::from(e)));
                term.coefficient * powers.product::<f64>()
            })
            .sum();
        Ok(value)
    }

    #[must_use]
    pub fn scalar_mul(&self, factor: f64) -> Self {
        let mut product = self.clone();
        product.scalar_mul_mut(factor);
        product
    }

    pub fn scalar_mul_mut(&mut self, factor: f64) {
        for term in &mut self.terms {
            term.coefficient *= factor;
        }
    }

    /// Multiply `self` by `other`: every pair of terms contributes the product of
    /// the coefficients at the sum of the exponent vectors.
    ///
    /// Fails with [`PolynomialError::ExponentOverflow`] if an exponent of the
    /// product exceeds `u8::MAX`.
    pub fn multiply(&self, other: &Self) -> Result<Self, PolynomialError> {
        let variable_count = self.variable_count.max(other.variable_count);
        let mut accumulator = TermAccumulator::default();
        for lhs in &self.terms {
            for rhs in &other.terms {
                let exponents = exponent_sum(&lhs.exponents, &rhs.exponents)?;
                accumulator.add(padded(&exponents, variable_count), lhs.coefficient * rhs.coefficient);
            }
        }

        Ok(Self::from_validated_terms(variable_count, accumulator.into_terms()))
    }

    /// Repeatedly multiply `self` with itself. `pow(0)` is the polynomial "1".
    ///
    /// Fails like [`multiply`](Self::multiply) if an exponent of the result
    /// exceeds `u8::MAX`.
    pub fn pow(&self, exponent: u32) -> Result<Self, PolynomialError> {
        let one = Self::one(self.variable_count);
        (0..exponent).try_fold(one, |acc, _| acc.multiply(self))
    }

    /// Divide `self` by `divisor` using the default, lexicographic [`MonomialOrder`].
    /// Returns `(quotient, remainder)`.
    ///
    /// See [`divide_with_order`](Self::divide_with_order).
    pub fn divide(&self, divisor: &Self) -> Result<(Self, Self), PolynomialError> {
        self.divide_with_order(divisor, MonomialOrder::default())
    }

    /// Multivariate long division. Returns `(quotient, remainder)` such that
    /// `quotient * divisor + remainder == self` and no term of the remainder is
    /// divisible by the divisor's leading term.
    ///
    /// The leading term of the working remainder is repeatedly reduced by the
    /// leading term of the divisor if the latter divides it, and moved to the
    /// final remainder otherwise. Terms cancelling to exactly 0 are dropped.
    ///
    /// Fails with [`PolynomialError::DivisionUndefined`] if the divisor has no
    /// terms or its leading coefficient is zero or not finite, and with
    /// [`PolynomialError::ExponentOverflow`] if an intermediate exponent exceeds
    /// `u8::MAX`.
    pub fn divide_with_order(
        &self,
        divisor: &Self,
        order: MonomialOrder,
    ) -> Result<(Self, Self), PolynomialError> {
        let variable_count = self.variable_count.max(divisor.variable_count);
        let mut divisor_terms = divisor.combined_terms();
        let Some(leading_index) =
            divisor_terms.iter().position_max_by(|a, b| order.cmp(&a.exponents, &b.exponents))
        else {
            return Err(PolynomialError::DivisionUndefined);
        };
        let leading_term = divisor_terms.swap_remove(leading_index);
        if leading_term.coefficient.is_zero() || !leading_term.coefficient.is_finite() {
            return Err(PolynomialError::DivisionUndefined);
        }

        // The divisor's leading term is handled separately, so only the rest is kept.
        let divisor_tail = divisor_terms
            .into_iter()
            .filter(|term| !term.coefficient.is_zero())
            .collect_vec();

        let mut working: HashMap<Vec<u8>, f64> = self
            .coefficient_map(variable_count)
            .into_iter()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .collect();
        let mut quotient = TermAccumulator::default();
        let mut remainder = TermAccumulator::default();

        while let Some(exponents) = working.keys().max_by(|a, b| order.cmp(a, b)).cloned() {
            let Some(coefficient) = working.remove(&exponents) else {
                break;
            };

            let Some(shift) = exponent_difference(&exponents, &leading_term.exponents) else {
                remainder.add(exponents, coefficient);
                continue;
            };

            let factor = coefficient / leading_term.coefficient;
            for term in &divisor_tail {
                let product_exponents = padded(&exponent_sum(&shift, &term.exponents)?, variable_count);
                let entry = working.entry(product_exponents.clone()).or_insert(0.0);
                *entry -= factor * term.coefficient;
                if entry.is_zero() {
                    working.remove(&product_exponents);
                }
            }
            quotient.add(padded(&shift, variable_count), factor);
        }

        let quotient = Self::from_validated_terms(variable_count, quotient.into_terms());
        let remainder = Self::from_validated_terms(variable_count, remainder.into_terms());
        Ok((quotient, remainder))
    }

    /// Compare the coefficient mappings up to a relative `tolerance`:
    /// `|a - b| <= tolerance * max(1, |a|, |b|)` for every exponent vector.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let variable_count = self.variable_count.max(other.variable_count);
        let lhs = self.coefficient_map(variable_count);
        let rhs = other.coefficient_map(variable_count);

        lhs.keys().chain(rhs.keys()).unique().all(|exponents| {
            let a = lhs.get(exponents).copied().unwrap_or(0.0);
            let b = rhs.get(exponents).copied().unwrap_or(0.0);
            let scale = 1_f64.max(a.abs()).max(b.abs());
            (a - b).abs() <= tolerance * scale
        })
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let variable_count = self.variable_count.max(other.variable_count);
        let mut accumulator = TermAccumulator::default();
        for term in self.terms.into_iter().chain(other.terms) {
            accumulator.add(padded(&term.exponents, variable_count), term.coefficient);
        }

        Self::from_validated_terms(variable_count, accumulator.into_terms())
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + -other
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.scalar_mul_mut(-1.0);
        self
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    fn polynomial(terms: &[(f64, [u8; 2])]) -> Polynomial {
        let terms = terms
            .iter()
            .map(|&(c, e)| Monomial::new(c, e.to_vec()))
            .collect();
        Polynomial::new(terms).unwrap()
    }

    fn product(a: &Polynomial, b: &Polynomial) -> Polynomial {
        a.multiply(b).unwrap()
    }

    fn x_plus_y_squared() -> Polynomial {
        polynomial(&[(1.0, [2, 0]), (2.0, [1, 1]), (1.0, [0, 2])])
    }

    fn x_cubed_plus_y_cubed() -> Polynomial {
        polynomial(&[(1.0, [3, 0]), (1.0, [0, 3])])
    }

    /// Polynomials in two variables with small integer coefficients. All
    /// products and sums of these are exact in `f64`.
    fn arbitrary_polynomial() -> impl Strategy<Value = Polynomial> {
        vec((-5_i32..=5, vec(0_u8..4, 2)), 1..6).prop_map(|terms| {
            let terms = terms
                .into_iter()
                .map(|(c, e)| Monomial::new(f64::from(c), e))
                .collect();
            Polynomial::new(terms).unwrap()
        })
    }

    /// Polynomials whose leading coefficient with respect to the lexicographic
    /// order is 1, making long division exact in `f64`.
    fn monic_polynomial() -> impl Strategy<Value = Polynomial> {
        vec((-2_i32..=2, vec(0_u8..3, 2)), 1..4).prop_map(|terms| {
            let mut distinct_terms: BTreeMap<Vec<u8>, f64> = terms
                .into_iter()
                .map(|(c, e)| (e, f64::from(c)))
                .collect();
            if let Some(mut leading_coefficient) = distinct_terms.last_entry() {
                *leading_coefficient.get_mut() = 1.0;
            }
            let monic_terms = distinct_terms
                .into_iter()
                .map(|(e, c)| Monomial::new(c, e))
                .collect();
            Polynomial::new(monic_terms).unwrap()
        })
    }

    #[test]
    fn polynomial_can_be_debug_printed() {
        let polynomial = x_plus_y_squared();
        println!("{polynomial:?}");
    }

    #[test]
    fn polynomial_display_test() {
        assert_eq!("x^2 + 2*x*y + y^2", x_plus_y_squared().to_string());
        assert_eq!("x^3 + y^3", x_cubed_plus_y_cubed().to_string());
        assert_eq!("0", Polynomial::zero(2).to_string());
        assert_eq!("0", polynomial(&[(0.0, [1, 1])]).to_string());
        assert_eq!("-x + 3", polynomial(&[(3.0, [0, 0]), (-1.0, [1, 0])]).to_string());
        assert_eq!("x*y - 0.5*y", polynomial(&[(-0.5, [0, 1]), (1.0, [1, 1])]).to_string());
    }

    #[test]
    fn construction_rejects_mismatched_exponent_lengths() {
        let terms = vec![Monomial::unit(vec![1, 0]), Monomial::unit(vec![1, 0, 0])];
        let expected = PolynomialError::ExponentLengthMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(Err(expected), Polynomial::new(terms));
    }

    #[test]
    fn construction_rejects_empty_term_list() {
        assert_eq!(Err(PolynomialError::EmptyPolynomial), Polynomial::new(vec![]));
        assert!(Polynomial::with_variable_count(2, vec![]).unwrap().is_zero());
    }

    #[test]
    fn equality_ignores_order_and_zero_coefficients() {
        let xy = polynomial(&[(1.0, [1, 0]), (1.0, [0, 1])]);
        let yx = polynomial(&[(1.0, [0, 1]), (1.0, [1, 0])]);
        assert_eq!(xy, yx);

        let x = polynomial(&[(1.0, [1, 0])]);
        let x_plus_zero_y = polynomial(&[(1.0, [1, 0]), (0.0, [0, 1])]);
        assert_eq!(x, x_plus_zero_y);
        assert_ne!(x, xy);
    }

    #[test]
    fn like_terms_are_combined_for_equality() {
        let split = polynomial(&[(1.0, [1, 1]), (2.0, [0, 0]), (1.0, [1, 1])]);
        let merged = polynomial(&[(2.0, [1, 1]), (2.0, [0, 0])]);
        assert_eq!(merged, split);
        assert_eq!(2, split.combined_terms().len());
    }

    #[test]
    fn equality_pads_missing_variables() {
        let x_in_one_variable = Polynomial::new(vec![Monomial::unit(vec![1])]).unwrap();
        let x_in_two_variables = polynomial(&[(1.0, [1, 0])]);
        assert_eq!(x_in_one_variable, x_in_two_variables);
    }

    #[test]
    fn set_coefficients_binds_by_position() {
        let mut candidate = x_cubed_plus_y_cubed();
        candidate.set_coefficients(&[2.0, 3.0]).unwrap();
        assert_eq!(polynomial(&[(2.0, [3, 0]), (3.0, [0, 3])]), candidate);
        assert_eq!(vec![2.0, 3.0], candidate.coefficients());

        let expected = PolynomialError::CoefficientCountMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(Err(expected), candidate.set_coefficients(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn normalizing_removes_zero_terms_and_merges_like_terms() {
        let mut poly = polynomial(&[(1.0, [1, 0]), (0.0, [0, 1]), (2.0, [1, 0])]);
        poly.normalize();
        assert_eq!(1, poly.num_terms());
        assert_eq!(vec![3.0], poly.coefficients());
    }

    #[test]
    fn degree_and_max_exponents_test() {
        let target = product(&x_plus_y_squared(), &x_cubed_plus_y_cubed().pow(2).unwrap());
        assert_eq!(8, target.degree());
        assert_eq!(vec![8, 8], target.max_exponents());
        assert_eq!(-1, Polynomial::zero(2).degree());
        assert_eq!(0, Polynomial::one(2).degree());
    }

    #[test]
    fn leading_term_may_have_zero_coefficient() {
        let poly = polynomial(&[(0.0, [3, 0]), (1.0, [0, 3])]);
        let leading_term = poly.leading_term(MonomialOrder::Lex).unwrap();
        assert_eq!(vec![3, 0], leading_term.exponents);
        assert!(leading_term.coefficient.is_zero());
        assert!(Polynomial::zero(2).leading_term(MonomialOrder::Lex).is_none());
    }

    #[test]
    fn is_one_test() {
        assert!(Polynomial::one(3).is_one());
        assert!(!Polynomial::from_constant(2.0, 3).is_one());
        assert!(!Polynomial::zero(3).is_one());
        assert!(polynomial(&[(1.0, [0, 0]), (0.0, [1, 0])]).is_one());
        assert!(!x_cubed_plus_y_cubed().is_one());
    }

    #[test]
    fn evaluate_test() {
        let poly = x_plus_y_squared();
        assert_eq!(Ok(9.0), poly.evaluate(&[1.0, 2.0]));
        assert_eq!(Ok(0.0), poly.evaluate(&[-3.0, 3.0]));

        let expected = PolynomialError::PointLengthMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(Err(expected), poly.evaluate(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn simple_mul_test() {
        let x_plus_y = polynomial(&[(1.0, [1, 0]), (1.0, [0, 1])]);
        assert_eq!(x_plus_y_squared(), product(&x_plus_y, &x_plus_y));

        let one = Polynomial::one(2);
        assert_eq!(x_plus_y, product(&x_plus_y, &one));
        assert_eq!(x_plus_y, product(&one, &x_plus_y));
        assert!(product(&x_plus_y, &Polynomial::zero(2)).is_zero());
    }

    #[test]
    fn multiplication_leaves_operands_unmodified() {
        let a = x_plus_y_squared();
        let b = x_cubed_plus_y_cubed();
        let _ = a.multiply(&b).unwrap();
        assert_eq!(x_plus_y_squared(), a);
        assert_eq!(x_cubed_plus_y_cubed(), b);
    }

    #[test]
    fn reference_target_has_expected_expansion() {
        // (x^2 + 2xy + y^2)·(x^6 + 2x^3y^3 + y^6)
        let target = product(&x_plus_y_squared(), &x_cubed_plus_y_cubed().pow(2).unwrap());
        let expected = polynomial(&[
            (1.0, [8, 0]),
            (2.0, [7, 1]),
            (1.0, [6, 2]),
            (2.0, [5, 3]),
            (4.0, [4, 4]),
            (2.0, [3, 5]),
            (1.0, [2, 6]),
            (2.0, [1, 7]),
            (1.0, [0, 8]),
        ]);
        assert_eq!(expected, target);
    }

    #[test]
    fn simple_pow_test() {
        let x = polynomial(&[(1.0, [1, 0])]);
        assert_eq!(Ok(polynomial(&[(1.0, [4, 0])])), x.pow(4));
        assert_eq!(Ok(polynomial(&[(9.0, [2, 0])])), x.scalar_mul(3.0).pow(2));
        assert!(x.pow(0).unwrap().is_one());
    }

    #[test]
    fn multiplication_reports_exponent_overflow() {
        let x_to_the_128 = polynomial(&[(1.0, [128, 0])]);
        assert_eq!(Err(PolynomialError::ExponentOverflow), x_to_the_128.pow(2));
        assert_eq!(
            Err(PolynomialError::ExponentOverflow),
            x_to_the_128.multiply(&polynomial(&[(1.0, [128, 1])]))
        );

        let x_to_the_127 = polynomial(&[(1.0, [127, 0])]);
        assert_eq!(Ok(polynomial(&[(1.0, [254, 0])])), x_to_the_127.pow(2));
    }

    #[test]
    fn exact_division_has_zero_remainder() {
        let target = product(&x_plus_y_squared(), &x_cubed_plus_y_cubed().pow(2).unwrap());
        for divisor in [x_cubed_plus_y_cubed(), x_plus_y_squared()] {
            let (quotient, remainder) = target.divide(&divisor).unwrap();
            assert!(remainder.is_zero(), "remainder: {remainder}");
            assert_eq!(target, product(&quotient, &divisor));
        }
    }

    #[test]
    fn division_by_single_monomial_keeps_non_divisible_terms() {
        let target = x_plus_y_squared();
        let x = polynomial(&[(2.0, [1, 0])]);
        let (quotient, remainder) = target.divide(&x).unwrap();
        assert_eq!(polynomial(&[(0.5, [1, 0]), (1.0, [0, 1])]), quotient);
        assert_eq!(polynomial(&[(1.0, [0, 2])]), remainder);
    }

    #[test]
    fn division_of_smaller_polynomial_returns_it_as_remainder() {
        let x_plus_y = polynomial(&[(1.0, [1, 0]), (1.0, [0, 1])]);
        let (quotient, remainder) = x_plus_y.divide(&x_cubed_plus_y_cubed()).unwrap();
        assert!(quotient.is_zero());
        assert_eq!(x_plus_y, remainder);
    }

    #[test]
    fn division_by_zero_leading_coefficient_is_undefined() {
        let target = x_plus_y_squared();
        let zero_leading = polynomial(&[(0.0, [3, 0]), (1.0, [0, 3])]);
        let cancelling = polynomial(&[(1.0, [1, 0]), (-1.0, [1, 0])]);

        for divisor in [zero_leading, cancelling, Polynomial::zero(2)] {
            assert_eq!(
                Err(PolynomialError::DivisionUndefined),
                target.divide(&divisor)
            );
        }
    }

    #[test]
    fn division_by_non_finite_leading_coefficient_is_undefined() {
        let target = x_plus_y_squared();
        let divisor = polynomial(&[(f64::INFINITY, [1, 0]), (1.0, [0, 1])]);
        assert_eq!(
            Err(PolynomialError::DivisionUndefined),
            target.divide(&divisor)
        );
    }

    #[test]
    fn division_depends_on_monomial_order_but_identity_holds() {
        let dividend = polynomial(&[(1.0, [2, 1]), (1.0, [0, 3]), (1.0, [1, 0])]);
        let divisor = polynomial(&[(1.0, [1, 0]), (1.0, [0, 2])]);

        for order in [MonomialOrder::Lex, MonomialOrder::GrevLex] {
            let (quotient, remainder) = dividend.divide_with_order(&divisor, order).unwrap();
            assert_eq!(dividend, product(&quotient, &divisor) + remainder);
        }
    }

    #[test]
    fn division_reports_exponent_overflow() {
        let dividend = polynomial(&[(1.0, [200, 0])]);
        let divisor = polynomial(&[(1.0, [1, 0]), (1.0, [0, 200])]);
        assert_eq!(
            Err(PolynomialError::ExponentOverflow),
            dividend.divide(&divisor)
        );
    }

    #[test]
    fn approx_eq_uses_relative_tolerance() {
        let a = polynomial(&[(1e6, [1, 0])]);
        let b = polynomial(&[(1e6 + 1e-4, [1, 0])]);
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&polynomial(&[(1e6 + 1.0, [1, 0])]), 1e-9));
        assert!(a.approx_eq(&(a.clone() + polynomial(&[(1e-12, [0, 1])])), 1e-9));
    }

    #[proptest]
    fn multiplication_is_commutative(
        #[strategy(arbitrary_polynomial())] a: Polynomial,
        #[strategy(arbitrary_polynomial())] b: Polynomial,
    ) {
        prop_assert_eq!(product(&a, &b), product(&b, &a));
    }

    #[proptest]
    fn multiplication_is_associative(
        #[strategy(arbitrary_polynomial())] a: Polynomial,
        #[strategy(arbitrary_polynomial())] b: Polynomial,
        #[strategy(arbitrary_polynomial())] c: Polynomial,
    ) {
        prop_assert_eq!(product(&product(&a, &b), &c), product(&a, &product(&b, &c)));
    }

    #[proptest]
    fn squaring_is_multiplication_with_self(#[strategy(arbitrary_polynomial())] a: Polynomial) {
        prop_assert_eq!(a.pow(2)?, product(&a, &a));
        prop_assert_eq!(a.pow(3)?, product(&product(&a, &a), &a));
    }

    #[proptest]
    fn zeroth_power_is_one(#[strategy(arbitrary_polynomial())] a: Polynomial) {
        prop_assert!(a.pow(0)?.is_one());
    }

    #[proptest]
    fn subtracting_a_polynomial_from_itself_gives_zero(
        #[strategy(arbitrary_polynomial())] a: Polynomial,
    ) {
        prop_assert!((a.clone() - a).is_zero());
    }

    #[proptest]
    fn multiplication_distributes_over_addition(
        #[strategy(arbitrary_polynomial())] a: Polynomial,
        #[strategy(arbitrary_polynomial())] b: Polynomial,
        #[strategy(arbitrary_polynomial())] c: Polynomial,
    ) {
        let sum = b.clone() + c.clone();
        prop_assert_eq!(product(&a, &sum), product(&a, &b) + product(&a, &c));
    }

    #[proptest]
    fn monic_division_reconstructs_dividend_exactly(
        #[strategy(arbitrary_polynomial())] dividend: Polynomial,
        #[strategy(monic_polynomial())] divisor: Polynomial,
    ) {
        let (quotient, remainder) = dividend.divide(&divisor)?;
        prop_assert_eq!(dividend, product(&quotient, &divisor) + remainder);
    }

    #[proptest]
    fn division_reconstructs_dividend(
        #[strategy(arbitrary_polynomial())] dividend: Polynomial,
        #[strategy(arbitrary_polynomial())] divisor: Polynomial,
        #[strategy(prop::sample::select(vec![MonomialOrder::Lex, MonomialOrder::GrevLex]))]
        order: MonomialOrder,
    ) {
        let leading_term = divisor.leading_term(order).unwrap();
        prop_assume!(!leading_term.coefficient.is_zero());

        let (quotient, remainder) = dividend.divide_with_order(&divisor, order)?;
        let reconstructed = product(&quotient, &divisor) + remainder.clone();
        prop_assert!(reconstructed.approx_eq(&dividend, 1e-6));

        // no term of the remainder is divisible by the divisor's leading term
        for term in remainder.terms() {
            prop_assert!(term.coefficient.is_zero() || !leading_term.divides(term));
        }
    }

    #[proptest]
    fn division_by_product_factor_is_exact(
        #[strategy(arbitrary_polynomial())] a: Polynomial,
        #[strategy(monic_polynomial())] b: Polynomial,
    ) {
        let (quotient, remainder) = product(&a, &b).divide(&b)?;
        prop_assert!(remainder.is_zero());
        prop_assert_eq!(a, quotient);
    }
}
