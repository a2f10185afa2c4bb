use std::fmt::Display;
use std::fmt::Formatter;

use num_traits::One;
use num_traits::Zero;
use serde::Deserialize;
use serde::Serialize;

use crate::error::PolynomialError;

/// A single term `c·x_0^e_0·x_1^e_1·…` of a multivariate polynomial.
///
/// Exponent values may not exceed 0xFF = 255 = `u8::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monomial {
    pub coefficient: f64,
    pub exponents: Vec<u8>,
}

impl Monomial {
    pub fn new(coefficient: f64, exponents: Vec<u8>) -> Self {
        Self {
            coefficient,
            exponents,
        }
    }

    /// The monomial `1·x_0^e_0·…`, as used for candidate supports.
    pub fn unit(exponents: Vec<u8>) -> Self {
        Self::new(1.0, exponents)
    }

    pub fn variable_count(&self) -> usize {
        self.exponents.len()
    }

    /// The sum of all exponents.
    pub fn degree(&self) -> u32 {
        self.exponents.iter().map(|&e| u32::from(e)).sum()
    }

    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Whether this monomial's exponent vector divides `other`'s, _i.e._, every
    /// exponent of `self` is at most the corresponding exponent of `other`.
    /// Coefficients are ignored.
    pub fn divides(&self, other: &Self) -> bool {
        exponent_difference(&other.exponents, &self.exponents).is_some()
    }
}

/// The element-wise sum of two exponent vectors. The shorter one is padded with 0.
pub(crate) fn exponent_sum(a: &[u8], b: &[u8]) -> Result<Vec<u8>, PolynomialError> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let lhs = a.get(i).copied().unwrap_or(0);
            let rhs = b.get(i).copied().unwrap_or(0);
            lhs.checked_add(rhs).ok_or(PolynomialError::ExponentOverflow)
        })
        .collect()
}

/// The element-wise difference `dividend - divisor`, or `None` if the divisor's
/// exponents do not all fit into the dividend's.
pub(crate) fn exponent_difference(dividend: &[u8], divisor: &[u8]) -> Option<Vec<u8>> {
    let len = dividend.len().max(divisor.len());
    (0..len)
        .map(|i| {
            let lhs = dividend.get(i).copied().unwrap_or(0);
            let rhs = divisor.get(i).copied().unwrap_or(0);
            lhs.checked_sub(rhs)
        })
        .collect()
}

/// Pads `exponents` with zeros up to `variable_count` entries.
pub(crate) fn padded(exponents: &[u8], variable_count: usize) -> Vec<u8> {
    let mut pad = exponents.to_vec();
    pad.resize(variable_count.max(exponents.len()), 0);
    pad
}

/// Name of the `index`-th of `variable_count` indeterminates.
pub(crate) fn variable_name(index: usize, variable_count: usize) -> String {
    const NAMES: [&str; 3] = ["x", "y", "z"];
    match NAMES.get(index) {
        Some(name) if variable_count <= NAMES.len() => (*name).to_string(),
        _ => format!("x_{index}"),
    }
}

/// Writes `|coefficient|·x^a·y^b` without the sign. A unit coefficient is
/// omitted unless the term is constant.
pub(crate) fn write_unsigned_term(
    f: &mut Formatter<'_>,
    coefficient: f64,
    exponents: &[u8],
) -> std::fmt::Result {
    let magnitude = coefficient.abs();
    let is_constant = exponents.iter().all(|e| e.is_zero());
    let mut factors = vec![];
    if !magnitude.is_one() || is_constant {
        factors.push(magnitude.to_string());
    }

    for (i, &exponent) in exponents.iter().enumerate() {
        let name = variable_name(i, exponents.len());
        match exponent {
            0 => continue,
            1 => factors.push(name),
            _ => factors.push(format!("{name}^{exponent}")),
        }
    }

    write!(f, "{}", factors.join("*"))
}

impl Display for Monomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.coefficient.is_sign_negative() && !self.coefficient.is_zero() {
            write!(f, "-")?;
        }
        write_unsigned_term(f, self.coefficient, &self.exponents)
    }
}
