use itertools::Itertools;

use crate::math::monomial::Monomial;
use crate::math::polynomial::Polynomial;

/// All monomials with coefficient 1 whose exponents lie in the grid
/// `[0..=max_0] × … × [0..=max_{n-1}]`, in row-major order with the first
/// variable outermost.
#[derive(Debug, Clone, PartialEq)]
pub struct MonomialUniverse {
    variable_count: usize,
    monomials: Vec<Monomial>,
}

/// A candidate divisor: one subset of the universe, with every coefficient 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position among all candidates of the same subset size.
    pub index: usize,
    pub subset_size: usize,

    /// The universe indices of the candidate's monomials, increasing.
    pub support: Vec<usize>,

    pub polynomial: Polynomial,
}

impl MonomialUniverse {
    pub fn from_degree_bounds(max_exponents: &[u8]) -> Self {
        let variable_count = max_exponents.len();
        let monomials = match variable_count {
            0 => vec![Monomial::unit(vec![])],
            _ => max_exponents
                .iter()
                .map(|&max| 0..=max)
                .multi_cartesian_product()
                .map(Monomial::unit)
                .collect(),
        };

        Self {
            variable_count,
            monomials,
        }
    }

    /// The universe bounded by the per-variable maximal exponents of `target`.
    /// No divisor of `target` can contain a monomial outside of it.
    pub fn for_target(target: &Polynomial) -> Self {
        Self::from_degree_bounds(&target.max_exponents())
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Number of candidates of the given size, _i.e._, `len choose subset_size`.
    pub fn candidate_count(&self, subset_size: usize) -> u128 {
        let n = self.len() as u128;
        let k = subset_size as u128;
        if k > n {
            return 0;
        }
        (0..k).fold(1, |count, i| count * (n - i) / (i + 1))
    }

    /// Every `subset_size`-combination of the universe, without repetition, in
    /// lexicographic order of the universe indices.
    pub fn candidates(&self, subset_size: usize) -> impl Iterator<Item = Candidate> + '_ {
        (0..self.len())
            .combinations(subset_size)
            .enumerate()
            .map(move |(index, support)| {
                let terms = support.iter().map(|&i| self.monomials[i].clone()).collect();
                let polynomial = Polynomial::from_validated_terms(self.variable_count, terms);
                Candidate {
                    index,
                    subset_size,
                    support,
                    polynomial,
                }
            })
    }
}
