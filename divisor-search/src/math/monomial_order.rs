use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// A total order on exponent vectors that is compatible with multiplication, used
/// to pick the leading term of a polynomial.
///
/// Both orders treat the first variable as the most significant one, _i.e._,
/// `x > y` for polynomials in `x` and `y`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MonomialOrder {
    /// Lexicographic order: compare exponents variable by variable.
    #[default]
    Lex,

    /// Graded reverse lexicographic order: compare total degrees first, break
    /// ties by the reversed lexicographic order on the last variable.
    GrevLex,
}

impl MonomialOrder {
    /// Compare two exponent vectors. Missing trailing exponents count as 0.
    pub fn cmp(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            Self::Lex => Self::lex(a, b),
            Self::GrevLex => Self::grevlex(a, b),
        }
    }

    fn lex(a: &[u8], b: &[u8]) -> Ordering {
        let len = a.len().max(b.len());
        (0..len)
            .map(|i| exponent(a, i).cmp(&exponent(b, i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn grevlex(a: &[u8], b: &[u8]) -> Ordering {
        let degree = |e: &[u8]| e.iter().map(|&x| u32::from(x)).sum::<u32>();
        match degree(a).cmp(&degree(b)) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        let len = a.len().max(b.len());
        (0..len)
            .rev()
            .map(|i| exponent(a, i).cmp(&exponent(b, i)).reverse())
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn exponent(exponents: &[u8], index: usize) -> u8 {
    exponents.get(index).copied().unwrap_or(0)
}

impl Display for MonomialOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex => write!(f, "lex"),
            Self::GrevLex => write!(f, "grevlex"),
        }
    }
}

impl FromStr for MonomialOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lex" => Ok(Self::Lex),
            "grevlex" => Ok(Self::GrevLex),
            _ => Err(format!("unknown monomial order `{s}`; expected `lex` or `grevlex`")),
        }
    }
}
