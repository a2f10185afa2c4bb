pub mod monomial;
pub mod monomial_order;
pub mod polynomial;
