//! Constraint values and the range algebra over them

mod algebra;
pub(crate) mod expand;
mod predicate;
mod range;

pub use algebra::Constraint;
pub use predicate::Predicate;
pub use range::Range;
