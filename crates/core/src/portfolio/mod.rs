//! Portfolio computations.

pub mod valuation;
