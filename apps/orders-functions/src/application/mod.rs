//! Application Layer
//!
//! Use cases over the order table and the ports they drive.

pub mod errors;
pub mod ports;
pub mod services;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::OrderError;
