//! Core tax types, builders, money arithmetic, and validation.
//!
//! Everything here is plain data plus pure functions; the calculation
//! pipeline itself lives in [`crate::engine`].

mod builder;
pub mod countries;
pub mod currencies;
mod error;
mod money;
mod types;
mod validation;

pub use builder::*;
pub use currencies::{is_known_currency_code, minor_unit_exponent, to_major_units};
pub use error::*;
pub use money::*;
pub use types::*;
pub use validation::*;
