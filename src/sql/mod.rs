//! SQL text generation support.
//!
//! - [`dialect`] - identifier quoting and literal escaping per SQL dialect

pub mod dialect;

pub use dialect::{Dialect, SqlDialect};
