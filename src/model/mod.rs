//! Value objects describing what the user has modelled.
//!
//! All of these are snapshots owned by the caller (the UI); the compiler
//! only ever borrows them. Their JSON forms match the UI state shape.

mod catalog;
mod configuration;
mod error;
mod filter;
mod join;
mod ordered;
mod pivot;
mod value;

pub use catalog::{DiscoveredTable, FieldAliases};
pub use configuration::ModelConfiguration;
pub use error::ModelError;
pub use filter::{Filter, FilterOperator};
pub use join::{Join, JoinOn, JoinType};
pub use pivot::{Aggregation, PivotConfig, PivotValue};
pub use value::{DataRow, Dataset, Value};
