//! SQL compilation for the data-modeling UI.
//!
//! # Pipeline
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ QueryRequest (model, joins, pivot, filters, catalog, aliases) │
//! └───────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼ [sanitize]  drop deselected fields
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        ▼                     ▼                     ▼
//!   pivoted                 grouped                flat
//!   columns + values        rows and/or values     nothing configured
//!   (one store read)
//!        │                     │                     │
//!        └─────────────────────┼─────────────────────┘
//!                              ▼
//!      SELECT ... FROM [from_clause] WHERE [predicate] GROUP BY ...
//! ```
//!
//! Every field is mapped to its table by [`resolve_table`]. Every identifier
//! and literal is rendered by the [`SqlDialect`](crate::sql::SqlDialect) in
//! use.
//!
//! # Example
//!
//! ```
//! use modelsql::compiler::{generate_preview_query, QueryRequest};
//! use modelsql::model::ModelConfiguration;
//!
//! let request = QueryRequest::new(ModelConfiguration::new().with_table("jobs", ["title"]));
//! assert_eq!(
//!     generate_preview_query(&request),
//!     r#"SELECT "jobs"."title" FROM "jobs""#
//! );
//! ```

mod from_clause;
mod pivot;
mod predicate;
mod preview;
mod query;
mod resolve;
mod sanitize;

pub use from_clause::{build_from_clause, walk_joins, JoinStep};
pub use pivot::PIVOT_VALUE_LIMIT;
pub use predicate::{build_where_clause, where_conditions};
pub use preview::PREVIEW_PLACEHOLDER;
pub use query::{generate_preview_query, generate_query, QueryCompiler, QueryRequest};
pub use resolve::resolve_table;
pub use sanitize::{sanitize_filters, sanitize_pivot};
