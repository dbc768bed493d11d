//! # modelsql
//!
//! Compiles a user-curated data model into SQL for an embedded store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        UI state (model, joins, filters, pivot)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   resolve → from_clause → predicate → pivot / grouped    │
//! │             (quoting via sql::dialect)                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │        ▲
//!                          │        │ distinct pivot values
//!                          ▼        │
//! ┌─────────────────────────────────────────────────────────┐
//! │              RelationalStore (SqliteStore)               │
//! └─────────────────────────────────────────────────────────┘
//!                          ▲
//!                          │ literal SQL, pivot/filter edits
//! ┌─────────────────────────────────────────────────────────┐
//! │            assistant (AI collaborator interface)         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod assistant;
pub mod compiler;
pub mod config;
pub mod model;
pub mod sql;
pub mod store;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{
        generate_preview_query, generate_query, QueryCompiler, QueryRequest, PIVOT_VALUE_LIMIT,
    };
    pub use crate::model::{
        Aggregation, DataRow, DiscoveredTable, FieldAliases, Filter, FilterOperator, Join,
        JoinType, ModelConfiguration, PivotConfig, PivotValue, Value,
    };
    pub use crate::sql::{Dialect, SqlDialect};
    pub use crate::store::{RelationalStore, SqliteStore, StoreError, StoreResult};
}
