//! prism-unpivot - UNPIVOT support for the Prism SQL front end
//!
//! Parses the `UNPIVOT [INCLUDE | EXCLUDE NULLS] ( ... )` table operator
//! (alone or inside a `SELECT`) and lowers it into an unresolved logical plan:
//!
//! ```
//! use prism_unpivot::{plan_sql, LogicalPlan};
//!
//! let plan = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b))").unwrap();
//! assert!(matches!(plan, LogicalPlan::Projection(_)));
//! ```
//!
pub mod common;
pub mod config;
pub mod parser;
pub mod planner;

// Re-export common types for convenience
pub use common::{Position, PrismError, PrismResult, SyntaxError};

// Re-export configuration for convenience
pub use config::{CliConfig, OutputFormat};

// Re-export parser entry points for convenience
pub use parser::{
    parse_sql, parse_unpivot_clause, Expression, SelectStatement, SqlParser, Statement,
    TableReference, UnpivotClause, UnpivotGroup,
};

// Re-export planner system for convenience
pub use planner::{
    null_exclusion_predicate, plan_sql, plan_statement, plan_unpivot, LogicalFilter, LogicalPlan,
    LogicalProjection, LogicalSubqueryAlias, LogicalTableScan, LogicalUnpivot, QueryPlanner,
};
