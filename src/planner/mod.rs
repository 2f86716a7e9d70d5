//! Query Planner
//!
//! Transforms parsed SQL statements into logical plans:
//!
//! 1. **Logical Planning**: one plan node per clause of the statement
//! 2. **Unpivot Lowering**: expands an `UNPIVOT` table operator into its
//!    Unpivot / Filter / SubqueryAlias / Projection fragment
//!
//! Name resolution is left to a later analysis phase.

pub mod logical_plan;
pub mod planner;
pub mod unpivot;

#[cfg(test)]
mod tests;

pub use logical_plan::*;
pub use planner::*;
pub use unpivot::*;
