//! Query Planner
//!
//! Turns parsed statements into unresolved logical plans. Table references
//! are planned bottom-up; an `UNPIVOT` operator is lowered by
//! [`plan_unpivot`](crate::planner::unpivot::plan_unpivot).

use crate::common::error::PrismResult;
use crate::internal_err;
use crate::parser::ast::{Expression, SelectItem, SelectStatement, Statement, TableReference};
use crate::parser::parse_sql;
use crate::planner::logical_plan::*;
use crate::planner::unpivot::plan_unpivot;
use tracing::{debug, trace};

/// Main query planner
#[derive(Debug, Default)]
pub struct QueryPlanner {}

impl QueryPlanner {
    /// Create a new query planner
    pub fn new() -> Self {
        Self {}
    }

    /// Plan a SQL statement
    pub fn plan_statement(&self, statement: &Statement) -> PrismResult<LogicalPlan> {
        let plan = match statement {
            Statement::Select(select) => self.plan_select(select)?,
        };
        debug!(root = plan.name(), "planned statement");
        Ok(plan)
    }

    fn plan_select(&self, select: &SelectStatement) -> PrismResult<LogicalPlan> {
        if select.select_list.is_empty() {
            return Err(internal_err!("SELECT statement has an empty select list"));
        }

        let mut plan = match &select.from {
            Some(table_ref) => self.plan_table_reference(table_ref)?,
            None => LogicalPlan::Empty,
        };

        if let Some(predicate) = &select.where_clause {
            plan = LogicalPlan::Filter(LogicalFilter::new(plan, predicate.as_ref().clone()));
        }

        // `SELECT *` over a relation that is already a star projection adds nothing
        if select.select_list == [SelectItem::Wildcard] && plan.is_star_projection() {
            trace!("eliding redundant star projection");
            return Ok(plan);
        }

        let expressions = select
            .select_list
            .iter()
            .map(Self::plan_select_item)
            .collect();
        Ok(LogicalPlan::Projection(LogicalProjection::new(
            plan,
            expressions,
        )))
    }

    fn plan_select_item(item: &SelectItem) -> Expression {
        match item {
            SelectItem::Expression(expr) => expr.clone(),
            SelectItem::QualifiedWildcard(table) => Expression::QualifiedWildcard {
                table: table.clone(),
            },
            SelectItem::Wildcard => Expression::Wildcard,
            SelectItem::Alias(expr, alias) => Expression::Alias {
                expression: expr.clone(),
                alias: alias.clone(),
            },
        }
    }

    fn plan_table_reference(&self, table_ref: &TableReference) -> PrismResult<LogicalPlan> {
        match table_ref {
            TableReference::Table { name, alias } => {
                let scan = LogicalPlan::TableScan(LogicalTableScan::new(name.clone()));
                Ok(Self::with_alias(scan, alias.as_deref()))
            }
            TableReference::Subquery { subquery, alias } => {
                let plan = self.plan_select(subquery)?;
                Ok(Self::with_alias(plan, alias.as_deref()))
            }
            TableReference::Unpivot {
                source,
                clause,
                alias,
            } => {
                let input = self.plan_table_reference(source)?;
                Ok(plan_unpivot(input, clause.clone(), alias.as_deref()))
            }
        }
    }

    fn with_alias(plan: LogicalPlan, alias: Option<&str>) -> LogicalPlan {
        match alias {
            Some(alias) => {
                LogicalPlan::SubqueryAlias(LogicalSubqueryAlias::new(plan, alias.to_string()))
            }
            None => plan,
        }
    }
}

/// Convenience function to plan a statement
pub fn plan_statement(statement: &Statement) -> PrismResult<LogicalPlan> {
    QueryPlanner::new().plan_statement(statement)
}

/// Parse and plan a single SQL statement
pub fn plan_sql(sql: &str) -> PrismResult<LogicalPlan> {
    let statement = parse_sql(sql)?;
    plan_statement(&statement)
}
