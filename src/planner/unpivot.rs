//! UNPIVOT lowering
//!
//! Turns a parsed [`UnpivotClause`] into the plan fragment
//!
//! ```text
//! Projection [*] or [alias.*]
//!   [SubqueryAlias alias]
//!     [Filter coalesce(v1, .., vN) IS NOT NULL]     -- unless INCLUDE NULLS
//!       Unpivot
//!         <input>
//! ```
//!
//! Lowering never fails: every arity rule was enforced by the parser.

use crate::parser::ast::{Expression, UnpivotClause};
use crate::planner::logical_plan::*;
use tracing::debug;

/// Function used to test whether a value tuple is entirely null
pub const COALESCE: &str = "coalesce";

/// Lower an UNPIVOT clause applied to `input`, optionally named `alias`
pub fn plan_unpivot(input: LogicalPlan, clause: UnpivotClause, alias: Option<&str>) -> LogicalPlan {
    debug!(
        groups = clause.groups.len(),
        value_columns = clause.arity(),
        aliased_groups = clause.has_aliases(),
        include_nulls = clause.include_nulls,
        alias = ?alias,
        "lowering UNPIVOT"
    );

    let UnpivotClause {
        value_column_names,
        for_column_name,
        groups,
        include_nulls,
    } = clause;

    let (values, aliases): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .map(|group| (group.columns, group.alias))
        .unzip();

    let predicate = (!include_nulls).then(|| null_exclusion_predicate(&value_column_names));

    let unpivot = LogicalPlan::Unpivot(LogicalUnpivot::new(
        input,
        values,
        aliases,
        for_column_name,
        value_column_names,
    ));

    let filtered = match predicate {
        Some(predicate) => LogicalPlan::Filter(LogicalFilter::new(unpivot, predicate)),
        None => unpivot,
    };

    let (relation, star) = match alias {
        Some(alias) => (
            LogicalPlan::SubqueryAlias(LogicalSubqueryAlias::new(filtered, alias.to_string())),
            Expression::QualifiedWildcard {
                table: alias.to_string(),
            },
        ),
        None => (filtered, Expression::Wildcard),
    };

    LogicalPlan::Projection(LogicalProjection::new(relation, vec![star]))
}

/// `coalesce(v1, .., vN) IS NOT NULL`: true unless every value column is null
pub fn null_exclusion_predicate(value_column_names: &[String]) -> Expression {
    Expression::IsNotNull(Box::new(Expression::FunctionCall {
        name: COALESCE.to_string(),
        arguments: value_column_names
            .iter()
            .map(|name| Expression::column(name.as_str()))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::UnpivotGroup;
    use pretty_assertions::assert_eq;

    fn scan() -> LogicalPlan {
        LogicalPlan::TableScan(LogicalTableScan::new("t".to_string()))
    }

    fn group(columns: &[&str], alias: Option<&str>) -> UnpivotGroup {
        UnpivotGroup {
            columns: columns.iter().map(|c| Expression::column(*c)).collect(),
            alias: alias.map(str::to_string),
        }
    }

    fn clause(values: &[&str], groups: Vec<UnpivotGroup>, include_nulls: bool) -> UnpivotClause {
        UnpivotClause {
            value_column_names: values.iter().map(|v| v.to_string()).collect(),
            for_column_name: "col".to_string(),
            groups,
            include_nulls,
        }
    }

    #[test]
    fn test_lowering_shape() {
        let plan = plan_unpivot(
            scan(),
            clause(&["val"], vec![group(&["a"], None), group(&["b"], None)], false),
            None,
        );

        let expected = LogicalPlan::Projection(LogicalProjection::new(
            LogicalPlan::Filter(LogicalFilter::new(
                LogicalPlan::Unpivot(LogicalUnpivot {
                    input: Box::new(scan()),
                    ids: None,
                    values: Some(vec![
                        vec![Expression::column("a")],
                        vec![Expression::column("b")],
                    ]),
                    aliases: None,
                    for_column_name: "col".to_string(),
                    value_column_names: vec!["val".to_string()],
                }),
                null_exclusion_predicate(&["val".to_string()]),
            )),
            vec![Expression::Wildcard],
        ));
        assert_eq!(plan, expected);
    }

    #[test]
    fn test_include_nulls_skips_filter() {
        let plan = plan_unpivot(scan(), clause(&["val"], vec![group(&["a"], None)], true), None);
        match plan {
            LogicalPlan::Projection(proj) => {
                assert!(matches!(*proj.input, LogicalPlan::Unpivot(_)));
            }
            other => panic!("Expected Projection, got {}", other.name()),
        }
    }

    #[test]
    fn test_alias_wraps_filter_and_qualifies_star() {
        let plan = plan_unpivot(
            scan(),
            clause(
                &["v1", "v2"],
                vec![group(&["a", "b"], Some("first")), group(&["c", "d"], None)],
                false,
            ),
            Some("up"),
        );

        assert_eq!(
            plan.to_string(),
            "Projection: [up.*]\n\
             \x20 SubqueryAlias: up\n\
             \x20   Filter: coalesce(v1, v2) IS NOT NULL\n\
             \x20     Unpivot: values=[[a, b], [c, d]], aliases=[first, None], for=col, value_columns=[v1, v2]\n\
             \x20       TableScan: t\n"
        );
    }
}
