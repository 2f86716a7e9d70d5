//! Integration tests for the query planner

#[cfg(test)]
mod tests {
    use crate::common::error::{PrismError, PrismResult};
    use crate::parser::ast::{Expression, SelectStatement, Statement};
    use crate::parser::parse_sql;
    use crate::planner::{plan_sql, LogicalPlan, LogicalUnpivot, QueryPlanner};
    use pretty_assertions::assert_eq;

    fn find_unpivot(plan: &LogicalPlan) -> Option<&LogicalUnpivot> {
        match plan {
            LogicalPlan::Unpivot(unpivot) => Some(unpivot),
            other => other.children().into_iter().find_map(find_unpivot),
        }
    }

    fn columns(names: &[&str]) -> Vec<Expression> {
        names.iter().map(|n| Expression::column(*n)).collect()
    }

    #[test]
    fn test_simple_select_planning() -> PrismResult<()> {
        let statement = parse_sql("SELECT id, name FROM users")?;

        let planner = QueryPlanner::new();
        let logical_plan = planner.plan_statement(&statement)?;

        match logical_plan {
            LogicalPlan::Projection(proj) => {
                assert_eq!(proj.expressions, columns(&["id", "name"]));
                match *proj.input {
                    LogicalPlan::TableScan(scan) => {
                        assert_eq!(scan.table_name, "users");
                    }
                    _ => panic!("Expected TableScan as input to Projection"),
                }
            }
            _ => panic!("Expected Projection as root plan node"),
        }

        Ok(())
    }

    #[test]
    fn test_select_with_where() -> PrismResult<()> {
        let logical_plan = plan_sql("SELECT id FROM users WHERE id > 10")?;

        // Projection -> Filter -> TableScan
        match logical_plan {
            LogicalPlan::Projection(proj) => match *proj.input {
                LogicalPlan::Filter(filter) => {
                    assert_eq!(filter.predicate.to_string(), "(id > 10)");
                    match *filter.input {
                        LogicalPlan::TableScan(scan) => {
                            assert_eq!(scan.table_name, "users");
                        }
                        _ => panic!("Expected TableScan as input to Filter"),
                    }
                }
                _ => panic!("Expected Filter as input to Projection"),
            },
            _ => panic!("Expected Projection as root plan node"),
        }

        Ok(())
    }

    #[test]
    fn test_select_unpivot_end_to_end() -> PrismResult<()> {
        let plan = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b))")?;

        assert_eq!(
            plan.to_string(),
            "Projection: [*]\n\
             \x20 Filter: coalesce(val) IS NOT NULL\n\
             \x20   Unpivot: values=[[a], [b]], aliases=None, for=col, value_columns=[val]\n\
             \x20     TableScan: t\n"
        );

        let unpivot = find_unpivot(&plan).expect("plan contains an Unpivot node");
        assert_eq!(unpivot.ids, None);
        assert_eq!(unpivot.values, Some(vec![columns(&["a"]), columns(&["b"])]));
        assert_eq!(unpivot.aliases, None);
        assert_eq!(unpivot.for_column_name, "col");
        assert_eq!(unpivot.value_column_names, vec!["val".to_string()]);

        Ok(())
    }

    #[test]
    fn test_multi_value_unpivot_with_partial_aliases() -> PrismResult<()> {
        let plan =
            plan_sql("SELECT * FROM t UNPIVOT ((val1, val2) FOR col IN ((a, b) first, (c, d)))")?;

        let unpivot = find_unpivot(&plan).expect("plan contains an Unpivot node");
        assert_eq!(
            unpivot.values,
            Some(vec![columns(&["a", "b"]), columns(&["c", "d"])])
        );
        assert_eq!(unpivot.aliases, Some(vec![Some("first".to_string()), None]));
        assert_eq!(
            unpivot.value_column_names,
            vec!["val1".to_string(), "val2".to_string()]
        );

        Ok(())
    }

    #[test]
    fn test_alias_spellings_plan_identically() -> PrismResult<()> {
        assert_eq!(
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a A, b))")?,
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a AS A, b))")?
        );
        assert_eq!(
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b)) up")?,
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b)) AS up")?
        );
        assert_eq!(
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a nulls, b)) nulls")?,
            plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a AS nulls, b)) AS nulls")?
        );
        Ok(())
    }

    #[test]
    fn test_aliased_unpivot_relation() -> PrismResult<()> {
        let plan = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b)) up")?;

        match plan {
            LogicalPlan::Projection(proj) => {
                assert_eq!(
                    proj.expressions,
                    vec![Expression::QualifiedWildcard {
                        table: "up".to_string()
                    }]
                );
                match *proj.input {
                    LogicalPlan::SubqueryAlias(alias) => {
                        assert_eq!(alias.alias, "up");
                        assert!(matches!(*alias.input, LogicalPlan::Filter(_)));
                    }
                    _ => panic!("Expected SubqueryAlias as input to Projection"),
                }
            }
            _ => panic!("Expected Projection as root plan node"),
        }

        Ok(())
    }

    #[test]
    fn test_null_handling_options() -> PrismResult<()> {
        let include = plan_sql("SELECT * FROM t UNPIVOT INCLUDE NULLS (val FOR col IN (a, b))")?;
        match include {
            LogicalPlan::Projection(proj) => {
                assert!(matches!(*proj.input, LogicalPlan::Unpivot(_)));
            }
            _ => panic!("Expected Projection as root plan node"),
        }

        let exclude = plan_sql("SELECT * FROM t UNPIVOT EXCLUDE NULLS (val FOR col IN (a, b))")?;
        let default = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b))")?;
        assert_eq!(exclude, default);

        Ok(())
    }

    #[test]
    fn test_projection_over_unpivot_is_kept() -> PrismResult<()> {
        let plan = plan_sql("SELECT col, val FROM t UNPIVOT (val FOR col IN (a, b)) WHERE val > 0")?;

        let expected_prefix = "Projection: [col, val]\n\
                               \x20 Filter: (val > 0)\n\
                               \x20   Projection: [*]\n";
        assert!(
            plan.to_string().starts_with(expected_prefix),
            "unexpected plan:\n{}",
            plan
        );
        Ok(())
    }

    #[test]
    fn test_unpivot_over_subquery() -> PrismResult<()> {
        let plan = plan_sql(
            "SELECT * FROM (SELECT id, q1, q2 FROM sales) s UNPIVOT (amount FOR quarter IN (q1, q2))",
        )?;

        let unpivot = find_unpivot(&plan).expect("plan contains an Unpivot node");
        match unpivot.input.as_ref() {
            LogicalPlan::SubqueryAlias(alias) => {
                assert_eq!(alias.alias, "s");
                assert!(matches!(*alias.input, LogicalPlan::Projection(_)));
            }
            _ => panic!("Expected SubqueryAlias as input to Unpivot"),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_unpivot_does_not_plan() {
        for sql in [
            "SELECT * FROM t UNPIVOT (val FOR col IN ())",
            "SELECT * FROM t UNPIVOT (val FOR col IN (()))",
            "SELECT * FROM t UNPIVOT (() FOR col IN (a))",
            "SELECT * FROM t UNPIVOT ((val) FOR col IN (a))",
            "SELECT * FROM t UNPIVOT ((v1, v2) FOR col IN ((a AS A, b)))",
            "SELECT * FROM t UNPIVOT ((v1, v2) FOR col IN ())",
            "SELECT * FROM t UNPIVOT ((v1, v2) FOR col IN (()))",
        ] {
            let err = plan_sql(sql).expect_err(sql);
            assert!(err.as_syntax_error().is_some(), "{}: {}", sql, err);
        }
    }

    #[test]
    fn test_empty_select_list_is_internal_error() {
        let statement = Statement::Select(SelectStatement {
            select_list: vec![],
            from: None,
            where_clause: None,
        });
        let err = QueryPlanner::new().plan_statement(&statement).unwrap_err();
        assert!(matches!(err, PrismError::Internal(_)));
    }

    #[test]
    fn test_select_alias_item() -> PrismResult<()> {
        let plan = plan_sql("SELECT upper(name) AS n FROM users u")?;
        assert_eq!(
            plan.to_string(),
            "Projection: [upper(name) AS n]\n\
             \x20 SubqueryAlias: u\n\
             \x20   TableScan: users\n"
        );
        Ok(())
    }
}
