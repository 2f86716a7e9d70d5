//! End-to-end planning tests: SQL text in, unresolved logical plan out

use pretty_assertions::assert_eq;
use prism_unpivot::{
    null_exclusion_predicate, parse_unpivot_clause, plan_sql, plan_unpivot, Expression,
    LogicalFilter, LogicalPlan, LogicalProjection, LogicalTableScan, LogicalUnpivot, PrismResult,
};

fn scan(name: &str) -> LogicalPlan {
    LogicalPlan::TableScan(LogicalTableScan::new(name.to_string()))
}

fn groups(names: &[&[&str]]) -> Vec<Vec<Expression>> {
    names
        .iter()
        .map(|g| g.iter().map(|c| Expression::column(*c)).collect())
        .collect()
}

#[test]
fn test_select_star_unpivot_plan() -> PrismResult<()> {
    let plan = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a, b))")?;

    let expected = LogicalPlan::Projection(LogicalProjection::new(
        LogicalPlan::Filter(LogicalFilter::new(
            LogicalPlan::Unpivot(LogicalUnpivot::new(
                scan("t"),
                groups(&[&["a"], &["b"]]),
                vec![None, None],
                "col".to_string(),
                vec!["val".to_string()],
            )),
            null_exclusion_predicate(&["val".to_string()]),
        )),
        vec![Expression::Wildcard],
    ));
    assert_eq!(plan, expected);
    Ok(())
}

#[test]
fn test_lowering_standalone_clause() -> PrismResult<()> {
    let clause = parse_unpivot_clause("INCLUDE NULLS ((v1, v2) FOR k IN ((a, b) ab, (c, d)))")?;
    let plan = plan_unpivot(scan("wide"), clause, None);

    assert_eq!(
        plan.to_string(),
        "Projection: [*]\n\
         \x20 Unpivot: values=[[a, b], [c, d]], aliases=[ab, None], for=k, value_columns=[v1, v2]\n\
         \x20   TableScan: wide\n"
    );
    Ok(())
}

#[test]
fn test_group_labels_follow_aliases_and_names() -> PrismResult<()> {
    let plan = plan_sql("SELECT * FROM t UNPIVOT (val FOR col IN (a AS 'first', b))")?;

    let mut node = &plan;
    let unpivot = loop {
        match node {
            LogicalPlan::Unpivot(unpivot) => break unpivot,
            other => node = other.children()[0],
        }
    };
    assert_eq!(
        unpivot.aliases,
        Some(vec![Some("first".to_string()), None])
    );
    assert_eq!(
        unpivot.group_labels(),
        Some(vec![Some("first".to_string()), Some("b".to_string())])
    );
    Ok(())
}

#[test]
fn test_plan_serializes_to_json() -> PrismResult<()> {
    let plan = plan_sql("SELECT * FROM t UNPIVOT INCLUDE NULLS (val FOR col IN (a, b)) up")?;
    let json = serde_json::to_value(&plan)?;

    let unpivot = &json["Projection"]["input"]["SubqueryAlias"]["input"]["Unpivot"];
    assert_eq!(unpivot["for_column_name"], "col");
    assert_eq!(unpivot["value_column_names"], serde_json::json!(["val"]));
    assert_eq!(unpivot["aliases"], serde_json::Value::Null);
    assert_eq!(unpivot["input"]["TableScan"]["table_name"], "t");
    Ok(())
}

#[test]
fn test_planning_is_deterministic() -> PrismResult<()> {
    let sql = "SELECT * FROM t UNPIVOT ((x, y) FOR k IN ((a, b) AS ab, (c, d) cd)) AS up";
    assert_eq!(plan_sql(sql)?, plan_sql(sql)?);
    Ok(())
}
