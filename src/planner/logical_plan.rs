//! Logical Plan Representation
//!
//! Defines the logical representation of query plans that describe what to do
//! without specifying how to do it. Column references inside a plan are
//! unresolved; binding them against a catalog is the analyzer's job.

use crate::parser::ast::Expression;
use serde::Serialize;
use std::fmt;

/// Logical plan node types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LogicalPlan {
    /// Scan an (unresolved) named relation
    TableScan(LogicalTableScan),
    /// Filter rows based on a predicate
    Filter(LogicalFilter),
    /// Project (select) columns
    Projection(LogicalProjection),
    /// Name the output of a subplan
    SubqueryAlias(LogicalSubqueryAlias),
    /// Unpivot operation (columns to rows)
    Unpivot(LogicalUnpivot),
    /// Single row without columns (FROM-less SELECT)
    Empty,
}

impl LogicalPlan {
    /// Get all child plans of this plan node
    pub fn children(&self) -> Vec<&LogicalPlan> {
        match self {
            LogicalPlan::TableScan(_) => vec![],
            LogicalPlan::Filter(filter) => vec![&filter.input],
            LogicalPlan::Projection(proj) => vec![&proj.input],
            LogicalPlan::SubqueryAlias(alias) => vec![&alias.input],
            LogicalPlan::Unpivot(unpivot) => vec![&unpivot.input],
            LogicalPlan::Empty => vec![],
        }
    }

    /// Short operator name, as printed in plan trees
    pub fn name(&self) -> &'static str {
        match self {
            LogicalPlan::TableScan(_) => "TableScan",
            LogicalPlan::Filter(_) => "Filter",
            LogicalPlan::Projection(_) => "Projection",
            LogicalPlan::SubqueryAlias(_) => "SubqueryAlias",
            LogicalPlan::Unpivot(_) => "Unpivot",
            LogicalPlan::Empty => "Empty",
        }
    }

    /// True for `SELECT *` / `SELECT t.*` projections, which pass their
    /// input through unchanged
    pub fn is_star_projection(&self) -> bool {
        match self {
            LogicalPlan::Projection(proj) => {
                proj.expressions.len() == 1
                    && matches!(
                        proj.expressions[0],
                        Expression::Wildcard | Expression::QualifiedWildcard { .. }
                    )
            }
            _ => false,
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:width$}{}", "", self.name(), width = depth * 2)?;
        if !matches!(self, LogicalPlan::Empty) {
            f.write_str(": ")?;
        }
        match self {
            LogicalPlan::TableScan(scan) => write!(f, "{}", scan.table_name)?,
            LogicalPlan::Filter(filter) => write!(f, "{}", filter.predicate)?,
            LogicalPlan::Projection(proj) => write_expressions(f, &proj.expressions)?,
            LogicalPlan::SubqueryAlias(alias) => write!(f, "{}", alias.alias)?,
            LogicalPlan::Unpivot(unpivot) => write!(f, "{}", unpivot)?,
            LogicalPlan::Empty => {}
        }
        writeln!(f)?;
        for child in self.children() {
            child.fmt_indent(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

fn write_expressions(f: &mut fmt::Formatter<'_>, expressions: &[Expression]) -> fmt::Result {
    f.write_str("[")?;
    for (i, expr) in expressions.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", expr)?;
    }
    f.write_str("]")
}

/// Table scan operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalTableScan {
    pub table_name: String,
}

impl LogicalTableScan {
    pub fn new(table_name: String) -> Self {
        Self { table_name }
    }
}

/// Filter operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalFilter {
    pub input: Box<LogicalPlan>,
    pub predicate: Expression,
}

impl LogicalFilter {
    pub fn new(input: LogicalPlan, predicate: Expression) -> Self {
        Self {
            input: Box::new(input),
            predicate,
        }
    }
}

/// Projection operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalProjection {
    pub input: Box<LogicalPlan>,
    pub expressions: Vec<Expression>,
}

impl LogicalProjection {
    pub fn new(input: LogicalPlan, expressions: Vec<Expression>) -> Self {
        Self {
            input: Box::new(input),
            expressions,
        }
    }
}

/// Subquery alias - exposes the input's columns under `alias`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalSubqueryAlias {
    pub input: Box<LogicalPlan>,
    pub alias: String,
}

impl LogicalSubqueryAlias {
    pub fn new(input: LogicalPlan, alias: String) -> Self {
        Self {
            input: Box::new(input),
            alias,
        }
    }
}

/// UNPIVOT operation - transforms columns to rows.
///
/// One node type serves both construction paths:
/// - from an `UNPIVOT` clause: `ids` is `None` and `values` is `Some`;
/// - from [`LogicalUnpivot::from_columns`]: `ids` may be given and every
///   group holds exactly one column.
///
/// `aliases` is either `None` (no group is aliased) or holds one entry per
/// group, aligned with `values`. It is never `Some` with every entry `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalUnpivot {
    pub input: Box<LogicalPlan>,
    /// Pass-through columns; `None` lets the analyzer keep every column
    /// that is not unpivoted
    pub ids: Option<Vec<Expression>>,
    /// Groups of source columns, one expression per value column
    pub values: Option<Vec<Vec<Expression>>>,
    /// Per-group label for the for column
    pub aliases: Option<Vec<Option<String>>>,
    pub for_column_name: String,
    pub value_column_names: Vec<String>,
}

impl LogicalUnpivot {
    /// Build a clause-driven unpivot. `aliases` must line up with `values`.
    pub fn new(
        input: LogicalPlan,
        values: Vec<Vec<Expression>>,
        aliases: Vec<Option<String>>,
        for_column_name: String,
        value_column_names: Vec<String>,
    ) -> Self {
        debug_assert_eq!(values.len(), aliases.len());
        debug_assert!(values.iter().all(|g| g.len() == value_column_names.len()));

        let aliases = if aliases.iter().any(Option::is_some) {
            Some(aliases)
        } else {
            None
        };

        Self {
            input: Box::new(input),
            ids: None,
            values: Some(values),
            aliases,
            for_column_name,
            value_column_names,
        }
    }

    /// Build a single-value unpivot directly, DataFrame style
    /// (`unpivot(ids, values, variable, value)`).
    ///
    /// `values = None` means every non-id column is unpivoted; the analyzer
    /// expands it once the input schema is known.
    pub fn from_columns(
        input: LogicalPlan,
        ids: Option<Vec<Expression>>,
        values: Option<Vec<Expression>>,
        variable_column_name: String,
        value_column_name: String,
    ) -> Self {
        Self {
            input: Box::new(input),
            ids,
            values: values.map(|columns| columns.into_iter().map(|c| vec![c]).collect()),
            aliases: None,
            for_column_name: variable_column_name,
            value_column_names: vec![value_column_name],
        }
    }

    /// The literal each group writes into the for column.
    ///
    /// A group's label is its alias, or the name of its only column when
    /// there is a single value column. Multi-column groups without an alias
    /// get `None`. Returns `None` when `values` has not been expanded yet.
    pub fn group_labels(&self) -> Option<Vec<Option<String>>> {
        let values = self.values.as_ref()?;
        let labels = values
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let alias = self
                    .aliases
                    .as_ref()
                    .and_then(|aliases| aliases.get(i).cloned().flatten());
                alias.or_else(|| match group.as_slice() {
                    [single] => single.column_name().map(str::to_string),
                    _ => None,
                })
            })
            .collect();
        Some(labels)
    }
}

impl fmt::Display for LogicalUnpivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ids) = &self.ids {
            f.write_str("ids=")?;
            write_expressions(f, ids)?;
            f.write_str(", ")?;
        }
        f.write_str("values=")?;
        match &self.values {
            Some(values) => {
                f.write_str("[")?;
                for (i, group) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_expressions(f, group)?;
                }
                f.write_str("]")?;
            }
            None => f.write_str("None")?,
        }
        f.write_str(", aliases=")?;
        match &self.aliases {
            Some(aliases) => {
                let rendered: Vec<&str> = aliases
                    .iter()
                    .map(|a| a.as_deref().unwrap_or("None"))
                    .collect();
                write!(f, "[{}]", rendered.join(", "))?;
            }
            None => f.write_str("None")?,
        }
        write!(
            f,
            ", for={}, value_columns=[{}]",
            self.for_column_name,
            self.value_column_names.join(", ")
        )
    }
}
