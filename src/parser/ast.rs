//! Abstract Syntax Tree (AST) for SQL statements
//!
//! Defines the structure of parsed SQL statements, including the UNPIVOT
//! table operator clause.

use serde::Serialize;
use std::fmt;

/// SQL statement types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Select(SelectStatement),
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    pub select_list: Vec<SelectItem>,
    pub from: Option<TableReference>,
    pub where_clause: Option<Box<Expression>>,
}

/// SELECT list item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectItem {
    Expression(Expression),
    QualifiedWildcard(String), // table.*
    Wildcard,                  // *
    Alias(Box<Expression>, String),
}

/// Table reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableReference {
    Table {
        name: String,
        alias: Option<String>,
    },
    Subquery {
        subquery: Box<SelectStatement>,
        alias: Option<String>,
    },
    Unpivot {
        source: Box<TableReference>,
        clause: UnpivotClause,
        alias: Option<String>,
    },
}

/// Parsed `UNPIVOT [INCLUDE | EXCLUDE NULLS] ( ... )` clause.
///
/// Every group holds exactly `value_column_names.len()` columns and there
/// is at least one group; the parser rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnpivotClause {
    /// Output value column(s), N >= 1
    pub value_column_names: Vec<String>,
    /// Output column holding the group label
    pub for_column_name: String,
    /// Entries of the `IN ( ... )` list
    pub groups: Vec<UnpivotGroup>,
    pub include_nulls: bool,
}

/// One entry of the `IN ( ... )` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnpivotGroup {
    /// Unresolved source column references, one per value column
    pub columns: Vec<Expression>,
    /// Label placed in the for column; `None` when the group is unaliased
    pub alias: Option<String>,
}

impl UnpivotClause {
    /// Number of value columns (N)
    pub fn arity(&self) -> usize {
        self.value_column_names.len()
    }

    pub fn has_aliases(&self) -> bool {
        self.groups.iter().any(|g| g.alias.is_some())
    }
}

/// Expression AST
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Literal(LiteralValue),
    ColumnReference {
        table: Option<String>,
        column: String,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    IsNull(Box<Expression>),
    IsNotNull(Box<Expression>),
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        expression: Box<Expression>,
    },
    Alias {
        expression: Box<Expression>,
        alias: String,
    },
    QualifiedWildcard {
        table: String,
    },
    Wildcard,
}

impl Expression {
    /// Unqualified column reference
    pub fn column(name: impl Into<String>) -> Self {
        Expression::ColumnReference {
            table: None,
            column: name.into(),
        }
    }

    /// Name of the referenced column, if this is a column reference
    pub fn column_name(&self) -> Option<&str> {
        match self {
            Expression::ColumnReference { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => f.write_str("NULL"),
            LiteralValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            LiteralValue::Integer(i) => write!(f, "{}", i),
            LiteralValue::Float(v) => write!(f, "{}", v),
            LiteralValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equals => "=",
            BinaryOperator::NotEquals => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        };
        f.write_str(op)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::ColumnReference { table: Some(t), column } => write!(f, "{}.{}", t, column),
            Expression::ColumnReference { table: None, column } => f.write_str(column),
            Expression::FunctionCall { name, arguments } => {
                write!(f, "{}(", name)?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            Expression::IsNull(inner) => write!(f, "{} IS NULL", inner),
            Expression::IsNotNull(inner) => write!(f, "{} IS NOT NULL", inner),
            Expression::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Unary {
                operator: UnaryOperator::Not,
                expression,
            } => write!(f, "NOT {}", expression),
            Expression::Unary {
                operator: UnaryOperator::Minus,
                expression,
            } => write!(f, "-{}", expression),
            Expression::Unary {
                operator: UnaryOperator::Plus,
                expression,
            } => write!(f, "+{}", expression),
            Expression::Alias { expression, alias } => write!(f, "{} AS {}", expression, alias),
            Expression::QualifiedWildcard { table } => write!(f, "{}.*", table),
            Expression::Wildcard => f.write_str("*"),
        }
    }
}
