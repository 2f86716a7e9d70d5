//! SQL Parser
//!
//! This module provides SQL parsing capabilities that convert SQL strings into
//! structured query representations that can be planned.

pub mod ast;
pub mod keywords;
pub mod parser;
pub mod tokenizer;

pub use ast::*;
pub use keywords::*;
pub use parser::*;
pub use tokenizer::*;

use crate::common::error::PrismResult;

/// Main parser interface
pub struct SqlParser {
    tokenizer: Tokenizer,
}

impl SqlParser {
    /// Create a new SQL parser
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    /// Parse a SQL query string into a statement
    pub fn parse(&self, sql: &str) -> PrismResult<Statement> {
        let tokens = self.tokenizer.tokenize(sql)?;
        let mut parser = Parser::new(tokens);
        Ok(parser.parse_statement()?)
    }

    /// Parse the text that follows an `UNPIVOT` keyword
    pub fn parse_unpivot_clause(&self, sql: &str) -> PrismResult<UnpivotClause> {
        let tokens = self.tokenizer.tokenize(sql)?;
        let mut parser = Parser::new(tokens);
        Ok(parser.parse_unpivot_clause_only()?)
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single SQL statement (convenience function)
pub fn parse_sql(sql: &str) -> PrismResult<Statement> {
    SqlParser::new().parse(sql)
}

/// Parse an UNPIVOT clause body, e.g. `INCLUDE NULLS (v FOR k IN (a, b))`
pub fn parse_unpivot_clause(sql: &str) -> PrismResult<UnpivotClause> {
    SqlParser::new().parse_unpivot_clause(sql)
}
