//! SQL Parser
//!
//! Parses tokens into AST statements. The host grammar is a single-table
//! `SELECT ... FROM ... [WHERE ...]`; the interesting part is the `UNPIVOT`
//! table operator, parsed by [`Parser::parse_unpivot_clause`].

use crate::common::error::SyntaxError;
use crate::parser::ast::*;
use crate::parser::keywords::Keyword;
use crate::parser::tokenizer::{Token, TokenType};
use tracing::{debug, trace};

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest nesting of expressions and subqueries the parser accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// SQL parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser over an EOF-terminated token stream
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenType::EOF, String::new(), line, column));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse a single statement
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let statement = match &self.current_token().token_type {
            TokenType::Keyword(Keyword::Select) => Statement::Select(self.parse_select_statement()?),
            _ => return Err(self.expected("SELECT")),
        };

        // Skip any semicolons
        while self.consume_token(&TokenType::Semicolon).is_ok() {}

        self.expect_eof()?;
        Ok(statement)
    }

    /// Parse a standalone UNPIVOT clause that must span the whole input.
    ///
    /// The token stream starts right after the `UNPIVOT` keyword.
    pub fn parse_unpivot_clause_only(&mut self) -> ParseResult<UnpivotClause> {
        let clause = self.parse_unpivot_clause()?;
        self.expect_eof()?;
        Ok(clause)
    }

    /// Parse SELECT statement
    fn parse_select_statement(&mut self) -> ParseResult<SelectStatement> {
        self.consume_keyword(Keyword::Select)?;

        let select_list = self.parse_select_list()?;

        let from = if self.consume_keyword(Keyword::From).is_ok() {
            Some(self.parse_table_factor()?)
        } else {
            None
        };

        let where_clause = if self.consume_keyword(Keyword::Where).is_ok() {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(SelectStatement {
            select_list,
            from,
            where_clause,
        })
    }

    /// Parse SELECT list
    fn parse_select_list(&mut self) -> ParseResult<Vec<SelectItem>> {
        let mut items = Vec::new();

        loop {
            let item = if self.consume_token(&TokenType::Star).is_ok() {
                SelectItem::Wildcard
            } else if matches!(self.current_token().token_type, TokenType::Identifier(_))
                && self.peek_token(1).token_type == TokenType::Dot
                && self.peek_token(2).token_type == TokenType::Star
            {
                let table_name = self.consume_identifier()?;
                self.consume_token(&TokenType::Dot)?;
                self.consume_token(&TokenType::Star)?;
                SelectItem::QualifiedWildcard(table_name)
            } else {
                let expression = self.parse_expression()?;
                match self.parse_relation_alias()? {
                    Some(alias) => SelectItem::Alias(Box::new(expression), alias),
                    None => SelectItem::Expression(expression),
                }
            };

            items.push(item);

            if self.consume_token(&TokenType::Comma).is_err() {
                break;
            }
        }

        Ok(items)
    }

    /// Parse table factor, optionally followed by an UNPIVOT operator
    fn parse_table_factor(&mut self) -> ParseResult<TableReference> {
        let base_table = if self.consume_token(&TokenType::LeftParen).is_ok() {
            let subquery = self.nested(Self::parse_select_statement)?;
            self.consume_token(&TokenType::RightParen)?;
            let alias = self.parse_relation_alias()?;

            TableReference::Subquery {
                subquery: Box::new(subquery),
                alias,
            }
        } else {
            let name = self.consume_identifier()?;
            let alias = self.parse_relation_alias()?;
            TableReference::Table { name, alias }
        };

        if self.consume_keyword(Keyword::Unpivot).is_ok() {
            let clause = self.parse_unpivot_clause()?;
            let alias = self.parse_relation_alias()?;
            Ok(TableReference::Unpivot {
                source: Box::new(base_table),
                clause,
                alias,
            })
        } else {
            Ok(base_table)
        }
    }

    /// Parse UNPIVOT specification, starting after the `UNPIVOT` keyword.
    ///
    /// Syntax: `[INCLUDE NULLS | EXCLUDE NULLS] ( value_spec FOR name IN ( group, ... ) )`
    /// where `value_spec` is one identifier or a parenthesized list of at
    /// least two, and every group carries exactly as many columns as there
    /// are value columns.
    pub fn parse_unpivot_clause(&mut self) -> ParseResult<UnpivotClause> {
        let include_nulls = self.parse_nulls_option()?;

        self.consume_token(&TokenType::LeftParen)?;

        let value_column_names = self.parse_value_column_spec()?;
        let arity = value_column_names.len();

        self.consume_keyword(Keyword::For)?;
        let for_column_name = self.consume_identifier()?;

        self.consume_keyword(Keyword::In)?;
        self.consume_token(&TokenType::LeftParen)?;

        let mut groups = Vec::new();
        loop {
            groups.push(self.parse_unpivot_group(arity)?);
            if self.consume_token(&TokenType::Comma).is_err() {
                break;
            }
        }
        self.close_list()?;

        self.consume_token(&TokenType::RightParen)?;

        debug!(
            value_columns = arity,
            groups = groups.len(),
            include_nulls,
            "parsed UNPIVOT clause"
        );

        Ok(UnpivotClause {
            value_column_names,
            for_column_name,
            groups,
            include_nulls,
        })
    }

    /// `INCLUDE NULLS` / `EXCLUDE NULLS`; nulls are excluded when absent
    fn parse_nulls_option(&mut self) -> ParseResult<bool> {
        let include_nulls = if self.consume_keyword(Keyword::Include).is_ok() {
            true
        } else if self.consume_keyword(Keyword::Exclude).is_ok() {
            false
        } else {
            return Ok(false);
        };
        self.consume_keyword(Keyword::Nulls)?;
        Ok(include_nulls)
    }

    /// One bare identifier, or a parenthesized list of two or more
    fn parse_value_column_spec(&mut self) -> ParseResult<Vec<String>> {
        if self.consume_token(&TokenType::LeftParen).is_err() {
            return Ok(vec![self.consume_identifier()?]);
        }

        let mut names = vec![self.consume_identifier()?];
        if self.consume_token(&TokenType::Comma).is_err() {
            return Err(self.expected(
                "',' (a single value column is written without parentheses)",
            ));
        }
        loop {
            names.push(self.consume_identifier()?);
            if self.consume_token(&TokenType::Comma).is_err() {
                break;
            }
        }
        self.close_list()?;

        Ok(names)
    }

    /// Parse one `IN` list entry holding exactly `arity` columns
    fn parse_unpivot_group(&mut self, arity: usize) -> ParseResult<UnpivotGroup> {
        let columns = if arity == 1 {
            if self.current_token().token_type == TokenType::LeftParen {
                return Err(self.expected(
                    "column reference (a single-column group is written without parentheses)",
                ));
            }
            vec![self.parse_column_reference()?]
        } else {
            if self.consume_token(&TokenType::LeftParen).is_err() {
                return Err(self.expected(&format!("'(' opening a group of {} columns", arity)));
            }
            let mut columns = Vec::with_capacity(arity);
            loop {
                columns.push(self.parse_column_reference()?);
                if columns.len() == arity {
                    break;
                }
                if self.consume_token(&TokenType::Comma).is_err() {
                    return Err(self.expected(&format!(
                        "',' (group has {} of {} columns)",
                        columns.len(),
                        arity
                    )));
                }
            }
            if self.consume_token(&TokenType::RightParen).is_err() {
                return Err(self.expected(&format!("')' closing a group of {} columns", arity)));
            }
            columns
        };

        let alias = self.parse_group_alias()?;
        trace!(columns = columns.len(), alias = ?alias, "parsed UNPIVOT group");

        Ok(UnpivotGroup { columns, alias })
    }

    /// `[AS] name` after a group; the `AS` keyword carries no meaning
    fn parse_group_alias(&mut self) -> ParseResult<Option<String>> {
        if self.consume_keyword(Keyword::As).is_ok() {
            return match &self.current_token().token_type {
                TokenType::StringLiteral(value) => {
                    let value = value.clone();
                    self.position += 1;
                    Ok(Some(value))
                }
                _ => self.consume_identifier_or_keyword().map(Some),
            };
        }
        if let TokenType::StringLiteral(value) = &self.current_token().token_type {
            let value = value.clone();
            self.position += 1;
            return Ok(Some(value));
        }
        if self.at_identifier() {
            return self.consume_identifier().map(Some);
        }
        Ok(None)
    }

    /// `[AS] name` after a relation or select item
    fn parse_relation_alias(&mut self) -> ParseResult<Option<String>> {
        if self.consume_keyword(Keyword::As).is_ok() {
            return self.consume_identifier_or_keyword().map(Some);
        }
        if self.at_identifier() {
            return self.consume_identifier().map(Some);
        }
        Ok(None)
    }

    /// `column`, `table.column` or a longer dotted name such as
    /// `schema.table.column`; everything before the last part is the qualifier
    fn parse_column_reference(&mut self) -> ParseResult<Expression> {
        if !self.at_identifier() {
            return Err(self.expected("column reference"));
        }
        let mut parts = vec![self.consume_identifier()?];
        while self.consume_token(&TokenType::Dot).is_ok() {
            parts.push(self.consume_identifier()?);
        }

        let column = parts.pop().unwrap_or_default();
        let table = (!parts.is_empty()).then(|| parts.join("."));
        Ok(Expression::ColumnReference { table, column })
    }

    /// Parse expression
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_or_expression)
    }

    /// Parse OR expression
    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_expression()?;

        while self.consume_keyword(Keyword::Or).is_ok() {
            let right = self.parse_and_expression()?;
            left = Expression::Binary {
                left: Box::new(left),
                operator: BinaryOperator::Or,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not_expression()?;

        while self.consume_keyword(Keyword::And).is_ok() {
            let right = self.parse_not_expression()?;
            left = Expression::Binary {
                left: Box::new(left),
                operator: BinaryOperator::And,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not_expression(&mut self) -> ParseResult<Expression> {
        if self.consume_keyword(Keyword::Not).is_ok() {
            let expression = self.nested(Self::parse_not_expression)?;
            Ok(Expression::Unary {
                operator: UnaryOperator::Not,
                expression: Box::new(expression),
            })
        } else {
            self.parse_comparison_expression()
        }
    }

    /// Parse comparison expression, including `IS [NOT] NULL`
    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_additive_expression()?;

        loop {
            if self.consume_keyword(Keyword::Is).is_ok() {
                let not = self.consume_keyword(Keyword::Not).is_ok();
                self.consume_keyword(Keyword::Null)?;
                left = if not {
                    Expression::IsNotNull(Box::new(left))
                } else {
                    Expression::IsNull(Box::new(left))
                };
                continue;
            }

            let operator = match &self.current_token().token_type {
                TokenType::Equals => BinaryOperator::Equals,
                TokenType::NotEquals => BinaryOperator::NotEquals,
                TokenType::LessThan => BinaryOperator::LessThan,
                TokenType::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
                TokenType::GreaterThan => BinaryOperator::GreaterThan,
                TokenType::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
                _ => break,
            };
            self.position += 1;

            let right = self.parse_additive_expression()?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse additive expression
    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let operator = match &self.current_token().token_type {
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.position += 1;

            let right = self.parse_multiplicative_expression()?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse multiplicative expression
    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let operator = match &self.current_token().token_type {
                TokenType::Star => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                _ => break,
            };
            self.position += 1;

            let right = self.parse_unary_expression()?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let operator = match &self.current_token().token_type {
            TokenType::Plus => UnaryOperator::Plus,
            TokenType::Minus => UnaryOperator::Minus,
            _ => return self.parse_primary_expression(),
        };
        self.position += 1;

        let expression = self.nested(Self::parse_unary_expression)?;
        Ok(Expression::Unary {
            operator,
            expression: Box::new(expression),
        })
    }

    /// Parse primary expression
    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        match &self.current_token().token_type {
            TokenType::StringLiteral(value) => {
                let value = value.clone();
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::String(value)))
            }
            TokenType::NumericLiteral(text) => {
                let text = text.clone();
                let literal = if text.contains('.') {
                    text.parse().map(LiteralValue::Float).ok()
                } else {
                    text.parse().map(LiteralValue::Integer).ok()
                };
                match literal {
                    Some(literal) => {
                        self.position += 1;
                        Ok(Expression::Literal(literal))
                    }
                    None => Err(self.expected("numeric literal in range")),
                }
            }
            TokenType::Keyword(Keyword::True) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Boolean(true)))
            }
            TokenType::Keyword(Keyword::False) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Boolean(false)))
            }
            TokenType::Keyword(Keyword::Null) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Null))
            }
            TokenType::LeftParen => {
                self.position += 1;
                let expression = self.parse_expression()?;
                self.consume_token(&TokenType::RightParen)?;
                Ok(expression)
            }
            _ if self.at_identifier() => {
                if self.peek_token(1).token_type == TokenType::LeftParen {
                    let name = self.consume_identifier()?;
                    self.parse_function_call(name)
                } else {
                    self.parse_column_reference()
                }
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// Parse function call arguments after the function name
    fn parse_function_call(&mut self, name: String) -> ParseResult<Expression> {
        self.consume_token(&TokenType::LeftParen)?;

        let mut arguments = Vec::new();
        if self.consume_token(&TokenType::Star).is_ok() {
            arguments.push(Expression::Wildcard);
        } else if self.current_token().token_type != TokenType::RightParen {
            loop {
                arguments.push(self.parse_expression()?);
                if self.consume_token(&TokenType::Comma).is_err() {
                    break;
                }
            }
        }

        self.consume_token(&TokenType::RightParen)?;

        Ok(Expression::FunctionCall { name, arguments })
    }

    // Helper methods

    /// Run `parse` one nesting level deeper, failing past `MAX_NESTING_DEPTH`
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(
                self.current_token().position(),
                format!("nesting exceeds {} levels", MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_token(&self, offset: usize) -> &Token {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Error anchored at the current token: `expected <what>, found <token>`
    fn expected(&self, what: &str) -> SyntaxError {
        let token = self.current_token();
        SyntaxError::new(
            token.position(),
            format!("expected {}, found {}", what, token.describe()),
        )
    }

    fn expect_eof(&self) -> ParseResult<()> {
        if self.current_token().is_eof() {
            Ok(())
        } else {
            Err(self.expected("end of input"))
        }
    }

    /// Closing parenthesis of a comma-separated list
    fn close_list(&mut self) -> ParseResult<()> {
        if self.consume_token(&TokenType::RightParen).is_ok() {
            Ok(())
        } else {
            Err(self.expected("',' or ')'"))
        }
    }

    fn consume_token(&mut self, token_type: &TokenType) -> ParseResult<&Token> {
        if self.current_token().token_type == *token_type {
            let token = &self.tokens[self.position];
            self.position += 1;
            Ok(token)
        } else {
            Err(self.expected(&token_type.to_string()))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> ParseResult<&Token> {
        if self.current_token().is_keyword(keyword) {
            let token = &self.tokens[self.position];
            self.position += 1;
            Ok(token)
        } else {
            Err(self.expected(&format!("keyword {}", keyword)))
        }
    }

    /// Identifiers and non-reserved keywords can name columns and tables
    fn at_identifier(&self) -> bool {
        match &self.current_token().token_type {
            TokenType::Identifier(_) => true,
            TokenType::Keyword(keyword) => !keyword.is_reserved(),
            _ => false,
        }
    }

    fn consume_identifier(&mut self) -> ParseResult<String> {
        let name = match &self.current_token().token_type {
            TokenType::Identifier(name) => name.clone(),
            TokenType::Keyword(keyword) if !keyword.is_reserved() => {
                self.current_token().text.clone()
            }
            _ => return Err(self.expected("identifier")),
        };
        self.position += 1;
        Ok(name)
    }

    /// Consume an identifier or keyword (for use after an explicit AS)
    fn consume_identifier_or_keyword(&mut self) -> ParseResult<String> {
        let name = match &self.current_token().token_type {
            TokenType::Identifier(name) => name.clone(),
            TokenType::Keyword(_) => self.current_token().text.clone(),
            _ => return Err(self.expected("alias")),
        };
        self.position += 1;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Position;
    use crate::parser::tokenizer::Tokenizer;

    fn parse_clause(sql: &str) -> ParseResult<UnpivotClause> {
        let tokens = Tokenizer::new().tokenize(sql)?;
        Parser::new(tokens).parse_unpivot_clause_only()
    }

    fn names(columns: &[Expression]) -> Vec<&str> {
        columns.iter().filter_map(Expression::column_name).collect()
    }

    #[test]
    fn test_single_value_clause() {
        let clause = parse_clause("(val FOR col IN (a, b))").unwrap();
        assert_eq!(clause.value_column_names, vec!["val"]);
        assert_eq!(clause.for_column_name, "col");
        assert_eq!(clause.groups.len(), 2);
        assert_eq!(names(&clause.groups[0].columns), vec!["a"]);
        assert_eq!(names(&clause.groups[1].columns), vec!["b"]);
        assert!(clause.groups.iter().all(|g| g.alias.is_none()));
        assert!(!clause.include_nulls);
    }

    #[test]
    fn test_multi_value_clause_with_alias() {
        let clause = parse_clause("((v1, v2) FOR col IN ((a, b) AS first, (c, d) second))").unwrap();
        assert_eq!(clause.value_column_names, vec!["v1", "v2"]);
        assert_eq!(names(&clause.groups[0].columns), vec!["a", "b"]);
        assert_eq!(clause.groups[0].alias.as_deref(), Some("first"));
        assert_eq!(clause.groups[1].alias.as_deref(), Some("second"));
    }

    #[test]
    fn test_nulls_option() {
        assert!(parse_clause("INCLUDE NULLS (v FOR c IN (a))").unwrap().include_nulls);
        assert!(!parse_clause("EXCLUDE NULLS (v FOR c IN (a))").unwrap().include_nulls);

        let err = parse_clause("INCLUDE (v FOR c IN (a))").unwrap_err();
        assert_eq!(err.position, Position::new(1, 9));
    }

    #[test]
    fn test_qualified_column_and_string_alias() {
        let clause = parse_clause("(v FOR c IN (t.a 'Alpha', t.b AS \"Beta\"))").unwrap();
        assert_eq!(
            clause.groups[0].columns[0],
            Expression::ColumnReference {
                table: Some("t".to_string()),
                column: "a".to_string(),
            }
        );
        assert_eq!(clause.groups[0].alias.as_deref(), Some("Alpha"));
        assert_eq!(clause.groups[1].alias.as_deref(), Some("Beta"));
    }

    #[test]
    fn test_member_alias_in_multi_column_group_points_at_as() {
        let err = parse_clause("((v1, v2) FOR c IN ((a AS A, b)))").unwrap_err();
        assert_eq!(err.position, Position::new(1, 24));
        assert_eq!(err.message, "expected ',' (group has 1 of 2 columns), found 'AS'");
    }

    #[test]
    fn test_degenerate_value_spec_points_at_paren() {
        let err = parse_clause("((val) FOR col IN (a))").unwrap_err();
        assert_eq!(err.position, Position::new(1, 6));

        let err = parse_clause("(() FOR col IN (a))").unwrap_err();
        assert_eq!(err.position, Position::new(1, 3));
    }

    #[test]
    fn test_group_arity_mismatch() {
        assert!(parse_clause("((v1, v2) FOR c IN ((a, b, c)))").is_err());
        assert!(parse_clause("((v1, v2) FOR c IN ((a)))").is_err());
        assert!(parse_clause("((v1, v2) FOR c IN (a, b))").is_err());
        assert!(parse_clause("(v FOR c IN ((a)))").is_err());
        assert!(parse_clause("(v FOR c IN ((a, b)))").is_err());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_clause("(v FOR c IN (a)) junk").unwrap_err();
        assert_eq!(err.message, "expected end of input, found 'junk'");
    }

    #[test]
    fn test_unreserved_keyword_alias_with_or_without_as() {
        let without_as = parse_clause("(v FOR c IN (a nulls, b))").unwrap();
        let with_as = parse_clause("(v FOR c IN (a AS nulls, b))").unwrap();
        assert_eq!(without_as, with_as);
        assert_eq!(without_as.groups[0].alias.as_deref(), Some("nulls"));

        let tokens = Tokenizer::new()
            .tokenize("SELECT * FROM t UNPIVOT (v FOR c IN (a, b)) include")
            .unwrap();
        let Statement::Select(select) = Parser::new(tokens).parse_statement().unwrap();
        assert!(matches!(
            select.from,
            Some(TableReference::Unpivot { alias: Some(ref a), .. }) if a == "include"
        ));
    }

    #[test]
    fn test_string_literal_quoted_once_in_errors() {
        let err = parse_clause("(v FOR c IN ('x'))").unwrap_err();
        assert_eq!(err.position, Position::new(1, 14));
        assert_eq!(err.message, "expected column reference, found 'x'");
    }

    #[test]
    fn test_pivot_is_an_ordinary_identifier() {
        let clause = parse_clause("(v FOR pivot IN (pivot, b))").unwrap();
        assert_eq!(clause.for_column_name, "pivot");
        assert_eq!(names(&clause.groups[0].columns), vec!["pivot"]);
    }

    #[test]
    fn test_multipart_column_reference() {
        let clause = parse_clause("(v FOR c IN (db.t.a, t.b, c))").unwrap();
        assert_eq!(
            clause.groups[0].columns[0],
            Expression::ColumnReference {
                table: Some("db.t".to_string()),
                column: "a".to_string(),
            }
        );
        assert_eq!(clause.groups[0].columns[0].to_string(), "db.t.a");
        assert_eq!(names(&clause.groups[1].columns), vec!["b"]);
        assert_eq!(clause.groups[2].columns[0], Expression::column("c"));
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let depth = MAX_NESTING_DEPTH * 4;
        let sql = format!("SELECT {}1{} FROM t", "(".repeat(depth), ")".repeat(depth));
        let tokens = Tokenizer::new().tokenize(&sql).unwrap();
        let err = Parser::new(tokens).parse_statement().unwrap_err();
        assert!(err.message.starts_with("nesting exceeds"), "{}", err.message);

        let sql = format!("SELECT * FROM t WHERE {}a", "NOT ".repeat(depth));
        let tokens = Tokenizer::new().tokenize(&sql).unwrap();
        assert!(Parser::new(tokens).parse_statement().is_err());

        let sql = format!("SELECT * FROM t WHERE {}a", "NOT ".repeat(MAX_NESTING_DEPTH / 2));
        let tokens = Tokenizer::new().tokenize(&sql).unwrap();
        assert!(Parser::new(tokens).parse_statement().is_ok());
    }

    #[test]
    fn test_select_list_forms() {
        let tokens = Tokenizer::new()
            .tokenize("SELECT up.*, a AS x, coalesce(b, 1) y, * FROM t")
            .unwrap();
        let statement = Parser::new(tokens).parse_statement().unwrap();
        let Statement::Select(select) = statement;
        assert_eq!(select.select_list.len(), 4);
        assert_eq!(select.select_list[0], SelectItem::QualifiedWildcard("up".to_string()));
        assert!(matches!(&select.select_list[1], SelectItem::Alias(_, a) if a == "x"));
        assert!(matches!(&select.select_list[2], SelectItem::Alias(_, a) if a == "y"));
        assert_eq!(select.select_list[3], SelectItem::Wildcard);
    }

    #[test]
    fn test_where_precedence() {
        let tokens = Tokenizer::new()
            .tokenize("SELECT * FROM t WHERE a = 1 OR b IS NOT NULL AND NOT c")
            .unwrap();
        let Statement::Select(select) = Parser::new(tokens).parse_statement().unwrap();
        assert_eq!(
            select.where_clause.unwrap().to_string(),
            "((a = 1) OR (b IS NOT NULL AND NOT c))"
        );
    }
}
