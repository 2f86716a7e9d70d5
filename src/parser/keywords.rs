//! SQL keywords

use serde::Serialize;
use std::fmt;

/// Keywords recognised by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Select,
    From,
    Where,
    As,
    And,
    Or,
    Not,
    Is,
    Null,
    True,
    False,
    Unpivot,
    For,
    In,
    Include,
    Exclude,
    Nulls,
}

impl Keyword {
    /// Every keyword, used to build the tokenizer lookup table
    pub fn all() -> &'static [Keyword] {
        &[
            Keyword::Select,
            Keyword::From,
            Keyword::Where,
            Keyword::As,
            Keyword::And,
            Keyword::Or,
            Keyword::Not,
            Keyword::Is,
            Keyword::Null,
            Keyword::True,
            Keyword::False,
            Keyword::Unpivot,
            Keyword::For,
            Keyword::In,
            Keyword::Include,
            Keyword::Exclude,
            Keyword::Nulls,
        ]
    }

    /// Reserved keywords never double as identifiers or implicit aliases.
    ///
    /// `INCLUDE`, `EXCLUDE` and `NULLS` are only meaningful right after
    /// `UNPIVOT`, so they stay usable as column names.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Keyword::Include | Keyword::Exclude | Keyword::Nulls)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::As => "AS",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::Is => "IS",
            Keyword::Null => "NULL",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Unpivot => "UNPIVOT",
            Keyword::For => "FOR",
            Keyword::In => "IN",
            Keyword::Include => "INCLUDE",
            Keyword::Exclude => "EXCLUDE",
            Keyword::Nulls => "NULLS",
        };
        f.write_str(text)
    }
}
