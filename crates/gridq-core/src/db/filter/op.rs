use derive_more::Display;

///
/// FilterOp
///
/// The fixed comparison vocabulary of grid filter expressions. Each
/// operator maps to exactly one SQL fragment shape: a plain comparison
/// symbol, a LIKE pattern, or a unary NULL test.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum FilterOp {
    IsNull,
    IsNotNull,
    DifferentFrom,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl FilterOp {
    /// Resolve a caller-supplied operator alias, case-insensitively.
    ///
    /// Unknown aliases resolve to `None` and the enclosing condition is
    /// dropped; operator strings are not validated server-side.
    #[must_use]
    pub fn parse(alias: &str) -> Option<Self> {
        let alias = alias.trim().to_ascii_lowercase();

        let op = match alias.as_str() {
            "isnull" => Self::IsNull,
            "notnull" => Self::IsNotNull,
            "<>" | "differentfrom" => Self::DifferentFrom,
            "contains" => Self::Contains,
            "notcontains" => Self::NotContains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "=" | "==" | "eq" | "equals" => Self::Equal,
            "!=" | "ne" | "notequal" => Self::NotEqual,
            ">" | "gt" | "greaterthan" => Self::GreaterThan,
            "<" | "lt" | "lessthan" => Self::LessThan,
            ">=" | "gte" | "greaterthanorequal" => Self::GreaterThanOrEqual,
            "<=" | "lte" | "lessthanorequal" => Self::LessThanOrEqual,
            _ => return None,
        };

        Some(op)
    }

    /// Whether the operator consumes a right-hand value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Whether the operator renders through a LIKE pattern.
    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(
            self,
            Self::Contains | Self::NotContains | Self::StartsWith | Self::EndsWith
        )
    }

    /// Literal SQL symbol for plain comparison operators.
    ///
    /// CONTRACT: NULL tests and LIKE operators have no symbol; asking for
    /// one is a programming error, not a request failure.
    #[must_use]
    pub fn sql_symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::DifferentFrom => "<>",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            other => panic!("operator {other} has no plain SQL symbol"),
        }
    }

    /// LIKE pattern for the operator around the given text.
    ///
    /// CONTRACT: only valid for LIKE-shaped operators.
    #[must_use]
    pub fn like_pattern(self, text: &str) -> String {
        match self {
            Self::Contains | Self::NotContains => format!("%{text}%"),
            Self::StartsWith => format!("{text}%"),
            Self::EndsWith => format!("%{text}"),
            other => panic!("operator {other} is not a LIKE operator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_case_insensitively() {
        assert_eq!(FilterOp::parse("="), Some(FilterOp::Equal));
        assert_eq!(FilterOp::parse("=="), Some(FilterOp::Equal));
        assert_eq!(FilterOp::parse("EQ"), Some(FilterOp::Equal));
        assert_eq!(FilterOp::parse("Equals"), Some(FilterOp::Equal));
        assert_eq!(FilterOp::parse("<>"), Some(FilterOp::DifferentFrom));
        assert_eq!(FilterOp::parse(" gte "), Some(FilterOp::GreaterThanOrEqual));
        assert_eq!(FilterOp::parse("NotNull"), Some(FilterOp::IsNotNull));
        assert_eq!(FilterOp::parse("startswith"), Some(FilterOp::StartsWith));
        assert_eq!(FilterOp::parse("between"), None);
        assert_eq!(FilterOp::parse(""), None);
    }

    #[test]
    fn null_tests_take_no_value() {
        assert!(!FilterOp::IsNull.takes_value());
        assert!(!FilterOp::IsNotNull.takes_value());
        assert!(FilterOp::Equal.takes_value());
        assert!(FilterOp::Contains.takes_value());
    }

    #[test]
    fn like_patterns_wrap_the_value() {
        assert_eq!(FilterOp::Contains.like_pattern("ca"), "%ca%");
        assert_eq!(FilterOp::NotContains.like_pattern("ca"), "%ca%");
        assert_eq!(FilterOp::StartsWith.like_pattern("ca"), "ca%");
        assert_eq!(FilterOp::EndsWith.like_pattern("ca"), "%ca");
    }

    #[test]
    #[should_panic(expected = "not a LIKE operator")]
    fn like_pattern_rejects_plain_comparisons() {
        let _ = FilterOp::Equal.like_pattern("x");
    }

    #[test]
    #[should_panic(expected = "no plain SQL symbol")]
    fn sql_symbol_rejects_like_operators() {
        let _ = FilterOp::Contains.sql_symbol();
    }

    #[test]
    fn comparison_symbols() {
        assert_eq!(FilterOp::Equal.sql_symbol(), "=");
        assert_eq!(FilterOp::NotEqual.sql_symbol(), "!=");
        assert_eq!(FilterOp::DifferentFrom.sql_symbol(), "<>");
        assert_eq!(FilterOp::GreaterThanOrEqual.sql_symbol(), ">=");
    }
}
