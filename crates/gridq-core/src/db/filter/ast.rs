use crate::{db::filter::op::FilterOp, value::Value};

///
/// FilterNode
///
/// Pure parse result of a grid filter expression.
///
/// No schema resolution, parameter binding, or SQL shape lives here; those
/// happen in the render pass. Keeping the tree free of them lets the
/// recursive parse logic be tested on its own.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    /// One `[field, operator, value]` leaf.
    Condition {
        field: String,
        op: FilterOp,
        value: Value,
    },

    /// A sub-expression whose children share one joiner.
    Group {
        joiner: Joiner,
        children: Vec<FilterNode>,
    },
}

///
/// Joiner
///
/// Logical connective for one level of the expression array. A level
/// without an explicit `"and"` / `"or"` token joins with AND.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if token.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}
