use crate::{MAX_PAGE_SIZE, error::ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

///
/// QueryDescription
///
/// Caller-supplied description of one grid read: pagination, an optional
/// projection, up to two filter-expression trees, a sort spec, and named
/// equality parameters. Field references inside it live in field-name
/// space and resolve through entity metadata at build time.
///
/// The description is transient; the engine never retains it across calls.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryDescription {
    /// 1-based page number.
    pub page_index: u32,
    /// Rows per page, capped at `MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Comma-separated field list; empty means "all columns".
    pub columns: Option<String>,
    /// Primary filter-expression tree (JSON).
    pub filter: Option<String>,
    /// Secondary filter tree (JSON), typically quick-search; ANDed with
    /// the primary one.
    pub custom_filter: Option<String>,
    /// Sort spec (JSON array of `{"Selector", "Desc"}`).
    pub sort: Option<String>,
    /// Named equality constraints, ANDed into the WHERE clause.
    pub custom_param: BTreeMap<String, JsonValue>,
}

impl QueryDescription {
    #[must_use]
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_custom_filter(mut self, filter: impl Into<String>) -> Self {
        self.custom_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, field: impl Into<String>, value: JsonValue) -> Self {
        self.custom_param.insert(field.into(), value);
        self
    }

    /// Page bounds are checked before any statement is prepared.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_index == 0 {
            return Err(ValidationError::PageIndexOutOfRange {
                page_index: self.page_index,
            });
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::PageSizeOutOfRange {
                page_size: self.page_size,
            });
        }

        Ok(())
    }

    /// Row offset of the first row on the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page_index as u64).saturating_sub(1) * self.page_size as u64
    }
}

///
/// Page
///
/// One page of rows plus the unpaginated total, so grids can size their
/// pager from a single round trip.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn page_bounds() {
        assert!(QueryDescription::new(1, 1).validate().is_ok());
        assert!(QueryDescription::new(1, MAX_PAGE_SIZE).validate().is_ok());

        assert_eq!(
            QueryDescription::new(0, 30).validate(),
            Err(ValidationError::PageIndexOutOfRange { page_index: 0 })
        );
        assert_eq!(
            QueryDescription::new(1, 0).validate(),
            Err(ValidationError::PageSizeOutOfRange { page_size: 0 })
        );
        assert_eq!(
            QueryDescription::new(1, MAX_PAGE_SIZE + 1).validate(),
            Err(ValidationError::PageSizeOutOfRange {
                page_size: MAX_PAGE_SIZE + 1
            })
        );
    }

    #[test]
    fn offset_is_zero_based_from_a_one_based_page() {
        assert_eq!(QueryDescription::new(1, 30).offset(), 0);
        assert_eq!(QueryDescription::new(3, 30).offset(), 60);
    }

    #[test]
    fn wire_shape_round_trips() {
        let desc = QueryDescription::new(2, 50)
            .with_filter(r#"[["a","=",1]]"#)
            .with_param("branch_id", serde_json::json!(7));

        let json = serde_json::to_string(&desc).unwrap();
        let back: QueryDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_index, 2);
        assert_eq!(back.custom_param["branch_id"], serde_json::json!(7));
    }
}
