use crate::value::Value;

///
/// Bindings
///
/// Parameter sink shared across one statement build. Placeholders are
/// numbered from a single monotonically increasing counter, so the same
/// field/operator pair can appear any number of times across the filter
/// tree, the custom parameters and the pagination tail without colliding.
///

#[derive(Debug, Default)]
pub struct Bindings {
    values: Vec<rusqlite::types::Value>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value and return its placeholder (`?1`, `?2`, …).
    pub fn push(&mut self, value: &Value) -> String {
        self.values.push(value.to_sql());
        format!("?{}", self.values.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound values, in placeholder order.
    #[must_use]
    pub fn values(&self) -> &[rusqlite::types::Value] {
        &self.values
    }
}
