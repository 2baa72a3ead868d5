//! Schema (field name → column position) and typed row access.
//!
//! Rows arrive from the source-of-truth store as ordered tuples of raw
//! values; the accompanying [`Schema`] says which position holds which
//! logical field. [`RowView`] pairs the two and exposes typed accessors
//! with explicit presence semantics: optional accessors answer `None`
//! both when the schema does not cover a field and when the cell is
//! null, while `required` variants distinguish those cases and fail
//! with a schema mismatch.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{NormalizeError, Result};

/// Mapping from logical field name to its position within a row tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Schema(HashMap<String, usize>);

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from an ordered list of column names, assigning
    /// positions `0, 1, 2, …` in iteration order.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            columns
                .into_iter()
                .enumerate()
                .map(|(pos, name)| (name.into(), pos))
                .collect(),
        )
    }

    pub fn insert(&mut self, name: impl Into<String>, position: usize) {
        self.0.insert(name.into(), position);
    }

    /// Position of `field` within the row, or `None` when the schema
    /// does not declare it.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Borrowed view over one row plus its schema.
///
/// Never dereferences a position the schema does not declare, so a
/// sparse schema degrades to "field not present" instead of panicking.
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    row: &'a [Value],
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a [Value], schema: &'a Schema) -> Self {
        Self { row, schema }
    }

    /// Raw cell for `field`, or `None` when the schema does not cover it
    /// or its position falls outside this row.
    pub fn cell(&self, field: &str) -> Option<&'a Value> {
        self.row.get(self.schema.position(field)?)
    }

    /// Whether the schema declares `field` at a position this row has,
    /// regardless of whether the cell is null. Used to distinguish "no
    /// such column" from "column present but null".
    pub fn has_column(&self, field: &str) -> bool {
        self.cell(field).is_some()
    }

    /// Raw cell for a required field. Fails with a schema mismatch when
    /// the field is undeclared or its position is out of range.
    pub fn required(&self, field: &str) -> Result<&'a Value> {
        let position = self
            .schema
            .position(field)
            .ok_or_else(|| NormalizeError::missing(field))?;
        self.row
            .get(position)
            .ok_or_else(|| NormalizeError::out_of_range(field, position, self.row.len()))
    }

    /// Required string field; null or non-string cells are fatal.
    pub fn required_str(&self, field: &str) -> Result<&'a str> {
        match self.required(field)? {
            Value::Null => Err(NormalizeError::null(field)),
            Value::String(s) => Ok(s),
            _ => Err(NormalizeError::wrong_type(field, "a string")),
        }
    }

    /// Required integer field; null or non-integer cells are fatal.
    pub fn required_i64(&self, field: &str) -> Result<i64> {
        match self.required(field)? {
            Value::Null => Err(NormalizeError::null(field)),
            value => value
                .as_i64()
                .ok_or_else(|| NormalizeError::wrong_type(field, "an integer")),
        }
    }

    pub fn opt_str(&self, field: &str) -> Option<&'a str> {
        self.cell(field)?.as_str()
    }

    pub fn opt_string(&self, field: &str) -> Option<String> {
        self.opt_str(field).map(str::to_string)
    }

    pub fn opt_i64(&self, field: &str) -> Option<i64> {
        self.cell(field)?.as_i64()
    }

    pub fn opt_f64(&self, field: &str) -> Option<f64> {
        self.cell(field)?.as_f64()
    }

    pub fn opt_bool(&self, field: &str) -> Option<bool> {
        self.cell(field)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> (Vec<Value>, Schema) {
        let row = vec![json!(7), json!("seven"), Value::Null, json!(true)];
        let schema = Schema::from_columns(["id", "title", "creator", "mature"]);
        (row, schema)
    }

    #[test]
    fn from_columns_assigns_positions_in_order() {
        let schema = Schema::from_columns(["a", "b", "c"]);
        assert_eq!(schema.position("a"), Some(0));
        assert_eq!(schema.position("c"), Some(2));
        assert_eq!(schema.position("missing"), None);
    }

    #[test]
    fn optional_accessors_answer_none_for_absent_fields() {
        let (row, schema) = sample();
        let view = RowView::new(&row, &schema);
        assert_eq!(view.opt_str("nonexistent"), None);
        assert_eq!(view.opt_i64("nonexistent"), None);
        assert!(!view.has_column("nonexistent"));
    }

    #[test]
    fn optional_accessors_answer_none_for_null_cells() {
        let (row, schema) = sample();
        let view = RowView::new(&row, &schema);
        assert_eq!(view.opt_str("creator"), None);
        // The column exists even though the cell is null.
        assert!(view.has_column("creator"));
    }

    #[test]
    fn typed_accessors_read_values() {
        let (row, schema) = sample();
        let view = RowView::new(&row, &schema);
        assert_eq!(view.required_i64("id").unwrap(), 7);
        assert_eq!(view.required_str("title").unwrap(), "seven");
        assert_eq!(view.opt_bool("mature"), Some(true));
    }

    #[test]
    fn required_fails_when_field_not_in_schema() {
        let (row, schema) = sample();
        let view = RowView::new(&row, &schema);
        let err = view.required("url").unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::SchemaMismatch { ref field, .. } if field == "url"
        ));
    }

    #[test]
    fn required_fails_when_position_out_of_range() {
        let row = vec![json!(1)];
        let mut schema = Schema::new();
        schema.insert("id", 0);
        schema.insert("url", 9);
        let view = RowView::new(&row, &schema);
        assert!(view.required("url").is_err());
        // The optional path degrades instead of failing.
        assert_eq!(view.cell("url"), None);
    }

    #[test]
    fn required_str_rejects_null_and_non_strings() {
        let row = vec![Value::Null, json!(42)];
        let schema = Schema::from_columns(["license", "url"]);
        let view = RowView::new(&row, &schema);
        assert!(view.required_str("license").is_err());
        assert!(view.required_str("url").is_err());
    }
}
