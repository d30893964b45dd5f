//! Query results rendered for a language model.

use sqlx::{Column, Row, any::AnyRow};
use std::fmt;

/// One value of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// SQL NULL.
    Null,
    /// Boolean column.
    Bool(bool),
    /// Integer column.
    Integer(i64),
    /// Floating point column.
    Real(f64),
    /// Text column.
    Text(String),
    /// Binary column.
    Blob(Vec<u8>),
}

impl Cell {
    /// Decode column `index`, trying the narrowest types first.
    pub(crate) fn decode(row: &AnyRow, index: usize) -> Self {
        if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
            return value.map_or(Cell::Null, Cell::Integer);
        }
        if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
            return value.map_or(Cell::Null, Cell::Real);
        }
        if let Ok(value) = row.try_get::<Option<String>, _>(index) {
            return value.map_or(Cell::Null, Cell::Text);
        }
        if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
            return value.map_or(Cell::Null, Cell::Bool);
        }
        if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
            return value.map_or(Cell::Null, Cell::Blob);
        }
        Cell::Null
    }

    /// The value without quoting, as shown in sample rows.
    pub fn plain(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            other => other.to_string(),
        }
    }

    fn truncate(&mut self, max: usize) {
        if let Cell::Text(text) = self {
            *text = truncate_word(text, max);
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("None"),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
            Cell::Integer(value) => write!(f, "{value}"),
            Cell::Real(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{value:.1}")
            }
            Cell::Real(value) => write!(f, "{value}"),
            Cell::Text(text) => write!(f, "'{}'", text.replace('\'', "\\'")),
            Cell::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Rows returned by a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Row values, one vector per row.
    pub rows: Vec<Vec<Cell>>,
}

impl Rows {
    pub(crate) fn from_any(rows: &[AnyRow]) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_owned()).collect())
            .unwrap_or_default();
        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| Cell::decode(row, i)).collect())
            .collect();
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the statement returned nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shorten every text value to at most `max` characters.
    pub fn truncate(mut self, max: usize) -> Self {
        for cell in self.rows.iter_mut().flatten() {
            cell.truncate(max);
        }
        self
    }
}

/// Renders as a list of tuples, `[(1, 'a'), (2, 'b')]`; empty results
/// render as an empty string.
impl fmt::Display for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return Ok(());
        }

        f.write_str("[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("(")?;
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{cell}")?;
            }
            if row.len() == 1 {
                f.write_str(",")?;
            }
            f.write_str(")")?;
        }
        f.write_str("]")
    }
}

/// Cut `text` to `max` characters on a word boundary, marking the cut
/// with `...`.
pub fn truncate_word(text: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if max <= SUFFIX.len() || text.chars().count() <= max {
        return text.to_owned();
    }

    let head: String = text.chars().take(max - SUFFIX.len()).collect();
    let head = match head.rsplit_once(' ') {
        Some((words, _)) => words.to_owned(),
        None => head,
    };
    head + SUFFIX
}
