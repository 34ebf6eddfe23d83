//! Schema model built from catalog rows.
//!
//! [`Table`] and [`Column`] are constructed from the rows returned by
//! [`tables_query`](crate::query::tables_query) and
//! [`columns_query`](crate::query::columns_query); the row layouts follow
//! [`TABLE_COLUMNS`](crate::query::TABLE_COLUMNS) and
//! [`COLUMN_ATTRIBUTES`](crate::query::COLUMN_ATTRIBUTES).

use crate::connector::{DriverError, Row};
use crate::{Result, error::HedgeError};
use serde::Serialize;

/// Database table information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    /// Storage engine; absent for views
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Set when the column listing for this table failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_error: Option<ColumnError>,
}

/// Why a table's columns could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnError {
    /// The column query itself was rejected
    #[error("{0}")]
    Query(DriverError),

    /// The catalog returned a column row that could not be read
    #[error("Unexpected catalog row: {context}")]
    Malformed { context: String },
}

impl ColumnError {
    /// Converts a per-table failure into a [`ColumnError`].
    ///
    /// # Errors
    /// Hands back any error that is not scoped to a single table.
    pub fn from_error(error: HedgeError) -> Result<Self> {
        match error {
            HedgeError::QueryFailed { code, message } => {
                Ok(Self::Query(DriverError::new(code, message)))
            }
            HedgeError::MalformedRow { context } => Ok(Self::Malformed { context }),
            other => Err(other),
        }
    }
}

impl Table {
    pub fn new(name: impl Into<String>, engine: Option<String>) -> Self {
        Self {
            name: name.into(),
            engine,
            columns: Vec::new(),
            column_error: None,
        }
    }

    /// Builds a table from a `TABLE_NAME, ENGINE` row.
    ///
    /// # Errors
    /// Returns [`HedgeError::MalformedRow`] if the name is missing.
    pub fn from_row(row: &Row) -> Result<Self> {
        let name = required(row, 0, "TABLE_NAME")?;
        Ok(Self::new(name, row.get(1).map(str::to_string)))
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.engine.as_deref().unwrap_or("-"))
    }
}

/// Database column information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub ordinal_position: u32,
    pub default_value: Option<String>,
    pub is_nullable: bool,
    pub data_type: String,
    pub character_maximum_length: Option<u64>,
    pub numeric_precision: Option<u64>,
    pub numeric_scale: Option<u64>,
    pub datetime_precision: Option<u64>,
    pub character_set: Option<String>,
    pub collation: Option<String>,
    pub column_type: String,
    /// `PRI`, `UNI`, or `MUL`
    pub column_key: Option<String>,
    /// e.g. `auto_increment`
    pub extra: Option<String>,
    pub comment: Option<String>,
}

impl Column {
    /// Builds a column from a row laid out as `COLUMN_ATTRIBUTES`.
    ///
    /// # Errors
    /// Returns [`HedgeError::MalformedRow`] if the name or ordinal position
    /// is missing or a numeric facet does not parse.
    pub fn from_row(row: &Row) -> Result<Self> {
        let name = required(row, 0, "COLUMN_NAME")?.to_string();
        let ordinal_position = required(row, 1, "ORDINAL_POSITION")?
            .parse::<u32>()
            .map_err(|_| malformed("ORDINAL_POSITION", &name))?;
        let data_type = row.get(4).unwrap_or_default().to_string();

        Ok(Self {
            ordinal_position,
            default_value: row.get(2).map(str::to_string),
            is_nullable: row.get(3).is_some_and(|v| v.eq_ignore_ascii_case("YES")),
            character_maximum_length: numeric(row, 5, "CHARACTER_MAXIMUM_LENGTH", &name)?,
            numeric_precision: numeric(row, 6, "NUMERIC_PRECISION", &name)?,
            numeric_scale: numeric(row, 7, "NUMERIC_SCALE", &name)?,
            datetime_precision: numeric(row, 8, "DATETIME_PRECISION", &name)?,
            character_set: row.get(9).map(str::to_string),
            collation: row.get(10).map(str::to_string),
            column_type: row.get(11).map_or_else(|| data_type.clone(), str::to_string),
            column_key: non_empty(row, 12),
            extra: non_empty(row, 13),
            comment: non_empty(row, 14),
            data_type,
            name,
        })
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.ordinal_position,
            self.name,
            self.column_type,
            if self.is_nullable { "NULL" } else { "NOT NULL" }
        )?;
        if let Some(key) = &self.column_key {
            write!(f, " {}", key)?;
        }
        if let Some(extra) = &self.extra {
            write!(f, " {}", extra)?;
        }
        Ok(())
    }
}

fn required<'r>(row: &'r Row, index: usize, field: &str) -> Result<&'r str> {
    row.get(index).ok_or_else(|| HedgeError::MalformedRow {
        context: format!("missing {}", field),
    })
}

fn malformed(field: &str, column: &str) -> HedgeError {
    HedgeError::MalformedRow {
        context: format!("invalid {} for column '{}'", field, column),
    }
}

fn numeric(row: &Row, index: usize, field: &str, column: &str) -> Result<Option<u64>> {
    row.get(index)
        .map(|v| v.parse::<u64>().map_err(|_| malformed(field, column)))
        .transpose()
}

// MySQL reports "no key" / "no comment" as empty strings.
fn non_empty(row: &Row, index: usize) -> Option<String> {
    row.get(index)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_row() -> Row {
        Row::new(vec![
            Some("id".to_string()),
            Some("1".to_string()),
            None,
            Some("NO".to_string()),
            Some("int".to_string()),
            None,
            Some("10".to_string()),
            Some("0".to_string()),
            None,
            None,
            None,
            Some("int unsigned".to_string()),
            Some("PRI".to_string()),
            Some("auto_increment".to_string()),
            Some(String::new()),
        ])
    }

    #[test]
    fn test_table_from_row() {
        let table = Table::from_row(&Row::from_texts(["users", "InnoDB"])).unwrap();
        assert_eq!(table.name, "users");
        assert_eq!(table.engine.as_deref(), Some("InnoDB"));
        assert!(table.columns.is_empty());
        assert_eq!(table.to_string(), "users InnoDB");
    }

    #[test]
    fn test_view_has_no_engine() {
        let table = Table::from_row(&Row::new(vec![Some("v_active".to_string()), None])).unwrap();
        assert_eq!(table.engine, None);
        assert_eq!(table.to_string(), "v_active -");
    }

    #[test]
    fn test_table_without_name_is_rejected() {
        let err = Table::from_row(&Row::new(vec![None, Some("InnoDB".to_string())])).unwrap_err();
        assert!(matches!(err, HedgeError::MalformedRow { .. }));
    }

    #[test]
    fn test_column_from_row() {
        let column = Column::from_row(&id_row()).unwrap();
        assert_eq!(column.name, "id");
        assert_eq!(column.ordinal_position, 1);
        assert!(!column.is_nullable);
        assert_eq!(column.data_type, "int");
        assert_eq!(column.numeric_precision, Some(10));
        assert_eq!(column.numeric_scale, Some(0));
        assert_eq!(column.character_maximum_length, None);
        assert_eq!(column.column_key.as_deref(), Some("PRI"));
        assert_eq!(column.comment, None);
        assert_eq!(
            column.to_string(),
            "1 id int unsigned NOT NULL PRI auto_increment"
        );
    }

    #[test]
    fn test_column_with_bad_ordinal_is_rejected() {
        let row = Row::from_texts(["id", "first"]);
        let err = Column::from_row(&row).unwrap_err();
        assert!(err.to_string().contains("ORDINAL_POSITION"));
    }

    #[test]
    fn test_table_serialization_skips_empty_detail() {
        let table = Table::new("logs", Some("InnoDB".to_string()));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({"name": "logs", "engine": "InnoDB"}));
    }

    #[test]
    fn test_column_error_keeps_table_scoped_failures() {
        let query = ColumnError::from_error(HedgeError::QueryFailed {
            code: 1142,
            message: "denied".to_string(),
        })
        .unwrap();
        assert_eq!(query.to_string(), "1142 denied");

        let malformed = ColumnError::from_error(HedgeError::MalformedRow {
            context: "missing ORDINAL_POSITION".to_string(),
        })
        .unwrap();
        assert_eq!(
            malformed.to_string(),
            "Unexpected catalog row: missing ORDINAL_POSITION"
        );
        assert_eq!(
            serde_json::to_value(&malformed).unwrap(),
            serde_json::json!({"kind": "malformed", "context": "missing ORDINAL_POSITION"})
        );

        let other = ColumnError::from_error(HedgeError::SessionUnavailable).unwrap_err();
        assert!(matches!(other, HedgeError::SessionUnavailable));
    }
}
