//! Catalog statement construction.
//!
//! Statements are assembled from a declarative [`QuerySpec`]. Predicates carry
//! `?` placeholders only; values such as schema and table names are always
//! bound by the caller through the connector, never spliced into the text.
//!
//! The aggregate inspection reports are fixed templates looked up through
//! [`Report`].

use crate::{Result, error::HedgeError};
use serde::Serialize;

/// Catalog view listing tables.
pub const TABLES_RELATION: &str = "information_schema.TABLES";
/// Catalog view listing columns.
pub const COLUMNS_RELATION: &str = "information_schema.COLUMNS";

/// Columns selected by [`tables_query`], in row order.
pub const TABLE_COLUMNS: [&str; 2] = ["TABLE_NAME", "ENGINE"];

/// Columns selected by [`columns_query`], in row order.
pub const COLUMN_ATTRIBUTES: [&str; 15] = [
    "COLUMN_NAME",
    "ORDINAL_POSITION",
    "COLUMN_DEFAULT",
    "IS_NULLABLE",
    "DATA_TYPE",
    "CHARACTER_MAXIMUM_LENGTH",
    "NUMERIC_PRECISION",
    "NUMERIC_SCALE",
    "DATETIME_PRECISION",
    "CHARACTER_SET_NAME",
    "COLLATION_NAME",
    "COLUMN_TYPE",
    "COLUMN_KEY",
    "EXTRA",
    "COLUMN_COMMENT",
];

/// Declarative description of a single-relation SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub columns: Vec<String>,
    pub relation: String,
    pub predicate: String,
    pub order_by: Option<String>,
}

impl QuerySpec {
    /// Creates a spec without ordering.
    pub fn new<I, S>(columns: I, relation: impl Into<String>, predicate: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            relation: relation.into(),
            predicate: predicate.into(),
            order_by: None,
        }
    }

    /// Builder method to set the ORDER BY clause.
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    /// Renders the statement text.
    pub fn to_sql(&self) -> String {
        build_select(
            self.columns.as_slice(),
            &self.relation,
            &self.predicate,
            self.order_by.as_deref(),
        )
    }
}

/// Builds `SELECT <cols> FROM <relation> WHERE <predicate>[ ORDER BY <order_by>]`.
///
/// # Example
/// ```rust
/// use hedgedb_core::query::build_select;
///
/// assert_eq!(build_select(&["A", "B"], "T", "X = ?", None), "SELECT A,B FROM T WHERE X = ?");
/// assert_eq!(
///     build_select(&["A"], "T", "X = ?", Some("A")),
///     "SELECT A FROM T WHERE X = ? ORDER BY A"
/// );
/// ```
pub fn build_select<S: AsRef<str>>(
    columns: &[S],
    relation: &str,
    predicate: &str,
    order_by: Option<&str>,
) -> String {
    let columns = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    let mut sql = format!("SELECT {} FROM {} WHERE {}", columns, relation, predicate);
    if let Some(order_by) = order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
    sql
}

/// Lists the tables of one schema. Binds: schema name.
pub fn tables_query() -> QuerySpec {
    QuerySpec::new(TABLE_COLUMNS, TABLES_RELATION, "TABLE_SCHEMA = ?")
}

/// Lists the columns of one table in ordinal order. Binds: schema name, table name.
pub fn columns_query() -> QuerySpec {
    QuerySpec::new(
        COLUMN_ATTRIBUTES,
        COLUMNS_RELATION,
        "TABLE_SCHEMA = ? AND TABLE_NAME = ?",
    )
    .order_by("ORDINAL_POSITION")
}

/// Aggregate inspection reports over one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    /// Table count per storage engine
    Engines,
    /// Column count per character set
    Charsets,
    /// Table count per collation
    Collations,
    /// Data and index bytes per table, with a schema total
    Sizes,
}

const ENGINES_SQL: &str = "SELECT ENGINE, COUNT(*) FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = ? GROUP BY ENGINE ORDER BY ENGINE";

const CHARSETS_SQL: &str = "SELECT CHARACTER_SET_NAME, COUNT(*) FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND CHARACTER_SET_NAME IS NOT NULL \
     GROUP BY CHARACTER_SET_NAME ORDER BY CHARACTER_SET_NAME";

const COLLATIONS_SQL: &str = "SELECT TABLE_COLLATION, COUNT(*) FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_COLLATION IS NOT NULL \
     GROUP BY TABLE_COLLATION ORDER BY TABLE_COLLATION";

const SIZES_SQL: &str = "SELECT COALESCE(TABLE_NAME, 'TOTAL'), \
     CAST(SUM(DATA_LENGTH) AS UNSIGNED), CAST(SUM(INDEX_LENGTH) AS UNSIGNED), \
     CAST(SUM(DATA_LENGTH + INDEX_LENGTH) AS UNSIGNED) \
     FROM information_schema.TABLES WHERE TABLE_SCHEMA = ? \
     GROUP BY TABLE_NAME WITH ROLLUP";

impl Report {
    /// Every report, in display order.
    pub const ALL: [Self; 4] = [Self::Engines, Self::Charsets, Self::Collations, Self::Sizes];

    pub fn name(self) -> &'static str {
        match self {
            Self::Engines => "engines",
            Self::Charsets => "charsets",
            Self::Collations => "collations",
            Self::Sizes => "sizes",
        }
    }

    /// Statement template. Binds: schema name.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Engines => ENGINES_SQL,
            Self::Charsets => CHARSETS_SQL,
            Self::Collations => COLLATIONS_SQL,
            Self::Sizes => SIZES_SQL,
        }
    }

    /// Column headings for the report rows.
    pub fn headings(self) -> &'static [&'static str] {
        match self {
            Self::Engines => &["engine", "tables"],
            Self::Charsets => &["charset", "columns"],
            Self::Collations => &["collation", "tables"],
            Self::Sizes => &["table", "data_bytes", "index_bytes", "total_bytes"],
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Report {
    type Err = HedgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|report| report.name() == s)
            .ok_or_else(|| HedgeError::UnknownReport {
                name: s.to_string(),
            })
    }
}
