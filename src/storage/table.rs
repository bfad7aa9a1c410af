//! Typed descriptors for the managed tables.
//!
//! Every table and column name that ends up in generated SQL comes from here,
//! so caller input can only ever select among these identifiers.

use std::fmt;

use crate::types::{Association, Keyword, KeywordStatus, Link, Record};

use super::{
    error::{StorageError, StorageResult},
    value::{Value, ValueKind},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Links,
    Keywords,
    LinksKeywords,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    LinkId,
    LinkUrl,
    LinkLabel,
    KeywordId,
    KeywordText,
    KeywordStatus,
}

const LINKS_COLUMNS: &[Column] = &[Column::LinkId, Column::LinkUrl, Column::LinkLabel];
const KEYWORDS_COLUMNS: &[Column] = &[
    Column::KeywordId,
    Column::KeywordText,
    Column::KeywordStatus,
];
const LINKS_KEYWORDS_COLUMNS: &[Column] = &[Column::LinkId, Column::KeywordId];

impl Table {
    pub const ALL: [Table; 3] = [Table::Links, Table::Keywords, Table::LinksKeywords];

    /// Junction first, so nothing is dropped while still referenced.
    pub const DROP_ORDER: [Table; 3] = [Table::LinksKeywords, Table::Links, Table::Keywords];

    pub fn name(self) -> &'static str {
        match self {
            Table::Links => "letmehelp_links",
            Table::Keywords => "letmehelp_keywords",
            Table::LinksKeywords => "letmehelp_links_keywords",
        }
    }

    pub fn version(self) -> &'static str {
        match self {
            Table::Links => "1.0",
            Table::Keywords => "1.0",
            Table::LinksKeywords => "1.0",
        }
    }

    /// Key of this table's entry in the settings store.
    pub fn version_key(self) -> String {
        format!("{}_table_version", self.name())
    }

    /// Every column, in the order rows are selected and decoded.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Links => LINKS_COLUMNS,
            Table::Keywords => KEYWORDS_COLUMNS,
            Table::LinksKeywords => LINKS_KEYWORDS_COLUMNS,
        }
    }

    pub fn primary_key(self) -> &'static [Column] {
        match self {
            Table::Links => &[Column::LinkId],
            Table::Keywords => &[Column::KeywordId],
            Table::LinksKeywords => LINKS_KEYWORDS_COLUMNS,
        }
    }

    /// Columns an insert writes; anything else supplied by a caller is ignored.
    pub fn insertable(self) -> &'static [Column] {
        match self {
            Table::Links => &[Column::LinkUrl, Column::LinkLabel],
            Table::Keywords => &[Column::KeywordText],
            Table::LinksKeywords => LINKS_KEYWORDS_COLUMNS,
        }
    }

    /// Columns an update replaces. Empty for tables that are never updated in place.
    pub fn mutable(self) -> &'static [Column] {
        match self {
            Table::Links => &[Column::LinkUrl, Column::LinkLabel],
            Table::Keywords => &[Column::KeywordText],
            Table::LinksKeywords => &[],
        }
    }

    pub fn owns(self, column: Column) -> bool {
        self.columns().contains(&column)
    }

    pub fn ensure_owns(self, column: Column) -> StorageResult<()> {
        if self.owns(column) {
            Ok(())
        } else {
            Err(StorageError::UnexpectedColumn {
                table: self.name(),
                column: column.name(),
            })
        }
    }

    pub fn select_list(self) -> String {
        self.columns()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn create_sql(self) -> String {
        match self {
            Table::Links => format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    link_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    link_url TEXT NOT NULL CHECK (length(link_url) > 0),
                    link_label TEXT NOT NULL CHECK (length(link_label) > 0)
                )
                "#,
                self.name()
            ),
            Table::Keywords => format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    keyword_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    keyword_text TEXT NOT NULL CHECK (length(keyword_text) > 0),
                    keyword_status TEXT NOT NULL DEFAULT 'active'
                )
                "#,
                self.name()
            ),
            Table::LinksKeywords => format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    link_id INTEGER NOT NULL REFERENCES {}(link_id),
                    keyword_id INTEGER NOT NULL REFERENCES {}(keyword_id),
                    PRIMARY KEY (link_id, keyword_id)
                )
                "#,
                self.name(),
                Table::Links.name(),
                Table::Keywords.name()
            ),
        }
    }

    /// Decode a positional row selected with [`Table::select_list`].
    pub fn decode(self, values: Vec<Value>) -> StorageResult<Record> {
        let expected = self.columns().len();
        if values.len() != expected {
            return Err(self.decode_error(format!(
                "expected {expected} columns, got {}",
                values.len()
            )));
        }

        let mut it = values.into_iter();
        match self {
            Table::LinksKeywords => Ok(Record::Association(Association {
                link_id: self.take_integer(&mut it, Column::LinkId)?,
                keyword_id: self.take_integer(&mut it, Column::KeywordId)?,
            })),
            Table::Links => Ok(Record::Link(Link {
                id: self.take_integer(&mut it, Column::LinkId)?,
                url: self.take_text(&mut it, Column::LinkUrl)?,
                label: self.take_text(&mut it, Column::LinkLabel)?,
            })),
            Table::Keywords => {
                let id = self.take_integer(&mut it, Column::KeywordId)?;
                let text = self.take_text(&mut it, Column::KeywordText)?;
                let status = self
                    .take_text(&mut it, Column::KeywordStatus)?
                    .parse::<KeywordStatus>()
                    .map_err(|err| self.decode_error(err.to_string()))?;
                Ok(Record::Keyword(Keyword { id, text, status }))
            }
        }
    }

    fn take_integer(
        self,
        it: &mut impl Iterator<Item = Value>,
        column: Column,
    ) -> StorageResult<i64> {
        match it.next() {
            Some(Value::Integer(v)) => Ok(v),
            _ => Err(self.decode_error(format!("{} is not an integer", column.name()))),
        }
    }

    fn take_text(
        self,
        it: &mut impl Iterator<Item = Value>,
        column: Column,
    ) -> StorageResult<String> {
        match it.next() {
            Some(Value::Text(v)) => Ok(v),
            _ => Err(self.decode_error(format!("{} is not text", column.name()))),
        }
    }

    fn decode_error(self, reason: String) -> StorageError {
        StorageError::Decode {
            table: self.name(),
            reason,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::LinkId => "link_id",
            Column::LinkUrl => "link_url",
            Column::LinkLabel => "link_label",
            Column::KeywordId => "keyword_id",
            Column::KeywordText => "keyword_text",
            Column::KeywordStatus => "keyword_status",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Column::LinkId | Column::KeywordId => ValueKind::Integer,
            Column::LinkUrl | Column::LinkLabel | Column::KeywordText | Column::KeywordStatus => {
                ValueKind::Text
            }
        }
    }

    /// Coerce `value` to this column's type before binding.
    pub fn bind(self, value: &Value) -> StorageResult<Value> {
        value.coerce(self.kind()).ok_or_else(|| StorageError::Bind {
            column: self.name(),
            expected: self.kind(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
