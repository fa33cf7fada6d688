//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The loader and tools call store methods and never execute SQL directly.

mod records;

pub use records::Record;

use crate::{error::SimResult, table::Table, types::{Day, DATE_FORMAT}};
use rusqlite::{params, params_from_iter, Connection};

pub struct SimStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Day>,
    pub end:   Option<Day>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: Day, end: Day) -> Self {
        Self {
            start: Some(start),
            end:   Some(end),
        }
    }

    pub fn from(start: Day) -> Self {
        Self {
            start: Some(start),
            end:   None,
        }
    }

    pub fn until(end: Day) -> Self {
        Self {
            start: None,
            end:   Some(end),
        }
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start.map_or(true, |s| day >= s) && self.end.map_or(true, |e| day <= e)
    }
}

/// The persistence collaborator: batched inserts and a destructive clear.
pub trait RowStore {
    /// Insert one batch. Returns the number of rows written.
    fn insert_rows<R: Record>(&self, rows: &[R]) -> SimResult<usize>;

    /// Delete every row from every table, children first.
    fn clear_all(&self) -> SimResult<()>;
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_marketing.sql"))?;
        Ok(())
    }

    // ── Query ──────────────────────────────────────────────────

    /// Rows of `R`'s table whose date column falls inside `range`,
    /// in primary-key order.
    pub fn query<R: Record>(&self, range: DateRange) -> SimResult<Vec<R>> {
        let table = R::TABLE;
        let date_col = table.date_column();
        let sql = format!(
            "SELECT {} FROM {table}
             WHERE (?1 IS NULL OR {date_col} >= ?1)
               AND (?2 IS NULL OR {date_col} <= ?2)
             ORDER BY {}",
            R::COLUMNS.join(", "),
            R::ORDER_BY,
        );
        let bound = |d: Option<Day>| d.map(|d| d.format(DATE_FORMAT).to_string());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![bound(range.start), bound(range.end)], |row| R::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every row of `R`'s table.
    pub fn all<R: Record>(&self) -> SimResult<Vec<R>> {
        self.query(DateRange::all())
    }

    pub fn count(&self, table: Table) -> SimResult<i64> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n)
    }
}

impl RowStore for SimStore {
    fn insert_rows<R: Record>(&self, rows: &[R]) -> SimResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let placeholders = (1..=R::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            R::TABLE,
            R::COLUMNS.join(", "),
        );

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row.values()))?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    fn clear_all(&self) -> SimResult<()> {
        for table in Table::CLEAR_ORDER {
            let removed = self.conn.execute(&format!("DELETE FROM {table}"), [])?;
            log::info!("store: cleared {removed} rows from {table}");
        }
        Ok(())
    }
}
