use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rusqlite_migration::{Migrations, M};

use crate::app::{BrookError, Result};
use crate::store::{
    AppendLog, EntryId, FlagSet, LogEntry, Order, RankedMember, RankedSet, Substrate,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage substrate.
///
/// Several stores (or processes) may open the same database file; id and
/// score allocation run in `IMMEDIATE` transactions so they never collide.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| BrookError::Migration(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| BrookError::Other(format!("store lock poisoned: {}", e)))
    }
}

fn direction(order: Order) -> &'static str {
    match order {
        Order::Ascending => "ASC",
        Order::Descending => "DESC",
    }
}

impl Substrate for SqliteStore {
    fn ping(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

impl RankedSet for SqliteStore {
    fn insert_next(&self, key: &str, payload: &str) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO counters (key, value) VALUES (?1, 1)
             ON CONFLICT(key) DO UPDATE SET value = value + 1",
            params![key],
        )?;
        let score: i64 = tx.query_row(
            "SELECT value FROM counters WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO ranked_members (key, score, member, payload) VALUES (?1, ?2, ?3, ?4)",
            params![key, score, score.to_string(), payload],
        )?;

        tx.commit()?;
        Ok(score)
    }

    fn range_ranked(
        &self,
        key: &str,
        lower: Option<i64>,
        upper: Option<i64>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<RankedMember>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT score, member, payload FROM ranked_members
             WHERE key = ?1 AND score > ?2 AND score < ?3
             ORDER BY score {} LIMIT ?4",
            direction(order)
        );

        let mut stmt = conn.prepare(&sql)?;
        let members = stmt
            .query_map(
                params![
                    key,
                    lower.unwrap_or(i64::MIN),
                    upper.unwrap_or(i64::MAX),
                    limit as i64
                ],
                |row| {
                    Ok(RankedMember {
                        score: row.get(0)?,
                        member: row.get(1)?,
                        payload: row.get(2)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(members)
    }

    fn count_ranked(&self, key: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM ranked_members WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn has_ranked(&self, key: &str, member: &str) -> Result<bool> {
        let conn = self.lock()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM ranked_members WHERE key = ?1 AND member = ?2)",
            params![key, member],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl AppendLog for SqliteStore {
    fn append(&self, key: &str, payload: &str) -> Result<EntryId> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let now = Utc::now().timestamp_millis();
        let last: Option<(i64, i64)> = tx
            .query_row(
                "SELECT ms, seq FROM log_entries WHERE key = ?1
                 ORDER BY ms DESC, seq DESC LIMIT 1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        // The clock may stand still or step back; ids must still grow.
        let id = match last {
            Some((ms, seq)) if ms >= now => EntryId { ms, seq: seq + 1 },
            _ => EntryId { ms: now, seq: 0 },
        };

        tx.execute(
            "INSERT INTO log_entries (key, ms, seq, payload) VALUES (?1, ?2, ?3, ?4)",
            params![key, id.ms, id.seq, payload],
        )?;
        tx.commit()?;

        Ok(id)
    }

    fn range_log(
        &self,
        key: &str,
        lower: Option<EntryId>,
        upper: Option<EntryId>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<LogEntry>> {
        let lower = lower.unwrap_or(EntryId {
            ms: i64::MIN,
            seq: i64::MIN,
        });
        let upper = upper.unwrap_or(EntryId {
            ms: i64::MAX,
            seq: i64::MAX,
        });

        let conn = self.lock()?;
        let sql = format!(
            "SELECT ms, seq, payload FROM log_entries
             WHERE key = ?1 AND (ms, seq) > (?2, ?3) AND (ms, seq) < (?4, ?5)
             ORDER BY ms {dir}, seq {dir} LIMIT ?6",
            dir = direction(order)
        );

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(
                params![key, lower.ms, lower.seq, upper.ms, upper.seq, limit as i64],
                |row| {
                    Ok(LogEntry {
                        id: EntryId {
                            ms: row.get(0)?,
                            seq: row.get(1)?,
                        },
                        payload: row.get(2)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn count_log(&self, key: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM log_entries WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn has_entry(&self, key: &str, id: EntryId) -> Result<bool> {
        let conn = self.lock()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM log_entries WHERE key = ?1 AND ms = ?2 AND seq = ?3)",
            params![key, id.ms, id.seq],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl FlagSet for SqliteStore {
    fn set_flags(&self, key: &str, members: &[String]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for member in members {
            tx.execute(
                "INSERT OR IGNORE INTO flags (key, member) VALUES (?1, ?2)",
                params![key, member],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn flagged(&self, key: &str, members: &[String]) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT 1 FROM flags WHERE key = ?1 AND member = ?2")?;

        let mut found = Vec::new();
        for member in members {
            if stmt.exists(params![key, member])? {
                found.push(member.clone());
            }
        }
        Ok(found)
    }
}
