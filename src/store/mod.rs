pub mod sqlite;

use std::fmt;
use std::str::FromStr;

use crate::app::{BrookError, Result};

pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// A member of a ranked collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMember {
    pub score: i64,
    pub member: String,
    pub payload: String,
}

/// Chronological id assigned by an append log: `<millis>-<seq>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId {
    pub ms: i64,
    pub seq: i64,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

impl FromStr for EntryId {
    type Err = BrookError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BrookError::InvalidCursor(s.to_string());
        let (ms, seq) = match s.split_once('-') {
            Some((ms, seq)) => (ms, seq),
            None => (s, "0"),
        };
        Ok(Self {
            ms: id_part(ms).ok_or_else(invalid)?,
            seq: id_part(seq).ok_or_else(invalid)?,
        })
    }
}

/// Digits only: no sign, no whitespace.
fn id_part(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub payload: String,
}

/// Connection-level operations shared by all primitives.
pub trait Substrate {
    fn ping(&self) -> Result<()>;
}

/// Ranked collection: members ordered by an integer score.
pub trait RankedSet: Substrate {
    /// Take the next score from the counter under `key` and insert the
    /// member (the score in decimal) in the same atomic step. Returns the score.
    fn insert_next(&self, key: &str, payload: &str) -> Result<i64>;
    /// Members with `lower < score < upper`, in `order`, at most `limit`.
    fn range_ranked(
        &self,
        key: &str,
        lower: Option<i64>,
        upper: Option<i64>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<RankedMember>>;
    fn count_ranked(&self, key: &str) -> Result<usize>;
    fn has_ranked(&self, key: &str, member: &str) -> Result<bool>;
}

/// Append-only log with backend-assigned chronological ids.
pub trait AppendLog: Substrate {
    fn append(&self, key: &str, payload: &str) -> Result<EntryId>;
    /// Entries with `lower < id < upper`, in `order`, at most `limit`.
    fn range_log(
        &self,
        key: &str,
        lower: Option<EntryId>,
        upper: Option<EntryId>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<LogEntry>>;
    fn count_log(&self, key: &str) -> Result<usize>;
    fn has_entry(&self, key: &str, id: EntryId) -> Result<bool>;
}

/// Unordered string sets, used for read state.
pub trait FlagSet: Substrate {
    fn set_flags(&self, key: &str, members: &[String]) -> Result<()>;
    /// The subset of `members` present in the set.
    fn flagged(&self, key: &str, members: &[String]) -> Result<Vec<String>>;
}
