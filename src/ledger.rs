//! The ledger collaborator contract.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Value stored under existence-only marker keys.
pub const MARKER: &[u8] = &[0x00];

/// One page of a paginated prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Entries in key order.
    pub entries: Vec<(String, Vec<u8>)>,
    /// Cursor for the next page; empty once the scan is exhausted.
    pub bookmark: String,
}

/// An ordered key-value ledger, transactionally consistent with the caller.
///
/// Implementations execute every operation of this crate as a single atomic
/// unit: all reads and writes observe one snapshot and commit or abort
/// together. Conflict detection between racing transactions is the ledger's
/// job; this crate keeps each status update a single read-modify-write
/// within one operation so the collaborator can arbitrate.
pub trait Ledger {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// All entries whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// One page of entries whose key starts with `prefix`, resuming after
    /// the opaque `bookmark` (empty for the first page). Cursor-based, so a
    /// scan stays correct under concurrent inserts.
    fn scan_prefix_page(&self, prefix: &str, page_size: u32, bookmark: &str) -> Result<ScanPage>;

    /// Historical values stored under `key`, oldest first.
    fn history(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    /// The id of the current transaction.
    fn tx_id(&self) -> String;

    /// The timestamp of the current transaction. All date arithmetic reads
    /// this rather than the wall clock, so every peer evaluating the
    /// transaction agrees on "today".
    fn tx_timestamp(&self) -> DateTime<Utc>;

    /// Synchronously invoke another service over the given channel and
    /// return its payload.
    fn invoke_service(&self, service: &str, channel: &str, args: &[&str]) -> Result<Vec<u8>>;
}
