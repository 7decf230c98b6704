//! Vote payloads exchanged with the caller and the tally service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::date::date_format;
use crate::model::election::ElectionType;

/// A cast vote, as returned to the caller after the tally ledger confirmed
/// the record and the voter's status flipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// Public key of the candidate voted for.
    pub candidate: String,
    #[serde(with = "date_format")]
    pub election_date: NaiveDate,
    pub election_type: ElectionType,
    pub tx_id: String,
}

/// Acknowledgement from the tally ledger that a vote was durably recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub voter_id: String,
    pub candidate: String,
    pub election_type: ElectionType,
    #[serde(with = "date_format")]
    pub election_date: NaiveDate,
    pub tx_id: String,
}

/// One page of vote keys from the tally ledger.
///
/// The bookmark is an opaque cursor: pass it back to resume the scan, and
/// treat an empty bookmark as exhaustion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePage {
    pub keys: Vec<String>,
    pub bookmark: String,
}
