//! Candidacy payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::date::date_format;
use crate::model::election::ElectionType;

/// Payload returned from a successful candidate registration, enriched with
/// the election's period as parsed from its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    pub natural_id: String,
    pub public_key: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_format")]
    pub date_of_birth: NaiveDate,
    pub election_type: ElectionType,
    pub election_period: String,
    pub tx_id: String,
}
