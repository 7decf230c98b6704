//! Voter registration payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::date::date_format;
use crate::model::election::ElectionType;

/// Payload returned from a successful voter registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVoter {
    pub natural_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_format")]
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub is_eligible: bool,
    pub is_candidate: bool,
    pub election_type: ElectionType,
    pub election_period: String,
    /// Flattened rendering of the stored participation state.
    pub status: String,
}
