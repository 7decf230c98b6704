//! Elections and their composite-key representation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keys::{self, KeyTag};
use crate::model::date::{self, date_format};

/// The election types; each may have at most one active election.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionType {
    Primary,
    General,
    Local,
}

impl ElectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElectionType::Primary => "primary",
            ElectionType::General => "general",
            ElectionType::Local => "local",
        }
    }
}

impl FromStr for ElectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "primary" => Ok(ElectionType::Primary),
            "general" => Ok(ElectionType::General),
            "local" => Ok(ElectionType::Local),
            _ => Err(Error::InvalidArgument {
                field: "electionType",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ElectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An election, as recovered from its composite key.
///
/// The key is the whole record: no separate value payload exists, and an
/// election is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    pub election_type: ElectionType,
    pub election_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Election {
    /// Parse an election out of its composite key.
    pub fn from_key(key: &str) -> Result<Election> {
        let (tag, segments) = keys::split_key(key)?;
        if tag != KeyTag::Election {
            return Err(Error::MalformedKey(key.to_string()));
        }
        Ok(Election {
            election_type: segments[0].parse()?,
            start_date: date::parse_date("startDate", &segments[1])?,
            end_date: date::parse_date("endDate", &segments[2])?,
            election_id: segments[3].clone(),
        })
    }

    /// The composite key this election is stored under.
    pub fn key(&self) -> String {
        keys::make_key(
            KeyTag::Election,
            &[
                self.election_type.as_str(),
                &date::format_date(self.start_date),
                &date::format_date(self.end_date),
                &self.election_id,
            ],
        )
        .expect("election keys always carry four segments")
    }

    /// The period as shown in payloads.
    pub fn period(&self) -> String {
        format!(
            "{} - {}",
            date::format_date(self.start_date),
            date::format_date(self.end_date)
        )
    }
}

/// Payload returned from a successful election registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElection {
    pub election_type: ElectionType,
    pub election_id: String,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    pub tx_id: String,
}
