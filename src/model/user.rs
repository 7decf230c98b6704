//! User records and identity payloads.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::date::{date_format, datetime_format};
use crate::model::participation::Participation;

/// Gender, restricted to the accepted enumeration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "M" | "m" | "Male" | "male" | "MALE" => Ok(Gender::Male),
            "F" | "f" | "Female" | "female" | "FEMALE" => Ok(Gender::Female),
            "O" | "o" | "Other" | "other" | "OTHER" => Ok(Gender::Other),
            _ => Err(Error::InvalidArgument {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Core user data, stored in the ledger under the public key.
///
/// Created once at registration and mutated only through the participation
/// state machine; never deleted. The private key half of the user's keypair
/// is not part of this record and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable real-world identifier, unique across users.
    pub natural_id: String,
    /// Opaque issued key; doubles as the primary storage key.
    pub public_key: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_format")]
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(with = "datetime_format")]
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub participation: Participation,
}

impl User {
    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| Error::Ledger(format!("encode user record: {err}")))
    }

    /// Decode a stored record.
    pub fn from_bytes(bytes: &[u8]) -> Result<User> {
        serde_json::from_slice(bytes)
            .map_err(|err| Error::Ledger(format!("corrupt user record: {err}")))
    }
}

/// Payload returned once at registration. This is the only place the
/// private key ever appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub natural_id: String,
    pub public_key: String,
    pub private_key: String,
    #[serde(with = "datetime_format")]
    pub registration_date: DateTime<Utc>,
}

/// How `get_user` interprets its argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Resolve through the naturalId index.
    Identity,
    /// Treat the argument as the storage key itself.
    Key,
}

impl FromStr for UserQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(UserQuery::Identity),
            "userkey" => Ok(UserQuery::Key),
            _ => Err(Error::InvalidArgument {
                field: "queryType",
                value: s.to_string(),
            }),
        }
    }
}
