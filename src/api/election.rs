//! Election scheduling.

use log::info;

use crate::error::{Error, Result};
use crate::keys::{self, KeyTag};
use crate::ledger::{Ledger, MARKER};
use crate::model::date;
use crate::model::election::{Election, ElectionType, NewElection};
use crate::model::eligibility;

/// Register a new election.
///
/// At most one election per type may exist at any time, enforced by a
/// prefix lookup before creation. The composite key is the whole record.
pub fn register_election(
    ledger: &impl Ledger,
    election_type: &str,
    election_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<NewElection> {
    let election_type: ElectionType = election_type.parse()?;
    let start = date::parse_date("startDate", start_date)?;
    let end = date::parse_date("endDate", end_date)?;

    if !eligibility::valid_election_period(start, end) {
        return Err(Error::InvalidPeriod {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }
    if find_election(ledger, election_type)?.is_some() {
        return Err(Error::ElectionExists(election_type.to_string()));
    }

    let election = Election {
        election_type,
        election_id: election_id.to_string(),
        start_date: start,
        end_date: end,
    };
    ledger.put(&election.key(), MARKER)?;

    info!("registered the {election_type} election {election_id} ({})", election.period());

    Ok(NewElection {
        election_type,
        election_id: election.election_id,
        start_date: start,
        end_date: end,
        tx_id: ledger.tx_id(),
    })
}

/// The active election of the given type, if one exists.
pub fn find_election(ledger: &impl Ledger, election_type: ElectionType) -> Result<Option<Election>> {
    let prefix = keys::prefix(KeyTag::Election, &[election_type.as_str()]);
    let mut found = None;
    for (key, _) in ledger.scan_prefix(&prefix)? {
        found = Some(key);
    }
    found.map(|key| Election::from_key(&key)).transpose()
}

/// The active election of the given type, or `ELECTION_NOT_FOUND`.
pub(crate) fn require_election(
    ledger: &impl Ledger,
    election_type: ElectionType,
) -> Result<Election> {
    find_election(ledger, election_type)?
        .ok_or_else(|| Error::ElectionNotFound(election_type.to_string()))
}
