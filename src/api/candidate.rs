//! Candidate registration.

use log::info;

use crate::api::{election, identity};
use crate::error::{Error, Result};
use crate::keys::{self, KeyTag};
use crate::ledger::{Ledger, MARKER};
use crate::model::candidate::NewCandidate;
use crate::model::election::ElectionType;

/// Register a user as a candidate in the active election of a type.
///
/// The supplied public key must match the one stored for the natural id,
/// which keeps one user from filing a candidacy under another's identity.
pub fn register_candidate(
    ledger: &impl Ledger,
    election_type: &str,
    natural_id: &str,
    public_key: &str,
) -> Result<NewCandidate> {
    let election_type: ElectionType = election_type.parse()?;
    let election = election::require_election(ledger, election_type)?;

    let candidacy_key = keys::make_key(KeyTag::Candidacy, &[election_type.as_str(), natural_id])?;
    if ledger.get(&candidacy_key)?.is_some() {
        return Err(Error::DuplicateCandidacy {
            election_type: election_type.to_string(),
            natural_id: natural_id.to_string(),
        });
    }

    let user = identity::user_by_natural_id(ledger, natural_id)?;
    if user.public_key != public_key {
        return Err(Error::KeyMismatch {
            natural_id: natural_id.to_string(),
            supplied: public_key.to_string(),
        });
    }

    ledger.put(&candidacy_key, MARKER)?;

    info!("registered candidate {natural_id} for the {election_type} election");

    Ok(NewCandidate {
        natural_id: natural_id.to_string(),
        public_key: public_key.to_string(),
        first_name: user.first_name,
        last_name: user.last_name,
        date_of_birth: user.date_of_birth,
        election_type,
        election_period: election.period(),
        tx_id: ledger.tx_id(),
    })
}

/// Whether a candidacy marker exists for the pair.
pub(crate) fn is_candidate(
    ledger: &impl Ledger,
    election_type: ElectionType,
    natural_id: &str,
) -> Result<bool> {
    let key = keys::make_key(KeyTag::Candidacy, &[election_type.as_str(), natural_id])?;
    Ok(ledger.get(&key)?.is_some())
}
