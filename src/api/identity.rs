//! Identity onboarding and lookup.

use log::info;

use crate::error::{Error, Result};
use crate::keys::{self, KeyTag};
use crate::ledger::{Ledger, MARKER};
use crate::model::date;
use crate::model::participation::Participation;
use crate::model::user::{Gender, NewUser, User, UserQuery};

/// Register a new identity.
///
/// Issues a keypair, stores the user record under the public key, and
/// writes the naturalId index marker. The private key appears only in the
/// returned payload and is never persisted.
pub fn register_user(
    ledger: &impl Ledger,
    natural_id: &str,
    first_name: &str,
    last_name: &str,
    date_of_birth: &str,
    gender: &str,
) -> Result<NewUser> {
    if find_by_natural_id(ledger, natural_id)?.is_some() {
        return Err(Error::DuplicateIdentity(natural_id.to_string()));
    }
    let gender: Gender = gender.parse()?;
    let date_of_birth = date::parse_date("dateOfBirth", date_of_birth)?;
    let registration_date = ledger.tx_timestamp();

    let keypair = keyservice::generate().map_err(|err| Error::Delegate {
        service: "keyservice".to_string(),
        detail: err.to_string(),
    })?;

    let user = User {
        natural_id: natural_id.to_string(),
        public_key: keypair.public_key.clone(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth,
        gender,
        registration_date,
        participation: Participation::None,
    };
    ledger.put(&user.public_key, &user.to_bytes()?)?;

    let index_key = keys::make_key(KeyTag::NaturalIdIndex, &[natural_id, &keypair.public_key])?;
    ledger.put(&index_key, MARKER)?;

    info!("registered identity {natural_id}");

    Ok(NewUser {
        natural_id: natural_id.to_string(),
        public_key: keypair.public_key,
        private_key: keypair.private_key,
        registration_date,
    })
}

/// Resolve a natural id to the public key it is indexed under.
///
/// Scans the index prefix; should duplicates ever exist, the last entry
/// iterated wins so the resolution stays deterministic.
pub fn find_by_natural_id(ledger: &impl Ledger, natural_id: &str) -> Result<Option<String>> {
    let prefix = keys::prefix(KeyTag::NaturalIdIndex, &[natural_id]);
    let mut found = None;
    for (key, _) in ledger.scan_prefix(&prefix)? {
        let (_, segments) = keys::split_key(&key)?;
        found = Some(segments[1].clone());
    }
    Ok(found)
}

/// Look a user up by natural id or directly by public key.
pub fn get_user(ledger: &impl Ledger, query: &str, value: &str) -> Result<User> {
    let query: UserQuery = query.parse()?;
    let public_key = match query {
        UserQuery::Identity => find_by_natural_id(ledger, value)?
            .ok_or_else(|| Error::IdentityNotFound(value.to_string()))?,
        UserQuery::Key => value.to_string(),
    };
    load_user(ledger, &public_key, value)
}

/// Every stored revision of a user's record, oldest first.
pub fn voting_history(ledger: &impl Ledger, natural_id: &str) -> Result<Vec<User>> {
    let public_key = find_by_natural_id(ledger, natural_id)?
        .ok_or_else(|| Error::IdentityNotFound(natural_id.to_string()))?;
    ledger
        .history(&public_key)?
        .iter()
        .map(|bytes| User::from_bytes(bytes))
        .collect()
}

/// Resolve a natural id through the index and load the user it names.
pub(crate) fn user_by_natural_id(ledger: &impl Ledger, natural_id: &str) -> Result<User> {
    let public_key = find_by_natural_id(ledger, natural_id)?
        .ok_or_else(|| Error::IdentityNotFound(natural_id.to_string()))?;
    load_user(ledger, &public_key, natural_id)
}

/// Fetch and decode the user stored under `public_key`; `identity` names
/// the record in the not-found error.
pub(crate) fn load_user(ledger: &impl Ledger, public_key: &str, identity: &str) -> Result<User> {
    let bytes = ledger
        .get(public_key)?
        .ok_or_else(|| Error::IdentityNotFound(identity.to_string()))?;
    User::from_bytes(&bytes)
}
