//! Voter registration.

use log::info;

use crate::api::{candidate, election, identity};
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::model::election::ElectionType;
use crate::model::eligibility;
use crate::model::participation::{Enrollment, Participation};
use crate::model::voter::NewVoter;

/// Enroll a user as a voter in the active election of a type.
///
/// Computes age and eligibility against the election period, folds in the
/// candidacy marker, and overwrites the user's participation with a fresh
/// `Registered` enrollment: a user is mid-cycle for at most one election at
/// a time, so any enrollment in an unrelated election is replaced.
pub fn register_voter(
    ledger: &impl Ledger,
    natural_id: &str,
    election_type: &str,
) -> Result<NewVoter> {
    let election_type: ElectionType = election_type.parse()?;
    let mut user = identity::user_by_natural_id(ledger, natural_id)?;
    let election = election::require_election(ledger, election_type)?;

    match &user.participation {
        Participation::Registered(e)
            if e.matches(election_type, election.start_date, election.end_date) =>
        {
            return Err(Error::AlreadyRegistered(natural_id.to_string()));
        }
        // Voted is terminal for the cycle; no route back to registered.
        Participation::Voted(e)
            if e.matches(election_type, election.start_date, election.end_date) =>
        {
            return Err(Error::AlreadyVoted(natural_id.to_string()));
        }
        _ => {}
    }

    let today = ledger.tx_timestamp().date_naive();
    let (age, is_eligible) = eligibility::adult_during_period(
        user.date_of_birth,
        election.start_date,
        election.end_date,
        today,
    );
    let is_candidate = candidate::is_candidate(ledger, election_type, natural_id)?;

    user.participation = Participation::Registered(Enrollment {
        election_type,
        start_date: election.start_date,
        end_date: election.end_date,
        is_candidate,
        age,
        is_eligible,
    });
    ledger.put(&user.public_key, &user.to_bytes()?)?;

    info!("registered voter {natural_id} for the {election_type} election (eligible: {is_eligible})");

    Ok(NewVoter {
        natural_id: natural_id.to_string(),
        first_name: user.first_name,
        last_name: user.last_name,
        date_of_birth: user.date_of_birth,
        age,
        is_eligible,
        is_candidate,
        election_type,
        election_period: election.period(),
        status: user.participation.to_string(),
    })
}
