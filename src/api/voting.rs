//! Vote casting: the core state-machine transition.

use log::info;

use crate::api::{election, identity};
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::model::date;
use crate::model::election::ElectionType;
use crate::model::eligibility;
use crate::model::participation::Participation;
use crate::model::vote::Vote;
use crate::tally::VoteSink;

/// Cast a vote, fail-fast at every precondition.
///
/// The vote is first recorded on the tally ledger through the sink; only
/// after that call confirms does the voter's status flip from `Registered`
/// to `Voted`, so a voter is never marked as having voted without a
/// corresponding vote record.
pub fn vote(
    ledger: &impl Ledger,
    sink: &impl VoteSink,
    natural_id: &str,
    election_type: &str,
    candidate_key: &str,
) -> Result<Vote> {
    let election_type: ElectionType = election_type.parse()?;

    // The election must exist and be inside its voting window.
    let election = election::require_election(ledger, election_type)?;
    let today = ledger.tx_timestamp().date_naive();
    if !eligibility::within_range(today, election.start_date, election.end_date) {
        return Err(Error::NotInVotingPeriod {
            today: date::format_date(today),
            election_type: election_type.to_string(),
            start: date::format_date(election.start_date),
            end: date::format_date(election.end_date),
        });
    }

    // The voter must hold an eligible registration and must not have voted.
    let mut voter = identity::user_by_natural_id(ledger, natural_id)?;
    if voter.participation.has_voted() {
        return Err(Error::AlreadyVoted(natural_id.to_string()));
    }
    let enrollment = match &voter.participation {
        Participation::Registered(e) if e.election_type == election_type => e,
        _ => return Err(Error::NotRegistered(natural_id.to_string())),
    };
    if !enrollment.is_eligible {
        return Err(Error::NotEligible(natural_id.to_string()));
    }
    let voter_age = enrollment.age;

    // The target must be an enrolled candidate of this election, and not
    // the voter themselves.
    let candidate = identity::load_user(ledger, candidate_key, candidate_key)?;
    let candidate_enrolled = candidate
        .participation
        .enrollment()
        .map(|e| e.is_candidate && e.election_type == election_type)
        .unwrap_or(false);
    if !candidate_enrolled {
        return Err(Error::NotACandidate(candidate_key.to_string()));
    }
    if candidate.natural_id == voter.natural_id {
        return Err(Error::SelfVote(natural_id.to_string()));
    }

    // Record on the tally ledger before touching local state.
    let receipt = sink.record(&voter.natural_id, candidate_key, election_type, today)?;

    // Only now flip registered -> voted.
    voter.participation = std::mem::take(&mut voter.participation).mark_voted();
    ledger.put(&voter.public_key, &voter.to_bytes()?)?;

    info!(
        "voter {natural_id} cast a {election_type} vote (tally tx {})",
        receipt.tx_id
    );

    Ok(Vote {
        voter_id: voter.natural_id,
        first_name: voter.first_name,
        last_name: voter.last_name,
        age: voter_age,
        candidate: candidate_key.to_string(),
        election_date: today,
        election_type,
        tx_id: ledger.tx_id(),
    })
}
