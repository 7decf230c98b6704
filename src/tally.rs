//! The cooperating tally service: vote recording and the result reader.
//!
//! Votes live on their own ledger namespace, reached from the voting side
//! through a synchronous cross-service call. The append-only vote log takes
//! the write fan-in of many voters while the identity ledger stays
//! read-heavy; a voter is only marked `voted` after this service confirms
//! the vote was durably recorded.

use chrono::NaiveDate;
use log::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::keys::{self, KeyTag};
use crate::ledger::{Ledger, MARKER};
use crate::model::date;
use crate::model::election::ElectionType;
use crate::model::vote::{VotePage, VoteReceipt};

/// Function names understood by the service's invoke entry.
pub const RECORD_VOTE: &str = "recordVote";
pub const LIST_VOTES: &str = "listVotes";

/// Client capability for the tally service.
///
/// Injected into the operations that reach the vote ledger, so tests can
/// substitute in-process wiring for the cross-service call.
pub trait VoteSink {
    /// Durably record one vote. Callers flip the voter's status only after
    /// this returns successfully.
    fn record(
        &self,
        voter_id: &str,
        candidate_key: &str,
        election_type: ElectionType,
        election_date: NaiveDate,
    ) -> Result<VoteReceipt>;

    /// Fetch one page of vote keys for an election.
    fn votes_page(
        &self,
        election_type: ElectionType,
        page_size: u32,
        bookmark: &str,
    ) -> Result<VotePage>;
}

/// `VoteSink` over the ledger's cross-service invoke, addressed by the
/// configured service name and channel.
pub struct RemoteVoteSink<'a, L: Ledger> {
    ledger: &'a L,
    service: String,
    channel: String,
}

impl<'a, L: Ledger> RemoteVoteSink<'a, L> {
    pub fn new(ledger: &'a L, config: &Config) -> Self {
        Self {
            ledger,
            service: config.tally_service().to_string(),
            channel: config.tally_channel().to_string(),
        }
    }

    fn call(&self, args: &[&str]) -> Result<Vec<u8>> {
        self.ledger
            .invoke_service(&self.service, &self.channel, args)
            .map_err(|err| Error::Delegate {
                service: self.service.clone(),
                detail: err.to_string(),
            })
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        serde_json::from_slice(payload).map_err(|err| Error::Delegate {
            service: self.service.clone(),
            detail: format!("undecodable payload: {err}"),
        })
    }
}

impl<L: Ledger> VoteSink for RemoteVoteSink<'_, L> {
    fn record(
        &self,
        voter_id: &str,
        candidate_key: &str,
        election_type: ElectionType,
        election_date: NaiveDate,
    ) -> Result<VoteReceipt> {
        let date = date::format_date(election_date);
        let payload = self.call(&[
            RECORD_VOTE,
            voter_id,
            candidate_key,
            election_type.as_str(),
            &date,
        ])?;
        self.decode(&payload)
    }

    fn votes_page(
        &self,
        election_type: ElectionType,
        page_size: u32,
        bookmark: &str,
    ) -> Result<VotePage> {
        let page_size = page_size.to_string();
        let payload = self.call(&[LIST_VOTES, election_type.as_str(), &page_size, bookmark])?;
        self.decode(&payload)
    }
}

/// Service-side handler: write the vote marker key. The existence of the
/// key is the unit of tally.
pub fn record_vote(
    ledger: &dyn Ledger,
    voter_id: &str,
    candidate_key: &str,
    election_type: ElectionType,
    election_date: NaiveDate,
) -> Result<VoteReceipt> {
    let date = date::format_date(election_date);
    let key = keys::make_key(
        KeyTag::VoteChoice,
        &[election_type.as_str(), candidate_key, &date, voter_id],
    )?;
    ledger.put(&key, MARKER)?;
    debug!("recorded a {election_type} vote for {candidate_key}");

    Ok(VoteReceipt {
        voter_id: voter_id.to_string(),
        candidate: candidate_key.to_string(),
        election_type,
        election_date,
        tx_id: ledger.tx_id(),
    })
}

/// Service-side handler: one page of vote keys for an election, resumable
/// through the returned bookmark.
pub fn list_votes(
    ledger: &dyn Ledger,
    election_type: ElectionType,
    page_size: u32,
    bookmark: &str,
) -> Result<VotePage> {
    let prefix = keys::prefix(KeyTag::VoteChoice, &[election_type.as_str()]);
    let page = ledger.scan_prefix_page(&prefix, page_size, bookmark)?;
    Ok(VotePage {
        keys: page.entries.into_iter().map(|(key, _)| key).collect(),
        bookmark: page.bookmark,
    })
}

/// Invoke entry for the service: route a flat argument list to the matching
/// handler and marshal the result.
pub fn dispatch(ledger: &dyn Ledger, args: &[&str]) -> Result<Vec<u8>> {
    let (function, rest) = args.split_first().ok_or(Error::InvalidArgument {
        field: "function",
        value: String::new(),
    })?;

    match *function {
        RECORD_VOTE => {
            let [voter_id, candidate_key, election_type, election_date] = rest else {
                return Err(arg_count(RECORD_VOTE, 4, rest.len()));
            };
            let receipt = record_vote(
                ledger,
                voter_id,
                candidate_key,
                election_type.parse()?,
                date::parse_date("electionDate", election_date)?,
            )?;
            encode(&receipt)
        }
        LIST_VOTES => {
            let [election_type, page_size, bookmark] = rest else {
                return Err(arg_count(LIST_VOTES, 3, rest.len()));
            };
            let page_size: u32 = page_size.parse().map_err(|_| Error::InvalidArgument {
                field: "pageSize",
                value: page_size.to_string(),
            })?;
            let page = list_votes(ledger, election_type.parse()?, page_size, bookmark)?;
            encode(&page)
        }
        other => Err(Error::InvalidArgument {
            field: "function",
            value: other.to_string(),
        }),
    }
}

fn arg_count(function: &str, expected: usize, got: usize) -> Error {
    Error::InvalidArgument {
        field: "args",
        value: format!("{function} expects {expected} arguments, got {got}"),
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| Error::Ledger(format!("encode payload: {err}")))
}
