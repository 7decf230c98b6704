//! Tally reading and vote counting.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::api::election;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::keys;
use crate::ledger::Ledger;
use crate::model::date;
use crate::model::election::ElectionType;
use crate::model::vote::VotePage;
use crate::tally::VoteSink;

/// Tallying algorithms. Only plurality is wired end-to-end; borda and
/// elimination are reserved extension points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TallyMethod {
    Plurality,
    Borda,
    Elimination,
}

impl FromStr for TallyMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plurality" => Ok(TallyMethod::Plurality),
            "borda" => Ok(TallyMethod::Borda),
            "elimination" => Ok(TallyMethod::Elimination),
            _ => Err(Error::InvalidArgument {
                field: "method",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TallyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TallyMethod::Plurality => "plurality",
            TallyMethod::Borda => "borda",
            TallyMethod::Elimination => "elimination",
        })
    }
}

/// Per-candidate count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    /// Public key of the candidate.
    pub candidate: String,
    pub votes: u64,
}

/// Final results of a finished election, ordered by descending count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election_type: ElectionType,
    pub method: TallyMethod,
    pub total_votes: u64,
    pub tallies: Vec<CandidateTally>,
}

/// One page of vote keys for an election, fetched through the sink.
pub fn list_votes(
    sink: &impl VoteSink,
    election_type: &str,
    bookmark: &str,
    page_size: u32,
) -> Result<VotePage> {
    sink.votes_page(election_type.parse()?, page_size, bookmark)
}

/// Count the votes of a finished election.
///
/// Pages through every vote key on the tally ledger and aggregates counts
/// per candidate. The election period must have fully elapsed.
pub fn count_votes(
    ledger: &impl Ledger,
    sink: &impl VoteSink,
    config: &Config,
    method: &str,
    election_type: &str,
) -> Result<ElectionResults> {
    let method: TallyMethod = method.parse()?;
    let election_type: ElectionType = election_type.parse()?;

    let election = election::require_election(ledger, election_type)?;
    let today = ledger.tx_timestamp().date_naive();
    if today <= election.end_date {
        return Err(Error::ElectionNotOver {
            election_type: election_type.to_string(),
            today: date::format_date(today),
            end: date::format_date(election.end_date),
        });
    }

    if method != TallyMethod::Plurality {
        return Err(Error::UnsupportedMethod(method.to_string()));
    }

    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut total = 0u64;
    let mut bookmark = String::new();
    loop {
        let page = sink.votes_page(election_type, config.results_page_size(), &bookmark)?;
        for key in &page.keys {
            let (_, segments) = keys::split_key(key)?;
            // The candidate is the second segment of a vote key.
            *counts.entry(segments[1].clone()).or_insert(0) += 1;
            total += 1;
        }
        if page.bookmark.is_empty() {
            break;
        }
        bookmark = page.bookmark;
    }

    let mut tallies: Vec<CandidateTally> = counts
        .into_iter()
        .map(|(candidate, votes)| CandidateTally { candidate, votes })
        .collect();
    tallies.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });

    info!(
        "counted {total} {election_type} votes across {} candidates",
        tallies.len()
    );

    Ok(ElectionResults {
        election_type,
        method,
        total_votes: total,
        tallies,
    })
}
