//! Election business logic over an ordered key-value ledger.
//!
//! Entities — users, elections, candidacies, votes — are stored as values
//! behind composite keys built by the [`keys`] codec, and every operation
//! runs as one atomic unit against a [`ledger::Ledger`] collaborator. Vote
//! casting spans two cooperating ledgers: the identity side here, and the
//! append-only vote log behind the [`tally::VoteSink`] capability.
//!
//! Transport, request routing, and the ledger's own consensus are the
//! embedding platform's business, not this crate's.

pub mod api;
pub mod config;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod tally;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
