//! Composite-key codec.
//!
//! Every record key is an ordered concatenation of string segments behind a
//! type tag, delimited by U+0000 so segments can never collide with user
//! data. Segment order defines prefix-scan semantics: a scan by the leading
//! segments alone returns every record sharing them, whatever the trailing
//! segments hold. All key construction in this workspace goes through this
//! module.

use crate::error::{Error, Result};

/// Non-printable delimiter between key segments.
pub const DELIMITER: char = '\u{0}';

/// The composite-key shapes used by the voting and tally ledgers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyTag {
    /// naturalId -> publicKey index markers.
    NaturalIdIndex,
    /// One key per election; the key is the whole record.
    Election,
    /// Candidacy markers per (electionType, naturalId).
    Candidacy,
    /// Vote records on the tally ledger.
    VoteChoice,
}

impl KeyTag {
    /// The tag string embedded at the front of the key.
    pub fn name(self) -> &'static str {
        match self {
            KeyTag::NaturalIdIndex => "naturalId~publicKey",
            KeyTag::Election => "electionType~startDate~endDate~electionID",
            KeyTag::Candidacy => "electionType~naturalId",
            KeyTag::VoteChoice => "electionType~candidate~date~naturalId",
        }
    }

    /// How many segments a full key of this shape carries.
    pub fn arity(self) -> usize {
        match self {
            KeyTag::NaturalIdIndex | KeyTag::Candidacy => 2,
            KeyTag::Election | KeyTag::VoteChoice => 4,
        }
    }

    fn from_name(name: &str) -> Option<KeyTag> {
        [
            KeyTag::NaturalIdIndex,
            KeyTag::Election,
            KeyTag::Candidacy,
            KeyTag::VoteChoice,
        ]
        .into_iter()
        .find(|tag| tag.name() == name)
    }
}

/// Build a full composite key. The segment count must match the tag arity.
pub fn make_key(tag: KeyTag, segments: &[&str]) -> Result<String> {
    if segments.len() != tag.arity() {
        return Err(Error::MalformedKey(format!(
            "{} expects {} segments, got {}",
            tag.name(),
            tag.arity(),
            segments.len()
        )));
    }
    Ok(join(tag, segments))
}

/// Build a scan prefix from the leading segments of a key shape.
pub fn prefix(tag: KeyTag, segments: &[&str]) -> String {
    join(tag, segments)
}

fn join(tag: KeyTag, segments: &[&str]) -> String {
    let mut key = String::new();
    key.push(DELIMITER);
    key.push_str(tag.name());
    key.push(DELIMITER);
    for segment in segments {
        key.push_str(segment);
        key.push(DELIMITER);
    }
    key
}

/// Split a composite key back into its tag and segments.
///
/// Fails with `MALFORMED_KEY` when the key does not carry a known tag or the
/// delimiter count disagrees with the tag's segment count.
pub fn split_key(key: &str) -> Result<(KeyTag, Vec<String>)> {
    let malformed = || Error::MalformedKey(key.to_string());

    let mut parts = key.split(DELIMITER);
    if parts.next() != Some("") {
        return Err(malformed());
    }
    let tag = parts
        .next()
        .and_then(KeyTag::from_name)
        .ok_or_else(malformed)?;

    let mut segments: Vec<String> = parts.map(str::to_string).collect();
    // A well-formed key ends with the delimiter, leaving one empty trailer.
    if segments.pop() != Some(String::new()) {
        return Err(malformed());
    }
    if segments.len() != tag.arity() {
        return Err(malformed());
    }
    Ok((tag, segments))
}
