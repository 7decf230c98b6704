use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of failures, deciding how a caller should react.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed argument shape or enum value; the caller's fault, never retried.
    Validation,
    /// A referenced identity, election, or candidate does not exist.
    NotFound,
    /// The operation would duplicate existing state.
    Conflict,
    /// The entity exists but is in the wrong state for the operation.
    State,
    /// The cross-service call failed or returned non-success.
    Delegate,
    /// A composite key could not be parsed.
    Codec,
    /// The ledger collaborator itself failed.
    Ledger,
}

/// Every failure an operation can report.
///
/// Each variant carries a stable code for the message catalog and a
/// human-readable rendering. No error is recovered internally: a failed
/// precondition aborts the whole operation with nothing committed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {field}: {value:?}")]
    InvalidArgument { field: &'static str, value: String },
    #[error("invalid election period: {start} - {end}")]
    InvalidPeriod { start: String, end: String },
    #[error("tally method {0} is reserved but not implemented")]
    UnsupportedMethod(String),
    #[error("identity {0} does not exist")]
    IdentityNotFound(String),
    #[error("no {0} election exists")]
    ElectionNotFound(String),
    #[error("duplicate natural id: {0}")]
    DuplicateIdentity(String),
    #[error("a {0} election already exists")]
    ElectionExists(String),
    #[error("{natural_id} is already a candidate in the {election_type} election")]
    DuplicateCandidacy {
        election_type: String,
        natural_id: String,
    },
    #[error("voter {0} is already registered")]
    AlreadyRegistered(String),
    #[error("voter {0} has already voted")]
    AlreadyVoted(String),
    #[error("public key mismatch for {natural_id}: supplied {supplied}")]
    KeyMismatch {
        natural_id: String,
        supplied: String,
    },
    #[error("voter {0} is not registered for this election")]
    NotRegistered(String),
    #[error("voter {0} is not eligible to vote")]
    NotEligible(String),
    #[error("{0} is not a candidate in this election")]
    NotACandidate(String),
    #[error("voter {0} cannot vote for themselves")]
    SelfVote(String),
    #[error("{today} is outside the {election_type} voting period {start} - {end}")]
    NotInVotingPeriod {
        today: String,
        election_type: String,
        start: String,
        end: String,
    },
    #[error("the {election_type} election is not over: today is {today}, voting ends {end}")]
    ElectionNotOver {
        election_type: String,
        today: String,
        end: String,
    },
    #[error("call to service {service} failed: {detail}")]
    Delegate { service: String, detail: String },
    #[error("malformed composite key: {0:?}")]
    MalformedKey(String),
    #[error("ledger operation failed: {0}")]
    Ledger(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::IdentityNotFound(_) => "IDENTITY_NOT_FOUND",
            Self::ElectionNotFound(_) => "ELECTION_NOT_FOUND",
            Self::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            Self::ElectionExists(_) => "ELECTION_EXISTS",
            Self::DuplicateCandidacy { .. } => "DUPLICATE_CANDIDACY",
            Self::AlreadyRegistered(_) => "ALREADY_REGISTERED",
            Self::AlreadyVoted(_) => "ALREADY_VOTED",
            Self::KeyMismatch { .. } => "KEY_MISMATCH",
            Self::NotRegistered(_) => "NOT_REGISTERED",
            Self::NotEligible(_) => "NOT_ELIGIBLE",
            Self::NotACandidate(_) => "NOT_A_CANDIDATE",
            Self::SelfVote(_) => "SELF_VOTE",
            Self::NotInVotingPeriod { .. } => "NOT_IN_VOTING_PERIOD",
            Self::ElectionNotOver { .. } => "ELECTION_NOT_OVER",
            Self::Delegate { .. } => "DELEGATE_CALL_FAILED",
            Self::MalformedKey(_) => "MALFORMED_KEY",
            Self::Ledger(_) => "LEDGER_FAILURE",
        }
    }

    /// Where this error sits in the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } | Self::InvalidPeriod { .. } | Self::UnsupportedMethod(_) => {
                ErrorKind::Validation
            }
            Self::IdentityNotFound(_) | Self::ElectionNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateIdentity(_)
            | Self::ElectionExists(_)
            | Self::DuplicateCandidacy { .. }
            | Self::AlreadyRegistered(_)
            | Self::AlreadyVoted(_) => ErrorKind::Conflict,
            Self::KeyMismatch { .. }
            | Self::NotRegistered(_)
            | Self::NotEligible(_)
            | Self::NotACandidate(_)
            | Self::SelfVote(_)
            | Self::NotInVotingPeriod { .. }
            | Self::ElectionNotOver { .. } => ErrorKind::State,
            Self::Delegate { .. } => ErrorKind::Delegate,
            Self::MalformedKey(_) => ErrorKind::Codec,
            Self::Ledger(_) => ErrorKind::Ledger,
        }
    }
}
