//! Election participation state for a user.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::date::{self, date_format};
use crate::model::election::ElectionType;

/// Separator used by the flattened display rendering of a status.
pub const STATUS_SEPARATOR: &str = "-";

/// Everything recorded about a user's enrollment in one election cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub election_type: ElectionType,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    pub is_candidate: bool,
    pub age: i32,
    pub is_eligible: bool,
}

impl Enrollment {
    /// Whether this enrollment names the given election cycle.
    pub fn matches(&self, election_type: ElectionType, start: NaiveDate, end: NaiveDate) -> bool {
        self.election_type == election_type && self.start_date == start && self.end_date == end
    }
}

/// A user's position in the per-cycle state machine:
/// `unregistered -> registered -> voted`, no transitions back.
///
/// `Voted` is terminal for its cycle, and a user holds at most one
/// enrollment at a time; registering for an unrelated election replaces the
/// whole state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Participation {
    #[default]
    None,
    Registered(Enrollment),
    Voted(Enrollment),
}

impl Participation {
    /// The current enrollment, if any.
    pub fn enrollment(&self) -> Option<&Enrollment> {
        match self {
            Participation::None => None,
            Participation::Registered(e) | Participation::Voted(e) => Some(e),
        }
    }

    pub fn has_voted(&self) -> bool {
        matches!(self, Participation::Voted(_))
    }

    /// Flip `Registered` to `Voted`, keeping the enrollment unchanged. Any
    /// other state passes through untouched; callers gate the transition.
    pub fn mark_voted(self) -> Participation {
        match self {
            Participation::Registered(e) => Participation::Voted(e),
            other => other,
        }
    }
}

impl fmt::Display for Participation {
    /// The flattened status rendering used in payloads and logs, e.g.
    /// `registered-primary-2019/03/12-2019/03/20-false-27-true`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (token, e) = match self {
            Participation::None => return Ok(()),
            Participation::Registered(e) => ("registered", e),
            Participation::Voted(e) => ("voted", e),
        };
        let fields = [
            token.to_string(),
            e.election_type.to_string(),
            date::format_date(e.start_date),
            date::format_date(e.end_date),
            e.is_candidate.to_string(),
            e.age.to_string(),
            e.is_eligible.to_string(),
        ];
        f.write_str(&fields.join(STATUS_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn enrollment() -> Enrollment {
        Enrollment {
            election_type: ElectionType::Primary,
            start_date: NaiveDate::from_ymd_opt(2019, 3, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2019, 3, 20).unwrap(),
            is_candidate: false,
            age: 27,
            is_eligible: true,
        }
    }

    #[test]
    fn display_matches_the_flattened_form() {
        let registered = Participation::Registered(enrollment());
        assert_eq!(
            registered.to_string(),
            "registered-primary-2019/03/12-2019/03/20-false-27-true"
        );
        assert_eq!(Participation::None.to_string(), "");
    }

    #[test]
    fn voting_is_a_one_way_transition() {
        let registered = Participation::Registered(enrollment());
        let voted = registered.mark_voted();
        assert!(voted.has_voted());
        // Terminal: marking again changes nothing.
        assert_eq!(voted.clone().mark_voted(), voted);
        // Never-registered users cannot become voted.
        assert_eq!(Participation::None.mark_voted(), Participation::None);
    }

    #[test]
    fn stored_form_is_tagged_by_status() {
        let voted = Participation::Voted(enrollment());
        let json = serde_json::to_string(&voted).unwrap();
        assert!(json.contains(r#""status":"voted""#));

        let back: Participation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, voted);
    }
}
