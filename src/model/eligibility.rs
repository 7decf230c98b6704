//! Date-range and age computations behind voter eligibility.

use chrono::{Datelike, NaiveDate};

/// Minimum age to vote.
pub const VOTING_AGE: i32 = 18;

/// Completed-years age at `today`: the calendar-year difference, decremented
/// while the birthday has not yet occurred in `today`'s year.
pub fn compute_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Age at `today`, plus whether the voter is of age for an election running
/// over `[start, end]`.
///
/// A voter who turns 18 before the start date is eligible outright; one who
/// comes of age during the voting window (endpoints included) is eligible
/// too.
pub fn adult_during_period(
    date_of_birth: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> (i32, bool) {
    let age = compute_age(date_of_birth, today);
    let of_age = coming_of_age(date_of_birth);
    let eligible = of_age <= start || within_range(of_age, start, end);
    (age, eligible)
}

/// The date the voter turns 18. A Feb 29 birthday lands on Mar 1 in a
/// non-leap year.
fn coming_of_age(date_of_birth: NaiveDate) -> NaiveDate {
    date_of_birth
        .with_year(date_of_birth.year() + VOTING_AGE)
        .unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(date_of_birth.year() + VOTING_AGE, 3, 1)
                .expect("Mar 1 exists in every year")
        })
}

/// Inclusive containment check, used for eligibility and voting windows.
pub fn within_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Check that a period's end falls after its start, comparing month/day
/// ordinals only. Same-year by construction: a period spanning a year
/// boundary (Dec -> Jan) is rejected, and whether it should be is a product
/// decision this crate does not take.
pub fn valid_election_period(start: NaiveDate, end: NaiveDate) -> bool {
    month_day_ordinal(end) > month_day_ordinal(start)
}

fn month_day_ordinal(date: NaiveDate) -> u32 {
    date.month() * 100 + date.day()
}
