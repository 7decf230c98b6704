//! End-to-end tests over an in-memory ledger pair: the voting ledger wired
//! to its tally service the way the deployed pair is wired over a channel.

use ballot_ledger::api::{candidate, election, identity, results, voter, voting};
use ballot_ledger::model::participation::Participation;
use ballot_ledger::model::user::NewUser;
use ballot_ledger::tally::RemoteVoteSink;
use ballot_ledger::{Config, ErrorKind};
use chrono::NaiveDate;
use ledger_test::TestNetwork;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A network with the 2019 primary election mid-window.
fn primary_network() -> (TestNetwork, Config) {
    let config = Config::default();
    let network = TestNetwork::new(&config);
    network.set_today(date(2019, 3, 15));
    election::register_election(
        &*network.voting,
        "primary",
        "PRI-2019",
        "2019/03/12",
        "2019/03/20",
    )
    .unwrap();
    (network, config)
}

fn register(network: &TestNetwork, natural_id: &str, dob: &str) -> NewUser {
    identity::register_user(&*network.voting, natural_id, "First", "Last", dob, "M").unwrap()
}

#[test]
fn registration_issues_keys_and_never_stores_the_private_half() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let new_user = register(&network, "ID-100", "1992/02/24");
    assert!(!new_user.public_key.is_empty());
    assert_ne!(new_user.public_key, new_user.private_key);

    // The stored record carries no trace of the private key.
    use ballot_ledger::ledger::Ledger;
    let raw = ledger.get(&new_user.public_key).unwrap().unwrap();
    assert!(!String::from_utf8(raw).unwrap().contains(&new_user.private_key));

    let user = identity::get_user(ledger, "identity", "ID-100").unwrap();
    assert_eq!(user.public_key, new_user.public_key);
    assert_eq!(user.participation, Participation::None);

    let by_key = identity::get_user(ledger, "userkey", &new_user.public_key).unwrap();
    assert_eq!(by_key, user);
}

#[test]
fn natural_ids_are_unique() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    register(&network, "ID-100", "1992/02/24");
    let err = identity::register_user(ledger, "ID-100", "Other", "Name", "1990/01/01", "F")
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_IDENTITY");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn registration_rejects_malformed_arguments() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let err = identity::register_user(ledger, "ID-1", "A", "B", "1992/02/24", "X").unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let err = identity::register_user(ledger, "ID-2", "A", "B", "24-02-1992", "M").unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let err = identity::get_user(ledger, "by-phone", "whatever").unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let err = identity::get_user(ledger, "identity", "ID-404").unwrap_err();
    assert_eq!(err.code(), "IDENTITY_NOT_FOUND");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn one_election_per_type_no_matter_the_details() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let err = election::register_election(ledger, "primary", "PRI-2", "2019/05/01", "2019/05/09")
        .unwrap_err();
    assert_eq!(err.code(), "ELECTION_EXISTS");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // A different type is fine.
    let general =
        election::register_election(ledger, "general", "GEN-2019", "2019/11/01", "2019/11/05")
            .unwrap();
    assert_eq!(general.election_id, "GEN-2019");

    let found = election::find_election(ledger, general.election_type)
        .unwrap()
        .unwrap();
    assert_eq!(found.election_id, "GEN-2019");
    assert_eq!(found.period(), "2019/11/01 - 2019/11/05");
}

#[test]
fn election_validation_rejects_bad_type_and_period() {
    let config = Config::default();
    let network = TestNetwork::new(&config);
    let ledger = &*network.voting;

    let err = election::register_election(ledger, "municipal", "M-1", "2019/03/12", "2019/03/20")
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let err = election::register_election(ledger, "local", "L-1", "2019/03/20", "2019/03/12")
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_PERIOD");
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(election::find_election(ledger, "local".parse().unwrap())
        .unwrap()
        .is_none());
}

#[test]
fn candidacy_requires_a_matching_identity() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let alice = register(&network, "ID-A", "1980/06/01");
    let bob = register(&network, "ID-B", "1985/07/02");

    // No election of that type yet.
    let err = candidate::register_candidate(ledger, "local", "ID-A", &alice.public_key)
        .unwrap_err();
    assert_eq!(err.code(), "ELECTION_NOT_FOUND");

    // Someone else's key is rejected.
    let err = candidate::register_candidate(ledger, "primary", "ID-A", &bob.public_key)
        .unwrap_err();
    assert_eq!(err.code(), "KEY_MISMATCH");
    assert_eq!(err.kind(), ErrorKind::State);

    let new_candidate =
        candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    assert_eq!(new_candidate.election_period, "2019/03/12 - 2019/03/20");

    // Candidacy is created once.
    let err = candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key)
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_CANDIDACY");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn voter_registration_stamps_age_eligibility_and_candidacy() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let alice = register(&network, "ID-A", "1992/02/24");
    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    register(&network, "ID-B", "1992/02/24");

    let voter_b = voter::register_voter(ledger, "ID-B", "primary").unwrap();
    assert_eq!(voter_b.age, 27);
    assert!(voter_b.is_eligible);
    assert!(!voter_b.is_candidate);
    assert_eq!(
        voter_b.status,
        "registered-primary-2019/03/12-2019/03/20-false-27-true"
    );

    // A registered candidate keeps the flag in the enrollment.
    let voter_a = voter::register_voter(ledger, "ID-A", "primary").unwrap();
    assert!(voter_a.is_candidate);

    let err = voter::register_voter(ledger, "ID-B", "primary").unwrap_err();
    assert_eq!(err.code(), "ALREADY_REGISTERED");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn minors_register_but_are_not_eligible() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    register(&network, "ID-KID", "2005/01/01");
    let enrolled = voter::register_voter(ledger, "ID-KID", "primary").unwrap();
    assert_eq!(enrolled.age, 14);
    assert!(!enrolled.is_eligible);
}

#[test]
fn coming_of_age_during_the_window_counts() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    // 18th birthday exactly on the end date of the election.
    register(&network, "ID-NEW", "2001/03/20");
    let enrolled = voter::register_voter(ledger, "ID-NEW", "primary").unwrap();
    assert_eq!(enrolled.age, 17);
    assert!(enrolled.is_eligible);
}

#[test]
fn the_primary_scenario_end_to_end() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let alice = register(&network, "ID-A", "1992/02/24");
    let _bob = register(&network, "ID-B", "1992/02/24");

    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();
    voter::register_voter(ledger, "ID-B", "primary").unwrap();

    let vote = voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap();
    assert_eq!(vote.election_type.as_str(), "primary");
    assert_eq!(vote.candidate, alice.public_key);
    assert_eq!(vote.voter_id, "ID-B");
    assert_eq!(vote.age, 27);

    // The status flipped to voted...
    let voter_b = identity::get_user(ledger, "identity", "ID-B").unwrap();
    assert!(voter_b.participation.has_voted());

    // ...and the tally ledger holds exactly one vote, for Alice.
    let page = results::list_votes(&sink, "primary", "", 10).unwrap();
    assert_eq!(page.keys.len(), 1);
    let (_, segments) = ballot_ledger::keys::split_key(&page.keys[0]).unwrap();
    assert_eq!(segments[0], "primary");
    assert_eq!(segments[1], alice.public_key);
    assert_eq!(segments[2], "2019/03/15");
    assert_eq!(segments[3], "ID-B");

    // Voting is exclusive: the second attempt fails whatever the candidate.
    let err = voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "ALREADY_VOTED");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn votes_are_gated_by_state_and_window() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let alice = register(&network, "ID-A", "1992/02/24");
    let bob = register(&network, "ID-B", "1992/02/24");
    register(&network, "ID-C", "1992/02/24");
    register(&network, "ID-KID", "2005/01/01");

    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();
    voter::register_voter(ledger, "ID-B", "primary").unwrap();
    voter::register_voter(ledger, "ID-KID", "primary").unwrap();

    // Nobody voted yet, so the candidate themselves is refused only by the
    // self-vote rule.
    let err = voting::vote(ledger, &sink, "ID-A", "primary", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "SELF_VOTE");

    // Bob is registered but holds no candidacy flag.
    let err = voting::vote(ledger, &sink, "ID-C", "primary", &bob.public_key).unwrap_err();
    assert_eq!(err.code(), "NOT_REGISTERED");
    // ...once registered, voting for a non-candidate still fails.
    voter::register_voter(ledger, "ID-C", "primary").unwrap();
    let err = voting::vote(ledger, &sink, "ID-C", "primary", &bob.public_key).unwrap_err();
    assert_eq!(err.code(), "NOT_A_CANDIDATE");

    // A minor's enrollment is present but ineligible.
    let err = voting::vote(ledger, &sink, "ID-KID", "primary", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "NOT_ELIGIBLE");

    // No election of that type.
    let err = voting::vote(ledger, &sink, "ID-B", "local", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "ELECTION_NOT_FOUND");

    // Outside the voting window nothing goes through.
    network.set_today(date(2019, 3, 25));
    let err = voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "NOT_IN_VOTING_PERIOD");
    assert_eq!(err.kind(), ErrorKind::State);
}

#[test]
fn a_failed_delegate_call_leaves_the_voter_registered() {
    let (network, _) = primary_network();
    let ledger = &*network.voting;

    let alice = register(&network, "ID-A", "1992/02/24");
    register(&network, "ID-B", "1992/02/24");
    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();
    voter::register_voter(ledger, "ID-B", "primary").unwrap();

    // A sink pointed at a service nobody wired up.
    let misconfigured: Config =
        serde_json::from_str(r#"{"tally_service": "nowhere"}"#).unwrap();
    let sink = RemoteVoteSink::new(ledger, &misconfigured);

    let err = voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap_err();
    assert_eq!(err.code(), "DELEGATE_CALL_FAILED");
    assert_eq!(err.kind(), ErrorKind::Delegate);

    // The status flip never happened.
    let voter_b = identity::get_user(ledger, "identity", "ID-B").unwrap();
    assert!(!voter_b.participation.has_voted());
    assert!(matches!(
        voter_b.participation,
        Participation::Registered(_)
    ));
}

#[test]
fn history_keeps_every_revision_oldest_first() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let alice = register(&network, "ID-A", "1992/02/24");
    register(&network, "ID-B", "1992/02/24");
    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();
    voter::register_voter(ledger, "ID-B", "primary").unwrap();
    voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap();

    let history = identity::voting_history(ledger, "ID-B").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].participation, Participation::None);
    assert!(matches!(
        history[1].participation,
        Participation::Registered(_)
    ));
    assert!(history[2].participation.has_voted());

    let err = identity::voting_history(ledger, "ID-404").unwrap_err();
    assert_eq!(err.code(), "IDENTITY_NOT_FOUND");
}

#[test]
fn counting_waits_for_the_election_to_finish() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let err = results::count_votes(ledger, &sink, &config, "plurality", "primary").unwrap_err();
    assert_eq!(err.code(), "ELECTION_NOT_OVER");
    assert_eq!(err.kind(), ErrorKind::State);

    let err = results::count_votes(ledger, &sink, &config, "approval", "primary").unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[test]
fn plurality_count_paginates_over_every_vote() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let alice = register(&network, "ID-A", "1980/01/01");
    let bob = register(&network, "ID-B", "1981/01/01");
    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    candidate::register_candidate(ledger, "primary", "ID-B", &bob.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();
    voter::register_voter(ledger, "ID-B", "primary").unwrap();

    for (id, dob) in [
        ("ID-V1", "1982/01/01"),
        ("ID-V2", "1983/01/01"),
        ("ID-V3", "1984/01/01"),
    ] {
        register(&network, id, dob);
        voter::register_voter(ledger, id, "primary").unwrap();
    }
    voting::vote(ledger, &sink, "ID-V1", "primary", &alice.public_key).unwrap();
    voting::vote(ledger, &sink, "ID-V2", "primary", &alice.public_key).unwrap();
    voting::vote(ledger, &sink, "ID-V3", "primary", &bob.public_key).unwrap();
    voting::vote(ledger, &sink, "ID-B", "primary", &alice.public_key).unwrap();

    network.set_today(date(2019, 3, 21));

    // A two-entry page size forces the count across several pages.
    let small_pages: Config =
        serde_json::from_str(r#"{"results_page_size": 2}"#).unwrap();
    let tally = results::count_votes(ledger, &sink, &small_pages, "plurality", "primary").unwrap();

    assert_eq!(tally.total_votes, 4);
    assert_eq!(tally.tallies.len(), 2);
    assert_eq!(tally.tallies[0].candidate, alice.public_key);
    assert_eq!(tally.tallies[0].votes, 3);
    assert_eq!(tally.tallies[1].candidate, bob.public_key);
    assert_eq!(tally.tallies[1].votes, 1);

    // The reserved methods validate but refuse to run.
    let err = results::count_votes(ledger, &sink, &config, "borda", "primary").unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_METHOD");
}

#[test]
fn the_tally_service_rejects_unknown_functions() {
    let (network, config) = primary_network();

    use ballot_ledger::ledger::Ledger;
    let err = network
        .voting
        .invoke_service(config.tally_service(), config.tally_channel(), &["burnVotes"])
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[test]
fn vote_pages_resume_from_their_bookmark() {
    let (network, config) = primary_network();
    let ledger = &*network.voting;
    let sink = RemoteVoteSink::new(ledger, &config);

    let alice = register(&network, "ID-A", "1980/01/01");
    candidate::register_candidate(ledger, "primary", "ID-A", &alice.public_key).unwrap();
    voter::register_voter(ledger, "ID-A", "primary").unwrap();

    for (id, dob) in [
        ("ID-V1", "1982/01/01"),
        ("ID-V2", "1983/01/01"),
        ("ID-V3", "1984/01/01"),
    ] {
        register(&network, id, dob);
        voter::register_voter(ledger, id, "primary").unwrap();
        voting::vote(ledger, &sink, id, "primary", &alice.public_key).unwrap();
    }

    let mut seen = Vec::new();
    let mut bookmark = String::new();
    loop {
        let page = results::list_votes(&sink, "primary", &bookmark, 1).unwrap();
        assert!(page.keys.len() <= 1);
        seen.extend(page.keys);
        if page.bookmark.is_empty() {
            break;
        }
        bookmark = page.bookmark;
    }

    assert_eq!(seen.len(), 3);
    // Keys arrive in order and without repeats.
    let mut sorted = seen.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, seen);
}
