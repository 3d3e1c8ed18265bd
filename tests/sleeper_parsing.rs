use std::fs;
use std::path::PathBuf;

use league_almanac::sleeper::{
    parse_league_json, parse_matchups_json, parse_rosters_json, parse_users_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_league_fixture() {
    let league = parse_league_json(&read_fixture("sleeper_league.json")).expect("league");
    assert_eq!(league.league_id, "1257101142144327682");
    assert_eq!(league.season, "2024");
    assert_eq!(league.name.as_deref(), Some("Sunday Scaries"));
    assert_eq!(league.previous(), Some("998877665544332211"));
    // Season still running, so no winner yet.
    assert_eq!(league.winner_roster_id(), None);
}

#[test]
fn league_winner_comes_from_metadata() {
    let raw = r#"{"league_id":"9","season":"2023","metadata":{"latest_league_winner_roster_id":" 4 "}}"#;
    let league = parse_league_json(raw).expect("league");
    assert_eq!(league.winner_roster_id(), Some(4));

    let bare = parse_league_json(r#"{"league_id":"9","season":"2023"}"#).expect("league");
    assert_eq!(bare.winner_roster_id(), None);
}

#[test]
fn null_league_is_an_error() {
    assert!(parse_league_json("null").is_err());
    assert!(parse_league_json("").is_err());
}

#[test]
fn parses_rosters_fixture() {
    let rosters = parse_rosters_json(&read_fixture("sleeper_rosters.json")).expect("rosters");
    assert_eq!(rosters.len(), 3);
    assert_eq!(rosters[0].owner_id.as_deref(), Some("u1"));
    assert_eq!((rosters[0].wins, rosters[0].losses, rosters[0].ties), (5, 2, 0));
    assert_eq!(rosters[1].games(), 7);
    assert!((rosters[0].points_for - 812.44).abs() < 1e-9);
    assert_eq!(rosters[1].points_for, 701.0);
    // Orphaned roster with no record yet.
    assert_eq!(rosters[2].owner_id, None);
    assert_eq!(rosters[2].games(), 0);
}

#[test]
fn parses_users_fixture() {
    let users = parse_users_json(&read_fixture("sleeper_users.json")).expect("users");
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].team_name.as_deref(), Some("Aces High"));
    assert_eq!(users[1].display_name.as_deref(), Some("Bob"));
    assert_eq!(users[1].team_name, None);
    assert_eq!(users[2].team_name, None);
}

#[test]
fn parses_matchups_fixture() {
    let entries =
        parse_matchups_json(&read_fixture("sleeper_matchups_week1.json")).expect("matchups");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].matchup_id, Some(1));
    assert_eq!(entries[0].points, Some(121.34));
    assert_eq!(entries[2].played_points(true), None);
    assert_eq!(entries[2].played_points(false), Some(0.0));
    assert_eq!(entries[4].matchup_id, None);
}

#[test]
fn null_or_blank_lists_are_empty() {
    assert!(parse_matchups_json("null").expect("null").is_empty());
    assert!(parse_rosters_json("  ").expect("blank").is_empty());
    assert!(parse_users_json("[]").expect("empty").is_empty());
    assert!(parse_matchups_json("{\"oops\": 1}").is_err());
}
