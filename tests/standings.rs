use std::fs;
use std::path::PathBuf;

use league_almanac::model::{LeagueUser, Roster, SeasonData};
use league_almanac::sleeper::{parse_rosters_json, parse_users_json};
use league_almanac::standings::{
    ChampionBasis, compute_league_table, compute_power_rankings, compute_standings,
    defending_champion, power_score,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn roster(id: u32, owner: &str, wins: u32, losses: u32, points_for: f64) -> Roster {
    Roster {
        roster_id: id,
        owner_id: Some(owner.to_string()),
        wins,
        losses,
        ties: 0,
        points_for,
    }
}

fn users() -> Vec<LeagueUser> {
    ["u1", "u2", "u3", "u4"]
        .iter()
        .map(|id| LeagueUser {
            user_id: id.to_string(),
            display_name: Some(format!("Manager {id}")),
            team_name: None,
        })
        .collect()
}

fn season(name: &str, rosters: Vec<Roster>, champion: Option<u32>) -> SeasonData {
    SeasonData {
        season: name.to_string(),
        rosters,
        users: users(),
        champion_roster_id: champion,
    }
}

#[test]
fn standings_order_by_wins_then_points() {
    let data = season(
        "2024",
        vec![
            roster(1, "u1", 6, 4, 1200.0),
            roster(2, "u2", 8, 2, 1100.0),
            roster(3, "u3", 6, 4, 1300.5),
            roster(4, "u4", 2, 8, 1400.0),
        ],
        None,
    );
    let rows = compute_standings(&data);
    let order: Vec<u32> = rows.iter().map(|r| r.roster_id).collect();
    assert_eq!(order, vec![2, 3, 1, 4]);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].team, "Manager u2");
    assert_eq!(rows[1].points_for, "1300.50");
    assert_eq!(rows[3].record, "2-8");
}

#[test]
fn full_ties_keep_roster_order() {
    let data = season(
        "2024",
        vec![roster(4, "u4", 5, 5, 1000.0), roster(2, "u2", 5, 5, 1000.0)],
        None,
    );
    let standings: Vec<u32> = compute_standings(&data).iter().map(|r| r.roster_id).collect();
    let power: Vec<u32> = compute_power_rankings(&data)
        .iter()
        .map(|r| r.roster_id)
        .collect();
    assert_eq!(standings, vec![4, 2]);
    assert_eq!(power, vec![4, 2]);
}

#[test]
fn power_score_trades_wins_for_points() {
    let heavy_scorer = roster(1, "u1", 5, 5, 1450.0);
    let winner = roster(2, "u2", 8, 2, 1100.0);
    assert_eq!(power_score(&heavy_scorer), 1950.0);
    assert_eq!(power_score(&winner), 1900.0);

    let data = season("2024", vec![winner, heavy_scorer], None);
    let rows = compute_power_rankings(&data);
    assert_eq!(rows[0].roster_id, 1);
    assert_eq!(rows[0].power_score, "1950");
    assert_eq!(rows[0].points_for, "1450.0");
    // The table still ranks on wins.
    assert_eq!(compute_standings(&data)[0].roster_id, 2);
}

#[test]
fn champion_comes_from_recorded_winner() {
    let seasons = vec![
        season("2024", vec![roster(1, "u1", 1, 0, 120.0)], None),
        season(
            "2023",
            vec![roster(1, "u1", 11, 3, 1700.0), roster(2, "u2", 8, 6, 1500.25)],
            Some(2),
        ),
    ];
    let champ = defending_champion(&seasons, "2024").expect("champion");
    assert_eq!(champ.season, "2023");
    assert_eq!(champ.team, "Manager u2");
    assert_eq!(champ.record, "8-6");
    assert_eq!(champ.points_for, "1500.25");
    assert_eq!(champ.basis, ChampionBasis::LeagueWinner);
}

#[test]
fn champion_falls_back_to_previous_leader() {
    let seasons = vec![
        season("2024", vec![], None),
        season(
            "2023",
            vec![roster(1, "u1", 7, 7, 1400.0), roster(2, "u2", 9, 5, 1300.0)],
            Some(9),
        ),
    ];
    let champ = defending_champion(&seasons, "2024").expect("champion");
    assert_eq!(champ.roster_id, 2);
    assert_eq!(champ.basis, ChampionBasis::TopOfStandings);
}

#[test]
fn no_previous_season_means_no_champion() {
    let only_current = vec![season("2024", vec![roster(1, "u1", 3, 1, 400.0)], Some(1))];
    assert!(defending_champion(&only_current, "2024").is_none());

    let unplayed = vec![
        season("2024", vec![], None),
        season("2023", vec![roster(1, "u1", 0, 0, 0.0)], None),
    ];
    assert!(defending_champion(&unplayed, "2024").is_none());
}

#[test]
fn league_table_from_fixtures() {
    let current = SeasonData {
        season: "2024".into(),
        rosters: parse_rosters_json(&read_fixture("sleeper_rosters.json")).expect("rosters"),
        users: parse_users_json(&read_fixture("sleeper_users.json")).expect("users"),
        champion_roster_id: None,
    };
    let table = compute_league_table(&[current], "2024");

    let teams: Vec<&str> = table.standings.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["Aces High", "Bob", "Team 3"]);
    assert_eq!(table.standings[0].points_for, "812.44");
    assert_eq!(table.power_rankings[0].power_score, "1312");
    assert!(table.defending_champion.is_none());

    let missing = compute_league_table(&[], "2024");
    assert!(missing.standings.is_empty());
    assert!(missing.power_rankings.is_empty());
}
