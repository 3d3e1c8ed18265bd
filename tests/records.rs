use league_almanac::model::{MatchupEntry, SeasonData, WeekMatchups};
use league_almanac::records::compute_record_book;

fn week(season: &str, week: u32, scores: &[(u32, f64)]) -> WeekMatchups {
    WeekMatchups {
        week,
        season: season.to_string(),
        matchups: scores
            .iter()
            .map(|&(roster_id, points)| MatchupEntry::new(roster_id, 1, points))
            .collect(),
    }
}

fn league() -> Vec<WeekMatchups> {
    vec![
        week("2022", 1, &[(1, 101.0), (2, 88.0)]),
        week("2022", 2, &[(1, 130.5), (2, 0.0)]),
        week("2023", 1, &[(1, 95.0), (2, 150.0)]),
        week("2023", 2, &[(1, 70.0), (2, 88.0)]),
        week("2024", 1, &[(1, 40.0), (2, 160.0)]),
    ]
}

#[test]
fn highest_weeks_span_all_seasons() {
    let book = compute_record_book(&league(), &[], "2024", 3, true);
    let points: Vec<&str> = book
        .highest_single_week
        .iter()
        .map(|r| r.points.as_str())
        .collect();
    assert_eq!(points, vec!["160.00", "150.00", "130.50"]);
    assert_eq!(book.highest_single_week[0].season, "2024");
}

#[test]
fn lowest_weeks_skip_current_season_and_unplayed() {
    let book = compute_record_book(&league(), &[], "2024", 3, true);
    let low: Vec<(&str, &str)> = book
        .lowest_single_week
        .iter()
        .map(|r| (r.points.as_str(), r.season.as_str()))
        .collect();
    // 40.00 is current-season, 0.00 was never played.
    assert_eq!(low, vec![("70.00", "2023"), ("88.00", "2023"), ("88.00", "2022")]);
}

#[test]
fn season_totals_rank_and_average() {
    let book = compute_record_book(&league(), &[], "2024", 10, true);
    let top = &book.highest_season_points[0];
    assert_eq!((top.team.as_str(), top.season.as_str()), ("Team 2", "2023"));
    assert_eq!(top.points, "238.00");
    assert_eq!(top.average, "119.00");

    let bottom = &book.lowest_season_points[0];
    assert_eq!((bottom.team.as_str(), bottom.season.as_str()), ("Team 2", "2022"));
    assert_eq!(bottom.average, "88.00");
    assert!(book.lowest_season_points.iter().all(|r| r.season != "2024"));
}

#[test]
fn summary_matches_leaderboards() {
    let book = compute_record_book(&league(), &[], "2024", 2, true);
    assert_eq!(book.summary.total_games_played, 9);
    assert_eq!(book.summary.highest_score, book.highest_single_week.first().cloned());
    assert_eq!(book.summary.lowest_score, book.lowest_single_week.first().cloned());
    assert_eq!(book.highest_single_week.len(), 2);
}

#[test]
fn names_resolve_through_season_data() {
    let seasons: Vec<SeasonData> = serde_json::from_str(
        r#"[{"season":"2023","rosters":[{"roster_id":2,"owner_id":"u2","settings":{}}],
            "users":[{"user_id":"u2","display_name":"Bob","metadata":{"team_name":"Bob's Bombers"}}]}]"#,
    )
    .expect("seasons json");
    let book = compute_record_book(&league(), &seasons, "2024", 1, true);
    assert_eq!(book.highest_season_points[0].team, "Bob's Bombers");
}

#[test]
fn empty_input_gives_empty_book() {
    let book = compute_record_book(&[], &[], "2024", 10, true);
    assert!(book.highest_single_week.is_empty());
    assert_eq!(book.summary.total_games_played, 0);
    assert!(book.summary.average_score.is_none());
}
