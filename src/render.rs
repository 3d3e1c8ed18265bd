//! Plain-text rendering of a report for terminal output.

use std::fmt::Write;

use crate::records::RecordBook;
use crate::report::{
    LuckRecord, RecordLine, SeasonPointsRecord, StatsReport, StreakRecord, WeekCountRecord,
    WeeklyScoreRecord,
};
use crate::standings::{ChampionBasis, LeagueTable};

const NA: &str = "n/a";

pub fn render_report(report: &StatsReport) -> String {
    let mut out = String::new();

    section(&mut out, "Scoring extremes");
    let ex = &report.scoring_extremes;
    row(&mut out, "Highest score", ex.highest_score.as_ref().map(score_line));
    row(&mut out, "Lowest score", ex.lowest_score.as_ref().map(score_line));
    row(
        &mut out,
        "Biggest blowout",
        ex.biggest_blowout.as_ref().map(|b| {
            format!(
                "{} {} def. {} {} by {} ({} wk {})",
                b.winner, b.winner_points, b.loser, b.loser_points, b.margin, b.season, b.week
            )
        }),
    );
    row(
        &mut out,
        "Closest game",
        ex.closest_game.as_ref().map(|c| {
            format!(
                "{} {} vs {} {}, margin {} ({} wk {})",
                c.team1, c.team1_points, c.team2, c.team2_points, c.margin, c.season, c.week
            )
        }),
    );
    row(&mut out, "Most points in a loss", ex.most_points_in_loss.as_ref().map(score_line));
    row(&mut out, "Fewest points in a win", ex.fewest_points_in_win.as_ref().map(score_line));

    section(&mut out, "League");
    let c = &report.consistency;
    row(&mut out, "Games played", Some(c.total_games_played.to_string()));
    row(&mut out, "Average score", c.league_average_score.clone());
    row(&mut out, "Total points", c.total_points_scored.clone());

    section(&mut out, "Streaks");
    let d = &report.domination;
    row(&mut out, "Longest win streak", d.longest_win_streak.as_ref().map(streak_line));
    row(&mut out, "Longest losing streak", d.longest_losing_streak.as_ref().map(streak_line));

    section(&mut out, "Seasons");
    let s = &report.season_records;
    let record = |r: &RecordLine| {
        format!("{} {} ({}%, {})", r.team, r.record, r.win_pct, r.season)
    };
    let points = |p: &SeasonPointsRecord| {
        format!("{} {} pts, {}/wk ({})", p.team, p.points, p.average, p.season)
    };
    row(&mut out, "Best record", s.best_record.as_ref().map(record));
    row(&mut out, "Worst record", s.worst_record.as_ref().map(record));
    row(&mut out, "Most points", s.most_points_season.as_ref().map(points));
    row(&mut out, "Fewest points", s.fewest_points_season.as_ref().map(points));

    section(&mut out, "Weekly");
    let w = &report.weekly;
    let count = |r: &WeekCountRecord| {
        format!("{} x{} at {} ({})", r.team, r.count, r.threshold, r.season)
    };
    row(&mut out, "Most high-scoring weeks", w.most_high_scoring_weeks.as_ref().map(count));
    row(&mut out, "Most low-scoring weeks", w.most_low_scoring_weeks.as_ref().map(count));

    section(&mut out, "Managers");
    let m = &report.manager_records;
    row(
        &mut out,
        "Winningest",
        m.winningest_manager
            .as_ref()
            .map(|r| format!("{} {} ({}%)", r.manager, r.record, r.win_pct)),
    );
    row(
        &mut out,
        "Most points",
        m.most_points_manager
            .as_ref()
            .map(|r| format!("{} {} pts, {}/game", r.manager, r.points, r.average)),
    );
    row(
        &mut out,
        "Most points against",
        m.most_points_against.as_ref().map(|r| {
            format!(
                "{} {}/game, {} total",
                r.manager, r.avg_opponent_score, r.total_opponent_points
            )
        }),
    );

    section(&mut out, "Luck");
    let f = &report.fun_stats;
    let luck = |r: &LuckRecord| {
        format!("{} {} with {} pts ({})", r.team, r.record, r.points, r.season)
    };
    row(&mut out, "Unluckiest", f.unluckiest_team.as_ref().map(luck));
    row(&mut out, "Luckiest", f.luckiest_team.as_ref().map(luck));

    out
}

pub fn render_record_book(book: &RecordBook) -> String {
    let mut out = String::new();

    section(&mut out, "Record book");
    let sum = &book.summary;
    row(&mut out, "Games played", Some(sum.total_games_played.to_string()));
    row(&mut out, "Average score", sum.average_score.clone());
    row(&mut out, "Highest score", sum.highest_score.as_ref().map(score_line));
    row(&mut out, "Lowest score", sum.lowest_score.as_ref().map(score_line));

    ranked(&mut out, "Highest single week", book.highest_single_week.iter().map(score_line));
    ranked(&mut out, "Lowest single week", book.lowest_single_week.iter().map(score_line));
    ranked(
        &mut out,
        "Highest season points",
        book.highest_season_points
            .iter()
            .map(|p| format!("{} {} ({}, {}/wk)", p.team, p.points, p.season, p.average)),
    );
    ranked(
        &mut out,
        "Lowest season points",
        book.lowest_season_points
            .iter()
            .map(|p| format!("{} {} ({}, {}/wk)", p.team, p.points, p.season, p.average)),
    );

    out
}

pub fn render_league_table(table: &LeagueTable) -> String {
    let mut out = String::new();

    section(&mut out, "Standings");
    row(
        &mut out,
        "Defending champion",
        table.defending_champion.as_ref().map(|c| {
            let note = match c.basis {
                ChampionBasis::LeagueWinner => "",
                ChampionBasis::TopOfStandings => ", regular season",
            };
            format!("{} {} {} pts ({}{note})", c.team, c.record, c.points_for, c.season)
        }),
    );
    ranked(
        &mut out,
        "Table",
        table
            .standings
            .iter()
            .map(|s| format!("{} {} {} pts", s.team, s.record, s.points_for)),
    );
    ranked(
        &mut out,
        "Power rankings",
        table
            .power_rankings
            .iter()
            .map(|p| {
                format!("{} {} {} pts, score {}", p.team, p.record, p.points_for, p.power_score)
            }),
    );

    out
}

fn score_line(r: &WeeklyScoreRecord) -> String {
    format!("{} {} ({} wk {})", r.team, r.points, r.season, r.week)
}

fn streak_line(r: &StreakRecord) -> String {
    format!("{} {} games, {} {}", r.team, r.streak, r.season, r.weeks)
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

fn row(out: &mut String, label: &str, value: Option<String>) {
    let value = value.unwrap_or_else(|| NA.to_string());
    let _ = writeln!(out, "  {label:<24} {value}");
}

fn ranked(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let _ = writeln!(out, "\n  {title}");
    let mut any = false;
    for (idx, line) in lines.enumerate() {
        any = true;
        let _ = writeln!(out, "  {:>4}. {line}", idx + 1);
    }
    if !any {
        let _ = writeln!(out, "        {NA}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::Champion;

    #[test]
    fn empty_report_renders_placeholders() {
        let text = render_report(&StatsReport::default());
        assert!(text.starts_with("Scoring extremes\n"));
        assert!(text.contains("Highest score"));
        assert!(text.contains(NA));
        assert!(text.contains("Games played             0"));
    }

    #[test]
    fn ranked_lists_are_numbered() {
        let mut book = RecordBook::default();
        book.highest_single_week.push(WeeklyScoreRecord {
            team: "Aces".into(),
            points: "150.10".into(),
            week: 3,
            season: "2023".into(),
        });
        let text = render_record_book(&book);
        assert!(text.contains("     1. Aces 150.10 (2023 wk 3)"));
    }

    #[test]
    fn league_table_marks_stand_in_champion() {
        let table = LeagueTable {
            defending_champion: Some(Champion {
                season: "2023".into(),
                roster_id: 2,
                team: "Bob".into(),
                record: "10-4".into(),
                points_for: "1650.20".into(),
                basis: ChampionBasis::TopOfStandings,
            }),
            ..LeagueTable::default()
        };
        let text = render_league_table(&table);
        assert!(text.starts_with("Standings\n"));
        assert!(text.contains("Bob 10-4 1650.20 pts (2023, regular season)"));
        assert!(text.contains("  Power rankings\n        n/a"));
    }
}
