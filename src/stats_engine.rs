//! All-time statistics over every fetched season.
//!
//! `compute_all_time_stats` is a pure, single pass over in-memory data: it
//! never fails for data-quality reasons, it only degrades. Unresolvable
//! names become placeholders, unplayed weeks are skipped, and unpairable
//! score lines still count as weekly scores.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::directory::SeasonDirectory;
use crate::model::{SeasonData, WeekMatchups};
use crate::pairing::{MatchupPairing, Outcome, reconstruct_pairings};
use crate::report::{
    BlowoutRecord, CloseGameRecord, Consistency, Domination, FunStats, LuckRecord,
    ManagerPointsRecord, ManagerRecords, PointsAgainstRecord, RecordLine, ScoringExtremes,
    SeasonPointsRecord, SeasonRecords, StatsReport, StreakRecord, WeekCountRecord,
    WeeklyScoreRecord, WeeklySuperlatives, WinningestRecord, fmt_pct, fmt_points, fmt_record,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Treat an exact 0.0 score as "not played yet".
    pub zero_is_unplayed: bool,
    /// Weeks never eligible for the all-time lowest score, in any season.
    pub lowest_score_excluded_weeks: Vec<u32>,
    /// Weeks at or above this count as high-scoring weeks.
    pub high_score_threshold: f64,
    /// Weeks strictly below this count as low-scoring weeks.
    pub low_score_threshold: f64,
    /// Points one win is "worth" in the luck heuristics.
    pub luck_points_per_win: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zero_is_unplayed: true,
            lowest_score_excluded_weeks: vec![18],
            high_score_threshold: 150.0,
            low_score_threshold: 100.0,
            luck_points_per_win: 100.0,
        }
    }
}

/// A played week for one roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyScore<'a> {
    pub season: &'a str,
    pub week: u32,
    pub roster_id: u32,
    pub points: f64,
}

/// Every played score line, in input order.
pub fn played_scores(matchups: &[WeekMatchups], zero_is_unplayed: bool) -> Vec<WeeklyScore<'_>> {
    matchups
        .iter()
        .flat_map(|week| {
            week.matchups.iter().filter_map(move |entry| {
                entry
                    .played_points(zero_is_unplayed)
                    .map(|points| WeeklyScore {
                        season: week.season.as_str(),
                        week: week.week,
                        roster_id: entry.roster_id,
                        points,
                    })
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSpan {
    pub length: u32,
    pub first_week: u32,
    pub last_week: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStreaks {
    pub win: Option<StreakSpan>,
    pub loss: Option<StreakSpan>,
}

/// Longest win and loss runs for one roster in one season, walking its
/// games in week order. Unplayed weeks are not games, so they neither
/// extend nor break a run.
pub fn team_streaks(pairings: &[MatchupPairing], season: &str, roster_id: u32) -> TeamStreaks {
    let mut games: Vec<&MatchupPairing> = pairings
        .iter()
        .filter(|p| p.season == season && p.involves(roster_id))
        .collect();
    games.sort_by_key(|p| p.week);
    walk_streaks(&games, roster_id)
}

#[derive(Default)]
struct RunTracker {
    current: u32,
    start: u32,
    best: Option<StreakSpan>,
}

impl RunTracker {
    fn extend(&mut self, week: u32) {
        if self.current == 0 {
            self.start = week;
        }
        self.current += 1;
        if self.best.is_none_or(|b| self.current > b.length) {
            self.best = Some(StreakSpan {
                length: self.current,
                first_week: self.start,
                last_week: week,
            });
        }
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}

fn walk_streaks(games: &[&MatchupPairing], roster_id: u32) -> TeamStreaks {
    let mut wins = RunTracker::default();
    let mut losses = RunTracker::default();
    for game in games {
        match game.outcome_for(roster_id) {
            Some(Outcome::Win) => {
                wins.extend(game.week);
                losses.reset();
            }
            Some(Outcome::Loss) => {
                losses.extend(game.week);
                wins.reset();
            }
            None => {}
        }
    }
    TeamStreaks {
        win: wins.best,
        loss: losses.best,
    }
}

struct TeamSeason<'a> {
    season: &'a str,
    roster_id: u32,
    team_name: String,
    user_id: Option<&'a str>,
    scored_weeks: u32,
    total_points: f64,
    wins: u32,
    losses: u32,
    ties: u32,
}

struct SeasonLine<'t> {
    team_name: &'t str,
    season: &'t str,
    wins: u32,
    losses: u32,
    ties: u32,
    total_points: f64,
    average: f64,
    win_pct: f64,
}

pub fn compute_all_time_stats(
    matchups: &[WeekMatchups],
    seasons: &[SeasonData],
    current_season: &str,
    cfg: &EngineConfig,
) -> StatsReport {
    if matchups.is_empty() {
        return StatsReport::default();
    }

    let dir = SeasonDirectory::new(seasons);
    let scores = played_scores(matchups, cfg.zero_is_unplayed);
    let pairings = reconstruct_pairings(matchups, cfg.zero_is_unplayed);
    let team_seasons = collect_team_seasons(&scores, &dir);
    let lines = season_lines(&team_seasons, current_season);
    debug!(
        weeks = matchups.len(),
        scores = scores.len(),
        pairings = pairings.len(),
        team_seasons = team_seasons.len(),
        "computing all-time stats"
    );

    StatsReport {
        scoring_extremes: scoring_extremes(&scores, &pairings, &dir, current_season, cfg),
        consistency: consistency(&scores),
        domination: domination(&team_seasons, &pairings),
        season_records: season_records(&lines),
        weekly: weekly_superlatives(&scores, &dir, cfg),
        manager_records: manager_records(&scores, &team_seasons, &pairings, &dir),
        fun_stats: fun_stats(&lines, cfg),
    }
}

fn collect_team_seasons<'a>(
    scores: &[WeeklyScore<'a>],
    dir: &SeasonDirectory<'a>,
) -> Vec<TeamSeason<'a>> {
    let mut out: Vec<TeamSeason<'a>> = Vec::new();
    let mut index: HashMap<(&'a str, u32), usize> = HashMap::new();
    for score in scores {
        let slot = *index.entry((score.season, score.roster_id)).or_insert_with(|| {
            let roster = dir.roster(score.season, score.roster_id);
            out.push(TeamSeason {
                season: score.season,
                roster_id: score.roster_id,
                team_name: dir.team_name(score.season, score.roster_id),
                user_id: dir.user_id(score.season, score.roster_id),
                scored_weeks: 0,
                total_points: 0.0,
                wins: roster.map_or(0, |r| r.wins),
                losses: roster.map_or(0, |r| r.losses),
                ties: roster.map_or(0, |r| r.ties),
            });
            out.len() - 1
        });
        let team = &mut out[slot];
        team.scored_weeks += 1;
        team.total_points += score.points;
    }
    out
}

fn season_lines<'t>(teams: &'t [TeamSeason<'_>], current_season: &str) -> Vec<SeasonLine<'t>> {
    teams
        .iter()
        .filter(|t| t.season != current_season)
        .map(|t| {
            let games = t.wins + t.losses + t.ties;
            let win_pct = if games > 0 {
                f64::from(t.wins) / f64::from(games)
            } else {
                0.0
            };
            let divisor = if games > 0 { games } else { t.scored_weeks };
            let average = if divisor > 0 {
                t.total_points / f64::from(divisor)
            } else {
                0.0
            };
            SeasonLine {
                team_name: &t.team_name,
                season: t.season,
                wins: t.wins,
                losses: t.losses,
                ties: t.ties,
                total_points: t.total_points,
                average,
                win_pct,
            }
        })
        .collect()
}

fn weekly_record(score: &WeeklyScore<'_>, dir: &SeasonDirectory<'_>) -> WeeklyScoreRecord {
    WeeklyScoreRecord {
        team: dir.team_name(score.season, score.roster_id),
        points: fmt_points(score.points),
        week: score.week,
        season: score.season.to_string(),
    }
}

fn scoring_extremes(
    scores: &[WeeklyScore<'_>],
    pairings: &[MatchupPairing],
    dir: &SeasonDirectory<'_>,
    current_season: &str,
    cfg: &EngineConfig,
) -> ScoringExtremes {
    let highest_score = first_max_by(scores, |s| s.points).map(|s| weekly_record(s, dir));

    let lowest_score = last_min_by(
        scores.iter().filter(|s| {
            s.season != current_season && !cfg.lowest_score_excluded_weeks.contains(&s.week)
        }),
        |s| s.points,
    )
    .map(|s| weekly_record(s, dir));

    let biggest_blowout = first_max_by(pairings, |p| p.margin()).map(|p| BlowoutRecord {
        winner: dir.team_name(&p.season, p.winner().roster_id),
        winner_points: fmt_points(p.winner().points),
        loser: dir.team_name(&p.season, p.loser().roster_id),
        loser_points: fmt_points(p.loser().points),
        margin: fmt_points(p.margin()),
        week: p.week,
        season: p.season.clone(),
    });

    let closest_game = first_min_by(pairings, |p| p.margin()).map(|p| CloseGameRecord {
        team1: dir.team_name(&p.season, p.team1.roster_id),
        team1_points: fmt_points(p.team1.points),
        team2: dir.team_name(&p.season, p.team2.roster_id),
        team2_points: fmt_points(p.team2.points),
        margin: fmt_points(p.margin()),
        week: p.week,
        season: p.season.clone(),
    });

    let side_record = |p: &MatchupPairing, roster_id: u32, points: f64| WeeklyScoreRecord {
        team: dir.team_name(&p.season, roster_id),
        points: fmt_points(points),
        week: p.week,
        season: p.season.clone(),
    };

    let most_points_in_loss = first_max_by(pairings, |p| p.loser().points)
        .map(|p| side_record(p, p.loser().roster_id, p.loser().points));

    let fewest_points_in_win = first_min_by(
        pairings.iter().filter(|p| p.season != current_season),
        |p| p.winner().points,
    )
    .map(|p| side_record(p, p.winner().roster_id, p.winner().points));

    ScoringExtremes {
        highest_score,
        lowest_score,
        biggest_blowout,
        closest_game,
        most_points_in_loss,
        fewest_points_in_win,
    }
}

fn consistency(scores: &[WeeklyScore<'_>]) -> Consistency {
    let total: f64 = scores.iter().map(|s| s.points).sum();
    let average = if scores.is_empty() {
        0.0
    } else {
        total / scores.len() as f64
    };
    Consistency {
        total_games_played: scores.len(),
        league_average_score: Some(fmt_points(average)),
        total_points_scored: Some(fmt_points(total)),
    }
}

fn domination(teams: &[TeamSeason<'_>], pairings: &[MatchupPairing]) -> Domination {
    let mut by_team: HashMap<(&str, u32), Vec<&MatchupPairing>> = HashMap::new();
    for p in pairings {
        by_team
            .entry((p.season.as_str(), p.team1.roster_id))
            .or_default()
            .push(p);
        by_team
            .entry((p.season.as_str(), p.team2.roster_id))
            .or_default()
            .push(p);
    }

    let streaks: Vec<(&TeamSeason<'_>, TeamStreaks)> = teams
        .iter()
        .map(|team| {
            let mut games = by_team
                .get(&(team.season, team.roster_id))
                .cloned()
                .unwrap_or_default();
            games.sort_by_key(|p| p.week);
            (team, walk_streaks(&games, team.roster_id))
        })
        .collect();

    let to_record = |team: &TeamSeason<'_>, span: StreakSpan| StreakRecord {
        team: team.team_name.clone(),
        streak: span.length,
        season: team.season.to_string(),
        first_week: span.first_week,
        last_week: span.last_week,
        weeks: format!("Weeks {}-{}", span.first_week, span.last_week),
    };

    let longest_win_streak = first_max_by(
        streaks.iter().filter_map(|(team, s)| s.win.map(|span| (*team, span))),
        |(_, span)| f64::from(span.length),
    )
    .map(|(team, span)| to_record(team, span));

    let longest_losing_streak = first_max_by(
        streaks.iter().filter_map(|(team, s)| s.loss.map(|span| (*team, span))),
        |(_, span)| f64::from(span.length),
    )
    .map(|(team, span)| to_record(team, span));

    Domination {
        longest_win_streak,
        longest_losing_streak,
    }
}

fn season_records(lines: &[SeasonLine<'_>]) -> SeasonRecords {
    let record_line = |l: &SeasonLine<'_>| RecordLine {
        team: l.team_name.to_string(),
        season: l.season.to_string(),
        record: fmt_record(l.wins, l.losses, l.ties),
        win_pct: fmt_pct(l.win_pct),
    };
    let points_line = |l: &SeasonLine<'_>| SeasonPointsRecord {
        team: l.team_name.to_string(),
        season: l.season.to_string(),
        points: fmt_points(l.total_points),
        average: fmt_points(l.average),
    };

    SeasonRecords {
        best_record: first_max_by(lines, |l| l.win_pct).map(record_line),
        worst_record: first_min_by(lines, |l| l.win_pct).map(record_line),
        most_points_season: first_max_by(lines, |l| l.total_points).map(points_line),
        fewest_points_season: first_min_by(lines, |l| l.total_points).map(points_line),
    }
}

fn weekly_superlatives(
    scores: &[WeeklyScore<'_>],
    dir: &SeasonDirectory<'_>,
    cfg: &EngineConfig,
) -> WeeklySuperlatives {
    let mut high = Tally::default();
    let mut low = Tally::default();
    for s in scores {
        if s.points >= cfg.high_score_threshold {
            high.bump((s.season, s.roster_id));
        }
        if s.points < cfg.low_score_threshold {
            low.bump((s.season, s.roster_id));
        }
    }

    let to_record = |((season, roster_id), count): ((&str, u32), u32), threshold: f64| {
        WeekCountRecord {
            team: dir.team_name(season, roster_id),
            season: season.to_string(),
            count,
            threshold: format!("{threshold}"),
        }
    };

    WeeklySuperlatives {
        most_high_scoring_weeks: high
            .top()
            .map(|entry| to_record(entry, cfg.high_score_threshold)),
        most_low_scoring_weeks: low
            .top()
            .map(|entry| to_record(entry, cfg.low_score_threshold)),
    }
}

struct ManagerTally<'a> {
    name: &'a str,
    total_points: f64,
    games: u32,
    wins: u32,
    losses: u32,
    ties: u32,
    opponent_points: f64,
}

fn manager_records(
    scores: &[WeeklyScore<'_>],
    teams: &[TeamSeason<'_>],
    pairings: &[MatchupPairing],
    dir: &SeasonDirectory<'_>,
) -> ManagerRecords {
    let mut managers: Vec<ManagerTally<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for s in scores {
        let (Some(user_id), Some(name)) = (
            dir.user_id(s.season, s.roster_id),
            dir.manager_name(s.season, s.roster_id),
        ) else {
            continue;
        };
        let slot = *index.entry(user_id).or_insert_with(|| {
            managers.push(ManagerTally {
                name,
                total_points: 0.0,
                games: 0,
                wins: 0,
                losses: 0,
                ties: 0,
                opponent_points: 0.0,
            });
            managers.len() - 1
        });
        managers[slot].total_points += s.points;
        managers[slot].games += 1;
    }

    for team in teams {
        let Some(slot) = team.user_id.and_then(|id| index.get(id).copied()) else {
            continue;
        };
        managers[slot].wins += team.wins;
        managers[slot].losses += team.losses;
        managers[slot].ties += team.ties;
    }

    for p in pairings {
        for roster_id in [p.team1.roster_id, p.team2.roster_id] {
            let Some(slot) = dir
                .user_id(&p.season, roster_id)
                .and_then(|id| index.get(id).copied())
            else {
                continue;
            };
            managers[slot].opponent_points += p.opponent_points(roster_id).unwrap_or(0.0);
        }
    }

    ManagerRecords {
        winningest_manager: first_max_by(&managers, |m| manager_win_pct(m)).map(|m| WinningestRecord {
            manager: m.name.to_string(),
            record: fmt_record(m.wins, m.losses, m.ties),
            win_pct: fmt_pct(manager_win_pct(m)),
        }),
        most_points_manager: first_max_by(&managers, |m| m.total_points).map(|m| {
            ManagerPointsRecord {
                manager: m.name.to_string(),
                points: fmt_points(m.total_points),
                average: fmt_points(manager_per_game(m.total_points, m)),
            }
        }),
        most_points_against: first_max_by(&managers, |m| manager_per_game(m.opponent_points, m)).map(
            |m| PointsAgainstRecord {
                manager: m.name.to_string(),
                avg_opponent_score: fmt_points(manager_per_game(m.opponent_points, m)),
                total_opponent_points: fmt_points(m.opponent_points),
            },
        ),
    }
}

fn manager_win_pct(m: &ManagerTally<'_>) -> f64 {
    let games = m.wins + m.losses + m.ties;
    if games > 0 {
        f64::from(m.wins) / f64::from(games)
    } else {
        0.0
    }
}

fn manager_per_game(total: f64, m: &ManagerTally<'_>) -> f64 {
    if m.games > 0 {
        total / f64::from(m.games)
    } else {
        0.0
    }
}

fn fun_stats(lines: &[SeasonLine<'_>], cfg: &EngineConfig) -> FunStats {
    let per_win = cfg.luck_points_per_win;
    let to_record = |l: &SeasonLine<'_>| LuckRecord {
        team: l.team_name.to_string(),
        season: l.season.to_string(),
        record: format!("{}-{}", l.wins, l.losses),
        points: fmt_points(l.total_points),
    };

    FunStats {
        unluckiest_team: first_max_by(lines, |l| l.total_points - f64::from(l.wins) * per_win)
            .map(to_record),
        luckiest_team: first_max_by(lines.iter().filter(|l| l.wins > l.losses), |l| {
            f64::from(l.wins) * per_win - l.total_points
        })
        .map(to_record),
    }
}

/// Insertion-ordered counter.
struct Tally<K> {
    order: Vec<(K, u32)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Tally<K> {
    fn bump(&mut self, key: K) {
        let slot = *self.index.entry(key).or_insert_with(|| {
            self.order.push((key, 0));
            self.order.len() - 1
        });
        self.order[slot].1 += 1;
    }

    fn top(&self) -> Option<(K, u32)> {
        first_max_by(self.order.iter().copied(), |(_, count)| f64::from(*count))
    }
}

// Selection helpers. Equal keys keep input order, the same result a stable
// sort followed by "take first" gives.

fn first_max_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    pick_by(items, key, |candidate, best| candidate > best)
}

fn first_min_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    pick_by(items, key, |candidate, best| candidate < best)
}

/// Last element among equal minimums (stable descending sort, take last).
fn last_min_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    pick_by(items, key, |candidate, best| candidate <= best)
}

fn pick_by<T>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> f64,
    replaces: impl Fn(f64, f64) -> bool,
) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let k = key(&item);
        let take = match &best {
            Some((_, best_key)) => replaces(k, *best_key),
            None => true,
        };
        if take {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_helpers_break_ties_by_position() {
        let items = [(1, 5.0), (2, 9.0), (3, 9.0), (4, 1.0), (5, 1.0)];
        assert_eq!(first_max_by(items, |i| i.1).map(|i| i.0), Some(2));
        assert_eq!(first_min_by(items, |i| i.1).map(|i| i.0), Some(4));
        assert_eq!(last_min_by(items, |i| i.1).map(|i| i.0), Some(5));
        assert!(first_max_by(Vec::<(u32, f64)>::new(), |i| i.1).is_none());
    }

    #[test]
    fn tally_reports_first_seen_on_equal_counts() {
        let mut tally = Tally::default();
        tally.bump(("2022", 4));
        tally.bump(("2022", 2));
        tally.bump(("2022", 2));
        tally.bump(("2022", 4));
        assert_eq!(tally.top(), Some((("2022", 4), 2)));
    }

    #[test]
    fn run_tracker_keeps_first_longest_range() {
        let mut t = RunTracker::default();
        for w in [1, 2] {
            t.extend(w);
        }
        t.reset();
        for w in [5, 6] {
            t.extend(w);
        }
        let best = t.best.unwrap();
        assert_eq!((best.length, best.first_week, best.last_week), (2, 1, 2));
    }
}
