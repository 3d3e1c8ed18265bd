//! Current-season table, power rankings and the defending champion, read off
//! the roster settings the league API keeps up to date.

use std::slice;

use serde::{Deserialize, Serialize};

use crate::directory::SeasonDirectory;
use crate::model::{Roster, SeasonData};
use crate::report::{fmt_points, fmt_record};

/// Weight of one win in the power score, in points.
pub const POWER_POINTS_PER_WIN: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: usize,
    pub roster_id: u32,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub record: String,
    pub points_for: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerRankingRow {
    pub rank: usize,
    pub roster_id: u32,
    pub team: String,
    pub record: String,
    pub points_for: String,
    pub power_score: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChampionBasis {
    /// The league recorded a playoff winner.
    LeagueWinner,
    /// No winner on record; the regular-season leader stands in.
    TopOfStandings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Champion {
    pub season: String,
    pub roster_id: u32,
    pub team: String,
    pub record: String,
    pub points_for: String,
    pub basis: ChampionBasis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueTable {
    pub standings: Vec<StandingRow>,
    pub power_rankings: Vec<PowerRankingRow>,
    pub defending_champion: Option<Champion>,
}

pub fn power_score(roster: &Roster) -> f64 {
    f64::from(roster.wins) * POWER_POINTS_PER_WIN + roster.points_for
}

/// Wins first, then points for. Rosters equal on both keep their API order.
fn ordered_by_standing(season: &SeasonData) -> Vec<&Roster> {
    let mut rosters: Vec<&Roster> = season.rosters.iter().collect();
    rosters.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.total_cmp(&a.points_for))
    });
    rosters
}

pub fn compute_standings(season: &SeasonData) -> Vec<StandingRow> {
    let dir = SeasonDirectory::new(slice::from_ref(season));
    ordered_by_standing(season)
        .into_iter()
        .enumerate()
        .map(|(idx, r)| StandingRow {
            rank: idx + 1,
            roster_id: r.roster_id,
            team: dir.team_name(&season.season, r.roster_id),
            wins: r.wins,
            losses: r.losses,
            ties: r.ties,
            record: fmt_record(r.wins, r.losses, r.ties),
            points_for: fmt_points(r.points_for),
        })
        .collect()
}

pub fn compute_power_rankings(season: &SeasonData) -> Vec<PowerRankingRow> {
    let dir = SeasonDirectory::new(slice::from_ref(season));
    let mut rosters: Vec<&Roster> = season.rosters.iter().collect();
    rosters.sort_by(|a, b| power_score(b).total_cmp(&power_score(a)));
    rosters
        .into_iter()
        .enumerate()
        .map(|(idx, r)| PowerRankingRow {
            rank: idx + 1,
            roster_id: r.roster_id,
            team: dir.team_name(&season.season, r.roster_id),
            record: fmt_record(r.wins, r.losses, r.ties),
            points_for: format!("{:.1}", r.points_for),
            power_score: format!("{:.0}", power_score(r)),
        })
        .collect()
}

/// Champion of the season before `current_season`: the first other season
/// in `seasons`, which history assembly orders newest first.
pub fn defending_champion(seasons: &[SeasonData], current_season: &str) -> Option<Champion> {
    let previous = seasons.iter().find(|s| s.season != current_season)?;

    let recorded = previous
        .champion_roster_id
        .and_then(|id| previous.rosters.iter().find(|r| r.roster_id == id));
    let (roster, basis) = match recorded {
        Some(roster) => (roster, ChampionBasis::LeagueWinner),
        None => {
            let leader = ordered_by_standing(previous)
                .into_iter()
                .find(|r| r.games() > 0)?;
            (leader, ChampionBasis::TopOfStandings)
        }
    };

    let dir = SeasonDirectory::new(slice::from_ref(previous));
    Some(Champion {
        season: previous.season.clone(),
        roster_id: roster.roster_id,
        team: dir.team_name(&previous.season, roster.roster_id),
        record: fmt_record(roster.wins, roster.losses, roster.ties),
        points_for: fmt_points(roster.points_for),
        basis,
    })
}

/// Table for `current_season`. Missing season data gives empty lists.
pub fn compute_league_table(seasons: &[SeasonData], current_season: &str) -> LeagueTable {
    let current = seasons.iter().find(|s| s.season == current_season);
    LeagueTable {
        standings: current.map(compute_standings).unwrap_or_default(),
        power_rankings: current.map(compute_power_rankings).unwrap_or_default(),
        defending_champion: defending_champion(seasons, current_season),
    }
}
