use std::collections::HashSet;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::model::{LeagueDataset, LeagueUser, MatchupEntry, Roster, SeasonData, WeekMatchups};
use crate::sleeper::LeagueInfo;

pub const DEFAULT_HISTORY_DEPTH: usize = 5;
pub const DEFAULT_TOTAL_WEEKS: u32 = 18;

/// Where league data comes from. The HTTP client implements it; tests plug
/// in fixed data.
pub trait LeagueSource: Sync {
    fn league(&self, league_id: &str) -> Result<LeagueInfo>;
    fn rosters(&self, league_id: &str) -> Result<Vec<Roster>>;
    fn users(&self, league_id: &str) -> Result<Vec<LeagueUser>>;
    fn week_matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupEntry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    pub total_weeks: u32,
    pub max_depth: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            total_weeks: DEFAULT_TOTAL_WEEKS,
            max_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSnapshot {
    pub league: LeagueInfo,
    pub rosters: Vec<Roster>,
    pub users: Vec<LeagueUser>,
}

impl SeasonSnapshot {
    pub fn into_season_data(self) -> SeasonData {
        let champion_roster_id = self.league.winner_roster_id();
        SeasonData {
            season: self.league.season,
            rosters: self.rosters,
            users: self.users,
            champion_roster_id,
        }
    }
}

/// Previous seasons reached from `start`, newest first. Stops quietly at the
/// first league that fails to load, at a repeated id, or after `max_depth`
/// hops.
pub fn walk_previous_seasons<S>(source: &S, start: &LeagueInfo, max_depth: usize) -> Vec<SeasonSnapshot>
where
    S: LeagueSource + ?Sized,
{
    let mut out = Vec::new();
    let mut seen = HashSet::from([start.league_id.clone()]);
    let mut next = start.previous().map(str::to_string);

    while let Some(league_id) = next.take() {
        if out.len() >= max_depth {
            debug!(max_depth, "history depth reached");
            break;
        }
        if !seen.insert(league_id.clone()) {
            warn!(%league_id, "league history loops back on itself");
            break;
        }
        let league = match source.league(&league_id) {
            Ok(league) => league,
            Err(err) => {
                warn!(%league_id, error = %err, "previous season fetch failed");
                break;
            }
        };
        let rosters = source.rosters(&league_id).unwrap_or_else(|err| {
            warn!(%league_id, error = %err, "previous season rosters unavailable");
            Vec::new()
        });
        let users = source.users(&league_id).unwrap_or_else(|err| {
            warn!(%league_id, error = %err, "previous season users unavailable");
            Vec::new()
        });
        next = league.previous().map(str::to_string);
        out.push(SeasonSnapshot {
            league,
            rosters,
            users,
        });
    }
    out
}

/// Weeks 1..=total_weeks for one league, fetched in parallel. A week that
/// fails to load comes back empty.
pub fn collect_season_matchups<S>(
    source: &S,
    league_id: &str,
    season: &str,
    total_weeks: u32,
) -> Vec<WeekMatchups>
where
    S: LeagueSource + ?Sized,
{
    (1..=total_weeks)
        .into_par_iter()
        .map(|week| {
            let matchups = source.week_matchups(league_id, week).unwrap_or_else(|err| {
                warn!(%league_id, week, error = %err, "week matchups unavailable");
                Vec::new()
            });
            WeekMatchups {
                week,
                season: season.to_string(),
                matchups,
            }
        })
        .collect()
}

pub fn assemble_seasons(current: SeasonData, previous: Vec<SeasonData>) -> Vec<SeasonData> {
    let mut seasons = Vec::with_capacity(previous.len() + 1);
    seasons.push(current);
    seasons.extend(previous);
    seasons
}

/// Current league plus its history, ready for the engine. Only failures on
/// the current league are errors.
pub fn load_league_dataset<S>(source: &S, league_id: &str, opts: &HistoryOptions) -> Result<LeagueDataset>
where
    S: LeagueSource + ?Sized,
{
    let league = source
        .league(league_id)
        .with_context(|| format!("load league {league_id}"))?;
    let rosters = source
        .rosters(league_id)
        .with_context(|| format!("load rosters for {league_id}"))?;
    let users = source
        .users(league_id)
        .with_context(|| format!("load users for {league_id}"))?;

    let previous = walk_previous_seasons(source, &league, opts.max_depth);

    let mut matchups = collect_season_matchups(source, league_id, &league.season, opts.total_weeks);
    for snapshot in &previous {
        matchups.extend(collect_season_matchups(
            source,
            &snapshot.league.league_id,
            &snapshot.league.season,
            opts.total_weeks,
        ));
    }

    let current_season = league.season.clone();
    let current = SeasonData {
        season: current_season.clone(),
        rosters,
        users,
        champion_roster_id: league.winner_roster_id(),
    };
    let seasons = assemble_seasons(
        current,
        previous.into_iter().map(SeasonSnapshot::into_season_data).collect(),
    );

    info!(
        league = league_id,
        seasons = seasons.len(),
        weeks = matchups.len(),
        "league history loaded"
    );

    Ok(LeagueDataset {
        league_id: Some(league.league_id),
        current_season,
        seasons,
        matchups,
    })
}
