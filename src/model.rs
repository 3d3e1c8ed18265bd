use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One roster's score line for a single week, as the league API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub roster_id: u32,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
}

impl MatchupEntry {
    pub fn new(roster_id: u32, matchup_id: u32, points: f64) -> Self {
        Self {
            roster_id,
            matchup_id: Some(matchup_id),
            points: Some(points),
        }
    }

    /// Points for a week that actually counts, or `None` when the week has
    /// not been played. With `zero_is_unplayed` an exact 0.0 also means
    /// "not played", which is how the upstream API reports future weeks.
    pub fn played_points(&self, zero_is_unplayed: bool) -> Option<f64> {
        let points = self.points?;
        if !points.is_finite() {
            return None;
        }
        if zero_is_unplayed && points == 0.0 {
            return None;
        }
        Some(points)
    }
}

/// Every roster's score line for one (season, week). Weeks that failed to
/// fetch arrive with an empty `matchups` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMatchups {
    pub week: u32,
    pub season: String,
    #[serde(default)]
    pub matchups: Vec<MatchupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRoster", into = "RawRoster")]
pub struct Roster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Season points for, with the API's hundredths folded in.
    pub points_for: f64,
}

impl Roster {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// The API splits season points into whole points plus hundredths.
fn join_points(whole: Option<f64>, hundredths: Option<f64>) -> f64 {
    let total = whole.unwrap_or(0.0) + hundredths.unwrap_or(0.0) / 100.0;
    if total.is_finite() { total } else { 0.0 }
}

fn split_points(points: f64) -> (f64, f64) {
    let cents = (points * 100.0).round();
    let whole = (cents / 100.0).trunc();
    (whole, cents - whole * 100.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRoster {
    roster_id: u32,
    #[serde(default)]
    owner_id: Option<String>,
    #[serde(default)]
    settings: RawRosterSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRosterSettings {
    #[serde(default)]
    wins: Option<u32>,
    #[serde(default)]
    losses: Option<u32>,
    #[serde(default)]
    ties: Option<u32>,
    #[serde(default)]
    fpts: Option<f64>,
    #[serde(default)]
    fpts_decimal: Option<f64>,
}

impl From<RawRoster> for Roster {
    fn from(raw: RawRoster) -> Self {
        Self {
            roster_id: raw.roster_id,
            owner_id: raw.owner_id.filter(|id| !id.trim().is_empty()),
            wins: raw.settings.wins.unwrap_or(0),
            losses: raw.settings.losses.unwrap_or(0),
            ties: raw.settings.ties.unwrap_or(0),
            points_for: join_points(raw.settings.fpts, raw.settings.fpts_decimal),
        }
    }
}

impl From<Roster> for RawRoster {
    fn from(roster: Roster) -> Self {
        let (fpts, fpts_decimal) = split_points(roster.points_for);
        Self {
            roster_id: roster.roster_id,
            owner_id: roster.owner_id,
            settings: RawRosterSettings {
                wins: Some(roster.wins),
                losses: Some(roster.losses),
                ties: Some(roster.ties),
                fpts: Some(fpts),
                fpts_decimal: Some(fpts_decimal),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUser", into = "RawUser")]
pub struct LeagueUser {
    pub user_id: String,
    pub display_name: Option<String>,
    /// Custom team name; wins over the display name when naming a team.
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawUser {
    user_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    metadata: Option<RawUserMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawUserMetadata {
    #[serde(default)]
    team_name: Option<String>,
}

impl From<RawUser> for LeagueUser {
    fn from(raw: RawUser) -> Self {
        Self {
            user_id: raw.user_id,
            display_name: raw.display_name.and_then(non_blank),
            team_name: raw.metadata.and_then(|m| m.team_name).and_then(non_blank),
        }
    }
}

impl From<LeagueUser> for RawUser {
    fn from(user: LeagueUser) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
            metadata: Some(RawUserMetadata {
                team_name: user.team_name,
            }),
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Rosters and users for a single season. Roster ids only mean something
/// inside their own season; user ids are stable across seasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: String,
    #[serde(default)]
    pub rosters: Vec<Roster>,
    #[serde(default)]
    pub users: Vec<LeagueUser>,
    /// Roster the league marked as its champion once the season finished.
    #[serde(default)]
    pub champion_roster_id: Option<u32>,
}

/// Everything the engine needs, in one serializable bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueDataset {
    #[serde(default)]
    pub league_id: Option<String>,
    pub current_season: String,
    #[serde(default)]
    pub seasons: Vec<SeasonData>,
    #[serde(default)]
    pub matchups: Vec<WeekMatchups>,
}

impl LeagueDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dataset {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse dataset {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize dataset")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write dataset")?;
        fs::rename(&tmp, path).context("swap dataset")?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.matchups.is_empty() || self.seasons.is_empty()
    }
}

/// Count of score lines across all fetched weeks, played or not.
pub fn total_matchup_entries(matchups: &[WeekMatchups]) -> usize {
    matchups.iter().map(|w| w.matchups.len()).sum()
}
