use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::history::LeagueSource;
use crate::http_client::get_text;
use crate::model::{LeagueUser, MatchupEntry, Roster};

pub const DEFAULT_API_BASE: &str = "https://api.sleeper.app/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub league_id: String,
    pub season: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub previous_league_id: Option<String>,
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<LeagueMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueMetadata {
    /// Set once the season's playoffs are decided. The API sends it as a string.
    #[serde(default)]
    pub latest_league_winner_roster_id: Option<String>,
}

impl LeagueInfo {
    /// Link to last year's league. The API uses null, "" or "0" for none.
    pub fn previous(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "0")
    }

    pub fn winner_roster_id(&self) -> Option<u32> {
        self.metadata
            .as_ref()?
            .latest_league_winner_roster_id
            .as_deref()?
            .trim()
            .parse()
            .ok()
    }
}

pub fn parse_league_json(raw: &str) -> Result<LeagueInfo> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty league response"));
    }
    serde_json::from_str(trimmed).context("invalid league json")
}

pub fn parse_rosters_json(raw: &str) -> Result<Vec<Roster>> {
    parse_list(raw).context("invalid rosters json")
}

pub fn parse_users_json(raw: &str) -> Result<Vec<LeagueUser>> {
    parse_list(raw).context("invalid users json")
}

pub fn parse_matchups_json(raw: &str) -> Result<Vec<MatchupEntry>> {
    parse_list(raw).context("invalid matchups json")
}

fn parse_list<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str::<Option<Vec<T>>>(trimmed)?.unwrap_or_default())
}

/// Read-only client for the public league API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for SleeperClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl LeagueSource for SleeperClient {
    fn league(&self, league_id: &str) -> Result<LeagueInfo> {
        let body = get_text(&self.url(&format!("/league/{league_id}")))?;
        parse_league_json(&body)
    }

    fn rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        let body = get_text(&self.url(&format!("/league/{league_id}/rosters")))?;
        parse_rosters_json(&body)
    }

    fn users(&self, league_id: &str) -> Result<Vec<LeagueUser>> {
        let body = get_text(&self.url(&format!("/league/{league_id}/users")))?;
        parse_users_json(&body)
    }

    fn week_matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupEntry>> {
        let body = get_text(&self.url(&format!("/league/{league_id}/matchups/{week}")))?;
        parse_matchups_json(&body)
    }
}
