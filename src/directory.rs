use std::collections::HashMap;

use crate::model::{LeagueUser, Roster, SeasonData};

/// Per-season lookup of rosters and their owners.
///
/// A roster id is resolved inside its own season only. When the same season
/// appears more than once in the input, the first occurrence wins.
pub struct SeasonDirectory<'a> {
    seasons: HashMap<&'a str, SeasonIndex<'a>>,
}

struct SeasonIndex<'a> {
    rosters: HashMap<u32, &'a Roster>,
    users: HashMap<&'a str, &'a LeagueUser>,
}

impl<'a> SeasonDirectory<'a> {
    pub fn new(seasons: &'a [SeasonData]) -> Self {
        let mut out: HashMap<&'a str, SeasonIndex<'a>> = HashMap::new();
        for data in seasons {
            out.entry(data.season.as_str()).or_insert_with(|| {
                let mut rosters = HashMap::new();
                for roster in &data.rosters {
                    rosters.entry(roster.roster_id).or_insert(roster);
                }
                let mut users = HashMap::new();
                for user in &data.users {
                    users.entry(user.user_id.as_str()).or_insert(user);
                }
                SeasonIndex { rosters, users }
            });
        }
        Self { seasons: out }
    }

    pub fn roster(&self, season: &str, roster_id: u32) -> Option<&'a Roster> {
        self.seasons.get(season)?.rosters.get(&roster_id).copied()
    }

    pub fn owner(&self, season: &str, roster_id: u32) -> Option<&'a LeagueUser> {
        let index = self.seasons.get(season)?;
        let owner_id = index.rosters.get(&roster_id)?.owner_id.as_deref()?;
        index.users.get(owner_id).copied()
    }

    /// Owner id as recorded on the roster, whether or not the user resolves.
    pub fn user_id(&self, season: &str, roster_id: u32) -> Option<&'a str> {
        self.roster(season, roster_id)?.owner_id.as_deref()
    }

    pub fn manager_name(&self, season: &str, roster_id: u32) -> Option<&'a str> {
        self.owner(season, roster_id)?.display_name.as_deref()
    }

    pub fn team_name(&self, season: &str, roster_id: u32) -> String {
        self.owner(season, roster_id)
            .and_then(|user| user.team_name.as_deref().or(user.display_name.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_team_name(roster_id))
    }
}

pub fn placeholder_team_name(roster_id: u32) -> String {
    format!("Team {roster_id}")
}
