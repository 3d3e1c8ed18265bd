use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{MatchupEntry, WeekMatchups};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairingSide {
    pub roster_id: u32,
    pub points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// A head-to-head game rebuilt from two score lines sharing a matchup id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupPairing {
    pub season: String,
    pub week: u32,
    pub matchup_id: u32,
    pub team1: PairingSide,
    pub team2: PairingSide,
}

impl MatchupPairing {
    /// Strictly higher score wins; on equal points `team1` is the winner.
    pub fn winner(&self) -> &PairingSide {
        if self.team2.points > self.team1.points {
            &self.team2
        } else {
            &self.team1
        }
    }

    pub fn loser(&self) -> &PairingSide {
        if self.team2.points > self.team1.points {
            &self.team1
        } else {
            &self.team2
        }
    }

    pub fn margin(&self) -> f64 {
        (self.team1.points - self.team2.points).abs()
    }

    pub fn involves(&self, roster_id: u32) -> bool {
        self.team1.roster_id == roster_id || self.team2.roster_id == roster_id
    }

    pub fn outcome_for(&self, roster_id: u32) -> Option<Outcome> {
        if !self.involves(roster_id) {
            return None;
        }
        if self.winner().roster_id == roster_id {
            Some(Outcome::Win)
        } else {
            Some(Outcome::Loss)
        }
    }

    /// Points scored against `roster_id` in this game.
    pub fn opponent_points(&self, roster_id: u32) -> Option<f64> {
        if self.team1.roster_id == roster_id {
            Some(self.team2.points)
        } else if self.team2.roster_id == roster_id {
            Some(self.team1.points)
        } else {
            None
        }
    }
}

/// Pair up one week's played score lines. Groups are emitted in ascending
/// matchup id order; anything that is not exactly two distinct rosters
/// (byes, median games, duplicates) is dropped.
pub fn pair_week(week: &WeekMatchups, zero_is_unplayed: bool) -> Vec<MatchupPairing> {
    let mut groups: BTreeMap<u32, Vec<(&MatchupEntry, f64)>> = BTreeMap::new();
    for entry in &week.matchups {
        let Some(points) = entry.played_points(zero_is_unplayed) else {
            continue;
        };
        let Some(matchup_id) = entry.matchup_id else {
            continue;
        };
        groups.entry(matchup_id).or_default().push((entry, points));
    }

    groups
        .into_iter()
        .filter_map(|(matchup_id, group)| {
            let [(a, a_points), (b, b_points)] = group.as_slice() else {
                return None;
            };
            if a.roster_id == b.roster_id {
                return None;
            }
            Some(MatchupPairing {
                season: week.season.clone(),
                week: week.week,
                matchup_id,
                team1: PairingSide {
                    roster_id: a.roster_id,
                    points: *a_points,
                },
                team2: PairingSide {
                    roster_id: b.roster_id,
                    points: *b_points,
                },
            })
        })
        .collect()
}

pub fn reconstruct_pairings(matchups: &[WeekMatchups], zero_is_unplayed: bool) -> Vec<MatchupPairing> {
    matchups
        .iter()
        .flat_map(|week| pair_week(week, zero_is_unplayed))
        .collect()
}
