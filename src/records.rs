//! Top-N leaderboards for the records page: best and worst single weeks and
//! season point totals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::directory::SeasonDirectory;
use crate::model::{SeasonData, WeekMatchups};
use crate::report::{SeasonPointsRecord, WeeklyScoreRecord, fmt_points};
use crate::stats_engine::{WeeklyScore, played_scores};

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBook {
    pub highest_single_week: Vec<WeeklyScoreRecord>,
    pub lowest_single_week: Vec<WeeklyScoreRecord>,
    pub highest_season_points: Vec<SeasonPointsRecord>,
    pub lowest_season_points: Vec<SeasonPointsRecord>,
    pub summary: RecordSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub total_games_played: usize,
    pub average_score: Option<String>,
    pub highest_score: Option<WeeklyScoreRecord>,
    pub lowest_score: Option<WeeklyScoreRecord>,
}

struct SeasonTotal<'a> {
    season: &'a str,
    roster_id: u32,
    total: f64,
    weeks: u32,
}

/// Leaderboards exclude the current season from every "lowest" list since
/// its totals are still moving. Averages are per scored week.
pub fn compute_record_book(
    matchups: &[WeekMatchups],
    seasons: &[SeasonData],
    current_season: &str,
    top_n: usize,
    zero_is_unplayed: bool,
) -> RecordBook {
    if matchups.is_empty() {
        return RecordBook::default();
    }

    let dir = SeasonDirectory::new(seasons);
    let scores = played_scores(matchups, zero_is_unplayed);

    let mut by_points_desc: Vec<&WeeklyScore<'_>> = scores.iter().collect();
    // sort_by is stable: equal scores stay in input order.
    by_points_desc.sort_by(|a, b| b.points.total_cmp(&a.points));

    let week_record = |s: &WeeklyScore<'_>| WeeklyScoreRecord {
        team: dir.team_name(s.season, s.roster_id),
        points: fmt_points(s.points),
        week: s.week,
        season: s.season.to_string(),
    };

    let highest_single_week = by_points_desc
        .iter()
        .take(top_n)
        .map(|s| week_record(*s))
        .collect();

    let eligible_low: Vec<&WeeklyScore<'_>> = by_points_desc
        .iter()
        .copied()
        .filter(|s| s.season != current_season)
        .collect();
    let lowest_single_week = eligible_low
        .iter()
        .rev()
        .take(top_n)
        .map(|s| week_record(*s))
        .collect();

    let totals = season_totals(&scores);
    let season_record = |t: &SeasonTotal<'_>| SeasonPointsRecord {
        team: dir.team_name(t.season, t.roster_id),
        season: t.season.to_string(),
        points: fmt_points(t.total),
        average: fmt_points(if t.weeks > 0 {
            t.total / f64::from(t.weeks)
        } else {
            0.0
        }),
    };

    let mut totals_desc: Vec<&SeasonTotal<'_>> = totals.iter().collect();
    totals_desc.sort_by(|a, b| b.total.total_cmp(&a.total));
    let highest_season_points = totals_desc
        .iter()
        .take(top_n)
        .map(|t| season_record(*t))
        .collect();

    let mut totals_asc: Vec<&SeasonTotal<'_>> = totals
        .iter()
        .filter(|t| t.season != current_season)
        .collect();
    totals_asc.sort_by(|a, b| a.total.total_cmp(&b.total));
    let lowest_season_points = totals_asc
        .iter()
        .take(top_n)
        .map(|t| season_record(*t))
        .collect();

    let total_points: f64 = scores.iter().map(|s| s.points).sum();
    let summary = RecordSummary {
        total_games_played: scores.len(),
        average_score: (!scores.is_empty()).then(|| fmt_points(total_points / scores.len() as f64)),
        highest_score: by_points_desc.first().map(|s| week_record(*s)),
        lowest_score: eligible_low.last().map(|s| week_record(*s)),
    };

    RecordBook {
        highest_single_week,
        lowest_single_week,
        highest_season_points,
        lowest_season_points,
        summary,
    }
}

fn season_totals<'a>(scores: &[WeeklyScore<'a>]) -> Vec<SeasonTotal<'a>> {
    let mut out: Vec<SeasonTotal<'a>> = Vec::new();
    let mut index: HashMap<(&'a str, u32), usize> = HashMap::new();
    for s in scores {
        let slot = *index.entry((s.season, s.roster_id)).or_insert_with(|| {
            out.push(SeasonTotal {
                season: s.season,
                roster_id: s.roster_id,
                total: 0.0,
                weeks: 0,
            });
            out.len() - 1
        });
        out[slot].total += s.points;
        out[slot].weeks += 1;
    }
    out
}
