use serde::{Deserialize, Serialize};

/// All-time statistics for a league. Every record is independently optional
/// so partial data never blocks unrelated groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub scoring_extremes: ScoringExtremes,
    pub consistency: Consistency,
    pub domination: Domination,
    pub season_records: SeasonRecords,
    pub weekly: WeeklySuperlatives,
    pub manager_records: ManagerRecords,
    pub fun_stats: FunStats,
}

impl StatsReport {
    pub fn is_empty(&self) -> bool {
        *self == StatsReport::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringExtremes {
    pub highest_score: Option<WeeklyScoreRecord>,
    pub lowest_score: Option<WeeklyScoreRecord>,
    pub biggest_blowout: Option<BlowoutRecord>,
    pub closest_game: Option<CloseGameRecord>,
    pub most_points_in_loss: Option<WeeklyScoreRecord>,
    pub fewest_points_in_win: Option<WeeklyScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScoreRecord {
    pub team: String,
    pub points: String,
    pub week: u32,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlowoutRecord {
    pub winner: String,
    pub winner_points: String,
    pub loser: String,
    pub loser_points: String,
    pub margin: String,
    pub week: u32,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseGameRecord {
    pub team1: String,
    pub team1_points: String,
    pub team2: String,
    pub team2_points: String,
    pub margin: String,
    pub week: u32,
    pub season: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consistency {
    pub total_games_played: usize,
    pub league_average_score: Option<String>,
    pub total_points_scored: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domination {
    pub longest_win_streak: Option<StreakRecord>,
    pub longest_losing_streak: Option<StreakRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    pub team: String,
    pub streak: u32,
    pub season: String,
    pub first_week: u32,
    pub last_week: u32,
    /// "Weeks 3-7"
    pub weeks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecords {
    pub best_record: Option<RecordLine>,
    pub worst_record: Option<RecordLine>,
    pub most_points_season: Option<SeasonPointsRecord>,
    pub fewest_points_season: Option<SeasonPointsRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLine {
    pub team: String,
    pub season: String,
    pub record: String,
    pub win_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPointsRecord {
    pub team: String,
    pub season: String,
    pub points: String,
    pub average: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySuperlatives {
    pub most_high_scoring_weeks: Option<WeekCountRecord>,
    pub most_low_scoring_weeks: Option<WeekCountRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCountRecord {
    pub team: String,
    pub season: String,
    pub count: u32,
    pub threshold: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRecords {
    pub winningest_manager: Option<WinningestRecord>,
    pub most_points_manager: Option<ManagerPointsRecord>,
    pub most_points_against: Option<PointsAgainstRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningestRecord {
    pub manager: String,
    pub record: String,
    pub win_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerPointsRecord {
    pub manager: String,
    pub points: String,
    pub average: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAgainstRecord {
    pub manager: String,
    pub avg_opponent_score: String,
    pub total_opponent_points: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunStats {
    pub unluckiest_team: Option<LuckRecord>,
    pub luckiest_team: Option<LuckRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckRecord {
    pub team: String,
    pub season: String,
    pub record: String,
    pub points: String,
}

pub fn fmt_points(points: f64) -> String {
    format!("{points:.2}")
}

/// Ratio in [0, 1] as a one-decimal percentage, e.g. 0.75 -> "75.0".
pub fn fmt_pct(ratio: f64) -> String {
    format!("{:.1}", ratio * 100.0)
}

pub fn fmt_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}
