use std::path::PathBuf;
use std::time::Duration;

use crate::history::{DEFAULT_HISTORY_DEPTH, DEFAULT_TOTAL_WEEKS, HistoryOptions};
use crate::records::DEFAULT_TOP_N;
use crate::sleeper::DEFAULT_API_BASE;
use crate::stats_cache::DEFAULT_TTL;
use crate::stats_engine::EngineConfig;
use crate::store::default_store_path;

pub const DEFAULT_LEAGUE_ID: &str = "1257101142144327682";
const MAX_WEEK: u32 = 18;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub league_id: String,
    pub api_base: String,
    pub total_weeks: u32,
    pub history_depth: usize,
    pub cache_ttl: Duration,
    pub cache_file: Option<PathBuf>,
    pub top_n: usize,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let defaults = EngineConfig::default();
        let mut engine = defaults.clone();
        if let Some(val) = text("STATS_HIGH_SCORE").and_then(|v| v.parse::<f64>().ok()) {
            engine.high_score_threshold = val;
        }
        if let Some(val) = text("STATS_LOW_SCORE").and_then(|v| v.parse::<f64>().ok()) {
            engine.low_score_threshold = val;
        }
        // Set but blank means "exclude nothing".
        if let Some(raw) = lookup("STATS_LOWEST_EXCLUDED_WEEKS") {
            engine.lowest_score_excluded_weeks = parse_weeks(&raw);
        }

        let ttl_hours = text("STATS_CACHE_TTL_HOURS")
            .and_then(|v| v.parse::<u64>().ok())
            .and_then(|h| h.checked_mul(60 * 60))
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        Self {
            league_id: text("LEAGUE_ID").unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string()),
            api_base: text("LEAGUE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            total_weeks: text("LEAGUE_MAX_WEEK")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(DEFAULT_TOTAL_WEEKS)
                .clamp(1, MAX_WEEK),
            history_depth: text("LEAGUE_HISTORY_DEPTH")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_HISTORY_DEPTH),
            cache_ttl: ttl_hours,
            cache_file: text("STATS_CACHE_FILE").map(PathBuf::from),
            top_n: text("STATS_TOP_N")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_TOP_N)
                .max(1),
            engine,
        }
    }

    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions {
            total_weeks: self.total_weeks,
            max_depth: self.history_depth,
        }
    }

    /// Explicit cache file, else the per-user cache dir.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_file.clone().or_else(default_store_path)
    }
}

fn parse_weeks(raw: &str) -> Vec<u32> {
    let mut weeks: Vec<u32> = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|week| *week >= 1)
        .collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}
