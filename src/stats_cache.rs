//! Memoization of the all-time report, keyed by a dataset fingerprint and
//! persisted in a [`KvStore`].
//!
//! Storage problems never fail a lookup: an unreadable, corrupt or
//! unwritable store behaves like an empty cache. Two callers racing on the
//! same fingerprint may both compute; the last write wins.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::model::{LeagueDataset, SeasonData, WeekMatchups, total_matchup_entries};
use crate::report::StatsReport;
use crate::store::KvStore;

pub const CACHE_NAMESPACE: &str = "fantasy_all_time_stats_cache";
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Cache key for one dataset.
///
/// The default [`Fingerprint::coarse`] only looks at the current season,
/// the number of score lines and the number of seasons, so edits that keep
/// those counts (a stat correction, a renamed team) reuse the old report
/// until the TTL runs out or the entry is invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn coarse(current_season: &str, matchups: &[WeekMatchups], seasons: &[SeasonData]) -> Self {
        Self(format!(
            "{}_{}_{}",
            current_season,
            total_matchup_entries(matchups),
            seasons.len()
        ))
    }

    /// SHA-256 over the serialized inputs. Changes whenever any input does.
    pub fn content_digest(
        current_season: &str,
        matchups: &[WeekMatchups],
        seasons: &[SeasonData],
    ) -> Self {
        let Ok(bytes) = serde_json::to_vec(&(current_season, matchups, seasons)) else {
            return Self::coarse(current_season, matchups, seasons);
        };
        let digest = Sha256::digest(&bytes);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("{current_season}_{hex}"))
    }

    pub fn for_dataset(dataset: &LeagueDataset) -> Self {
        Self::coarse(&dataset.current_season, &dataset.matchups, &dataset.seasons)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    data: StatsReport,
    /// Epoch milliseconds at write time.
    timestamp: i64,
}

pub struct StatsCache<S> {
    store: S,
    namespace: String,
    ttl: Duration,
}

impl<S: KvStore> StatsCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            namespace: CACHE_NAMESPACE.to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn key(&self, fingerprint: &Fingerprint) -> String {
        format!("{}_{}", self.namespace, fingerprint)
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<StatsReport> {
        self.get_at(fingerprint, now_millis())
    }

    /// Fresh entry for `fingerprint` as of `now_ms`. Expired entries are
    /// removed on the way out.
    pub fn get_at(&self, fingerprint: &Fingerprint, now_ms: i64) -> Option<StatsReport> {
        let key = self.key(fingerprint);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(%key, error = %err, "stats cache read failed");
                return None;
            }
        };
        let entry = match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%key, error = %err, "stats cache entry unreadable");
                return None;
            }
        };
        let age_ms = now_ms.saturating_sub(entry.timestamp);
        if age_ms > ttl_millis(self.ttl) {
            debug!(%key, age_ms, "stats cache entry expired");
            self.remove_key(&key);
            return None;
        }
        Some(entry.data)
    }

    pub fn put(&self, fingerprint: &Fingerprint, report: &StatsReport) {
        self.put_at(fingerprint, report, now_millis());
    }

    pub fn put_at(&self, fingerprint: &Fingerprint, report: &StatsReport, now_ms: i64) {
        let key = self.key(fingerprint);
        let entry = CacheEntry {
            data: report.clone(),
            timestamp: now_ms,
        };
        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(err) => {
                warn!(%key, error = %err, "stats cache entry not serializable");
                return;
            }
        };
        if let Err(err) = self.store.set(&key, &json) {
            warn!(%key, error = %err, "stats cache write failed");
        }
    }

    /// Cached report for `fingerprint`, or the result of `compute` written
    /// back to the store. Only an error from `compute` is returned.
    pub fn get_or_compute<F>(&self, fingerprint: &Fingerprint, compute: F) -> Result<StatsReport>
    where
        F: FnOnce() -> Result<StatsReport>,
    {
        self.get_or_compute_at(fingerprint, now_millis(), compute)
    }

    pub fn get_or_compute_at<F>(
        &self,
        fingerprint: &Fingerprint,
        now_ms: i64,
        compute: F,
    ) -> Result<StatsReport>
    where
        F: FnOnce() -> Result<StatsReport>,
    {
        if let Some(report) = self.get_at(fingerprint, now_ms) {
            debug!(%fingerprint, "stats cache hit");
            return Ok(report);
        }
        debug!(%fingerprint, "stats cache miss");
        let report = compute()?;
        self.put_at(fingerprint, &report, now_ms);
        Ok(report)
    }

    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        let key = self.key(fingerprint);
        self.remove_key(&key);
    }

    /// Drops every entry under this cache's namespace. Returns how many
    /// entries were removed.
    pub fn invalidate_all(&self) -> usize {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "stats cache key listing failed");
                return 0;
            }
        };
        let prefix = format!("{}_", self.namespace);
        keys.iter()
            .filter(|key| key.starts_with(&prefix))
            .filter(|key| self.remove_key(key))
            .count()
    }

    fn remove_key(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(err) => {
                warn!(%key, error = %err, "stats cache remove failed");
                false
            }
        }
    }
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
