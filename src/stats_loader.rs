use anyhow::Result;
use tracing::{info, warn};

use crate::model::LeagueDataset;
use crate::report::StatsReport;
use crate::stats_cache::{Fingerprint, StatsCache};
use crate::stats_engine::{EngineConfig, compute_all_time_stats};
use crate::store::KvStore;

/// What a caller gets back from a load: nothing to show yet, a report, or
/// the reason the computation failed.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsLoad {
    Empty,
    Ready(StatsReport),
    Failed(String),
}

impl StatsLoad {
    pub fn report(&self) -> Option<&StatsReport> {
        match self {
            StatsLoad::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StatsLoad::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

type ComputeFn = Box<dyn Fn(&LeagueDataset) -> Result<StatsReport> + Send + Sync>;

/// Cache plus engine behind one call. Progress is reported in fixed stages
/// (0, 10, 30, 80, 100); the computation itself is not incremental.
pub struct StatsLoader<S> {
    cache: StatsCache<S>,
    compute: ComputeFn,
    content_digest: bool,
}

impl<S: KvStore> StatsLoader<S> {
    pub fn new(cache: StatsCache<S>, engine: EngineConfig) -> Self {
        Self::with_compute(cache, move |dataset: &LeagueDataset| {
            Ok(compute_all_time_stats(
                &dataset.matchups,
                &dataset.seasons,
                &dataset.current_season,
                &engine,
            ))
        })
    }

    pub fn with_compute<F>(cache: StatsCache<S>, compute: F) -> Self
    where
        F: Fn(&LeagueDataset) -> Result<StatsReport> + Send + Sync + 'static,
    {
        Self {
            cache,
            compute: Box::new(compute),
            content_digest: false,
        }
    }

    /// Key entries by a hash of the whole dataset instead of its counts.
    pub fn with_content_digest(mut self) -> Self {
        self.content_digest = true;
        self
    }

    pub fn fingerprint(&self, dataset: &LeagueDataset) -> Fingerprint {
        if self.content_digest {
            Fingerprint::content_digest(&dataset.current_season, &dataset.matchups, &dataset.seasons)
        } else {
            Fingerprint::for_dataset(dataset)
        }
    }

    pub fn load(&self, dataset: &LeagueDataset, force: bool) -> StatsLoad {
        self.load_with_progress(dataset, force, |_| {})
    }

    pub fn load_with_progress(
        &self,
        dataset: &LeagueDataset,
        force: bool,
        mut progress: impl FnMut(u8),
    ) -> StatsLoad {
        progress(0);
        if dataset.is_empty() {
            return StatsLoad::Empty;
        }

        let fingerprint = self.fingerprint(dataset);
        progress(10);

        let result = if force {
            progress(30);
            (self.compute)(dataset).inspect(|report| {
                progress(80);
                self.cache.put(&fingerprint, report);
            })
        } else {
            self.cache.get_or_compute(&fingerprint, || {
                progress(30);
                let report = (self.compute)(dataset);
                progress(80);
                report
            })
        };

        match result {
            Ok(report) => {
                progress(100);
                info!(%fingerprint, "all-time stats ready");
                StatsLoad::Ready(report)
            }
            Err(err) => {
                warn!(%fingerprint, error = %err, "all-time stats computation failed");
                StatsLoad::Failed(format!("{err:#}"))
            }
        }
    }

    /// Drops the cached entry for this dataset and computes it again.
    pub fn recalculate(&self, dataset: &LeagueDataset) -> StatsLoad {
        if !dataset.is_empty() {
            self.cache.invalidate(&self.fingerprint(dataset));
        }
        self.load(dataset, false)
    }
}
