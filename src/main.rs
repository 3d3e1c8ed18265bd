use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde_json::json;
use tracing::{debug, info, warn};

use league_almanac::config::AppConfig;
use league_almanac::history::load_league_dataset;
use league_almanac::logging::init_logging;
use league_almanac::model::LeagueDataset;
use league_almanac::preferences::{Theme, load_theme, save_theme};
use league_almanac::records::compute_record_book;
use league_almanac::render::{render_league_table, render_record_book, render_report};
use league_almanac::sleeper::SleeperClient;
use league_almanac::standings::compute_league_table;
use league_almanac::stats_cache::StatsCache;
use league_almanac::stats_loader::{StatsLoad, StatsLoader};
use league_almanac::store::{FileStore, KvStore, MemoryStore};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging()?;

    let cfg = AppConfig::from_env();
    let store = open_store(&cfg);

    if let Some(raw) = parse_str_arg("--theme") {
        return apply_theme(store.as_ref(), &raw);
    }

    let cache = StatsCache::new(store).with_ttl(cfg.cache_ttl);
    if has_flag("--clear-cache") {
        let removed = cache.invalidate_all();
        println!("Cleared {removed} cached report(s)");
        return Ok(());
    }

    let dataset = match parse_str_arg("--input") {
        Some(path) => LeagueDataset::load(&PathBuf::from(path))?,
        None => {
            let league_id = parse_str_arg("--league").unwrap_or_else(|| cfg.league_id.clone());
            let client = SleeperClient::new(cfg.api_base.clone());
            load_league_dataset(&client, &league_id, &cfg.history_options())
                .with_context(|| format!("fetch league {league_id}"))?
        }
    };

    if let Some(path) = parse_str_arg("--save-dataset") {
        dataset.save(&PathBuf::from(&path))?;
        info!(%path, "dataset saved");
    }

    let mut loader = StatsLoader::new(cache, cfg.engine.clone());
    if has_flag("--digest") {
        loader = loader.with_content_digest();
    }
    let load = if has_flag("--recalculate") {
        loader.recalculate(&dataset)
    } else {
        loader.load_with_progress(&dataset, false, |pct| debug!(pct, "loading all-time stats"))
    };

    let report = match load {
        StatsLoad::Ready(report) => report,
        StatsLoad::Empty => {
            println!("No matchup data available yet");
            return Ok(());
        }
        StatsLoad::Failed(msg) => return Err(anyhow!("all-time stats failed: {msg}")),
    };

    let top_n = parse_usize_arg("--top").unwrap_or(cfg.top_n).max(1);
    let book = compute_record_book(
        &dataset.matchups,
        &dataset.seasons,
        &dataset.current_season,
        top_n,
        cfg.engine.zero_is_unplayed,
    );
    let table = compute_league_table(&dataset.seasons, &dataset.current_season);

    if has_flag("--json") {
        let out = json!({
            "leagueId": dataset.league_id,
            "currentSeason": dataset.current_season,
            "stats": report,
            "records": book,
            "standings": table,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let league = dataset.league_id.as_deref().unwrap_or("local dataset");
        println!("All-time stats for {league} (current season {})", dataset.current_season);
        println!();
        print!("{}", render_league_table(&table));
        println!();
        print!("{}", render_report(&report));
        println!();
        print!("{}", render_record_book(&book));
    }

    Ok(())
}

fn open_store(cfg: &AppConfig) -> Box<dyn KvStore> {
    match cfg.cache_path() {
        Some(path) => {
            let store = FileStore::new(path);
            debug!(path = %store.path().display(), "using stats cache file");
            Box::new(store)
        }
        None => {
            warn!("no cache directory available; stats cache is in-memory only");
            Box::new(MemoryStore::new())
        }
    }
}

fn apply_theme(store: &dyn KvStore, raw: &str) -> Result<()> {
    let current = load_theme(&store);
    let next = match raw.trim() {
        "" | "show" => {
            println!("{}", current.as_str());
            return Ok(());
        }
        "toggle" => current.toggled(),
        other => Theme::parse(other).ok_or_else(|| anyhow!("unknown theme: {other}"))?,
    };
    save_theme(&store, next)?;
    println!("{}", next.as_str());
    Ok(())
}

fn parse_str_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}=")) {
            return Some(raw.trim().to_string());
        }
        if arg == name {
            let next = args
                .get(idx + 1)
                .filter(|next| !next.starts_with("--"))
                .map(|next| next.trim().to_string());
            return Some(next.unwrap_or_default());
        }
    }
    None
}

fn parse_usize_arg(name: &str) -> Option<usize> {
    parse_str_arg(name).and_then(|raw| raw.parse::<usize>().ok())
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
