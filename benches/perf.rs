use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use league_almanac::model::{LeagueUser, MatchupEntry, Roster, SeasonData, WeekMatchups};
use league_almanac::pairing::reconstruct_pairings;
use league_almanac::records::compute_record_book;
use league_almanac::sleeper::parse_matchups_json;
use league_almanac::stats_cache::{Fingerprint, StatsCache};
use league_almanac::stats_engine::{EngineConfig, compute_all_time_stats};
use league_almanac::store::MemoryStore;

const TEAMS: u32 = 12;
const WEEKS: u32 = 18;
const SEASONS: u32 = 6;

/// Deterministic pseudo-scores so runs are comparable.
fn score(season: u32, week: u32, roster: u32) -> f64 {
    let seed = season * 7919 + week * 104_729 + roster * 1_299_709;
    70.0 + f64::from(seed % 9_000) / 100.0
}

fn sample_league() -> (Vec<WeekMatchups>, Vec<SeasonData>) {
    let mut matchups = Vec::new();
    let mut seasons = Vec::new();
    for s in 0..SEASONS {
        let season = (2019 + s).to_string();
        for week in 1..=WEEKS {
            let entries = (1..=TEAMS)
                .map(|roster| {
                    // Last weeks of the newest season are unplayed.
                    let points = if s + 1 == SEASONS && week > 10 {
                        0.0
                    } else {
                        score(s, week, roster)
                    };
                    MatchupEntry::new(roster, (roster + 1) / 2, points)
                })
                .collect();
            matchups.push(WeekMatchups {
                week,
                season: season.clone(),
                matchups: entries,
            });
        }
        seasons.push(SeasonData {
            season: season.clone(),
            rosters: (1..=TEAMS)
                .map(|roster| Roster {
                    roster_id: roster,
                    owner_id: Some(format!("u{roster}")),
                    wins: roster % 14,
                    losses: 14 - roster % 14,
                    ties: 0,
                    points_for: 1_000.0 + f64::from(roster) * 10.5,
                })
                .collect(),
            users: (1..=TEAMS)
                .map(|roster| LeagueUser {
                    user_id: format!("u{roster}"),
                    display_name: Some(format!("Manager {roster}")),
                    team_name: (roster % 3 == 0).then(|| format!("Team Name {roster}")),
                })
                .collect(),
            champion_roster_id: Some(1),
        });
    }
    (matchups, seasons)
}

fn bench_all_time_stats(c: &mut Criterion) {
    let (matchups, seasons) = sample_league();
    let cfg = EngineConfig::default();
    c.bench_function("all_time_stats_6_seasons", |b| {
        b.iter(|| {
            let report = compute_all_time_stats(
                black_box(&matchups),
                black_box(&seasons),
                "2024",
                &cfg,
            );
            black_box(report.consistency.total_games_played);
        })
    });
}

fn bench_pairing(c: &mut Criterion) {
    let (matchups, _) = sample_league();
    c.bench_function("reconstruct_pairings", |b| {
        b.iter(|| {
            let pairings = reconstruct_pairings(black_box(&matchups), true);
            black_box(pairings.len());
        })
    });
}

fn bench_record_book(c: &mut Criterion) {
    let (matchups, seasons) = sample_league();
    c.bench_function("record_book_top10", |b| {
        b.iter(|| {
            let book = compute_record_book(black_box(&matchups), &seasons, "2024", 10, true);
            black_box(book.highest_single_week.len());
        })
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let (matchups, seasons) = sample_league();
    let report = compute_all_time_stats(&matchups, &seasons, "2024", &EngineConfig::default());
    let cache = StatsCache::new(MemoryStore::new());
    let fp = Fingerprint::coarse("2024", &matchups, &seasons);
    cache.put(&fp, &report);
    c.bench_function("stats_cache_hit", |b| {
        b.iter(|| {
            let hit = cache.get(black_box(&fp));
            black_box(hit.is_some());
        })
    });
}

fn bench_matchups_parse(c: &mut Criterion) {
    c.bench_function("matchups_parse", |b| {
        b.iter(|| {
            let rows = parse_matchups_json(black_box(MATCHUPS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_all_time_stats,
    bench_pairing,
    bench_record_book,
    bench_cache_hit,
    bench_matchups_parse
);
criterion_main!(perf);

static MATCHUPS_JSON: &str = include_str!("../tests/fixtures/sleeper_matchups_week1.json");
